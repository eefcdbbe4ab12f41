//! fyyur - venue and artist booking site
//!
//! Resolves configuration (CLI > environment > TOML file > defaults), opens the SQLite
//! database, optionally seeds sample data, and serves the site.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use fyyur_common::config::{ConfigOverrides, ServerConfig};
use fyyur_common::db::init_database;
use fyyur_common::seed::seed_if_empty;
use fyyur_web::{build_router, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "fyyur")]
#[command(about = "Fyyur venue and artist booking site", long_about = None)]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "FYYUR_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (e.g. 127.0.0.1:5000)
    #[arg(short, long, env = "FYYUR_BIND")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "FYYUR_DATABASE")]
    database: Option<PathBuf>,

    /// Also write log records to this file
    #[arg(long, env = "FYYUR_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Insert sample venues, artists and shows when the database is empty
    #[arg(long)]
    seed: bool,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        ConfigOverrides {
            config_file: args.config,
            bind_addr: args.bind,
            database_path: args.database,
            log_file: args.log_file,
            seed: args.seed,
        }
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::resolve(args.into())?;

    init_tracing(config.log_file.as_deref())?;

    // Build identification first, before any database work
    info!(
        "Starting Fyyur v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database path: {}", config.database_path.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    if config.seed && seed_if_empty(&pool).await? {
        info!("✓ Sample data inserted");
    }

    let bind_addr = config.bind_addr;
    let app = build_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("fyyur listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
