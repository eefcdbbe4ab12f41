//! Database initialization
//!
//! Creates the database file and schema on first run; safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Default pool size for the web server
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    init_database_with_pool_size(db_path, DEFAULT_MAX_CONNECTIONS).await
}

/// Initialize database with an explicit connection limit
pub async fn init_database_with_pool_size(
    db_path: &Path,
    max_connections: u32,
) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Foreign keys are a per-connection pragma in SQLite, so they are set in the
    // connect options rather than with a one-off PRAGMA on the pool.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_venues_table(pool).await?;
    create_artists_table(pool).await?;
    create_shows_table(pool).await?;
    Ok(())
}

async fn create_venues_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            address TEXT NOT NULL,
            phone TEXT,
            image_link TEXT,
            facebook_link TEXT,
            website TEXT,
            genres TEXT NOT NULL DEFAULT '[]',
            seeking_talent INTEGER NOT NULL DEFAULT 0,
            seeking_description TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_venues_area ON venues(state, city)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            phone TEXT,
            image_link TEXT,
            facebook_link TEXT,
            website TEXT,
            genres TEXT NOT NULL DEFAULT '[]',
            seeking_venue INTEGER NOT NULL DEFAULT 0,
            seeking_description TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_shows_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_id INTEGER NOT NULL REFERENCES artists(id),
            venue_id INTEGER NOT NULL REFERENCES venues(id),
            start_time TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_shows_venue ON shows(venue_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_shows_artist ON shows(artist_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn table_names(pool: &SqlitePool) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_init_creates_file_and_tables() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("fyyur.db");

        let pool = init_database(&db_path).await.expect("init should succeed");

        assert!(db_path.exists());
        assert_eq!(table_names(&pool).await, vec!["artists", "shows", "venues"]);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("fyyur.db");

        let pool = init_database(&db_path).await.unwrap();
        sqlx::query(
            "INSERT INTO venues (name, city, state, address) VALUES ('Keep Me', 'Austin', 'TX', '1 Main')",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;

        let pool = init_database(&db_path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced_on_every_connection() {
        let dir = TempDir::new().unwrap();
        let pool = init_database_with_pool_size(&dir.path().join("fk.db"), 3)
            .await
            .unwrap();

        for _ in 0..3 {
            let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(enabled, 1);
        }

        let orphan = sqlx::query(
            "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (99, 99, '2035-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await;
        assert!(orphan.is_err(), "show without artist/venue must be rejected");
    }
}
