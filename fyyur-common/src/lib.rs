//! # Fyyur Common Library
//!
//! Shared code for the Fyyur booking site:
//! - Database schema, models and row queries (venues, artists, shows)
//! - Listing aggregation (area grouping, past/upcoming partitions)
//! - Name search
//! - Transactional create/update/delete of records
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod search;
pub mod seed;
pub mod time;

pub use error::{Error, Result};
