//! Show database operations
//!
//! Shows are joined explicitly with their venue and artist; there is no lazy loading.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::models::{Show, ShowDetail};
use crate::Result;

const DETAIL_SELECT: &str = r#"
    SELECT s.id, s.start_time,
           v.id AS venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
           a.id AS artist_id, a.name AS artist_name, a.image_link AS artist_image_link
    FROM shows s
    JOIN venues v ON v.id = s.venue_id
    JOIN artists a ON a.id = s.artist_id
"#;

fn detail_from_row(row: &SqliteRow) -> Result<ShowDetail> {
    Ok(ShowDetail {
        id: row.try_get("id")?,
        venue_id: row.try_get("venue_id")?,
        venue_name: row.try_get("venue_name")?,
        venue_image_link: row.try_get("venue_image_link")?,
        artist_id: row.try_get("artist_id")?,
        artist_name: row.try_get("artist_name")?,
        artist_image_link: row.try_get("artist_image_link")?,
        start_time: row.try_get("start_time")?,
    })
}

/// All show rows (foreign keys only)
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<Show>> {
    let rows = sqlx::query("SELECT id, artist_id, venue_id, start_time FROM shows")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            Ok(Show {
                id: row.try_get("id")?,
                artist_id: row.try_get("artist_id")?,
                venue_id: row.try_get("venue_id")?,
                start_time: row.try_get("start_time")?,
            })
        })
        .collect()
}

/// Every show with venue/artist display fields, ordered by start time
pub async fn list_show_details(pool: &SqlitePool) -> Result<Vec<ShowDetail>> {
    let rows = sqlx::query(&format!("{} ORDER BY s.start_time, s.id", DETAIL_SELECT))
        .fetch_all(pool)
        .await?;

    rows.iter().map(detail_from_row).collect()
}

/// Shows at one venue
pub async fn shows_for_venue(pool: &SqlitePool, venue_id: i64) -> Result<Vec<ShowDetail>> {
    let rows = sqlx::query(&format!(
        "{} WHERE s.venue_id = ? ORDER BY s.start_time, s.id",
        DETAIL_SELECT
    ))
    .bind(venue_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(detail_from_row).collect()
}

/// Shows played by one artist
pub async fn shows_for_artist(pool: &SqlitePool, artist_id: i64) -> Result<Vec<ShowDetail>> {
    let rows = sqlx::query(&format!(
        "{} WHERE s.artist_id = ? ORDER BY s.start_time, s.id",
        DETAIL_SELECT
    ))
    .bind(artist_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(detail_from_row).collect()
}

/// Number of show rows
pub async fn count_shows(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM shows")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a show, returning the new id
pub async fn insert_show(
    conn: &mut SqliteConnection,
    artist_id: i64,
    venue_id: i64,
    start_time: DateTime<Utc>,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?, ?, ?)")
        .bind(artist_id)
        .bind(venue_id)
        .bind(start_time)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Shows still referencing a venue
pub async fn count_for_venue(conn: &mut SqliteConnection, venue_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE venue_id = ?")
        .bind(venue_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Shows still referencing an artist
pub async fn count_for_artist(conn: &mut SqliteConnection, artist_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE artist_id = ?")
        .bind(artist_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

pub async fn delete_for_venue(conn: &mut SqliteConnection, venue_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM shows WHERE venue_id = ?")
        .bind(venue_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_for_artist(conn: &mut SqliteConnection, artist_id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM shows WHERE artist_id = ?")
        .bind(artist_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
