//! Venue database operations
//!
//! Reads take the pool; writes take a connection so the lifecycle manager can run them
//! inside its own transaction.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqliteExecutor, SqlitePool};

use super::models::{Venue, VenueFields};
use crate::Result;

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link, \
                             website, genres, seeking_talent, seeking_description";

fn venue_from_row(row: &SqliteRow) -> Result<Venue> {
    let genres: String = row.try_get("genres")?;

    Ok(Venue {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
        website: row.try_get("website")?,
        genres: serde_json::from_str(&genres)?,
        seeking_talent: row.try_get("seeking_talent")?,
        seeking_description: row.try_get("seeking_description")?,
    })
}

/// All venues, in storage order
pub async fn list_venues(pool: &SqlitePool) -> Result<Vec<Venue>> {
    let rows = sqlx::query(&format!("SELECT {} FROM venues", VENUE_COLUMNS))
        .fetch_all(pool)
        .await?;

    rows.iter().map(venue_from_row).collect()
}

/// Load venue by id
pub async fn get_venue<'e, E>(executor: E, id: i64) -> Result<Option<Venue>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!("SELECT {} FROM venues WHERE id = ?", VENUE_COLUMNS))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(venue_from_row).transpose()
}

/// Resolve a venue id from its exact name (case-insensitive); lowest id wins on duplicates
pub async fn find_venue_id_by_name<'e, E>(executor: E, name: &str) -> Result<Option<i64>>
where
    E: SqliteExecutor<'e>,
{
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM venues WHERE lower(name) = lower(?) ORDER BY id LIMIT 1",
    )
    .bind(name.trim())
    .fetch_optional(executor)
    .await?;

    Ok(id)
}

/// Number of venue rows
pub async fn count_venues(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM venues")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a venue, returning the new id
pub async fn insert_venue(conn: &mut SqliteConnection, fields: &VenueFields) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO venues (
            name, city, state, address, phone, image_link, facebook_link, website,
            genres, seeking_talent, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(serde_json::to_string(&fields.genres)?)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite the mutable columns of a venue; false when no row has that id
pub async fn update_venue(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &VenueFields,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE venues SET
            name = ?, city = ?, state = ?, address = ?, phone = ?, image_link = ?,
            facebook_link = ?, website = ?, genres = ?, seeking_talent = ?,
            seeking_description = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.address)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(serde_json::to_string(&fields.genres)?)
    .bind(fields.seeking_talent)
    .bind(&fields.seeking_description)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a venue row, returning the number of rows removed (0 or 1)
pub async fn delete_venue(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
