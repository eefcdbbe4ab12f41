//! Artist database operations

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqliteExecutor, SqlitePool};

use super::models::{Artist, ArtistFields};
use crate::Result;

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, website, \
                              genres, seeking_venue, seeking_description";

fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    let genres: String = row.try_get("genres")?;

    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        phone: row.try_get("phone")?,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
        website: row.try_get("website")?,
        genres: serde_json::from_str(&genres)?,
        seeking_venue: row.try_get("seeking_venue")?,
        seeking_description: row.try_get("seeking_description")?,
    })
}

/// All artists ordered by name
pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<Artist>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM artists ORDER BY name COLLATE NOCASE, id",
        ARTIST_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(artist_from_row).collect()
}

/// Load artist by id
pub async fn get_artist<'e, E>(executor: E, id: i64) -> Result<Option<Artist>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query(&format!("SELECT {} FROM artists WHERE id = ?", ARTIST_COLUMNS))
        .bind(id)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(artist_from_row).transpose()
}

/// Resolve an artist id from its exact name (case-insensitive); lowest id wins on duplicates
pub async fn find_artist_id_by_name<'e, E>(executor: E, name: &str) -> Result<Option<i64>>
where
    E: SqliteExecutor<'e>,
{
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM artists WHERE lower(name) = lower(?) ORDER BY id LIMIT 1",
    )
    .bind(name.trim())
    .fetch_optional(executor)
    .await?;

    Ok(id)
}

/// Number of artist rows
pub async fn count_artists(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM artists")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert an artist, returning the new id
pub async fn insert_artist(conn: &mut SqliteConnection, fields: &ArtistFields) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO artists (
            name, city, state, phone, image_link, facebook_link, website,
            genres, seeking_venue, seeking_description
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(serde_json::to_string(&fields.genres)?)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrite the mutable columns of an artist; false when no row has that id
pub async fn update_artist(
    conn: &mut SqliteConnection,
    id: i64,
    fields: &ArtistFields,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE artists SET
            name = ?, city = ?, state = ?, phone = ?, image_link = ?, facebook_link = ?,
            website = ?, genres = ?, seeking_venue = ?, seeking_description = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.city)
    .bind(&fields.state)
    .bind(&fields.phone)
    .bind(&fields.image_link)
    .bind(&fields.facebook_link)
    .bind(&fields.website)
    .bind(serde_json::to_string(&fields.genres)?)
    .bind(fields.seeking_venue)
    .bind(&fields.seeking_description)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Set the artist image only when none is stored yet
pub async fn fill_missing_image(
    conn: &mut SqliteConnection,
    id: i64,
    image_link: &str,
) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE artists SET image_link = ?, updated_at = CURRENT_TIMESTAMP
         WHERE id = ? AND (image_link IS NULL OR image_link = '')",
    )
    .bind(image_link)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an artist row, returning the number of rows removed (0 or 1)
pub async fn delete_artist(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
