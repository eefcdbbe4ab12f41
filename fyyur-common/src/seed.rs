//! Sample data for a fresh database
//!
//! Inserted through the lifecycle operations only when no venues or artists exist yet.

use chrono::{TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::models::{ArtistFields, RecordRef, ShowFields, VenueFields};
use crate::db::{artists, venues};
use crate::lifecycle;
use crate::Result;

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn sample_venues() -> Vec<VenueFields> {
    vec![
        VenueFields {
            name: "The Musical Hop".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            image_link: Some("https://images.unsplash.com/photo-1543900694-133f37abaaa5".to_string()),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
            website: Some("https://www.themusicalhop.com".to_string()),
            genres: owned(&["Jazz", "Reggae", "Classical", "Folk"]),
            seeking_talent: true,
            seeking_description: Some(
                "We are on the lookout for a local artist to play every two weeks. Please call us."
                    .to_string(),
            ),
        },
        VenueFields {
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: Some("914-003-1132".to_string()),
            image_link: Some("https://images.unsplash.com/photo-1497032205916-ac775f0649ae".to_string()),
            facebook_link: Some("https://www.facebook.com/theduelingpianos".to_string()),
            website: Some("https://www.theduelingpianos.com".to_string()),
            genres: owned(&["Classical", "R&B", "Hip-Hop"]),
            seeking_talent: false,
            seeking_description: None,
        },
        VenueFields {
            name: "Park Square Live Music & Coffee".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            address: "34 Whiskey Moore Ave".to_string(),
            phone: Some("415-000-1234".to_string()),
            image_link: Some("https://images.unsplash.com/photo-1485686531765-ba63b07845a7".to_string()),
            facebook_link: Some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee".to_string()),
            website: Some("https://www.parksquarelivemusicandcoffee.com".to_string()),
            genres: owned(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            seeking_talent: false,
            seeking_description: None,
        },
    ]
}

fn sample_artists() -> Vec<ArtistFields> {
    vec![
        ArtistFields {
            name: "Guns N Petals".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("326-123-5000".to_string()),
            image_link: Some("https://images.unsplash.com/photo-1549213783-8284d0336c4f".to_string()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".to_string()),
            website: Some("https://www.gunsnpetalsband.com".to_string()),
            genres: owned(&["Rock n Roll"]),
            seeking_venue: true,
            seeking_description: Some(
                "Looking for shows to perform at in the San Francisco Bay Area!".to_string(),
            ),
        },
        ArtistFields {
            name: "Matt Quevedo".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            phone: Some("300-400-5000".to_string()),
            image_link: Some("https://images.unsplash.com/photo-1495223153807-b916f75de8c5".to_string()),
            facebook_link: Some("https://www.facebook.com/mattquevedo923251523".to_string()),
            website: None,
            genres: owned(&["Jazz"]),
            seeking_venue: false,
            seeking_description: None,
        },
        ArtistFields {
            name: "The Wild Sax Band".to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("432-325-5432".to_string()),
            image_link: Some("https://images.unsplash.com/photo-1558369981-f9ca78462e61".to_string()),
            facebook_link: None,
            website: None,
            genres: owned(&["Jazz", "Classical"]),
            seeking_venue: false,
            seeking_description: None,
        },
    ]
}

/// (venue name, artist name, start) triples
fn sample_shows() -> Vec<(&'static str, &'static str, (i32, u32, u32, u32, u32))> {
    vec![
        ("The Musical Hop", "Guns N Petals", (2019, 5, 21, 21, 30)),
        ("Park Square Live Music & Coffee", "Matt Quevedo", (2019, 6, 15, 23, 0)),
        ("Park Square Live Music & Coffee", "The Wild Sax Band", (2035, 4, 1, 20, 0)),
        ("Park Square Live Music & Coffee", "The Wild Sax Band", (2035, 4, 8, 20, 0)),
        ("Park Square Live Music & Coffee", "The Wild Sax Band", (2035, 4, 15, 20, 0)),
    ]
}

/// Insert the sample records when the database has no venues and no artists
///
/// Returns true when data was inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<bool> {
    if venues::count_venues(pool).await? > 0 || artists::count_artists(pool).await? > 0 {
        return Ok(false);
    }

    for venue in sample_venues() {
        lifecycle::create_venue(pool, &venue).await.map_err(|e| e.source)?;
    }
    for artist in sample_artists() {
        lifecycle::create_artist(pool, &artist).await.map_err(|e| e.source)?;
    }
    for (venue, artist, (y, mo, d, h, mi)) in sample_shows() {
        let start_time = Utc
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .ok_or_else(|| crate::Error::Internal(format!("Invalid sample date {}-{}-{}", y, mo, d)))?;
        let fields = ShowFields {
            artist: RecordRef::Name(artist.to_string()),
            venue: RecordRef::Name(venue.to_string()),
            start_time,
            artist_image_link: None,
        };
        lifecycle::create_show(pool, &fields).await.map_err(|e| e.source)?;
    }

    info!("Seeded sample venues, artists and shows");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::shows;
    use crate::db::test_support::test_pool;
    use crate::listing;

    #[tokio::test]
    async fn test_seed_populates_empty_database_once() {
        let (_dir, pool) = test_pool().await;

        assert!(seed_if_empty(&pool).await.unwrap());
        assert!(!seed_if_empty(&pool).await.unwrap());

        assert_eq!(venues::count_venues(&pool).await.unwrap(), 3);
        assert_eq!(artists::count_artists(&pool).await.unwrap(), 3);
        assert_eq!(shows::count_shows(&pool).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_seeded_areas() {
        let (_dir, pool) = test_pool().await;
        seed_if_empty(&pool).await.unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();

        let areas = listing::load_venue_areas(&pool, now).await.unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "San Francisco");
        assert_eq!(areas[0].venues.len(), 2);
        let park = areas[0]
            .venues
            .iter()
            .find(|v| v.name.starts_with("Park Square"))
            .unwrap();
        assert_eq!(park.num_upcoming_shows, 3);
    }
}
