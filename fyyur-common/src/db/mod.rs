//! Database schema, models and queries

pub mod artists;
pub mod init;
pub mod models;
pub mod shows;
pub mod venues;

pub use init::*;
pub use models::*;

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for the in-crate database tests

    use super::models::{ArtistFields, VenueFields};
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    /// Fresh database in a temp directory; keep the `TempDir` alive for the test
    pub async fn test_pool() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().expect("temp dir");
        let pool = super::init_database(&dir.path().join("test_fyyur.db"))
            .await
            .expect("database init");
        (dir, pool)
    }

    pub fn sample_venue_fields(name: &str, city: &str, state: &str) -> VenueFields {
        VenueFields {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1015 Folsom Street".to_string(),
            phone: Some("123-123-1234".to_string()),
            image_link: Some(format!("https://images.example/{}.jpg", name.len())),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".to_string()),
            website: Some("https://www.themusicalhop.com".to_string()),
            genres: vec!["Jazz".to_string(), "Reggae".to_string()],
            seeking_talent: true,
            seeking_description: Some("We are on the lookout for a local artist".to_string()),
        }
    }

    pub fn sample_artist_fields(name: &str) -> ArtistFields {
        ArtistFields {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: Some("326-123-5000".to_string()),
            image_link: Some(format!("https://images.example/artist-{}.jpg", name.len())),
            facebook_link: None,
            website: None,
            genres: vec!["Rock n Roll".to_string()],
            seeking_venue: true,
            seeking_description: Some("Looking for shows to perform at".to_string()),
        }
    }
}
