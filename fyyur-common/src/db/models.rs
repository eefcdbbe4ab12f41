//! Database models
//!
//! `Venue`, `Artist` and `Show` mirror the stored rows. The `*Fields` types are the
//! validated, per-entity field sets accepted by the lifecycle operations; they carry no
//! identity so a create and an update share one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Mutable venue columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Mutable artist columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistFields {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// Stored show row (foreign keys only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Show joined with the display fields of its venue and artist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetail {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// How a show submission identifies its venue or artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordRef {
    Id(i64),
    /// Exact name, compared case-insensitively
    Name(String),
}

/// Validated show submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowFields {
    pub artist: RecordRef,
    pub venue: RecordRef,
    pub start_time: DateTime<Utc>,
    /// Fills the artist's image when the artist has none yet
    pub artist_image_link: Option<String>,
}

/// Something with a start time, so venue and artist show lists share one partition rule
pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

impl Scheduled for Show {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Scheduled for ShowDetail {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}
