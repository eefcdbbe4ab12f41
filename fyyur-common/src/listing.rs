//! Listing aggregation
//!
//! Groups venues by area and splits shows into past and upcoming. A show is upcoming iff
//! its start time is strictly later than `now`; the split is always computed on read.
//! The pure functions take `now` explicitly; the `load_*` helpers fetch from storage and
//! apply them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashMap};

use crate::db::models::{Artist, Scheduled, Show, ShowDetail, Venue};
use crate::db::{artists, shows, venues};
use crate::Result;

/// Venue entry inside an area group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// All venues sharing one (city, state) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Past and upcoming shows of one venue or artist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowPartition<T> {
    /// Most recent first
    pub past: Vec<T>,
    /// Soonest first
    pub upcoming: Vec<T>,
}

impl<T> ShowPartition<T> {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }

    pub fn total(&self) -> usize {
        self.past.len() + self.upcoming.len()
    }
}

/// Show row on the global shows page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowListing {
    pub show: ShowDetail,
    pub upcoming: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDetail {
    pub venue: Venue,
    pub shows: ShowPartition<ShowDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub shows: ShowPartition<ShowDetail>,
}

pub fn is_upcoming(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start_time > now
}

/// Upcoming show count per venue id
pub fn upcoming_counts_by_venue(shows: &[Show], now: DateTime<Utc>) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| is_upcoming(s.start_time, now)) {
        *counts.entry(show.venue_id).or_insert(0) += 1;
    }
    counts
}

/// Upcoming show count per artist id
pub fn upcoming_counts_by_artist(shows: &[Show], now: DateTime<Utc>) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for show in shows.iter().filter(|s| is_upcoming(s.start_time, now)) {
        *counts.entry(show.artist_id).or_insert(0) += 1;
    }
    counts
}

/// Case-insensitive name ordering shared by listings and search results
pub(crate) fn name_order(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Group venues by exact (city, state)
///
/// Groups are keyed explicitly, so the result does not depend on the order rows come
/// back from storage. Groups are ordered by state then city; venues within a group by
/// name then id.
pub fn group_venues_by_area(venues: &[Venue], shows: &[Show], now: DateTime<Utc>) -> Vec<AreaGroup> {
    let upcoming = upcoming_counts_by_venue(shows, now);
    let mut areas: BTreeMap<(&str, &str), Vec<VenueSummary>> = BTreeMap::new();

    for venue in venues {
        areas
            .entry((venue.state.as_str(), venue.city.as_str()))
            .or_default()
            .push(VenueSummary {
                id: venue.id,
                name: venue.name.clone(),
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
            });
    }

    areas
        .into_iter()
        .map(|((state, city), mut venues)| {
            venues.sort_by(|a, b| name_order(&a.name, &b.name).then(a.id.cmp(&b.id)));
            AreaGroup {
                city: city.to_string(),
                state: state.to_string(),
                venues,
            }
        })
        .collect()
}

/// Artists ordered by name ignoring case, with their upcoming show counts
pub fn summarize_artists(artists: &[Artist], shows: &[Show], now: DateTime<Utc>) -> Vec<ArtistSummary> {
    let upcoming = upcoming_counts_by_artist(shows, now);
    let mut summaries: Vec<ArtistSummary> = artists
        .iter()
        .map(|artist| ArtistSummary {
            id: artist.id,
            name: artist.name.clone(),
            num_upcoming_shows: upcoming.get(&artist.id).copied().unwrap_or(0),
        })
        .collect();
    summaries.sort_by(|a, b| name_order(&a.name, &b.name).then(a.id.cmp(&b.id)));
    summaries
}

/// Split shows into past and upcoming relative to `now`
pub fn partition_shows<T: Scheduled>(shows: Vec<T>, now: DateTime<Utc>) -> ShowPartition<T> {
    let (mut upcoming, mut past): (Vec<T>, Vec<T>) = shows
        .into_iter()
        .partition(|show| is_upcoming(show.start_time(), now));

    upcoming.sort_by_key(|show| show.start_time());
    past.sort_by_key(|show| std::cmp::Reverse(show.start_time()));

    ShowPartition { past, upcoming }
}

/// Tag every show as upcoming or past, keeping the given order
pub fn tag_shows(shows: Vec<ShowDetail>, now: DateTime<Utc>) -> Vec<ShowListing> {
    shows
        .into_iter()
        .map(|show| {
            let upcoming = is_upcoming(show.start_time, now);
            ShowListing { show, upcoming }
        })
        .collect()
}

/// `/venues` data: every venue grouped by area
pub async fn load_venue_areas(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<AreaGroup>> {
    let venues = venues::list_venues(pool).await?;
    let shows = shows::list_shows(pool).await?;
    Ok(group_venues_by_area(&venues, &shows, now))
}

/// `/artists` data: every artist by name
pub async fn load_artist_summaries(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<ArtistSummary>> {
    let artists = artists::list_artists(pool).await?;
    let shows = shows::list_shows(pool).await?;
    Ok(summarize_artists(&artists, &shows, now))
}

/// `/shows` data: every show with display names, by start time
pub async fn load_show_listing(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<ShowListing>> {
    let shows = shows::list_show_details(pool).await?;
    Ok(tag_shows(shows, now))
}

/// Venue with its past and upcoming shows, `None` when the id is unknown
pub async fn load_venue_detail(
    pool: &SqlitePool,
    venue_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<VenueDetail>> {
    let Some(venue) = venues::get_venue(pool, venue_id).await? else {
        return Ok(None);
    };
    let shows = shows::shows_for_venue(pool, venue_id).await?;

    Ok(Some(VenueDetail {
        venue,
        shows: partition_shows(shows, now),
    }))
}

/// Artist with its past and upcoming shows, `None` when the id is unknown
pub async fn load_artist_detail(
    pool: &SqlitePool,
    artist_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<ArtistDetail>> {
    let Some(artist) = artists::get_artist(pool, artist_id).await? else {
        return Ok(None);
    };
    let shows = shows::shows_for_artist(pool, artist_id).await?;

    Ok(Some(ArtistDetail {
        artist,
        shows: partition_shows(shows, now),
    }))
}
