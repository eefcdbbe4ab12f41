//! Name search for venues and artists
//!
//! Matching is a case-insensitive substring test at any position. Lowercasing happens
//! here rather than in SQL because SQLite's `lower()`/`LIKE` only fold ASCII.
//! An empty (or all-whitespace) term matches every record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{artists, shows, venues};
use crate::listing::{self, ArtistSummary, VenueSummary};
use crate::Result;

/// Search outcome: `count` always equals `data.len()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Compiled search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    folded: String,
}

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self {
            folded: raw.trim().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.is_empty() || name.to_lowercase().contains(&self.folded)
    }
}

/// Venues whose name contains `raw_term`, ordered by name ignoring case
pub async fn search_venues(
    pool: &SqlitePool,
    raw_term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<VenueSummary>> {
    let term = SearchTerm::new(raw_term);
    let all_shows = shows::list_shows(pool).await?;
    let upcoming = listing::upcoming_counts_by_venue(&all_shows, now);

    let mut data: Vec<VenueSummary> = venues::list_venues(pool)
        .await?
        .into_iter()
        .filter(|venue| term.matches(&venue.name))
        .map(|venue| VenueSummary {
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
            id: venue.id,
            name: venue.name,
        })
        .collect();
    data.sort_by(|a, b| listing::name_order(&a.name, &b.name).then(a.id.cmp(&b.id)));

    Ok(SearchResults::new(data))
}

/// Artists whose name contains `raw_term`, ordered by name
pub async fn search_artists(
    pool: &SqlitePool,
    raw_term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<ArtistSummary>> {
    let term = SearchTerm::new(raw_term);
    let all_shows = shows::list_shows(pool).await?;

    let matching: Vec<_> = artists::list_artists(pool)
        .await?
        .into_iter()
        .filter(|artist| term.matches(&artist.name))
        .collect();

    Ok(SearchResults::new(listing::summarize_artists(&matching, &all_shows, now)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::artists::insert_artist;
    use crate::db::test_support::{sample_artist_fields, sample_venue_fields, test_pool};
    use crate::db::venues::insert_venue;

    #[test]
    fn test_term_matches_any_position_ignoring_case() {
        let hop = SearchTerm::new("Hop");
        assert!(hop.matches("The Musical Hop"));
        assert!(SearchTerm::new("hop").matches("The Musical Hop"));
        assert!(SearchTerm::new("MUSICAL").matches("The Musical Hop"));
        assert!(SearchTerm::new("  usic ").matches("The Musical Hop"));
        assert!(!SearchTerm::new("band").matches("The Musical Hop"));
    }

    #[test]
    fn test_term_folds_non_ascii() {
        assert!(SearchTerm::new("ÉCLAIR").matches("Café Éclair"));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(SearchTerm::new("").is_empty());
        assert!(SearchTerm::new("   ").matches("anything"));
    }

    async fn seeded_pool() -> (tempfile::TempDir, SqlitePool) {
        let (dir, pool) = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        for (name, city, state) in [
            ("The Musical Hop", "San Francisco", "CA"),
            ("The Dueling Pianos Bar", "New York", "NY"),
            ("Park Square Live Music & Coffee", "San Francisco", "CA"),
        ] {
            insert_venue(&mut conn, &sample_venue_fields(name, city, state)).await.unwrap();
        }
        for name in ["Guns N Petals", "Matt Quevedo", "The Wild Sax Band"] {
            insert_artist(&mut conn, &sample_artist_fields(name)).await.unwrap();
        }
        drop(conn);
        (dir, pool)
    }

    #[tokio::test]
    async fn test_search_venues_hop_case_insensitive() {
        let (_dir, pool) = seeded_pool().await;

        for term in ["Hop", "hop"] {
            let results = search_venues(&pool, term, Utc::now()).await.unwrap();
            assert_eq!(results.count, 1);
            assert_eq!(results.data[0].name, "The Musical Hop");
        }
    }

    #[tokio::test]
    async fn test_search_venues_music_finds_both() {
        let (_dir, pool) = seeded_pool().await;

        let results = search_venues(&pool, "Music", Utc::now()).await.unwrap();
        let names: Vec<&str> = results.data.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(results.count, 2);
        assert_eq!(names, vec!["Park Square Live Music & Coffee", "The Musical Hop"]);
    }

    #[tokio::test]
    async fn test_search_artists() {
        let (_dir, pool) = seeded_pool().await;

        let a = search_artists(&pool, "A", Utc::now()).await.unwrap();
        assert_eq!(a.count, 3);

        let band = search_artists(&pool, "band", Utc::now()).await.unwrap();
        assert_eq!(band.count, 1);
        assert_eq!(band.data[0].name, "The Wild Sax Band");
    }

    #[tokio::test]
    async fn test_empty_search_returns_all_venues() {
        let (_dir, pool) = seeded_pool().await;
        let results = search_venues(&pool, "", Utc::now()).await.unwrap();
        assert_eq!(results.count, 3);
    }

    #[tokio::test]
    async fn test_venue_results_sorted_ignoring_case() {
        let (_dir, pool) = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        for name in ["Zebra Hall", "apple Hall", "Mango Hall"] {
            insert_venue(&mut conn, &sample_venue_fields(name, "Austin", "TX")).await.unwrap();
        }
        drop(conn);

        let results = search_venues(&pool, "hall", Utc::now()).await.unwrap();
        let names: Vec<&str> = results.data.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["apple Hall", "Mango Hall", "Zebra Hall"]);
    }
}
