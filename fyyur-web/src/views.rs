//! Presentation adapter
//!
//! Maps records and listings to the flat field names the templates use. Optional
//! columns become empty strings and start times are formatted here, so templates only
//! test strings, bools and counts.

use fyyur_common::db::{Artist, ShowDetail, Venue};
use fyyur_common::listing::{ArtistDetail, ShowListing, ShowPartition, VenueDetail};
use fyyur_common::time::{format_datetime, DateFormat};

use crate::forms::{ArtistForm, ShowForm, VenueForm, GENRES, STATES};

/// One show row, carrying both sides so venue, artist and show pages share it
#[derive(Debug, Clone, PartialEq)]
pub struct ShowView {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
    pub upcoming: bool,
}

impl ShowView {
    fn new(show: &ShowDetail, format: DateFormat, upcoming: bool) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: show.venue_name.clone(),
            venue_image_link: show.venue_image_link.clone().unwrap_or_default(),
            artist_id: show.artist_id,
            artist_name: show.artist_name.clone(),
            artist_image_link: show.artist_image_link.clone().unwrap_or_default(),
            start_time: format_datetime(&show.start_time, format),
            upcoming,
        }
    }
}

/// Rows for the `/shows` page
pub fn show_rows(listing: &[ShowListing]) -> Vec<ShowView> {
    listing
        .iter()
        .map(|entry| ShowView::new(&entry.show, DateFormat::Medium, entry.upcoming))
        .collect()
}

struct SplitShows {
    past_shows: Vec<ShowView>,
    upcoming_shows: Vec<ShowView>,
}

fn split(shows: &ShowPartition<ShowDetail>) -> SplitShows {
    SplitShows {
        past_shows: shows
            .past
            .iter()
            .map(|s| ShowView::new(s, DateFormat::Full, false))
            .collect(),
        upcoming_shows: shows
            .upcoming
            .iter()
            .map(|s| ShowView::new(s, DateFormat::Full, true))
            .collect(),
    }
}

/// Venue detail page
#[derive(Debug, Clone, PartialEq)]
pub struct VenuePage {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub past_shows: Vec<ShowView>,
    pub upcoming_shows: Vec<ShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenuePage {
    pub fn new(detail: &VenueDetail) -> Self {
        let venue: &Venue = &detail.venue;
        let shows = split(&detail.shows);
        Self {
            id: venue.id,
            name: venue.name.clone(),
            genres: venue.genres.clone(),
            address: venue.address.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            past_shows_count: detail.shows.past_count(),
            upcoming_shows_count: detail.shows.upcoming_count(),
            past_shows: shows.past_shows,
            upcoming_shows: shows.upcoming_shows,
        }
    }
}

/// Artist detail page
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistPage {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub image_link: String,
    pub past_shows: Vec<ShowView>,
    pub upcoming_shows: Vec<ShowView>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistPage {
    pub fn new(detail: &ArtistDetail) -> Self {
        let artist: &Artist = &detail.artist;
        let shows = split(&detail.shows);
        Self {
            id: artist.id,
            name: artist.name.clone(),
            genres: artist.genres.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            website: artist.website.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            past_shows_count: detail.shows.past_count(),
            upcoming_shows_count: detail.shows.upcoming_count(),
            past_shows: shows.past_shows,
            upcoming_shows: shows.upcoming_shows,
        }
    }
}

/// `<option>` or checkbox entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub selected: bool,
}

fn choices(all: &[&str], selected: &[String]) -> Vec<Choice> {
    all.iter()
        .map(|value| Choice {
            value: value.to_string(),
            selected: selected.iter().any(|s| s == value),
        })
        .collect()
}

/// Venue or artist form as rendered; `seeking` and `show_address` cover both entities
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFormView {
    pub name: String,
    pub city: String,
    pub state_options: Vec<Choice>,
    pub show_address: bool,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genre_options: Vec<Choice>,
    pub seeking_field: String,
    pub seeking_label: String,
    pub seeking: bool,
    pub seeking_description: String,
}

impl ProfileFormView {
    pub fn venue(form: &VenueForm) -> Self {
        Self {
            name: form.name.clone(),
            city: form.city.clone(),
            state_options: choices(STATES, std::slice::from_ref(&form.state)),
            show_address: true,
            address: form.address.clone(),
            phone: form.phone.clone(),
            image_link: form.image_link.clone(),
            facebook_link: form.facebook_link.clone(),
            website: form.website.clone(),
            genre_options: choices(GENRES, &form.genres),
            seeking_field: "seeking_talent".to_string(),
            seeking_label: "Looking for talent".to_string(),
            seeking: form.seeking_talent,
            seeking_description: form.seeking_description.clone(),
        }
    }

    pub fn artist(form: &ArtistForm) -> Self {
        Self {
            name: form.name.clone(),
            city: form.city.clone(),
            state_options: choices(STATES, std::slice::from_ref(&form.state)),
            show_address: false,
            address: String::new(),
            phone: form.phone.clone(),
            image_link: form.image_link.clone(),
            facebook_link: form.facebook_link.clone(),
            website: form.website.clone(),
            genre_options: choices(GENRES, &form.genres),
            seeking_field: "seeking_venue".to_string(),
            seeking_label: "Looking for venues".to_string(),
            seeking: form.seeking_venue,
            seeking_description: form.seeking_description.clone(),
        }
    }
}

/// Show form as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowFormView {
    pub artist_name: String,
    pub artist_id: String,
    pub venue_name: String,
    pub venue_id: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl ShowFormView {
    pub fn new(form: &ShowForm) -> Self {
        Self {
            artist_name: form.artist_name.clone(),
            artist_id: form.artist_id.clone(),
            venue_name: form.venue_name.clone(),
            venue_id: form.venue_id.clone(),
            artist_image_link: form.artist_image_link.clone(),
            start_time: form.start_time.clone(),
        }
    }

    /// Blank form with the start time defaulted to now
    pub fn blank() -> Self {
        Self::new(&ShowForm {
            start_time: fyyur_common::time::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ..ShowForm::default()
        })
    }
}
