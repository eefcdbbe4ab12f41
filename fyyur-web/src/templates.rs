//! Askama page templates
//!
//! Every page extends `layouts/main.html`, which renders `flashes` above the content.

use askama::Template;
use fyyur_common::listing::{AreaGroup, ArtistSummary, VenueSummary};

use crate::views::{ArtistPage, ProfileFormView, ShowFormView, ShowView, VenuePage};

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub flashes: Vec<String>,
    pub areas: Vec<AreaGroup>,
}

#[derive(Template)]
#[template(path = "pages/search_venues.html")]
pub struct SearchVenuesTemplate {
    pub flashes: Vec<String>,
    pub search_term: String,
    pub count: usize,
    pub venues: Vec<VenueSummary>,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct ShowVenueTemplate {
    pub flashes: Vec<String>,
    pub venue: VenuePage,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub flashes: Vec<String>,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "pages/search_artists.html")]
pub struct SearchArtistsTemplate {
    pub flashes: Vec<String>,
    pub search_term: String,
    pub count: usize,
    pub artists: Vec<ArtistSummary>,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ShowArtistTemplate {
    pub flashes: Vec<String>,
    pub artist: ArtistPage,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub flashes: Vec<String>,
    pub shows: Vec<ShowView>,
}

/// New and edit forms for venues and artists
#[derive(Template)]
#[template(path = "forms/profile.html")]
pub struct ProfileFormTemplate {
    pub flashes: Vec<String>,
    pub heading: String,
    pub action: String,
    pub submit_label: String,
    pub form: ProfileFormView,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct ShowFormTemplate {
    pub flashes: Vec<String>,
    pub form: ShowFormView,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub flashes: Vec<String>,
}
