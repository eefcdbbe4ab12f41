//! Form parsing and validation
//!
//! Each entity has its own form type holding the raw submitted strings, so a rejected
//! submission can be re-rendered exactly as typed. `validate` produces the typed field
//! set accepted by the lifecycle operations, or the list of problems to flash.

use fyyur_common::db::{Artist, ArtistFields, RecordRef, ShowFields, Venue, VenueFields};
use fyyur_common::time::parse_start_time;

/// Genres offered on the venue and artist forms
pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// US state codes offered on the venue and artist forms
pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Validation problems, one user-facing message each
pub type FormErrors = Vec<String>;

/// Submitted `application/x-www-form-urlencoded` pairs
///
/// Kept as pairs rather than a map because `genres` repeats.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// First value for `key`, trimmed; empty string when absent
    pub fn text(&self, key: &str) -> String {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Every non-empty value for `key`, in submission order
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    /// Checkbox state; an unchecked box is simply not submitted
    pub fn checkbox(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, v)| k == key && is_truthy(v))
    }
}

/// Checkbox and query-flag values that mean "on"
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "on" | "true" | "1")
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn require(errors: &mut FormErrors, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{} is required.", label));
    }
}

fn check_state(errors: &mut FormErrors, state: &str) {
    if !state.is_empty() && !STATES.contains(&state) {
        errors.push(format!("'{}' is not a valid state.", state));
    }
}

fn check_genres(errors: &mut FormErrors, genres: &[String]) {
    if genres.is_empty() {
        errors.push("Pick at least one genre.".to_string());
    }
    for genre in genres {
        if !GENRES.contains(&genre.as_str()) {
            errors.push(format!("'{}' is not a valid genre.", genre));
        }
    }
}

fn check_phone(errors: &mut FormErrors, phone: &str) {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '-' | ' ' | '(' | ')' | '+' | '.');
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !phone.is_empty() && (!phone.chars().all(allowed) || digits < 7) {
        errors.push(format!("'{}' is not a valid phone number.", phone));
    }
}

fn check_url(errors: &mut FormErrors, label: &str, value: &str) {
    if !value.is_empty() && !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(format!("{} must be an http(s) URL.", label));
    }
}

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Venue create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            address: fields.text("address"),
            phone: fields.text("phone"),
            image_link: fields.text("image_link"),
            facebook_link: fields.text("facebook_link"),
            website: fields.text("website"),
            genres: fields.all("genres"),
            seeking_talent: fields.checkbox("seeking_talent"),
            seeking_description: fields.text("seeking_description"),
        }
    }

    /// Pre-populated edit form
    pub fn from_venue(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: or_empty(&venue.phone),
            image_link: or_empty(&venue.image_link),
            facebook_link: or_empty(&venue.facebook_link),
            website: or_empty(&venue.website),
            genres: venue.genres.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: or_empty(&venue.seeking_description),
        }
    }

    pub fn validate(&self) -> Result<VenueFields, FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, "Name", &self.name);
        require(&mut errors, "City", &self.city);
        require(&mut errors, "State", &self.state);
        require(&mut errors, "Address", &self.address);
        check_state(&mut errors, &self.state);
        check_phone(&mut errors, &self.phone);
        check_genres(&mut errors, &self.genres);
        check_url(&mut errors, "Image link", &self.image_link);
        check_url(&mut errors, "Facebook link", &self.facebook_link);
        check_url(&mut errors, "Website", &self.website);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(VenueFields {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website: optional(&self.website),
            genres: self.genres.clone(),
            seeking_talent: self.seeking_talent,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

/// Artist create/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

impl ArtistForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            phone: fields.text("phone"),
            image_link: fields.text("image_link"),
            facebook_link: fields.text("facebook_link"),
            website: fields.text("website"),
            genres: fields.all("genres"),
            seeking_venue: fields.checkbox("seeking_venue"),
            seeking_description: fields.text("seeking_description"),
        }
    }

    /// Pre-populated edit form
    pub fn from_artist(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: or_empty(&artist.phone),
            image_link: or_empty(&artist.image_link),
            facebook_link: or_empty(&artist.facebook_link),
            website: or_empty(&artist.website),
            genres: artist.genres.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: or_empty(&artist.seeking_description),
        }
    }

    pub fn validate(&self) -> Result<ArtistFields, FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, "Name", &self.name);
        require(&mut errors, "City", &self.city);
        require(&mut errors, "State", &self.state);
        check_state(&mut errors, &self.state);
        check_phone(&mut errors, &self.phone);
        check_genres(&mut errors, &self.genres);
        check_url(&mut errors, "Image link", &self.image_link);
        check_url(&mut errors, "Facebook link", &self.facebook_link);
        check_url(&mut errors, "Website", &self.website);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ArtistFields {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website: optional(&self.website),
            genres: self.genres.clone(),
            seeking_venue: self.seeking_venue,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

/// Show create form
///
/// The venue and artist may be given by id or by name; an id wins when both are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowForm {
    pub artist_id: String,
    pub artist_name: String,
    pub venue_id: String,
    pub venue_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl ShowForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            artist_id: fields.text("artist_id"),
            artist_name: fields.text("artist_name"),
            venue_id: fields.text("venue_id"),
            venue_name: fields.text("venue_name"),
            artist_image_link: fields.text("artist_image_link"),
            start_time: fields.text("start_time"),
        }
    }

    fn reference(errors: &mut FormErrors, label: &str, id: &str, name: &str) -> Option<RecordRef> {
        if !id.is_empty() {
            match id.parse::<i64>() {
                Ok(id) => Some(RecordRef::Id(id)),
                Err(_) => {
                    errors.push(format!("{} ID must be a number.", label));
                    None
                }
            }
        } else if !name.is_empty() {
            Some(RecordRef::Name(name.to_string()))
        } else {
            errors.push(format!("{} is required.", label));
            None
        }
    }

    pub fn validate(&self) -> Result<ShowFields, FormErrors> {
        let mut errors = FormErrors::new();
        let artist = Self::reference(&mut errors, "Artist", &self.artist_id, &self.artist_name);
        let venue = Self::reference(&mut errors, "Venue", &self.venue_id, &self.venue_name);
        check_url(&mut errors, "Artist image link", &self.artist_image_link);

        let start_time = if self.start_time.is_empty() {
            errors.push("Start time is required.".to_string());
            None
        } else {
            let parsed = parse_start_time(&self.start_time);
            if parsed.is_none() {
                errors.push(format!(
                    "'{}' is not a valid start time (use YYYY-MM-DD HH:MM).",
                    self.start_time
                ));
            }
            parsed
        };

        match (artist, venue, start_time) {
            (Some(artist), Some(venue), Some(start_time)) if errors.is_empty() => Ok(ShowFields {
                artist,
                venue,
                start_time,
                artist_image_link: optional(&self.artist_image_link),
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pairs(items: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn venue_submission() -> FormFields {
        pairs(&[
            ("name", "  The Musical Hop "),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("address", "1015 Folsom Street"),
            ("phone", "123-123-1234"),
            ("genres", "Jazz"),
            ("genres", "Reggae"),
            ("image_link", ""),
            ("website", "https://www.themusicalhop.com"),
            ("seeking_talent", "y"),
        ])
    }

    #[test]
    fn test_repeated_genres_are_collected() {
        let form = VenueForm::from_fields(&venue_submission());
        assert_eq!(form.genres, vec!["Jazz", "Reggae"]);
    }

    #[test]
    fn test_valid_venue_form() {
        let fields = VenueForm::from_fields(&venue_submission()).validate().unwrap();

        assert_eq!(fields.name, "The Musical Hop");
        assert_eq!(fields.image_link, None);
        assert_eq!(fields.website.as_deref(), Some("https://www.themusicalhop.com"));
        assert!(fields.seeking_talent);
        assert_eq!(fields.seeking_description, None);
    }

    #[test]
    fn test_unchecked_checkbox_is_false() {
        let form = ArtistForm::from_fields(&pairs(&[("name", "Matt Quevedo")]));
        assert!(!form.seeking_venue);
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let errors = VenueForm::from_fields(&pairs(&[("state", "ZZ")])).validate().unwrap_err();

        assert!(errors.contains(&"Name is required.".to_string()));
        assert!(errors.contains(&"City is required.".to_string()));
        assert!(errors.contains(&"Address is required.".to_string()));
        assert!(errors.contains(&"'ZZ' is not a valid state.".to_string()));
        assert!(errors.contains(&"Pick at least one genre.".to_string()));
    }

    #[test]
    fn test_unknown_genre_and_bad_links_rejected() {
        let errors = ArtistForm::from_fields(&pairs(&[
            ("name", "Guns N Petals"),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("genres", "Polka"),
            ("phone", "call me"),
            ("facebook_link", "facebook.com/gnp"),
        ]))
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("phone"));
        assert!(errors[1].contains("Polka"));
        assert!(errors[2].starts_with("Facebook link"));
    }

    #[test]
    fn test_edit_form_round_trips_record() {
        let venue = Venue {
            id: 7,
            name: "The Dueling Pianos Bar".to_string(),
            city: "New York".to_string(),
            state: "NY".to_string(),
            address: "335 Delancey Street".to_string(),
            phone: Some("914-003-1132".to_string()),
            image_link: None,
            facebook_link: None,
            website: None,
            genres: vec!["Classical".to_string(), "R&B".to_string()],
            seeking_talent: false,
            seeking_description: None,
        };

        let form = VenueForm::from_venue(&venue);
        assert_eq!(form.phone, "914-003-1132");
        assert_eq!(form.image_link, "");

        let fields = form.validate().unwrap();
        assert_eq!(fields.name, venue.name);
        assert_eq!(fields.genres, venue.genres);
        assert_eq!(fields.image_link, None);
    }

    #[test]
    fn test_show_form_by_names() {
        let fields = ShowForm::from_fields(&pairs(&[
            ("venue_name", "The Musical Hop"),
            ("artist_name", "Guns N Petals"),
            ("start_time", "2035-04-01 20:00:00"),
        ]))
        .validate()
        .unwrap();

        assert_eq!(fields.venue, RecordRef::Name("The Musical Hop".to_string()));
        assert_eq!(fields.artist, RecordRef::Name("Guns N Petals".to_string()));
        assert_eq!(fields.start_time, Utc.with_ymd_and_hms(2035, 4, 1, 20, 0, 0).unwrap());
        assert_eq!(fields.artist_image_link, None);
    }

    #[test]
    fn test_show_form_prefers_ids() {
        let fields = ShowForm::from_fields(&pairs(&[
            ("venue_id", "3"),
            ("venue_name", "ignored"),
            ("artist_id", "1"),
            ("start_time", "2035-04-01T20:00"),
        ]))
        .validate()
        .unwrap();

        assert_eq!(fields.venue, RecordRef::Id(3));
        assert_eq!(fields.artist, RecordRef::Id(1));
    }

    #[test]
    fn test_show_form_errors() {
        let errors = ShowForm::from_fields(&pairs(&[("artist_id", "abc"), ("start_time", "tomorrow")]))
            .validate()
            .unwrap_err();

        assert_eq!(
            errors,
            vec![
                "Artist ID must be a number.".to_string(),
                "Venue is required.".to_string(),
                "'tomorrow' is not a valid start time (use YYYY-MM-DD HH:MM).".to_string(),
            ]
        );
    }
}
