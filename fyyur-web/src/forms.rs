//! Listing forms: parsing of urlencoded bodies, validation and the values
//! needed to re-render a form.

use chrono::NaiveDateTime;
use fyyur_core::{normalize_genres, Artist, NewArtist, NewShow, NewVenue, Venue, START_TIME_FORMAT};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

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

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

const START_TIME_INPUT_FORMATS: &[&str] = &[START_TIME_FORMAT, "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Area code either fully parenthesised or bare.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4}$").expect("phone regex compiles")
});

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url regex compiles"));

/// Raw `application/x-www-form-urlencoded` pairs, repeated keys preserved.
#[derive(Debug, Clone, Default)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value for `key`, trimmed; empty when missing.
    pub fn get(&self, key: &str) -> String {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default()
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }

    /// Checkbox semantics: `y`, `on`, `true` and `1` are checked.
    pub fn checked(&self, key: &str) -> bool {
        matches!(self.get(key).to_ascii_lowercase().as_str(), "y" | "yes" | "on" | "true" | "1")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message for `field`, or an empty string.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub fn genre_options(selected: &[String]) -> Vec<SelectOption> {
    GENRES
        .iter()
        .map(|genre| SelectOption {
            value: genre.to_string(),
            label: genre.to_string(),
            selected: selected.iter().any(|s| s == genre),
        })
        .collect()
}

pub fn state_options(selected: &str) -> Vec<SelectOption> {
    STATES
        .iter()
        .map(|state| SelectOption {
            value: state.to_string(),
            label: state.to_string(),
            selected: *state == selected,
        })
        .collect()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn require(errors: &mut FormErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
    }
}

fn check_state(errors: &mut FormErrors, state: &str) {
    if !state.is_empty() && !STATES.contains(&state) {
        errors.add("state", "Not a valid choice.");
    }
}

fn check_phone(errors: &mut FormErrors, phone: &str) {
    if !phone.is_empty() && !PHONE_RE.is_match(phone) {
        errors.add("phone", "Invalid phone number, use xxx-xxx-xxxx.");
    }
}

fn check_genres(errors: &mut FormErrors, genres: &[String]) {
    if genres.is_empty() {
        errors.add("genres", "Select at least one genre.");
    } else if let Some(bad) = genres.iter().find(|g| !GENRES.contains(&g.as_str())) {
        errors.add("genres", format!("'{bad}' is not a valid genre."));
    }
}

fn check_url(errors: &mut FormErrors, field: &'static str, value: &str) {
    if !value.is_empty() && !URL_RE.is_match(value) {
        errors.add(field, "Invalid URL.");
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub website_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub errors: FormErrors,
}

impl VenueForm {
    pub fn from_data(data: &FormData) -> Self {
        Self {
            name: data.get("name"),
            city: data.get("city"),
            state: data.get("state"),
            address: data.get("address"),
            phone: data.get("phone"),
            genres: normalize_genres(data.get_all("genres")),
            facebook_link: data.get("facebook_link"),
            image_link: data.get("image_link"),
            website_link: data.get("website_link"),
            seeking_talent: data.checked("seeking_talent"),
            seeking_description: data.get("seeking_description"),
            errors: FormErrors::default(),
        }
    }

    pub fn from_venue(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            genres: venue.genres.clone(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            website_link: venue.website.clone().unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
            errors: FormErrors::default(),
        }
    }

    /// Collects field errors into `self.errors`; returns the record when there are none.
    pub fn validate(&mut self) -> Option<NewVenue> {
        let mut errors = FormErrors::default();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        require(&mut errors, "address", &self.address);
        require(&mut errors, "phone", &self.phone);
        check_state(&mut errors, &self.state);
        check_phone(&mut errors, &self.phone);
        check_genres(&mut errors, &self.genres);
        check_url(&mut errors, "facebook_link", &self.facebook_link);
        check_url(&mut errors, "image_link", &self.image_link);
        check_url(&mut errors, "website_link", &self.website_link);
        self.errors = errors;

        if !self.errors.is_empty() {
            return None;
        }

        Some(NewVenue {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            website: optional(&self.website_link),
            facebook_link: optional(&self.facebook_link),
            image_link: optional(&self.image_link),
            genres: self.genres.clone(),
            seeking_talent: self.seeking_talent,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: String,
    pub image_link: String,
    pub website_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub errors: FormErrors,
}

impl ArtistForm {
    pub fn from_data(data: &FormData) -> Self {
        Self {
            name: data.get("name"),
            city: data.get("city"),
            state: data.get("state"),
            phone: data.get("phone"),
            genres: normalize_genres(data.get_all("genres")),
            facebook_link: data.get("facebook_link"),
            image_link: data.get("image_link"),
            website_link: data.get("website_link"),
            seeking_venue: data.checked("seeking_venue"),
            seeking_description: data.get("seeking_description"),
            errors: FormErrors::default(),
        }
    }

    pub fn from_artist(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: artist.genres.clone(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            website_link: artist.website.clone().unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
            errors: FormErrors::default(),
        }
    }

    pub fn validate(&mut self) -> Option<NewArtist> {
        let mut errors = FormErrors::default();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        require(&mut errors, "phone", &self.phone);
        check_state(&mut errors, &self.state);
        check_phone(&mut errors, &self.phone);
        check_genres(&mut errors, &self.genres);
        check_url(&mut errors, "facebook_link", &self.facebook_link);
        check_url(&mut errors, "image_link", &self.image_link);
        check_url(&mut errors, "website_link", &self.website_link);
        self.errors = errors;

        if !self.errors.is_empty() {
            return None;
        }

        Some(NewArtist {
            name: self.name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            phone: self.phone.clone(),
            website: optional(&self.website_link),
            facebook_link: optional(&self.facebook_link),
            image_link: optional(&self.image_link),
            genres: self.genres.clone(),
            seeking_venue: self.seeking_venue,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowForm {
    pub venue_id: String,
    pub artist_id: String,
    pub start_time: String,
    pub errors: FormErrors,
}

impl ShowForm {
    /// Empty form with the start time preset to `now`.
    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            start_time: now.format(START_TIME_FORMAT).to_string(),
            ..Self::default()
        }
    }

    pub fn from_data(data: &FormData) -> Self {
        Self {
            venue_id: data.get("venue_id"),
            artist_id: data.get("artist_id"),
            start_time: data.get("start_time"),
            errors: FormErrors::default(),
        }
    }

    pub fn validate(&mut self) -> Option<NewShow> {
        let mut errors = FormErrors::default();
        let venue_id = parse_id(&mut errors, "venue_id", &self.venue_id);
        let artist_id = parse_id(&mut errors, "artist_id", &self.artist_id);
        let start_time = parse_start_time(&self.start_time);
        if self.start_time.is_empty() {
            errors.add("start_time", "This field is required.");
        } else if start_time.is_none() {
            errors.add("start_time", "Use YYYY-MM-DD HH:MM:SS.");
        }
        self.errors = errors;

        Some(NewShow {
            venue_id: venue_id?,
            artist_id: artist_id?,
            start_time: start_time?,
        })
    }

    /// Marks the id field that points at a missing record.
    pub fn reject_reference(&mut self, entity: &str) {
        match entity {
            "Venue" => self.errors.add("venue_id", "No venue with this ID."),
            _ => self.errors.add("artist_id", "No artist with this ID."),
        }
    }
}

fn parse_id(errors: &mut FormErrors, field: &'static str, raw: &str) -> Option<i64> {
    if raw.is_empty() {
        errors.add(field, "This field is required.");
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.add(field, "Must be a positive whole number.");
            None
        }
    }
}

pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    START_TIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}
