//! Display shapes handed to templates. Optional fields are flattened to
//! empty strings so templates only test `is_empty()`.

use chrono::NaiveDateTime;
use fyyur_core::aggregate::{partition_shows, ShowBuckets};
use fyyur_core::{Artist, ShowListing, Venue, START_TIME_FORMAT};
use std::collections::HashMap;

/// Detail pages: `MM/DD/YYYY, HH:MM:SS`
const DETAIL_TIME_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ShowCard {
    pub id: i64,
    pub name: String,
    pub image_link: String,
    pub start_time: String,
}

impl ShowCard {
    fn artist_side(show: &ShowListing) -> Self {
        Self {
            id: show.artist_id,
            name: show.artist_name.clone(),
            image_link: show.artist_image_link.clone().unwrap_or_default(),
            start_time: show.start_time.format(DETAIL_TIME_FORMAT).to_string(),
        }
    }

    fn venue_side(show: &ShowListing) -> Self {
        Self {
            id: show.venue_id,
            name: show.venue_name.clone(),
            image_link: show.venue_image_link.clone().unwrap_or_default(),
            start_time: show.start_time.format(DETAIL_TIME_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking_talent: bool,
    pub seeking_description: String,
    /// Artists who played or will play here
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn new(venue: Venue, shows: Vec<ShowListing>, now: NaiveDateTime) -> Self {
        let ShowBuckets { past, upcoming } = partition_shows(shows, now);
        let past_shows: Vec<ShowCard> = past.iter().map(ShowCard::artist_side).collect();
        let upcoming_shows: Vec<ShowCard> = upcoming.iter().map(ShowCard::artist_side).collect();
        Self {
            id: venue.id,
            name: venue.name,
            genres: venue.genres,
            address: venue.address,
            city: venue.city,
            state: venue.state,
            phone: venue.phone,
            website: venue.website.unwrap_or_default(),
            facebook_link: venue.facebook_link.unwrap_or_default(),
            image_link: venue.image_link.unwrap_or_default(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.unwrap_or_default(),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: String,
    pub facebook_link: String,
    pub image_link: String,
    pub seeking_venue: bool,
    pub seeking_description: String,
    /// Venues played or booked
    pub past_shows: Vec<ShowCard>,
    pub upcoming_shows: Vec<ShowCard>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn new(artist: Artist, shows: Vec<ShowListing>, now: NaiveDateTime) -> Self {
        let ShowBuckets { past, upcoming } = partition_shows(shows, now);
        let past_shows: Vec<ShowCard> = past.iter().map(ShowCard::venue_side).collect();
        let upcoming_shows: Vec<ShowCard> = upcoming.iter().map(ShowCard::venue_side).collect();
        Self {
            id: artist.id,
            name: artist.name,
            genres: artist.genres,
            city: artist.city,
            state: artist.state,
            phone: artist.phone,
            website: artist.website.unwrap_or_default(),
            facebook_link: artist.facebook_link.unwrap_or_default(),
            image_link: artist.image_link.unwrap_or_default(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.unwrap_or_default(),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

/// Row on the `/shows` page
#[derive(Debug, Clone)]
pub struct ShowRow {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: String,
}

impl From<ShowListing> for ShowRow {
    fn from(show: ShowListing) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: show.venue_name,
            artist_id: show.artist_id,
            artist_name: show.artist_name,
            artist_image_link: show.artist_image_link.unwrap_or_default(),
            start_time: show.start_time.format(START_TIME_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchItem {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchItem>,
}

impl SearchResults {
    pub fn new<I>(matches: I, upcoming_counts: &HashMap<i64, usize>) -> Self
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        let data: Vec<SearchItem> = matches
            .into_iter()
            .map(|(id, name)| SearchItem {
                id,
                name,
                num_upcoming_shows: upcoming_counts.get(&id).copied().unwrap_or(0),
            })
            .collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Entry in a plain listing (artists page, recent listings on the home page)
#[derive(Debug, Clone)]
pub struct ListingLink {
    pub id: i64,
    pub name: String,
}
