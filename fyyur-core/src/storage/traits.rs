use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Storage trait for persisting venues, artists and the shows that link them
#[async_trait]
pub trait Storage: Send + Sync {
    // Venue operations
    async fn create_venue(&self, venue: NewVenue) -> Result<Venue>;
    async fn update_venue(&self, venue_id: i64, venue: NewVenue) -> Result<Venue>;
    /// Deletes the venue together with its shows.
    async fn delete_venue(&self, venue_id: i64) -> Result<()>;
    async fn get_venue(&self, venue_id: i64) -> Result<Option<Venue>>;
    async fn list_venues(&self) -> Result<Vec<Venue>>;
    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>>;

    // Artist operations
    async fn create_artist(&self, artist: NewArtist) -> Result<Artist>;
    async fn update_artist(&self, artist_id: i64, artist: NewArtist) -> Result<Artist>;
    /// Deletes the artist together with its shows.
    async fn delete_artist(&self, artist_id: i64) -> Result<()>;
    async fn get_artist(&self, artist_id: i64) -> Result<Option<Artist>>;
    async fn list_artists(&self) -> Result<Vec<Artist>>;
    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>>;

    // Show operations
    async fn create_show(&self, show: NewShow) -> Result<Show>;
    async fn list_shows(&self) -> Result<Vec<ShowListing>>;
    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<ShowListing>>;
    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<ShowListing>>;

    // Upcoming show counts keyed by owner id; owners without upcoming shows are absent
    async fn upcoming_show_counts_for_venues(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>>;
    async fn upcoming_show_counts_for_artists(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>>;

    /// Removes every row. Used by the `clear` command and tests.
    async fn clear_all_data(&self) -> Result<()>;
}

/// Case-insensitive substring match used by the in-memory store.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}
