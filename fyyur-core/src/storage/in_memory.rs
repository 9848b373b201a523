use super::traits::{name_matches, Storage};
use crate::aggregate::is_upcoming;
use crate::common::error::{FyyurError, Result};
use crate::domain::*;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct Tables {
    venues: BTreeMap<i64, Venue>,
    artists: BTreeMap<i64, Artist>,
    shows: BTreeMap<i64, Show>,
    next_id: i64,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn listing(&self, show: &Show) -> Option<ShowListing> {
        let venue = self.venues.get(&show.venue_id)?;
        let artist = self.artists.get(&show.artist_id)?;
        Some(ShowListing {
            show_id: show.id,
            start_time: show.start_time,
            venue_id: venue.id,
            venue_name: venue.name.clone(),
            venue_image_link: venue.image_link.clone(),
            artist_id: artist.id,
            artist_name: artist.name.clone(),
            artist_image_link: artist.image_link.clone(),
        })
    }

    fn listings<F>(&self, keep: F) -> Vec<ShowListing>
    where
        F: Fn(&Show) -> bool,
    {
        let mut listings: Vec<ShowListing> = self
            .shows
            .values()
            .filter(|&show| keep(show))
            .filter_map(|show| self.listing(show))
            .collect();
        listings.sort_by_key(|l| (l.start_time, l.show_id));
        listings
    }

    fn upcoming_counts<F>(&self, now: NaiveDateTime, owner: F) -> HashMap<i64, usize>
    where
        F: Fn(&Show) -> i64,
    {
        let mut counts = HashMap::new();
        for show in self.shows.values().filter(|s| is_upcoming(s.start_time, now)) {
            *counts.entry(owner(show)).or_insert(0) += 1;
        }
        counts
    }
}

/// In-memory storage implementation for development/testing
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| FyyurError::database("in-memory storage lock poisoned"))
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_venue(&self, venue: NewVenue) -> Result<Venue> {
        let mut tables = self.tables()?;
        let id = tables.allocate_id();
        let venue = venue.into_venue(id);
        tables.venues.insert(id, venue.clone());

        debug!("Created venue: {} with id {}", venue.name, id);
        Ok(venue)
    }

    async fn update_venue(&self, venue_id: i64, venue: NewVenue) -> Result<Venue> {
        let mut tables = self.tables()?;
        let slot = tables
            .venues
            .get_mut(&venue_id)
            .ok_or(FyyurError::NotFound { entity: "Venue", id: venue_id })?;
        *slot = venue.into_venue(venue_id);

        debug!("Updated venue: {} with id {}", slot.name, venue_id);
        Ok(slot.clone())
    }

    async fn delete_venue(&self, venue_id: i64) -> Result<()> {
        let mut tables = self.tables()?;
        if tables.venues.remove(&venue_id).is_none() {
            return Err(FyyurError::NotFound { entity: "Venue", id: venue_id });
        }
        tables.shows.retain(|_, show| show.venue_id != venue_id);

        debug!("Deleted venue {} and its shows", venue_id);
        Ok(())
    }

    async fn get_venue(&self, venue_id: i64) -> Result<Option<Venue>> {
        Ok(self.tables()?.venues.get(&venue_id).cloned())
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        Ok(self.tables()?.venues.values().cloned().collect())
    }

    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        Ok(self
            .tables()?
            .venues
            .values()
            .filter(|v| name_matches(&v.name, term))
            .cloned()
            .collect())
    }

    async fn create_artist(&self, artist: NewArtist) -> Result<Artist> {
        let mut tables = self.tables()?;
        let id = tables.allocate_id();
        let artist = artist.into_artist(id);
        tables.artists.insert(id, artist.clone());

        debug!("Created artist: {} with id {}", artist.name, id);
        Ok(artist)
    }

    async fn update_artist(&self, artist_id: i64, artist: NewArtist) -> Result<Artist> {
        let mut tables = self.tables()?;
        let slot = tables
            .artists
            .get_mut(&artist_id)
            .ok_or(FyyurError::NotFound { entity: "Artist", id: artist_id })?;
        *slot = artist.into_artist(artist_id);

        debug!("Updated artist: {} with id {}", slot.name, artist_id);
        Ok(slot.clone())
    }

    async fn delete_artist(&self, artist_id: i64) -> Result<()> {
        let mut tables = self.tables()?;
        if tables.artists.remove(&artist_id).is_none() {
            return Err(FyyurError::NotFound { entity: "Artist", id: artist_id });
        }
        tables.shows.retain(|_, show| show.artist_id != artist_id);

        debug!("Deleted artist {} and its shows", artist_id);
        Ok(())
    }

    async fn get_artist(&self, artist_id: i64) -> Result<Option<Artist>> {
        Ok(self.tables()?.artists.get(&artist_id).cloned())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        Ok(self.tables()?.artists.values().cloned().collect())
    }

    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        Ok(self
            .tables()?
            .artists
            .values()
            .filter(|a| name_matches(&a.name, term))
            .cloned()
            .collect())
    }

    async fn create_show(&self, show: NewShow) -> Result<Show> {
        let mut tables = self.tables()?;
        if !tables.venues.contains_key(&show.venue_id) {
            return Err(FyyurError::InvalidReference { entity: "Venue", id: show.venue_id });
        }
        if !tables.artists.contains_key(&show.artist_id) {
            return Err(FyyurError::InvalidReference { entity: "Artist", id: show.artist_id });
        }

        let id = tables.allocate_id();
        let show = Show {
            id,
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            start_time: show.start_time,
        };
        tables.shows.insert(id, show.clone());

        debug!("Created show {} at {}", id, show.start_time);
        Ok(show)
    }

    async fn list_shows(&self) -> Result<Vec<ShowListing>> {
        Ok(self.tables()?.listings(|_| true))
    }

    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
        Ok(self.tables()?.listings(|s| s.venue_id == venue_id))
    }

    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
        Ok(self.tables()?.listings(|s| s.artist_id == artist_id))
    }

    async fn upcoming_show_counts_for_venues(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        Ok(self.tables()?.upcoming_counts(now, |s| s.venue_id))
    }

    async fn upcoming_show_counts_for_artists(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        Ok(self.tables()?.upcoming_counts(now, |s| s.artist_id))
    }

    async fn clear_all_data(&self) -> Result<()> {
        let mut tables = self.tables()?;
        *tables = Tables::default();
        debug!("Cleared in-memory storage");
        Ok(())
    }
}
