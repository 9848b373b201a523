//! Sample listings for a fresh database.

use chrono::NaiveDateTime;
use fyyur_core::storage::Storage;
use fyyur_core::{NewArtist, NewShow, NewVenue, Result, START_TIME_FORMAT};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded { venues: usize, artists: usize, shows: usize },
    /// Storage already had listings; nothing was written.
    Skipped,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn sample_venues() -> Vec<NewVenue> {
    vec![
        NewVenue {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: "123-123-1234".into(),
            website: Some("https://www.themusicalhop.com".into()),
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            image_link: Some(
                "https://images.unsplash.com/photo-1543900694-133f37abaaa5?ixlib=rb-1.2.1&auto=format&fit=crop&w=400&q=60"
                    .into(),
            ),
            genres: strings(&["Jazz", "Reggae", "Folk", "Classical"]),
            seeking_talent: true,
            seeking_description: Some(
                "We are on the lookout for a local artist to play every two weeks. Please call us.".into(),
            ),
        },
        NewVenue {
            name: "The Dueling Pianos Bar".into(),
            city: "New York".into(),
            state: "NY".into(),
            address: "335 Delancey Street".into(),
            phone: "914-003-1132".into(),
            website: Some("https://www.theduelingpianos.com".into()),
            facebook_link: Some("https://www.facebook.com/theduelingpianos".into()),
            image_link: Some(
                "https://images.unsplash.com/photo-1497032205916-ac775f0649ae?ixlib=rb-1.2.1&auto=format&fit=crop&w=750&q=80"
                    .into(),
            ),
            genres: strings(&["Classical", "R&B", "Hip-Hop"]),
            seeking_talent: false,
            seeking_description: None,
        },
        NewVenue {
            name: "Park Square Live Music & Coffee".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "34 Whiskey Moore Ave".into(),
            phone: "415-000-1234".into(),
            website: Some("https://www.parksquarelivemusicandcoffee.com".into()),
            facebook_link: Some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee".into()),
            image_link: Some(
                "https://images.unsplash.com/photo-1485686531765-ba63b07845a7?ixlib=rb-1.2.1&auto=format&fit=crop&w=747&q=80"
                    .into(),
            ),
            genres: strings(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            seeking_talent: false,
            seeking_description: None,
        },
    ]
}

fn sample_artists() -> Vec<NewArtist> {
    vec![
        NewArtist {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "326-123-5000".into(),
            website: Some("https://www.gunsnpetalsband.com".into()),
            facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
            image_link: Some(
                "https://images.unsplash.com/photo-1549213783-8284d0336c4f?ixlib=rb-1.2.1&auto=format&fit=crop&w=300&q=80"
                    .into(),
            ),
            genres: strings(&["Rock n Roll"]),
            seeking_venue: true,
            seeking_description: Some(
                "Looking for shows to perform at in the San Francisco Bay Area!".into(),
            ),
        },
        NewArtist {
            name: "Matt Quevedo".into(),
            city: "New York".into(),
            state: "NY".into(),
            phone: "300-400-5000".into(),
            website: None,
            facebook_link: Some("https://www.facebook.com/mattquevedo923251523".into()),
            image_link: Some(
                "https://images.unsplash.com/photo-1495223153807-b916f75de8c5?ixlib=rb-1.2.1&auto=format&fit=crop&w=334&q=80"
                    .into(),
            ),
            genres: strings(&["Jazz"]),
            seeking_venue: false,
            seeking_description: None,
        },
        NewArtist {
            name: "The Wild Sax Band".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: "432-325-5432".into(),
            website: None,
            facebook_link: None,
            image_link: Some(
                "https://images.unsplash.com/photo-1558369981-f9ca78462e61?ixlib=rb-1.2.1&auto=format&fit=crop&w=794&q=80"
                    .into(),
            ),
            genres: strings(&["Jazz", "Classical"]),
            seeking_venue: false,
            seeking_description: None,
        },
    ]
}

/// (venue index, artist index, start time) into the sample lists above
const SAMPLE_SHOWS: &[(usize, usize, &str)] = &[
    (0, 0, "2019-05-21 21:30:00"),
    (2, 1, "2019-06-15 23:00:00"),
    (2, 2, "2035-04-01 20:00:00"),
    (2, 2, "2035-04-08 20:00:00"),
    (2, 2, "2035-04-15 20:00:00"),
];

/// Inserts the sample listings unless the storage already holds venues or artists.
pub async fn seed_sample_data(storage: &dyn Storage) -> Result<SeedOutcome> {
    if !storage.list_venues().await?.is_empty() || !storage.list_artists().await?.is_empty() {
        info!("Storage already has listings, skipping seed");
        return Ok(SeedOutcome::Skipped);
    }

    let mut venue_ids = Vec::new();
    for venue in sample_venues() {
        venue_ids.push(storage.create_venue(venue).await?.id);
    }
    let mut artist_ids = Vec::new();
    for artist in sample_artists() {
        artist_ids.push(storage.create_artist(artist).await?.id);
    }

    for (venue, artist, start_time) in SAMPLE_SHOWS {
        let start_time = NaiveDateTime::parse_from_str(start_time, START_TIME_FORMAT)
            .map_err(|e| fyyur_core::FyyurError::Config(format!("Bad sample start time {start_time}: {e}")))?;
        storage
            .create_show(NewShow {
                venue_id: venue_ids[*venue],
                artist_id: artist_ids[*artist],
                start_time,
            })
            .await?;
    }

    let outcome = SeedOutcome::Seeded {
        venues: venue_ids.len(),
        artists: artist_ids.len(),
        shows: SAMPLE_SHOWS.len(),
    };
    info!("Seeded sample data: {:?}", outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fyyur_core::storage::InMemoryStorage;

    #[tokio::test]
    async fn seeds_once() {
        let storage = InMemoryStorage::new();

        let first = seed_sample_data(&storage).await.unwrap();
        assert_eq!(first, SeedOutcome::Seeded { venues: 3, artists: 3, shows: 5 });
        assert_eq!(seed_sample_data(&storage).await.unwrap(), SeedOutcome::Skipped);

        let shows = storage.list_shows().await.unwrap();
        assert_eq!(shows.len(), 5);
        assert_eq!(shows[0].venue_name, "The Musical Hop");
        assert_eq!(shows[4].artist_name, "The Wild Sax Band");
    }

    #[test]
    fn sample_forms_would_validate() {
        use crate::forms::{ArtistForm, VenueForm};

        for venue in sample_venues() {
            let mut form = VenueForm::from_venue(&venue.into_venue(1));
            assert!(form.validate().is_some(), "{:?}", form.errors);
        }
        for artist in sample_artists() {
            let mut form = ArtistForm::from_artist(&artist.into_artist(1));
            assert!(form.validate().is_some(), "{:?}", form.errors);
        }
    }
}
