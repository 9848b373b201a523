//! Show bucketing for detail pages and area grouping for the venue listing.

use crate::domain::{ShowListing, Venue};
use chrono::NaiveDateTime;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowBuckets {
    pub past: Vec<ShowListing>,
    pub upcoming: Vec<ShowListing>,
}

/// Splits shows around `now`. A show starting exactly at `now` counts as past.
pub fn partition_shows(shows: Vec<ShowListing>, now: NaiveDateTime) -> ShowBuckets {
    let (past, upcoming): (Vec<_>, Vec<_>) = shows.into_iter().partition(|show| show.start_time <= now);
    ShowBuckets { past, upcoming }
}

pub fn is_upcoming(start_time: NaiveDateTime, now: NaiveDateTime) -> bool {
    start_time > now
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaVenue {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

/// Buckets venues by `(city, state)` in one pass. Areas keep the order in which
/// they are first seen; venues keep their input order inside an area.
pub fn group_venues_by_area(venues: &[Venue], upcoming_counts: &HashMap<i64, usize>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for venue in venues {
        let slot = *index
            .entry((venue.city.as_str(), venue.state.as_str()))
            .or_insert_with(|| {
                areas.push(Area {
                    city: venue.city.clone(),
                    state: venue.state.clone(),
                    venues: Vec::new(),
                });
                areas.len() - 1
            });

        areas[slot].venues.push(AreaVenue {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows: upcoming_counts.get(&venue.id).copied().unwrap_or(0),
        });
    }

    areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewVenue;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2035, 4, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    fn listing(id: i64, start_time: NaiveDateTime) -> ShowListing {
        ShowListing {
            show_id: id,
            start_time,
            venue_id: 1,
            venue_name: "The Musical Hop".into(),
            venue_image_link: None,
            artist_id: 4,
            artist_name: "Guns N Petals".into(),
            artist_image_link: None,
        }
    }

    fn venue(id: i64, name: &str, city: &str, state: &str) -> Venue {
        NewVenue {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            ..Default::default()
        }
        .into_venue(id)
    }

    #[test]
    fn partition_splits_on_now_inclusive() {
        let now = at(10, 12);
        let shows = vec![listing(1, at(1, 20)), listing(2, now), listing(3, at(15, 20))];

        let buckets = partition_shows(shows, now);

        let past: Vec<i64> = buckets.past.iter().map(|s| s.show_id).collect();
        let upcoming: Vec<i64> = buckets.upcoming.iter().map(|s| s.show_id).collect();
        assert_eq!(past, vec![1, 2]);
        assert_eq!(upcoming, vec![3]);
    }

    #[test]
    fn partition_of_nothing_is_empty() {
        let buckets = partition_shows(Vec::new(), at(1, 0));
        assert!(buckets.past.is_empty());
        assert!(buckets.upcoming.is_empty());
    }

    #[test]
    fn venues_grouped_by_city_and_state_in_first_seen_order() {
        let venues = vec![
            venue(1, "The Musical Hop", "San Francisco", "CA"),
            venue(2, "Park Square Live Music & Coffee", "New York", "NY"),
            venue(3, "The Dueling Pianos Bar", "San Francisco", "CA"),
            venue(4, "Portland Hall", "Portland", "ME"),
            venue(5, "Portland Hall West", "Portland", "OR"),
        ];
        let counts = HashMap::from([(1, 2), (3, 1)]);

        let areas = group_venues_by_area(&venues, &counts);

        assert_eq!(areas.len(), 4);
        assert_eq!(areas[0].city, "San Francisco");
        let ids: Vec<i64> = areas[0].venues.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(areas[0].venues[0].num_upcoming_shows, 2);
        assert_eq!(areas[1].venues[0].num_upcoming_shows, 0);
        assert_eq!((areas[2].state.as_str(), areas[3].state.as_str()), ("ME", "OR"));
    }
}
