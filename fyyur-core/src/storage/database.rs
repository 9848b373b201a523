use super::traits::Storage;
use crate::common::error::{FyyurError, Result};
use crate::database::{begin, finish, DatabaseManager};
use crate::domain::*;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use libsql::{Connection, Row, Rows, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, website, facebook_link, \
     image_link, genres, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, website, facebook_link, \
     image_link, genres, seeking_venue, seeking_description";

const SHOW_LISTING_SELECT: &str = "SELECT s.id, s.start_time, v.id, v.name, v.image_link, \
     a.id, a.name, a.image_link \
     FROM shows s JOIN venues v ON v.id = s.venue_id JOIN artists a ON a.id = s.artist_id";

/// Database storage implementation using a local libSQL file
pub struct DatabaseStorage {
    db: Arc<DatabaseManager>,
}

impl DatabaseStorage {
    /// Open the database at `path` and bring its schema up to date
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db_manager = DatabaseManager::open(path).await?;
        db_manager.run_migrations().await?;

        Ok(Self {
            db: Arc::new(db_manager),
        })
    }

    fn genres_to_column(genres: &[String]) -> Result<String> {
        Ok(serde_json::to_string(genres)?)
    }

    fn column_to_genres(data: &str) -> Result<Vec<String>> {
        serde_json::from_str(data).map_err(|e| FyyurError::Database {
            message: format!("Failed to deserialize genres: {e}"),
        })
    }

    fn row_to_venue(row: &Row) -> Result<Venue> {
        Ok(Venue {
            id: int(row, 0)?,
            name: text(row, 1)?,
            city: text(row, 2)?,
            state: text(row, 3)?,
            address: text(row, 4)?,
            phone: text(row, 5)?,
            website: opt_text(row, 6)?,
            facebook_link: opt_text(row, 7)?,
            image_link: opt_text(row, 8)?,
            genres: Self::column_to_genres(&text(row, 9)?)?,
            seeking_talent: int(row, 10)? != 0,
            seeking_description: opt_text(row, 11)?,
        })
    }

    fn row_to_artist(row: &Row) -> Result<Artist> {
        Ok(Artist {
            id: int(row, 0)?,
            name: text(row, 1)?,
            city: text(row, 2)?,
            state: text(row, 3)?,
            phone: text(row, 4)?,
            website: opt_text(row, 5)?,
            facebook_link: opt_text(row, 6)?,
            image_link: opt_text(row, 7)?,
            genres: Self::column_to_genres(&text(row, 8)?)?,
            seeking_venue: int(row, 9)? != 0,
            seeking_description: opt_text(row, 10)?,
        })
    }

    fn row_to_listing(row: &Row) -> Result<ShowListing> {
        Ok(ShowListing {
            show_id: int(row, 0)?,
            start_time: parse_start_time(&text(row, 1)?)?,
            venue_id: int(row, 2)?,
            venue_name: text(row, 3)?,
            venue_image_link: opt_text(row, 4)?,
            artist_id: int(row, 5)?,
            artist_name: text(row, 6)?,
            artist_image_link: opt_text(row, 7)?,
        })
    }

    async fn collect<T>(mut rows: Rows, map: fn(&Row) -> Result<T>) -> Result<Vec<T>> {
        let mut results = Vec::new();
        while let Some(row) = rows.next().await.map_err(|e| FyyurError::Database {
            message: format!("Failed to read row: {e}"),
        })? {
            results.push(map(&row)?);
        }
        Ok(results)
    }

    async fn query_venues(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Venue>> {
        let conn = self.db.get_connection().await?;
        let rows = conn.query(sql, params).await.map_err(|e| FyyurError::Database {
            message: format!("Failed to query venues: {e}"),
        })?;
        Self::collect(rows, Self::row_to_venue).await
    }

    async fn query_artists(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Artist>> {
        let conn = self.db.get_connection().await?;
        let rows = conn.query(sql, params).await.map_err(|e| FyyurError::Database {
            message: format!("Failed to query artists: {e}"),
        })?;
        Self::collect(rows, Self::row_to_artist).await
    }

    async fn query_listings(&self, filter: &str, params: Vec<Value>) -> Result<Vec<ShowListing>> {
        let sql = format!("{SHOW_LISTING_SELECT} {filter} ORDER BY s.start_time, s.id");
        let conn = self.db.get_connection().await?;
        let rows = conn.query(&sql, params).await.map_err(|e| FyyurError::Database {
            message: format!("Failed to query shows: {e}"),
        })?;
        Self::collect(rows, Self::row_to_listing).await
    }

    async fn upcoming_counts(&self, owner_column: &str, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        let sql = format!(
            "SELECT {owner_column}, COUNT(*) FROM shows WHERE start_time > ?1 GROUP BY {owner_column}"
        );
        let conn = self.db.get_connection().await?;
        let rows = conn
            .query(&sql, vec![Value::from(format_start_time(now))])
            .await
            .map_err(|e| FyyurError::Database {
                message: format!("Failed to count upcoming shows: {e}"),
            })?;

        let pairs = Self::collect(rows, |row| Ok((int(row, 0)?, int(row, 1)?))).await?;
        Ok(pairs
            .into_iter()
            .map(|(id, count)| (id, usize::try_from(count).unwrap_or(0)))
            .collect())
    }

    async fn exists(conn: &Connection, table: &'static str, id: i64) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
        let mut rows = conn.query(&sql, libsql::params![id]).await.map_err(|e| FyyurError::Database {
            message: format!("Failed to look up {table} {id}: {e}"),
        })?;
        let row = rows.next().await.map_err(|e| FyyurError::Database {
            message: format!("Failed to read row: {e}"),
        })?;
        Ok(row.is_some())
    }

    async fn execute(conn: &Connection, sql: &str, params: Vec<Value>) -> Result<u64> {
        conn.execute(sql, params).await.map_err(|e| FyyurError::Database {
            message: format!("Failed to execute statement: {e}"),
        })
    }

    fn venue_params(venue: &Venue) -> Result<Vec<Value>> {
        Ok(vec![
            Value::from(venue.name.clone()),
            Value::from(venue.city.clone()),
            Value::from(venue.state.clone()),
            Value::from(venue.address.clone()),
            Value::from(venue.phone.clone()),
            opt_value(&venue.website),
            opt_value(&venue.facebook_link),
            opt_value(&venue.image_link),
            Value::from(Self::genres_to_column(&venue.genres)?),
            Value::from(i64::from(venue.seeking_talent)),
            opt_value(&venue.seeking_description),
            Value::from(venue.name.to_lowercase()),
        ])
    }

    fn artist_params(artist: &Artist) -> Result<Vec<Value>> {
        Ok(vec![
            Value::from(artist.name.clone()),
            Value::from(artist.city.clone()),
            Value::from(artist.state.clone()),
            Value::from(artist.phone.clone()),
            opt_value(&artist.website),
            opt_value(&artist.facebook_link),
            opt_value(&artist.image_link),
            Value::from(Self::genres_to_column(&artist.genres)?),
            Value::from(i64::from(artist.seeking_venue)),
            opt_value(&artist.seeking_description),
            Value::from(artist.name.to_lowercase()),
        ])
    }

    /// Deletes an owner row and its shows in one transaction
    async fn delete_owner(&self, table: &'static str, show_column: &str, entity: &'static str, id: i64) -> Result<()> {
        let conn = self.db.get_connection().await?;
        let tx = begin(&conn).await?;

        let result: Result<()> = async {
            Self::execute(&tx, &format!("DELETE FROM shows WHERE {show_column} = ?1"), vec![Value::from(id)]).await?;
            let deleted = Self::execute(&tx, &format!("DELETE FROM {table} WHERE id = ?1"), vec![Value::from(id)]).await?;
            if deleted == 0 {
                return Err(FyyurError::NotFound { entity, id });
            }
            Ok(())
        }
        .await;

        finish(tx, result).await?;
        info!("Deleted {} {} and its shows", entity, id);
        Ok(())
    }
}

fn int(row: &Row, idx: i32) -> Result<i64> {
    row.get::<i64>(idx).map_err(|e| FyyurError::Database {
        message: format!("Failed to get column {idx}: {e}"),
    })
}

fn text(row: &Row, idx: i32) -> Result<String> {
    row.get::<String>(idx).map_err(|e| FyyurError::Database {
        message: format!("Failed to get column {idx}: {e}"),
    })
}

fn opt_text(row: &Row, idx: i32) -> Result<Option<String>> {
    match row.get_value(idx).map_err(|e| FyyurError::Database {
        message: format!("Failed to get column {idx}: {e}"),
    })? {
        Value::Null => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        other => Err(FyyurError::Database {
            message: format!("Unexpected value in column {idx}: {other:?}"),
        }),
    }
}

fn opt_value(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::from(s.clone()),
        None => Value::Null,
    }
}

fn format_start_time(start_time: NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

fn parse_start_time(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT).map_err(|e| FyyurError::Database {
        message: format!("Invalid start_time '{raw}': {e}"),
    })
}

/// LIKE pattern matched against the lowercased `name_search` column, with
/// wildcards escaped. SQLite only folds ASCII case, so both sides are
/// lowercased in Rust.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn create_venue(&self, venue: NewVenue) -> Result<Venue> {
        let mut venue = venue.into_venue(0);
        let params = Self::venue_params(&venue)?;

        let conn = self.db.get_connection().await?;
        let tx = begin(&conn).await?;
        let result = Self::execute(
            &tx,
            "INSERT INTO venues (name, city, state, address, phone, website, facebook_link, \
             image_link, genres, seeking_talent, seeking_description, name_search) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params,
        )
        .await
        .map(|_| tx.last_insert_rowid());
        venue.id = finish(tx, result).await?;

        info!("Created venue: {} with id {}", venue.name, venue.id);
        Ok(venue)
    }

    async fn update_venue(&self, venue_id: i64, venue: NewVenue) -> Result<Venue> {
        let venue = venue.into_venue(venue_id);
        let mut params = Self::venue_params(&venue)?;
        params.push(Value::from(venue_id));

        let conn = self.db.get_connection().await?;
        let tx = begin(&conn).await?;
        let result = Self::execute(
            &tx,
            "UPDATE venues SET name = ?1, city = ?2, state = ?3, address = ?4, phone = ?5, \
             website = ?6, facebook_link = ?7, image_link = ?8, genres = ?9, \
             seeking_talent = ?10, seeking_description = ?11, name_search = ?12 WHERE id = ?13",
            params,
        )
        .await
        .and_then(|updated| match updated {
            0 => Err(FyyurError::NotFound { entity: "Venue", id: venue_id }),
            _ => Ok(()),
        });
        finish(tx, result).await?;

        info!("Updated venue: {} with id {}", venue.name, venue_id);
        Ok(venue)
    }

    async fn delete_venue(&self, venue_id: i64) -> Result<()> {
        self.delete_owner("venues", "venue_id", "Venue", venue_id).await
    }

    async fn get_venue(&self, venue_id: i64) -> Result<Option<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1");
        let venues = self.query_venues(&sql, vec![Value::from(venue_id)]).await?;
        Ok(venues.into_iter().next())
    }

    async fn list_venues(&self) -> Result<Vec<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id");
        let venues = self.query_venues(&sql, Vec::new()).await?;
        debug!("Loaded {} venues", venues.len());
        Ok(venues)
    }

    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE name_search LIKE ?1 ESCAPE '\\' ORDER BY id");
        let venues = self.query_venues(&sql, vec![Value::from(like_pattern(term))]).await?;
        debug!("Venue search '{}' matched {}", term, venues.len());
        Ok(venues)
    }

    async fn create_artist(&self, artist: NewArtist) -> Result<Artist> {
        let mut artist = artist.into_artist(0);
        let params = Self::artist_params(&artist)?;

        let conn = self.db.get_connection().await?;
        let tx = begin(&conn).await?;
        let result = Self::execute(
            &tx,
            "INSERT INTO artists (name, city, state, phone, website, facebook_link, \
             image_link, genres, seeking_venue, seeking_description, name_search) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params,
        )
        .await
        .map(|_| tx.last_insert_rowid());
        artist.id = finish(tx, result).await?;

        info!("Created artist: {} with id {}", artist.name, artist.id);
        Ok(artist)
    }

    async fn update_artist(&self, artist_id: i64, artist: NewArtist) -> Result<Artist> {
        let artist = artist.into_artist(artist_id);
        let mut params = Self::artist_params(&artist)?;
        params.push(Value::from(artist_id));

        let conn = self.db.get_connection().await?;
        let tx = begin(&conn).await?;
        let result = Self::execute(
            &tx,
            "UPDATE artists SET name = ?1, city = ?2, state = ?3, phone = ?4, website = ?5, \
             facebook_link = ?6, image_link = ?7, genres = ?8, seeking_venue = ?9, \
             seeking_description = ?10, name_search = ?11 WHERE id = ?12",
            params,
        )
        .await
        .and_then(|updated| match updated {
            0 => Err(FyyurError::NotFound { entity: "Artist", id: artist_id }),
            _ => Ok(()),
        });
        finish(tx, result).await?;

        info!("Updated artist: {} with id {}", artist.name, artist_id);
        Ok(artist)
    }

    async fn delete_artist(&self, artist_id: i64) -> Result<()> {
        self.delete_owner("artists", "artist_id", "Artist", artist_id).await
    }

    async fn get_artist(&self, artist_id: i64) -> Result<Option<Artist>> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1");
        let artists = self.query_artists(&sql, vec![Value::from(artist_id)]).await?;
        Ok(artists.into_iter().next())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id");
        let artists = self.query_artists(&sql, Vec::new()).await?;
        debug!("Loaded {} artists", artists.len());
        Ok(artists)
    }

    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE name_search LIKE ?1 ESCAPE '\\' ORDER BY id");
        let artists = self.query_artists(&sql, vec![Value::from(like_pattern(term))]).await?;
        debug!("Artist search '{}' matched {}", term, artists.len());
        Ok(artists)
    }

    async fn create_show(&self, show: NewShow) -> Result<Show> {
        let conn = self.db.get_connection().await?;
        let tx = begin(&conn).await?;

        let result: Result<i64> = async {
            if !Self::exists(&tx, "venues", show.venue_id).await? {
                return Err(FyyurError::InvalidReference { entity: "Venue", id: show.venue_id });
            }
            if !Self::exists(&tx, "artists", show.artist_id).await? {
                return Err(FyyurError::InvalidReference { entity: "Artist", id: show.artist_id });
            }
            Self::execute(
                &tx,
                "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
                vec![
                    Value::from(show.venue_id),
                    Value::from(show.artist_id),
                    Value::from(format_start_time(show.start_time)),
                ],
            )
            .await?;
            Ok(tx.last_insert_rowid())
        }
        .await;
        let id = finish(tx, result).await?;

        info!("Created show {} (venue {}, artist {}) at {}", id, show.venue_id, show.artist_id, show.start_time);
        Ok(Show {
            id,
            venue_id: show.venue_id,
            artist_id: show.artist_id,
            start_time: show.start_time,
        })
    }

    async fn list_shows(&self) -> Result<Vec<ShowListing>> {
        self.query_listings("", Vec::new()).await
    }

    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
        self.query_listings("WHERE s.venue_id = ?1", vec![Value::from(venue_id)]).await
    }

    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
        self.query_listings("WHERE s.artist_id = ?1", vec![Value::from(artist_id)]).await
    }

    async fn upcoming_show_counts_for_venues(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        self.upcoming_counts("venue_id", now).await
    }

    async fn upcoming_show_counts_for_artists(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        self.upcoming_counts("artist_id", now).await
    }

    async fn clear_all_data(&self) -> Result<()> {
        self.db.clear_all_data().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Hop"), "%hop%");
        assert_eq!(like_pattern("CAFÉ"), "%café%");
        assert_eq!(like_pattern(" 100%_\\ "), "%100\\%\\_\\\\%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn start_time_round_trips_through_column_format() {
        let raw = "2035-04-01 20:00:00";
        let parsed = parse_start_time(raw).expect("parses");
        assert_eq!(format_start_time(parsed), raw);
        assert!(parse_start_time("yesterday").is_err());
    }
}
