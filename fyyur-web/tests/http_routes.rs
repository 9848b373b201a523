use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDateTime;
use fyyur_core::storage::{DatabaseStorage, InMemoryStorage, Storage};
use fyyur_core::{Artist, FyyurError, NewArtist, NewShow, NewVenue, Result, Show, ShowListing, Venue};
use fyyur_web::config::DEFAULT_STATIC_DIR;
use fyyur_web::seed::seed_sample_data;
use fyyur_web::{app_router, AppState};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn app(storage: Arc<dyn Storage>) -> Router {
    app_router(AppState::new(storage), DEFAULT_STATIC_DIR)
}

/// Seeded store whose writes always fail; reads fail too when `reads_fail` is set.
struct BrokenStorage {
    inner: InMemoryStorage,
    reads_fail: bool,
}

impl BrokenStorage {
    async fn new(reads_fail: bool) -> Self {
        let inner = InMemoryStorage::new();
        seed_sample_data(&inner).await.unwrap();
        Self { inner, reads_fail }
    }

    fn read(&self) -> Result<()> {
        if self.reads_fail {
            Err(FyyurError::database("disk I/O error"))
        } else {
            Ok(())
        }
    }
}

fn write_failure<T>() -> Result<T> {
    Err(FyyurError::database("database is locked"))
}

#[async_trait::async_trait]
impl Storage for BrokenStorage {
    async fn create_venue(&self, _venue: NewVenue) -> Result<Venue> {
        write_failure()
    }
    async fn update_venue(&self, _venue_id: i64, _venue: NewVenue) -> Result<Venue> {
        write_failure()
    }
    async fn delete_venue(&self, _venue_id: i64) -> Result<()> {
        write_failure()
    }
    async fn get_venue(&self, venue_id: i64) -> Result<Option<Venue>> {
        self.read()?;
        self.inner.get_venue(venue_id).await
    }
    async fn list_venues(&self) -> Result<Vec<Venue>> {
        self.read()?;
        self.inner.list_venues().await
    }
    async fn search_venues(&self, term: &str) -> Result<Vec<Venue>> {
        self.read()?;
        self.inner.search_venues(term).await
    }

    async fn create_artist(&self, _artist: NewArtist) -> Result<Artist> {
        write_failure()
    }
    async fn update_artist(&self, _artist_id: i64, _artist: NewArtist) -> Result<Artist> {
        write_failure()
    }
    async fn delete_artist(&self, _artist_id: i64) -> Result<()> {
        write_failure()
    }
    async fn get_artist(&self, artist_id: i64) -> Result<Option<Artist>> {
        self.read()?;
        self.inner.get_artist(artist_id).await
    }
    async fn list_artists(&self) -> Result<Vec<Artist>> {
        self.read()?;
        self.inner.list_artists().await
    }
    async fn search_artists(&self, term: &str) -> Result<Vec<Artist>> {
        self.read()?;
        self.inner.search_artists(term).await
    }

    async fn create_show(&self, _show: NewShow) -> Result<Show> {
        write_failure()
    }
    async fn list_shows(&self) -> Result<Vec<ShowListing>> {
        self.read()?;
        self.inner.list_shows().await
    }
    async fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<ShowListing>> {
        self.read()?;
        self.inner.shows_for_venue(venue_id).await
    }
    async fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<ShowListing>> {
        self.read()?;
        self.inner.shows_for_artist(artist_id).await
    }

    async fn upcoming_show_counts_for_venues(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        self.read()?;
        self.inner.upcoming_show_counts_for_venues(now).await
    }
    async fn upcoming_show_counts_for_artists(&self, now: NaiveDateTime) -> Result<HashMap<i64, usize>> {
        self.read()?;
        self.inner.upcoming_show_counts_for_artists(now).await
    }

    async fn clear_all_data(&self) -> Result<()> {
        write_failure()
    }
}

async fn seeded() -> (Arc<InMemoryStorage>, Router) {
    let storage = Arc::new(InMemoryStorage::new());
    seed_sample_data(storage.as_ref()).await.unwrap();
    let router = app(storage.clone());
    (storage, router)
}

/// Minimal urlencoding for test bodies
fn encode_form(pairs: &[(&str, &str)]) -> String {
    fn escape(value: &str) -> String {
        value
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
                b' ' => "+".to_string(),
                _ => format!("%{b:02X}"),
            })
            .collect()
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

async fn get(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(router: &Router, uri: &str, pairs: &[(&str, &str)]) -> Response {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(encode_form(pairs)))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn delete(router: &Router, uri: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().method(Method::DELETE).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn get_with_cookie(router: &Router, uri: &str, cookie: &str) -> Response {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).header(COOKIE, cookie).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

/// `name=value` part of the first Set-Cookie header
fn flash_cookie(response: &Response) -> String {
    let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

fn blue_note_venue() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Blue Note"),
        ("city", "New York"),
        ("state", "NY"),
        ("address", "131 W 3rd St"),
        ("phone", "212-475-8592"),
        ("genres", "Jazz"),
        ("genres", "Blues"),
        ("website_link", "https://www.bluenotejazz.com"),
        ("seeking_talent", "y"),
        ("seeking_description", "Late sets on weekends"),
    ]
}

#[tokio::test]
async fn home_and_listing_pages_render() {
    let (_, router) = seeded().await;

    let home = get(&router, "/").await;
    assert_eq!(home.status(), StatusCode::OK);
    assert!(body_text(home).await.contains("The Wild Sax Band"));

    let venues = body_text(get(&router, "/venues").await).await;
    assert!(venues.contains("San Francisco"));
    assert!(venues.contains("New York"));
    assert!(venues.contains("The Dueling Pianos Bar"));

    let artists = body_text(get(&router, "/artists").await).await;
    assert!(artists.contains("Matt Quevedo"));

    let shows = body_text(get(&router, "/shows").await).await;
    assert!(shows.contains("2035-04-01 20:00:00"));
    assert!(shows.contains("Guns N Petals"));
}

#[tokio::test]
async fn venue_detail_splits_past_and_upcoming_shows() {
    let (storage, router) = seeded().await;
    let park = storage.search_venues("Park Square").await.unwrap().remove(0);

    let response = get(&router, &format!("/venues/{}", park.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("3 Upcoming Shows"));
    assert!(body.contains("1 Past Show"));
    assert!(body.contains("06/15/2019, 23:00:00"));
}

#[tokio::test]
async fn missing_or_malformed_ids_are_not_found() {
    let (_, router) = seeded().await;

    assert_eq!(get(&router, "/venues/9999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/artists/abc").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/venues/9999/edit").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(get(&router, "/no/such/page").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_counts_case_insensitive_matches() {
    let (_, router) = seeded().await;

    let venues = body_text(post_form(&router, "/venues/search", &[("search_term", "Music")]).await).await;
    assert!(venues.contains(r#"Number of search results for "Music": 2"#));
    assert!(venues.contains("The Musical Hop"));

    let artists = body_text(post_form(&router, "/artists/search", &[("search_term", "A")]).await).await;
    assert!(artists.contains(r#"for "A": 3"#));

    let band = body_text(post_form(&router, "/artists/search", &[("search_term", "band")]).await).await;
    assert!(band.contains(r#"for "band": 1"#));
    assert!(band.contains("3 upcoming shows"));
}

#[tokio::test]
async fn created_venue_flashes_once() {
    let (storage, router) = seeded().await;

    let response = post_form(&router, "/venues/create", &blue_note_venue()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/venues");
    let cookie = flash_cookie(&response);
    assert!(cookie.starts_with("fyyur_flash=i:"));

    let created = storage.search_venues("Blue Note").await.unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].genres, vec!["Jazz".to_string(), "Blues".to_string()]);
    assert!(created[0].seeking_talent);

    let next = router
        .clone()
        .oneshot(Request::builder().uri("/venues").header(COOKIE, cookie).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(next.headers().get(SET_COOKIE).unwrap().to_str().unwrap().contains("Max-Age=0"));
    assert!(body_text(next).await.contains("Venue Blue Note was successfully listed!"));
}

#[tokio::test]
async fn invalid_venue_is_rerendered_with_errors() {
    let (storage, router) = seeded().await;
    let before = storage.list_venues().await.unwrap().len();

    let response = post_form(
        &router,
        "/venues/create",
        &[("name", "Blue Note"), ("city", "New York"), ("state", "ZZ"), ("phone", "nope")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("Not a valid choice."));
    assert!(body.contains("Blue Note"));
    assert_eq!(storage.list_venues().await.unwrap().len(), before);
}

#[tokio::test]
async fn artist_edit_updates_and_redirects_to_detail() {
    let (storage, router) = seeded().await;
    let matt = storage.search_artists("Quevedo").await.unwrap().remove(0);

    let form = get(&router, &format!("/artists/{}/edit", matt.id)).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body_text(form).await.contains("300-400-5000"));

    let response = post_form(
        &router,
        &format!("/artists/{}/edit", matt.id),
        &[
            ("name", "Matt Quevedo"),
            ("city", "Brooklyn"),
            ("state", "NY"),
            ("phone", "300-400-5000"),
            ("genres", "Jazz"),
            ("seeking_venue", "y"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/artists/{}", matt.id));

    let updated = storage.get_artist(matt.id).await.unwrap().unwrap();
    assert_eq!(updated.city, "Brooklyn");
    assert!(updated.seeking_venue);
}

#[tokio::test]
async fn show_creation_checks_references() {
    let (storage, router) = seeded().await;
    let hop = storage.search_venues("Musical Hop").await.unwrap().remove(0);
    let petals = storage.search_artists("Guns").await.unwrap().remove(0);
    let (hop_id, petals_id) = (hop.id.to_string(), petals.id.to_string());

    let form = body_text(get(&router, "/shows/create").await).await;
    assert!(form.contains("Guns N Petals"));

    let missing = post_form(
        &router,
        "/shows/create",
        &[("venue_id", "9999"), ("artist_id", petals_id.as_str()), ("start_time", "2036-01-01 20:00:00")],
    )
    .await;
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(missing).await.contains("No venue with this ID."));

    let created = post_form(
        &router,
        "/shows/create",
        &[
            ("venue_id", hop_id.as_str()),
            ("artist_id", petals_id.as_str()),
            ("start_time", "2036-01-01T20:00"),
        ],
    )
    .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), "/shows");

    let hop_shows = storage.shows_for_venue(hop.id).await.unwrap();
    assert_eq!(hop_shows.len(), 2);
    assert!(body_text(get(&router, "/shows").await).await.contains("2036-01-01 20:00:00"));
}

#[tokio::test]
async fn deleting_a_venue_cascades_to_its_shows() {
    let (storage, router) = seeded().await;
    let park = storage.search_venues("Park Square").await.unwrap().remove(0);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/venues/{}", park.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"success":true}"#);

    assert_eq!(get(&router, &format!("/venues/{}", park.id)).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(storage.list_shows().await.unwrap().len(), 1);

    let again = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/venues/{}", park.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(again).await, r#"{"success":false}"#);
}

#[tokio::test]
async fn delete_button_redirects_home() {
    let (storage, router) = seeded().await;
    let wild_sax = storage.search_artists("Wild Sax").await.unwrap().remove(0);

    let response = post_form(&router, &format!("/artists/{}/delete", wild_sax.id), &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(storage.get_artist(wild_sax.id).await.unwrap().is_none());
    assert_eq!(storage.list_shows().await.unwrap().len(), 2);
}

#[tokio::test]
async fn database_backed_app_serves_created_listings() {
    let dir = tempdir().unwrap();
    let storage = Arc::new(DatabaseStorage::open(dir.path().join("fyyur.db")).await.unwrap());
    let router = app(storage.clone());

    let response = post_form(&router, "/venues/create", &blue_note_venue()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let venue = storage.search_venues("blue").await.unwrap().remove(0);
    let detail = get(&router, &format!("/venues/{}", venue.id)).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let body = body_text(detail).await;
    assert!(body.contains("131 W 3rd St"));
    assert!(body.contains("0 Upcoming Shows"));
}

#[tokio::test]
async fn failed_writes_redirect_with_error_flash() {
    let storage = Arc::new(BrokenStorage::new(false).await);
    let router = app(storage.clone());
    let hop = storage.search_venues("Musical Hop").await.unwrap().remove(0);
    let petals = storage.search_artists("Guns").await.unwrap().remove(0);
    let (hop_id, petals_id) = (hop.id.to_string(), petals.id.to_string());

    let venue = post_form(&router, "/venues/create", &blue_note_venue()).await;
    assert_eq!(venue.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&venue), "/venues");
    let cookie = flash_cookie(&venue);
    assert!(cookie.starts_with("fyyur_flash=e:"));
    let listing = body_text(get_with_cookie(&router, "/venues", &cookie).await).await;
    assert!(listing.contains("An error occurred. Venue Blue Note could not be listed."));

    let artist = post_form(
        &router,
        "/artists/create",
        &[
            ("name", "Nina Simone"),
            ("city", "New York"),
            ("state", "NY"),
            ("phone", "212-555-0199"),
            ("genres", "Jazz"),
        ],
    )
    .await;
    assert_eq!(artist.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&artist), "/artists");
    let cookie = flash_cookie(&artist);
    assert!(cookie.starts_with("fyyur_flash=e:"));
    let listing = body_text(get_with_cookie(&router, "/artists", &cookie).await).await;
    assert!(listing.contains("An error occurred. Artist Nina Simone could not be listed."));

    let show = post_form(
        &router,
        "/shows/create",
        &[
            ("venue_id", hop_id.as_str()),
            ("artist_id", petals_id.as_str()),
            ("start_time", "2036-01-01 20:00:00"),
        ],
    )
    .await;
    assert_eq!(show.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&show), "/shows");
    assert!(flash_cookie(&show).starts_with("fyyur_flash=e:"));

    let mut edit = blue_note_venue();
    edit[0] = ("name", "The Musical Hop");
    let edited = post_form(&router, &format!("/venues/{hop_id}/edit"), &edit).await;
    assert_eq!(edited.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&edited), format!("/venues/{hop_id}"));
    assert!(flash_cookie(&edited).starts_with("fyyur_flash=e:"));

    let deleted = post_form(&router, &format!("/venues/{hop_id}/delete"), &[]).await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&deleted), format!("/venues/{hop_id}"));

    let json = delete(&router, &format!("/artists/{petals_id}")).await;
    assert_eq!(json.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(json).await, r#"{"success":false}"#);

    assert_eq!(storage.list_venues().await.unwrap().len(), 3);
}

#[tokio::test]
async fn unreadable_storage_renders_server_error_page() {
    let router = app(Arc::new(BrokenStorage::new(true).await));

    for uri in ["/", "/venues", "/artists/1", "/shows/create"] {
        let response = get(&router, uri).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body = body_text(response).await;
        assert!(body.contains("Something went wrong on our side."), "{uri}");
        assert!(!body.contains("disk I/O error"), "{uri}");
    }
}

#[tokio::test]
async fn deleting_an_artist_answers_json() {
    let (storage, router) = seeded().await;
    let wild_sax = storage.search_artists("Wild Sax").await.unwrap().remove(0);

    let response = delete(&router, &format!("/artists/{}", wild_sax.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, r#"{"success":true}"#);
    assert!(storage.get_artist(wild_sax.id).await.unwrap().is_none());
    assert_eq!(storage.list_shows().await.unwrap().len(), 2);

    let again = delete(&router, &format!("/artists/{}", wild_sax.id)).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(again).await, r#"{"success":false}"#);

    let malformed = delete(&router, "/artists/abc").await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn venue_edit_and_delete_buttons() {
    let (storage, router) = seeded().await;
    let pianos = storage.search_venues("Dueling Pianos").await.unwrap().remove(0);

    let response = post_form(
        &router,
        &format!("/venues/{}/edit", pianos.id),
        &[
            ("name", "The Dueling Pianos Bar"),
            ("city", "New York"),
            ("state", "NY"),
            ("address", "335 Delancey Street"),
            ("phone", "(914) 003-1132"),
            ("genres", "Classical"),
            ("genres", "Hip-Hop"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/venues/{}", pianos.id));
    assert!(flash_cookie(&response).starts_with("fyyur_flash=i:"));

    let updated = storage.get_venue(pianos.id).await.unwrap().unwrap();
    assert_eq!(updated.phone, "(914) 003-1132");
    assert_eq!(updated.genres, vec!["Classical".to_string(), "Hip-Hop".to_string()]);

    let deleted = post_form(&router, &format!("/venues/{}/delete", pianos.id), &[]).await;
    assert_eq!(deleted.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&deleted), "/");
    assert!(storage.get_venue(pianos.id).await.unwrap().is_none());

    let missing = post_form(&router, &format!("/venues/{}/delete", pianos.id), &[]).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_artist_is_listed() {
    let (storage, router) = seeded().await;

    let response = post_form(
        &router,
        "/artists/create",
        &[
            ("name", "Nina Simone"),
            ("city", "New York"),
            ("state", "NY"),
            ("phone", "212-555-0199"),
            ("genres", "Jazz"),
            ("genres", "Soul"),
            ("seeking_venue", "y"),
            ("seeking_description", "Small rooms only"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/artists");
    assert!(flash_cookie(&response).starts_with("fyyur_flash=i:"));

    let nina = storage.search_artists("nina").await.unwrap().remove(0);
    assert_eq!(nina.genres, vec!["Jazz".to_string(), "Soul".to_string()]);
    assert!(nina.seeking_venue);
    assert!(body_text(get(&router, "/artists").await).await.contains("Nina Simone"));
}

#[tokio::test]
async fn show_with_unreadable_start_time_is_rejected() {
    let (storage, router) = seeded().await;
    let hop = storage.search_venues("Musical Hop").await.unwrap().remove(0);
    let petals = storage.search_artists("Guns").await.unwrap().remove(0);
    let (hop_id, petals_id) = (hop.id.to_string(), petals.id.to_string());

    let response = post_form(
        &router,
        "/shows/create",
        &[("venue_id", hop_id.as_str()), ("artist_id", petals_id.as_str()), ("start_time", "soon")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_text(response).await;
    assert!(body.contains("Use YYYY-MM-DD HH:MM:SS."));
    assert!(body.contains("The Musical Hop"));
    assert_eq!(storage.list_shows().await.unwrap().len(), 5);
}

#[tokio::test]
async fn invalid_edit_of_missing_listing_is_not_found() {
    let (_, router) = seeded().await;
    let bad_form = [("name", ""), ("state", "ZZ")];

    let venue = post_form(&router, "/venues/9999/edit", &bad_form).await;
    assert_eq!(venue.status(), StatusCode::NOT_FOUND);
    assert!(body_text(venue).await.contains("could not be found"));

    let artist = post_form(&router, "/artists/9999/edit", &bad_form).await;
    assert_eq!(artist.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejected_form_shows_and_clears_pending_flash() {
    let (_, router) = seeded().await;
    let created = post_form(&router, "/venues/create", &blue_note_venue()).await;
    let cookie = flash_cookie(&created);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/venues/create")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .header(COOKIE, cookie)
                .body(Body::from(encode_form(&[("name", "Half Note")])))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().contains("Max-Age=0"));

    let body = body_text(response).await;
    assert!(body.contains("Venue Blue Note was successfully listed!"));
    assert!(body.contains("Please correct the errors below."));
}
