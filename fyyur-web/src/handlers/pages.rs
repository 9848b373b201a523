use axum::extract::State;
use axum::response::Response;

use super::{links, page};
use crate::error::WebError;
use crate::flash::IncomingFlashes;
use crate::state::AppState;
use crate::templates::HomeTemplate;
use crate::views::ListingLink;

const RECENT_LISTINGS: usize = 10;

/// Newest first; ids grow with insertion order.
fn most_recent(mut links: Vec<ListingLink>) -> Vec<ListingLink> {
    links.sort_by(|a, b| b.id.cmp(&a.id));
    links.truncate(RECENT_LISTINGS);
    links
}

pub async fn index(State(state): State<AppState>, flashes: IncomingFlashes) -> Result<Response, WebError> {
    let venues = state.storage.list_venues().await?;
    let artists = state.storage.list_artists().await?;

    let template = HomeTemplate {
        flashes: flashes.0.clone(),
        recent_venues: most_recent(links(venues.into_iter().map(|v| (v.id, v.name)))),
        recent_artists: most_recent(links(artists.into_iter().map(|a| (a.id, a.name)))),
    };
    page(&template, &flashes)
}
