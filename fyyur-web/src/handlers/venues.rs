use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info, warn};

use super::{invalid_form, invalid_form_flash, now, page, parse_id};
use crate::error::WebError;
use crate::flash::{redirect_with_flash, Flash, IncomingFlashes};
use crate::forms::{FormData, VenueForm};
use crate::state::AppState;
use crate::templates::{SearchTemplate, VenueFormTemplate, VenueTemplate, VenuesTemplate};
use crate::views::{SearchResults, VenueDetail};
use fyyur_core::aggregate::group_venues_by_area;

pub async fn list_venues(State(state): State<AppState>, flashes: IncomingFlashes) -> Result<Response, WebError> {
    let venues = state.storage.list_venues().await?;
    let counts = state.storage.upcoming_show_counts_for_venues(now()).await?;

    let template = VenuesTemplate {
        flashes: flashes.0.clone(),
        areas: group_venues_by_area(&venues, &counts),
    };
    page(&template, &flashes)
}

pub async fn search_venues(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let search_term = FormData::new(pairs).get("search_term");
    let matches = state.storage.search_venues(&search_term).await?;
    let counts = state.storage.upcoming_show_counts_for_venues(now()).await?;

    let template = SearchTemplate {
        flashes: flashes.0.clone(),
        kind: "venues",
        results: SearchResults::new(matches.into_iter().map(|v| (v.id, v.name)), &counts),
        search_term,
    };
    page(&template, &flashes)
}

pub async fn show_venue(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let venue_id = parse_id(&raw_id, "Venue")?;
    let venue = state
        .storage
        .get_venue(venue_id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Venue {venue_id}")))?;
    let shows = state.storage.shows_for_venue(venue_id).await?;

    let template = VenueTemplate {
        flashes: flashes.0.clone(),
        venue: VenueDetail::new(venue, shows, now()),
    };
    page(&template, &flashes)
}

pub async fn create_venue_form(flashes: IncomingFlashes) -> Result<Response, WebError> {
    let template = VenueFormTemplate::new("List a new venue", "/venues/create", VenueForm::default(), flashes.0.clone());
    page(&template, &flashes)
}

pub async fn create_venue_submission(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let mut form = VenueForm::from_data(&FormData::new(pairs));
    let Some(new_venue) = form.validate() else {
        info!("Rejected venue submission: {:?}", form.errors.fields());
        let template = VenueFormTemplate::new("List a new venue", "/venues/create", form, invalid_form_flash(&flashes));
        return invalid_form(&template, &flashes);
    };

    let name = new_venue.name.clone();
    match state.storage.create_venue(new_venue).await {
        Ok(venue) => {
            info!("Listed venue {} ({})", venue.id, venue.name);
            Ok(redirect_with_flash(
                "/venues",
                Flash::info(format!("Venue {} was successfully listed!", venue.name)),
            ))
        }
        Err(e) => {
            error!("Failed to list venue {}: {}", name, e);
            Ok(redirect_with_flash(
                "/venues",
                Flash::error(format!("An error occurred. Venue {name} could not be listed.")),
            ))
        }
    }
}

pub async fn edit_venue_form(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let venue_id = parse_id(&raw_id, "Venue")?;
    let venue = state
        .storage
        .get_venue(venue_id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Venue {venue_id}")))?;

    let template = VenueFormTemplate::new(
        format!("Edit venue {}", venue.name),
        format!("/venues/{venue_id}/edit"),
        VenueForm::from_venue(&venue),
        flashes.0.clone(),
    );
    page(&template, &flashes)
}

pub async fn edit_venue_submission(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Path(raw_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let venue_id = parse_id(&raw_id, "Venue")?;
    let current = state
        .storage
        .get_venue(venue_id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Venue {venue_id}")))?;

    let mut form = VenueForm::from_data(&FormData::new(pairs));
    let Some(changes) = form.validate() else {
        let template = VenueFormTemplate::new(
            format!("Edit venue {}", current.name),
            format!("/venues/{venue_id}/edit"),
            form,
            invalid_form_flash(&flashes),
        );
        return invalid_form(&template, &flashes);
    };

    let detail_page = format!("/venues/{venue_id}");
    match state.storage.update_venue(venue_id, changes).await {
        Ok(venue) => {
            info!("Updated venue {}", venue_id);
            Ok(redirect_with_flash(
                &detail_page,
                Flash::info(format!("Venue {} was successfully updated!", venue.name)),
            ))
        }
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            error!("Failed to update venue {}: {}", venue_id, e);
            Ok(redirect_with_flash(
                &detail_page,
                Flash::error("An error occurred. Venue could not be updated."),
            ))
        }
    }
}

/// `DELETE /venues/:id`, answered with `{"success": bool}`.
pub async fn delete_venue(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Ok(venue_id) = parse_id(&raw_id, "Venue") else {
        return (StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response();
    };

    match state.storage.delete_venue(venue_id).await {
        Ok(()) => {
            info!("Deleted venue {}", venue_id);
            Json(json!({ "success": true })).into_response()
        }
        Err(e) if e.is_not_found() => (StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response(),
        Err(e) => {
            error!("Failed to delete venue {}: {}", venue_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false }))).into_response()
        }
    }
}

/// Form-friendly delete used by the button on the venue page.
pub async fn delete_venue_submission(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let venue_id = parse_id(&raw_id, "Venue")?;
    match state.storage.delete_venue(venue_id).await {
        Ok(()) => {
            info!("Deleted venue {}", venue_id);
            Ok(redirect_with_flash("/", Flash::info("Venue was successfully deleted.")))
        }
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            warn!("Failed to delete venue {}: {}", venue_id, e);
            Ok(redirect_with_flash(
                &format!("/venues/{venue_id}"),
                Flash::error("An error occurred. Venue could not be deleted."),
            ))
        }
    }
}
