use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, info, warn};

use super::{invalid_form, invalid_form_flash, links, now, page, parse_id};
use crate::error::WebError;
use crate::flash::{redirect_with_flash, Flash, IncomingFlashes};
use crate::forms::{ArtistForm, FormData};
use crate::state::AppState;
use crate::templates::{ArtistFormTemplate, ArtistTemplate, ArtistsTemplate, SearchTemplate};
use crate::views::{ArtistDetail, SearchResults};

pub async fn list_artists(State(state): State<AppState>, flashes: IncomingFlashes) -> Result<Response, WebError> {
    let artists = state.storage.list_artists().await?;

    let template = ArtistsTemplate {
        flashes: flashes.0.clone(),
        artists: links(artists.into_iter().map(|a| (a.id, a.name))),
    };
    page(&template, &flashes)
}

pub async fn search_artists(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let search_term = FormData::new(pairs).get("search_term");
    let matches = state.storage.search_artists(&search_term).await?;
    let counts = state.storage.upcoming_show_counts_for_artists(now()).await?;

    let template = SearchTemplate {
        flashes: flashes.0.clone(),
        kind: "artists",
        results: SearchResults::new(matches.into_iter().map(|a| (a.id, a.name)), &counts),
        search_term,
    };
    page(&template, &flashes)
}

pub async fn show_artist(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let artist_id = parse_id(&raw_id, "Artist")?;
    let artist = state
        .storage
        .get_artist(artist_id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Artist {artist_id}")))?;
    let shows = state.storage.shows_for_artist(artist_id).await?;

    let template = ArtistTemplate {
        flashes: flashes.0.clone(),
        artist: ArtistDetail::new(artist, shows, now()),
    };
    page(&template, &flashes)
}

pub async fn create_artist_form(flashes: IncomingFlashes) -> Result<Response, WebError> {
    let template = ArtistFormTemplate::new("List a new artist", "/artists/create", ArtistForm::default(), flashes.0.clone());
    page(&template, &flashes)
}

pub async fn create_artist_submission(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let mut form = ArtistForm::from_data(&FormData::new(pairs));
    let Some(new_artist) = form.validate() else {
        info!("Rejected artist submission: {:?}", form.errors.fields());
        let template = ArtistFormTemplate::new("List a new artist", "/artists/create", form, invalid_form_flash(&flashes));
        return invalid_form(&template, &flashes);
    };

    let name = new_artist.name.clone();
    match state.storage.create_artist(new_artist).await {
        Ok(artist) => {
            info!("Listed artist {} ({})", artist.id, artist.name);
            Ok(redirect_with_flash(
                "/artists",
                Flash::info(format!("Artist {} was successfully listed!", artist.name)),
            ))
        }
        Err(e) => {
            error!("Failed to list artist {}: {}", name, e);
            Ok(redirect_with_flash(
                "/artists",
                Flash::error(format!("An error occurred. Artist {name} could not be listed.")),
            ))
        }
    }
}

pub async fn edit_artist_form(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let artist_id = parse_id(&raw_id, "Artist")?;
    let artist = state
        .storage
        .get_artist(artist_id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Artist {artist_id}")))?;

    let template = ArtistFormTemplate::new(
        format!("Edit artist {}", artist.name),
        format!("/artists/{artist_id}/edit"),
        ArtistForm::from_artist(&artist),
        flashes.0.clone(),
    );
    page(&template, &flashes)
}

pub async fn edit_artist_submission(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Path(raw_id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let artist_id = parse_id(&raw_id, "Artist")?;
    let current = state
        .storage
        .get_artist(artist_id)
        .await?
        .ok_or_else(|| WebError::not_found(format!("Artist {artist_id}")))?;

    let mut form = ArtistForm::from_data(&FormData::new(pairs));
    let Some(changes) = form.validate() else {
        let template = ArtistFormTemplate::new(
            format!("Edit artist {}", current.name),
            format!("/artists/{artist_id}/edit"),
            form,
            invalid_form_flash(&flashes),
        );
        return invalid_form(&template, &flashes);
    };

    let detail_page = format!("/artists/{artist_id}");
    match state.storage.update_artist(artist_id, changes).await {
        Ok(artist) => {
            info!("Updated artist {}", artist_id);
            Ok(redirect_with_flash(
                &detail_page,
                Flash::info(format!("Artist {} was successfully updated!", artist.name)),
            ))
        }
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            error!("Failed to update artist {}: {}", artist_id, e);
            Ok(redirect_with_flash(
                &detail_page,
                Flash::error("An error occurred. Artist could not be updated."),
            ))
        }
    }
}

/// `DELETE /artists/:id`, answered with `{"success": bool}`.
pub async fn delete_artist(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Ok(artist_id) = parse_id(&raw_id, "Artist") else {
        return (StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response();
    };

    match state.storage.delete_artist(artist_id).await {
        Ok(()) => {
            info!("Deleted artist {}", artist_id);
            Json(json!({ "success": true })).into_response()
        }
        Err(e) if e.is_not_found() => (StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response(),
        Err(e) => {
            error!("Failed to delete artist {}: {}", artist_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "success": false }))).into_response()
        }
    }
}

/// Form-friendly delete used by the button on the artist page.
pub async fn delete_artist_submission(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, WebError> {
    let artist_id = parse_id(&raw_id, "Artist")?;
    match state.storage.delete_artist(artist_id).await {
        Ok(()) => {
            info!("Deleted artist {}", artist_id);
            Ok(redirect_with_flash("/", Flash::info("Artist was successfully deleted.")))
        }
        Err(e) if e.is_not_found() => Err(e.into()),
        Err(e) => {
            warn!("Failed to delete artist {}: {}", artist_id, e);
            Ok(redirect_with_flash(
                &format!("/artists/{artist_id}"),
                Flash::error("An error occurred. Artist could not be deleted."),
            ))
        }
    }
}
