use axum::extract::{Form, State};
use axum::response::Response;
use fyyur_core::FyyurError;
use tracing::{error, info};

use super::{invalid_form, invalid_form_flash, links, now, page};
use crate::error::WebError;
use crate::flash::{redirect_with_flash, Flash, IncomingFlashes};
use crate::forms::{FormData, ShowForm};
use crate::state::AppState;
use crate::templates::{ShowFormTemplate, ShowsTemplate};
use crate::views::{ListingLink, ShowRow};

pub async fn list_shows(State(state): State<AppState>, flashes: IncomingFlashes) -> Result<Response, WebError> {
    let shows = state.storage.list_shows().await?;

    let template = ShowsTemplate {
        flashes: flashes.0.clone(),
        shows: shows.into_iter().map(ShowRow::from).collect(),
    };
    page(&template, &flashes)
}

/// Venue and artist choices for the show form's selects.
async fn choices(state: &AppState) -> Result<(Vec<ListingLink>, Vec<ListingLink>), WebError> {
    let venues = state.storage.list_venues().await?;
    let artists = state.storage.list_artists().await?;
    Ok((
        links(venues.into_iter().map(|v| (v.id, v.name))),
        links(artists.into_iter().map(|a| (a.id, a.name))),
    ))
}

pub async fn create_show_form(State(state): State<AppState>, flashes: IncomingFlashes) -> Result<Response, WebError> {
    let (venues, artists) = choices(&state).await?;
    let template = ShowFormTemplate::new(ShowForm::starting_at(now()), venues, artists, flashes.0.clone());
    page(&template, &flashes)
}

pub async fn create_show_submission(
    State(state): State<AppState>,
    flashes: IncomingFlashes,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, WebError> {
    let mut form = ShowForm::from_data(&FormData::new(pairs));
    let Some(new_show) = form.validate() else {
        let (venues, artists) = choices(&state).await?;
        let template = ShowFormTemplate::new(form, venues, artists, invalid_form_flash(&flashes));
        return invalid_form(&template, &flashes);
    };

    match state.storage.create_show(new_show).await {
        Ok(show) => {
            info!("Listed show {} (venue {}, artist {})", show.id, show.venue_id, show.artist_id);
            Ok(redirect_with_flash("/shows", Flash::info("Show was successfully listed!")))
        }
        Err(FyyurError::InvalidReference { entity, id }) => {
            info!("Rejected show for missing {} {}", entity, id);
            form.reject_reference(entity);
            let (venues, artists) = choices(&state).await?;
            let template = ShowFormTemplate::new(form, venues, artists, invalid_form_flash(&flashes));
            invalid_form(&template, &flashes)
        }
        Err(e) => {
            error!("Failed to list show: {}", e);
            Ok(redirect_with_flash(
                "/shows",
                Flash::error("An error occurred. Show could not be listed."),
            ))
        }
    }
}
