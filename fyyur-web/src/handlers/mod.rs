pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Local, NaiveDateTime};

use crate::error::WebError;
use crate::flash::{self, Flash, IncomingFlashes};
use crate::views::ListingLink;

/// Wall-clock time shows are compared against. Start times are entered as
/// local times, so this is local too.
pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Path ids that are not positive integers are treated as missing pages.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<i64, WebError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| WebError::not_found(format!("{entity} {raw}")))
}

/// Renders a page and clears the flash cookie if the request carried messages.
pub(crate) fn page<T: Template>(template: &T, incoming: &IncomingFlashes) -> Result<Response, WebError> {
    page_with_status(StatusCode::OK, template, incoming)
}

pub(crate) fn page_with_status<T: Template>(
    status: StatusCode,
    template: &T,
    incoming: &IncomingFlashes,
) -> Result<Response, WebError> {
    let mut response = (status, Html(template.render()?)).into_response();
    flash::consume(&mut response, &incoming.0);
    Ok(response)
}

/// Re-rendered form after a failed submission. Messages the request carried
/// are shown alongside the form errors, so the cookie is cleared here too.
pub(crate) fn invalid_form<T: Template>(template: &T, incoming: &IncomingFlashes) -> Result<Response, WebError> {
    page_with_status(StatusCode::UNPROCESSABLE_ENTITY, template, incoming)
}

pub(crate) fn invalid_form_flash(incoming: &IncomingFlashes) -> Vec<Flash> {
    let mut flashes = incoming.0.clone();
    flashes.push(Flash::error("Please correct the errors below."));
    flashes
}

pub(crate) fn links<I>(items: I) -> Vec<ListingLink>
where
    I: IntoIterator<Item = (i64, String)>,
{
    items
        .into_iter()
        .map(|(id, name)| ListingLink { id, name })
        .collect()
}
