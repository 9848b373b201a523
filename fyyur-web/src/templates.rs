use askama::Template;
use fyyur_core::aggregate::Area;

use crate::flash::Flash;
use crate::forms::{ArtistForm, SelectOption, ShowForm, VenueForm};
use crate::views::{ArtistDetail, ListingLink, SearchResults, ShowRow, VenueDetail};

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flashes: Vec<Flash>,
    pub recent_venues: Vec<ListingLink>,
    pub recent_artists: Vec<ListingLink>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub flashes: Vec<Flash>,
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueTemplate {
    pub flashes: Vec<Flash>,
    pub venue: VenueDetail,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub flashes: Vec<Flash>,
    pub artists: Vec<ListingLink>,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistTemplate {
    pub flashes: Vec<Flash>,
    pub artist: ArtistDetail,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub flashes: Vec<Flash>,
    pub shows: Vec<ShowRow>,
}

/// Search results for venues or artists; `kind` is the URL segment.
#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub flashes: Vec<Flash>,
    pub kind: &'static str,
    pub search_term: String,
    pub results: SearchResults,
}

#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormTemplate {
    pub flashes: Vec<Flash>,
    pub title: String,
    pub action: String,
    pub form: VenueForm,
    pub state_options: Vec<SelectOption>,
    pub genre_options: Vec<SelectOption>,
}

impl VenueFormTemplate {
    pub fn new(title: impl Into<String>, action: impl Into<String>, form: VenueForm, flashes: Vec<Flash>) -> Self {
        Self {
            state_options: crate::forms::state_options(&form.state),
            genre_options: crate::forms::genre_options(&form.genres),
            flashes,
            title: title.into(),
            action: action.into(),
            form,
        }
    }
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormTemplate {
    pub flashes: Vec<Flash>,
    pub title: String,
    pub action: String,
    pub form: ArtistForm,
    pub state_options: Vec<SelectOption>,
    pub genre_options: Vec<SelectOption>,
}

impl ArtistFormTemplate {
    pub fn new(title: impl Into<String>, action: impl Into<String>, form: ArtistForm, flashes: Vec<Flash>) -> Self {
        Self {
            state_options: crate::forms::state_options(&form.state),
            genre_options: crate::forms::genre_options(&form.genres),
            flashes,
            title: title.into(),
            action: action.into(),
            form,
        }
    }
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct ShowFormTemplate {
    pub flashes: Vec<Flash>,
    pub form: ShowForm,
    pub venue_options: Vec<SelectOption>,
    pub artist_options: Vec<SelectOption>,
}

impl ShowFormTemplate {
    pub fn new(form: ShowForm, venues: Vec<ListingLink>, artists: Vec<ListingLink>, flashes: Vec<Flash>) -> Self {
        Self {
            venue_options: id_options(venues, &form.venue_id),
            artist_options: id_options(artists, &form.artist_id),
            flashes,
            form,
        }
    }
}

fn id_options(links: Vec<ListingLink>, selected: &str) -> Vec<SelectOption> {
    links
        .into_iter()
        .map(|link| {
            let value = link.id.to_string();
            SelectOption {
                selected: value == selected,
                label: format!("{} (#{})", link.name, link.id),
                value,
            }
        })
        .collect()
}

#[derive(Template, Default)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub flashes: Vec<Flash>,
}

#[derive(Template, Default)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub flashes: Vec<Flash>,
}
