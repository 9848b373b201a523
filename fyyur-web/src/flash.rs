//! One-shot messages carried across a redirect.
//!
//! Messages travel in the `fyyur_flash` cookie as `<level>:<hex>` entries
//! separated by `.`, and are cleared by the next page that renders them.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "fyyur_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl Level {
    fn code(self) -> char {
        match self {
            Level::Info => 'i',
            Level::Error => 'e',
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "i" => Some(Level::Info),
            "e" => Some(Level::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// CSS class for the alert box.
    pub fn css_class(&self) -> &'static str {
        match self.level {
            Level::Info => "alert-info",
            Level::Error => "alert-danger",
        }
    }
}

pub fn encode(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| format!("{}:{}", f.level.code(), hex::encode(f.message.as_bytes())))
        .collect::<Vec<_>>()
        .join(".")
}

/// Entries that fail to decode are skipped.
pub fn decode(raw: &str) -> Vec<Flash> {
    raw.split('.')
        .filter_map(|entry| {
            let (code, payload) = entry.split_once(':')?;
            let level = Level::from_code(code)?;
            let bytes = hex::decode(payload).ok()?;
            let message = String::from_utf8(bytes).ok()?;
            Some(Flash { level, message })
        })
        .collect()
}

fn cookie_value(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn set_cookie(flashes: &[Flash]) -> HeaderValue {
    let cookie = format!("{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", encode(flashes));
    // hex and fixed ASCII only
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_cookie())
}

pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("fyyur_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Flash messages sent with the current request.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlashes(pub Vec<Flash>);

#[async_trait]
impl<S> FromRequestParts<S> for IncomingFlashes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(cookie_value(&parts.headers).map(|raw| decode(&raw)).unwrap_or_default()))
    }
}

/// See-other redirect that leaves `flash` for the next page.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    response.headers_mut().append(SET_COOKIE, set_cookie(&[flash]));
    response
}

/// Clears the cookie on `response` once its messages have been shown.
pub fn consume(response: &mut Response, shown: &[Flash]) {
    if !shown.is_empty() {
        response.headers_mut().append(SET_COOKIE, clear_cookie());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_messages_survive_cookie_transport() {
        let flashes = vec![
            Flash::info("Venue The Musical Hop was successfully listed!"),
            Flash::error("An error occurred; Artist Ünïcode could not be listed."),
        ];
        let raw = encode(&flashes);
        assert!(raw.chars().all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '.'));
        assert_eq!(decode(&raw), flashes);
    }

    #[test]
    fn garbage_entries_are_dropped() {
        let raw = format!("x:00.e:zz.i:{}", hex::encode("ok"));
        assert_eq!(decode(&raw), vec![Flash::info("ok")]);
        assert!(decode("").is_empty());
    }

    #[test]
    fn cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {FLASH_COOKIE}={}", encode(&[Flash::info("hi")]))).unwrap(),
        );
        let value = cookie_value(&headers).unwrap();
        assert_eq!(decode(&value), vec![Flash::info("hi")]);
    }

    #[test]
    fn redirect_sets_cookie_and_location() {
        let response = redirect_with_flash("/venues", Flash::info("done"));
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/venues");
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("fyyur_flash=i:"));
    }
}
