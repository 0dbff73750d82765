//! Cookie header helpers
//!
//! Cookies are read straight from the `Cookie` header and written as raw
//! `Set-Cookie` values. Every cookie is scoped to `/` with `SameSite=Lax`.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use axum::response::Response;
use chrono::Duration;
use tracing::warn;

pub const SESSION_COOKIE: &str = "caredesk_session";
pub const FLASH_COOKIE: &str = "caredesk_flash";

/// Value of the first non-empty cookie called `name`
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// `Set-Cookie` value for a login session. Without `max_age` the cookie
/// lasts until the browser closes.
pub fn session_cookie(token: &str, max_age: Option<Duration>, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age.num_seconds()));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn flash_cookie(value: &str) -> String {
    format!("{FLASH_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax")
}

/// Expire `name` immediately
pub fn removal_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub fn append_set_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "Dropping unencodable cookie"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_read_cookie() {
        let h = headers("theme=dark; caredesk_session=abc123; caredesk_flash=");
        assert_eq!(read_cookie(&h, SESSION_COOKIE).as_deref(), Some("abc123"));
        assert_eq!(read_cookie(&h, FLASH_COOKIE), None);
        assert_eq!(read_cookie(&h, "missing"), None);
        assert_eq!(read_cookie(&HeaderMap::new(), SESSION_COOKIE), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let transient = session_cookie("t", None, false);
        assert!(transient.contains("HttpOnly"));
        assert!(!transient.contains("Max-Age"));
        assert!(!transient.contains("Secure"));

        let remembered = session_cookie("t", Some(Duration::days(30)), true);
        assert!(remembered.contains("Max-Age=2592000"));
        assert!(remembered.ends_with("; Secure"));
    }
}
