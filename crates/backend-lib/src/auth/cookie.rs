//! Session cookie encoding.
use axum::http::{header::COOKIE, HeaderMap};
use cookie::{time::Duration, Cookie, SameSite};
use crate::config::Settings;

/// Cookie carrying a freshly issued session token
pub fn session_cookie(settings: &Settings, token: &str) -> Cookie<'static> {
    let max_age = i64::try_from(settings.session_ttl_secs).unwrap_or(i64::MAX);
    Cookie::build((settings.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .secure(settings.production)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age))
        .build()
}

/// Cookie that tells the browser to drop the session cookie
pub fn expired_cookie(settings: &Settings) -> Cookie<'static> {
    let mut cookie = Cookie::build((settings.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .secure(settings.production)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

/// Pull the session token out of the request's `Cookie` headers
pub fn read_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}
