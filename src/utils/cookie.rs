//! Admin session cookie helpers.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

pub const ADMIN_COOKIE: &str = "pwp_admin";

/// `Set-Cookie` value carrying `token` for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{ADMIN_COOKIE}={token}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that expires the session immediately.
pub fn clear_cookie() -> String {
    session_cookie("", 0)
}

/// Reads cookie `name` from every `Cookie` header in `headers`.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value: &HeaderValue| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}
