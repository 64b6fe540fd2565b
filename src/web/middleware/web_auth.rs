//! Cookie-based guard for the admin pages.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Redirect, Response},
};
use url::form_urlencoded;

use crate::state::AppState;
use crate::utils::cookie::{ADMIN_COOKIE, read_cookie};

/// Lets requests with a valid admin session through.
///
/// Unlike [`crate::api::middleware::admin_auth`], which answers `401`, this
/// redirects the browser to `/admin/login?next=<requested path>`.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let now = chrono::Utc::now().timestamp();

    match read_cookie(req.headers(), ADMIN_COOKIE) {
        Some(token) if st.auth_service.verify(&token, now) => Ok(next.run(req).await),
        _ => Err(Redirect::to(&login_redirect(req.uri().path()))),
    }
}

pub fn login_redirect(path: &str) -> String {
    let next: String = form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("/admin/login?next={next}")
}
