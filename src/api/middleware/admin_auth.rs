//! Admin session guard for the JSON API.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookie::{ADMIN_COOKIE, read_cookie};

/// Requires a valid `pwp_admin` session cookie.
///
/// # Errors
///
/// Returns `401 Unauthorized` if the cookie is missing, malformed, forged or
/// older than the session lifetime.
///
/// # Example
///
/// ```rust,ignore
/// let admin = Router::new()
///     .route("/admin/claims", get(claim_list_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let now = chrono::Utc::now().timestamp();

    match read_cookie(req.headers(), ADMIN_COOKIE) {
        Some(token) if st.auth_service.verify(&token, now) => Ok(next.run(req).await),
        _ => Err(AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Admin session is missing or expired" }),
        )),
    }
}
