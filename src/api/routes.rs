//! API route configuration.
//!
//! Routers here carry authentication but no rate limiting; limits are applied
//! per group in [`crate::routes::app_router`].

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::handlers::{
    checkout_handler, claim_list_handler, create_claim_handler, create_submission_handler,
    geocode_handler, login_handler, logout_handler, nearby_handler, review_claim_handler,
    review_submission_handler, submission_list_handler, venue_handler, venue_list_handler,
    webhook_handler,
};
use crate::api::middleware::admin_auth;
use crate::state::AppState;

/// Public reads.
///
/// # Endpoints
///
/// - `GET /venues`         - Filtered search
/// - `GET /venues/nearby`  - Radius search with distances
/// - `GET /venues/{id}`    - Single approved venue
/// - `GET /geocode`        - Free-text place lookup
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(venue_list_handler))
        .route("/venues/nearby", get(nearby_handler))
        .route("/venues/{id}", get(venue_handler))
        .route("/geocode", get(geocode_handler))
}

/// Public writers and admin login.
///
/// # Endpoints
///
/// - `POST /submissions`     - Propose a venue
/// - `POST /claims`          - Claim a venue
/// - `POST /stripe/checkout` - Start a paid-listing checkout
/// - `POST /admin/login`     - Exchange the password for a session cookie
pub fn writer_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(create_submission_handler))
        .route("/claims", post(create_claim_handler))
        .route("/stripe/checkout", post(checkout_handler))
        .route("/admin/login", post(login_handler))
}

/// Billing provider callbacks. Authenticated by signature, not rate limited.
///
/// - `POST /stripe/webhook`
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe/webhook", post(webhook_handler))
}

/// Admin endpoints protected by the session cookie.
///
/// # Endpoints
///
/// - `POST /admin/logout`
/// - `GET  /admin/submissions` / `POST /admin/submissions`
/// - `GET  /admin/claims`      / `POST /admin/claims`
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/logout", post(logout_handler))
        .route(
            "/admin/submissions",
            get(submission_list_handler).post(review_submission_handler),
        )
        .route(
            "/admin/claims",
            get(claim_list_handler).post(review_claim_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, admin_auth::layer))
}

/// Every API route without rate limits, for mounting under `/api`.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(writer_routes())
        .merge(webhook_routes())
        .merge(admin_routes(state))
}
