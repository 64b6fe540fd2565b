//! Top-level router combining API and page routes.
//!
//! # Route Structure
//!
//! - `GET  /health`    - Health check (public)
//! - `/api/*`          - JSON API; `/api/admin/*` requires the admin cookie
//! - `/admin`          - Review dashboard (cookie, redirects to login)
//! - `/admin/login`    - Login page
//! - `/owners/*`       - Checkout return pages
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket; stricter for writers and login
//! - **Authentication** - Signed session cookie for the admin surface
//! - **Path normalization** - Trailing slash handling

use axum::{Router, routing::get};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads the client IP from
///   forwarding headers instead of the peer socket address; enable only when
///   the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = Router::new()
        .merge(api::routes::public_routes().layer(rate_limit::layer(behind_proxy)))
        .merge(api::routes::writer_routes().layer(rate_limit::secure_layer(behind_proxy)))
        .merge(
            api::routes::admin_routes(state.clone()).layer(rate_limit::layer(behind_proxy)),
        )
        .merge(api::routes::webhook_routes());

    let web_router = Router::new()
        .merge(web::routes::admin_routes(state.clone()))
        .merge(web::routes::public_routes())
        .layer(rate_limit::layer(behind_proxy));

    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(web_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// The same routes without rate limiting, tracing or path normalisation.
///
/// For in-process callers that have no peer address to key limits on.
pub fn plain_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::router(state.clone()))
        .merge(web::routes::admin_routes(state.clone()))
        .merge(web::routes::public_routes())
        .with_state(state)
}
