//! Page route configuration.

use axum::{Router, middleware, routing::get};

use crate::state::AppState;
use crate::web::handlers::{
    admin_handler, login_handler, owners_cancel_handler, owners_success_handler,
};
use crate::web::middleware::web_auth;

/// Admin pages behind the session guard.
///
/// # Endpoints
///
/// - `GET /admin` - review dashboard
pub fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_handler))
        .route_layer(middleware::from_fn_with_state(state, web_auth::layer))
}

/// Pages without authentication.
///
/// # Endpoints
///
/// - `GET /admin/login` - password form
/// - `GET /owners/success` - checkout completed
/// - `GET /owners/cancel` - checkout abandoned
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_handler))
        .route("/owners/success", get(owners_success_handler))
        .route("/owners/cancel", get(owners_cancel_handler))
}
