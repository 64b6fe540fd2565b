//! Admin dashboard page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

/// Claims and submissions queues.
///
/// Data is fetched client-side from `/api/admin/claims` and
/// `/api/admin/submissions`; approve/reject buttons post to the same paths.
#[derive(Template, WebTemplate)]
#[template(path = "admin.html")]
pub struct AdminTemplate {}

/// `GET /admin`
pub async fn admin_handler() -> impl IntoResponse {
    AdminTemplate {}
}
