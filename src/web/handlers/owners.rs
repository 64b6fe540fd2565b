//! Checkout return pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

#[derive(Template, WebTemplate)]
#[template(path = "owners_result.html")]
pub struct OwnersResultTemplate {
    pub heading: &'static str,
    pub message: &'static str,
}

/// `GET /owners/success`: the provider redirects here after payment.
pub async fn owners_success_handler() -> impl IntoResponse {
    OwnersResultTemplate {
        heading: "Thanks, you're all set",
        message: "Your listing upgrade is being applied. It can take a minute to show in search results.",
    }
}

/// `GET /owners/cancel`
pub async fn owners_cancel_handler() -> impl IntoResponse {
    OwnersResultTemplate {
        heading: "Checkout cancelled",
        message: "No payment was taken. You can upgrade your listing at any time.",
    }
}
