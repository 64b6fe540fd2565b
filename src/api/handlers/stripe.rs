//! Handlers for paid-listing checkout and billing webhooks.

use axum::{Json, body::Bytes, extract::State, http::HeaderMap};

use crate::api::dto::billing::{CheckoutBody, CheckoutResponse, WebhookAck};
use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Starts a hosted subscription checkout for a venue.
///
/// # Endpoint
///
/// `POST /api/stripe/checkout` with `{ "venue_id": 1, "plan": "featured_monthly", "email": "..." }`
///
/// # Response
///
/// `{ "url": "https://checkout.stripe.com/..." }`
///
/// # Errors
///
/// - `400` for missing fields, an unknown plan or a bad email
/// - `404` for an unknown venue
/// - `500` when billing is not configured, or the provider call fails
pub async fn checkout_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CheckoutBody>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let session = state.billing_service.create_checkout(payload.into()).await?;
    Ok(Json(CheckoutResponse { url: session.url }))
}

/// Receives a signed billing event.
///
/// # Endpoint
///
/// `POST /api/stripe/webhook` with the raw event body and a
/// `Stripe-Signature` header.
///
/// Verified events are acknowledged with `{ "received": true }` whether they
/// were applied, skipped or ignored. Signature failures are `400`;
/// processing failures are `500` so the provider redelivers.
pub async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    state.billing_service.handle_webhook(&body, signature).await?;

    Ok(Json(WebhookAck { received: true }))
}
