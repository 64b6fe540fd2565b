//! Handlers for public submissions and claims.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::intake::{ClaimRequest, CreatedResponse, SubmissionRequest};
use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

/// Proposes a new venue for review.
///
/// # Endpoint
///
/// `POST /api/submissions`
///
/// # Request Body
///
/// ```json
/// { "name": "Test Tavern", "address": "1 Test St", "lat": -27.4, "lng": 153.0 }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": 17, "status": "pending" }`.
pub async fn create_submission_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmissionRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    payload.validate()?;

    let submission = state.intake_service.submit(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(submission.id, submission.status)),
    ))
}

/// Asks to take ownership of a listed venue.
///
/// # Endpoint
///
/// `POST /api/claims`
///
/// # Errors
///
/// - `400` for a missing venue id or an invalid email
/// - `404` if the venue does not exist
pub async fn create_claim_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ClaimRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    payload.validate()?;

    let claim = state.intake_service.claim(payload.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(claim.id, claim.status)),
    ))
}
