//! Handlers for admin login and the review queues.

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::admin::{
    ClaimItem, ItemsResponse, LoginRequest, OkResponse, ReviewRequest, ReviewResponse,
    SubmissionItem,
};
use crate::api::extract::ApiJson;
use crate::domain::entities::ReviewAction;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookie;

/// Exchanges the admin password for a session cookie.
///
/// # Endpoint
///
/// `POST /api/admin/login` with `{ "password": "..." }`
///
/// # Errors
///
/// - `401` for a missing or wrong password
/// - `500` if `ADMIN_PASSWORD` is not configured
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    let now = chrono::Utc::now().timestamp();
    let token = state.auth_service.login(&payload.password, now)?;

    tracing::info!("admin login");

    let set_cookie = cookie::session_cookie(&token, state.auth_service.ttl_secs());
    Ok(([(SET_COOKIE, set_cookie)], Json(OkResponse::ok())).into_response())
}

/// `POST /api/admin/logout`; always succeeds.
pub async fn logout_handler() -> impl IntoResponse {
    ([(SET_COOKIE, cookie::clear_cookie())], Json(OkResponse::ok()))
}

/// `GET /api/admin/submissions`, newest first.
pub async fn submission_list_handler(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<SubmissionItem>>, AppError> {
    let items = state.review_service.list_submissions(None).await?;
    Ok(Json(ItemsResponse {
        items: items.into_iter().map(SubmissionItem::from).collect(),
    }))
}

/// `GET /api/admin/claims`, newest first, with venue names.
pub async fn claim_list_handler(
    State(state): State<AppState>,
) -> Result<Json<ItemsResponse<ClaimItem>>, AppError> {
    let items = state.review_service.list_claims(None).await?;
    Ok(Json(ItemsResponse {
        items: items.into_iter().map(ClaimItem::from).collect(),
    }))
}

/// `POST /api/admin/submissions` with `{ "id": 1, "action": "approve" | "reject", "reason"? }`
///
/// # Errors
///
/// - `400` for a missing id/action, an unknown action, or approval without coordinates
/// - `404` for an unknown submission
/// - `409` if the submission was already reviewed
pub async fn review_submission_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let (id, action, reason) = parse_review(payload)?;
    let outcome = state
        .review_service
        .review_submission(id, action, reason)
        .await?;
    Ok(Json(outcome.into()))
}

/// `POST /api/admin/claims` with `{ "id": 1, "action": "approve" | "reject", "reason"? }`
///
/// Approval marks the venue claimed by the claimant's email.
pub async fn review_claim_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let (id, action, reason) = parse_review(payload)?;
    let outcome = state.review_service.review_claim(id, action, reason).await?;
    Ok(Json(outcome.into()))
}

fn parse_review(payload: ReviewRequest) -> Result<(i64, ReviewAction, Option<String>), AppError> {
    let (id, action) = match (payload.id, payload.action) {
        (Some(id), Some(action)) if id > 0 && !action.trim().is_empty() => (id, action),
        _ => return Err(AppError::bad_request("Missing id/action", json!({}))),
    };

    let action = action
        .parse::<ReviewAction>()
        .map_err(|e| AppError::bad_request(e, json!({ "action": action })))?;

    Ok((id, action, payload.reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_requires_fields() {
        let missing = ReviewRequest {
            id: Some(1),
            ..ReviewRequest::default()
        };
        assert!(matches!(parse_review(missing), Err(AppError::Validation { .. })));

        let unknown = ReviewRequest {
            id: Some(1),
            action: Some("escalate".to_string()),
            reason: None,
        };
        assert!(matches!(parse_review(unknown), Err(AppError::Validation { .. })));

        let ok = ReviewRequest {
            id: Some(1),
            action: Some("Reject".to_string()),
            reason: Some("dup".to_string()),
        };
        let (id, action, reason) = parse_review(ok).unwrap();
        assert_eq!(id, 1);
        assert_eq!(action, ReviewAction::Reject);
        assert_eq!(reason.as_deref(), Some("dup"));
    }
}
