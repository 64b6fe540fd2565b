//! Handler for free-text place lookup.

use axum::{Json, extract::State};
use serde_json::json;

use crate::api::dto::geocode::{GeocodeParams, GeocodeResponse};
use crate::api::extract::ApiQuery;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/geocode?q=`
///
/// Returns `{ "result": null }` when the geocoder has no match or answers
/// with a non-success status.
pub async fn geocode_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GeocodeParams>,
) -> Result<Json<GeocodeResponse>, AppError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::bad_request("q is required", json!({})));
    }

    let result = state.geocoder.geocode(query).await?;
    Ok(Json(GeocodeResponse { result }))
}
