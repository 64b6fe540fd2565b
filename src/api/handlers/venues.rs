//! Handlers for public venue reads.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::venues::{
    NearbyParams, NearbyVenueDto, VenueDto, VenueListParams, VenueListResponse, VenueResponse,
};
use crate::api::extract::ApiQuery;
use crate::error::AppError;
use crate::state::AppState;

/// Searches approved venues.
///
/// # Endpoint
///
/// `GET /api/venues?q&city&region&sort&lat&lng&<facility flags>&any_kids`
///
/// # Response
///
/// ```json
/// { "venues": [ { "id": 1, "name": "The Local", "playground": true, ... } ] }
/// ```
///
/// # Errors
///
/// - `400` for an unknown `region` or `sort`, or a malformed position
pub async fn venue_list_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<VenueListParams>,
) -> Result<Json<VenueListResponse<VenueDto>>, AppError> {
    let filter = params.into_filter()?;
    let venues = state.venue_service.search(filter).await?;

    Ok(Json(VenueListResponse {
        venues: venues.into_iter().map(VenueDto::from).collect(),
    }))
}

/// Venues within a radius, annotated with distances.
///
/// # Endpoint
///
/// `GET /api/venues/nearby?lat&lng&radius_m&venue_type&near_playground&sort`
pub async fn nearby_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NearbyParams>,
) -> Result<Json<VenueListResponse<NearbyVenueDto>>, AppError> {
    let (query, sort) = params.into_query()?;
    let rows = state.venue_service.nearby(query, sort).await?;

    Ok(Json(VenueListResponse {
        venues: rows.into_iter().map(NearbyVenueDto::from).collect(),
    }))
}

/// `GET /api/venues/{id}`; unapproved venues are `404`.
pub async fn venue_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VenueResponse>, AppError> {
    let venue = state.venue_service.get_public(id).await?;
    Ok(Json(VenueResponse {
        venue: venue.into(),
    }))
}
