//! Venue search, nearby lookup and single-venue reads.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{NearbyVenue, Venue};
use crate::domain::repositories::VenueRepository;
use crate::domain::search::{
    self, MAX_RADIUS_M, NEARBY_LIMIT, NearbyQuery, SortMode, VenueFilter,
};
use crate::error::AppError;

/// Read side of the directory.
///
/// The service owns the result ceiling: callers cannot ask for more rows than
/// the configured limit.
pub struct VenueService<R: VenueRepository + ?Sized = dyn VenueRepository> {
    repository: Arc<R>,
    result_limit: i64,
}

impl<R: VenueRepository + ?Sized> VenueService<R> {
    pub fn new(repository: Arc<R>, result_limit: i64) -> Self {
        Self {
            repository,
            result_limit,
        }
    }

    /// Runs a filtered search.
    ///
    /// Ordering and the cap are applied by the datastore, so for
    /// [`SortMode::Nearest`] the closest venues to `filter.origin` are the ones
    /// kept.
    pub async fn search(&self, mut filter: VenueFilter) -> Result<Vec<Venue>, AppError> {
        filter.limit = self.result_limit;

        let venues = self.repository.search(&filter).await?;

        tracing::debug!(
            sort = %filter.sort,
            region = %filter.region,
            count = venues.len(),
            "venue search"
        );

        Ok(venues)
    }

    /// Calls the nearby procedure and orders its rows featured-first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid center or a radius
    /// outside `(0, 50000]` meters.
    pub async fn nearby(
        &self,
        mut query: NearbyQuery,
        sort: SortMode,
    ) -> Result<Vec<NearbyVenue>, AppError> {
        if !query.center.is_valid() {
            return Err(AppError::bad_request(
                "Invalid coordinates",
                json!({ "lat": query.center.lat, "lng": query.center.lng }),
            ));
        }
        if !(query.radius_m > 0.0 && query.radius_m <= MAX_RADIUS_M) {
            return Err(AppError::bad_request(
                "radius_m must be greater than 0 and at most 50000",
                json!({ "radius_m": query.radius_m }),
            ));
        }
        query.limit = NEARBY_LIMIT;

        let mut rows = self.repository.nearby(&query).await?;
        search::sort_nearby(&mut rows, sort);

        Ok(rows)
    }

    /// Returns a publicly listed venue.
    ///
    /// Unapproved venues are reported as not found.
    pub async fn get_public(&self, id: i64) -> Result<Venue, AppError> {
        match self.repository.find_by_id(id).await? {
            Some(venue) if venue.approved => Ok(venue),
            _ => Err(AppError::not_found("Venue not found", json!({ "id": id }))),
        }
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
