//! Repository trait for venue reads and entitlement flag writes.

use crate::domain::entities::{NearbyVenue, Venue};
use crate::domain::search::{NearbyQuery, VenueFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Venue access.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVenueRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Runs one filtered, ordered, capped read over approved venues.
    ///
    /// Ordering follows `filter.sort`; distance ordering is left to the caller.
    async fn search(&self, filter: &VenueFilter) -> Result<Vec<Venue>, AppError>;

    /// Invokes the nearby procedure. Rows come back in no guaranteed order.
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyVenue>, AppError>;

    /// Finds a venue regardless of approval state.
    async fn find_by_id(&self, id: i64) -> Result<Option<Venue>, AppError>;

    /// Sets `is_featured`. Returns `false` when the venue does not exist.
    async fn set_featured(&self, id: i64, featured: bool) -> Result<bool, AppError>;

    /// Sets `claimed`. Returns `false` when the venue does not exist.
    async fn set_claimed(&self, id: i64, claimed: bool) -> Result<bool, AppError>;

    /// Connectivity check used by `GET /health`.
    async fn ping(&self) -> Result<(), AppError>;
}
