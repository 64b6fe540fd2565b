//! Geocoding contract.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;

/// Best match for a place name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    /// Human-readable name as returned by the lookup service.
    pub display: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeocodingGateway: Send + Sync {
    /// Resolves `query` to at most one result.
    ///
    /// `Ok(None)` means the place could not be located, including when the
    /// lookup service answered with a non-success status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] when the service cannot be reached.
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, AppError>;
}
