//! Repository trait for venue claim requests.

use crate::domain::entities::{Claim, ClaimWithVenue, NewClaim, ReviewStatus};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    /// Inserts one `pending` claim.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the venue does not exist.
    async fn create(&self, new_claim: NewClaim) -> Result<Claim, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Claim>, AppError>;

    /// Newest first, joined with the venue name, at most `limit` rows,
    /// optionally only those in `status`.
    async fn list(
        &self,
        status: Option<ReviewStatus>,
        limit: i64,
    ) -> Result<Vec<ClaimWithVenue>, AppError>;

    /// Sets `claimed = true` and `owner_email` on the venue and marks the claim
    /// `approved` in one transaction.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the venue no longer exists; the claim stays pending.
    /// - [`AppError::Conflict`] if the claim is no longer pending.
    async fn approve(&self, claim: &Claim) -> Result<Claim, AppError>;

    /// Marks a pending claim `rejected` with an optional reason.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the claim is no longer pending.
    async fn reject(&self, id: i64, reason: Option<String>) -> Result<Claim, AppError>;
}
