//! Repository trait for venue submissions.

use crate::domain::entities::{NewSubmission, ReviewStatus, Submission, Venue};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Inserts one `pending` submission.
    async fn create(&self, new_submission: NewSubmission) -> Result<Submission, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Submission>, AppError>;

    /// Newest first, at most `limit` rows, optionally only those in `status`.
    async fn list(
        &self,
        status: Option<ReviewStatus>,
        limit: i64,
    ) -> Result<Vec<Submission>, AppError>;

    /// Upserts the venue keyed by [`Submission::venue_external_id`] and marks
    /// the submission `approved`, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the submission is no longer pending.
    /// Nothing is written in that case.
    async fn approve(&self, submission: &Submission) -> Result<Venue, AppError>;

    /// Marks a pending submission `rejected` with an optional reason.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the submission is no longer pending.
    async fn reject(&self, id: i64, reason: Option<String>) -> Result<Submission, AppError>;
}
