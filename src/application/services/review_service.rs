//! Admin review workflow for submissions and claims.
//!
//! Both row kinds follow the same state machine: `pending` may move to
//! `approved` or `rejected`, and nothing moves out of a terminal state. The
//! service rejects non-pending rows up front; the repositories repeat the
//! check inside their UPDATE so two concurrent approvals cannot both win.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{
    ClaimWithVenue, ReviewAction, ReviewStatus, Submission,
};
use crate::domain::repositories::{ClaimRepository, SubmissionRepository};
use crate::error::AppError;

/// Row cap for admin list views.
pub const ADMIN_LIST_LIMIT: i64 = 200;

/// Result of a successful review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
    pub id: i64,
    pub status: String,
    /// Venue created or updated by the approval, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<i64>,
}

pub struct ReviewService<
    S: SubmissionRepository + ?Sized = dyn SubmissionRepository,
    C: ClaimRepository + ?Sized = dyn ClaimRepository,
> {
    submissions: Arc<S>,
    claims: Arc<C>,
}

impl<S, C> ReviewService<S, C>
where
    S: SubmissionRepository + ?Sized,
    C: ClaimRepository + ?Sized,
{
    pub fn new(submissions: Arc<S>, claims: Arc<C>) -> Self {
        Self {
            submissions,
            claims,
        }
    }

    /// Newest submissions, all of them or only those in `status`.
    pub async fn list_submissions(
        &self,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<Submission>, AppError> {
        self.submissions.list(status, ADMIN_LIST_LIMIT).await
    }

    pub async fn list_claims(
        &self,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<ClaimWithVenue>, AppError> {
        self.claims.list(status, ADMIN_LIST_LIMIT).await
    }

    /// Applies `action` to a submission.
    ///
    /// Approval requires coordinates and upserts the venue
    /// `manual/<submission-id>`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown id.
    /// - [`AppError::Conflict`] if the submission was already reviewed.
    /// - [`AppError::Validation`] when approving a submission without coordinates.
    pub async fn review_submission(
        &self,
        id: i64,
        action: ReviewAction,
        reason: Option<String>,
    ) -> Result<ReviewOutcome, AppError> {
        let submission = self
            .submissions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Submission not found", json!({ "id": id })))?;

        ensure_pending("Submission", id, submission.status)?;

        match action {
            ReviewAction::Approve => {
                if submission.coordinates().is_none() {
                    return Err(AppError::bad_request(
                        "Submission has no coordinates; add lat/lng before approving",
                        json!({ "id": id }),
                    ));
                }

                let venue = self.submissions.approve(&submission).await?;
                tracing::info!(
                    submission_id = id,
                    venue_id = venue.id,
                    external_id = ?venue.external_id,
                    "submission approved"
                );

                Ok(ReviewOutcome {
                    id,
                    status: ReviewStatus::Approved.to_string(),
                    venue_id: Some(venue.id),
                })
            }
            ReviewAction::Reject => {
                let rejected = self.submissions.reject(id, clean_reason(reason)).await?;
                tracing::info!(submission_id = id, "submission rejected");

                Ok(ReviewOutcome {
                    id,
                    status: rejected.status.to_string(),
                    venue_id: None,
                })
            }
        }
    }

    /// Applies `action` to a claim.
    ///
    /// Approval marks the venue claimed by the claimant's email.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown claim, or a venue that no longer exists.
    /// - [`AppError::Conflict`] if the claim was already reviewed.
    pub async fn review_claim(
        &self,
        id: i64,
        action: ReviewAction,
        reason: Option<String>,
    ) -> Result<ReviewOutcome, AppError> {
        let claim = self
            .claims
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Claim not found", json!({ "id": id })))?;

        ensure_pending("Claim", id, claim.status)?;

        let reviewed = match action {
            ReviewAction::Approve => self.claims.approve(&claim).await?,
            ReviewAction::Reject => self.claims.reject(id, clean_reason(reason)).await?,
        };

        tracing::info!(
            claim_id = id,
            venue_id = claim.venue_id,
            status = %reviewed.status,
            "claim reviewed"
        );

        Ok(ReviewOutcome {
            id,
            status: reviewed.status.to_string(),
            venue_id: matches!(action, ReviewAction::Approve).then_some(claim.venue_id),
        })
    }
}

fn ensure_pending(kind: &str, id: i64, status: ReviewStatus) -> Result<(), AppError> {
    if status.is_pending() {
        Ok(())
    } else {
        Err(AppError::conflict(
            format!("{kind} has already been reviewed"),
            json!({ "id": id, "status": status.as_str() }),
        ))
    }
}

fn clean_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}
