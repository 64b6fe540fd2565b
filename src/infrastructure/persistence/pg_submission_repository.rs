//! PostgreSQL implementation of the submission repository.
//!
//! Approval writes the venue and the submission status in one transaction.
//! The status UPDATE is guarded by `status = 'pending'`; when it matches no
//! row the transaction is rolled back and the venue upsert is discarded.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{SUBMISSION_COLUMNS, SubmissionRow, VENUE_COLUMNS, VenueRow};
use crate::domain::entities::{DEFAULT_VENUE_TYPE, NewSubmission, ReviewStatus, Submission, Venue};
use crate::domain::repositories::SubmissionRepository;
use crate::error::AppError;

pub struct PgSubmissionRepository {
    pool: Arc<PgPool>,
}

impl PgSubmissionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn already_reviewed(id: i64) -> AppError {
    AppError::conflict("Submission has already been reviewed", json!({ "id": id }))
}

#[async_trait]
impl SubmissionRepository for PgSubmissionRepository {
    async fn create(&self, s: NewSubmission) -> Result<Submission, AppError> {
        let sql = format!(
            "INSERT INTO venue_submissions \
             (submitted_name, submitted_venue_type, submitted_address, submitted_notes, \
              submitted_website, submitted_phone, submitted_email, submitted_lat, submitted_lng, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending') \
             RETURNING {SUBMISSION_COLUMNS}"
        );

        let row: SubmissionRow = sqlx::query_as(&sql)
            .bind(s.name)
            .bind(s.venue_type)
            .bind(s.address)
            .bind(s.notes)
            .bind(s.website)
            .bind(s.phone)
            .bind(s.contact_email)
            .bind(s.lat)
            .bind(s.lng)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Submission>, AppError> {
        let sql = format!("SELECT {SUBMISSION_COLUMNS} FROM venue_submissions WHERE id = $1");

        let row: Option<SubmissionRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Submission::try_from).transpose()
    }

    async fn list(
        &self,
        status: Option<ReviewStatus>,
        limit: i64,
    ) -> Result<Vec<Submission>, AppError> {
        let sql = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM venue_submissions \
             WHERE ($1::text IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC LIMIT $2"
        );

        let rows: Vec<SubmissionRow> = sqlx::query_as(&sql)
            .bind(status.map(ReviewStatus::as_str))
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(Submission::try_from).collect()
    }

    async fn approve(&self, submission: &Submission) -> Result<Venue, AppError> {
        let (lat, lng) = submission.coordinates().ok_or_else(|| {
            AppError::bad_request(
                "Submission has no coordinates; add lat/lng before approving",
                json!({ "id": submission.id }),
            )
        })?;

        let mut tx = self.pool.begin().await?;

        let upsert = format!(
            "INSERT INTO venues \
             (external_id, name, venue_type, address, notes, website, phone, lat, lng, approved) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE) \
             ON CONFLICT (external_id) DO UPDATE SET \
               name = EXCLUDED.name, venue_type = EXCLUDED.venue_type, \
               address = EXCLUDED.address, notes = EXCLUDED.notes, \
               website = EXCLUDED.website, phone = EXCLUDED.phone, \
               lat = EXCLUDED.lat, lng = EXCLUDED.lng, approved = TRUE, updated_at = now() \
             RETURNING {VENUE_COLUMNS}"
        );

        let venue: VenueRow = sqlx::query_as(&upsert)
            .bind(submission.venue_external_id())
            .bind(&submission.submitted_name)
            .bind(
                submission
                    .submitted_venue_type
                    .as_deref()
                    .unwrap_or(DEFAULT_VENUE_TYPE),
            )
            .bind(&submission.submitted_address)
            .bind(&submission.submitted_notes)
            .bind(&submission.submitted_website)
            .bind(&submission.submitted_phone)
            .bind(lat)
            .bind(lng)
            .fetch_one(&mut *tx)
            .await?;

        let result = sqlx::query(
            "UPDATE venue_submissions \
             SET status = 'approved', reviewer_notes = NULL, reviewed_at = now() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(submission.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(already_reviewed(submission.id));
        }

        tx.commit().await?;

        Ok(venue.into())
    }

    async fn reject(&self, id: i64, reason: Option<String>) -> Result<Submission, AppError> {
        let sql = format!(
            "UPDATE venue_submissions \
             SET status = 'rejected', reviewer_notes = $2, reviewed_at = now() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {SUBMISSION_COLUMNS}"
        );

        let row: Option<SubmissionRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(reason)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.ok_or_else(|| already_reviewed(id))?.try_into()
    }
}
