//! PostgreSQL implementation of the claim repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{CLAIM_COLUMNS, ClaimRow, ClaimWithVenueRow};
use crate::domain::entities::{Claim, ClaimWithVenue, NewClaim, ReviewStatus};
use crate::domain::repositories::ClaimRepository;
use crate::error::AppError;

pub struct PgClaimRepository {
    pool: Arc<PgPool>,
}

impl PgClaimRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn already_reviewed(id: i64) -> AppError {
    AppError::conflict("Claim has already been reviewed", json!({ "id": id }))
}

#[async_trait]
impl ClaimRepository for PgClaimRepository {
    async fn create(&self, c: NewClaim) -> Result<Claim, AppError> {
        let sql = format!(
            "INSERT INTO venue_claim_requests (venue_id, claimant_email, claimant_message, status) \
             VALUES ($1, $2, $3, 'pending') \
             RETURNING {CLAIM_COLUMNS}"
        );

        let row: ClaimRow = sqlx::query_as(&sql)
            .bind(c.venue_id)
            .bind(c.claimant_email)
            .bind(c.claimant_message)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Claim>, AppError> {
        let sql = format!("SELECT {CLAIM_COLUMNS} FROM venue_claim_requests WHERE id = $1");

        let row: Option<ClaimRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Claim::try_from).transpose()
    }

    async fn list(
        &self,
        status: Option<ReviewStatus>,
        limit: i64,
    ) -> Result<Vec<ClaimWithVenue>, AppError> {
        let rows: Vec<ClaimWithVenueRow> = sqlx::query_as(
            "SELECT c.id, c.venue_id, c.claimant_email, c.claimant_message, c.status, \
                    c.reviewer_notes, c.reviewed_at, c.created_at, v.name AS venue_name \
             FROM venue_claim_requests c \
             LEFT JOIN venues v ON v.id = c.venue_id \
             WHERE ($1::text IS NULL OR c.status = $1) \
             ORDER BY c.created_at DESC, c.id DESC \
             LIMIT $2",
        )
        .bind(status.map(ReviewStatus::as_str))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(ClaimWithVenue::try_from).collect()
    }

    async fn approve(&self, claim: &Claim) -> Result<Claim, AppError> {
        let mut tx = self.pool.begin().await?;

        let venue = sqlx::query(
            "UPDATE venues SET claimed = TRUE, owner_email = $2, updated_at = now() WHERE id = $1",
        )
        .bind(claim.venue_id)
        .bind(&claim.claimant_email)
        .execute(&mut *tx)
        .await?;

        if venue.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(
                "Venue not found",
                json!({ "venue_id": claim.venue_id }),
            ));
        }

        let sql = format!(
            "UPDATE venue_claim_requests \
             SET status = 'approved', reviewer_notes = NULL, reviewed_at = now() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {CLAIM_COLUMNS}"
        );

        let row: Option<ClaimRow> = sqlx::query_as(&sql)
            .bind(claim.id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(already_reviewed(claim.id));
        };

        tx.commit().await?;

        row.try_into()
    }

    async fn reject(&self, id: i64, reason: Option<String>) -> Result<Claim, AppError> {
        let sql = format!(
            "UPDATE venue_claim_requests \
             SET status = 'rejected', reviewer_notes = $2, reviewed_at = now() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING {CLAIM_COLUMNS}"
        );

        let row: Option<ClaimRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(reason)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.ok_or_else(|| already_reviewed(id))?.try_into()
    }
}
