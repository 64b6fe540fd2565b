//! PostgreSQL implementation of the subscription repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{SUBSCRIPTION_COLUMNS, SubscriptionRow};
use crate::domain::entities::{Subscription, SubscriptionUpsert};
use crate::domain::repositories::SubscriptionRepository;
use crate::error::AppError;

/// Subscriptions keyed by `stripe_subscription_id`.
///
/// The upsert relies on the unique constraint for per-row serialization.
/// Concurrent deliveries for one subscription race here and the last one wins.
pub struct PgSubscriptionRepository {
    pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn upsert(&self, u: SubscriptionUpsert) -> Result<Subscription, AppError> {
        let sql = format!(
            "INSERT INTO venue_subscriptions \
             (venue_id, plan, status, stripe_customer_id, stripe_subscription_id, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (stripe_subscription_id) DO UPDATE SET \
               venue_id = EXCLUDED.venue_id, plan = EXCLUDED.plan, status = EXCLUDED.status, \
               stripe_customer_id = EXCLUDED.stripe_customer_id, \
               start_date = EXCLUDED.start_date, end_date = EXCLUDED.end_date, \
               updated_at = now() \
             RETURNING {SUBSCRIPTION_COLUMNS}"
        );

        let row: SubscriptionRow = sqlx::query_as(&sql)
            .bind(u.venue_id)
            .bind(u.plan)
            .bind(u.status)
            .bind(u.stripe_customer_id)
            .bind(u.stripe_subscription_id)
            .bind(u.start_date)
            .bind(u.end_date)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM venue_subscriptions WHERE stripe_subscription_id = $1"
        );

        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(stripe_subscription_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Subscription::from))
    }
}
