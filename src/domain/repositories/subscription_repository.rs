//! Repository trait for billing subscriptions.

use crate::domain::entities::{Subscription, SubscriptionUpsert};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Inserts or replaces the row keyed by `stripe_subscription_id`.
    ///
    /// On conflict every other column is overwritten; there is no ordering check.
    async fn upsert(&self, upsert: SubscriptionUpsert) -> Result<Subscription, AppError>;

    async fn find_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError>;
}
