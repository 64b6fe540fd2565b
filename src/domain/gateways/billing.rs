//! Billing provider contract and the event model the reconciler consumes.

use async_trait::async_trait;

use crate::domain::entities::Plan;
use crate::error::AppError;

/// Input for a hosted subscription checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub venue_id: i64,
    pub plan: Plan,
    pub email: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created checkout session; `url` is where the customer is redirected.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Metadata attached at checkout and echoed back on every event.
///
/// Values are kept raw; the reconciler decides what counts as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventMetadata {
    pub venue_id: Option<String>,
    pub plan: Option<String>,
    pub email: Option<String>,
}

/// Provider-side subscription state.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingSubscription {
    pub id: String,
    pub status: String,
    pub customer_id: Option<String>,
    pub metadata: EventMetadata,
    /// Unix seconds.
    pub start_date: Option<i64>,
    /// Unix seconds.
    pub current_period_end: Option<i64>,
}

/// Event payloads the reconciler acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum BillingEvent {
    /// `checkout.session.completed`: the subscription must be fetched separately.
    CheckoutCompleted {
        subscription_id: Option<String>,
        customer_id: Option<String>,
        metadata: EventMetadata,
    },
    /// `customer.subscription.updated`
    SubscriptionUpdated(BillingSubscription),
    /// `customer.subscription.deleted`
    SubscriptionDeleted(BillingSubscription),
    /// Any other type; acknowledged and ignored.
    Unhandled,
}

/// A verified webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub id: String,
    pub event_type: String,
    pub event: BillingEvent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingGateway: Send + Sync {
    /// Fails with [`AppError::Configuration`] if checkout cannot be attempted.
    ///
    /// Called before any other work so a misconfigured deployment makes no
    /// outbound calls.
    fn ensure_checkout_configured(&self) -> Result<(), AppError>;

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AppError>;

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, AppError>;

    /// Verifies the signature header against the raw body, then parses it.
    ///
    /// # Errors
    ///
    /// - [`AppError::Configuration`] if no webhook secret is configured.
    /// - [`AppError::Signature`] if the header is missing, stale or does not match.
    /// - [`AppError::Validation`] if the verified body is not a valid event.
    fn decode_event(
        &self,
        payload: &[u8],
        signature: Option<String>,
    ) -> Result<WebhookEvent, AppError>;
}
