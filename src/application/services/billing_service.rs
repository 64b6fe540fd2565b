//! Checkout creation and the subscription reconciler.
//!
//! The reconciler keeps each venue's paid flags in line with the latest known
//! state of its subscription:
//!
//! 1. the gateway verifies and decodes the webhook delivery,
//! 2. the event is mapped to a [`SubscriptionUpsert`] keyed by the provider
//!    subscription id,
//! 3. the row is upserted (last write wins),
//! 4. the venue flag is recomputed from `(plan, status)` via
//!    [`Entitlement::project`].
//!
//! Step 4 runs on every event, so a cancellation clears the flag and a replayed
//! event converges on the same state. There is no ordering guard: a stale
//! `active` delivered after a newer `canceled` re-enables the flag.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use serde_json::json;
use url::Url;
use validator::ValidateEmail;

use crate::domain::entities::{Entitlement, Plan, SubscriptionUpsert};
use crate::domain::gateways::{
    BillingEvent, BillingGateway, BillingSubscription, CheckoutRequest, CheckoutSession,
    EventMetadata, WebhookEvent,
};
use crate::domain::repositories::{SubscriptionRepository, VenueRepository};
use crate::error::AppError;

/// Checkout configuration resolved at startup.
#[derive(Debug, Clone, Default)]
pub struct CheckoutSettings {
    /// Provider price id per plan. Plans without a price cannot be sold.
    pub prices: HashMap<Plan, String>,
    /// Public origin used to build redirect targets.
    pub public_base_url: Option<Url>,
}

/// Raw checkout input. Fields are optional so that absence is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct CheckoutInput {
    pub venue_id: Option<i64>,
    pub plan: Option<String>,
    pub email: Option<String>,
}

/// What the reconciler did with one delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// Subscription row upserted and the venue flag recomputed.
    Applied {
        stripe_subscription_id: String,
        venue_id: i64,
        status: String,
        entitlement: Option<Entitlement>,
    },
    /// Required metadata was missing; nothing was written.
    Skipped { reason: &'static str },
    /// Event type the reconciler does not handle.
    Ignored,
}

impl WebhookOutcome {
    fn label(&self) -> &'static str {
        match self {
            WebhookOutcome::Applied { .. } => "applied",
            WebhookOutcome::Skipped { .. } => "skipped",
            WebhookOutcome::Ignored => "ignored",
        }
    }
}

pub struct BillingService<
    V: VenueRepository + ?Sized = dyn VenueRepository,
    S: SubscriptionRepository + ?Sized = dyn SubscriptionRepository,
    G: BillingGateway + ?Sized = dyn BillingGateway,
> {
    venues: Arc<V>,
    subscriptions: Arc<S>,
    gateway: Arc<G>,
    settings: CheckoutSettings,
}

impl<V, S, G> BillingService<V, S, G>
where
    V: VenueRepository + ?Sized,
    S: SubscriptionRepository + ?Sized,
    G: BillingGateway + ?Sized,
{
    pub fn new(
        venues: Arc<V>,
        subscriptions: Arc<S>,
        gateway: Arc<G>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            venues,
            subscriptions,
            gateway,
            settings,
        }
    }

    /// Creates a hosted subscription checkout for a venue.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for missing fields, an unknown plan or a bad email.
    /// - [`AppError::Configuration`] when the secret key, the plan's price or the
    ///   public base URL is missing. Checked before any datastore or provider call.
    /// - [`AppError::NotFound`] for an unknown venue.
    pub async fn create_checkout(&self, input: CheckoutInput) -> Result<CheckoutSession, AppError> {
        let (venue_id, plan, email) = match (
            input.venue_id,
            non_blank(input.plan),
            non_blank(input.email),
        ) {
            (Some(venue_id), Some(plan), Some(email)) if venue_id > 0 => (venue_id, plan, email),
            _ => {
                return Err(AppError::bad_request(
                    "venue_id, plan and email are required",
                    json!({}),
                ));
            }
        };

        let plan: Plan = plan
            .parse()
            .map_err(|e: String| AppError::bad_request(e, json!({ "plan": plan })))?;

        if !email.validate_email() {
            return Err(AppError::bad_request(
                "email is not a valid email address",
                json!({ "email": email }),
            ));
        }

        self.gateway.ensure_checkout_configured()?;

        let price_id = self.settings.prices.get(&plan).cloned().ok_or_else(|| {
            AppError::configuration(
                format!("No price configured for plan {plan}"),
                json!({ "plan": plan.as_str() }),
            )
        })?;

        let base = self.settings.public_base_url.as_ref().ok_or_else(|| {
            AppError::configuration("PUBLIC_BASE_URL is not configured", json!({}))
        })?;
        let success_url = redirect_url(base, "owners/success")?;
        let cancel_url = redirect_url(base, "owners/cancel")?;

        match self.venues.find_by_id(venue_id).await? {
            Some(venue) if venue.approved => {}
            _ => {
                return Err(AppError::not_found(
                    "Venue not found",
                    json!({ "venue_id": venue_id }),
                ));
            }
        }

        let request = CheckoutRequest {
            price_id,
            venue_id,
            plan,
            email,
            success_url,
            cancel_url,
        };

        let session = self.gateway.create_checkout_session(&request).await?;
        tracing::info!(venue_id, plan = %plan, session_id = %session.id, "checkout session created");

        Ok(session)
    }

    /// Verifies, decodes and reconciles one webhook delivery.
    ///
    /// # Errors
    ///
    /// Signature and configuration errors are returned before anything is
    /// written. Datastore and provider failures are returned so the provider
    /// retries the delivery.
    pub async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, AppError> {
        let signature = signature.map(str::to_owned);
        let event = match self.gateway.decode_event(payload, signature) {
            Ok(event) => event,
            Err(e) => {
                metrics::counter!(
                    "webhook_events_total",
                    "event_type" => "unknown",
                    "outcome" => "rejected"
                )
                .increment(1);
                tracing::warn!(error = %e, "webhook rejected");
                return Err(e);
            }
        };

        let event_type = event.event_type.clone();
        let result = self.reconcile(event).await;

        let outcome = match &result {
            Ok(outcome) => outcome.label(),
            Err(_) => "failed",
        };
        metrics::counter!(
            "webhook_events_total",
            "event_type" => event_type,
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    /// Applies a verified event.
    pub async fn reconcile(&self, event: WebhookEvent) -> Result<WebhookOutcome, AppError> {
        let WebhookEvent {
            id: event_id,
            event_type,
            event,
        } = event;

        let upsert = match event {
            BillingEvent::CheckoutCompleted {
                subscription_id,
                customer_id,
                metadata,
            } => {
                let Some(subscription_id) = subscription_id.filter(|s| !s.is_empty()) else {
                    return Ok(skip(&event_id, &event_type, "subscription id"));
                };
                let (venue_id, plan) = match required_metadata(&metadata) {
                    Ok(found) => found,
                    Err(missing) => return Ok(skip(&event_id, &event_type, missing)),
                };

                let subscription = self.gateway.retrieve_subscription(&subscription_id).await?;

                SubscriptionUpsert {
                    venue_id,
                    plan,
                    status: subscription.status,
                    stripe_customer_id: subscription.customer_id.or(customer_id),
                    stripe_subscription_id: subscription_id,
                    start_date: unix_to_date(subscription.start_date),
                    end_date: unix_to_date(subscription.current_period_end),
                }
            }
            BillingEvent::SubscriptionUpdated(subscription)
            | BillingEvent::SubscriptionDeleted(subscription) => {
                match upsert_from_subscription(subscription) {
                    Ok(upsert) => upsert,
                    Err(missing) => return Ok(skip(&event_id, &event_type, missing)),
                }
            }
            BillingEvent::Unhandled => {
                tracing::debug!(event_id = %event_id, event_type = %event_type, "ignoring event");
                return Ok(WebhookOutcome::Ignored);
            }
        };

        let stored = self.subscriptions.upsert(upsert).await?;
        let entitlement = Entitlement::project(&stored.plan, &stored.status);

        let venue_found = match entitlement {
            Some(Entitlement::Featured(on)) => {
                Some(self.venues.set_featured(stored.venue_id, on).await?)
            }
            Some(Entitlement::Claimed(on)) => {
                Some(self.venues.set_claimed(stored.venue_id, on).await?)
            }
            None => None,
        };

        match venue_found {
            Some(false) => tracing::warn!(
                event_id = %event_id,
                venue_id = stored.venue_id,
                "subscription references a missing venue"
            ),
            None => tracing::info!(
                event_id = %event_id,
                plan = %stored.plan,
                "unrecognised plan, venue flags untouched"
            ),
            Some(true) => {}
        }

        tracing::info!(
            event_id = %event_id,
            event_type = %event_type,
            subscription_id = %stored.stripe_subscription_id,
            venue_id = stored.venue_id,
            status = %stored.status,
            "subscription reconciled"
        );

        Ok(WebhookOutcome::Applied {
            stripe_subscription_id: stored.stripe_subscription_id,
            venue_id: stored.venue_id,
            status: stored.status,
            entitlement,
        })
    }
}

fn skip(event_id: &str, event_type: &str, missing: &'static str) -> WebhookOutcome {
    tracing::warn!(
        event_id,
        event_type,
        missing,
        "webhook event skipped: required metadata missing"
    );
    WebhookOutcome::Skipped { reason: missing }
}

/// Venue id and plan from event metadata, or the name of the first missing field.
///
/// A venue id that is not a positive integer counts as missing.
fn required_metadata(metadata: &EventMetadata) -> Result<(i64, String), &'static str> {
    let venue_id = metadata
        .venue_id
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .ok_or("venue_id")?;

    let plan = metadata
        .plan
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or("plan")?;

    Ok((venue_id, plan.to_string()))
}

fn upsert_from_subscription(
    subscription: BillingSubscription,
) -> Result<SubscriptionUpsert, &'static str> {
    if subscription.id.is_empty() {
        return Err("subscription id");
    }
    let (venue_id, plan) = required_metadata(&subscription.metadata)?;

    Ok(SubscriptionUpsert {
        venue_id,
        plan,
        status: subscription.status,
        stripe_customer_id: subscription.customer_id,
        stripe_subscription_id: subscription.id,
        start_date: unix_to_date(subscription.start_date),
        end_date: unix_to_date(subscription.current_period_end),
    })
}

fn unix_to_date(secs: Option<i64>) -> Option<NaiveDate> {
    secs.and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|dt| dt.date_naive())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn redirect_url(base: &Url, path: &str) -> Result<String, AppError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(path).map(String::from).map_err(|e| {
        AppError::configuration(
            format!("PUBLIC_BASE_URL cannot be joined: {e}"),
            json!({ "path": path }),
        )
    })
}
