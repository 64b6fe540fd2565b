//! Webhook payload parsing.
//!
//! Only the fields the reconciler needs are modelled; everything else in the
//! event object is ignored.

use serde::Deserialize;
use serde_json::{Value, json};

use super::signature::{self, SignatureError};
use crate::domain::gateways::{BillingEvent, BillingSubscription, EventMetadata, WebhookEvent};
use crate::error::AppError;

pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    object: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    venue_id: Option<Value>,
    plan: Option<String>,
    email: Option<String>,
}

impl From<RawMetadata> for EventMetadata {
    fn from(raw: RawMetadata) -> Self {
        // Metadata values are strings on the wire, but tolerate numbers.
        let venue_id = raw.venue_id.and_then(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self {
            venue_id,
            plan: raw.plan,
            email: raw.email,
        }
    }
}

/// Either an id or an expanded object carrying one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    fn into_id(self) -> String {
        match self {
            Expandable::Id(id) | Expandable::Object { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCheckoutSession {
    subscription: Option<Expandable>,
    customer: Option<Expandable>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawSubscription {
    id: String,
    status: String,
    customer: Option<Expandable>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
    start_date: Option<i64>,
    current_period_start: Option<i64>,
    current_period_end: Option<i64>,
    #[serde(default)]
    items: Option<RawItems>,
}

#[derive(Debug, Deserialize)]
struct RawItems {
    #[serde(default)]
    data: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    current_period_end: Option<i64>,
}

impl From<RawSubscription> for BillingSubscription {
    fn from(raw: RawSubscription) -> Self {
        // Newer API versions moved the billing period onto the items.
        let current_period_end = raw.current_period_end.or_else(|| {
            raw.items
                .as_ref()
                .and_then(|items| items.data.first())
                .and_then(|item| item.current_period_end)
        });

        Self {
            id: raw.id,
            status: raw.status,
            customer_id: raw.customer.map(Expandable::into_id),
            metadata: raw.metadata.unwrap_or_default().into(),
            start_date: raw.start_date.or(raw.current_period_start),
            current_period_end,
        }
    }
}

/// Parses a subscription object as returned by the REST API.
pub fn parse_subscription(value: Value) -> Result<BillingSubscription, serde_json::Error> {
    serde_json::from_value::<RawSubscription>(value).map(Into::into)
}

/// Parses a verified webhook body.
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, AppError> {
    let raw: RawEvent = serde_json::from_slice(payload).map_err(invalid_payload)?;

    let event = match raw.event_type.as_str() {
        CHECKOUT_COMPLETED => {
            let session: RawCheckoutSession =
                serde_json::from_value(raw.data.object).map_err(invalid_payload)?;
            BillingEvent::CheckoutCompleted {
                subscription_id: session.subscription.map(Expandable::into_id),
                customer_id: session.customer.map(Expandable::into_id),
                metadata: session.metadata.unwrap_or_default().into(),
            }
        }
        SUBSCRIPTION_UPDATED => BillingEvent::SubscriptionUpdated(
            parse_subscription(raw.data.object).map_err(invalid_payload)?,
        ),
        SUBSCRIPTION_DELETED => BillingEvent::SubscriptionDeleted(
            parse_subscription(raw.data.object).map_err(invalid_payload)?,
        ),
        _ => BillingEvent::Unhandled,
    };

    Ok(WebhookEvent {
        id: raw.id,
        event_type: raw.event_type,
        event,
    })
}

fn invalid_payload(e: serde_json::Error) -> AppError {
    AppError::bad_request("Invalid webhook payload", json!({ "reason": e.to_string() }))
}

/// Verifies and parses a webhook delivery.
///
/// # Errors
///
/// - [`AppError::Configuration`] when `secret` is `None`.
/// - [`AppError::Validation`] when the signature header is absent.
/// - [`AppError::Signature`] when the signature does not verify.
/// - [`AppError::Validation`] when the verified body is not an event.
pub fn decode(
    payload: &[u8],
    header: Option<&str>,
    secret: Option<&str>,
    now: i64,
) -> Result<WebhookEvent, AppError> {
    let secret = secret.ok_or_else(|| {
        AppError::configuration("STRIPE_WEBHOOK_SECRET is not configured", json!({}))
    })?;

    match signature::verify(payload, header, secret, now, signature::DEFAULT_TOLERANCE_SECS) {
        Ok(()) => {}
        Err(SignatureError::MissingHeader) => {
            return Err(AppError::bad_request(
                "Missing Stripe-Signature header",
                json!({}),
            ));
        }
        Err(e) => {
            tracing::warn!(error = %e, "webhook signature rejected");
            return Err(AppError::signature(
                "Webhook signature verification failed",
                json!({ "reason": e.to_string() }),
            ));
        }
    }

    parse_event(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_750_000_000;

    fn subscription_object() -> Value {
        json!({
            "id": "sub_123",
            "object": "subscription",
            "status": "active",
            "customer": "cus_9",
            "metadata": { "venue_id": "42", "plan": "featured_monthly", "email": "o@v.com" },
            "start_date": 1_700_000_000,
            "current_period_start": 1_720_000_000,
            "items": { "data": [ { "current_period_end": 1_760_000_000 } ] }
        })
    }

    #[test]
    fn test_parse_checkout_completed() {
        let body = json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": { "object": {
                "id": "cs_1",
                "subscription": "sub_123",
                "customer": { "id": "cus_9", "object": "customer" },
                "metadata": { "venue_id": "42", "plan": "claimed_plus" }
            }}
        });

        let event = parse_event(body.to_string().as_bytes()).unwrap();
        assert_eq!(event.id, "evt_1");
        assert_eq!(
            event.event,
            BillingEvent::CheckoutCompleted {
                subscription_id: Some("sub_123".to_string()),
                customer_id: Some("cus_9".to_string()),
                metadata: EventMetadata {
                    venue_id: Some("42".to_string()),
                    plan: Some("claimed_plus".to_string()),
                    email: None,
                },
            }
        );
    }

    #[test]
    fn test_subscription_dates_fall_back() {
        let sub = parse_subscription(subscription_object()).unwrap();
        assert_eq!(sub.start_date, Some(1_700_000_000));
        assert_eq!(sub.current_period_end, Some(1_760_000_000));
        assert_eq!(sub.customer_id.as_deref(), Some("cus_9"));

        let mut object = subscription_object();
        object["start_date"] = Value::Null;
        object["current_period_end"] = json!(1_770_000_000);
        let sub = parse_subscription(object).unwrap();
        assert_eq!(sub.start_date, Some(1_720_000_000));
        assert_eq!(sub.current_period_end, Some(1_770_000_000));
    }

    #[test]
    fn test_numeric_venue_id_metadata() {
        let mut object = subscription_object();
        object["metadata"]["venue_id"] = json!(42);
        let sub = parse_subscription(object).unwrap();
        assert_eq!(sub.metadata.venue_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_unhandled_type() {
        let body = json!({ "id": "evt_2", "type": "invoice.paid", "data": { "object": {} } });
        let event = parse_event(body.to_string().as_bytes()).unwrap();
        assert_eq!(event.event, BillingEvent::Unhandled);
        assert_eq!(event.event_type, "invoice.paid");
    }

    #[test]
    fn test_decode_checks_in_order() {
        let body = json!({
            "id": "evt_3",
            "type": "customer.subscription.deleted",
            "data": { "object": subscription_object() }
        })
        .to_string();
        let header = signature::sign(body.as_bytes(), SECRET, NOW);

        let err = decode(body.as_bytes(), Some(&header), None, NOW).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));

        let err = decode(body.as_bytes(), None, Some(SECRET), NOW).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        let err = decode(b"{}", Some(&header), Some(SECRET), NOW).unwrap_err();
        assert!(matches!(err, AppError::Signature { .. }));

        let event = decode(body.as_bytes(), Some(&header), Some(SECRET), NOW).unwrap();
        assert!(matches!(event.event, BillingEvent::SubscriptionDeleted(ref s) if s.id == "sub_123"));
    }

    #[test]
    fn test_decode_rejects_signed_garbage() {
        let body = b"not json";
        let header = signature::sign(body, SECRET, NOW);
        let err = decode(body, Some(&header), Some(SECRET), NOW).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
