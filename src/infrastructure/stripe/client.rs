//! Stripe REST client.
//!
//! Requests are form-encoded with bearer auth against `{api_base}/v1/...`.
//! The base is configurable so tests can point it at a local mock.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use super::events;
use crate::domain::gateways::{
    BillingGateway, BillingSubscription, CheckoutRequest, CheckoutSession, WebhookEvent,
};
use crate::error::AppError;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

pub struct StripeClient {
    client: reqwest::Client,
    api_base: Url,
    secret_key: Option<String>,
    webhook_secret: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: Url, secret_key: Option<String>, webhook_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            secret_key,
            webhook_secret,
        }
    }

    fn secret_key(&self) -> Result<&str, AppError> {
        self.secret_key
            .as_deref()
            .ok_or_else(|| AppError::configuration("STRIPE_SECRET_KEY is not configured", json!({})))
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.api_base.join(path).map_err(|e| {
            AppError::configuration(format!("Invalid STRIPE_API_BASE: {e}"), json!({}))
        })
    }

    /// Reads a success body, or turns an error body into [`AppError::Upstream`].
    async fn read(response: reqwest::Response) -> Result<Value, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, kind) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(ErrorResponse { error }) => (error.message, error.kind),
            Err(_) => (None, None),
        };

        tracing::warn!(status = %status, kind = ?kind, "stripe request failed");

        Err(AppError::upstream(
            message.unwrap_or_else(|| format!("Stripe returned {status}")),
            json!({ "status": status.as_u16(), "type": kind }),
        ))
    }
}

fn checkout_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    let venue_id = request.venue_id.to_string();
    let plan = request.plan.as_str().to_string();

    vec![
        ("mode", "subscription".to_string()),
        ("customer_email", request.email.clone()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("metadata[venue_id]", venue_id.clone()),
        ("metadata[plan]", plan.clone()),
        ("metadata[email]", request.email.clone()),
        ("subscription_data[metadata][venue_id]", venue_id),
        ("subscription_data[metadata][plan]", plan),
        ("subscription_data[metadata][email]", request.email.clone()),
    ]
}

#[async_trait]
impl BillingGateway for StripeClient {
    fn ensure_checkout_configured(&self) -> Result<(), AppError> {
        self.secret_key().map(|_| ())
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AppError> {
        let response = self
            .client
            .post(self.endpoint("v1/checkout/sessions")?)
            .bearer_auth(self.secret_key()?)
            .form(&checkout_form(request))
            .send()
            .await?;

        let session: SessionResponse = serde_json::from_value(Self::read(response).await?)
            .map_err(|e| {
                AppError::upstream(format!("Unexpected checkout response: {e}"), json!({}))
            })?;

        let url = session.url.ok_or_else(|| {
            AppError::upstream("Checkout session has no url", json!({ "id": session.id }))
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, AppError> {
        let mut url = self.endpoint("v1/subscriptions/")?;
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("Invalid STRIPE_API_BASE", json!({})))?
            .pop_if_empty()
            .push(subscription_id);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key()?)
            .send()
            .await?;

        events::parse_subscription(Self::read(response).await?).map_err(|e| {
            AppError::upstream(
                format!("Unexpected subscription response: {e}"),
                json!({ "id": subscription_id }),
            )
        })
    }

    fn decode_event(
        &self,
        payload: &[u8],
        signature: Option<String>,
    ) -> Result<WebhookEvent, AppError> {
        events::decode(
            payload,
            signature.as_deref(),
            self.webhook_secret.as_deref(),
            chrono::Utc::now().timestamp(),
        )
    }
}
