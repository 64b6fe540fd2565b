//! DTOs for checkout and webhook endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::application::services::CheckoutInput;

/// Body of `POST /api/stripe/checkout`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutBody {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub venue_id: Option<i64>,
    pub plan: Option<String>,
    pub email: Option<String>,
}

impl From<CheckoutBody> for CheckoutInput {
    fn from(b: CheckoutBody) -> Self {
        Self {
            venue_id: b.venue_id,
            plan: b.plan,
            email: b.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Acknowledgement returned for every verified delivery.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}
