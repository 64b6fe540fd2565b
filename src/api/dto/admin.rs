//! DTOs for the admin login and review endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::application::services::ReviewOutcome;
use crate::domain::entities::{ClaimWithVenue, Submission};

/// Shown for claims whose venue has since been deleted.
pub const UNKNOWN_VENUE: &str = "(unknown venue)";

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Body of the review endpoints: `{id, action, reason?}`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub id: Option<i64>,
    pub action: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub outcome: ReviewOutcome,
}

impl From<ReviewOutcome> for ReviewResponse {
    fn from(outcome: ReviewOutcome) -> Self {
        Self { ok: true, outcome }
    }
}

/// `{ "items": [...] }`
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionItem {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub submitted_name: String,
    pub submitted_venue_type: Option<String>,
    pub submitted_address: Option<String>,
    pub submitted_lat: Option<f64>,
    pub submitted_lng: Option<f64>,
    pub submitted_website: Option<String>,
    pub submitted_phone: Option<String>,
    pub submitted_email: Option<String>,
    pub submitted_notes: Option<String>,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<Submission> for SubmissionItem {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            created_at: s.created_at,
            status: s.status.to_string(),
            submitted_name: s.submitted_name,
            submitted_venue_type: s.submitted_venue_type,
            submitted_address: s.submitted_address,
            submitted_lat: s.submitted_lat,
            submitted_lng: s.submitted_lng,
            submitted_website: s.submitted_website,
            submitted_phone: s.submitted_phone,
            submitted_email: s.submitted_email,
            submitted_notes: s.submitted_notes,
            reviewer_notes: s.reviewer_notes,
            reviewed_at: s.reviewed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimItem {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub claimant_email: String,
    pub claimant_message: Option<String>,
    pub venue_id: i64,
    pub venue_name: String,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<ClaimWithVenue> for ClaimItem {
    fn from(row: ClaimWithVenue) -> Self {
        let c = row.claim;
        Self {
            id: c.id,
            created_at: c.created_at,
            status: c.status.to_string(),
            claimant_email: c.claimant_email,
            claimant_message: c.claimant_message,
            venue_id: c.venue_id,
            venue_name: row.venue_name.unwrap_or_else(|| UNKNOWN_VENUE.to_string()),
            reviewer_notes: c.reviewer_notes,
            reviewed_at: c.reviewed_at,
        }
    }
}
