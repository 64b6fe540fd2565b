//! Venue submission entity.

use chrono::{DateTime, Utc};

use super::review::ReviewStatus;

/// Venue type used when a submission does not name one.
pub const DEFAULT_VENUE_TYPE: &str = "venue";

/// A publicly proposed venue awaiting admin review.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub submitted_name: String,
    pub submitted_venue_type: Option<String>,
    pub submitted_address: Option<String>,
    pub submitted_notes: Option<String>,
    pub submitted_website: Option<String>,
    pub submitted_phone: Option<String>,
    pub submitted_email: Option<String>,
    pub submitted_lat: Option<f64>,
    pub submitted_lng: Option<f64>,
    pub status: ReviewStatus,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Stable identifier of the venue this submission turns into once approved.
    ///
    /// Repeated approvals upsert the same venue instead of creating duplicates.
    pub fn venue_external_id(&self) -> String {
        format!("manual/{}", self.id)
    }

    /// Coordinates as `(lat, lng)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.submitted_lat, self.submitted_lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Input for a new submission. Always stored with status `pending`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSubmission {
    pub name: String,
    pub venue_type: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub contact_email: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
