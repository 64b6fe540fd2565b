//! Venue claim request entity.

use chrono::{DateTime, Utc};

use super::review::ReviewStatus;

/// An ownership claim over an existing venue awaiting admin review.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub id: i64,
    pub venue_id: i64,
    pub claimant_email: String,
    pub claimant_message: Option<String>,
    pub status: ReviewStatus,
    pub reviewer_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A claim joined with the name of the venue it references.
///
/// `venue_name` is `None` when the venue no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimWithVenue {
    pub claim: Claim,
    pub venue_name: Option<String>,
}

/// Input for a new claim. Always stored with status `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClaim {
    pub venue_id: i64,
    pub claimant_email: String,
    pub claimant_message: Option<String>,
}
