//! DTOs for public submissions and claims.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::Validate;

use crate::domain::entities::{NewClaim, NewSubmission, ReviewStatus};

/// Body of `POST /api/submissions`.
///
/// Length limits are checked here; semantic rules (coordinates, venue type,
/// website) are applied by the intake service.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SubmissionRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "name must be at most 200 characters"))]
    pub name: String,

    #[validate(length(max = 40))]
    pub venue_type: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 500))]
    pub website: Option<String>,

    #[validate(length(max = 50))]
    pub phone: Option<String>,

    #[validate(email(message = "contact_email is not a valid email address"))]
    pub contact_email: Option<String>,

    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl From<SubmissionRequest> for NewSubmission {
    fn from(r: SubmissionRequest) -> Self {
        Self {
            name: r.name,
            venue_type: r.venue_type,
            address: r.address,
            notes: r.notes,
            website: r.website,
            phone: r.phone,
            contact_email: r.contact_email,
            lat: r.lat,
            lng: r.lng,
        }
    }
}

/// Body of `POST /api/claims`.
///
/// `venue_id` is accepted as a number or a numeric string, since the claim
/// form posts it from a hidden input.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ClaimRequest {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub venue_id: Option<i64>,

    #[serde(default)]
    #[validate(length(max = 320))]
    pub claimant_email: String,

    #[validate(length(max = 2000, message = "claimant_message must be at most 2000 characters"))]
    pub claimant_message: Option<String>,
}

impl From<ClaimRequest> for NewClaim {
    fn from(r: ClaimRequest) -> Self {
        Self {
            venue_id: r.venue_id.unwrap_or_default(),
            claimant_email: r.claimant_email,
            claimant_message: r.claimant_message,
        }
    }
}

/// `201` body for both writers.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub status: String,
}

impl CreatedResponse {
    pub fn new(id: i64, status: ReviewStatus) -> Self {
        Self {
            id,
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_venue_id_number_or_string() {
        let a: ClaimRequest =
            serde_json::from_value(json!({"venue_id": 12, "claimant_email": "a@b.com"})).unwrap();
        let b: ClaimRequest =
            serde_json::from_value(json!({"venue_id": "12", "claimant_email": "a@b.com"})).unwrap();
        assert_eq!(a.venue_id, Some(12));
        assert_eq!(b.venue_id, Some(12));

        let missing: ClaimRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.venue_id, None);
        assert_eq!(NewClaim::from(missing).venue_id, 0);
    }

    #[test]
    fn test_submission_email_validation() {
        let req = SubmissionRequest {
            name: "Test Tavern".to_string(),
            contact_email: Some("not-an-email".to_string()),
            ..SubmissionRequest::default()
        };
        assert!(req.validate().is_err());

        let req = SubmissionRequest {
            name: "Test Tavern".to_string(),
            contact_email: Some("owner@tavern.com".to_string()),
            ..SubmissionRequest::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_created_response_shape() {
        let body = serde_json::to_value(CreatedResponse::new(5, ReviewStatus::Pending)).unwrap();
        assert_eq!(body, json!({"id": 5, "status": "pending"}));
    }
}
