//! Public submission and claim writers.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::json;
use url::Url;
use validator::ValidateEmail;

use crate::domain::entities::{Claim, DEFAULT_VENUE_TYPE, NewClaim, NewSubmission, Submission};
use crate::domain::geo::Coordinate;
use crate::domain::repositories::{ClaimRepository, SubmissionRepository, VenueRepository};
use crate::error::AppError;

static VENUE_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_]+$").expect("valid venue type regex"));

/// Inserts pending submissions and claims.
///
/// No deduplication: the same venue may be proposed or claimed any number of
/// times and every row goes to manual review.
pub struct IntakeService<
    S: SubmissionRepository + ?Sized = dyn SubmissionRepository,
    C: ClaimRepository + ?Sized = dyn ClaimRepository,
    V: VenueRepository + ?Sized = dyn VenueRepository,
> {
    submissions: Arc<S>,
    claims: Arc<C>,
    venues: Arc<V>,
}

impl<S, C, V> IntakeService<S, C, V>
where
    S: SubmissionRepository + ?Sized,
    C: ClaimRepository + ?Sized,
    V: VenueRepository + ?Sized,
{
    pub fn new(submissions: Arc<S>, claims: Arc<C>, venues: Arc<V>) -> Self {
        Self {
            submissions,
            claims,
            venues,
        }
    }

    /// Validates and stores a proposed venue.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] without writing anything if the name is
    /// blank, only one coordinate is given, coordinates are out of range, the
    /// venue type is not a lowercase slug, or the website/email is malformed.
    pub async fn submit(&self, input: NewSubmission) -> Result<Submission, AppError> {
        let normalized = normalize_submission(input)?;
        let submission = self.submissions.create(normalized).await?;

        metrics::counter!("venue_submissions_total").increment(1);
        tracing::info!(
            submission_id = submission.id,
            name = %submission.submitted_name,
            "venue submission received"
        );

        Ok(submission)
    }

    /// Validates and stores an ownership claim over an existing venue.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a non-positive venue id or an invalid email.
    /// - [`AppError::NotFound`] if the venue does not exist.
    pub async fn claim(&self, input: NewClaim) -> Result<Claim, AppError> {
        if input.venue_id <= 0 {
            return Err(AppError::bad_request(
                "venue_id is required",
                json!({ "venue_id": input.venue_id }),
            ));
        }

        let email = input.claimant_email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::bad_request("claimant_email is required", json!({})));
        }
        if !email.validate_email() {
            return Err(AppError::bad_request(
                "claimant_email is not a valid email address",
                json!({ "claimant_email": email }),
            ));
        }

        if self.venues.find_by_id(input.venue_id).await?.is_none() {
            return Err(AppError::not_found(
                "Venue not found",
                json!({ "venue_id": input.venue_id }),
            ));
        }

        let claim = self
            .claims
            .create(NewClaim {
                venue_id: input.venue_id,
                claimant_email: email,
                claimant_message: non_blank(input.claimant_message),
            })
            .await?;

        metrics::counter!("venue_claims_total").increment(1);
        tracing::info!(claim_id = claim.id, venue_id = claim.venue_id, "venue claim received");

        Ok(claim)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims every field, applies defaults and rejects malformed input.
pub fn normalize_submission(input: NewSubmission) -> Result<NewSubmission, AppError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::bad_request("name is required", json!({})));
    }

    let venue_type = non_blank(input.venue_type)
        .map(|t| t.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_VENUE_TYPE.to_string());
    if !VENUE_TYPE_RE.is_match(&venue_type) {
        return Err(AppError::bad_request(
            "venue_type must contain only lowercase letters and underscores",
            json!({ "venue_type": venue_type }),
        ));
    }

    let (lat, lng) = match (input.lat, input.lng) {
        (Some(lat), Some(lng)) => {
            if !Coordinate::new(lat, lng).is_valid() {
                return Err(AppError::bad_request(
                    "Coordinates are out of range",
                    json!({ "lat": lat, "lng": lng }),
                ));
            }
            (Some(lat), Some(lng))
        }
        (None, None) => (None, None),
        _ => {
            return Err(AppError::bad_request(
                "lat and lng must be supplied together",
                json!({}),
            ));
        }
    };

    let website = match non_blank(input.website) {
        Some(raw) => Some(normalize_website(&raw)?),
        None => None,
    };

    let contact_email = non_blank(input.contact_email);
    if let Some(email) = &contact_email
        && !email.validate_email()
    {
        return Err(AppError::bad_request(
            "contact_email is not a valid email address",
            json!({ "contact_email": email }),
        ));
    }

    Ok(NewSubmission {
        name,
        venue_type: Some(venue_type),
        address: non_blank(input.address),
        notes: non_blank(input.notes),
        website,
        phone: non_blank(input.phone),
        contact_email,
        lat,
        lng,
    })
}

/// Accepts bare hosts (`example.com`) by assuming https.
fn normalize_website(raw: &str) -> Result<String, AppError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    match Url::parse(&candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {
            Ok(url.to_string())
        }
        _ => Err(AppError::bad_request(
            "website is not a valid URL",
            json!({ "website": raw }),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ReviewStatus, Venue};
    use crate::domain::repositories::{
        MockClaimRepository, MockSubmissionRepository, MockVenueRepository,
    };
    use chrono::Utc;

    fn stored_submission(id: i64, input: &NewSubmission) -> Submission {
        Submission {
            id,
            submitted_name: input.name.clone(),
            submitted_venue_type: input.venue_type.clone(),
            submitted_address: input.address.clone(),
            submitted_notes: input.notes.clone(),
            submitted_website: input.website.clone(),
            submitted_phone: input.phone.clone(),
            submitted_email: input.contact_email.clone(),
            submitted_lat: input.lat,
            submitted_lng: input.lng,
            status: ReviewStatus::Pending,
            reviewer_notes: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    fn service(
        submissions: MockSubmissionRepository,
        claims: MockClaimRepository,
        venues: MockVenueRepository,
    ) -> IntakeService<MockSubmissionRepository, MockClaimRepository, MockVenueRepository> {
        IntakeService::new(Arc::new(submissions), Arc::new(claims), Arc::new(venues))
    }

    #[tokio::test]
    async fn test_submit_trims_and_defaults_type() {
        let mut submissions = MockSubmissionRepository::new();
        submissions
            .expect_create()
            .withf(|s| {
                s.name == "Test Tavern"
                    && s.venue_type.as_deref() == Some("venue")
                    && s.address.as_deref() == Some("1 Test St")
                    && s.notes.is_none()
            })
            .times(1)
            .returning(|s| Ok(stored_submission(1, &s)));

        let svc = service(
            submissions,
            MockClaimRepository::new(),
            MockVenueRepository::new(),
        );

        let input = NewSubmission {
            name: "  Test Tavern ".to_string(),
            address: Some("1 Test St".to_string()),
            notes: Some("   ".to_string()),
            ..NewSubmission::default()
        };

        let created = svc.submit(input).await.unwrap();
        assert_eq!(created.status, ReviewStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_blank_name_never_writes() {
        let mut submissions = MockSubmissionRepository::new();
        submissions.expect_create().times(0);

        let svc = service(
            submissions,
            MockClaimRepository::new(),
            MockVenueRepository::new(),
        );

        let result = svc
            .submit(NewSubmission {
                name: "   ".to_string(),
                ..NewSubmission::default()
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_normalize_rejects_half_coordinates() {
        let result = normalize_submission(NewSubmission {
            name: "Half".to_string(),
            lat: Some(-27.4),
            ..NewSubmission::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_rejects_out_of_range() {
        let result = normalize_submission(NewSubmission {
            name: "Mars Bar".to_string(),
            lat: Some(123.0),
            lng: Some(0.0),
            ..NewSubmission::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_venue_type_slug() {
        let ok = normalize_submission(NewSubmission {
            name: "Cafe".to_string(),
            venue_type: Some("Cafe".to_string()),
            ..NewSubmission::default()
        })
        .unwrap();
        assert_eq!(ok.venue_type.as_deref(), Some("cafe"));

        let bad = normalize_submission(NewSubmission {
            name: "Cafe".to_string(),
            venue_type: Some("cafe; drop".to_string()),
            ..NewSubmission::default()
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("example.com").unwrap(), "https://example.com/");
        assert_eq!(
            normalize_website("http://pub.example/menu").unwrap(),
            "http://pub.example/menu"
        );
        assert!(normalize_website("ftp://example.com").is_err());
        assert!(normalize_website("https://").is_err());
    }

    #[test]
    fn test_normalize_contact_email() {
        let bad = normalize_submission(NewSubmission {
            name: "Pub".to_string(),
            contact_email: Some("not-an-email".to_string()),
            ..NewSubmission::default()
        });
        assert!(bad.is_err());
    }

    #[tokio::test]
    async fn test_claim_requires_valid_email() {
        let mut claims = MockClaimRepository::new();
        claims.expect_create().times(0);

        let svc = service(MockSubmissionRepository::new(), claims, MockVenueRepository::new());

        for email in ["", "   ", "nope"] {
            let result = svc
                .claim(NewClaim {
                    venue_id: 1,
                    claimant_email: email.to_string(),
                    claimant_message: None,
                })
                .await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_claim_unknown_venue() {
        let mut venues = MockVenueRepository::new();
        venues.expect_find_by_id().times(1).returning(|_| Ok(None));

        let svc = service(MockSubmissionRepository::new(), MockClaimRepository::new(), venues);

        let result = svc
            .claim(NewClaim {
                venue_id: 77,
                claimant_email: "a@b.com".to_string(),
                claimant_message: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_claim_success() {
        let mut venues = MockVenueRepository::new();
        venues
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(Venue::new(id, "The Local", "pub"))));

        let mut claims = MockClaimRepository::new();
        claims
            .expect_create()
            .withf(|c| c.claimant_email == "a@b.com" && c.claimant_message.is_none())
            .times(1)
            .returning(|c| {
                Ok(Claim {
                    id: 5,
                    venue_id: c.venue_id,
                    claimant_email: c.claimant_email,
                    claimant_message: c.claimant_message,
                    status: ReviewStatus::Pending,
                    reviewer_notes: None,
                    reviewed_at: None,
                    created_at: Utc::now(),
                })
            });

        let svc = service(MockSubmissionRepository::new(), claims, venues);

        let claim = svc
            .claim(NewClaim {
                venue_id: 3,
                claimant_email: " a@b.com ".to_string(),
                claimant_message: Some("".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(claim.id, 5);
        assert_eq!(claim.venue_id, 3);
    }
}
