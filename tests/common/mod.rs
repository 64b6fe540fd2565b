#![allow(dead_code)]

//! In-memory stand-ins for the PostgreSQL repositories and outbound gateways.
//!
//! One [`MemoryStore`] backs all four repository traits so that approvals and
//! billing updates are visible through venue reads, the way a shared database
//! would behave.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::json;

use playground_venues::AppError;
use playground_venues::application::services::CheckoutSettings;
use playground_venues::domain::entities::{
    Claim, ClaimWithVenue, DEFAULT_VENUE_TYPE, NearbyVenue, NewClaim, NewSubmission, Plan,
    ReviewStatus, Submission, Subscription, SubscriptionUpsert, Venue,
};
use playground_venues::domain::gateways::{
    BillingGateway, BillingSubscription, CheckoutRequest, CheckoutSession, GeocodeResult,
    GeocodingGateway, WebhookEvent,
};
use playground_venues::domain::geo::{self, Coordinate};
use playground_venues::domain::repositories::{
    ClaimRepository, SubmissionRepository, SubscriptionRepository, VenueRepository,
};
use playground_venues::domain::search::{self, NearbyQuery, VenueFilter};
use playground_venues::infrastructure::stripe::{events, signature};
use playground_venues::routes::plain_router;
use playground_venues::state::{AppState, Gateways, Repositories, ServiceSettings};

pub const ADMIN_PASSWORD: &str = "letmein";
pub const WEBHOOK_SECRET: &str = "whsec_test";
pub const PUBLIC_BASE_URL: &str = "https://venues.test";

#[derive(Default)]
struct Tables {
    venues: Vec<Venue>,
    submissions: Vec<Submission>,
    claims: Vec<Claim>,
    subscriptions: Vec<Subscription>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Inserts `venue`, assigning a fresh id.
    pub fn insert_venue(&self, mut venue: Venue) -> i64 {
        let mut t = self.tables();
        venue.id = t.next_id();
        let id = venue.id;
        t.venues.push(venue);
        id
    }

    pub fn venue(&self, id: i64) -> Option<Venue> {
        self.tables().venues.iter().find(|v| v.id == id).cloned()
    }

    pub fn venues(&self) -> Vec<Venue> {
        self.tables().venues.clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.tables().submissions.clone()
    }

    pub fn claims(&self) -> Vec<Claim> {
        self.tables().claims.clone()
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.tables().subscriptions.clone()
    }
}

fn already_reviewed(id: i64) -> AppError {
    AppError::conflict("Already reviewed", json!({ "id": id }))
}

#[async_trait]
impl VenueRepository for MemoryStore {
    async fn search(&self, filter: &VenueFilter) -> Result<Vec<Venue>, AppError> {
        let mut rows: Vec<Venue> = self
            .tables()
            .venues
            .iter()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();

        search::sort_venues(&mut rows, filter.sort, filter.origin);
        rows.truncate(filter.limit.max(0) as usize);

        Ok(rows)
    }

    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyVenue>, AppError> {
        let rows = self
            .tables()
            .venues
            .iter()
            .filter(|v| v.approved)
            .filter(|v| {
                query
                    .venue_type
                    .as_deref()
                    .is_none_or(|t| v.venue_type.eq_ignore_ascii_case(t))
            })
            .filter(|v| !query.near_playground || v.facilities.playground)
            .filter_map(|v| {
                let (lat, lng) = v.position()?;
                let distance_m =
                    geo::distance_km(&query.center, &Coordinate::new(lat, lng)) * 1000.0;
                (distance_m <= query.radius_m).then(|| NearbyVenue {
                    venue: v.clone(),
                    distance_m,
                    playground_distance_m: v.facilities.playground.then_some(0.0),
                })
            })
            .take(query.limit.max(0) as usize)
            .collect();

        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Venue>, AppError> {
        Ok(self.venue(id))
    }

    async fn set_featured(&self, id: i64, featured: bool) -> Result<bool, AppError> {
        let mut t = self.tables();
        Ok(match t.venues.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.is_featured = featured;
                true
            }
            None => false,
        })
    }

    async fn set_claimed(&self, id: i64, claimed: bool) -> Result<bool, AppError> {
        let mut t = self.tables();
        Ok(match t.venues.iter_mut().find(|v| v.id == id) {
            Some(v) => {
                v.claimed = claimed;
                true
            }
            None => false,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MemoryStore {
    async fn create(&self, new_submission: NewSubmission) -> Result<Submission, AppError> {
        let mut t = self.tables();
        let submission = Submission {
            id: t.next_id(),
            submitted_name: new_submission.name,
            submitted_venue_type: new_submission.venue_type,
            submitted_address: new_submission.address,
            submitted_notes: new_submission.notes,
            submitted_website: new_submission.website,
            submitted_phone: new_submission.phone,
            submitted_email: new_submission.contact_email,
            submitted_lat: new_submission.lat,
            submitted_lng: new_submission.lng,
            status: ReviewStatus::Pending,
            reviewer_notes: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };
        t.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Submission>, AppError> {
        Ok(self.tables().submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<ReviewStatus>,
        limit: i64,
    ) -> Result<Vec<Submission>, AppError> {
        let mut rows = self.submissions();
        rows.retain(|s| status.is_none_or(|status| s.status == status));
        rows.reverse();
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn approve(&self, submission: &Submission) -> Result<Venue, AppError> {
        let (lat, lng) = submission
            .coordinates()
            .ok_or_else(|| AppError::bad_request("Submission has no coordinates", json!({})))?;
        let external_id = submission.venue_external_id();

        let mut t = self.tables();
        match t.submissions.iter().find(|s| s.id == submission.id) {
            Some(s) if s.status.is_pending() => {}
            _ => return Err(already_reviewed(submission.id)),
        }

        let existing = t
            .venues
            .iter()
            .position(|v| v.external_id.as_deref() == Some(external_id.as_str()));
        let index = match existing {
            Some(index) => index,
            None => {
                let id = t.next_id();
                t.venues.push(Venue::new(id, "", DEFAULT_VENUE_TYPE));
                t.venues.len() - 1
            }
        };

        let venue = &mut t.venues[index];
        venue.external_id = Some(external_id);
        venue.name = submission.submitted_name.clone();
        venue.venue_type = submission
            .submitted_venue_type
            .clone()
            .unwrap_or_else(|| DEFAULT_VENUE_TYPE.to_string());
        venue.address = submission.submitted_address.clone();
        venue.notes = submission.submitted_notes.clone();
        venue.website = submission.submitted_website.clone();
        venue.phone = submission.submitted_phone.clone();
        venue.lat = Some(lat);
        venue.lng = Some(lng);
        venue.approved = true;
        let venue = venue.clone();

        if let Some(s) = t.submissions.iter_mut().find(|s| s.id == submission.id) {
            s.status = ReviewStatus::Approved;
            s.reviewed_at = Some(Utc::now());
        }

        Ok(venue)
    }

    async fn reject(&self, id: i64, reason: Option<String>) -> Result<Submission, AppError> {
        let mut t = self.tables();
        match t.submissions.iter_mut().find(|s| s.id == id) {
            Some(s) if s.status.is_pending() => {
                s.status = ReviewStatus::Rejected;
                s.reviewer_notes = reason;
                s.reviewed_at = Some(Utc::now());
                Ok(s.clone())
            }
            _ => Err(already_reviewed(id)),
        }
    }
}

#[async_trait]
impl ClaimRepository for MemoryStore {
    async fn create(&self, new_claim: NewClaim) -> Result<Claim, AppError> {
        let mut t = self.tables();
        let claim = Claim {
            id: t.next_id(),
            venue_id: new_claim.venue_id,
            claimant_email: new_claim.claimant_email,
            claimant_message: new_claim.claimant_message,
            status: ReviewStatus::Pending,
            reviewer_notes: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };
        t.claims.push(claim.clone());
        Ok(claim)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Claim>, AppError> {
        Ok(self.tables().claims.iter().find(|c| c.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<ReviewStatus>,
        limit: i64,
    ) -> Result<Vec<ClaimWithVenue>, AppError> {
        let t = self.tables();
        Ok(t.claims
            .iter()
            .rev()
            .filter(|c| status.is_none_or(|status| c.status == status))
            .take(limit.max(0) as usize)
            .map(|c| ClaimWithVenue {
                claim: c.clone(),
                venue_name: t
                    .venues
                    .iter()
                    .find(|v| v.id == c.venue_id)
                    .map(|v| v.name.clone()),
            })
            .collect())
    }

    async fn approve(&self, claim: &Claim) -> Result<Claim, AppError> {
        let mut t = self.tables();
        match t.claims.iter().find(|c| c.id == claim.id) {
            Some(c) if c.status.is_pending() => {}
            _ => return Err(already_reviewed(claim.id)),
        }

        let venue = t
            .venues
            .iter_mut()
            .find(|v| v.id == claim.venue_id)
            .ok_or_else(|| AppError::not_found("Venue not found", json!({})))?;
        venue.claimed = true;
        venue.owner_email = Some(claim.claimant_email.clone());

        let stored = t
            .claims
            .iter_mut()
            .find(|c| c.id == claim.id)
            .ok_or_else(|| already_reviewed(claim.id))?;
        stored.status = ReviewStatus::Approved;
        stored.reviewed_at = Some(Utc::now());
        Ok(stored.clone())
    }

    async fn reject(&self, id: i64, reason: Option<String>) -> Result<Claim, AppError> {
        let mut t = self.tables();
        match t.claims.iter_mut().find(|c| c.id == id) {
            Some(c) if c.status.is_pending() => {
                c.status = ReviewStatus::Rejected;
                c.reviewer_notes = reason;
                c.reviewed_at = Some(Utc::now());
                Ok(c.clone())
            }
            _ => Err(already_reviewed(id)),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn upsert(&self, upsert: SubscriptionUpsert) -> Result<Subscription, AppError> {
        let mut t = self.tables();
        let now = Utc::now();

        if let Some(row) = t
            .subscriptions
            .iter_mut()
            .find(|s| s.stripe_subscription_id == upsert.stripe_subscription_id)
        {
            row.venue_id = upsert.venue_id;
            row.plan = upsert.plan;
            row.status = upsert.status;
            row.stripe_customer_id = upsert.stripe_customer_id;
            row.start_date = upsert.start_date;
            row.end_date = upsert.end_date;
            row.updated_at = now;
            return Ok(row.clone());
        }

        let row = Subscription {
            id: t.next_id(),
            venue_id: upsert.venue_id,
            plan: upsert.plan,
            status: upsert.status,
            stripe_customer_id: upsert.stripe_customer_id,
            stripe_subscription_id: upsert.stripe_subscription_id,
            start_date: upsert.start_date,
            end_date: upsert.end_date,
            created_at: now,
            updated_at: now,
        };
        t.subscriptions.push(row.clone());
        Ok(row)
    }

    async fn find_by_stripe_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, AppError> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .find(|s| s.stripe_subscription_id == stripe_subscription_id)
            .cloned())
    }
}

/// Billing gateway that verifies webhooks for real but never leaves the process.
#[derive(Default)]
pub struct FakeBilling {
    pub configured: bool,
    pub subscriptions: Mutex<HashMap<String, BillingSubscription>>,
    pub checkouts: Mutex<Vec<CheckoutRequest>>,
}

impl FakeBilling {
    pub fn configured() -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            ..Self::default()
        })
    }

    pub fn put_subscription(&self, subscription: BillingSubscription) {
        self.subscriptions
            .lock()
            .unwrap()
            .insert(subscription.id.clone(), subscription);
    }
}

#[async_trait]
impl BillingGateway for FakeBilling {
    fn ensure_checkout_configured(&self) -> Result<(), AppError> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::configuration(
                "STRIPE_SECRET_KEY is not configured",
                json!({}),
            ))
        }
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, AppError> {
        let mut checkouts = self.checkouts.lock().unwrap();
        checkouts.push(request.clone());
        let id = format!("cs_test_{}", checkouts.len());
        Ok(CheckoutSession {
            url: format!("https://checkout.test/pay/{id}"),
            id,
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<BillingSubscription, AppError> {
        self.subscriptions
            .lock()
            .unwrap()
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| AppError::upstream("No such subscription", json!({})))
    }

    fn decode_event(
        &self,
        payload: &[u8],
        signature: Option<String>,
    ) -> Result<WebhookEvent, AppError> {
        events::decode(
            payload,
            signature.as_deref(),
            Some(WEBHOOK_SECRET),
            Utc::now().timestamp(),
        )
    }
}

/// Resolves "brisbane" and nothing else.
pub struct FakeGeocoder;

#[async_trait]
impl GeocodingGateway for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, AppError> {
        Ok(query
            .trim()
            .eq_ignore_ascii_case("brisbane")
            .then(|| GeocodeResult {
                lat: -27.4698,
                lng: 153.0251,
                display: "Brisbane, Queensland, Australia".to_string(),
            }))
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub billing: Arc<FakeBilling>,
}

pub fn settings() -> ServiceSettings {
    ServiceSettings {
        checkout: CheckoutSettings {
            prices: HashMap::from([
                (Plan::FeaturedMonthly, "price_featured_monthly".to_string()),
                (Plan::ClaimedPlus, "price_claimed_plus".to_string()),
            ]),
            public_base_url: Some(PUBLIC_BASE_URL.parse().unwrap()),
        },
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        admin_session_secret: Some("test-session-secret".to_string()),
        ..ServiceSettings::default()
    }
}

pub fn create_test_state(
    store: Arc<MemoryStore>,
    billing: Arc<FakeBilling>,
    settings: ServiceSettings,
) -> AppState {
    let repos = Repositories {
        venues: store.clone(),
        submissions: store.clone(),
        claims: store.clone(),
        subscriptions: store,
    };
    let gateways = Gateways {
        billing,
        geocoder: Arc::new(FakeGeocoder),
    };
    AppState::new(repos, gateways, settings)
}

pub fn spawn_with(settings: ServiceSettings) -> TestApp {
    let store = MemoryStore::new();
    let billing = FakeBilling::configured();
    let state = create_test_state(store.clone(), billing.clone(), settings);
    let server = TestServer::new(plain_router(state)).unwrap();
    TestApp {
        server,
        store,
        billing,
    }
}

pub fn spawn() -> TestApp {
    spawn_with(settings())
}

/// Approved venue at `(lat, lng)`.
pub fn venue_at(name: &str, lat: f64, lng: f64) -> Venue {
    let mut v = Venue::new(0, name, "pub");
    v.lat = Some(lat);
    v.lng = Some(lng);
    v
}

/// `Stripe-Signature` value for `payload`, signed now with [`WEBHOOK_SECRET`].
pub fn sign(payload: &[u8]) -> String {
    signature::sign(payload, WEBHOOK_SECRET, Utc::now().timestamp())
}

/// Logs in and returns the `name=value` cookie pair.
pub async fn admin_cookie(server: &TestServer) -> String {
    let response = server
        .post("/api/admin/login")
        .json(&json!({ "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    set_cookie.split(';').next().unwrap().to_string()
}
