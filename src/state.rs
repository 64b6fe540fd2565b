//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{
    AdminAuthService, BillingService, CheckoutSettings, IntakeService, ReviewService,
    VenueService,
};
use crate::domain::gateways::{BillingGateway, GeocodingGateway};
use crate::domain::repositories::{
    ClaimRepository, SubmissionRepository, SubscriptionRepository, VenueRepository,
};
use crate::domain::search::DEFAULT_VENUE_LIMIT;

/// Repository implementations the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub venues: Arc<dyn VenueRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub claims: Arc<dyn ClaimRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

/// Outbound clients, constructed once at startup.
#[derive(Clone)]
pub struct Gateways {
    pub billing: Arc<dyn BillingGateway>,
    pub geocoder: Arc<dyn GeocodingGateway>,
}

/// Service-level settings resolved from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub venue_result_limit: i64,
    pub checkout: CheckoutSettings,
    pub admin_password: Option<String>,
    pub admin_session_secret: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            venue_result_limit: DEFAULT_VENUE_LIMIT,
            checkout: CheckoutSettings::default(),
            admin_password: None,
            admin_session_secret: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub venue_service: Arc<VenueService>,
    pub intake_service: Arc<IntakeService>,
    pub review_service: Arc<ReviewService>,
    pub billing_service: Arc<BillingService>,
    pub auth_service: Arc<AdminAuthService>,
    pub geocoder: Arc<dyn GeocodingGateway>,
}

impl AppState {
    pub fn new(repos: Repositories, gateways: Gateways, settings: ServiceSettings) -> Self {
        let venue_service = Arc::new(VenueService::new(
            repos.venues.clone(),
            settings.venue_result_limit,
        ));

        let intake_service = Arc::new(IntakeService::new(
            repos.submissions.clone(),
            repos.claims.clone(),
            repos.venues.clone(),
        ));

        let review_service = Arc::new(ReviewService::new(
            repos.submissions.clone(),
            repos.claims.clone(),
        ));

        let billing_service = Arc::new(BillingService::new(
            repos.venues,
            repos.subscriptions,
            gateways.billing,
            settings.checkout,
        ));

        let auth_service = Arc::new(AdminAuthService::new(
            settings.admin_password,
            settings.admin_session_secret,
        ));

        Self {
            venue_service,
            intake_service,
            review_service,
            billing_service,
            auth_service,
            geocoder: gateways.geocoder,
        }
    }
}
