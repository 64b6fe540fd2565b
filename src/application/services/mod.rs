//! Business logic services for the application layer.

pub mod auth_service;
pub mod billing_service;
pub mod intake_service;
pub mod review_service;
pub mod venue_service;

pub use auth_service::AdminAuthService;
pub use billing_service::{BillingService, CheckoutInput, CheckoutSettings, WebhookOutcome};
pub use intake_service::IntakeService;
pub use review_service::{ReviewOutcome, ReviewService};
pub use venue_service::VenueService;
