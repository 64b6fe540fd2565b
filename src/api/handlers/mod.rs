//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod geocode;
pub mod health;
pub mod intake;
pub mod stripe;
pub mod venues;

pub use admin::{
    claim_list_handler, login_handler, logout_handler, review_claim_handler,
    review_submission_handler, submission_list_handler,
};
pub use geocode::geocode_handler;
pub use health::health_handler;
pub use intake::{create_claim_handler, create_submission_handler};
pub use stripe::{checkout_handler, webhook_handler};
pub use venues::{nearby_handler, venue_handler, venue_list_handler};
