//! Application layer services implementing business logic.
//!
//! Services consume repository and gateway traits and expose the operations
//! HTTP handlers and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::VenueService`] - search, nearby lookup, single venue reads
//! - [`services::IntakeService`] - public submissions and claims
//! - [`services::ReviewService`] - admin approve/reject workflow
//! - [`services::BillingService`] - checkout and subscription reconciliation
//! - [`services::AdminAuthService`] - shared-password admin sessions

pub mod services;
