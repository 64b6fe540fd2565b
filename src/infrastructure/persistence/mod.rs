//! PostgreSQL repository implementations.
//!
//! Queries are built at runtime (`sqlx::query_as` and `QueryBuilder`) and
//! decoded into the `FromRow` types in [`rows`].
//!
//! # Repositories
//!
//! - [`PgVenueRepository`] - venue search, nearby procedure, entitlement flags
//! - [`PgSubmissionRepository`] - submission queue and transactional approval
//! - [`PgClaimRepository`] - claim queue and transactional approval
//! - [`PgSubscriptionRepository`] - subscription upserts

pub mod pg_claim_repository;
pub mod pg_submission_repository;
pub mod pg_subscription_repository;
pub mod pg_venue_repository;
pub mod rows;
pub mod search_query;

pub use pg_claim_repository::PgClaimRepository;
pub use pg_submission_repository::PgSubmissionRepository;
pub use pg_subscription_repository::PgSubscriptionRepository;
pub use pg_venue_repository::PgVenueRepository;
