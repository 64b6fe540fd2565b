//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`. Mocks are
//! generated with `mockall` for unit tests; handler tests in `tests/` use the
//! in-memory fakes from `tests/common`.

pub mod claim_repository;
pub mod submission_repository;
pub mod subscription_repository;
pub mod venue_repository;

pub use claim_repository::ClaimRepository;
pub use submission_repository::SubmissionRepository;
pub use subscription_repository::SubscriptionRepository;
pub use venue_repository::VenueRepository;

#[cfg(test)]
pub use claim_repository::MockClaimRepository;
#[cfg(test)]
pub use submission_repository::MockSubmissionRepository;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
#[cfg(test)]
pub use venue_repository::MockVenueRepository;
