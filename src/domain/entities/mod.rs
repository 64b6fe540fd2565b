//! Core domain entities representing the directory's data model.
//!
//! Entities are plain data structures; persistence and rendering live in the
//! infrastructure and API layers.
//!
//! # Entity Types
//!
//! - [`Venue`] - A publicly listed place with facility attributes
//! - [`Submission`] - A proposed new venue awaiting review
//! - [`Claim`] - A proposed ownership claim over an existing venue
//! - [`Subscription`] - A billing subscription for paid placement
//!
//! Creation inputs use separate structs (`NewSubmission`, `NewClaim`,
//! `SubscriptionUpsert`).

pub mod claim;
pub mod review;
pub mod submission;
pub mod subscription;
pub mod venue;

pub use claim::{Claim, ClaimWithVenue, NewClaim};
pub use review::{ReviewAction, ReviewStatus};
pub use submission::{DEFAULT_VENUE_TYPE, NewSubmission, Submission};
pub use subscription::{Entitlement, Plan, Subscription, SubscriptionUpsert};
pub use venue::{Facilities, Facility, NearbyVenue, Venue};
