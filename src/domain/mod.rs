//! Domain layer: entities, repository and gateway contracts, pure search logic.
//!
//! Nothing in here talks to the network or the database. The infrastructure
//! layer implements [`repositories`] and [`gateways`]; the application layer
//! composes them.
//!
//! - [`entities`] - venues, submissions, claims, subscriptions
//! - [`search`] - filter/sort contract for venue queries
//! - [`geo`] - haversine distance and region presets
//! - [`repositories`] - persistence traits
//! - [`gateways`] - outbound service traits (geocoding, billing)

pub mod entities;
pub mod gateways;
pub mod geo;
pub mod repositories;
pub mod search;
