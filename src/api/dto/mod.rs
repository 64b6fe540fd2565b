//! Data Transfer Objects for the JSON API.
//!
//! Domain entities never serialize directly; each response shape is declared
//! here so that internal fields (such as `owner_email`) cannot leak.

pub mod admin;
pub mod billing;
pub mod geocode;
pub mod health;
pub mod intake;
pub mod venues;
