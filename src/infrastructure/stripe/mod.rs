//! Stripe billing gateway.
//!
//! - [`client`] - REST calls (checkout sessions, subscription lookup)
//! - [`signature`] - `Stripe-Signature` header verification
//! - [`events`] - webhook payload parsing into domain events

pub mod client;
pub mod events;
pub mod signature;

pub use client::{DEFAULT_STRIPE_API_BASE, StripeClient};
