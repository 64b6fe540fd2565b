//! Outbound service contracts.
//!
//! - [`GeocodingGateway`] - free-text place lookup
//! - [`BillingGateway`] - hosted checkout, subscription lookup, signed webhook decoding
//!
//! Implementations live in `crate::infrastructure::geocoding` and
//! `crate::infrastructure::stripe`.

pub mod billing;
pub mod geocoding;

pub use billing::{
    BillingEvent, BillingGateway, BillingSubscription, CheckoutRequest, CheckoutSession,
    EventMetadata, WebhookEvent,
};
pub use geocoding::{GeocodeResult, GeocodingGateway};

#[cfg(test)]
pub use billing::MockBillingGateway;
#[cfg(test)]
pub use geocoding::MockGeocodingGateway;
