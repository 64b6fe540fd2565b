//! Infrastructure layer: concrete implementations of domain traits.
//!
//! - [`persistence`] - PostgreSQL repositories
//! - [`geocoding`] - Nominatim geocoder
//! - [`stripe`] - Stripe checkout, subscription lookup and webhook decoding

pub mod geocoding;
pub mod persistence;
pub mod stripe;
