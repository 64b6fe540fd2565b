//! Geocoding gateway implementations.

pub mod nominatim;

pub use nominatim::NominatimGeocoder;
