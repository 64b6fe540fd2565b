//! DTOs for `GET /api/geocode`.

use serde::{Deserialize, Serialize};

use crate::domain::gateways::GeocodeResult;

#[derive(Debug, Default, Deserialize)]
pub struct GeocodeParams {
    pub q: Option<String>,
}

/// `result` is `null` when nothing matched.
#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub result: Option<GeocodeResult>,
}
