//! Nominatim-compatible geocoder.
//!
//! Issues `GET {base}/search?format=json&q=..&limit=1&addressdetails=0` and
//! takes the first hit. No caching and no client-side rate limiting; callers
//! hitting the public instance must respect its usage policy.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::domain::gateways::{GeocodeResult, GeocodingGateway};
use crate::error::AppError;

/// Public OpenStreetMap instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: Url,
}

impl NominatimGeocoder {
    /// Builds a geocoder sending `user_agent` on every request.
    pub fn new(mut base_url: Url, user_agent: &str) -> Result<Self, AppError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Cannot build geocoder client: {e}"), json!({}))
            })?;

        Ok(Self { client, base_url })
    }

    fn search_url(&self, query: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.join("search").map_err(|e| {
            AppError::configuration(format!("Invalid GEOCODER_URL: {e}"), json!({}))
        })?;

        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("limit", "1")
            .append_pair("addressdetails", "0");

        Ok(url)
    }
}

#[async_trait]
impl GeocodingGateway for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, AppError> {
        let url = self.search_url(query)?;

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "geocoder returned non-success status");
            return Ok(None);
        }

        let places: Vec<Place> = response.json().await?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => Ok(Some(GeocodeResult {
                lat,
                lng,
                display: place.display_name,
            })),
            _ => {
                tracing::warn!(lat = %place.lat, lon = %place.lon, "geocoder returned unparsable coordinates");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        let base = Url::parse(&format!("{}/", server.base_url())).unwrap();
        NominatimGeocoder::new(base, "playground-venues-test").unwrap()
    }

    #[tokio::test]
    async fn test_geocode_first_hit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("format", "json")
                    .query_param("q", "Paddington QLD")
                    .query_param("limit", "1")
                    .query_param("addressdetails", "0")
                    .header("user-agent", "playground-venues-test");
                then.status(200).json_body(serde_json::json!([
                    {"lat": "-27.4598", "lon": "153.0082", "display_name": "Paddington, Brisbane"},
                    {"lat": "0", "lon": "0", "display_name": "ignored"}
                ]));
            })
            .await;

        let result = geocoder(&server).geocode("Paddington QLD").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            Some(GeocodeResult {
                lat: -27.4598,
                lng: 153.0082,
                display: "Paddington, Brisbane".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_geocode_no_results() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).json_body(serde_json::json!([]));
            })
            .await;

        assert_eq!(geocoder(&server).geocode("nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_geocode_upstream_error_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(503);
            })
            .await;

        assert_eq!(geocoder(&server).geocode("Brisbane").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_geocode_transport_failure_is_upstream_error() {
        let base = Url::parse("http://127.0.0.1:1/").unwrap();
        let geocoder = NominatimGeocoder::new(base, "test").unwrap();

        let result = geocoder.geocode("Brisbane").await;
        assert!(matches!(result, Err(AppError::Upstream { .. })));
    }
}
