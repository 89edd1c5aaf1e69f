//! Google Geocoder
//!
//! Implements Geocoder using the Google Maps Geocoding API.

use crate::domain::ports::{GeocodeError, Geocoder};
use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://maps.googleapis.com";

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

/// Geocoding API response envelope.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Google Maps geocoder.
///
/// Status `OK` yields the first result, `ZERO_RESULTS` yields no match,
/// and any other status (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...) is a
/// service error.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Create a geocoder against `base_url` with a per-request timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = format!("{}{}", self.base_url, GEOCODE_PATH);
        tracing::debug!(address, "google geocode request");

        let response = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::HttpStatus(response.status().as_u16()));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.without_url().to_string()))?;

        match body.status.as_str() {
            "OK" => match body.results.into_iter().next() {
                Some(result) => {
                    let LatLng { lat, lng } = result.geometry.location;
                    GeoPoint::new(lat, lng)
                        .map(Some)
                        .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
                }
                None => Ok(None),
            },
            "ZERO_RESULTS" => Ok(None),
            other => Err(GeocodeError::Service {
                status: other.to_string(),
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
