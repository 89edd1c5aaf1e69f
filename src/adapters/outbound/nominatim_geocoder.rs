//! Nominatim Geocoder
//!
//! Implements Geocoder using the OpenStreetMap Nominatim search API.
//! Nominatim requires an identifying User-Agent and needs no API key.

use crate::domain::ports::{GeocodeError, Geocoder};
use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = concat!("carrier-locator/", env!("CARGO_PKG_VERSION"));

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// OpenStreetMap Nominatim geocoder.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(address, "nominatim search request");

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::HttpStatus(response.status().as_u16()));
        }

        let results: Vec<SearchResult> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.without_url().to_string()))?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        let lat = parse_coordinate(&first.lat)?;
        let lon = parse_coordinate(&first.lon)?;
        GeoPoint::new(lat, lon)
            .map(Some)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.parse()
        .map_err(|_| GeocodeError::InvalidResponse(format!("bad coordinate: {:?}", raw)))
}
