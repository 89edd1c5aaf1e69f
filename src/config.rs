use crate::adapters::outbound::{
    DEFAULT_GOOGLE_BASE_URL, DEFAULT_MAP_ZOOM, DEFAULT_NOMINATIM_BASE_URL,
};
use crate::application::DEFAULT_RESULT_COUNT;
use crate::domain::services::DEFAULT_COVERAGE_RADIUS_METERS;
use serde::Deserialize;

/// Geocoding provider selected by `CARRIER_LOCATOR_GEOCODER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocoderKind {
    Google,
    Nominatim,
}

impl GeocoderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "google" => Some(Self::Google),
            "nominatim" | "osm" => Some(Self::Nominatim),
            _ => None,
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown geocoder {0:?} (expected google or nominatim)")]
    UnknownGeocoder(String),
    #[error("CARRIER_LOCATOR_GOOGLE_API_KEY is required for the google geocoder")]
    MissingApiKey,
    #[error("result count must be at least 1")]
    ZeroResultCount,
    #[error("coverage radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),
    #[error("dataset source is empty")]
    EmptyDataset,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Dataset
    pub dataset_source: String,

    // Geocoding
    pub geocoder: String,
    pub google_api_key: Option<String>,
    pub google_base_url: String,
    pub nominatim_base_url: String,
    pub geocode_timeout_secs: u64,

    // Query and map
    pub result_count: usize,
    pub coverage_radius_meters: f64,
    pub map_zoom: u8,
    pub map_output_path: String,

    // HTTP API settings
    pub api_enabled: bool,
    pub api_listen_addr: String,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_source: "carriers.csv".to_string(),
            geocoder: "google".to_string(),
            google_api_key: None,
            google_base_url: DEFAULT_GOOGLE_BASE_URL.to_string(),
            nominatim_base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            geocode_timeout_secs: 10,
            result_count: DEFAULT_RESULT_COUNT,
            coverage_radius_meters: DEFAULT_COVERAGE_RADIUS_METERS,
            map_zoom: DEFAULT_MAP_ZOOM,
            map_output_path: "carrier_map.html".to_string(),
            api_enabled: false,
            api_listen_addr: "0.0.0.0:8090".to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// The configured geocoder, if the name is recognised.
    pub fn geocoder_kind(&self) -> Result<GeocoderKind, ConfigError> {
        GeocoderKind::from_name(&self.geocoder)
            .ok_or_else(|| ConfigError::UnknownGeocoder(self.geocoder.clone()))
    }

    /// Check values that would otherwise fail at query time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset_source.trim().is_empty() {
            return Err(ConfigError::EmptyDataset);
        }
        if self.result_count == 0 {
            return Err(ConfigError::ZeroResultCount);
        }
        if !self.coverage_radius_meters.is_finite() || self.coverage_radius_meters <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.coverage_radius_meters));
        }
        let has_key = self
            .google_api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());
        if self.geocoder_kind()? == GeocoderKind::Google && !has_key {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

pub fn load_config() -> anyhow::Result<Config> {
    let defaults = Config::default();

    let dataset_source = std::env::var("CARRIER_LOCATOR_DATASET")
        .unwrap_or(defaults.dataset_source);

    let geocoder = std::env::var("CARRIER_LOCATOR_GEOCODER")
        .unwrap_or(defaults.geocoder);

    let google_api_key = std::env::var("CARRIER_LOCATOR_GOOGLE_API_KEY").ok();

    let google_base_url = std::env::var("CARRIER_LOCATOR_GOOGLE_BASE_URL")
        .unwrap_or(defaults.google_base_url);

    let nominatim_base_url = std::env::var("CARRIER_LOCATOR_NOMINATIM_BASE_URL")
        .unwrap_or(defaults.nominatim_base_url);

    let geocode_timeout_secs = std::env::var("CARRIER_LOCATOR_GEOCODE_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(defaults.geocode_timeout_secs);

    let result_count = std::env::var("CARRIER_LOCATOR_RESULT_COUNT")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .unwrap_or(defaults.result_count);

    let coverage_radius_meters = std::env::var("CARRIER_LOCATOR_COVERAGE_RADIUS_M")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .unwrap_or(defaults.coverage_radius_meters);

    let map_zoom = std::env::var("CARRIER_LOCATOR_MAP_ZOOM")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(defaults.map_zoom);

    let map_output_path = std::env::var("CARRIER_LOCATOR_MAP_OUTPUT")
        .unwrap_or(defaults.map_output_path);

    // HTTP API settings
    let api_enabled = env_flag("CARRIER_LOCATOR_API_ENABLED");

    let api_listen_addr = std::env::var("CARRIER_LOCATOR_API_LISTEN_ADDR")
        .unwrap_or(defaults.api_listen_addr);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        dataset_source,
        geocoder,
        google_api_key,
        google_base_url,
        nominatim_base_url,
        geocode_timeout_secs,
        result_count,
        coverage_radius_meters,
        map_zoom,
        map_output_path,
        api_enabled,
        api_listen_addr,
        debug,
    })
}
