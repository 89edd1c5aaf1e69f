//! Carrier Locator Service - Main application use case
//!
//! Orchestrates one query: geocode the address, rank the carriers, build the
//! map model and optionally render it. This is the primary interface for the
//! inbound adapters.

use crate::domain::entities::{all_unreachable, MapModel, RankedCarrier};
use crate::domain::ports::{CarrierRepository, Geocoder, MapRenderer};
use crate::domain::services::{MapModelBuilder, NearestCarrierSelector};
use crate::domain::value_objects::GeoPoint;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Number of carriers returned when the caller does not ask for a count.
pub const DEFAULT_RESULT_COUNT: usize = 3;

/// Result of a successful query.
#[derive(Debug, Clone)]
pub struct LocateReport {
    /// Address as entered by the user
    pub address: String,
    /// Geocoded location of the address
    pub location: GeoPoint,
    /// Closest carriers, closest first
    pub carriers: Vec<RankedCarrier>,
    /// Map description for the renderer
    pub map: MapModel,
    /// Rendered map document, when a renderer is configured and succeeded
    pub rendered_map: Option<String>,
    /// Why rendering failed, if it did
    pub render_error: Option<String>,
}

/// Outcome of one locate query.
///
/// Every failure of an external collaborator ends up here as a reportable
/// value; nothing propagates past the service.
#[derive(Debug, Clone)]
pub enum LocateOutcome {
    Located(Box<LocateReport>),
    /// The dataset is empty; geocoding was not attempted.
    NoDataAvailable,
    /// The address was blank; geocoding was not attempted.
    EmptyAddress,
    /// The geocoder had no match for the address.
    AddressUnresolved { address: String },
    /// The geocoder failed.
    GeocodingFailed { address: String, reason: String },
    /// Ranking produced no real match (every carrier lacked a location).
    NoCarriersFound { address: String, location: GeoPoint },
}

impl LocateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Located(_))
    }

    /// Stable machine-readable name of the outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Located(_) => "located",
            Self::NoDataAvailable => "no_data_available",
            Self::EmptyAddress => "empty_address",
            Self::AddressUnresolved { .. } => "address_unresolved",
            Self::GeocodingFailed { .. } => "geocoding_failed",
            Self::NoCarriersFound { .. } => "no_carriers_found",
        }
    }

    /// User-facing message for the outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Located(report) => {
                format!("Found {} closest carriers.", report.carriers.len())
            }
            Self::NoDataAvailable => "No carrier data available.".to_string(),
            Self::EmptyAddress => "Enter your pickup address.".to_string(),
            Self::AddressUnresolved { .. } => {
                "Could not geocode the provided address.".to_string()
            }
            Self::GeocodingFailed { reason, .. } => {
                format!("An error occurred while geocoding: {}", reason)
            }
            Self::NoCarriersFound { .. } => "No carriers found near your location.".to_string(),
        }
    }

    pub fn report(&self) -> Option<&LocateReport> {
        match self {
            Self::Located(report) => Some(report),
            _ => None,
        }
    }
}

/// Carrier locator service - main application use case.
///
/// This service orchestrates the query logic:
/// 1. Fails fast when the dataset is empty
/// 2. Geocodes the address through the geocoder port
/// 3. Ranks carriers and builds the map model
/// 4. Renders the map when a renderer is configured
pub struct CarrierLocatorService {
    carrier_repo: Arc<dyn CarrierRepository>,
    geocoder: Arc<dyn Geocoder>,
    renderer: Option<Arc<dyn MapRenderer>>,
    map_builder: MapModelBuilder,
    result_count: usize,
}

impl CarrierLocatorService {
    /// Create a new locator service.
    pub fn new(
        carrier_repo: Arc<dyn CarrierRepository>,
        geocoder: Arc<dyn Geocoder>,
        renderer: Option<Arc<dyn MapRenderer>>,
        map_builder: MapModelBuilder,
        result_count: usize,
    ) -> Self {
        Self {
            carrier_repo,
            geocoder,
            renderer,
            map_builder,
            result_count,
        }
    }

    /// Locate the configured number of carriers closest to `address`.
    pub async fn locate(&self, address: &str) -> LocateOutcome {
        self.locate_top(address, self.result_count).await
    }

    /// Locate the `n` carriers closest to `address`.
    pub async fn locate_top(&self, address: &str, n: usize) -> LocateOutcome {
        let span = tracing::info_span!("locate", query_id = %Uuid::new_v4());
        let outcome = self.run_query(address, n).instrument(span.clone()).await;
        span.in_scope(|| tracing::info!(outcome = outcome.kind(), "query finished"));
        outcome
    }

    async fn run_query(&self, address: &str, n: usize) -> LocateOutcome {
        // 1. Fail fast on an empty dataset, before any external call
        let carriers = self.carrier_repo.get_all().await;
        if carriers.is_empty() {
            tracing::warn!("no carrier data available");
            return LocateOutcome::NoDataAvailable;
        }

        let address = address.trim();
        if address.is_empty() {
            return LocateOutcome::EmptyAddress;
        }

        // 2. Geocode once; no retries
        let location = match self.geocoder.geocode(address).await {
            Ok(Some(location)) => location,
            Ok(None) => {
                tracing::info!(geocoder = self.geocoder.name(), "address did not resolve");
                return LocateOutcome::AddressUnresolved {
                    address: address.to_string(),
                };
            }
            Err(e) => {
                tracing::warn!(geocoder = self.geocoder.name(), "geocoding failed: {}", e);
                return LocateOutcome::GeocodingFailed {
                    address: address.to_string(),
                    reason: e.to_string(),
                };
            }
        };
        tracing::debug!("address resolved to {}", location);

        // 3. Rank
        let ranked = NearestCarrierSelector::select_nearest(&location, &carriers, n);
        if all_unreachable(&ranked) {
            return LocateOutcome::NoCarriersFound {
                address: address.to_string(),
                location,
            };
        }

        // 4. Map model and optional rendering
        let map = self.map_builder.build(location, &ranked);
        let (rendered_map, render_error) = self.render(&map);

        LocateOutcome::Located(Box::new(LocateReport {
            address: address.to_string(),
            location,
            carriers: ranked,
            map,
            rendered_map,
            render_error,
        }))
    }

    fn render(&self, map: &MapModel) -> (Option<String>, Option<String>) {
        let Some(renderer) = &self.renderer else {
            return (None, None);
        };
        match renderer.render(map) {
            Ok(document) => (Some(document), None),
            Err(e) => {
                tracing::warn!("map rendering failed: {}", e);
                (None, Some(e.to_string()))
            }
        }
    }

    /// Number of carriers in the dataset.
    pub async fn dataset_size(&self) -> usize {
        self.carrier_repo.count().await
    }

    pub fn result_count(&self) -> usize {
        self.result_count
    }

    pub fn renderer(&self) -> Option<&Arc<dyn MapRenderer>> {
        self.renderer.as_ref()
    }
}
