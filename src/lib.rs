//! Carrier Locator Library
//!
//! Finds the logistics carriers closest to an address: geocode the address,
//! rank carriers by geodesic distance, and describe the result as a map.
//! The components are exposed for integration tests and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{CarrierLocatorService, LocateOutcome, LocateReport};
pub use config::{load_config, Config, ConfigError};
pub use domain::entities::{Carrier, MapModel, RankedCarrier};
pub use domain::ports::{CarrierRepository, GeocodeError, Geocoder, MapRenderer, RenderError};
pub use domain::services::{
    build_map_model, geodesic_distance_km, MapModelBuilder, NearestCarrierSelector,
};
pub use domain::value_objects::{CoordinateError, GeoPoint};
