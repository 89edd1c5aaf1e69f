//! Domain Services - Pure business logic
//!
//! Distance, ranking and map-model construction. No I/O, no failure modes.

pub mod distance;
pub mod map_builder;
pub mod selector;

pub use distance::geodesic_distance_km;
pub use map_builder::{build_map_model, MapModelBuilder, DEFAULT_COVERAGE_RADIUS_METERS};
pub use selector::NearestCarrierSelector;
