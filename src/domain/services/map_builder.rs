//! Map Model Builder
//!
//! Builds the renderable description of a query's map: one user marker,
//! one marker per ranked carrier, and a coverage circle.

use crate::domain::entities::{MapModel, RankedCarrier};
use crate::domain::value_objects::GeoPoint;

/// Default coverage circle radius (5 km).
pub const DEFAULT_COVERAGE_RADIUS_METERS: f64 = 5000.0;

/// Builder for [`MapModel`]s with a fixed coverage radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapModelBuilder {
    coverage_radius_meters: f64,
}

impl MapModelBuilder {
    pub fn new(coverage_radius_meters: f64) -> Self {
        Self {
            coverage_radius_meters,
        }
    }

    pub fn coverage_radius_meters(&self) -> f64 {
        self.coverage_radius_meters
    }

    /// Build the map model for `query` and its ranked carriers.
    pub fn build(&self, query: GeoPoint, ranked: &[RankedCarrier]) -> MapModel {
        build_map_model(query, ranked, self.coverage_radius_meters)
    }
}

impl Default for MapModelBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_COVERAGE_RADIUS_METERS)
    }
}

/// Build a map centered on `query`.
///
/// Carrier markers keep the ranked order (closest first).
pub fn build_map_model(
    query: GeoPoint,
    ranked: &[RankedCarrier],
    coverage_radius_meters: f64,
) -> MapModel {
    MapModel {
        center: query,
        user_marker: query,
        carrier_markers: ranked.to_vec(),
        coverage_radius_meters,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::entities::Carrier;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn ranked(name: &str, distance_km: f64) -> RankedCarrier {
        RankedCarrier::new(
            Carrier::new(name, "TS", "addr", Some(point(1.0, 1.0))),
            distance_km,
        )
    }

    #[test]
    fn test_build_centers_on_query() {
        let query = point(6.5, 3.4);
        let model = MapModelBuilder::default().build(query, &[]);

        assert_eq!(model.center, query);
        assert_eq!(model.user_marker, query);
    }

    #[test]
    fn test_build_preserves_ranked_order() {
        let entries = vec![ranked("near", 1.0), ranked("mid", 5.0), ranked("far", 9.0)];
        let model = MapModelBuilder::default().build(point(0.0, 0.0), &entries);

        assert_eq!(model.carrier_markers.len(), entries.len());
        assert_eq!(model.carrier_markers, entries);
    }

    #[test]
    fn test_build_with_empty_ranking() {
        let model = MapModelBuilder::default().build(point(0.0, 0.0), &[]);
        assert!(model.carrier_markers.is_empty());
    }

    #[test]
    fn test_build_keeps_infinite_entries() {
        let entries = vec![ranked("a", 2.0), ranked("b", f64::INFINITY)];
        let model = MapModelBuilder::default().build(point(0.0, 0.0), &entries);

        assert_eq!(model.carrier_markers.len(), 2);
        assert!(model.carrier_markers[1].distance_km.is_infinite());
    }

    #[test]
    fn test_default_radius_is_five_km() {
        let model = MapModelBuilder::default().build(point(0.0, 0.0), &[]);
        assert_eq!(model.coverage_radius_meters, 5000.0);
        assert_eq!(MapModelBuilder::default().coverage_radius_meters(), 5000.0);
    }

    #[test]
    fn test_custom_radius() {
        let model = MapModelBuilder::new(12_500.0).build(point(0.0, 0.0), &[]);
        assert_eq!(model.coverage_radius_meters, 12_500.0);
    }

    #[test]
    fn test_free_function_matches_builder() {
        let query = point(10.0, 20.0);
        let entries = vec![ranked("a", 3.0)];

        assert_eq!(
            build_map_model(query, &entries, 5000.0),
            MapModelBuilder::default().build(query, &entries)
        );
    }
}
