//! Nearest-Carrier Selector
//!
//! Pure domain logic for ranking carriers by distance from a query point.
//! This service has NO external dependencies beyond the distance function.

use crate::domain::entities::{Carrier, RankedCarrier};
use crate::domain::services::distance::geodesic_distance_km;
use crate::domain::value_objects::GeoPoint;

/// Selector for the carriers closest to a point.
///
/// Every candidate is ranked. A carrier whose distance cannot be computed
/// (no location, or a non-finite result) gets `f64::INFINITY`, so it stays
/// in the pool but only surfaces when there are fewer than `n` real matches.
pub struct NearestCarrierSelector;

impl NearestCarrierSelector {
    /// Return the `n` carriers closest to `query`, closest first.
    ///
    /// The sort is stable: exact ties keep their dataset order, with no
    /// secondary key. The result has `min(n, carriers.len())` entries.
    ///
    /// # Example
    /// ```
    /// use carrier_locator::{Carrier, GeoPoint, NearestCarrierSelector};
    ///
    /// let query = GeoPoint::new(0.0, 0.0).unwrap();
    /// let carriers = vec![
    ///     Carrier::new("Far", "S1", "1 Far Rd", Some(GeoPoint::new(0.0, 2.0).unwrap())),
    ///     Carrier::new("Lost", "S2", "2 Lost Rd", None),
    ///     Carrier::new("Near", "S3", "3 Near Rd", Some(GeoPoint::new(0.0, 1.0).unwrap())),
    /// ];
    ///
    /// let ranked = NearestCarrierSelector::select_nearest(&query, &carriers, 2);
    /// assert_eq!(ranked.len(), 2);
    /// assert_eq!(ranked[0].carrier.name, "Near");
    /// assert_eq!(ranked[1].carrier.name, "Far");
    /// ```
    pub fn select_nearest(query: &GeoPoint, carriers: &[Carrier], n: usize) -> Vec<RankedCarrier> {
        let mut ranked = Self::rank_all(query, carriers);
        ranked.truncate(n);
        ranked
    }

    /// Annotate and sort every carrier without truncating.
    pub fn rank_all(query: &GeoPoint, carriers: &[Carrier]) -> Vec<RankedCarrier> {
        let mut ranked: Vec<RankedCarrier> = carriers
            .iter()
            .map(|carrier| RankedCarrier::new(carrier.clone(), Self::distance_to(query, carrier)))
            .collect();

        // slice::sort_by is stable
        ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        ranked
    }

    fn distance_to(query: &GeoPoint, carrier: &Carrier) -> f64 {
        match carrier.location {
            Some(location) => {
                let km = geodesic_distance_km(query, &location);
                if km.is_finite() {
                    km
                } else {
                    tracing::debug!(carrier = %carrier.name, "distance not computable, ranking last");
                    f64::INFINITY
                }
            }
            None => f64::INFINITY,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // ===== Test Helpers =====

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn create_carrier(name: &str, lat: f64, lon: f64) -> Carrier {
        Carrier::new(name, "TS", format!("{} street", name), Some(point(lat, lon)))
    }

    fn create_malformed(name: &str) -> Carrier {
        Carrier::new(name, "TS", "nowhere", None)
    }

    fn names(ranked: &[RankedCarrier]) -> Vec<&str> {
        ranked.iter().map(|r| r.carrier.name.as_str()).collect()
    }

    fn assert_sorted(ranked: &[RankedCarrier]) {
        for pair in ranked.windows(2) {
            assert!(
                pair[0].distance_km <= pair[1].distance_km,
                "not sorted: {} > {}",
                pair[0].distance_km,
                pair[1].distance_km
            );
        }
    }

    // ===== Ranking Tests =====

    #[test]
    fn test_select_nearest_two_of_three() {
        let carriers = vec![
            create_carrier("A", 0.0, 0.0),
            create_carrier("B", 0.0, 1.0),
            create_carrier("C", 10.0, 10.0),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 2);

        assert_eq!(names(&result), vec!["A", "B"]);
        assert_eq!(result[0].distance_km, 0.0);
        assert!((result[1].distance_km - 111.3).abs() < 0.5);
    }

    #[test]
    fn test_select_nearest_reorders_dataset() {
        let carriers = vec![
            create_carrier("far", 10.0, 10.0),
            create_carrier("mid", 1.0, 1.0),
            create_carrier("near", 0.1, 0.1),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 3);

        assert_eq!(names(&result), vec!["near", "mid", "far"]);
        assert_sorted(&result);
    }

    #[test]
    fn test_select_nearest_length_is_min_of_n_and_dataset() {
        let carriers = vec![
            create_carrier("A", 1.0, 1.0),
            create_carrier("B", 2.0, 2.0),
            create_carrier("C", 3.0, 3.0),
        ];
        let query = point(0.0, 0.0);

        for n in 1..=6 {
            let result = NearestCarrierSelector::select_nearest(&query, &carriers, n);
            assert_eq!(result.len(), n.min(carriers.len()), "Failed for n={}", n);
            assert_sorted(&result);
        }
    }

    #[test]
    fn test_select_nearest_empty_dataset() {
        let result = NearestCarrierSelector::select_nearest(&point(12.0, 34.0), &[], 3);
        assert!(result.is_empty());
    }

    #[test]
    fn test_select_nearest_zero_n() {
        let carriers = vec![create_carrier("A", 1.0, 1.0)];
        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 0);
        assert!(result.is_empty());
    }

    // ===== Tie-break Tests =====

    #[test]
    fn test_exact_ties_keep_dataset_order() {
        let carriers = vec![
            create_carrier("first", 1.0, 1.0),
            create_carrier("second", 1.0, 1.0),
            create_carrier("third", 1.0, 1.0),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 3);

        assert_eq!(names(&result), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_symmetric_ties_keep_dataset_order() {
        // east and west of the query at the same distance
        let carriers = vec![
            create_carrier("west", 0.0, -1.0),
            create_carrier("east", 0.0, 1.0),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 2);

        assert_eq!(names(&result), vec!["west", "east"]);
    }

    // ===== Malformed Location Tests =====

    #[test]
    fn test_malformed_carriers_sort_last() {
        let carriers = vec![
            create_malformed("broken"),
            create_carrier("A", 1.0, 1.0),
            create_carrier("B", 2.0, 2.0),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 3);

        assert_eq!(names(&result), vec!["A", "B", "broken"]);
        assert!(result[2].distance_km.is_infinite());
    }

    #[test]
    fn test_malformed_carriers_excluded_when_enough_real_matches() {
        let carriers = vec![
            create_malformed("broken"),
            create_carrier("A", 1.0, 1.0),
            create_carrier("B", 2.0, 2.0),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 2);

        assert_eq!(names(&result), vec!["A", "B"]);
        assert!(result.iter().all(|r| r.is_reachable()));
    }

    #[test]
    fn test_all_malformed_returns_infinite_entries() {
        let carriers = vec![
            create_malformed("x"),
            create_malformed("y"),
            create_malformed("z"),
            create_malformed("w"),
        ];

        let result = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 3);

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|r| r.distance_km == f64::INFINITY));
        // infinite ties are stable too
        assert_eq!(names(&result), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_rank_all_does_not_truncate() {
        let carriers = vec![
            create_carrier("A", 3.0, 3.0),
            create_malformed("broken"),
            create_carrier("B", 1.0, 1.0),
        ];

        let result = NearestCarrierSelector::rank_all(&point(0.0, 0.0), &carriers);

        assert_eq!(names(&result), vec!["B", "A", "broken"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let carriers = vec![create_carrier("far", 5.0, 5.0), create_carrier("near", 0.5, 0.5)];
        let before = carriers.clone();

        let _ = NearestCarrierSelector::select_nearest(&point(0.0, 0.0), &carriers, 1);

        assert_eq!(carriers, before);
    }
}
