//! Distance Function
//!
//! Ellipsoidal great-circle distance between two points on the Earth.

use crate::domain::value_objects::GeoPoint;
use geo::{Distance, Geodesic, Point};

const METERS_PER_KILOMETER: f64 = 1000.0;

/// Geodesic distance between `a` and `b` in kilometers.
///
/// Uses Karney's algorithm on the WGS-84 ellipsoid. Pure and symmetric;
/// the distance from a point to itself is zero.
///
/// # Examples
/// ```
/// use carrier_locator::{geodesic_distance_km, GeoPoint};
///
/// let a = GeoPoint::new(0.0, 0.0).unwrap();
/// let b = GeoPoint::new(0.0, 1.0).unwrap();
/// let km = geodesic_distance_km(&a, &b);
/// assert!((km - 111.32).abs() < 0.01);
/// ```
pub fn geodesic_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    // geo points are (x = longitude, y = latitude)
    let origin = Point::new(a.longitude(), a.latitude());
    let destination = Point::new(b.longitude(), b.latitude());
    Geodesic.distance(origin, destination) / METERS_PER_KILOMETER
}
