//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the carrier-locator domain.
//! They have no external dependencies and contain only business logic.

use crate::domain::value_objects::GeoPoint;
use serde::{Deserialize, Serialize};

/// A service provider that can be recommended to a user.
///
/// Carriers come from an external dataset and are read-only to the core.
/// A carrier whose source row had malformed coordinates has no location;
/// it is still ranked, but always sorts last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    /// Carrier display name
    pub name: String,
    /// State or province the carrier operates from
    pub state: String,
    /// Street address as given in the dataset
    pub address: String,
    /// Geocoded location, absent when the dataset row was malformed
    pub location: Option<GeoPoint>,
}

impl Carrier {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        address: impl Into<String>,
        location: Option<GeoPoint>,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            address: address.into(),
            location,
        }
    }
}

/// A carrier annotated with its distance from a query point.
///
/// Produced only by the selector and never mutated afterwards.
/// `distance_km` is `f64::INFINITY` when the distance could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCarrier {
    pub carrier: Carrier,
    #[serde(serialize_with = "serialize_distance")]
    pub distance_km: f64,
}

impl RankedCarrier {
    pub fn new(carrier: Carrier, distance_km: f64) -> Self {
        Self {
            carrier,
            distance_km,
        }
    }

    /// Whether a real distance was computed for this carrier.
    pub fn is_reachable(&self) -> bool {
        self.distance_km.is_finite()
    }
}

/// Infinite distances have no JSON representation; they are written as `null`.
fn serialize_distance<S>(distance: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if distance.is_finite() {
        serializer.serialize_some(distance)
    } else {
        serializer.serialize_none()
    }
}

/// True when the ranking holds no real match (empty, or every entry infinite).
pub fn all_unreachable(ranked: &[RankedCarrier]) -> bool {
    ranked.iter().all(|r| !r.is_reachable())
}

/// Renderable description of one query's map.
///
/// Built once per query by the map builder and consumed by a renderer.
/// `carrier_markers` keeps the ranked order (closest first) so list entries
/// line up with map markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapModel {
    pub center: GeoPoint,
    pub user_marker: GeoPoint,
    pub carrier_markers: Vec<RankedCarrier>,
    pub coverage_radius_meters: f64,
}
