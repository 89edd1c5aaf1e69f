//! Geocoder Port
//!
//! Defines the interface for turning a free-text address into a point.

use crate::domain::value_objects::GeoPoint;
use async_trait::async_trait;

/// Failure of a geocoding collaborator.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding service returned HTTP {0}")]
    HttpStatus(u16),
    #[error("geocoding service error {status}: {message}")]
    Service { status: String, message: String },
    #[error("invalid geocoding response: {0}")]
    InvalidResponse(String),
}

/// Resolver for free-text addresses.
///
/// This is an outbound port that abstracts the geocoding provider.
/// Implementations may call Google, Nominatim, or a fixture table.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address to a single point.
    ///
    /// Returns `Ok(None)` when the provider has no match. Only the first
    /// (best) match is returned.
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;
}
