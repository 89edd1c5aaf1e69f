//! Carrier Repository Port
//!
//! Defines the interface for accessing the carrier dataset.
//! Implementations may hold an in-memory snapshot or reload from a source.

use crate::domain::entities::Carrier;
use async_trait::async_trait;
use std::sync::Arc;

/// Repository for reading the carrier dataset.
///
/// This is an outbound port. The dataset is read-only to the core: the
/// repository hands out a shared snapshot that concurrent queries can read
/// without locking.
#[async_trait]
pub trait CarrierRepository: Send + Sync {
    /// Get every carrier, including those without a location.
    async fn get_all(&self) -> Arc<[Carrier]>;

    /// Number of carriers in the dataset.
    async fn count(&self) -> usize;
}
