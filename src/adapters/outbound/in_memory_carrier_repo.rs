//! In-Memory Carrier Repository
//!
//! Implements CarrierRepository over an immutable snapshot loaded once at
//! startup. The snapshot is shared without locking.

use crate::domain::entities::Carrier;
use crate::domain::ports::CarrierRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Immutable carrier dataset.
#[derive(Clone)]
pub struct InMemoryCarrierRepository {
    carriers: Arc<[Carrier]>,
}

impl InMemoryCarrierRepository {
    pub fn new(carriers: Vec<Carrier>) -> Self {
        Self {
            carriers: carriers.into(),
        }
    }

    /// Repository with no carriers.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl Default for InMemoryCarrierRepository {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl CarrierRepository for InMemoryCarrierRepository {
    async fn get_all(&self) -> Arc<[Carrier]> {
        self.carriers.clone()
    }

    async fn count(&self) -> usize {
        self.carriers.len()
    }
}
