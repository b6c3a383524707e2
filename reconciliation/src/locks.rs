//! Per-entity update serialization
//!
//! Single-writer-per-entity discipline: concurrent approvals for the
//! same transaction or contract serialize on the entity's id, while
//! writers on different entities proceed independently. The guard is
//! held for the full validate → gateway → apply → persist span.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-entity exclusive update scopes
#[derive(Debug, Default)]
pub struct EntityLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl EntityLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive update scope for one entity id
    pub async fn acquire(&self, entity_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(entity_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}
