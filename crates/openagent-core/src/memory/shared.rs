//! Lock-guarded handle for sharing one memory between concurrent callers.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::MemoryError;

use super::hierarchical::HierarchicalMemory;
use super::types::{Metadata, TierRole};

/// Cloneable handle to a [`HierarchicalMemory`] behind a single read/write lock.
///
/// Mutations (`add`, `clear`, `restore`) take the write lock; renders and snapshots
/// take the read lock. Tiers are only reachable through the owner, so one lock per
/// instance covers all of them.
#[derive(Debug, Clone, Default)]
pub struct SharedMemory {
    inner: Arc<RwLock<HierarchicalMemory>>,
}

impl SharedMemory {
    pub fn new(memory: HierarchicalMemory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(memory)),
        }
    }

    /// Acquire the read lock for several reads that must see the same state
    pub async fn read(&self) -> RwLockReadGuard<'_, HierarchicalMemory> {
        self.inner.read().await
    }

    /// Acquire the write lock for a compound mutation
    pub async fn write(&self) -> RwLockWriteGuard<'_, HierarchicalMemory> {
        self.inner.write().await
    }

    pub async fn add(
        &self,
        role: TierRole,
        content: impl Into<String>,
        metadata: Option<Metadata>,
    ) {
        self.inner.write().await.add(role, content, metadata);
    }

    pub async fn add_long_term(&self, content: impl Into<String>, metadata: Option<Metadata>) {
        self.add(TierRole::LongTerm, content, metadata).await;
    }

    pub async fn add_mid_term(&self, content: impl Into<String>, metadata: Option<Metadata>) {
        self.add(TierRole::MidTerm, content, metadata).await;
    }

    pub async fn add_short_term(&self, content: impl Into<String>, metadata: Option<Metadata>) {
        self.add(TierRole::ShortTerm, content, metadata).await;
    }

    pub async fn render(&self, role: TierRole, limit: Option<usize>) -> String {
        self.inner.read().await.render(role, limit)
    }

    pub async fn get_full_context(&self, include_short: bool) -> String {
        self.inner.read().await.get_full_context(include_short)
    }

    pub async fn get_compact_context(&self) -> String {
        self.inner.read().await.get_compact_context()
    }

    pub async fn clear_short_term(&self) {
        self.inner.write().await.clear_short_term();
    }

    pub async fn prune_expired(&self) -> usize {
        self.inner.write().await.prune_expired()
    }

    pub async fn to_value(&self) -> Value {
        self.inner.read().await.to_value()
    }

    pub async fn restore_from_value(&self, data: &Value) -> Result<(), MemoryError> {
        self.inner.write().await.restore_from_value(data)
    }
}

impl From<HierarchicalMemory> for SharedMemory {
    fn from(memory: HierarchicalMemory) -> Self {
        Self::new(memory)
    }
}
