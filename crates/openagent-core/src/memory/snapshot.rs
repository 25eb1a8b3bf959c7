//! Snapshot serialization for [`HierarchicalMemory`].
//!
//! Shape: `{"version": 1, "long_term": [...], "mid_term": [...], "short_term": [...]}`
//! where every entry is `{"content", "timestamp", "metadata"}`.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::MemoryError;

use super::hierarchical::HierarchicalMemory;
use super::types::{MemoryEntry, TierRole};

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u64 = 1;

const VERSION_KEY: &str = "version";

impl HierarchicalMemory {
    /// Serialize every tier verbatim into a plain nested mapping
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(VERSION_KEY.into(), Value::from(SNAPSHOT_VERSION));
        for role in TierRole::ALL {
            let entries = self.tier(role).entries().map(MemoryEntry::to_value).collect();
            obj.insert(role.as_str().into(), Value::Array(entries));
        }
        Value::Object(obj)
    }

    /// Restore tiers from a mapping produced by [`to_value`](Self::to_value).
    ///
    /// A missing tier key leaves that tier untouched; a present key replaces the tier's
    /// entries. The whole mapping is validated first, so on error nothing is applied.
    /// A snapshot without `version` is read as version 1.
    pub fn restore_from_value(&mut self, data: &Value) -> Result<(), MemoryError> {
        let obj = data.as_object().ok_or(MemoryError::NotAnObject)?;
        check_version(obj)?;

        let mut staged = Vec::with_capacity(TierRole::ALL.len());
        for role in TierRole::ALL {
            if let Some(value) = obj.get(role.as_str()) {
                staged.push((role, parse_tier(role, value)?));
            }
        }

        for (role, entries) in staged {
            let count = entries.len();
            let dropped = self.tier_mut(role).replace_entries(entries);
            if dropped > 0 {
                warn!(
                    tier = %role,
                    dropped,
                    capacity = self.tier(role).max_items(),
                    "persisted tier exceeds capacity; kept most recent entries"
                );
            }
            debug!(tier = %role, restored = count - dropped, "restored memory tier");
        }

        Ok(())
    }
}

fn check_version(obj: &Map<String, Value>) -> Result<(), MemoryError> {
    let Some(raw) = obj.get(VERSION_KEY) else {
        return Ok(());
    };

    match raw.as_u64() {
        Some(version) if (1..=SNAPSHOT_VERSION).contains(&version) => Ok(()),
        _ => Err(MemoryError::UnsupportedVersion {
            found: raw.to_string(),
            supported: SNAPSHOT_VERSION,
        }),
    }
}

fn parse_tier(role: TierRole, value: &Value) -> Result<Vec<MemoryEntry>, MemoryError> {
    let items = value
        .as_array()
        .ok_or_else(|| MemoryError::MalformedPersistedState {
            tier: role,
            index: None,
            message: "expected an array of entries".into(),
        })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            MemoryEntry::deserialize(item).map_err(|e| MemoryError::MalformedPersistedState {
                tier: role,
                index: Some(index),
                message: e.to_string(),
            })
        })
        .collect()
}
