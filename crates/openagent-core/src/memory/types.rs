//! Memory Type Definitions
//!
//! Defines the tier roles, entries and metadata values of the hierarchical memory.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::{format_timestamp, now_utc, timestamp_format};

/// Role of a tier inside [`HierarchicalMemory`](super::HierarchicalMemory)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierRole {
    LongTerm,
    MidTerm,
    ShortTerm,
}

impl TierRole {
    /// All roles in context order (long, mid, short)
    pub const ALL: [TierRole; 3] = [Self::LongTerm, Self::MidTerm, Self::ShortTerm];

    /// Convert from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "long_term" | "long" | "l1" => Some(Self::LongTerm),
            "mid_term" | "mid" | "l2" => Some(Self::MidTerm),
            "short_term" | "short" | "l3" => Some(Self::ShortTerm),
            _ => None,
        }
    }

    /// Key used in persisted snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LongTerm => "long_term",
            Self::MidTerm => "mid_term",
            Self::ShortTerm => "short_term",
        }
    }

    /// Header label used when rendering the tier
    pub fn label(&self) -> &'static str {
        match self {
            Self::LongTerm => "L1_LONG_TERM",
            Self::MidTerm => "L2_MID_TERM",
            Self::ShortTerm => "L3_SHORT_TERM",
        }
    }
}

impl std::fmt::Display for TierRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scalar metadata value.
///
/// Metadata is flat: nested objects and arrays are not representable. JSON has no
/// NaN or infinity, so stored floats are always finite; a non-finite float is kept
/// as its text form (`NaN`, `inf`, `-inf`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Replace a non-finite float with its text form
    pub fn into_storable(self) -> Self {
        match self {
            Self::Float(f) if !f.is_finite() => Self::Text(f.to_string()),
            other => other,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(f.to_string())),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for MetadataValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        Self::Float(f).into_storable()
    }
}

/// Caller-supplied metadata attached to an entry. Never interpreted by the engine.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Build a [`Metadata`] map from key/value pairs.
pub fn metadata<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Metadata
where
    K: Into<String>,
    V: Into<MetadataValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A single remembered item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub content: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl MemoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self::at(content, metadata, now_utc())
    }

    /// Create an entry with an explicit timestamp
    pub fn at(content: impl Into<String>, metadata: Metadata, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            timestamp,
            metadata,
        }
    }

    /// Plain JSON form used by snapshots
    pub fn to_value(&self) -> Value {
        let metadata = self
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();

        let mut obj = serde_json::Map::new();
        obj.insert("content".into(), Value::String(self.content.clone()));
        obj.insert(
            "timestamp".into(),
            Value::String(format_timestamp(&self.timestamp)),
        );
        obj.insert("metadata".into(), Value::Object(metadata));
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tier_role_strings() {
        for role in TierRole::ALL {
            assert_eq!(TierRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(TierRole::from_str("short"), Some(TierRole::ShortTerm));
        assert_eq!(TierRole::from_str("working"), None);
        assert_eq!(TierRole::LongTerm.label(), "L1_LONG_TERM");
    }

    #[test]
    fn test_metadata_value_variants_from_json() {
        let meta: Metadata = serde_json::from_value(json!({
            "type": "task",
            "count": 3,
            "score": 0.5,
            "done": true,
        }))
        .unwrap();

        assert_eq!(meta["type"], MetadataValue::Text("task".into()));
        assert_eq!(meta["count"], MetadataValue::Integer(3));
        assert_eq!(meta["score"], MetadataValue::Float(0.5));
        assert_eq!(meta["done"], MetadataValue::Bool(true));
    }

    #[test]
    fn test_metadata_rejects_nested_values() {
        let result: Result<Metadata, _> = serde_json::from_value(json!({ "tags": ["a", "b"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_entry_value_shape() {
        let entry = MemoryEntry::new("goal", metadata([("type", "system_prompt")]));
        let value = entry.to_value();

        assert_eq!(value["content"], "goal");
        assert_eq!(value["metadata"]["type"], "system_prompt");
        assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));

        let back: MemoryEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_non_finite_floats_stored_as_text() {
        let meta = metadata([
            ("nan", f64::NAN),
            ("inf", f64::INFINITY),
            ("neg", f64::NEG_INFINITY),
            ("ok", 1.5),
        ]);
        assert_eq!(meta["nan"], MetadataValue::Text("NaN".into()));
        assert_eq!(meta["inf"], MetadataValue::Text("inf".into()));
        assert_eq!(meta["neg"], MetadataValue::Text("-inf".into()));
        assert_eq!(meta["ok"], MetadataValue::Float(1.5));

        // A directly built variant still serializes to something readable
        let entry = MemoryEntry::new(
            "x",
            Metadata::from([("raw".to_string(), MetadataValue::Float(f64::NAN))]),
        );
        let value = entry.to_value();
        assert_eq!(value["metadata"]["raw"], "NaN");
        assert!(serde_json::from_value::<MemoryEntry>(value).is_ok());
    }

    #[test]
    fn test_entry_metadata_defaults_to_empty() {
        let entry: MemoryEntry = serde_json::from_value(json!({
            "content": "x",
            "timestamp": "2024-01-15T10:30:00",
        }))
        .unwrap();
        assert!(entry.metadata.is_empty());
    }
}
