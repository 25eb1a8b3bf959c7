//! Error types for openagent-core.

use thiserror::Error;

use crate::memory::TierRole;

/// Result type alias using openagent-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for OpenAgent operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("skill error: {0}")]
    Skill(#[from] SkillError),

    #[error("configuration error: invalid value for {field}: {message}")]
    Config { field: String, message: String },

    #[error("model error: {0}")]
    Model(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to write config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Create a configuration error for a specific field
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Check if this error came from restoring persisted memory
    pub fn is_malformed_state(&self) -> bool {
        matches!(
            self,
            Self::Memory(MemoryError::MalformedPersistedState { .. })
                | Self::Memory(MemoryError::NotAnObject)
                | Self::Memory(MemoryError::UnsupportedVersion { .. })
        )
    }
}

/// Errors raised by the memory engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    #[error("tier {tier} must hold at least one entry (max_items = {max_items})")]
    InvalidCapacity { tier: String, max_items: usize },

    #[error("{}", describe_malformed(*tier, *index, message))]
    MalformedPersistedState {
        tier: TierRole,
        index: Option<usize>,
        message: String,
    },

    #[error("persisted memory must be a mapping keyed by tier name")]
    NotAnObject,

    #[error("unsupported memory snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: String, supported: u64 },
}

fn describe_malformed(tier: TierRole, index: Option<usize>, message: &str) -> String {
    match index {
        Some(index) => format!("malformed {} entry at index {}: {}", tier, index, message),
        None => format!("malformed {} tier: {}", tier, message),
    }
}

/// Errors raised while executing a skill.
#[derive(Error, Debug)]
pub enum SkillError {
    #[error("skill not found: {0}")]
    NotFound(String),

    #[error("skill {skill} requires argument `{argument}`")]
    MissingArgument { skill: String, argument: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

impl SkillError {
    /// Create a missing-argument error
    pub fn missing_argument(skill: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            skill: skill.into(),
            argument: argument.into(),
        }
    }

    /// Check if this error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_state_names_tier_and_index() {
        let err = MemoryError::MalformedPersistedState {
            tier: TierRole::MidTerm,
            index: Some(3),
            message: "missing field `content`".into(),
        };
        let text = err.to_string();
        assert!(text.contains("mid_term"));
        assert!(text.contains("index 3"));
        assert!(text.contains("content"));

        let err = MemoryError::MalformedPersistedState {
            tier: TierRole::LongTerm,
            index: None,
            message: "expected an array of entries".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed long_term tier: expected an array of entries"
        );
    }

    #[test]
    fn test_error_creation() {
        let err = Error::config("memory.compact_limit", "must be greater than 0");
        assert!(err.to_string().contains("memory.compact_limit"));

        let err: Error = MemoryError::NotAnObject.into();
        assert!(err.is_malformed_state());

        let err = SkillError::NotFound("fly".into());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("fly"));
    }
}
