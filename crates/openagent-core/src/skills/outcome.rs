//! Structured result of a skill execution.

use crate::error::SkillError;
use crate::memory::{Metadata, MetadataValue, metadata};
use crate::utils::truncate_chars;

/// What happened when a skill ran
#[derive(Debug)]
pub enum SkillOutcome {
    Success { skill: String, output: String },
    Failure { skill: String, error: SkillError },
}

impl SkillOutcome {
    pub fn success(skill: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Success {
            skill: skill.into(),
            output: output.into(),
        }
    }

    pub fn failure(skill: impl Into<String>, error: SkillError) -> Self {
        Self::Failure {
            skill: skill.into(),
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Name of the skill that was requested
    pub fn skill(&self) -> &str {
        match self {
            Self::Success { skill, .. } | Self::Failure { skill, .. } => skill,
        }
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Success { output, .. } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&SkillError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<String, SkillError> {
        match self {
            Self::Success { output, .. } => Ok(output),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// One-line description for memory, with output cut to `max_chars` characters
    pub fn summary(&self, max_chars: usize) -> String {
        match self {
            Self::Success { skill, output } => {
                format!("Executed skill {}: {}", skill, truncate_chars(output, max_chars))
            }
            Self::Failure { skill, error } => format!("Skill {} failed: {}", skill, error),
        }
    }

    /// Metadata recorded alongside the summary
    pub fn metadata(&self) -> Metadata {
        metadata([
            ("type", MetadataValue::from("skill")),
            ("skill", MetadataValue::from(self.skill())),
            ("success", MetadataValue::from(self.is_success())),
        ])
    }
}
