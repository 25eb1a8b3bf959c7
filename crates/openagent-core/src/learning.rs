//! Learning log and task reflection.
//!
//! The agent records what it learned and how its tasks went. The most recent
//! learnings are turned into an improvement summary; task results are classified
//! by keyword into a follow-up action.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::{now_utc, timestamp_format, truncate_chars};

/// Number of learnings included in summaries and status
pub const RECENT_LEARNINGS: usize = 5;

/// Source recorded when none is given
pub const DEFAULT_SOURCE: &str = "research";

const PREVIEW_CHARS: usize = 100;

const FAILURE_KEYWORDS: [&str; 2] = ["error", "失败"];
const SUCCESS_KEYWORDS: [&str; 2] = ["success", "成功"];

/// Something the agent learned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learning {
    pub topic: String,
    pub content: String,
    /// Where it came from (research, feedback, ...)
    pub source: String,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
}

/// Follow-up suggested by a task result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionAction {
    /// The task failed and needs debugging
    Debug,
    /// The task succeeded and the approach can be reused
    Reuse,
}

impl ReflectionAction {
    /// Classify a task result. Failure keywords win over success keywords.
    pub fn classify(task_result: &str) -> Option<Self> {
        let lower = task_result.to_lowercase();
        if FAILURE_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Self::Debug)
        } else if SUCCESS_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Self::Reuse)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "needs debugging and a fix",
            Self::Reuse => "can be reused in other scenarios",
        }
    }
}

impl fmt::Display for ReflectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reflection on one task result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    pub task: String,
    pub feedback: Option<String>,
    #[serde(with = "timestamp_format")]
    pub timestamp: DateTime<Utc>,
    pub action: Option<ReflectionAction>,
}

/// Counts and recent topics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImproverStatus {
    pub total_learnings: usize,
    pub total_improvements: usize,
    pub recent_topics: Vec<String>,
}

/// In-memory recorder of learnings and reflections.
#[derive(Debug, Clone, Default)]
pub struct SelfImprover {
    learnings: Vec<Learning>,
    improvements: Vec<Reflection>,
}

impl SelfImprover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a learning. `source` defaults to [`DEFAULT_SOURCE`].
    pub fn add_learning(
        &mut self,
        topic: impl Into<String>,
        content: impl Into<String>,
        source: Option<&str>,
    ) {
        let learning = Learning {
            topic: topic.into(),
            content: content.into(),
            source: source.unwrap_or(DEFAULT_SOURCE).to_string(),
            timestamp: now_utc(),
        };
        debug!(topic = %learning.topic, source = %learning.source, "recorded learning");
        self.learnings.push(learning);
    }

    /// Summarize the most recent learnings followed by standing suggestions.
    pub fn generate_improvement(&self) -> String {
        if self.learnings.is_empty() {
            return "No learnings recorded yet".to_string();
        }

        let mut lines = vec!["Recent learnings:".to_string()];
        lines.extend(self.recent().iter().map(|l| {
            format!("- {}: {}", l.topic, truncate_chars(&l.content, PREVIEW_CHARS))
        }));
        lines.extend(
            [
                "",
                "Suggested improvements:",
                "1. Apply what was learned to the code",
                "2. Refine existing modules",
                "3. Add new features",
            ]
            .map(String::from),
        );
        lines.join("\n")
    }

    /// Record a task result with optional feedback and classify the follow-up.
    pub fn reflect_and_improve(
        &mut self,
        task_result: &str,
        feedback: Option<&str>,
    ) -> Reflection {
        let reflection = Reflection {
            task: task_result.to_string(),
            feedback: feedback.map(str::to_string),
            timestamp: now_utc(),
            action: ReflectionAction::classify(task_result),
        };
        self.improvements.push(reflection.clone());
        reflection
    }

    pub fn status(&self) -> ImproverStatus {
        ImproverStatus {
            total_learnings: self.learnings.len(),
            total_improvements: self.improvements.len(),
            recent_topics: self.recent().iter().map(|l| l.topic.clone()).collect(),
        }
    }

    pub fn learnings(&self) -> &[Learning] {
        &self.learnings
    }

    pub fn reflections(&self) -> &[Reflection] {
        &self.improvements
    }

    fn recent(&self) -> &[Learning] {
        let start = self.learnings.len().saturating_sub(RECENT_LEARNINGS);
        &self.learnings[start..]
    }
}
