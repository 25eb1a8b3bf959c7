//! Conversational agent built on hierarchical memory and skills.
//!
//! Each turn the agent sends the model its identity prompt, the compact memory
//! context and a window of recent history, then records a short summary of the
//! exchange in mid-term memory.

mod message;
mod model;

pub use message::{Message, Role};
pub use model::{MISSING_KEY_NOTICE, ModelClient, StubModel};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::{AgentSettings, Config};
use crate::error::Result;
use crate::learning::{Reflection, SelfImprover};
use crate::memory::{HierarchicalMemory, MetadataValue, SharedMemory, TierRole, metadata};
use crate::skills::{SkillArgs, SkillOutcome, SkillRegistry};
use crate::utils::truncate_chars;

/// Heading of the memory block injected before the conversation history
pub const MEMORY_CONTEXT_HEADER: &str = "[Memory context]";

/// Agent with tiered memory, a skill registry and a model backend
pub struct Agent {
    settings: AgentSettings,
    memory: SharedMemory,
    skills: SkillRegistry,
    model: Box<dyn ModelClient>,
    history: Vec<Message>,
    improver: SelfImprover,
}

impl Agent {
    /// Assemble an agent from explicit parts
    pub fn new(
        settings: AgentSettings,
        memory: SharedMemory,
        skills: SkillRegistry,
        model: Box<dyn ModelClient>,
    ) -> Self {
        Self {
            settings,
            memory,
            skills,
            model,
            history: Vec::new(),
            improver: SelfImprover::new(),
        }
    }

    /// Build an agent with built-in skills and the stub model
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let memory = HierarchicalMemory::from_config(&config.memory)?;
        info!(name = %config.agent.name, provider = %config.model.provider, "agent created");

        Ok(Self::new(
            config.agent.clone(),
            SharedMemory::new(memory),
            SkillRegistry::new(),
            Box::new(StubModel::from_config(&config.model)),
        ))
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn improver(&self) -> &SelfImprover {
        &self.improver
    }

    /// Record something learned during the session
    pub fn learn(&mut self, topic: &str, content: &str, source: Option<&str>) {
        self.improver.add_learning(topic, content, source);
    }

    /// Reflect on a task result and get the suggested follow-up
    pub fn reflect(&mut self, task_result: &str, feedback: Option<&str>) -> Reflection {
        self.improver.reflect_and_improve(task_result, feedback)
    }

    /// Remember an identity or standing instruction in long-term memory
    pub async fn add_system_prompt(&self, prompt: &str) {
        self.memory
            .add_long_term(prompt, Some(metadata([("type", "system_prompt")])))
            .await;
    }

    /// Record the current task in mid-term memory.
    ///
    /// Skipped when the newest task entry already names the same task, so resuming a
    /// session does not repeat it. Returns whether an entry was added.
    pub async fn set_task(&self, task: &str) -> bool {
        let content = format!("Current task: {task}");
        let mut memory = self.memory.write().await;

        let newest_task = memory
            .tier(TierRole::MidTerm)
            .entries()
            .rev()
            .find(|e| e.metadata.get("type").and_then(MetadataValue::as_str) == Some("task"));
        if newest_task.is_some_and(|e| e.content == content) {
            debug!(task, "task already current");
            return false;
        }

        memory.add_mid_term(content, Some(metadata([("type", "task")])));
        true
    }

    /// Run one conversation turn and return the assistant reply
    pub async fn chat(&mut self, input: &str) -> Result<String> {
        self.history.push(Message::user(input));

        let messages = self.build_messages().await;
        let response = self.model.complete(&messages).await?;

        self.history.push(Message::assistant(response.clone()));

        let n = self.settings.exchange_summary_chars;
        self.memory
            .add_mid_term(
                format!(
                    "User: {}... Assistant: {}...",
                    truncate_chars(input, n),
                    truncate_chars(&response, n)
                ),
                Some(metadata([("type", "exchange")])),
            )
            .await;

        if self.history.len() > self.settings.history_max {
            let keep = self.settings.history_keep.min(self.settings.history_max);
            let excess = self.history.len() - keep;
            self.history.drain(..excess);
            self.memory.clear_short_term().await;
            debug!(kept = self.history.len(), "trimmed conversation history");
        }

        Ok(response)
    }

    async fn build_messages(&self) -> Vec<Message> {
        let mut messages = vec![Message::system(self.identity_prompt())];

        let context = self.memory.get_compact_context().await;
        if !context.is_empty() {
            messages.push(Message::system(format!("{MEMORY_CONTEXT_HEADER}\n{context}")));
        }

        let start = self.history.len().saturating_sub(self.settings.history_window);
        messages.extend(self.history[start..].iter().cloned());
        messages
    }

    fn identity_prompt(&self) -> String {
        format!(
            "You are {}, a helpful AI assistant.\n\n\
             Core abilities:\n\
             - Web search\n\
             - Reading and writing files\n\
             - Running commands\n\
             - Analysing data\n\n\
             You have a tiered memory:\n\
             - L1: long-term goals\n\
             - L2: current task progress\n\
             - L3: temporary information\n\n\
             Choose the right skills to complete the user's request.",
            self.settings.name
        )
    }

    /// Run a skill and record the outcome in short-term memory
    pub async fn execute_skill(&self, name: &str, args: &SkillArgs) -> SkillOutcome {
        let outcome = self.skills.execute(name, args);

        let mut meta = outcome.metadata();
        if let Some(output) = outcome.output() {
            let chars = output.chars().count();
            meta.insert("output_chars".into(), MetadataValue::Integer(chars as i64));
        }
        self.memory
            .add_short_term(outcome.summary(self.settings.skill_summary_chars), Some(meta))
            .await;

        outcome
    }

    /// Clear conversation history and short-term memory
    pub async fn reset(&mut self) {
        self.history.clear();
        self.memory.clear_short_term().await;
    }

    /// Snapshot of all memory tiers
    pub async fn snapshot(&self) -> Value {
        self.memory.to_value().await
    }

    /// Restore memory tiers from a snapshot
    pub async fn restore(&self, snapshot: &Value) -> Result<()> {
        self.memory.restore_from_value(snapshot).await?;
        Ok(())
    }
}
