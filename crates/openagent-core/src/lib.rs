//! OpenAgent Core - tiered memory for a conversational agent
//!
//! This crate provides the building blocks of the OpenAgent CLI:
//!
//! - **memory** - Hierarchical memory (long, mid and short term tiers) with
//!   bounded compact context and snapshot serialization
//! - **skills** - Skill registry with structured execution outcomes
//! - **agent** - Conversation loop that feeds compact memory into each model call
//! - **learning** - Learning log and task reflection
//! - **config** - Layered configuration (defaults, TOML file, environment)
//!
//! # Example
//!
//! ```rust,no_run
//! use openagent_core::{Agent, Config};
//!
//! async fn example() -> openagent_core::Result<()> {
//!     let config = Config::load()?;
//!     let mut agent = Agent::from_config(&config)?;
//!
//!     agent.add_system_prompt("You are a helpful assistant.").await;
//!     agent.set_task("Chat with the user").await;
//!
//!     let reply = agent.chat("Hello!").await?;
//!     println!("{reply}");
//!
//!     // Persist memory between sessions
//!     let snapshot = agent.snapshot().await;
//!     println!("{}", serde_json::to_string_pretty(&snapshot)?);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod learning;
pub mod memory;
pub mod skills;
pub mod utils;

pub use agent::{Agent, Message, ModelClient, Role, StubModel};
pub use config::{AgentSettings, Config, MemoryConfig, ModelConfig};
pub use error::{Error, MemoryError, Result, SkillError};
pub use learning::{ImproverStatus, Learning, Reflection, ReflectionAction, SelfImprover};
pub use memory::{
    HierarchicalMemory, MemoryEntry, MemoryTier, Metadata, MetadataValue, SharedMemory, TierRole,
};
pub use skills::{SkillArgs, SkillOutcome, SkillRegistry};
