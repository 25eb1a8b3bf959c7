//! Skill registry.
//!
//! Skills are named functions the agent can invoke. Each execution produces a
//! [`SkillOutcome`] carrying either the output or a structured failure.

mod builtin;
mod outcome;
mod registry;

pub use outcome::SkillOutcome;
pub use registry::{DEFAULT_CATEGORY, Skill, SkillArgs, SkillHandler, SkillRegistry};
