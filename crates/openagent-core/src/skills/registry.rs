//! Skill Registry
//!
//! Name to function table with categories and usage counters.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::SkillError;

use super::builtin;
use super::outcome::SkillOutcome;

/// Category assigned when none is given
pub const DEFAULT_CATEGORY: &str = "general";

/// Named arguments passed to a skill
pub type SkillArgs = Map<String, Value>;

/// Skill implementation
pub type SkillHandler = Arc<dyn Fn(&SkillArgs) -> Result<String, SkillError> + Send + Sync>;

/// A registered skill
pub struct Skill {
    pub name: String,
    pub description: String,
    pub category: String,
    handler: SkillHandler,
    usage_count: AtomicU64,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        handler: SkillHandler,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            handler,
            usage_count: AtomicU64::new(0),
        }
    }

    /// Run the skill, counting the attempt
    pub fn execute(&self, args: &SkillArgs) -> Result<String, SkillError> {
        self.usage_count.fetch_add(1, Ordering::Relaxed);
        (self.handler)(args)
    }

    /// Number of times this skill has been executed
    pub fn usage_count(&self) -> u64 {
        self.usage_count.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skill")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("usage_count", &self.usage_count())
            .finish_non_exhaustive()
    }
}

/// Skill registry
#[derive(Debug)]
pub struct SkillRegistry {
    /// Kept in registration order
    skills: Vec<Skill>,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillRegistry {
    /// Create a registry with the built-in skills
    pub fn new() -> Self {
        let mut registry = Self::empty();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Create a registry with no skills
    pub fn empty() -> Self {
        Self { skills: Vec::new() }
    }

    /// Register a skill. A skill with the same name is replaced.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        category: Option<&str>,
        handler: F,
    ) where
        F: Fn(&SkillArgs) -> Result<String, SkillError> + Send + Sync + 'static,
    {
        let skill = Skill::new(
            name,
            description,
            category.unwrap_or(DEFAULT_CATEGORY),
            Arc::new(handler),
        );

        match self.skills.iter_mut().find(|s| s.name == skill.name) {
            Some(existing) => {
                debug!(skill = %skill.name, "replacing registered skill");
                *existing = skill;
            }
            None => self.skills.push(skill),
        }
    }

    /// Get skill by name
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// List skills, optionally restricted to one category
    pub fn list(&self, category: Option<&str>) -> Vec<&Skill> {
        self.skills
            .iter()
            .filter(|s| category.is_none_or(|c| s.category == c))
            .collect()
    }

    /// Category name to skill names
    pub fn categories(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut categories: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for skill in &self.skills {
            categories
                .entry(skill.category.as_str())
                .or_default()
                .push(skill.name.as_str());
        }
        categories
    }

    /// Case-insensitive search over names and descriptions
    pub fn find(&self, query: &str) -> Vec<&Skill> {
        let query = query.to_lowercase();
        self.skills
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&query)
                    || s.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Execute a skill by name
    pub fn execute(&self, name: &str, args: &SkillArgs) -> SkillOutcome {
        let Some(skill) = self.get(name) else {
            warn!(skill = name, "unknown skill requested");
            return SkillOutcome::failure(name, SkillError::NotFound(name.to_string()));
        };

        debug!(skill = name, "executing skill");
        match skill.execute(args) {
            Ok(output) => SkillOutcome::success(name, output),
            Err(error) => {
                warn!(skill = name, error = %error, "skill failed");
                SkillOutcome::failure(name, error)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
