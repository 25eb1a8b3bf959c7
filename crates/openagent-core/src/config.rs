//! Configuration management for OpenAgent.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (`OPENAI_API_KEY`, `MODEL_NAME`, ...)
//! 2. `.env.local` in the working directory
//! 3. Config file (`$OPENAGENT_CONFIG` or `<data dir>/config.toml`)
//! 4. Default values

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::COMPACT_TIER_LIMIT;

/// Upper bound for any tier capacity or compact limit
pub const MAX_TIER_CAPACITY: usize = 100_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model provider settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Memory tier settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Conversation loop settings
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider name (openai, anthropic, minimax)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// API keys come from the environment only and are never written back
    #[serde(skip)]
    pub openai_api_key: Option<String>,

    #[serde(skip)]
    pub anthropic_api_key: Option<String>,

    #[serde(skip)]
    pub minimax_api_key: Option<String>,
}

/// Memory system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Long-term capacity (default: 50)
    #[serde(default = "default_long_term_capacity")]
    pub long_term_capacity: usize,

    /// Mid-term capacity (default: 20)
    #[serde(default = "default_mid_term_capacity")]
    pub mid_term_capacity: usize,

    /// Short-term capacity (default: 10)
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,

    /// Long-term TTL in seconds (default: 30 days)
    #[serde(default = "default_long_term_ttl")]
    pub long_term_ttl_secs: u64,

    /// Mid-term TTL in seconds (default: 1 hour)
    #[serde(default = "default_mid_term_ttl")]
    pub mid_term_ttl_secs: u64,

    /// Short-term TTL in seconds (default: 5 minutes)
    #[serde(default = "default_short_term_ttl")]
    pub short_term_ttl_secs: u64,

    /// Entries per tier in the compact context (default: 5)
    #[serde(default = "default_compact_limit")]
    pub compact_limit: usize,

    /// Hide entries older than their tier TTL when rendering (default: false)
    #[serde(default)]
    pub expire_on_read: bool,
}

/// Conversation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Agent display name
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// History messages sent with each model call (default: 10)
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// History length that triggers trimming (default: 50)
    #[serde(default = "default_history_max")]
    pub history_max: usize,

    /// History length kept after trimming (default: 30)
    #[serde(default = "default_history_keep")]
    pub history_keep: usize,

    /// Characters of each side of an exchange recorded in mid-term memory (default: 50)
    #[serde(default = "default_exchange_summary_chars")]
    pub exchange_summary_chars: usize,

    /// Characters of skill output recorded in short-term memory (default: 100)
    #[serde(default = "default_skill_summary_chars")]
    pub skill_summary_chars: usize,
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_model_name() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_long_term_capacity() -> usize {
    50
}

fn default_mid_term_capacity() -> usize {
    20
}

fn default_short_term_capacity() -> usize {
    10
}

fn default_long_term_ttl() -> u64 {
    86400 * 30 // 30 days
}

fn default_mid_term_ttl() -> u64 {
    3600 // 1 hour
}

fn default_short_term_ttl() -> u64 {
    300 // 5 minutes
}

fn default_compact_limit() -> usize {
    COMPACT_TIER_LIMIT
}

fn default_agent_name() -> String {
    "OpenAgent".to_string()
}

fn default_history_window() -> usize {
    10
}

fn default_history_max() -> usize {
    50
}

fn default_history_keep() -> usize {
    30
}

fn default_exchange_summary_chars() -> usize {
    50
}

fn default_skill_summary_chars() -> usize {
    100
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "openagent", "openagent") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".openagent")
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model_name: default_model_name(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            openai_api_key: None,
            anthropic_api_key: None,
            minimax_api_key: None,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            long_term_capacity: default_long_term_capacity(),
            mid_term_capacity: default_mid_term_capacity(),
            short_term_capacity: default_short_term_capacity(),
            long_term_ttl_secs: default_long_term_ttl(),
            mid_term_ttl_secs: default_mid_term_ttl(),
            short_term_ttl_secs: default_short_term_ttl(),
            compact_limit: default_compact_limit(),
            expire_on_read: false,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            history_window: default_history_window(),
            history_max: default_history_max(),
            history_keep: default_history_keep(),
            exchange_summary_chars: default_exchange_summary_chars(),
            skill_summary_chars: default_skill_summary_chars(),
        }
    }
}

impl ModelConfig {
    /// API key for the selected provider, if one is configured
    pub fn api_key(&self) -> Option<&str> {
        let key = match self.provider.as_str() {
            "anthropic" => &self.anthropic_api_key,
            "minimax" => &self.minimax_api_key,
            _ => &self.openai_api_key,
        };
        key.as_deref().filter(|k| !k.is_empty())
    }
}

impl Config {
    /// Load configuration from file, `.env.local` and environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;

        let env_file = read_env_file(Path::new(".env.local"))?;
        config.apply_env(|key| std::env::var(key).ok().or_else(|| env_file.get(key).cloned()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a file. API keys are never written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("OPENAGENT_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// Override settings from environment-style variables.
    ///
    /// `lookup` maps a variable name to its value. Numeric variables that fail to parse
    /// are reported as configuration errors naming the variable.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.model.openai_api_key = Some(key);
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.model.anthropic_api_key = Some(key);
        }
        if let Some(key) = lookup("MINIMAX_API_KEY") {
            self.model.minimax_api_key = Some(key);
        }
        if let Some(provider) = lookup("AI_PROVIDER") {
            self.model.provider = provider;
        }
        if let Some(name) = lookup("MODEL_NAME") {
            self.model.model_name = name;
        }
        if let Some(raw) = lookup("MAX_TOKENS") {
            self.model.max_tokens = raw
                .trim()
                .parse()
                .map_err(|_| Error::config("MAX_TOKENS", format!("not an integer: {raw}")))?;
        }
        if let Some(raw) = lookup("TEMPERATURE") {
            self.model.temperature = raw
                .trim()
                .parse()
                .map_err(|_| Error::config("TEMPERATURE", format!("not a number: {raw}")))?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let capacities = [
            ("memory.long_term_capacity", self.memory.long_term_capacity),
            ("memory.mid_term_capacity", self.memory.mid_term_capacity),
            ("memory.short_term_capacity", self.memory.short_term_capacity),
            ("memory.compact_limit", self.memory.compact_limit),
        ];
        for (field, value) in capacities {
            if value == 0 {
                return Err(Error::config(field, "must be greater than 0"));
            }
            if value > MAX_TIER_CAPACITY {
                return Err(Error::config(
                    field,
                    format!("must not exceed {MAX_TIER_CAPACITY}"),
                ));
            }
        }

        if self.model.max_tokens == 0 {
            return Err(Error::config("model.max_tokens", "must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(Error::config("model.temperature", "must be between 0 and 2"));
        }

        if self.agent.history_keep > self.agent.history_max {
            return Err(Error::config(
                "agent.history_keep",
                "must not exceed agent.history_max",
            ));
        }

        Ok(())
    }

    /// Set memory configuration
    pub fn with_memory(mut self, memory: MemoryConfig) -> Self {
        self.memory = memory;
        self
    }

    /// Set model configuration
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }
}

/// Read variables from a dotenv file without touching the process environment.
/// A missing file yields an empty map.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let invalid = |e: dotenv::Error| Error::config(path.display().to_string(), e.to_string());
    dotenv::from_path_iter(path)
        .map_err(invalid)?
        .map(|item| item.map_err(invalid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.model_name, "gpt-4");
        assert_eq!(config.model.max_tokens, 4000);
        assert_eq!(config.memory.long_term_capacity, 50);
        assert_eq!(config.memory.mid_term_capacity, 20);
        assert_eq!(config.memory.short_term_capacity, 10);
        assert_eq!(config.memory.compact_limit, 5);
        assert!(!config.memory.expire_on_read);
        assert_eq!(config.agent.history_window, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("AI_PROVIDER", "anthropic"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("MODEL_NAME", "claude"),
            ("MAX_TOKENS", "1024"),
            ("TEMPERATURE", "0.2"),
        ]);

        let mut config = Config::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model.provider, "anthropic");
        assert_eq!(config.model.model_name, "claude");
        assert_eq!(config.model.max_tokens, 1024);
        assert_eq!(config.model.temperature, 0.2);
        assert_eq!(config.model.api_key(), Some("sk-ant"));
    }

    #[test]
    fn test_apply_env_rejects_bad_numbers() {
        let mut config = Config::default();
        let err = config
            .apply_env(|k| (k == "MAX_TOKENS").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_api_key_follows_provider() {
        let mut model = ModelConfig {
            openai_api_key: Some("sk-openai".into()),
            ..ModelConfig::default()
        };
        assert_eq!(model.api_key(), Some("sk-openai"));

        model.provider = "minimax".into();
        assert_eq!(model.api_key(), None);

        model.minimax_api_key = Some(String::new());
        assert_eq!(model.api_key(), None);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.memory.short_term_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.model.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.agent.history_keep = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_capacity_upper_bound() {
        let config = Config::default().with_memory(MemoryConfig {
            long_term_capacity: usize::MAX,
            ..MemoryConfig::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("memory.long_term_capacity"));

        let config = Config::default().with_memory(MemoryConfig {
            compact_limit: MAX_TIER_CAPACITY + 1,
            ..MemoryConfig::default()
        });
        assert!(config.validate().is_err());

        let config = Config::default().with_memory(MemoryConfig {
            short_term_capacity: MAX_TIER_CAPACITY,
            ..MemoryConfig::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_huge_capacity_in_file_is_rejected() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[memory]\nlong_term_capacity = 18446744073709551615\n").unwrap();

        // Either the TOML integer is out of range or validation rejects it
        let rejected = Config::load_from(&path).map_or(true, |c| c.validate().is_err());
        assert!(rejected);
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default().with_memory(MemoryConfig {
            compact_limit: 3,
            expire_on_read: true,
            ..MemoryConfig::default()
        });
        config.model.openai_api_key = Some("sk-secret".into());

        config.save_to(&path).expect("Failed to save config");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("sk-secret"));

        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded.memory.compact_limit, 3);
        assert!(loaded.memory.expire_on_read);
        assert!(loaded.model.openai_api_key.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[memory]\nshort_term_capacity = 4\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.memory.short_term_capacity, 4);
        assert_eq!(loaded.memory.long_term_capacity, 50);
        assert_eq!(loaded.model.provider, "openai");
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let loaded = Config::load_from(&temp.path().join("missing.toml")).unwrap();
        assert_eq!(loaded.agent.name, "OpenAgent");
    }

    #[test]
    fn test_read_env_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join(".env.local");
        std::fs::write(
            &path,
            "# secrets\nOPENAI_API_KEY=sk-123\nMODEL_NAME=\"gpt-4o\"\n\nTEMPERATURE='0.3'\n",
        )
        .unwrap();

        let vars = read_env_file(&path).unwrap();
        assert_eq!(vars.get("OPENAI_API_KEY").map(String::as_str), Some("sk-123"));
        assert_eq!(vars.get("MODEL_NAME").map(String::as_str), Some("gpt-4o"));
        assert_eq!(vars.get("TEMPERATURE").map(String::as_str), Some("0.3"));
        assert_eq!(vars.len(), 3);
    }

    #[test]
    fn test_read_env_file_missing_is_empty() {
        let temp = tempdir().expect("Failed to create temp dir");
        assert!(read_env_file(&temp.path().join(".env.local")).unwrap().is_empty());
    }

    #[test]
    fn test_env_file_values_lose_to_process_env() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join(".env.local");
        std::fs::write(&path, "MODEL_NAME=from-file\nAI_PROVIDER=minimax\n").unwrap();
        let env_file = read_env_file(&path).unwrap();
        let process: HashMap<&str, &str> = HashMap::from([("MODEL_NAME", "from-env")]);

        let mut config = Config::default();
        config
            .apply_env(|key| {
                process
                    .get(key)
                    .map(|v| v.to_string())
                    .or_else(|| env_file.get(key).cloned())
            })
            .unwrap();

        assert_eq!(config.model.model_name, "from-env");
        assert_eq!(config.model.provider, "minimax");
    }
}
