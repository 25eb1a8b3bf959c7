//! Model client seam.
//!
//! Real provider calls are out of scope; [`StubModel`] answers locally so the
//! conversation loop can run end to end.

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::utils::truncate_chars;

use super::message::{Message, Role};

/// A chat-completion backend
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Produce the assistant reply for the given message list
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// Notice returned when no API key is configured
pub const MISSING_KEY_NOTICE: &str = "Please configure an API key: set OPENAI_API_KEY \
    (or the key for AI_PROVIDER) in the environment or .env.local.";

/// Placeholder model that replies by simple intent detection
#[derive(Debug, Clone, Default)]
pub struct StubModel {
    api_key: Option<String>,
}

impl StubModel {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.api_key().map(str::to_string))
    }
}

#[async_trait]
impl ModelClient for StubModel {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if self.api_key.is_none() {
            return Ok(MISSING_KEY_NOTICE.to_string());
        }

        let last = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let lower = last.to_lowercase();

        let reply = if lower.contains("search") || lower.contains("find") {
            "Understood, you need to look something up. What exactly should I search for?"
                .to_string()
        } else if lower.contains("write") || lower.contains("create") {
            "Understood, you want something created. What exactly should I create?".to_string()
        } else {
            format!(
                "I received your message: {}...\n\nWhat would you like me to do?",
                truncate_chars(last, 100)
            )
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_without_key_returns_notice() {
        let model = StubModel::default();
        let reply = model.complete(&[Message::user("hello")]).await.unwrap();
        assert_eq!(reply, MISSING_KEY_NOTICE);
    }

    #[tokio::test]
    async fn test_intent_detection() {
        let model = StubModel::new(Some("sk-test".into()));

        let reply = model.complete(&[Message::user("Search for rust crates")]).await.unwrap();
        assert!(reply.contains("search for"));

        let reply = model.complete(&[Message::user("please create a file")]).await.unwrap();
        assert!(reply.contains("create"));

        let reply = model
            .complete(&[Message::system("ctx"), Message::user("hello there")])
            .await
            .unwrap();
        assert!(reply.starts_with("I received your message: hello there..."));
    }
}
