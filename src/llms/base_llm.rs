//! The chat-completion seam every LLM provider implements.
//!
//! Handlers depend on [`ChatCompletion`] only, so tests can swap in a stub
//! without touching the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utilities::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::utilities::errors::LlmError;

/// Reply used when the provider returns empty content and the caller gave no
/// fallback of its own.
pub const EMPTY_REPLY: &str = "MoodyBot has gone quiet.";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Parse a stored role string. Anything unrecognized is treated as user.
    pub fn from_stored(role: &str) -> Self {
        match role {
            "system" => Role::System,
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

/// One message in a provider conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmMessage {
    pub role: Role,
    pub content: String,
}

impl LlmMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model override; the provider's default model when `None`.
    pub model: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response.
    pub json_mode: bool,
    /// Returned instead of an error when the reply content is empty.
    pub fallback: Option<String>,
}

impl ChatRequest {
    pub fn new(messages: Vec<LlmMessage>) -> Self {
        Self {
            model: None,
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            json_mode: false,
            fallback: None,
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn json_mode(mut self) -> Self {
        self.json_mode = true;
        self
    }

    pub fn fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Content to return for an empty reply.
    pub fn empty_reply(&self) -> String {
        self.fallback.clone().unwrap_or_else(|| EMPTY_REPLY.to_string())
    }
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Async chat completion.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run the request and return the assistant's text.
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;

    /// Short provider name for logs.
    fn provider(&self) -> &str {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_defaults() {
        let req = ChatRequest::new(vec![LlmMessage::user("hi")]);
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 256);
        assert!(!req.json_mode);
        assert_eq!(req.empty_reply(), EMPTY_REPLY);

        let req = req.model("x-ai/grok-4").temperature(0.9).max_tokens(200).json_mode().fallback("quiet");
        assert_eq!(req.model.as_deref(), Some("x-ai/grok-4"));
        assert!(req.json_mode);
        assert_eq!(req.empty_reply(), "quiet");
    }

    #[test]
    fn test_role_serialization() {
        let msg = LlmMessage::assistant("ok");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            serde_json::json!({"role": "assistant", "content": "ok"})
        );
        assert_eq!(Role::from_stored("assistant"), Role::Assistant);
        assert_eq!(Role::from_stored("bot"), Role::User);
    }
}
