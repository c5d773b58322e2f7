//! Shared chat-model trait and request shapes.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by chat-model providers.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by provider implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Provider is misconfigured or missing credentials.
    #[error("provider not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target model.
    #[error("invalid chat request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (network, protocol, timeouts).
    #[error("provider transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("provider rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after: Option<Duration>,
    },

    /// The provider returned a malformed or failing response.
    #[error("provider response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for response failures.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing a chat-model instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelMetadata {
    provider: &'static str,
    model: String,
}

impl ModelMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "openai").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Roles supported in chat-style prompts.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System messages steer the assistant behaviour.
    System,
    /// User-authored content.
    User,
    /// Assistant (model) responses.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        })
    }
}

/// One message in a chat-style prompt.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    /// Creates a new chat message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user-authored message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Request submitted to a chat model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Creates a request with the supplied messages.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the message list is empty.
    pub fn new(messages: Vec<ChatMessage>) -> AdapterResult<Self> {
        if messages.is_empty() {
            return Err(AdapterError::invalid_request(
                "chat request requires at least one message",
            ));
        }

        Ok(Self {
            messages,
            max_output_tokens: None,
            temperature: None,
        })
    }

    /// Sets the maximum output token budget.
    #[must_use]
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Returns the prompt messages.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the configured maximum output tokens.
    #[must_use]
    pub const fn max_output_tokens(&self) -> Option<u32> {
        self.max_output_tokens
    }

    /// Returns the configured sampling temperature.
    #[must_use]
    pub const fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// Trait implemented by all chat-model providers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns basic metadata describing the model instance.
    fn metadata(&self) -> &ModelMetadata;

    /// Executes the chat request, returning the assistant's full reply.
    async fn complete(&self, request: ChatRequest) -> AdapterResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_request_messages() {
        let err = ChatRequest::new(Vec::new()).expect_err("messages required");
        assert!(matches!(err, AdapterError::InvalidRequest { .. }));
    }

    #[test]
    fn builds_request() {
        let request = ChatRequest::new(vec![ChatMessage::user("ping")])
            .unwrap()
            .with_max_output_tokens(256)
            .with_temperature(0.7);

        assert_eq!(request.messages().len(), 1);
        assert_eq!(request.max_output_tokens(), Some(256));
        assert_eq!(request.temperature(), Some(0.7));
    }

    #[test]
    fn roles_render_in_wire_case() {
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }
}
