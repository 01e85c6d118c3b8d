//! LLM client abstraction.
//!
//! The server only needs one non-streaming operation: send a list of chat
//! messages, get back the assistant text and the model name. [`LlmClient`]
//! is the seam between the HTTP routes and the upstream API so that routes can
//! be exercised against a scripted client in tests.
//!
//! # Clients
//!
//! - [`ChatCompletionsClient`]: `OpenAI`-compatible Chat Completions API
//!   (`/v1/chat/completions`), including Azure deployments.

pub mod chat_completions;
pub mod provider;

pub use chat_completions::ChatCompletionsClient;
pub use provider::Provider;

use std::time::Duration;

/// Default sampling temperature for corrections.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// LLM connection and model settings.
#[derive(Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g., `http://localhost:8002`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier. Omitted from requests when unset, so single-model
    /// servers pick their loaded model.
    pub model: Option<String>,
    /// Provider type (auto-detected from `base_url`).
    pub provider: Provider,
    /// Upper bound on a single upstream call.
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("provider", &self.provider)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl LlmSettings {
    /// Settings for a generic endpoint with defaults for everything else.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            provider: Provider::detect_from_url(&base_url),
            base_url,
            api_key: None,
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Role of a message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt.
    System,
    /// User message.
    User,
    /// Assistant response.
    Assistant,
}

/// A message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Assistant output of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text of the first choice; empty when the upstream sent none.
    pub content: String,
    /// Model reported by the upstream, or `unknown`.
    pub model: String,
}

/// Failure of an upstream call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Connection, TLS or body transfer failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// No answer within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream answered with a non-success status.
    #[error("LLM returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Upstream answered 2xx but the body was not a chat completion.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Trait for chat completion backends.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Run a single non-streaming chat completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the upstream
    /// answers with a non-success status.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<Completion, LlmError>;
}
