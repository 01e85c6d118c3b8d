//! `OpenAI` Chat Completions API client.
//!
//! Non-streaming: one POST per call, bounded by the configured timeout.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provider::AuthStyle;
use super::{ChatMessage, Completion, CompletionOptions, LlmClient, LlmError, LlmSettings};

/// Request body sent upstream.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: &'a [ChatMessage],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the `OpenAI` Chat Completions API.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    settings: LlmSettings,
    url: String,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("url", &self.url)
            .field("settings", &self.settings)
            .finish()
    }
}

impl ChatCompletionsClient {
    /// Create a client for the given settings.
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder().timeout(settings.timeout).build()?;
        let url = settings.provider.build_chat_url(&settings.base_url);
        Ok(Self {
            http,
            settings,
            url,
        })
    }

    /// Fully resolved endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_transport(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.settings.timeout)
        } else {
            LlmError::Transport(err)
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for ChatCompletionsClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        let request_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        tracing::debug!(
            request_id = %request_id,
            url = %self.url,
            message_count = messages.len(),
            temperature = options.temperature,
            "Sending chat completion"
        );

        let body = ChatCompletionRequest {
            model: self.settings.model.as_deref(),
            messages: &messages,
            temperature: options.temperature,
            stream: false,
        };

        let mut rb = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.settings.api_key {
            rb = match self.settings.provider.auth_style() {
                AuthStyle::Bearer => rb.bearer_auth(key),
                AuthStyle::ApiKeyHeader => rb.header("api-key", key),
            };
        }

        let resp = rb.send().await.map_err(|e| self.map_transport(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_transport(e))?;

        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                status = status.as_u16(),
                "LLM returned an error status"
            );
            return Err(LlmError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        let model = parsed.model.unwrap_or_else(|| "unknown".to_string());

        tracing::info!(
            name: "llm.request.completed",
            request_id = %request_id,
            model = %model,
            content_length = content.len(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Chat completion finished"
        );

        Ok(Completion { content, model })
    }
}
