//! Provider-specific URL and authentication handling.
//!
//! Most upstreams speak the plain `OpenAI` Chat Completions dialect; Azure
//! differs in URL layout and in the auth header.

/// API version used for Azure when none is configured.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-08-01-preview";

/// Supported LLM providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    /// `OpenAI` (api.openai.com)
    OpenAI,
    /// Azure `OpenAI` Service
    AzureOpenAI {
        /// Deployment name (required for Azure)
        deployment_name: String,
        /// API version (e.g., "2024-08-01-preview")
        api_version: String,
    },
    /// `OpenRouter` (openrouter.ai)
    OpenRouter,
    /// Groq (groq.com)
    Groq,
    /// Any other OpenAI-compatible server (llama.cpp, vLLM, Ollama, ...)
    Generic,
}

/// How the API key is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `api-key: <key>`
    ApiKeyHeader,
}

impl Provider {
    /// Detect provider from base URL.
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();

        if lower.contains("azure.com") {
            Self::AzureOpenAI {
                deployment_name: String::new(),
                api_version: DEFAULT_AZURE_API_VERSION.to_string(),
            }
        } else if lower.contains("openrouter.ai") {
            Self::OpenRouter
        } else if lower.contains("groq.com") {
            Self::Groq
        } else if lower.contains("openai.com") {
            Self::OpenAI
        } else {
            Self::Generic
        }
    }

    /// Fill in Azure deployment details; other providers are returned as is.
    #[must_use]
    pub fn with_azure_deployment(self, deployment: Option<String>, api_version: Option<String>) -> Self {
        match self {
            Self::AzureOpenAI {
                deployment_name,
                api_version: current_version,
            } => Self::AzureOpenAI {
                deployment_name: deployment.unwrap_or(deployment_name),
                api_version: api_version.unwrap_or(current_version),
            },
            other => other,
        }
    }

    /// Build the chat completions URL for this provider.
    ///
    /// Groq and `OpenRouter` nest the `OpenAI` surface under a path prefix.
    #[must_use]
    pub fn build_chat_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');

        match self {
            Self::AzureOpenAI {
                deployment_name,
                api_version,
            } => format!(
                "{base}/openai/deployments/{deployment_name}/chat/completions?api-version={api_version}"
            ),
            Self::Groq if !base.ends_with("/openai") => format!("{base}/openai/v1/chat/completions"),
            Self::OpenRouter if !base.ends_with("/api") => format!("{base}/api/v1/chat/completions"),
            _ => format!("{base}/v1/chat/completions"),
        }
    }

    #[must_use]
    pub fn auth_style(&self) -> AuthStyle {
        match self {
            Self::AzureOpenAI { .. } => AuthStyle::ApiKeyHeader,
            _ => AuthStyle::Bearer,
        }
    }
}
