use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::llm::{LlmSettings, Provider};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (yaml, toml or json)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the OpenAI-compatible LLM server
    #[arg(long, env = "LLM_BASE_URL")]
    pub llm_base_url: Option<String>,

    /// Model name sent upstream
    #[arg(long, env = "LLM_MODEL")]
    pub llm_model: Option<String>,

    /// API key for the LLM server
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// Log output format (pretty or json)
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub email: EmailConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub body_limit_bytes: usize,
}

#[derive(Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub azure_deployment: Option<String>,
    pub azure_api_version: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("azure_deployment", &self.azure_deployment)
            .field("azure_api_version", &self.azure_api_version)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmailConfig {
    /// Name written under the closing formula in email mode.
    pub signature: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Priority: CLI flag > CLI env var > `PROOFDESK_` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3001)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.body_limit_bytes", 1024 * 1024)?
            .set_default("llm.base_url", "http://p-cloud.local:8002")?
            .set_default("llm.timeout_secs", 120)?
            .set_default("logging.format", "pretty")?;

        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            // ./config.{yaml,toml,json} when present
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // E.g. PROOFDESK_SERVER__PORT=8000, PROOFDESK_LLM__BASE_URL=...
        builder = builder.add_source(
            Environment::with_prefix("PROOFDESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.llm_base_url.filter(|s| !s.trim().is_empty()) {
            builder = builder.set_override("llm.base_url", url)?;
        }
        if let Some(model) = cli.llm_model.filter(|s| !s.trim().is_empty()) {
            builder = builder.set_override("llm.model", model)?;
        }
        if let Some(key) = cli.llm_api_key.filter(|s| !s.trim().is_empty()) {
            builder = builder.set_override("llm.api_key", key)?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("logging.format", format.to_lowercase())?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        let parsed = url::Url::parse(&self.llm.base_url).map_err(|e| {
            config::ConfigError::Message(format!("invalid llm.base_url {:?}: {e}", self.llm.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(config::ConfigError::Message(format!(
                "llm.base_url must be http or https, got {}",
                parsed.scheme()
            )));
        }
        if matches!(
            Provider::detect_from_url(&self.llm.base_url),
            Provider::AzureOpenAI { .. }
        ) && self
            .llm
            .azure_deployment
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            return Err(config::ConfigError::Message(
                "llm.azure_deployment is required for Azure OpenAI".to_string(),
            ));
        }
        if self.llm.timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "llm.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Upstream timeout.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_secs)
    }

    /// Settings for the LLM client.
    pub fn llm_settings(&self) -> LlmSettings {
        let provider = Provider::detect_from_url(&self.llm.base_url).with_azure_deployment(
            self.llm.azure_deployment.clone(),
            self.llm.azure_api_version.clone(),
        );

        LlmSettings {
            base_url: self.llm.base_url.clone(),
            api_key: self.llm.api_key.clone().filter(|s| !s.trim().is_empty()),
            model: self.llm.model.clone().filter(|s| !s.trim().is_empty()),
            provider,
            timeout: self.llm_timeout(),
        }
    }

    /// Signature used in email mode, ignoring blank values.
    pub fn email_signature(&self) -> Option<&str> {
        self.email
            .signature
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
