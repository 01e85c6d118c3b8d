//! Proofdesk
//!
//! A writing assistant: a browser UI plus a small proxy server that turns the
//! user's settings into prompts, relays them to an OpenAI-compatible LLM, and
//! returns corrected text with structured explanations.
//!
//! # Architecture
//!
//! - **Server**: Axum routes `/api/process` and `/api/explain`, plus the UI page
//! - **LLM**: Non-streaming Chat Completions client with a timeout
//! - **Sanitizer**: JSON recovery from free-form model output
//! - **UI**: Server-rendered HTML shell driven by a small client script
//!
//! # Modules
//!
//! - [`schema`]: Request/response shapes and validation
//! - [`prompts`]: Prompt templates for both LLM calls
//! - [`llm`]: LLM client trait and implementation
//! - [`sanitize`]: Best-effort JSON recovery
//! - [`server`]: Router, handlers and startup
//! - [`ui`]: HTML rendering

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod email;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod sanitize;
pub mod schema;
pub mod server;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::LlmClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream LLM client.
    pub llm: Arc<dyn LlmClient>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
