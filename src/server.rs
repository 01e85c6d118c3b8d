use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request, State, rejection::JsonRejection},
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::email::split_subject;
use crate::error::ApiError;
use crate::llm::{ChatCompletionsClient, ChatMessage, CompletionOptions};
use crate::prompts::{
    build_explain_system_prompt, build_explain_user_prompt, build_process_system_prompt,
    build_process_user_prompt,
};
use crate::sanitize::{parse_correction, parse_explanation};
use crate::schema::{
    ExplainMeta, ExplainRequest, ExplainResponse, Lang, OptionsCatalogue, ProcessMeta, ProcessRequest,
    ProcessResponse,
};
use crate::ui;

/// Temperature for the correction call.
const PROCESS_TEMPERATURE: f32 = crate::llm::DEFAULT_TEMPERATURE;

/// Temperature for the explanation call; lower for steadier JSON.
const EXPLAIN_TEMPERATURE: f32 = 0.2;

/// Extra time granted on top of the LLM timeout before the whole request is cut.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let settings = config.llm_settings();

    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = settings.model.as_deref().unwrap_or("<server default>"),
        provider = ?settings.provider,
        timeout_secs = settings.timeout.as_secs(),
        "LLM configuration loaded"
    );

    let llm = Arc::new(ChatCompletionsClient::new(settings)?);

    let state = AppState {
        llm,
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.config.llm_timeout() + REQUEST_TIMEOUT_MARGIN;
    let body_limit = state.config.server.body_limit_bytes;

    Router::new()
        // API routes
        .route("/api/process", post(api_process))
        .route("/api/explain", post(api_explain))
        .route("/api/options", get(api_options))
        .route("/api/health", get(api_health))
        // HTML page
        .route("/", get(index_handler))
        // Static assets (compiled in)
        .route("/static/proofread.js", get(ui::script_handler))
        .route("/static/app.css", get(ui::stylesheet_handler))
        .fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(request_timeout, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (
                        StatusCode::GATEWAY_TIMEOUT,
                        Json(json!({ "error": "Request timed out" })),
                    )
                        .into_response(),
                }
            },
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(name: "server.stopping", "Shutdown signal received");
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn rejection_to_error(rejection: &JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Index page handler.
async fn index_handler() -> impl IntoResponse {
    Html(ui::render_index())
}

/// Unknown paths: JSON 404 under `/api`, the UI page for other GETs.
async fn fallback_handler(method: Method, uri: Uri) -> Response {
    if uri.path().starts_with("/api/") || method != Method::GET {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Not found: {}", uri.path()) })),
        )
            .into_response();
    }
    Html(ui::render_index()).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/process - Corrected (and optionally translated) text.
async fn api_process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let Json(req) = payload.map_err(|r| rejection_to_error(&r))?;
    req.validate().map_err(ApiError::BadRequest)?;

    tracing::info!(
        mode = req.mode.as_str(),
        tone = req.tone_preset.as_str(),
        rewrite = req.rewrite_strength.as_str(),
        target_lang = req.target_lang.map(Lang::as_str),
        email_mode = req.email_mode(),
        input_chars = req.input_text.chars().count(),
        "Received process request"
    );

    let messages = vec![
        ChatMessage::system(build_process_system_prompt(
            &req,
            state.config.email_signature(),
        )),
        ChatMessage::user(build_process_user_prompt(&req)),
    ];

    let started = Instant::now();
    let completion = state
        .llm
        .chat_completion(
            messages,
            CompletionOptions {
                temperature: PROCESS_TEMPERATURE,
            },
        )
        .await?;
    let latency_ms = elapsed_ms(started);

    let parsed = parse_correction(&completion.content);
    let email_subject = if req.email_mode() {
        split_subject(&parsed.corrected_text).0
    } else {
        None
    };

    Ok(Json(ProcessResponse {
        output_markdown: parsed.corrected_text,
        explanation: parsed.explanation,
        email_subject,
        meta: ProcessMeta {
            target_lang: req.target_lang,
            rewrite_strength: req.rewrite_strength,
            tone_preset: req.tone_preset,
            model: completion.model,
            latency_ms,
        },
        parse_warning: parsed.parse_warning,
    }))
}

/// POST /api/explain - Structured changes and learning points.
async fn api_explain(
    State(state): State<AppState>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let Json(req) = payload.map_err(|r| rejection_to_error(&r))?;
    req.validate().map_err(ApiError::BadRequest)?;

    tracing::info!(
        mode = req.mode.as_str(),
        rewrite = req.rewrite_strength.as_str(),
        input_chars = req.input_text.chars().count(),
        "Received explain request"
    );

    let messages = vec![
        ChatMessage::system(build_explain_system_prompt(&req)),
        ChatMessage::user(build_explain_user_prompt(&req)),
    ];

    let started = Instant::now();
    let completion = state
        .llm
        .chat_completion(
            messages,
            CompletionOptions {
                temperature: EXPLAIN_TEMPERATURE,
            },
        )
        .await?;
    let latency_ms = elapsed_ms(started);

    let parsed = parse_explanation(&completion.content);

    Ok(Json(ExplainResponse {
        changes: parsed.changes,
        learning: parsed.learning,
        meta: ExplainMeta {
            model: completion.model,
            latency_ms,
        },
        parse_warning: parsed.parse_warning,
    }))
}

/// GET /api/options - Enumerations and limits.
async fn api_options() -> Json<OptionsCatalogue> {
    Json(OptionsCatalogue::build())
}

/// GET /api/health - Liveness probe.
async fn api_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
