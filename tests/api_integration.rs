use std::future::IntoFuture;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use proofdesk::AppState;
use proofdesk::config::{AppConfig, EmailConfig, LlmConfig, LogFormat, LoggingConfig, ServerConfig};
use proofdesk::llm::{ChatMessage, Completion, CompletionOptions, LlmClient, LlmError, MessageRole};
use proofdesk::sanitize::PARSE_WARNING;
use proofdesk::server::build_router;

type Reply = Box<dyn Fn(&[ChatMessage]) -> Result<Completion, LlmError> + Send + Sync>;

/// LLM stand-in that records every call and answers from a closure.
struct ScriptedLlm {
    reply: Reply,
    calls: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl ScriptedLlm {
    fn new(reply: impl Fn(&[ChatMessage]) -> Result<Completion, LlmError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn answering(content: &str) -> Arc<Self> {
        let content = content.to_string();
        Self::new(move |_| {
            Ok(Completion {
                content: content.clone(),
                model: "test-model".into(),
            })
        })
    }

    fn calls(&self) -> Vec<(Vec<ChatMessage>, CompletionOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        let result = (self.reply)(&messages);
        self.calls.lock().unwrap().push((messages, options));
        result
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".into(),
            body_limit_bytes: 1024 * 1024,
        },
        llm: LlmConfig {
            base_url: "http://llm.test".into(),
            model: None,
            api_key: None,
            timeout_secs: 5,
            azure_deployment: None,
            azure_api_version: None,
        },
        email: EmailConfig {
            signature: Some("Jane Doe".into()),
        },
        logging: LoggingConfig {
            format: LogFormat::Pretty,
        },
    }
}

fn server_with(llm: Arc<ScriptedLlm>) -> TestServer {
    let state = AppState {
        llm,
        config: Arc::new(test_config()),
    };
    TestServer::new(build_router(state)).expect("test server")
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

// ─────────────────────────────────────────────────────────────────────────────
// /api/process
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_process_returns_corrected_text() {
    let llm = ScriptedLlm::answering(
        r#"{"correctedText": "Je suis allé au marché.", "explanation": "Accord du participe."}"#,
    );
    let server = server_with(Arc::clone(&llm));

    let response = server
        .post("/api/process")
        .json(&json!({
            "mode": "proofread",
            "inputText": "Je suis aller au marché.",
            "tonePreset": "friendly",
            "rewriteStrength": "light",
            "outputFormat": "markdown"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["outputMarkdown"], "Je suis allé au marché.");
    assert_eq!(body["explanation"], "Accord du participe.");
    assert_eq!(body["meta"]["model"], "test-model");
    assert_eq!(body["meta"]["tonePreset"], "friendly");
    assert_eq!(body["meta"]["rewriteStrength"], "light");
    assert!(body["meta"]["latencyMs"].is_u64());
    assert!(body.get("parseWarning").is_none());
    assert!(body.get("emailSubject").is_none());

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    let (messages, options) = &calls[0];
    assert!(approx(options.temperature, 0.3));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::System);
    assert!(messages[0].content.contains("Use a warm, friendly tone."));
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[1].content, "\nJe suis aller au marché.");
}

#[tokio::test]
async fn test_process_translation_and_email() {
    let llm = ScriptedLlm::answering(
        "```json\n{\"correctedText\": \"Subject: Meeting on Monday\\n\\nHello,\\n\\nSee you then.\\n\\nBest regards,\\nJane Doe\", \"explanation\": \"Translated.\"}\n```",
    );
    let server = server_with(Arc::clone(&llm));

    let response = server
        .post("/api/process")
        .json(&json!({
            "mode": "translate_proofread",
            "inputText": "Réunion lundi, à bientôt.",
            "tonePreset": "neutral_pro",
            "rewriteStrength": "none",
            "targetLang": "en",
            "emailMode": true
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["emailSubject"], "Meeting on Monday");
    assert!(
        body["outputMarkdown"]
            .as_str()
            .unwrap()
            .starts_with("Subject: Meeting on Monday\n\nHello,")
    );
    assert_eq!(body["meta"]["targetLang"], "en");

    let (messages, _) = &llm.calls()[0];
    assert!(messages[0].content.contains("Translate the text to EN."));
    assert!(messages[0].content.contains("\"Jane Doe\""));
    assert!(messages[1].content.starts_with("[Translate to EN]\n\n"));
}

#[tokio::test]
async fn test_process_echoes_target_lang_in_proofread_mode() {
    let llm = ScriptedLlm::answering(r#"{"correctedText": "Guten Tag.", "explanation": ""}"#);
    let server = server_with(Arc::clone(&llm));

    let response = server
        .post("/api/process")
        .json(&json!({
            "mode": "proofread",
            "inputText": "Guten Tak.",
            "targetLang": "de"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["meta"]["targetLang"], "de");

    let (messages, _) = &llm.calls()[0];
    assert!(!messages[1].content.contains("[Translate"));
}

#[tokio::test]
async fn test_process_unparseable_output_falls_back_to_raw_text() {
    let llm = ScriptedLlm::answering("  Voici le texte corrigé, sans JSON.  ");
    let server = server_with(llm);

    let response = server
        .post("/api/process")
        .json(&json!({ "inputText": "Voici le texte corigé." }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["outputMarkdown"], "Voici le texte corrigé, sans JSON.");
    assert_eq!(body["explanation"], "");
    assert_eq!(body["parseWarning"], PARSE_WARNING);
}

#[tokio::test]
async fn test_process_validation_errors() {
    let llm = ScriptedLlm::answering("{}");
    let server = server_with(Arc::clone(&llm));

    let response = server
        .post("/api/process")
        .json(&json!({ "inputText": " x " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "inputText is required (min 2 chars)"
    );

    let response = server
        .post("/api/process")
        .json(&json!({ "mode": "translate_proofread", "inputText": "Bonjour" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "targetLang is required in translate_proofread mode"
    );

    let response = server
        .post("/api/process")
        .json(&json!({ "inputText": "x".repeat(18_001) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "inputText too long (max ~12000 chars)"
    );

    assert!(llm.calls().is_empty(), "invalid requests must not reach the LLM");
}

#[tokio::test]
async fn test_process_rejects_unknown_enum_and_bad_json() {
    let server = server_with(ScriptedLlm::answering("{}"));

    let response = server
        .post("/api/process")
        .json(&json!({ "inputText": "Hello there", "tonePreset": "sarcastic" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(
        response.json::<Value>()["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body")
    );

    let response = server
        .post("/api/process")
        .text("{not json")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_upstream_failure_is_502() {
    let llm = ScriptedLlm::new(|_| {
        Err(LlmError::Status {
            status: 500,
            body: "boom".into(),
        })
    });
    let server = server_with(llm);

    let response = server
        .post("/api/process")
        .json(&json!({ "inputText": "Hello world" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<Value>()["error"],
        "LLM error: LLM returned 500: boom"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// /api/explain
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_explain_returns_normalized_items() {
    let llm = ScriptedLlm::answering(
        r#"Here is the analysis:
{"changes": [
  {"id": "c1", "category": "grammar", "before": "aller", "after": "allé", "explanation": "Participe passé avec être.", "severity": "important"},
  {"category": "made-up", "before": "corigé", "after": "corrigé", "explanation": "Orthographe."}
],
"learning": [
  {"title": "Participe passé", "explanation": "Avec être, accorder avec le sujet.", "exampleBefore": "elle est allé", "exampleAfter": "elle est allée", "category": "grammar"}
]}
Let me know if you need more."#,
    );
    let server = server_with(Arc::clone(&llm));

    let response = server
        .post("/api/explain")
        .json(&json!({
            "inputText": "Je suis aller au marché, c'est corigé.",
            "mode": "proofread",
            "rewriteStrength": "light"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let changes = body["changes"].as_array().unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0]["severity"], "important");
    assert_eq!(changes[1]["id"], "c1");
    assert_eq!(changes[1]["category"], "style");
    assert_eq!(changes[1]["severity"], "info");
    assert_eq!(body["learning"][0]["exampleAfter"], "elle est allée");
    assert_eq!(body["meta"]["model"], "test-model");
    assert!(body.get("parseWarning").is_none());

    let (messages, options) = &llm.calls()[0];
    assert!(approx(options.temperature, 0.2));
    assert!(messages[0].content.contains("\"changes\""));
    assert!(messages[0].content.contains("at most 25"));
}

#[tokio::test]
async fn test_explain_unparseable_output_warns() {
    let server = server_with(ScriptedLlm::answering("I could not produce JSON, sorry."));

    let response = server
        .post("/api/explain")
        .json(&json!({ "inputText": "Some text to check" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["changes"], json!([]));
    assert_eq!(body["learning"], json!([]));
    assert_eq!(body["parseWarning"], PARSE_WARNING);
}

#[tokio::test]
async fn test_explain_validation_error() {
    let server = server_with(ScriptedLlm::answering("{}"));

    let response = server
        .post("/api/explain")
        .json(&json!({ "inputText": "Hallo Welt", "mode": "translate_proofread" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "targetLang is required in translate_proofread mode"
    );
}

#[tokio::test]
async fn test_process_and_explain_run_concurrently() {
    let llm = ScriptedLlm::new(|messages| {
        let content = if messages[0].content.contains("\"learning\"") {
            r#"{"changes": [], "learning": []}"#
        } else {
            r#"{"correctedText": "Fixed.", "explanation": ""}"#
        };
        Ok(Completion {
            content: content.into(),
            model: "m".into(),
        })
    });
    let server = server_with(Arc::clone(&llm));
    let body = json!({ "inputText": "Fixd." });

    let (process, explain) = tokio::join!(
        server.post("/api/process").json(&body).into_future(),
        server.post("/api/explain").json(&body).into_future(),
    );

    process.assert_status_ok();
    explain.assert_status_ok();
    assert_eq!(process.json::<Value>()["outputMarkdown"], "Fixed.");
    assert_eq!(explain.json::<Value>()["changes"], json!([]));
    assert_eq!(llm.calls().len(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Pages and auxiliary routes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_index_and_assets() {
    let server = server_with(ScriptedLlm::answering("{}"));

    let page = server.get("/").await;
    page.assert_status_ok();
    let html = page.text();
    assert!(html.contains("id=\"input-text\""));
    assert!(html.contains("/static/proofread.js"));

    let script = server.get("/static/proofread.js").await;
    script.assert_status_ok();
    assert!(script.header("content-type").to_str().unwrap().starts_with("text/javascript"));
    assert!(script.text().contains("/api/explain"));

    let css = server.get("/static/app.css").await;
    css.assert_status_ok();
    assert!(css.header("content-type").to_str().unwrap().starts_with("text/css"));
}

#[tokio::test]
async fn test_fallbacks() {
    let server = server_with(ScriptedLlm::answering("{}"));

    let missing_api = server.get("/api/nope").await;
    missing_api.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(missing_api.json::<Value>()["error"], "Not found: /api/nope");

    let deep_link = server.get("/some/client/route").await;
    deep_link.assert_status_ok();
    assert!(deep_link.text().starts_with("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_options_and_health() {
    let server = server_with(ScriptedLlm::answering("{}"));

    let health = server.get("/api/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let options: Value = server.get("/api/options").await.json();
    assert_eq!(options["tones"].as_array().unwrap().len(), 8);
    assert_eq!(options["tones"][1]["value"], "neutral_pro");
    assert_eq!(options["tones"][1]["label"], "Professionnel neutre");
    assert_eq!(options["inputMaxChars"], 12_000);
    assert_eq!(options["maxChanges"], 25);
    assert_eq!(options["maxLearningItems"], 5);
}
