//! Best-effort recovery of structured output from LLM text.
//!
//! Models are asked for bare JSON but regularly wrap it in Markdown fences or
//! surround it with prose. [`recover_json`] tries, in order: the whole text,
//! the first fenced block, then the widest `{ ... }` span. Callers fall back to
//! the raw text when nothing parses.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::{
    ChangeCategory, ChangeItem, ChangeLocation, LearningItem, MAX_CHANGES, MAX_LEARNING_ITEMS,
    Severity,
};

/// Warning surfaced to the user when structured output could not be parsed.
pub const PARSE_WARNING: &str =
    "Impossible de parser la réponse structurée du LLM. Explications indisponibles.";

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)```").expect("fence pattern is valid")
});

/// Which step of the recovery produced the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// The whole text was a JSON object.
    Direct,
    /// A fenced code block held the object.
    Fenced,
    /// The span between the first `{` and the last `}` held the object.
    BraceScan,
}

impl RecoveryStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Fenced => "fenced",
            Self::BraceScan => "brace_scan",
        }
    }
}

fn parse_object(s: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Recover the first JSON object embedded in `raw`.
pub fn recover_json(raw: &str) -> Option<(Map<String, Value>, RecoveryStrategy)> {
    if let Some(obj) = parse_object(raw) {
        return Some((obj, RecoveryStrategy::Direct));
    }

    if let Some(inner) = FENCE_RE.captures(raw).and_then(|c| c.get(1))
        && let Some(obj) = parse_object(inner.as_str().trim())
    {
        return Some((obj, RecoveryStrategy::Fenced));
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}'))
        && start < end
        && let Some(obj) = parse_object(&raw[start..=end])
    {
        return Some((obj, RecoveryStrategy::BraceScan));
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Field coercion
// ─────────────────────────────────────────────────────────────────────────────

/// Text of a value: strings as is, null/missing as empty, other scalars
/// rendered as JSON.
fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn opt_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(ToString::to_string)
}

fn category_of(value: Option<&Value>) -> ChangeCategory {
    value
        .and_then(Value::as_str)
        .and_then(ChangeCategory::parse)
        .unwrap_or_default()
}

fn location_of(value: Option<&Value>) -> Option<ChangeLocation> {
    let obj = value?.as_object()?;
    let location = ChangeLocation {
        start_char: obj.get("startChar").and_then(Value::as_u64),
        end_char: obj.get("endChar").and_then(Value::as_u64),
        sentence_index: obj.get("sentenceIndex").and_then(Value::as_u64),
    };
    (location != ChangeLocation::default()).then_some(location)
}

fn normalize_change(item: &Map<String, Value>, index: usize) -> ChangeItem {
    ChangeItem {
        id: opt_string(item.get("id")).unwrap_or_else(|| format!("c{index}")),
        category: category_of(item.get("category")),
        before: text_of(item.get("before")),
        after: text_of(item.get("after")),
        explanation: text_of(item.get("explanation")),
        rule: opt_string(item.get("rule")),
        severity: if item.get("severity").and_then(Value::as_str) == Some("important") {
            Severity::Important
        } else {
            Severity::Info
        },
        location: location_of(item.get("location")),
    }
}

fn normalize_learning(item: &Map<String, Value>, index: usize) -> LearningItem {
    LearningItem {
        id: opt_string(item.get("id")).unwrap_or_else(|| format!("l{index}")),
        title: text_of(item.get("title")),
        explanation: text_of(item.get("explanation")),
        example_before: opt_string(item.get("exampleBefore")),
        example_after: opt_string(item.get("exampleAfter")),
        category: category_of(item.get("category")),
    }
}

/// Normalize every object in the array under `key`, keeping at most `limit`.
/// Entries that are not objects are dropped; ids fall back to the position
/// in the original array.
fn normalize_list<T>(
    obj: &Map<String, Value>,
    key: &str,
    limit: usize,
    f: impl Fn(&Map<String, Value>, usize) -> T,
) -> Vec<T> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .enumerate()
                .filter_map(|(i, v)| v.as_object().map(|o| f(o, i)))
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Output shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Sanitized output of the correction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutput {
    pub corrected_text: String,
    pub explanation: String,
    pub parse_warning: Option<String>,
}

/// Sanitized output of the explanation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationOutput {
    pub changes: Vec<ChangeItem>,
    pub learning: Vec<LearningItem>,
    pub parse_warning: Option<String>,
}

/// Parse the correction call output.
///
/// An object without a non-empty `correctedText` (or legacy `outputMarkdown`)
/// counts as a failed parse, so the user still sees the model's text.
pub fn parse_correction(raw: &str) -> CorrectionOutput {
    if let Some((obj, strategy)) = recover_json(raw) {
        let corrected = opt_string(obj.get("correctedText"))
            .or_else(|| opt_string(obj.get("outputMarkdown")))
            .filter(|s| !s.trim().is_empty());

        if let Some(corrected_text) = corrected {
            tracing::debug!(
                name: "sanitize.recovered",
                strategy = strategy.as_str(),
                kind = "correction",
                "Recovered structured output"
            );
            return CorrectionOutput {
                corrected_text,
                explanation: text_of(obj.get("explanation")),
                parse_warning: None,
            };
        }
    }

    tracing::warn!(raw_length = raw.len(), "Correction output was not parseable, using raw text");
    CorrectionOutput {
        corrected_text: raw.trim().to_string(),
        explanation: String::new(),
        parse_warning: Some(PARSE_WARNING.to_string()),
    }
}

/// Parse the explanation call output.
pub fn parse_explanation(raw: &str) -> ExplanationOutput {
    match recover_json(raw) {
        Some((obj, strategy)) => {
            tracing::debug!(
                name: "sanitize.recovered",
                strategy = strategy.as_str(),
                kind = "explanation",
                "Recovered structured output"
            );
            ExplanationOutput {
                changes: normalize_list(&obj, "changes", MAX_CHANGES, normalize_change),
                learning: normalize_list(&obj, "learning", MAX_LEARNING_ITEMS, normalize_learning),
                parse_warning: None,
            }
        }
        None => {
            tracing::warn!(raw_length = raw.len(), "Explanation output was not parseable");
            ExplanationOutput {
                changes: Vec::new(),
                learning: Vec::new(),
                parse_warning: Some(PARSE_WARNING.to_string()),
            }
        }
    }
}
