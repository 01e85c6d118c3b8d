//! Request and response shapes shared by the HTTP routes and the UI.
//!
//! All wire types serialize with camelCase keys; enumerations use their
//! snake_case identifiers (`neutral_pro`, `translate_proofread`, ...).

use serde::{Deserialize, Serialize};

/// Soft limit on input length shown in the editor.
pub const INPUT_MAX_CHARS: usize = 12_000;

/// Hard limit accepted by the server (1.5× the soft limit).
pub const INPUT_HARD_MAX_CHARS: usize = INPUT_MAX_CHARS * 3 / 2;

/// Maximum number of change items returned by `/api/explain`.
pub const MAX_CHANGES: usize = 25;

/// Maximum number of learning items returned by `/api/explain`.
pub const MAX_LEARNING_ITEMS: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Enumerations
// ─────────────────────────────────────────────────────────────────────────────

/// Processing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Correct the text in its own language.
    #[default]
    Proofread,
    /// Translate to the target language, then proofread.
    TranslateProofread,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Proofread, Self::TranslateProofread];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proofread => "proofread",
            Self::TranslateProofread => "translate_proofread",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Proofread => "Proofread",
            Self::TranslateProofread => "Translate + Proofread",
        }
    }

    pub fn is_translation(self) -> bool {
        matches!(self, Self::TranslateProofread)
    }
}

/// Tone preset selected in the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TonePreset {
    Executive,
    #[default]
    NeutralPro,
    Diplomatic,
    Casual,
    Friendly,
    Funny,
    VeryConcise,
    VeryClear,
}

impl TonePreset {
    pub const ALL: [Self; 8] = [
        Self::Executive,
        Self::NeutralPro,
        Self::Diplomatic,
        Self::Casual,
        Self::Friendly,
        Self::Funny,
        Self::VeryConcise,
        Self::VeryClear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Executive => "executive",
            Self::NeutralPro => "neutral_pro",
            Self::Diplomatic => "diplomatic",
            Self::Casual => "casual",
            Self::Friendly => "friendly",
            Self::Funny => "funny",
            Self::VeryConcise => "very_concise",
            Self::VeryClear => "very_clear",
        }
    }

    /// French display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Executive => "Directeur / Executive",
            Self::NeutralPro => "Professionnel neutre",
            Self::Diplomatic => "Diplomatique",
            Self::Casual => "Casual",
            Self::Friendly => "Amical",
            Self::Funny => "Drôle / léger",
            Self::VeryConcise => "Très concis",
            Self::VeryClear => "Très clair / pédagogique",
        }
    }
}

/// How freely the model may rewrite. Variants are ordered from least to most.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteStrength {
    #[default]
    None,
    Light,
    Medium,
    Strong,
}

impl RewriteStrength {
    pub const ALL: [Self; 4] = [Self::None, Self::Light, Self::Medium, Self::Strong];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }

    /// Whether the paragraph structure must be kept as is.
    pub fn preserves_structure(self) -> bool {
        self <= Self::Light
    }
}

/// Supported target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Fr,
    En,
    De,
}

impl Lang {
    pub const ALL: [Self; 3] = [Self::Fr, Self::En, Self::De];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
            Self::De => "de",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fr => "Français",
            Self::En => "English",
            Self::De => "Deutsch",
        }
    }

    /// Upper-cased code as used in prompts (`FR`, `EN`, `DE`).
    pub fn code_upper(self) -> String {
        self.as_str().to_ascii_uppercase()
    }
}

/// Output format requested by the client. Only Markdown exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
}

/// Category attached to a change or learning item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCategory {
    Spelling,
    Grammar,
    Punctuation,
    #[default]
    Style,
    Clarity,
    Concision,
    Tone,
    Translation,
    Anglicism,
    Formatting,
}

impl ChangeCategory {
    pub const ALL: [Self; 10] = [
        Self::Spelling,
        Self::Grammar,
        Self::Punctuation,
        Self::Style,
        Self::Clarity,
        Self::Concision,
        Self::Tone,
        Self::Translation,
        Self::Anglicism,
        Self::Formatting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spelling => "spelling",
            Self::Grammar => "grammar",
            Self::Punctuation => "punctuation",
            Self::Style => "style",
            Self::Clarity => "clarity",
            Self::Concision => "concision",
            Self::Tone => "tone",
            Self::Translation => "translation",
            Self::Anglicism => "anglicism",
            Self::Formatting => "formatting",
        }
    }

    /// Strict lookup; returns `None` for anything outside the known set.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Important,
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/process`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub tone_preset: TonePreset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    #[serde(default)]
    pub rewrite_strength: RewriteStrength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<Lang>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_mode: Option<bool>,
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl ProcessRequest {
    pub fn email_mode(&self) -> bool {
        self.email_mode.unwrap_or(false)
    }

    /// Custom instructions, ignoring blank strings.
    pub fn custom_instructions(&self) -> Option<&str> {
        self.custom_instructions
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_input(&self.input_text, self.mode, self.target_lang)
    }
}

/// Body of `POST /api/explain`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub rewrite_strength: RewriteStrength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<Lang>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_preset: Option<TonePreset>,
}

impl ExplainRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_input(&self.input_text, self.mode, self.target_lang)
    }
}

/// Checks shared by both routes. Returns the message sent back with a 400.
pub fn validate_input(input_text: &str, mode: Mode, target_lang: Option<Lang>) -> Result<(), String> {
    if input_text.trim().chars().count() < 2 {
        return Err("inputText is required (min 2 chars)".to_string());
    }
    if input_text.chars().count() > INPUT_HARD_MAX_CHARS {
        return Err(format!("inputText too long (max ~{INPUT_MAX_CHARS} chars)"));
    }
    if mode.is_translation() && target_lang.is_none() {
        return Err("targetLang is required in translate_proofread mode".to_string());
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

/// Optional position of a change in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_char: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_char: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence_index: Option<u64>,
}

/// A single correction made by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeItem {
    pub id: String,
    pub category: ChangeCategory,
    pub before: String,
    pub after: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ChangeLocation>,
}

/// A teaching point derived from the corrections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningItem {
    pub id: String,
    pub title: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_after: Option<String>,
    pub category: ChangeCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<Lang>,
    pub rewrite_strength: RewriteStrength,
    pub tone_preset: TonePreset,
    pub model: String,
    pub latency_ms: u64,
}

/// Body returned by `POST /api/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub output_markdown: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    pub meta: ProcessMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainMeta {
    pub model: String,
    pub latency_ms: u64,
}

/// Body returned by `POST /api/explain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    pub changes: Vec<ChangeItem>,
    pub learning: Vec<LearningItem>,
    pub meta: ExplainMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_warning: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Options catalogue (GET /api/options)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct OptionEntry {
    pub value: &'static str,
    pub label: &'static str,
}

/// Enumerations and limits, for clients that build their own forms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsCatalogue {
    pub modes: Vec<OptionEntry>,
    pub tones: Vec<OptionEntry>,
    pub rewrite_strengths: Vec<OptionEntry>,
    pub languages: Vec<OptionEntry>,
    pub categories: Vec<&'static str>,
    pub input_max_chars: usize,
    pub max_changes: usize,
    pub max_learning_items: usize,
}

impl OptionsCatalogue {
    pub fn build() -> Self {
        Self {
            modes: Mode::ALL
                .iter()
                .map(|m| OptionEntry { value: m.as_str(), label: m.label() })
                .collect(),
            tones: TonePreset::ALL
                .iter()
                .map(|t| OptionEntry { value: t.as_str(), label: t.label() })
                .collect(),
            rewrite_strengths: RewriteStrength::ALL
                .iter()
                .map(|r| OptionEntry { value: r.as_str(), label: r.label() })
                .collect(),
            languages: Lang::ALL
                .iter()
                .map(|l| OptionEntry { value: l.as_str(), label: l.label() })
                .collect(),
            categories: ChangeCategory::ALL.iter().map(|c| c.as_str()).collect(),
            input_max_chars: INPUT_MAX_CHARS,
            max_changes: MAX_CHANGES,
            max_learning_items: MAX_LEARNING_ITEMS,
        }
    }
}
