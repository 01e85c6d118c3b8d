//! Prompt templates for the two LLM calls.
//!
//! `/api/process` asks for the corrected text plus a short summary;
//! `/api/explain` asks for the structured list of changes and learning points.
//! Everything here is a pure function of the request.

use std::fmt::Write as _;

use crate::schema::{
    ChangeCategory, ExplainRequest, Lang, MAX_CHANGES, MAX_LEARNING_ITEMS, Mode, ProcessRequest,
    RewriteStrength, TonePreset,
};

impl TonePreset {
    /// Prompt wording for this tone.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Executive => {
                "Use a direct, authoritative, executive tone. Be decisive and strategic."
            }
            Self::NeutralPro => "Use a neutral, professional tone. Clear and balanced.",
            Self::Diplomatic => "Use a diplomatic, tactful tone. Be considerate and measured.",
            Self::Casual => "Use a casual, relaxed tone. Natural and approachable.",
            Self::Friendly => "Use a warm, friendly tone. Personable and engaging.",
            Self::Funny => {
                "Use a light, witty tone. Inject humor where appropriate without undermining the message."
            }
            Self::VeryConcise => {
                "Be extremely concise. Remove all filler. Every word must earn its place."
            }
            Self::VeryClear => {
                "Prioritize clarity and pedagogy. Explain concepts simply. Use short sentences."
            }
        }
    }
}

impl RewriteStrength {
    /// Prompt wording for this rewrite level.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::None => {
                "Make only minimal corrections (spelling, grammar, punctuation). Do NOT rewrite or restructure sentences. Preserve the original wording as much as possible. Only fix clear errors and make micro-improvements."
            }
            Self::Light => {
                "Correct errors and lightly clarify. You may shorten slightly or improve word choice, but keep the original structure and voice intact."
            }
            Self::Medium => {
                "Correct errors, reorganize sentences for better flow, remove redundancies. You may restructure paragraphs but preserve the overall meaning and key points."
            }
            Self::Strong => {
                "Rewrite freely for maximum clarity and impact. You may completely restructure, but you MUST preserve the original meaning and all key information. Do not invent new content."
            }
        }
    }

    fn structure_note(self) -> &'static str {
        if self.preserves_structure() {
            "IMPORTANT: Preserve the original paragraph structure exactly. Do not merge or split paragraphs."
        } else {
            "You may adjust paragraph structure if it improves readability, but keep the overall organization similar."
        }
    }
}

/// Closing formulas per language, used in email mode.
const CLOSINGS: [(&str, &str); 3] = [
    ("French", "Meilleures salutations,"),
    ("English", "Best regards,"),
    ("German", "Mit freundlichen Grüßen,"),
];

fn email_block(signature: Option<&str>) -> String {
    let mut out = String::from(
        "\n## Email formatting (HIGHEST PRIORITY — overrides other rules)\n\
         This text is an email. You MUST ensure the output contains:\n\
         1. The VERY FIRST LINE must be a suggested email subject line, prefixed with \"Subject: \". Infer it from the email content. Keep it short and professional.\n\
         2. Then a blank line, then the email body.\n\
         3. The body MUST start with a greeting (e.g. \"Bonjour,\" / \"Hello,\" / \"Guten Tag,\"). Add one if missing.\n",
    );

    match signature {
        Some(name) => {
            out.push_str(
                "4. The body MUST end with a closing formula + signature. Add them if missing. Use exactly:\n",
            );
            for (language, closing) in CLOSINGS {
                let _ = writeln!(
                    out,
                    "   - {language}: on a new line \"{closing}\" then on the next line \"{name}\""
                );
            }
        }
        None => {
            out.push_str(
                "4. The body MUST end with a closing formula. Add it if missing. Use exactly:\n",
            );
            for (language, closing) in CLOSINGS {
                let _ = writeln!(out, "   - {language}: on a new line \"{closing}\"");
            }
            out.push_str(
                "   Keep any signature already present in the text; do not invent a name.\n",
            );
        }
    }

    out.push_str(
        "5. If the text already has a greeting or closing, keep it (fix if needed) but do NOT duplicate.\n\
         6. Adapt greeting formality to the tone preset.\n\
         Adding salutations and a subject line is NOT \"inventing content\" — it is required email formatting.",
    );
    out
}

fn role_line(mode: Mode) -> &'static str {
    if mode.is_translation() {
        "You are an expert translator, proofreader, and editor."
    } else {
        "You are an expert proofreader and editor."
    }
}

fn translation_note(mode: Mode, target: Option<Lang>) -> String {
    match (mode.is_translation(), target) {
        (true, Some(lang)) => format!(
            "\nTranslate the text to {}. The translation must sound natural in the target language, not literal. Adapt idioms and expressions.",
            lang.code_upper()
        ),
        _ => String::new(),
    }
}

/// System prompt for `/api/process`.
///
/// `signature` is the name appended after the closing formula in email mode.
pub fn build_process_system_prompt(req: &ProcessRequest, signature: Option<&str>) -> String {
    let task = if req.mode.is_translation() {
        "Translate, proofread, and edit"
    } else {
        "Proofread and edit"
    };

    let email_note = if req.email_mode() {
        email_block(signature)
    } else {
        String::new()
    };

    let custom_note = req
        .custom_instructions()
        .map(|c| format!("\n## Custom instructions (from the user — MUST be followed)\n{c}"))
        .unwrap_or_default();

    format!(
        r#"{role}

## Your task
{task} the user's text according to the instructions below.
{email_note}

## Tone
{tone}

## Rewrite level
{rewrite}

## Structure
{structure}
{translation}
{custom_note}

## Editorial rules
- Never invent new content or add information not present in the original (exception: email salutations if email mode is enabled).
- Preserve the original meaning faithfully.
- Produce clean Markdown output (paragraphs, lists, bold/italic as appropriate).
- Keep the same Markdown structure the user used (if they used lists, keep lists; if plain paragraphs, keep paragraphs).

## Output format
Return ONLY a JSON object with exactly two keys:
- "correctedText": the corrected/translated text in Markdown.
- "explanation": a short paragraph (2-4 sentences) in the SAME language as the input text, summarizing the main corrections you made. Be specific about what you changed and why. If no corrections were needed, say so.

Example:
{{"correctedText": "The corrected text here...", "explanation": "Summary of corrections..."}}

Return ONLY the JSON object. No markdown fences, no extra text before or after."#,
        role = role_line(req.mode),
        tone = req.tone_preset.instruction(),
        rewrite = req.rewrite_strength.instruction(),
        structure = req.rewrite_strength.structure_note(),
        translation = translation_note(req.mode, req.target_lang),
    )
}

fn user_prompt(mode: Mode, target: Option<Lang>, input_text: &str) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let (true, Some(lang)) = (mode.is_translation(), target) {
        parts.push(format!("[Translate to {}]", lang.code_upper()));
    }
    parts.push(String::new());
    parts.push(input_text.to_string());
    parts.join("\n")
}

/// User prompt for `/api/process`.
pub fn build_process_user_prompt(req: &ProcessRequest) -> String {
    user_prompt(req.mode, req.target_lang, &req.input_text)
}

/// System prompt for `/api/explain`.
pub fn build_explain_system_prompt(req: &ExplainRequest) -> String {
    let categories = ChangeCategory::ALL
        .iter()
        .map(|c| format!("\"{}\"", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    let translation = translation_note(req.mode, req.target_lang);
    let tone = req
        .tone_preset
        .map(|t| format!("\nThe requested tone was: {}", t.instruction()))
        .unwrap_or_default();

    format!(
        r#"{role}

## Your task
Analyze the user's text and list the corrections a careful editor would make, then extract the most useful lessons for the writer.
Apply this rewrite level when deciding what counts as a change: {rewrite}{translation}{tone}

## Output format
Return ONLY a JSON object with exactly two keys:
- "changes": an array of at most {max_changes} objects, most important first, each with:
  - "id": a short unique id ("c1", "c2", ...)
  - "category": one of {categories}
  - "before": the exact original fragment
  - "after": the corrected fragment
  - "explanation": one or two sentences explaining the change
  - "rule": optional name of the grammar or style rule
  - "severity": "important" for errors that change meaning or look unprofessional, otherwise "info"
- "learning": an array of at most {max_learning} objects, each with:
  - "id": a short unique id ("l1", "l2", ...)
  - "title": a short title for the lesson
  - "explanation": what to remember, in two or three sentences
  - "exampleBefore": optional incorrect example
  - "exampleAfter": optional corrected example
  - "category": one of the categories above

Write every explanation in the SAME language as the input text.
If the text needs no correction, return empty arrays.

Return ONLY the JSON object. No markdown fences, no extra text before or after."#,
        role = role_line(req.mode),
        rewrite = req.rewrite_strength.instruction(),
        max_changes = MAX_CHANGES,
        max_learning = MAX_LEARNING_ITEMS,
    )
}

/// User prompt for `/api/explain`.
pub fn build_explain_user_prompt(req: &ExplainRequest) -> String {
    user_prompt(req.mode, req.target_lang, &req.input_text)
}
