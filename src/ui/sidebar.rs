//! Settings sidebar.

use std::fmt::Write as _;

use super::escape_html;
use crate::schema::{Lang, Mode, RewriteStrength, TonePreset};

/// Defaults applied before any stored settings are restored.
const DEFAULT_MODE: Mode = Mode::Proofread;
const DEFAULT_TONE: TonePreset = TonePreset::NeutralPro;
const DEFAULT_REWRITE: RewriteStrength = RewriteStrength::Light;
const DEFAULT_TARGET: Lang = Lang::En;

const LEGEND_CLASS: &str = "field-label";

fn mode_radios() -> String {
    let mut out = String::new();
    for mode in Mode::ALL {
        let checked = if mode == DEFAULT_MODE { " checked" } else { "" };
        let _ = write!(
            out,
            r#"<label class="choice"><input type="radio" name="mode" value="{value}"{checked}> {label}</label>"#,
            value = mode.as_str(),
            label = escape_html(mode.label()),
        );
    }
    out
}

fn select_options<T: Copy + PartialEq>(
    items: &[T],
    selected: T,
    value: impl Fn(T) -> &'static str,
    label: impl Fn(T) -> &'static str,
) -> String {
    items
        .iter()
        .map(|&item| {
            let sel = if item == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{sel}>{}</option>"#,
                value(item),
                escape_html(label(item))
            )
        })
        .collect()
}

fn rewrite_slider() -> String {
    let steps: Vec<&str> = RewriteStrength::ALL.iter().map(|r| r.as_str()).collect();
    let labels: String = RewriteStrength::ALL
        .iter()
        .map(|r| format!("<span>{}</span>", escape_html(r.label())))
        .collect();
    let current = RewriteStrength::ALL
        .iter()
        .position(|&r| r == DEFAULT_REWRITE)
        .unwrap_or(0);

    format!(
        r#"<div class="field">
            <label class="{LEGEND_CLASS}" for="rewrite">Réécriture — <span id="rewrite-label">{current_label}</span></label>
            <input type="range" id="rewrite" min="0" max="{max}" value="{current}" data-steps="{steps}" data-labels="{step_labels}">
            <div class="range-labels">{labels}</div>
        </div>"#,
        current_label = escape_html(DEFAULT_REWRITE.label()),
        max = RewriteStrength::ALL.len() - 1,
        steps = steps.join(","),
        step_labels = escape_html(
            &RewriteStrength::ALL
                .iter()
                .map(|r| r.label())
                .collect::<Vec<_>>()
                .join(",")
        ),
    )
}

/// Render the sidebar form.
pub fn render() -> String {
    let tones = select_options(&TonePreset::ALL, DEFAULT_TONE, TonePreset::as_str, TonePreset::label);
    let langs = select_options(&Lang::ALL, DEFAULT_TARGET, Lang::as_str, Lang::label);

    format!(
        r#"<aside class="sidebar">
        <form id="settings" autocomplete="off">
            <fieldset class="field">
                <legend class="{LEGEND_CLASS}">Mode</legend>
                <div class="choices">{modes}</div>
            </fieldset>

            <div class="field">
                <label class="{LEGEND_CLASS}" for="tone">Ton</label>
                <select id="tone" name="tonePreset">{tones}</select>
            </div>

            {rewrite}

            <div class="field" id="target-lang-field" hidden>
                <label class="{LEGEND_CLASS}" for="target-lang">Langue cible</label>
                <select id="target-lang" name="targetLang">{langs}</select>
            </div>

            <label class="choice"><input type="checkbox" id="email-mode" name="emailMode"> Email (formules d&#39;usage)</label>
            <label class="choice"><input type="checkbox" id="auto-copy" name="autoCopy"> Auto-copie</label>

            <div class="field">
                <label class="{LEGEND_CLASS}" for="custom-instructions">Instructions (optionnel)</label>
                <textarea id="custom-instructions" name="customInstructions" rows="3" placeholder="Ex: Vouvoyer le destinataire, éviter le jargon..."></textarea>
            </div>

            <div class="actions">
                <button type="submit" id="submit" class="btn-primary">Corriger</button>
            </div>
        </form>
    </aside>"#,
        modes = mode_radios(),
        rewrite = rewrite_slider(),
    )
}
