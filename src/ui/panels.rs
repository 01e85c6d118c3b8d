//! Editor, output, banners and result tabs.

use crate::schema::INPUT_MAX_CHARS;

/// Group digits with thin spaces, as the French locale displays them.
fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(ch);
    }
    out
}

/// Offer to correct freshly copied text.
pub fn clipboard_callout() -> &'static str {
    r#"<div id="clipboard-callout" class="callout" hidden>
                <div class="callout-body">
                    <p class="callout-title">Presse-papier</p>
                    <p id="clipboard-text" class="callout-text"></p>
                </div>
                <div class="callout-actions">
                    <button type="button" id="clipboard-correct" class="btn-primary btn-small">Corriger</button>
                    <button type="button" id="clipboard-dismiss" class="btn-icon" aria-label="Fermer">&times;</button>
                </div>
            </div>"#
}

/// Input textarea with its character counter.
pub fn editor_panel() -> String {
    format!(
        r#"<section class="pane">
                <div class="pane-header">
                    <label class="field-label" for="input-text">Texte à relire / traduire</label>
                    <span id="char-count" class="counter" data-max="{INPUT_MAX_CHARS}">0 / {max}</span>
                </div>
                <textarea id="input-text" class="editor" placeholder="Collez votre texte ici..."></textarea>
                <p id="over-limit" class="notice" hidden>Texte long, la réponse pourrait être plus lente</p>
            </section>"#,
        max = format_count(INPUT_MAX_CHARS),
    )
}

/// Output pane: empty, loading and result states.
pub fn output_panel() -> &'static str {
    r#"<section class="pane">
                <div class="pane-header">
                    <span class="field-label">Résultat (Markdown)</span>
                </div>
                <div id="output-empty" class="output output-empty">Le résultat apparaîtra ici</div>
                <div id="output-loading" class="output output-loading" hidden><span class="spinner"></span> Correction en cours...</div>
                <div id="output-result" hidden>
                    <div id="subject-row" class="subject" hidden>
                        <span class="subject-label">Objet</span>
                        <span id="subject-text" class="subject-text"></span>
                        <button type="button" id="copy-subject" class="btn-link">Copier</button>
                    </div>
                    <div class="output output-filled">
                        <button type="button" id="copy-body" class="btn-link copy-body">Copier</button>
                        <pre id="output-body"></pre>
                    </div>
                    <p id="output-explanation" class="explanation" hidden></p>
                </div>
            </section>"#
}

/// Error and parse-warning banners.
pub fn banners() -> &'static str {
    r#"<div id="error-banner" class="banner banner-error" role="alert" hidden></div>
            <div id="warning-banner" class="banner banner-warning" role="status" hidden></div>"#
}

/// Changes / Learning tab bar and panels.
pub fn tabs() -> &'static str {
    r#"<section class="tabs">
                <div class="tab-bar" role="tablist">
                    <button type="button" class="tab active" role="tab" data-tab="changes">Changements<span id="changes-count"></span></button>
                    <button type="button" class="tab" role="tab" data-tab="learning">Apprentissage<span id="learning-count"></span></button>
                    <span id="explain-spinner" class="tab-status" hidden><span class="spinner spinner-small"></span> Analyse en cours...</span>
                    <span id="latency" class="tab-status" hidden></span>
                </div>
                <div id="panel-changes" class="tab-panel" role="tabpanel">
                    <div class="empty">Aucun changement à afficher</div>
                </div>
                <div id="panel-learning" class="tab-panel" role="tabpanel" hidden>
                    <div class="empty">Aucun point d&#39;apprentissage</div>
                </div>
            </section>"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(12_000), "12\u{202f}000");
        assert_eq!(format_count(1_234_567), "1\u{202f}234\u{202f}567");
    }

    #[test]
    fn test_editor_exposes_limit() {
        let html = editor_panel();
        assert!(html.contains(r#"data-max="12000""#));
    }
}
