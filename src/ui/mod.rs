//! Server-rendered UI.
//!
//! The page is plain HTML generated from the schema enumerations; the client
//! script in `static/proofread.js` drives it (settings persistence, the two
//! parallel API calls, tabs, copy buttons).
//!
//! # Structure
//!
//! - [`sidebar`]: settings controls
//! - [`panels`]: editor, output, banners and the changes/learning tabs

pub mod panels;
pub mod sidebar;

use axum::http::header;
use axum::response::IntoResponse;

const SCRIPT: &str = include_str!("../../static/proofread.js");
const STYLESHEET: &str = include_str!("../../static/app.css");

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Generate the HTML shell for the application.
fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Relecture et traduction assistées">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/app.css">
    <script type="module" src="/static/proofread.js"></script>
</head>
<body>
    <div id="app-shell" class="shell">
        {content}
    </div>
</body>
</html>"#,
        title = escape_html(title),
    )
}

/// Full index page.
pub fn render_index() -> String {
    let main = format!(
        r#"<main class="main">
            <h1 class="title">Proofread</h1>
            {clipboard}
            <div class="panes">
                {editor}
                {output}
            </div>
            {banners}
            {tabs}
        </main>
        <div class="sidebar-wrap">
            {sidebar}
        </div>"#,
        clipboard = panels::clipboard_callout(),
        editor = panels::editor_panel(),
        output = panels::output_panel(),
        banners = panels::banners(),
        tabs = panels::tabs(),
        sidebar = sidebar::render(),
    );
    html_shell("Proofread", &main)
}

/// GET /static/proofread.js
pub async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        SCRIPT,
    )
}

/// GET /static/app.css
pub async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}
