//! Email-mode helpers.

use std::sync::LazyLock;

use regex::Regex;

static SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A(?:subject|objet|betreff)[ \t]*:[ \t]*([^\n]+)\r?\n")
        .expect("subject pattern is valid")
});

/// Split a leading `Subject: ...` line off an email.
///
/// Returns the trimmed subject (if any) and the body with one leading blank
/// line removed.
pub fn split_subject(markdown: &str) -> (Option<String>, &str) {
    let Some(caps) = SUBJECT_RE.captures(markdown) else {
        return (None, markdown);
    };
    let (Some(whole), Some(subject)) = (caps.get(0), caps.get(1)) else {
        return (None, markdown);
    };

    let subject = subject.as_str().trim();
    if subject.is_empty() {
        return (None, markdown);
    }

    let rest = &markdown[whole.end()..];
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    (Some(subject.to_string()), body)
}
