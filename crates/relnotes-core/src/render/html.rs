//! HTML rendering with escape-then-recover anchors.
//!
//! Every item is escaped as untrusted text first. Autolinked references
//! survive that pass as sentinel-delimited placeholders (see
//! [`crate::normalize`]), and a second pass rewrites exactly those
//! placeholders into real `<a>` elements. Only the placeholder's own tag
//! payloads are unescaped; the label keeps its escaped form.
//!
//! The two passes must stay in this order. Recovering before escaping would
//! let the escaper mangle generated tags, and would let author text that
//! mimics a placeholder through as live markup.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Matches an escaped placeholder: open tag payload, label, closing tag name.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x{E000}(.*?)\x{E001}(.*?)\x{E000}/(.*?)\x{E001}")
        .expect("Invalid placeholder regex")
});

/// Render normalized HTML-target items as an unordered list.
///
/// An empty item list renders as `<ul></ul>`.
pub fn render(items: &[String]) -> String {
    if items.is_empty() {
        return "<ul></ul>".to_string();
    }

    let mut out = String::from("<ul>\n");
    for item in items {
        out.push_str("<li>");
        out.push_str(&render_item(item));
        out.push_str("</li>\n");
    }
    out.push_str("</ul>");
    out
}

/// Escape one normalized item and recover its placeholder anchors.
pub fn render_item(item: &str) -> String {
    let escaped = html_escape::encode_quoted_attribute(item);
    recover_placeholders(&escaped)
}

fn recover_placeholders(escaped: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(escaped, |caps: &Captures<'_>| {
            let open = html_escape::decode_html_entities(&caps[1]);
            let close = html_escape::decode_html_entities(&caps[3]);
            format!("<{open}>{}</{close}>", &caps[2])
        })
        .into_owned()
}
