//! Minimal markdown-to-HTML substitution.
//!
//! Order matters: headings, then bold spans, then paragraph breaks. The bold
//! pattern is non-greedy and has no notion of nesting, so unmatched or nested
//! `**` markers can produce unbalanced tags. That is a known limitation.

use std::sync::OnceLock;

use regex::Regex;

fn h2_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^## (.+)$").expect("valid h2 pattern"))
}

fn h3_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^### (.+)$").expect("valid h3 pattern"))
}

fn bold_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold pattern"))
}

fn empty_paragraph_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<p>\s*</p>").expect("valid paragraph pattern"))
}

pub fn markdown_to_html(text: &str) -> String {
    let html = h2_pattern().replace_all(text, "<h2>${1}</h2>");
    let html = h3_pattern().replace_all(&html, "<h3>${1}</h3>");
    let html = bold_pattern().replace_all(&html, "<strong>${1}</strong>");
    let html = html.replace("\n\n", "</p><p>");
    let html = format!("<p>{}</p>", html);
    empty_paragraph_pattern().replace_all(&html, "").into_owned()
}
