//! Markdown → markup rewrite as an ordered rule chain.
//!
//! Order matters: fenced code is converted before the emphasis and inline-code rules so their
//! markers inside code blocks are consumed first, and longer emphasis markers run before
//! shorter ones.

use once_cell::sync::Lazy;
use regex::Regex;

/// One `(pattern, replacement)` rewrite step.
pub(crate) struct MarkdownRule {
    pub(crate) name: &'static str,
    re: Regex,
    replacement: &'static str,
}

impl MarkdownRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            re: Regex::new(pattern).expect("valid markdown rule pattern"),
            replacement,
        }
    }

    fn apply(&self, input: &str) -> String {
        self.re.replace_all(input, self.replacement).into_owned()
    }
}

pub(crate) static RULES: Lazy<Vec<MarkdownRule>> = Lazy::new(|| {
    vec![
        MarkdownRule::new("fenced_code", r"(?s)```(.*?)```", "<pre>${1}</pre>"),
        MarkdownRule::new("heading_3", r"(?m)^### (.*)$", "<h3>${1}</h3>"),
        MarkdownRule::new("heading_2", r"(?m)^## (.*)$", "<h2>${1}</h2>"),
        MarkdownRule::new("heading_1", r"(?m)^# (.*)$", "<h1>${1}</h1>"),
        MarkdownRule::new("bold_italic", r"\*\*\*(.*?)\*\*\*", "<b><i>${1}</i></b>"),
        MarkdownRule::new("bold", r"\*\*(.*?)\*\*", "<b>${1}</b>"),
        MarkdownRule::new("italic", r"\*(.*?)\*", "<i>${1}</i>"),
        MarkdownRule::new("inline_code", r"`([^`]+)`", "<code>${1}</code>"),
        MarkdownRule::new("list_item", r"(?m)^- (.*)$", "<li>${1}</li>"),
        MarkdownRule::new(
            "list_wrap",
            r"(?m)^<li>.*</li>(?:\n<li>.*</li>)*",
            "<ul>${0}</ul>",
        ),
        MarkdownRule::new("line_break", r"\n", "<br>"),
    ]
});

/// Rewrite Markdown into markup. The result is trimmed.
pub fn markdown_to_html(md: &str) -> String {
    let mut html = md.replace("\r\n", "\n");
    for rule in RULES.iter() {
        html = rule.apply(&html);
        tracing::trace!(rule = rule.name, len = html.len(), "markdown rule applied");
    }
    html.trim().to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/content/markdown.rs"]
mod tests;
