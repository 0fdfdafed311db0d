use once_cell::sync::Lazy;
use regex::Regex;

static RE_HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?[a-z][\s\S]*>").expect("valid html cue pattern"));
static RE_MARKDOWN_CUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^#{1,3} )|(\*)|(`)").expect("valid markdown cue pattern"));

/// Source format of raw user text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    /// Markup, passed through to the sanitizer unchanged.
    Html,
    /// Markdown, rewritten by the rule chain first.
    Markdown,
    /// Anything else; wrapped whole in a preformatted block.
    Text,
}

impl ContentFormat {
    /// Lowercase name (`html`, `markdown`, `text`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify raw text. HTML cues win over Markdown cues.
pub fn detect_format(raw: &str) -> ContentFormat {
    if raw.is_empty() {
        return ContentFormat::Text;
    }
    if RE_HTML_TAG.is_match(raw) {
        return ContentFormat::Html;
    }
    if RE_MARKDOWN_CUE.is_match(raw) {
        return ContentFormat::Markdown;
    }
    ContentFormat::Text
}

#[cfg(test)]
#[path = "../../tests/unit/content/detect.rs"]
mod tests;
