//! Content normalization: raw text (plain, Markdown or HTML) → [`ContentDocument`].
//!
//! Pipeline: detect format → rewrite to markup → parse and sanitize → tokenize into lines of
//! tags and word tokens.

pub(crate) mod detect;
pub(crate) mod document;
pub(crate) mod html;
pub(crate) mod markdown;
pub(crate) mod tokenize;

pub use detect::{ContentFormat, detect_format};
pub use document::{ContentDocument, Line, Segment, TagName};
pub use markdown::markdown_to_html;

/// Text shown when nothing has been saved yet.
pub const DEFAULT_CONTENT: &str = "Your scrolling text goes here...\n\nClick 'Load Text' to add your own content.\n\n✨ Features:\n• Smooth scrolling\n• Word highlighting\n• Multiple themes\n• Video recording\n• MP4 direct recording\n• Mobile friendly";

/// Format-dependent markup for a live preview, before sanitization and tokenization.
pub fn preview_html(raw: &str) -> String {
    match detect_format(raw) {
        ContentFormat::Html => raw.to_string(),
        ContentFormat::Markdown => markdown_to_html(raw),
        ContentFormat::Text => format!("<pre>{raw}</pre>"),
    }
}

/// Normalize raw user text into a [`ContentDocument`].
#[tracing::instrument(skip(raw), fields(len = raw.len()))]
pub fn normalize(raw: &str) -> ContentDocument {
    let format = detect_format(raw);
    if raw.trim().is_empty() {
        return ContentDocument::new(format, vec![Line::default()]);
    }
    let markup = preview_html(raw);

    let tree = html::parse_fragment(&markup);
    let nodes = html::find_scroll_text(&tree).unwrap_or_else(|| html::fragment_nodes(&tree));
    let nodes = html::sanitize(nodes);
    let lines = tokenize::tokenize(&nodes);

    let doc = ContentDocument::new(format, lines);
    tracing::debug!(
        format = %format,
        lines = doc.lines().len(),
        words = doc.word_count(),
        "content normalized"
    );
    doc
}

#[cfg(test)]
#[path = "../../tests/unit/content/normalize.rs"]
mod tests;
