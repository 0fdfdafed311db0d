use crate::content::detect::ContentFormat;

/// Markup tags that survive sanitization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum TagName {
    B,
    I,
    U,
    Strong,
    Em,
    P,
    Br,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Pre,
    Code,
    Ul,
    Ol,
    Li,
}

impl TagName {
    /// Resolve a lowercase element name against the preserve-set.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "b" => Self::B,
            "i" => Self::I,
            "u" => Self::U,
            "strong" => Self::Strong,
            "em" => Self::Em,
            "p" => Self::P,
            "br" => Self::Br,
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "h5" => Self::H5,
            "h6" => Self::H6,
            "pre" => Self::Pre,
            "code" => Self::Code,
            "ul" => Self::Ul,
            "ol" => Self::Ol,
            "li" => Self::Li,
            _ => return None,
        })
    }

    /// Lowercase element name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::B => "b",
            Self::I => "i",
            Self::U => "u",
            Self::Strong => "strong",
            Self::Em => "em",
            Self::P => "p",
            Self::Br => "br",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Pre => "pre",
            Self::Code => "code",
            Self::Ul => "ul",
            Self::Ol => "ol",
            Self::Li => "li",
        }
    }

    /// Heading level `1..=6`, if this is a heading.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            Self::H5 => Some(5),
            Self::H6 => Some(6),
            _ => None,
        }
    }

    /// Block-level tags start a new row when opened mid-line.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::P
                | Self::H1
                | Self::H2
                | Self::H3
                | Self::H4
                | Self::H5
                | Self::H6
                | Self::Pre
                | Self::Ul
                | Self::Ol
                | Self::Li
        )
    }
}

/// One element of a line: a tag boundary or a highlightable word.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Opening tag (attribute-free).
    Open(TagName),
    /// Closing tag.
    Close(TagName),
    /// A word token.
    Word(String),
}

/// A single display line (content between two line breaks).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Line {
    /// Ordered tags and words.
    pub segments: Vec<Segment>,
}

impl Line {
    /// Words of this line, in order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Word(w) => Some(w.as_str()),
            _ => None,
        })
    }
}

/// Normalized, immutable representation of the user's text.
///
/// A new document is built on every load; there is no partial mutation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContentDocument {
    format: ContentFormat,
    lines: Vec<Line>,
}

impl ContentDocument {
    pub(crate) fn new(format: ContentFormat, mut lines: Vec<Line>) -> Self {
        if lines.is_empty() {
            lines.push(Line::default());
        }
        Self { format, lines }
    }

    /// Format detected for the raw source.
    pub fn format(&self) -> ContentFormat {
        self.format
    }

    /// Lines in display order; never empty.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// All word tokens across lines.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flat_map(Line::words)
    }

    /// Number of word tokens.
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Project to highlight-ready markup: a `<div>` per line, each word in a
    /// `<span class="karaoke-word">`, lines joined with `<br>`.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for (li, line) in self.lines.iter().enumerate() {
            if li > 0 {
                out.push_str("<br>");
            }
            out.push_str("<div>");
            let mut prev_word = false;
            for seg in &line.segments {
                match seg {
                    Segment::Open(t) => {
                        out.push('<');
                        out.push_str(t.as_str());
                        out.push('>');
                        prev_word = false;
                    }
                    Segment::Close(t) => {
                        out.push_str("</");
                        out.push_str(t.as_str());
                        out.push('>');
                        prev_word = false;
                    }
                    Segment::Word(w) => {
                        if prev_word {
                            out.push(' ');
                        }
                        out.push_str("<span class=\"karaoke-word\">");
                        out.push_str(&escape_text(w));
                        out.push_str("</span>");
                        prev_word = true;
                    }
                }
            }
            out.push_str("</div>");
        }
        out
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}
