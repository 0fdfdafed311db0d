//! Word layout: turns a [`ContentDocument`] into positioned word boxes.
//!
//! Coordinates are in viewport units with `y = 0` at the top of the content track. The scroll
//! engine only needs [`DocumentLayout::content_height`]; the highlighter and the renderer use the
//! individual [`WordBox`]es.

use crate::content::{ContentDocument, Segment, TagName};
use crate::foundation::core::Rect;

/// Horizontal alignment of each row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Rows start at the left padding.
    Start,
    /// Rows are centered in the available width.
    #[default]
    Center,
}

/// Inputs that change the layout.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutParams {
    /// Viewport width in layout units.
    pub viewport_width: f64,
    /// Base font size in layout units.
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Horizontal padding on each side.
    pub padding_x: f64,
    /// Row alignment.
    pub align: Align,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            font_size: 28.0,
            line_height: 1.5,
            padding_x: 24.0,
            align: Align::Center,
        }
    }
}

/// Resolved inline style of a word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct WordStyle {
    /// Inside `b`/`strong` or a heading.
    pub bold: bool,
    /// Inside `i`/`em`.
    pub italic: bool,
    /// Inside `u`.
    pub underline: bool,
    /// Inside `code`/`pre`.
    pub monospace: bool,
    /// Innermost heading level, if any.
    pub heading: Option<u8>,
}

/// Font-size multiplier for a heading level.
pub fn heading_scale(level: Option<u8>) -> f64 {
    match level {
        Some(1) => 2.0,
        Some(2) => 1.5,
        Some(3) => 1.17,
        Some(5) => 0.83,
        Some(6) => 0.67,
        _ => 1.0,
    }
}

/// Measures word advances.
pub trait TextMeasure {
    /// Horizontal advance of `text` at `font_size`.
    fn advance(&self, text: &str, font_size: f64, style: WordStyle) -> f64;
}

/// Character-count approximation of a proportional font.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn advance(&self, text: &str, font_size: f64, style: WordStyle) -> f64 {
        let per_char = if style.monospace { 0.6 } else { 0.55 };
        let weight = if style.bold { 1.05 } else { 1.0 };
        text.chars().count() as f64 * font_size * per_char * weight
    }
}

/// One positioned word token.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WordBox {
    /// Index of the word in document order.
    pub index: usize,
    /// Index of the document line it came from.
    pub line: usize,
    /// Token text.
    pub text: String,
    /// Box in track coordinates.
    pub rect: Rect,
    /// Effective font size (heading scale applied).
    pub font_size: f64,
    /// Inline style.
    pub style: WordStyle,
}

impl WordBox {
    /// Vertical midpoint in track coordinates.
    pub fn mid_y(&self) -> f64 {
        (self.rect.y0 + self.rect.y1) * 0.5
    }
}

/// Result of laying out a document.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DocumentLayout {
    words: Vec<WordBox>,
    content_height: f64,
    rows: usize,
}

impl DocumentLayout {
    /// Positioned words in document order.
    pub fn words(&self) -> &[WordBox] {
        &self.words
    }

    /// Total rendered content height.
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Number of rows after wrapping.
    pub fn rows(&self) -> usize {
        self.rows
    }
}

#[derive(Default)]
struct StyleStack {
    bold: u32,
    italic: u32,
    underline: u32,
    monospace: u32,
    lists: u32,
    headings: Vec<u8>,
}

impl StyleStack {
    fn apply(&mut self, seg: &Segment) {
        let (tag, delta): (TagName, i32) = match seg {
            Segment::Open(t) => (*t, 1),
            Segment::Close(t) => (*t, -1),
            Segment::Word(_) => return,
        };
        let bump = |v: &mut u32| {
            *v = if delta > 0 {
                v.saturating_add(1)
            } else {
                v.saturating_sub(1)
            }
        };
        match tag {
            TagName::B | TagName::Strong => bump(&mut self.bold),
            TagName::I | TagName::Em => bump(&mut self.italic),
            TagName::U => bump(&mut self.underline),
            TagName::Code | TagName::Pre => bump(&mut self.monospace),
            TagName::Ul | TagName::Ol => bump(&mut self.lists),
            t => {
                if let Some(level) = t.heading_level() {
                    if delta > 0 {
                        self.headings.push(level);
                    } else if let Some(pos) = self.headings.iter().rposition(|&l| l == level) {
                        self.headings.remove(pos);
                    }
                }
            }
        }
    }

    fn current(&self) -> WordStyle {
        let heading = self.headings.last().copied();
        WordStyle {
            bold: self.bold > 0 || heading.is_some(),
            italic: self.italic > 0,
            underline: self.underline > 0,
            monospace: self.monospace > 0,
            heading,
        }
    }
}

struct RowBuilder<'a> {
    params: &'a LayoutParams,
    words: Vec<WordBox>,
    row: Vec<WordBox>,
    x: f64,
    y: f64,
    rows: usize,
}

impl RowBuilder<'_> {
    fn line_start(&self, lists: u32) -> f64 {
        self.params.padding_x + f64::from(lists) * self.params.font_size * 1.5
    }

    fn flush_row(&mut self) {
        let base = self.params.font_size * self.params.line_height;
        let row_h = self
            .row
            .iter()
            .map(|w| w.font_size * self.params.line_height)
            .fold(base, f64::max);

        let shift = match (self.params.align, self.row.last()) {
            (Align::Center, Some(last)) => {
                let used = last.rect.x1 - self.row[0].rect.x0;
                let avail = self.params.viewport_width - 2.0 * self.params.padding_x;
                let start = self.params.padding_x + ((avail - used) * 0.5).max(0.0);
                start - self.row[0].rect.x0
            }
            _ => 0.0,
        };

        for mut w in self.row.drain(..) {
            w.rect = Rect::new(w.rect.x0 + shift, self.y, w.rect.x1 + shift, self.y + row_h);
            self.words.push(w);
        }
        self.y += row_h;
        self.rows += 1;
    }
}

/// Lay out `doc` into word boxes.
pub fn layout_document(
    doc: &ContentDocument,
    params: &LayoutParams,
    measure: &dyn TextMeasure,
) -> DocumentLayout {
    let mut styles = StyleStack::default();
    let mut b = RowBuilder {
        params,
        words: Vec::new(),
        row: Vec::new(),
        x: params.padding_x,
        y: 0.0,
        rows: 0,
    };
    let right = params.viewport_width - params.padding_x;
    let mut index = 0usize;

    for (line_i, line) in doc.lines().iter().enumerate() {
        for seg in &line.segments {
            if let Segment::Open(tag) = seg
                && tag.is_block()
                && !b.row.is_empty()
            {
                b.flush_row();
            }
            styles.apply(seg);
            let Segment::Word(text) = seg else {
                continue;
            };

            let style = styles.current();
            let font_size = params.font_size * heading_scale(style.heading);
            let w = measure.advance(text, font_size, style);
            let gap = if b.row.is_empty() {
                0.0
            } else {
                font_size * 0.3
            };
            if !b.row.is_empty() && b.x + gap + w > right {
                b.flush_row();
            }
            let x0 = if b.row.is_empty() {
                b.line_start(styles.lists)
            } else {
                b.x + gap
            };
            b.row.push(WordBox {
                index,
                line: line_i,
                text: text.clone(),
                rect: Rect::new(x0, 0.0, x0 + w, 0.0),
                font_size,
                style,
            });
            b.x = x0 + w;
            index += 1;
        }
        b.flush_row();
    }

    DocumentLayout {
        content_height: b.y,
        rows: b.rows,
        words: b.words,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/layout.rs"]
mod tests;
