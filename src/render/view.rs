use crate::foundation::core::Rect;
use crate::layout::{DocumentLayout, WordStyle};
use crate::render::theme::{Palette, Theme};

/// A word inside the viewport, in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleWord {
    /// Document-order word index.
    pub index: usize,
    /// Token text.
    pub text: String,
    /// Box relative to the viewport's top-left corner.
    pub rect: Rect,
    /// Effective font size.
    pub font_size: f64,
    /// Inline style.
    pub style: WordStyle,
    /// Whether the word is highlighted.
    pub active: bool,
}

/// Display primitives for one frame of the viewport.
///
/// Built by [`FrameView::project`]; holds no reference to the document so it can be handed to
/// any rasterizer.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameView {
    /// Viewport width in layout units.
    pub viewport_width: f64,
    /// Viewport height in layout units.
    pub viewport_height: f64,
    /// Colors.
    pub palette: Palette,
    /// Words intersecting the viewport, in document order.
    pub words: Vec<VisibleWord>,
}

impl FrameView {
    /// Project `layout` at scroll `position` into the viewport.
    ///
    /// `active` must be sorted ascending (as produced by the highlighter).
    pub fn project(
        layout: &DocumentLayout,
        position: f64,
        viewport_width: f64,
        viewport_height: f64,
        theme: Theme,
        active: &[usize],
    ) -> Self {
        let all = layout.words();
        let start = all.partition_point(|w| w.rect.y1 + position <= 0.0);
        let words = all[start..]
            .iter()
            .take_while(|w| w.rect.y0 + position < viewport_height)
            .map(|w| VisibleWord {
                index: w.index,
                text: w.text.clone(),
                rect: Rect::new(w.rect.x0, w.rect.y0 + position, w.rect.x1, w.rect.y1 + position),
                font_size: w.font_size,
                style: w.style,
                active: active.binary_search(&w.index).is_ok(),
            })
            .collect();

        Self {
            viewport_width,
            viewport_height,
            palette: theme.palette(),
            words,
        }
    }
}
