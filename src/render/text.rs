use std::cell::RefCell;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::{TextMeasure, WordStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Parley contexts bound to a single registered font family.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and remember its family for every later layout.
    pub(crate) fn new(font_bytes: &[u8]) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Shape a single word on one line.
    pub(crate) fn layout_word(
        &mut self,
        text: &str,
        size_px: f32,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation("text size_px must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Raw font file contents, validated once at load.
#[derive(Clone, Debug)]
pub struct FontSource {
    bytes: std::sync::Arc<Vec<u8>>,
}

impl FontSource {
    /// Wrap font bytes, checking that at least one family registers.
    pub fn from_bytes(bytes: Vec<u8>) -> ReelResult<Self> {
        TextLayoutEngine::new(&bytes)?;
        Ok(Self {
            bytes: std::sync::Arc::new(bytes),
        })
    }

    /// Read a TTF/OTF file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// [`TextMeasure`] backed by real glyph advances from a font.
pub struct FontMeasure {
    engine: RefCell<TextLayoutEngine>,
}

impl FontMeasure {
    /// Build a measurer for `font`.
    pub fn new(font: &FontSource) -> ReelResult<Self> {
        Ok(Self {
            engine: RefCell::new(TextLayoutEngine::new(font.bytes())?),
        })
    }
}

impl TextMeasure for FontMeasure {
    fn advance(&self, text: &str, font_size: f64, style: WordStyle) -> f64 {
        let shaped = self.engine.borrow_mut().layout_word(text, font_size as f32);
        match shaped {
            Ok(layout) => {
                let w = f64::from(layout.width());
                // Faux bold is drawn with a small horizontal offset.
                if style.bold { w + font_size * 0.04 } else { w }
            }
            Err(err) => {
                tracing::warn!(error = %err, "text measurement failed; using approximation");
                crate::layout::ApproxMeasure.advance(text, font_size, style)
            }
        }
    }
}
