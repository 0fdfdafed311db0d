use std::collections::HashMap;

use crate::foundation::core::{Affine, Canvas, Rect, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::text::{FontSource, TextBrushRgba8, TextLayoutEngine};
use crate::render::view::{FrameView, VisibleWord};
use crate::render::{FrameRGBA, ViewportRasterizer};

const LAYOUT_CACHE_LIMIT: usize = 4096;

struct GlyphText {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    layouts: HashMap<(String, u32), parley::Layout<TextBrushRgba8>>,
}

/// Render context and output frame for one surface size, reused until the size changes.
struct Surface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    frame: FrameRGBA,
}

impl Surface {
    fn new(canvas: Canvas, width: u16, height: u16) -> Self {
        Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(width, height),
            frame: FrameRGBA {
                width: canvas.width,
                height: canvas.height,
                data: vec![0; canvas.rgba8_len()],
                premultiplied: true,
            },
        }
    }
}

/// CPU rasterizer powered by `vello_cpu`.
///
/// With a font, words are shaped with Parley and drawn as glyph runs. Without one, each word is
/// drawn as a solid bar the size of its box; that keeps frames deterministic and is enough for
/// previews and tests.
///
/// The surface is allocated on the first frame at a given size and kept until
/// [`ViewportRasterizer::release`] or a size change.
pub struct CpuRasterizer {
    text: Option<GlyphText>,
    surface: Option<Surface>,
}

impl Default for CpuRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuRasterizer {
    /// Rasterizer without a font (word bars).
    pub fn new() -> Self {
        Self {
            text: None,
            surface: None,
        }
    }

    /// Rasterizer that draws real glyphs from `font`.
    pub fn with_font(font: &FontSource) -> ReelResult<Self> {
        let engine = TextLayoutEngine::new(font.bytes())?;
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
            0,
        );
        Ok(Self {
            text: Some(GlyphText {
                engine,
                font: data,
                layouts: HashMap::new(),
            }),
            surface: None,
        })
    }

    /// Whether glyphs (rather than bars) are drawn.
    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }

    /// Size of the surface currently held, if any.
    pub fn surface_size(&self) -> Option<Canvas> {
        self.surface.as_ref().map(|s| s.canvas)
    }
}

impl ViewportRasterizer for CpuRasterizer {
    fn rasterize(&mut self, view: &FrameView, surface: Canvas) -> ReelResult<&FrameRGBA> {
        let width_u16: u16 = surface
            .width
            .try_into()
            .map_err(|_| ReelError::capture("surface width exceeds u16"))?;
        let height_u16: u16 = surface
            .height
            .try_into()
            .map_err(|_| ReelError::capture("surface height exceeds u16"))?;
        if !(view.viewport_width > 0.0 && view.viewport_height > 0.0) {
            return Err(ReelError::capture("viewport has no area"));
        }

        let scale = Affine::scale_non_uniform(
            f64::from(surface.width) / view.viewport_width,
            f64::from(surface.height) / view.viewport_height,
        );
        let palette = view.palette;

        let target = match self.surface.take() {
            Some(mut kept) if kept.canvas == surface => {
                kept.ctx.reset();
                kept
            }
            _ => {
                tracing::debug!(%surface, "allocating raster surface");
                Surface::new(surface, width_u16, height_u16)
            }
        };
        let Surface { ctx, frame: out, .. } = self.surface.insert(target);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(palette.background));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(surface.width),
            f64::from(surface.height),
        ));

        for word in &view.words {
            ctx.set_transform(affine_to_cpu(scale));
            if word.active {
                ctx.set_paint(color_to_cpu(palette.highlight_bg));
                ctx.fill_rect(&rect_to_cpu(word.rect.inflate(word.font_size * 0.15, 0.0)));
            }
            let color = if word.active {
                palette.highlight
            } else {
                palette.text
            };

            match self.text.as_mut() {
                Some(text) => draw_glyph_word(ctx, text, word, scale, color)?,
                None => {
                    ctx.set_paint(color_to_cpu(color));
                    ctx.fill_rect(&rect_to_cpu(bar_rect(word)));
                }
            }

            if word.style.underline {
                let y = word.rect.center().y + word.font_size * 0.45;
                ctx.set_transform(affine_to_cpu(scale));
                ctx.set_paint(color_to_cpu(color));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    word.rect.x0,
                    y,
                    word.rect.x1,
                    y + (word.font_size * 0.06).max(1.0),
                ));
            }
        }

        ctx.flush();
        let mode = ctx.render_settings().render_mode;
        ctx.render_to_buffer(&mut out.data, width_u16, height_u16, mode);
        Ok(&*out)
    }

    fn release(&mut self) {
        if let Some(surface) = self.surface.take() {
            tracing::debug!(surface = %surface.canvas, "raster surface released");
        }
    }
}

fn draw_glyph_word(
    ctx: &mut vello_cpu::RenderContext,
    text: &mut GlyphText,
    word: &VisibleWord,
    scale: Affine,
    color: Rgba8,
) -> ReelResult<()> {
    let size_px = word.font_size as f32;
    let key = (word.text.clone(), size_px.to_bits());
    if !text.layouts.contains_key(&key) {
        if text.layouts.len() >= LAYOUT_CACHE_LIMIT {
            text.layouts.clear();
        }
        let layout = text.engine.layout_word(&word.text, size_px)?;
        text.layouts.insert(key.clone(), layout);
    }
    let Some(layout) = text.layouts.get(&key) else {
        return Ok(());
    };

    let top = word.rect.y0 + (word.rect.height() - f64::from(layout.height())) * 0.5;
    let mut transform = scale * Affine::translate((word.rect.x0, top));
    if word.style.italic {
        transform *= Affine::skew(-0.2, 0.0);
    }
    let passes: &[f64] = if word.style.bold {
        &[0.0, word.font_size * 0.04]
    } else {
        &[0.0]
    };

    ctx.set_paint(color_to_cpu(color));
    for dx in passes {
        ctx.set_transform(affine_to_cpu(transform * Affine::translate((*dx, 0.0))));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&text.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
    Ok(())
}

/// Solid stand-in for a word when no font is loaded.
fn bar_rect(word: &VisibleWord) -> Rect {
    let mid = word.rect.center().y;
    let half = word.font_size * 0.3;
    Rect::new(word.rect.x0, mid - half, word.rect.x1, mid + half)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
