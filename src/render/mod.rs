//! Viewport rendering: a pure projection to [`FrameView`] and a rasterizer capability.

pub(crate) mod cpu;
pub(crate) mod text;
pub(crate) mod theme;
pub(crate) mod view;

pub use cpu::CpuRasterizer;
pub use text::{FontMeasure, FontSource};
pub use theme::{Palette, Theme};
pub use view::{FrameView, VisibleWord};

use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Draws a [`FrameView`] onto a raster surface.
///
/// The view's viewport is scaled (non-uniformly) to fill `surface`; the background is filled
/// before anything else is drawn. The returned frame borrows the rasterizer's surface, which may
/// be reused by the next call.
pub trait ViewportRasterizer {
    /// Rasterize one frame.
    fn rasterize(&mut self, view: &FrameView, surface: Canvas) -> ReelResult<&FrameRGBA>;

    /// Drop any surface kept between frames.
    fn release(&mut self) {}
}
