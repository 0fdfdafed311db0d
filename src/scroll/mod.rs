//! Scroll engine: playback position, speed, looping and seek.
//!
//! Position is the offset of the content track's top edge from the viewport's top edge.
//! `0` means the first row touches the top; the track starts at `+viewport_height` (just below
//! the viewport) and moves up by `speed` units per display-refresh tick.

use crate::foundation::math::clamp_f64;

/// Lowest accepted playback speed (units per tick).
pub const SPEED_MIN: f64 = 0.1;
/// Highest accepted playback speed (units per tick).
pub const SPEED_MAX: f64 = 10.0;
/// Smallest font size.
pub const FONT_SIZE_MIN: u32 = 12;
/// Largest font size.
pub const FONT_SIZE_MAX: u32 = 72;
/// Display refresh rate assumed by the duration estimate.
pub const REFRESH_HZ: f64 = 60.0;

/// Clamp a playback speed into `[SPEED_MIN, SPEED_MAX]`.
pub fn clamp_speed(speed: f64) -> f64 {
    clamp_f64(speed, SPEED_MIN, SPEED_MAX)
}

/// Clamp a font size into `[FONT_SIZE_MIN, FONT_SIZE_MAX]`.
pub fn clamp_font_size(size: i64) -> u32 {
    size.clamp(i64::from(FONT_SIZE_MIN), i64::from(FONT_SIZE_MAX)) as u32
}

/// What a single [`ScrollEngine::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused; position unchanged.
    Idle,
    /// Position moved by `speed`.
    Advanced,
    /// Position passed the end of the content and wrapped to the bottom of the viewport.
    Looped,
}

/// Playback state plus the per-tick advancement rule.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollEngine {
    position: f64,
    speed: f64,
    playing: bool,
    content_height: f64,
    viewport_height: f64,
}

impl ScrollEngine {
    /// Create an engine positioned just below the viewport, playing.
    pub fn new(speed: f64, viewport_height: f64) -> Self {
        let viewport_height = viewport_height.max(0.0);
        Self {
            position: viewport_height,
            speed: clamp_speed(speed),
            playing: true,
            content_height: 0.0,
            viewport_height,
        }
    }

    /// Current position.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether ticks advance the position.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Rendered content height.
    pub fn content_height(&self) -> f64 {
        self.content_height
    }

    /// Viewport height.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// `content_height + viewport_height`.
    pub fn total_scroll_distance(&self) -> f64 {
        self.content_height + self.viewport_height
    }

    /// Set playing/paused.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Set the speed, clamped. Returns the applied value.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        self.speed = clamp_speed(speed);
        self.speed
    }

    /// Update content and viewport heights after a relayout or resize.
    pub fn set_metrics(&mut self, content_height: f64, viewport_height: f64) {
        self.content_height = content_height.max(0.0);
        self.viewport_height = viewport_height.max(0.0);
    }

    /// Move the track back to its start (just below the viewport).
    pub fn reset_to_start(&mut self) {
        self.position = self.viewport_height;
    }

    /// Advance one display-refresh tick.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.playing {
            return TickOutcome::Idle;
        }
        self.position -= self.speed;
        if self.position < -self.content_height {
            self.position = self.viewport_height;
            return TickOutcome::Looped;
        }
        TickOutcome::Advanced
    }

    /// Jump to fraction `f` of the total scroll distance (`f` clamped to `[0, 1]`).
    pub fn seek(&mut self, fraction: f64) {
        let f = clamp_f64(fraction, 0.0, 1.0);
        self.position = -(f * self.total_scroll_distance());
    }

    /// Move by `delta` (positive moves content down), clamped to the track bounds.
    pub fn nudge(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.position =
            (self.position + delta).clamp(-self.total_scroll_distance(), self.viewport_height);
    }

    /// Fraction of the total distance scrolled past the top, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.total_scroll_distance();
        if total <= 0.0 {
            return 0.0;
        }
        clamp_f64(-self.position / total, 0.0, 1.0)
    }

    /// Whether the content has nearly scrolled out (within `margin` of the loop point).
    pub fn is_near_end(&self, margin: f64) -> bool {
        self.position < -self.content_height + margin
    }
}

/// Whole seconds needed to scroll `distance` at `speed` units per tick, at [`REFRESH_HZ`].
pub fn estimated_duration_secs(distance: f64, speed: f64) -> u64 {
    let per_sec = speed.abs() * REFRESH_HZ;
    if per_sec <= 0.0 || !distance.is_finite() {
        return 0;
    }
    (distance.max(0.0) / per_sec).round() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/engine.rs"]
mod tests;
