use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::record::preset::Preset;
use crate::scroll::{SPEED_MAX, SPEED_MIN};

/// Settings for one recording.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Output resolution.
    pub resolution: Canvas,
    /// Capture and output frame rate.
    pub fps: Fps,
    /// Target bitrate in bits per second.
    pub bitrate: u32,
    /// Scroll speed applied for the duration of the recording.
    pub speed: f64,
    /// Try MP4 codecs before falling back to WebM.
    pub prefer_mp4: bool,
    /// Preset the settings came from (used in the filename).
    pub preset: Preset,
    /// Stop automatically once the content has scrolled out.
    pub auto_stop: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            resolution: Canvas {
                width: 1920,
                height: 1080,
            },
            fps: Fps { num: 30, den: 1 },
            bitrate: 5_000_000,
            speed: 1.0,
            prefer_mp4: true,
            preset: Preset::Custom,
            auto_stop: true,
        }
    }
}

impl RecordConfig {
    /// Settings bundled with `preset`; custom keeps the defaults.
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self {
            preset,
            ..Self::default()
        };
        match preset.spec() {
            Some(spec) => Self {
                resolution: spec.resolution,
                fps: Fps {
                    num: spec.fps,
                    den: 1,
                },
                bitrate: spec.bitrate,
                speed: spec.speed,
                ..base
            },
            None => base,
        }
    }

    /// Reject settings that cannot produce a recording.
    pub fn validate(&self) -> ReelResult<()> {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ReelError::validation("recording resolution must be non-zero"));
        }
        let max = u32::from(u16::MAX);
        if self.resolution.width > max || self.resolution.height > max {
            return Err(ReelError::validation(format!(
                "recording resolution {} exceeds {}x{}",
                self.resolution,
                u16::MAX,
                u16::MAX
            )));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(ReelError::validation("recording frame rate must be non-zero"));
        }
        if self.bitrate == 0 {
            return Err(ReelError::validation("recording bitrate must be non-zero"));
        }
        if !(SPEED_MIN..=SPEED_MAX).contains(&self.speed) {
            return Err(ReelError::validation(format!(
                "recording speed {} is outside [{SPEED_MIN}, {SPEED_MAX}]",
                self.speed
            )));
        }
        Ok(())
    }
}
