//! Application configuration (JSON file with defaults).

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::Align;
use crate::record::RecordConfig;
use crate::render::Theme;
use crate::scroll::{FONT_SIZE_MAX, FONT_SIZE_MIN, SPEED_MAX, SPEED_MIN};

/// Everything the host needs to build a session.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Viewport width in layout units.
    pub viewport_width: f64,
    /// Viewport height in layout units.
    pub viewport_height: f64,
    /// Base font size.
    pub font_size: u32,
    /// Line height multiple.
    pub line_height: f64,
    /// Horizontal padding.
    pub padding_x: f64,
    /// Row alignment.
    pub align: Align,
    /// Playback speed.
    pub speed: f64,
    /// Color theme.
    pub theme: Theme,
    /// TTF/OTF used for glyph rendering and measurement; word bars when unset.
    pub font_path: Option<PathBuf>,
    /// Content store file.
    pub storage_path: PathBuf,
    /// Directory recordings are written to.
    pub output_dir: PathBuf,
    /// `ffmpeg` executable.
    pub ffmpeg: String,
    /// Recording defaults.
    pub record: RecordConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport_width: 960.0,
            viewport_height: 540.0,
            font_size: 28,
            line_height: 1.5,
            padding_x: 24.0,
            align: Align::Center,
            speed: 1.0,
            theme: Theme::Dark,
            font_path: None,
            storage_path: PathBuf::from("scrollreel-store.json"),
            output_dir: PathBuf::from("recordings"),
            ffmpeg: "ffmpeg".to_string(),
            record: RecordConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields defaults.
    #[tracing::instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> ReelResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("config file not found; using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read config '{}'", path.display()))
                    .into());
            }
        };
        let cfg = Self::from_json(&text)?;
        tracing::debug!(?cfg, "config loaded");
        Ok(cfg)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> ReelResult<Self> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|e| ReelError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: &Path) -> ReelResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReelError::serde(format!("config: {e}")))?;
        crate::foundation::fs::ensure_parent_dir(path)?;
        std::fs::write(path, json).with_context(|| format!("write config '{}'", path.display()))?;
        Ok(())
    }

    /// Reject values no session can use.
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(ReelError::validation("viewport width/height must be > 0"));
        }
        if !(FONT_SIZE_MIN..=FONT_SIZE_MAX).contains(&self.font_size) {
            return Err(ReelError::validation(format!(
                "font_size must be within [{FONT_SIZE_MIN}, {FONT_SIZE_MAX}]"
            )));
        }
        if !(self.line_height > 0.0) {
            return Err(ReelError::validation("line_height must be > 0"));
        }
        if !(SPEED_MIN..=SPEED_MAX).contains(&self.speed) {
            return Err(ReelError::validation(format!(
                "speed must be within [{SPEED_MIN}, {SPEED_MAX}]"
            )));
        }
        self.record.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
