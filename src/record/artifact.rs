use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::ReelResult;
use crate::foundation::fs::ensure_parent_dir;
use crate::record::preset::Preset;

/// A finished recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordingArtifact {
    /// Suggested file name.
    pub filename: String,
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Concatenated encoder output.
    pub bytes: Vec<u8>,
}

/// `karaoke-<preset>-<W>x<H>-<m>m<s>s.<ext>`, with whole elapsed minutes and seconds.
pub fn artifact_filename(
    preset: Preset,
    resolution: Canvas,
    elapsed: Duration,
    ext: &str,
) -> String {
    let total = elapsed.as_secs();
    format!(
        "karaoke-{}-{}-{}m{}s.{}",
        preset.slug(),
        resolution,
        total / 60,
        total % 60,
        ext
    )
}

/// Where finished recordings go.
pub trait ArtifactSink {
    /// Store or hand off `artifact`.
    fn deliver(&mut self, artifact: RecordingArtifact) -> ReelResult<()>;
}

/// Writes artifacts into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Sink writing under `dir` (created on first delivery).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, artifact: RecordingArtifact) -> ReelResult<()> {
        let path = self.dir.join(&artifact.filename);
        ensure_parent_dir(&path)?;
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("write recording '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "recording saved");
        self.written.push(path);
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryArtifactSink {
    /// Delivered artifacts, oldest first.
    pub artifacts: Vec<RecordingArtifact>,
}

impl ArtifactSink for MemoryArtifactSink {
    fn deliver(&mut self, artifact: RecordingArtifact) -> ReelResult<()> {
        self.artifacts.push(artifact);
        Ok(())
    }
}
