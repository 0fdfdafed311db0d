//! Capture/record pipeline: presets, recording configuration, the recorder state machine and
//! artifact delivery.

pub(crate) mod artifact;
pub(crate) mod config;
pub(crate) mod notice;
pub(crate) mod preset;
pub(crate) mod recorder;
pub(crate) mod schedule;

pub use artifact::{
    ArtifactSink, DirectorySink, MemoryArtifactSink, RecordingArtifact, artifact_filename,
};
pub use config::RecordConfig;
pub use notice::{CollectingNotifier, LogNotifier, Notice, Notifier, RecordingSummary};
pub use preset::{Preset, PresetSpec};
pub use recorder::{AUTO_STOP_MARGIN, CaptureOutcome, Recorder, RecordingInfo, StopReport};
pub use schedule::CaptureSchedule;

#[cfg(test)]
#[path = "../../tests/unit/record/recorder.rs"]
mod tests;
