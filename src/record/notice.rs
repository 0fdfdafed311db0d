use std::time::Duration;

use crate::foundation::core::Canvas;

/// Facts shown when a recording completes.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSummary {
    /// Wall time between start and stop.
    pub duration: Duration,
    /// Recording speed.
    pub speed: f64,
    /// Output resolution.
    pub resolution: Canvas,
    /// Artifact extension (`mp4`/`webm`).
    pub extension: &'static str,
    /// Artifact size.
    pub bytes: usize,
    /// Frames captured.
    pub frames: u64,
}

/// User-visible message about the recording lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Setup failed; no recording exists.
    StartFailed(String),
    /// Stopped with zero bytes of output; nothing was delivered.
    EmptyOutput,
    /// The encoder reported an error; the recording was stopped.
    EncoderError(String),
    /// The artifact could not be delivered.
    DeliveryFailed(String),
    /// The recording finished and was delivered.
    Complete(RecordingSummary),
}

impl Notice {
    /// Whether this reports a failure.
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notice::Complete(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::StartFailed(reason) => write!(f, "Failed to start recording: {reason}"),
            Notice::EmptyOutput => f.write_str(
                "Recording failed - no data captured. Please try again with different settings.",
            ),
            Notice::EncoderError(_) => f.write_str("Recording error occurred. Please try again."),
            Notice::DeliveryFailed(reason) => write!(f, "Failed to save recording: {reason}"),
            Notice::Complete(s) => {
                let secs = s.duration.as_secs();
                write!(
                    f,
                    "Recording complete!\n• Duration: {}:{:02}\n• Speed: {}x\n• Resolution: {}\n• Format: {}\n• File size: {:.2} MB",
                    secs / 60,
                    secs % 60,
                    s.speed,
                    s.resolution,
                    s.extension.to_uppercase(),
                    s.bytes as f64 / 1024.0 / 1024.0
                )
            }
        }
    }
}

/// Delivers [`Notice`]s to the user. Never blocks playback.
pub trait Notifier {
    /// Show `notice`.
    fn notify(&mut self, notice: Notice);
}

/// Emits notices as log events.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match &notice {
            Notice::EncoderError(detail) => tracing::error!(detail = %detail, "{notice}"),
            n if n.is_failure() => tracing::warn!("{notice}"),
            _ => tracing::info!("{notice}"),
        }
    }
}

/// Records notices for later inspection.
#[derive(Clone, Debug, Default)]
pub struct CollectingNotifier {
    /// Notices in arrival order.
    pub notices: Vec<Notice>,
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
