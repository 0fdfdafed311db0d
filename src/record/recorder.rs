use std::sync::mpsc;
use std::time::Duration;

use crate::encode::{Codec, EncoderConfig, EncoderEvent, StreamEncoder, negotiate_codec};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::record::artifact::{ArtifactSink, RecordingArtifact, artifact_filename};
use crate::record::config::RecordConfig;
use crate::record::notice::{Notice, Notifier, RecordingSummary};
use crate::record::schedule::CaptureSchedule;
use crate::render::{FrameView, ViewportRasterizer};

/// Distance before the loop point at which a recording stops itself.
pub const AUTO_STOP_MARGIN: f64 = 100.0;

/// Live statistics for the recording overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingInfo {
    /// Time since start.
    pub elapsed: Duration,
    /// `min(100, (initial - position) / total * 100)`.
    pub progress_percent: f64,
    /// `initial - position`, rounded.
    pub scrolled: f64,
    /// Current speed.
    pub speed: f64,
    /// Frames captured so far.
    pub frames: u64,
}

impl RecordingInfo {
    /// Elapsed time as `m:ss`.
    pub fn elapsed_label(&self) -> String {
        let secs = self.elapsed.as_secs();
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

impl std::fmt::Display for RecordingInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {:.0}% | {}px | {:.1}x | {} frames",
            self.elapsed_label(),
            self.progress_percent,
            self.scrolled,
            self.speed,
            self.frames
        )
    }
}

/// Result of one capture tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Not recording, or the tick is not due yet.
    NotDue,
    /// A frame was rasterized and handed to the encoder.
    Captured,
    /// Rasterization failed; the frame was dropped.
    Skipped,
    /// The encoder failed; the recording must be stopped.
    EncoderFailed,
}

/// What [`Recorder::stop`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct StopReport {
    /// Filename of the delivered artifact, if any.
    pub delivered: Option<String>,
    /// Frames captured.
    pub frames: u64,
    /// Encoder error that caused or accompanied the stop.
    pub encoder_error: Option<String>,
}

struct ActiveRecording {
    config: RecordConfig,
    codec: Codec,
    encoder: Box<dyn StreamEncoder>,
    events: mpsc::Receiver<EncoderEvent>,
    chunks: Vec<Vec<u8>>,
    bytes: usize,
    frames: u64,
    started_at: Duration,
    initial_position: f64,
    schedule: CaptureSchedule,
    failure: Option<String>,
}

impl ActiveRecording {
    fn drain_events(&mut self) {
        while let Ok(ev) = self.events.try_recv() {
            match ev {
                EncoderEvent::Chunk(bytes) if bytes.is_empty() => {}
                EncoderEvent::Chunk(bytes) => {
                    self.bytes += bytes.len();
                    self.chunks.push(bytes);
                }
                EncoderEvent::Error(msg) => {
                    tracing::error!(error = %msg, "encoder reported an error");
                    self.failure.get_or_insert(msg);
                }
                EncoderEvent::Finished => tracing::debug!("encoder finished"),
            }
        }
    }
}

enum RecorderState {
    Idle,
    Recording(Box<ActiveRecording>),
}

/// Recording state machine: `Idle` → `Recording` → `Idle`.
///
/// At most one recording is active. The recorder does not own a clock; callers pass `now` as
/// the offset from an arbitrary monotonic origin.
pub struct Recorder {
    state: RecorderState,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Idle recorder.
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
        }
    }

    /// Whether a recording is active.
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording(_))
    }

    /// Config of the active recording.
    pub fn config(&self) -> Option<&RecordConfig> {
        match &self.state {
            RecorderState::Recording(a) => Some(&a.config),
            RecorderState::Idle => None,
        }
    }

    /// Codec of the active recording.
    pub fn codec(&self) -> Option<Codec> {
        match &self.state {
            RecorderState::Recording(a) => Some(a.codec),
            RecorderState::Idle => None,
        }
    }

    /// Frames captured by the active recording.
    pub fn frames(&self) -> u64 {
        match &self.state {
            RecorderState::Recording(a) => a.frames,
            RecorderState::Idle => 0,
        }
    }

    /// Pending encoder failure of the active recording.
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            RecorderState::Recording(a) => a.failure.as_deref(),
            RecorderState::Idle => None,
        }
    }

    /// Validate, negotiate a codec and open `encoder`.
    ///
    /// Nothing is kept on failure; the recorder stays idle.
    #[tracing::instrument(skip_all, fields(resolution = %config.resolution, fps = %config.fps, preset = %config.preset))]
    pub fn start(
        &mut self,
        config: RecordConfig,
        mut encoder: Box<dyn StreamEncoder>,
        now: Duration,
        position: f64,
        background: Rgba8,
    ) -> ReelResult<Codec> {
        if self.is_recording() {
            return Err(ReelError::validation("a recording is already active"));
        }
        config.validate()?;

        let codec = negotiate_codec(encoder.as_ref(), config.prefer_mp4);
        let (tx, rx) = mpsc::channel();
        encoder.begin(
            EncoderConfig {
                canvas: config.resolution,
                fps: config.fps,
                bitrate: config.bitrate,
                codec,
                background,
            },
            tx,
        )?;

        tracing::info!(codec = codec.mime, "recording started");
        self.state = RecorderState::Recording(Box::new(ActiveRecording {
            config,
            codec,
            encoder,
            events: rx,
            chunks: Vec::new(),
            bytes: 0,
            frames: 0,
            started_at: now,
            initial_position: position,
            schedule: CaptureSchedule::new(config.fps.frame_period(), now),
            failure: None,
        }));
        Ok(codec)
    }

    /// Run a capture tick if one is due at `now`.
    pub fn capture_tick(
        &mut self,
        now: Duration,
        rasterizer: &mut dyn ViewportRasterizer,
        view: &FrameView,
    ) -> CaptureOutcome {
        let RecorderState::Recording(active) = &mut self.state else {
            return CaptureOutcome::NotDue;
        };
        if !active.schedule.poll(now) {
            active.drain_events();
            return if active.failure.is_some() {
                CaptureOutcome::EncoderFailed
            } else {
                CaptureOutcome::NotDue
            };
        }

        let outcome = match rasterizer.rasterize(view, active.config.resolution) {
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    frame = active.frames,
                    "frame capture failed; skipping"
                );
                CaptureOutcome::Skipped
            }
            Ok(frame) => match active.encoder.push_frame(frame) {
                Ok(()) => {
                    active.frames += 1;
                    CaptureOutcome::Captured
                }
                Err(err) => {
                    active.failure.get_or_insert(err.to_string());
                    CaptureOutcome::EncoderFailed
                }
            },
        };
        active.drain_events();
        if active.failure.is_some() {
            return CaptureOutcome::EncoderFailed;
        }
        outcome
    }

    /// Overlay statistics for the active recording.
    pub fn info(
        &self,
        now: Duration,
        position: f64,
        total_distance: f64,
        speed: f64,
    ) -> Option<RecordingInfo> {
        let RecorderState::Recording(active) = &self.state else {
            return None;
        };
        let scrolled = active.initial_position - position;
        let progress = if total_distance > 0.0 {
            (scrolled / total_distance * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Some(RecordingInfo {
            elapsed: now.saturating_sub(active.started_at),
            progress_percent: progress,
            scrolled: scrolled.round(),
            speed,
            frames: active.frames,
        })
    }

    /// Stop the active recording, finalize the encoder and deliver the artifact.
    ///
    /// An empty result delivers nothing and raises [`Notice::EmptyOutput`]. An encoder failure
    /// still delivers whatever was produced, then raises [`Notice::EncoderError`]. Returns
    /// `None` when nothing was recording.
    #[tracing::instrument(skip_all)]
    pub fn stop(
        &mut self,
        now: Duration,
        sink: &mut dyn ArtifactSink,
        notifier: &mut dyn Notifier,
    ) -> Option<StopReport> {
        let state = std::mem::replace(&mut self.state, RecorderState::Idle);
        let RecorderState::Recording(mut active) = state else {
            return None;
        };
        active.schedule.cancel();

        if let Err(err) = active.encoder.finish() {
            active.failure.get_or_insert(err.to_string());
        }
        active.drain_events();

        let ActiveRecording {
            config,
            codec,
            encoder,
            chunks,
            bytes,
            frames,
            started_at,
            failure,
            ..
        } = *active;
        drop(encoder);

        let elapsed = now.saturating_sub(started_at);
        let mut delivered = None;
        if bytes == 0 {
            tracing::warn!(frames, "recording produced no data");
            notifier.notify(Notice::EmptyOutput);
        } else {
            let filename =
                artifact_filename(config.preset, config.resolution, elapsed, codec.extension);
            let artifact = RecordingArtifact {
                filename: filename.clone(),
                mime: codec.mime,
                bytes: chunks.concat(),
            };
            match sink.deliver(artifact) {
                Ok(()) => {
                    delivered = Some(filename);
                    notifier.notify(Notice::Complete(RecordingSummary {
                        duration: elapsed,
                        speed: config.speed,
                        resolution: config.resolution,
                        extension: codec.extension,
                        bytes,
                        frames,
                    }));
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to deliver recording");
                    notifier.notify(Notice::DeliveryFailed(err.to_string()));
                }
            }
        }
        if let Some(reason) = &failure {
            notifier.notify(Notice::EncoderError(reason.clone()));
        }

        tracing::info!(frames, bytes, elapsed_s = elapsed.as_secs_f64(), "recording stopped");
        Some(StopReport {
            delivered,
            frames,
            encoder_error: failure,
        })
    }
}
