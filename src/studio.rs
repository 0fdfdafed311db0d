//! Headless host: drives a [`SessionController`] on a virtual clock.
//!
//! Each step is one display-refresh tick at [`REFRESH_HZ`] followed by a capture opportunity,
//! so animation and capture never overlap and a run is reproducible frame for frame.

use std::time::Duration;

use crate::config::AppConfig;
use crate::encode::StreamEncoder;
use crate::encode::ffmpeg::FfmpegEncoder;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::{ApproxMeasure, TextMeasure};
use crate::record::{
    ArtifactSink, CaptureOutcome, DirectorySink, LogNotifier, Notifier, StopReport,
};
use crate::render::{CpuRasterizer, FontMeasure, FontSource, FrameRGBA, ViewportRasterizer};
use crate::scroll::REFRESH_HZ;
use crate::session::SessionController;
use crate::storage::FileStore;

/// Counters for one [`Studio::record`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StudioStats {
    /// Display-refresh ticks executed.
    pub animation_ticks: u64,
    /// Frames handed to the encoder.
    pub captured: u64,
    /// Frames dropped because rasterization failed.
    pub skipped: u64,
    /// Loops from the end of the content back to the start.
    pub loops: u64,
}

/// Outcome of [`Studio::record`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordRun {
    /// Tick counters.
    pub stats: StudioStats,
    /// Virtual time the recording lasted.
    pub duration: Duration,
    /// What the recorder did on stop.
    pub report: Option<StopReport>,
    /// Whether the run hit `max_duration` rather than stopping on its own.
    pub timed_out: bool,
}

/// Session plus its collaborators, advanced one refresh tick at a time.
pub struct Studio<S: ArtifactSink, N: Notifier> {
    session: SessionController,
    rasterizer: Box<dyn ViewportRasterizer>,
    sink: S,
    notifier: N,
    ticks: u64,
}

impl Studio<DirectorySink, LogNotifier> {
    /// Build the file-backed studio described by `cfg`: content from
    /// [`AppConfig::storage_path`], recordings written under [`AppConfig::output_dir`],
    /// notices logged.
    #[tracing::instrument(skip_all)]
    pub fn from_config(cfg: &AppConfig) -> ReelResult<Self> {
        let font = cfg
            .font_path
            .as_deref()
            .map(FontSource::from_path)
            .transpose()?;

        let (measure, rasterizer): (Box<dyn TextMeasure>, CpuRasterizer) = match &font {
            Some(font) => (
                Box::new(FontMeasure::new(font)?),
                CpuRasterizer::with_font(font)?,
            ),
            None => {
                tracing::info!("no font configured; words render as bars");
                (Box::new(ApproxMeasure), CpuRasterizer::new())
            }
        };

        let session =
            SessionController::new(cfg, Box::new(FileStore::new(&cfg.storage_path)), measure)?;
        Ok(Self::new(
            session,
            Box::new(rasterizer),
            DirectorySink::new(&cfg.output_dir),
            LogNotifier,
        ))
    }
}

impl<S: ArtifactSink, N: Notifier> Studio<S, N> {
    /// Assemble a studio from parts; the clock starts at zero.
    pub fn new(
        session: SessionController,
        rasterizer: Box<dyn ViewportRasterizer>,
        sink: S,
        notifier: N,
    ) -> Self {
        Self {
            session,
            rasterizer,
            sink,
            notifier,
            ticks: 0,
        }
    }

    /// The driven session.
    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Mutable session, for input events between steps.
    pub fn session_mut(&mut self) -> &mut SessionController {
        &mut self.session
    }

    /// Artifact sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        tick_time(self.ticks)
    }

    /// One refresh tick plus a capture opportunity.
    fn step(&mut self, stats: &mut StudioStats) {
        self.ticks += 1;
        let now = self.now();
        if self.session.animation_tick(now) == crate::scroll::TickOutcome::Looped {
            stats.loops += 1;
        }
        stats.animation_ticks += 1;
        match self.session.capture_tick(
            now,
            self.rasterizer.as_mut(),
            &mut self.sink,
            &mut self.notifier,
        ) {
            CaptureOutcome::Captured => stats.captured += 1,
            CaptureOutcome::Skipped => stats.skipped += 1,
            CaptureOutcome::NotDue | CaptureOutcome::EncoderFailed => {}
        }
    }

    /// Advance the clock by at least `dt`, one refresh tick at a time.
    pub fn advance(&mut self, dt: Duration) -> StudioStats {
        let target = self.now() + dt;
        let mut stats = StudioStats::default();
        while self.now() < target {
            self.step(&mut stats);
        }
        stats
    }

    /// Record with `encoder` until the recording stops itself or `max_duration` elapses.
    #[tracing::instrument(skip(self, encoder), fields(max_s = max_duration.as_secs_f64()))]
    pub fn record(
        &mut self,
        encoder: Box<dyn StreamEncoder>,
        max_duration: Duration,
    ) -> ReelResult<RecordRun> {
        let started_at = self.now();
        if !self
            .session
            .start_recording(started_at, encoder, &mut self.notifier)
        {
            return Err(ReelError::encode("recording did not start"));
        }
        tracing::info!(
            estimated_s = self.session.estimated_duration_secs(),
            "recording"
        );

        let deadline = started_at + max_duration;
        let mut stats = StudioStats::default();
        let mut timed_out = false;
        while self.session.is_recording() {
            if self.now() >= deadline {
                timed_out = true;
                let now = self.now();
                self.session
                    .stop_recording(now, &mut self.sink, &mut self.notifier);
                self.rasterizer.release();
                break;
            }
            self.step(&mut stats);
            if stats.animation_ticks.is_multiple_of(REFRESH_HZ as u64)
                && let Some(info) = self.session.recording_info()
            {
                tracing::debug!(%info, "recording progress");
            }
        }

        Ok(RecordRun {
            stats,
            duration: self.now().saturating_sub(started_at),
            report: self.session.last_stop().cloned(),
            timed_out,
        })
    }

    /// Rasterize the current view at `surface` resolution.
    pub fn render_frame(&mut self, surface: Canvas) -> ReelResult<FrameRGBA> {
        let view = self.session.frame_view();
        let frame = self.rasterizer.rasterize(&view, surface).cloned();
        if !self.session.is_recording() {
            self.rasterizer.release();
        }
        frame
    }

    /// Stop any active recording.
    pub fn shutdown(&mut self) -> Option<StopReport> {
        let now = self.now();
        let report = self
            .session
            .shutdown(now, &mut self.sink, &mut self.notifier);
        self.rasterizer.release();
        report
    }
}

/// Encoder for a studio built from `cfg`.
pub fn ffmpeg_encoder(cfg: &AppConfig) -> FfmpegEncoder {
    FfmpegEncoder::with_program(cfg.ffmpeg.clone())
}

fn tick_time(ticks: u64) -> Duration {
    Duration::from_secs_f64(ticks as f64 / REFRESH_HZ)
}

#[cfg(test)]
#[path = "../tests/unit/studio/studio.rs"]
mod tests;
