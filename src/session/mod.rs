//! Session controller: playback, presentation settings, menu chrome, input and recording
//! lockout.
//!
//! The controller is the single owner of mutable engine state. Hosts feed it input events,
//! display-refresh ticks and capture ticks on one timeline; nothing here spawns threads.

pub(crate) mod chrome;
pub(crate) mod input;

pub use chrome::{MENU_HIDE_DELAY, MenuChrome};
pub use input::Key;

use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::config::AppConfig;
use crate::content::{ContentDocument, DEFAULT_CONTENT, normalize};
use crate::encode::StreamEncoder;
use crate::foundation::error::ReelResult;
use crate::foundation::math::round_tenths;
use crate::highlight::WordHighlighter;
use crate::layout::{DocumentLayout, LayoutParams, TextMeasure, layout_document};
use crate::record::{
    AUTO_STOP_MARGIN, ArtifactSink, CaptureOutcome, Notice, Notifier, Preset, RecordConfig,
    Recorder, RecordingInfo, StopReport,
};
use crate::render::{FrameView, Theme, ViewportRasterizer};
use crate::scroll::{ScrollEngine, TickOutcome, clamp_font_size, estimated_duration_secs};
use crate::storage::ContentStore;

/// Distance moved by one arrow-key press.
pub const NUDGE_STEP: f64 = 50.0;
/// Speed change per `+`/`-` key press.
pub const SPEED_STEP: f64 = 0.1;

/// Explicit session state; one per running viewer.
pub struct SessionController {
    engine: ScrollEngine,
    highlighter: WordHighlighter,
    params: LayoutParams,
    viewport_height: f64,
    font_size: u32,
    text_scale: f64,
    theme: Theme,
    fullscreen: bool,
    chrome: MenuChrome,

    store: Box<dyn ContentStore>,
    measure: Box<dyn TextMeasure>,
    document: ContentDocument,
    revision: u64,
    layout: DocumentLayout,

    recorder: Recorder,
    record_config: RecordConfig,
    info: Option<RecordingInfo>,
    last_stop: Option<StopReport>,
    touch_y: Option<f64>,
}

impl SessionController {
    /// Build a session from configuration, loading saved content from `store`.
    #[tracing::instrument(skip_all)]
    pub fn new(
        cfg: &AppConfig,
        store: Box<dyn ContentStore>,
        measure: Box<dyn TextMeasure>,
    ) -> ReelResult<Self> {
        cfg.validate()?;
        let raw = match store.load() {
            Ok(Some(text)) => text,
            Ok(None) => DEFAULT_CONTENT.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "could not load saved content; using default");
                DEFAULT_CONTENT.to_string()
            }
        };

        let params = LayoutParams {
            viewport_width: cfg.viewport_width,
            font_size: f64::from(cfg.font_size),
            line_height: cfg.line_height,
            padding_x: cfg.padding_x,
            align: cfg.align,
        };
        let document = normalize(&raw);
        let layout = layout_document(&document, &params, measure.as_ref());

        let mut session = Self {
            engine: ScrollEngine::new(cfg.speed, cfg.viewport_height),
            highlighter: WordHighlighter::default(),
            params,
            viewport_height: cfg.viewport_height,
            font_size: cfg.font_size,
            text_scale: cfg.record.preset.text_scale(),
            theme: cfg.theme,
            fullscreen: false,
            chrome: MenuChrome::default(),
            store,
            measure,
            document,
            revision: 1,
            layout,
            recorder: Recorder::new(),
            record_config: cfg.record,
            info: None,
            last_stop: None,
            touch_y: None,
        };
        session.relayout();
        session.engine.reset_to_start();
        session.refresh_highlight();
        Ok(session)
    }

    // ---- state ----------------------------------------------------------------------------

    /// Scroll engine (position, speed, metrics).
    pub fn engine(&self) -> &ScrollEngine {
        &self.engine
    }

    /// Current document.
    pub fn document(&self) -> &ContentDocument {
        &self.document
    }

    /// Bumped every time the document is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current layout.
    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Base font size (before the preset text scale).
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Preset text scale factor.
    pub fn text_scale(&self) -> f64 {
        self.text_scale
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Fullscreen flag.
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Menu chrome state.
    pub fn chrome(&self) -> &MenuChrome {
        &self.chrome
    }

    /// Whether a recording is active.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    /// Controls are locked exactly while recording.
    pub fn controls_locked(&self) -> bool {
        self.is_recording()
    }

    /// Highlighted word indices.
    pub fn active_words(&self) -> &[usize] {
        self.highlighter.active()
    }

    /// Settings used by the next recording.
    pub fn record_config(&self) -> &RecordConfig {
        &self.record_config
    }

    /// Overlay statistics of the active recording (updated every animation tick).
    pub fn recording_info(&self) -> Option<&RecordingInfo> {
        self.info.as_ref()
    }

    /// Report of the most recent stop, including auto-stops and encoder-failure stops.
    pub fn last_stop(&self) -> Option<&StopReport> {
        self.last_stop.as_ref()
    }

    /// Estimated seconds to scroll the whole track at the recording speed.
    pub fn estimated_duration_secs(&self) -> u64 {
        estimated_duration_secs(self.engine.total_scroll_distance(), self.record_config.speed)
    }

    /// Display primitives for the current state.
    pub fn frame_view(&self) -> FrameView {
        FrameView::project(
            &self.layout,
            self.engine.position(),
            self.params.viewport_width,
            self.viewport_height,
            self.theme,
            self.highlighter.active(),
        )
    }

    // ---- playback and presentation -------------------------------------------------------

    fn locked(&self, op: &'static str) -> bool {
        let locked = self.is_recording();
        if locked {
            tracing::debug!(op, "ignored while recording");
        }
        locked
    }

    /// Toggle play/pause.
    pub fn toggle_play(&mut self) -> bool {
        if self.locked("toggle_play") {
            return false;
        }
        self.engine.set_playing(!self.engine.is_playing());
        true
    }

    /// Add `delta` to the speed (clamped).
    pub fn change_speed(&mut self, delta: f64) -> bool {
        if self.locked("change_speed") {
            return false;
        }
        self.engine.set_speed(round_tenths(self.engine.speed() + delta));
        true
    }

    /// Add `delta` to the font size (clamped) and relayout.
    pub fn change_font(&mut self, delta: i64) -> bool {
        if self.locked("change_font") {
            return false;
        }
        self.font_size = clamp_font_size(i64::from(self.font_size) + delta);
        self.relayout();
        true
    }

    /// Switch theme.
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.locked("set_theme") {
            return false;
        }
        self.theme = theme;
        true
    }

    /// Toggle fullscreen.
    pub fn toggle_fullscreen(&mut self) -> bool {
        if self.locked("toggle_fullscreen") {
            return false;
        }
        self.fullscreen = !self.fullscreen;
        true
    }

    /// Collapse or expand the menu.
    pub fn toggle_menu_collapse(&mut self, now: Duration) -> bool {
        let recording = self.is_recording();
        self.chrome.toggle_collapse(now, recording)
    }

    /// Pointer movement or touch anywhere.
    pub fn pointer_activity(&mut self, now: Duration) {
        let recording = self.is_recording();
        self.chrome.activity(now, recording);
    }

    /// Pointer entered the menu.
    pub fn pointer_enter_menu(&mut self) {
        let recording = self.is_recording();
        self.chrome.pointer_enter(recording);
    }

    /// Pointer left the menu.
    pub fn pointer_leave_menu(&mut self, now: Duration) {
        let recording = self.is_recording();
        self.chrome.pointer_leave(now, recording);
    }

    /// Jump to a fraction of the track.
    pub fn seek_fraction(&mut self, fraction: f64) -> bool {
        if self.locked("seek") {
            return false;
        }
        self.engine.seek(fraction);
        self.refresh_highlight();
        true
    }

    /// Move the track by `delta`.
    pub fn nudge(&mut self, delta: f64) -> bool {
        if self.locked("nudge") {
            return false;
        }
        self.engine.nudge(delta);
        self.refresh_highlight();
        true
    }

    /// Finger down at `y`.
    pub fn touch_start(&mut self, y: f64, now: Duration) {
        self.touch_y = Some(y);
        self.pointer_activity(now);
    }

    /// Finger moved to `y`; drags the track while paused.
    pub fn touch_move(&mut self, y: f64) -> bool {
        let Some(last) = self.touch_y else {
            return false;
        };
        if self.engine.is_playing() || self.locked("touch_move") {
            return false;
        }
        self.touch_y = Some(y);
        self.engine.nudge(y - last);
        self.refresh_highlight();
        true
    }

    /// Keyboard shortcut. Returns whether an operation was applied.
    pub fn handle_key(&mut self, key: Key, now: Duration) -> bool {
        self.pointer_activity(now);
        match key {
            Key::Space => self.toggle_play(),
            Key::ArrowUp => self.nudge(NUDGE_STEP),
            Key::ArrowDown => self.nudge(-NUDGE_STEP),
            Key::Plus => self.change_speed(SPEED_STEP),
            Key::Minus => self.change_speed(-SPEED_STEP),
            Key::F => self.toggle_fullscreen(),
            Key::Other => false,
        }
    }

    // ---- content ---------------------------------------------------------------------------

    /// Save `raw` to the store and display it from the top.
    #[tracing::instrument(skip(self, raw), fields(len = raw.len()))]
    pub fn load_text(&mut self, raw: &str) -> ReelResult<bool> {
        if self.locked("load_text") {
            return Ok(false);
        }
        self.store.save(raw)?;
        self.document = normalize(raw);
        self.revision += 1;
        self.relayout();
        self.engine.reset_to_start();
        self.highlighter.clear();
        self.refresh_highlight();
        tracing::info!(
            revision = self.revision,
            words = self.document.word_count(),
            "content loaded"
        );
        Ok(true)
    }

    /// Read a text file and load it like [`SessionController::load_text`].
    pub fn import_file(&mut self, path: &Path) -> ReelResult<bool> {
        if self.locked("import_file") {
            return Ok(false);
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read content file '{}'", path.display()))?;
        self.load_text(&raw)
    }

    /// Viewport changed size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!(width, height, "ignoring empty viewport size");
            return;
        }
        self.params.viewport_width = width;
        self.viewport_height = height;
        self.relayout();
        self.engine.reset_to_start();
        self.refresh_highlight();
    }

    /// Select a preset for the next recording.
    pub fn apply_preset(&mut self, preset: Preset) -> bool {
        if self.locked("apply_preset") {
            return false;
        }
        let keep = self.record_config;
        self.record_config = match preset {
            Preset::Custom => RecordConfig { preset, ..keep },
            _ => RecordConfig {
                prefer_mp4: keep.prefer_mp4,
                auto_stop: keep.auto_stop,
                ..RecordConfig::from_preset(preset)
            },
        };
        self.text_scale = preset.text_scale();
        self.relayout();
        true
    }

    /// Replace the next recording's settings.
    pub fn set_record_config(&mut self, cfg: RecordConfig) -> bool {
        if self.locked("set_record_config") {
            return false;
        }
        self.record_config = cfg;
        true
    }

    // ---- recording -------------------------------------------------------------------------

    /// Start recording with `encoder`. Failures are reported through `notifier`.
    pub fn start_recording(
        &mut self,
        now: Duration,
        encoder: Box<dyn StreamEncoder>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let background = self.theme.palette().background;
        let started = self.recorder.start(
            self.record_config,
            encoder,
            now,
            self.engine.position(),
            background,
        );
        if let Err(err) = started {
            tracing::warn!(error = %err, "recording did not start");
            notifier.notify(Notice::StartFailed(err.to_string()));
            return false;
        }
        self.engine.set_speed(self.record_config.speed);
        self.chrome.force_collapse();
        self.engine.set_playing(true);
        self.update_info(now);
        true
    }

    /// One display-refresh tick.
    pub fn animation_tick(&mut self, now: Duration) -> TickOutcome {
        let outcome = self.engine.tick();
        if outcome != TickOutcome::Idle {
            self.refresh_highlight();
        }
        let recording = self.is_recording();
        self.chrome.poll(now, recording);
        self.update_info(now);
        outcome
    }

    /// One capture opportunity. Stops the recording on encoder failure or, when enabled, once
    /// the content has nearly scrolled out. The rasterizer's surface is released on stop.
    pub fn capture_tick(
        &mut self,
        now: Duration,
        rasterizer: &mut dyn ViewportRasterizer,
        sink: &mut dyn ArtifactSink,
        notifier: &mut dyn Notifier,
    ) -> CaptureOutcome {
        if !self.is_recording() {
            return CaptureOutcome::NotDue;
        }
        let view = self.frame_view();
        let outcome = self.recorder.capture_tick(now, rasterizer, &view);
        match outcome {
            CaptureOutcome::EncoderFailed => {
                self.stop_recording(now, sink, notifier);
                rasterizer.release();
            }
            CaptureOutcome::Captured | CaptureOutcome::Skipped
                if self.record_config.auto_stop && self.engine.is_near_end(AUTO_STOP_MARGIN) =>
            {
                tracing::info!("content finished scrolling; stopping");
                self.stop_recording(now, sink, notifier);
                rasterizer.release();
            }
            _ => {}
        }
        outcome
    }

    /// Stop the active recording, if any.
    pub fn stop_recording(
        &mut self,
        now: Duration,
        sink: &mut dyn ArtifactSink,
        notifier: &mut dyn Notifier,
    ) -> Option<StopReport> {
        let report = self.recorder.stop(now, sink, notifier)?;
        self.info = None;
        self.last_stop = Some(report.clone());
        Some(report)
    }

    /// Host is going away: stop any active recording.
    pub fn shutdown(
        &mut self,
        now: Duration,
        sink: &mut dyn ArtifactSink,
        notifier: &mut dyn Notifier,
    ) -> Option<StopReport> {
        if !self.is_recording() {
            return None;
        }
        tracing::info!("shutting down with an active recording");
        self.stop_recording(now, sink, notifier)
    }

    // ---- internals -------------------------------------------------------------------------

    fn relayout(&mut self) {
        self.params.font_size = f64::from(self.font_size) * self.text_scale;
        self.layout = layout_document(&self.document, &self.params, self.measure.as_ref());
        self.engine
            .set_metrics(self.layout.content_height(), self.viewport_height);
        tracing::debug!(
            rows = self.layout.rows(),
            content_height = self.layout.content_height(),
            "relayout"
        );
    }

    fn refresh_highlight(&mut self) {
        self.highlighter.update(
            self.layout.words(),
            self.engine.position(),
            self.viewport_height,
        );
    }

    fn update_info(&mut self, now: Duration) {
        self.info = self.recorder.info(
            now,
            self.engine.position(),
            self.engine.total_scroll_distance(),
            self.engine.speed(),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
