use std::time::Duration;

use super::*;
use crate::encode::memory::{InMemoryEncoder, MemoryBehavior};
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::{FrameRGBA, FrameView, Theme, ViewportRasterizer};

struct FlatRasterizer {
    fail: bool,
    frame: Option<FrameRGBA>,
}

impl FlatRasterizer {
    fn new(fail: bool) -> Self {
        Self { fail, frame: None }
    }
}

impl ViewportRasterizer for FlatRasterizer {
    fn rasterize(&mut self, _view: &FrameView, surface: Canvas) -> ReelResult<&FrameRGBA> {
        if self.fail {
            return Err(ReelError::capture("boom"));
        }
        Ok(&*self.frame.insert(FrameRGBA {
            width: surface.width,
            height: surface.height,
            data: vec![7; surface.rgba8_len()],
            premultiplied: true,
        }))
    }
}

fn empty_view() -> FrameView {
    FrameView {
        viewport_width: 100.0,
        viewport_height: 100.0,
        palette: Theme::Dark.palette(),
        words: Vec::new(),
    }
}

fn small_config() -> RecordConfig {
    RecordConfig {
        resolution: Canvas::new(4, 4).unwrap(),
        fps: Fps::whole(10).unwrap(),
        ..RecordConfig::default()
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn schedule_fires_once_per_period_and_reanchors() {
    let mut s = CaptureSchedule::new(ms(100), ms(0));
    assert!(!s.poll(ms(50)));
    assert!(s.poll(ms(100)));
    assert!(!s.poll(ms(150)));
    assert!(s.poll(ms(200)));
    // Late by more than a period: one tick, then re-anchored.
    assert!(s.poll(ms(550)));
    assert_eq!(s.next_due(), Some(ms(650)));
    s.cancel();
    assert!(!s.poll(ms(10_000)));
    assert!(!s.is_active());
}

#[test]
fn filename_uses_slug_resolution_and_whole_time() {
    let name = artifact_filename(
        Preset::InstagramStory,
        Canvas::new(1080, 1920).unwrap(),
        Duration::from_millis(75_900),
        "mp4",
    );
    assert_eq!(name, "karaoke-instagram-story-1080x1920-1m15s.mp4");
}

#[test]
fn preset_table() {
    let p = Preset::Tiktok.spec().unwrap();
    assert_eq!(p.resolution, Canvas::new(1080, 1920).unwrap());
    assert_eq!((p.fps, p.bitrate), (30, 8_000_000));
    assert_eq!(p.text_scale, 0.9);

    let l = Preset::Linkedin.spec().unwrap();
    assert_eq!(l.resolution, Canvas::new(1920, 1080).unwrap());
    assert_eq!((l.bitrate, l.speed, l.text_scale), (5_000_000, 0.75, 1.2));

    assert_eq!(Preset::InstagramPost.spec().unwrap().resolution.height, 1920);
    assert_eq!(Preset::Twitter.text_scale(), 1.1);
    assert!(Preset::Custom.spec().is_none());
    assert_eq!(Preset::Custom.text_scale(), 1.0);
    assert_eq!(Preset::from_name("youtube-shorts"), Some(Preset::YoutubeShorts));
    assert_eq!(Preset::from_name("nope"), None);

    let cfg = RecordConfig::from_preset(Preset::Linkedin);
    assert_eq!(cfg.speed, 0.75);
    assert_eq!(cfg.preset, Preset::Linkedin);
}

#[test]
fn config_validation() {
    assert!(RecordConfig::default().validate().is_ok());
    let mut c = RecordConfig::default();
    c.bitrate = 0;
    assert!(c.validate().is_err());
    let mut c = RecordConfig::default();
    c.fps = Fps { num: 0, den: 1 };
    assert!(c.validate().is_err());
    let mut c = RecordConfig::default();
    c.speed = 0.0;
    assert!(c.validate().is_err());
    let mut c = RecordConfig::default();
    c.resolution = Canvas {
        width: 0,
        height: 10,
    };
    assert!(c.validate().is_err());
}

#[test]
fn unsupported_mp4_falls_back_to_webm_filename() {
    let mut rec = Recorder::new();
    let enc = InMemoryEncoder::new().with_supported(&["video/webm;codecs=vp9"]);
    let codec = rec
        .start(small_config(), Box::new(enc), ms(0), 500.0, Rgba8::rgb(0, 0, 0))
        .unwrap();
    assert_eq!(codec.extension, "webm");

    let mut r = FlatRasterizer::new(false);
    let view = empty_view();
    assert_eq!(rec.capture_tick(ms(50), &mut r, &view), CaptureOutcome::NotDue);
    assert_eq!(rec.capture_tick(ms(100), &mut r, &view), CaptureOutcome::Captured);
    assert_eq!(rec.capture_tick(ms(200), &mut r, &view), CaptureOutcome::Captured);
    assert_eq!(rec.frames(), 2);

    let mut sink = MemoryArtifactSink::default();
    let mut notes = CollectingNotifier::default();
    let report = rec.stop(ms(2_000), &mut sink, &mut notes).unwrap();
    assert!(!rec.is_recording());
    assert_eq!(report.frames, 2);

    let art = &sink.artifacts[0];
    assert!(art.filename.ends_with(".webm"));
    assert_eq!(art.filename, "karaoke-custom-4x4-0m2s.webm");
    assert_eq!(art.mime, "video/webm;codecs=vp9");
    assert_eq!(art.bytes.len(), 2 * 12);
    assert!(matches!(notes.notices.as_slice(), [Notice::Complete(_)]));
}

#[test]
fn empty_output_notifies_and_skips_delivery() {
    let mut rec = Recorder::new();
    let enc = InMemoryEncoder::new().with_behavior(MemoryBehavior::Silent);
    rec.start(small_config(), Box::new(enc), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
        .unwrap();
    let mut r = FlatRasterizer::new(false);
    rec.capture_tick(ms(100), &mut r, &empty_view());

    let mut sink = MemoryArtifactSink::default();
    let mut notes = CollectingNotifier::default();
    let report = rec.stop(ms(1_000), &mut sink, &mut notes).unwrap();
    assert!(report.delivered.is_none());
    assert!(sink.artifacts.is_empty());
    assert_eq!(notes.notices, vec![Notice::EmptyOutput]);
    assert_eq!(
        notes.notices[0].to_string(),
        "Recording failed - no data captured. Please try again with different settings."
    );
}

#[test]
fn capture_failure_skips_the_frame() {
    let mut rec = Recorder::new();
    rec.start(small_config(), Box::new(InMemoryEncoder::new()), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
        .unwrap();
    let mut bad = FlatRasterizer::new(true);
    assert_eq!(rec.capture_tick(ms(100), &mut bad, &empty_view()), CaptureOutcome::Skipped);
    assert_eq!(rec.frames(), 0);
    assert!(rec.is_recording());
}

#[test]
fn encoder_error_reports_after_delivery() {
    let mut rec = Recorder::new();
    let enc = InMemoryEncoder::new().with_behavior(MemoryBehavior::ErrorAtFrame(1));
    rec.start(small_config(), Box::new(enc), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
        .unwrap();
    let mut r = FlatRasterizer::new(false);
    let view = empty_view();
    assert_eq!(rec.capture_tick(ms(100), &mut r, &view), CaptureOutcome::Captured);
    assert_eq!(rec.capture_tick(ms(200), &mut r, &view), CaptureOutcome::EncoderFailed);
    assert!(rec.failure().is_some());

    let mut sink = MemoryArtifactSink::default();
    let mut notes = CollectingNotifier::default();
    let report = rec.stop(ms(300), &mut sink, &mut notes).unwrap();
    assert!(report.encoder_error.is_some());
    assert_eq!(sink.artifacts.len(), 1);
    assert!(matches!(notes.notices[0], Notice::Complete(_)));
    assert!(matches!(notes.notices[1], Notice::EncoderError(_)));
    assert_eq!(
        notes.notices[1].to_string(),
        "Recording error occurred. Please try again."
    );
}

#[test]
fn failed_start_leaves_recorder_idle() {
    let mut rec = Recorder::new();
    let enc = InMemoryEncoder::new().with_behavior(MemoryBehavior::FailBegin);
    assert!(
        rec.start(small_config(), Box::new(enc), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
            .is_err()
    );
    assert!(!rec.is_recording());

    let mut bad = small_config();
    bad.bitrate = 0;
    let err = rec
        .start(bad, Box::new(InMemoryEncoder::new()), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert!(!rec.is_recording());
}

#[test]
fn only_one_recording_at_a_time() {
    let mut rec = Recorder::new();
    rec.start(small_config(), Box::new(InMemoryEncoder::new()), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
        .unwrap();
    assert!(
        rec.start(small_config(), Box::new(InMemoryEncoder::new()), ms(0), 0.0, Rgba8::rgb(0, 0, 0))
            .is_err()
    );
    assert!(rec.is_recording());
}

#[test]
fn info_reports_progress_and_elapsed() {
    let mut rec = Recorder::new();
    assert!(rec.info(ms(0), 0.0, 1.0, 1.0).is_none());
    rec.start(small_config(), Box::new(InMemoryEncoder::new()), ms(0), 400.0, Rgba8::rgb(0, 0, 0))
        .unwrap();
    let info = rec.info(ms(65_000), 150.0, 1000.0, 1.0).unwrap();
    assert_eq!(info.elapsed_label(), "1:05");
    assert_eq!(info.progress_percent, 25.0);
    assert_eq!(info.scrolled, 250.0);
    let done = rec.info(ms(1), -5000.0, 1000.0, 1.0).unwrap();
    assert_eq!(done.progress_percent, 100.0);
}

#[test]
fn completion_notice_text() {
    let n = Notice::Complete(RecordingSummary {
        duration: Duration::from_secs(75),
        speed: 1.5,
        resolution: Canvas::new(1280, 720).unwrap(),
        extension: "mp4",
        bytes: 3 * 1024 * 1024 / 2,
        frames: 10,
    });
    let text = n.to_string();
    assert!(text.contains("Duration: 1:15"));
    assert!(text.contains("Speed: 1.5x"));
    assert!(text.contains("Resolution: 1280x720"));
    assert!(text.contains("Format: MP4"));
    assert!(text.contains("File size: 1.50 MB"));
    assert_eq!(
        Notice::StartFailed("bad".into()).to_string(),
        "Failed to start recording: bad"
    );
}
