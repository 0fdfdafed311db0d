use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::encode::memory::{InMemoryEncoder, MemoryBehavior};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::ReelError;
use crate::layout::ApproxMeasure;
use crate::record::{CollectingNotifier, MemoryArtifactSink};
use crate::render::CpuRasterizer;
use crate::storage::{FileStore, MemoryStore};

#[derive(Clone, Default)]
struct SharedStore(Arc<Mutex<Option<String>>>);

impl ContentStore for SharedStore {
    fn load(&self) -> ReelResult<Option<String>> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save(&mut self, text: &str) -> ReelResult<()> {
        *self.0.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

struct BrokenStore;

impl ContentStore for BrokenStore {
    fn load(&self) -> ReelResult<Option<String>> {
        Err(ReelError::storage("disk on fire"))
    }

    fn save(&mut self, _text: &str) -> ReelResult<()> {
        Err(ReelError::storage("disk on fire"))
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn test_config() -> AppConfig {
    AppConfig {
        viewport_width: 400.0,
        viewport_height: 200.0,
        record: RecordConfig {
            resolution: Canvas::new(4, 4).unwrap(),
            fps: Fps::whole(10).unwrap(),
            ..RecordConfig::default()
        },
        ..AppConfig::default()
    }
}

fn session_with(text: &str) -> SessionController {
    SessionController::new(
        &test_config(),
        Box::new(MemoryStore::with_text(text)),
        Box::new(ApproxMeasure),
    )
    .unwrap()
}

fn start(session: &mut SessionController, encoder: InMemoryEncoder) -> bool {
    let mut notifier = CollectingNotifier::default();
    session.start_recording(ms(0), Box::new(encoder), &mut notifier)
}

#[test]
fn new_session_starts_below_viewport_and_playing() {
    let s = session_with("one two three");
    assert_eq!(s.engine().position(), 200.0);
    assert!(s.engine().is_playing());
    assert_eq!(s.revision(), 1);
    assert_eq!(s.document().word_count(), 3);
    assert!(s.engine().content_height() > 0.0);
    assert!(!s.controls_locked());
}

#[test]
fn empty_or_unreadable_store_falls_back_to_default_text() {
    let expected = crate::content::normalize(DEFAULT_CONTENT).word_count();

    let s = SessionController::new(
        &test_config(),
        Box::new(MemoryStore::default()),
        Box::new(ApproxMeasure),
    )
    .unwrap();
    assert_eq!(s.document().word_count(), expected);

    let s =
        SessionController::new(&test_config(), Box::new(BrokenStore), Box::new(ApproxMeasure))
            .unwrap();
    assert_eq!(s.document().word_count(), expected);
}

#[test]
fn load_text_replaces_a_corrupt_store_file() {
    let dir = std::path::PathBuf::from("target").join("session-tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("corrupt-store.json");
    std::fs::write(&path, "{not json").unwrap();

    let mut s = SessionController::new(
        &test_config(),
        Box::new(FileStore::new(&path)),
        Box::new(ApproxMeasure),
    )
    .unwrap();
    assert_eq!(s.document().word_count(), normalize(DEFAULT_CONTENT).word_count());

    assert!(s.load_text("new lyrics here").unwrap());
    assert_eq!(s.document().word_count(), 3);
    assert_eq!(
        FileStore::new(&path).load().unwrap().as_deref(),
        Some("new lyrics here")
    );
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = AppConfig {
        font_size: 4,
        ..test_config()
    };
    let store = Box::new(MemoryStore::default());
    let err = SessionController::new(&cfg, store, Box::new(ApproxMeasure))
        .err()
        .unwrap();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn speed_and_font_changes_are_clamped() {
    let mut s = session_with("one two three");
    assert!(s.change_speed(0.1));
    assert_eq!(s.engine().speed(), 1.1);
    for _ in 0..200 {
        s.change_speed(0.1);
    }
    assert_eq!(s.engine().speed(), 10.0);
    s.change_speed(-50.0);
    assert_eq!(s.engine().speed(), 0.1);

    let before = s.engine().content_height();
    assert!(s.change_font(20));
    assert_eq!(s.font_size(), 48);
    assert!(s.engine().content_height() > before);
    s.change_font(1000);
    assert_eq!(s.font_size(), 72);
    s.change_font(-1000);
    assert_eq!(s.font_size(), 12);
}

#[test]
fn controls_are_locked_while_recording() {
    let mut s = session_with("one two three");
    s.change_speed(0.5);
    assert!(start(&mut s, InMemoryEncoder::new()));
    assert!(s.controls_locked());
    assert!(s.chrome().is_collapsed());
    assert!(s.engine().is_playing());
    assert_eq!(s.engine().speed(), 1.0);

    let speed = s.engine().speed();
    let font = s.font_size();
    let theme = s.theme();
    let position = s.engine().position();
    assert!(!s.toggle_play());
    assert!(!s.change_speed(1.0));
    assert!(!s.change_font(4));
    assert!(!s.set_theme(Theme::Light));
    assert!(!s.toggle_fullscreen());
    assert!(!s.toggle_menu_collapse(ms(10)));
    assert!(!s.seek_fraction(0.5));
    assert!(!s.nudge(-30.0));
    assert!(!s.apply_preset(Preset::Linkedin));
    assert!(!s.load_text("replaced").unwrap());
    assert!(!s.handle_key(Key::Space, ms(10)));

    assert_eq!(s.engine().speed(), speed);
    assert_eq!(s.font_size(), font);
    assert_eq!(s.theme(), theme);
    assert_eq!(s.engine().position(), position);
    assert!(s.engine().is_playing());
    assert_eq!(s.document().word_count(), 3);

    let mut sink = MemoryArtifactSink::default();
    let mut notifier = CollectingNotifier::default();
    s.stop_recording(ms(100), &mut sink, &mut notifier);
    assert!(!s.controls_locked());
    assert!(s.set_theme(Theme::Light));
    assert_eq!(s.theme(), Theme::Light);
}

#[test]
fn menu_hides_after_idle_window() {
    let mut s = session_with("one two three");
    s.pointer_activity(ms(0));
    assert_eq!(s.chrome().hide_deadline(), Some(MENU_HIDE_DELAY));

    s.animation_tick(ms(2_900));
    assert!(s.chrome().is_visible());
    s.pointer_activity(ms(2_900));
    s.animation_tick(ms(3_000));
    assert!(s.chrome().is_visible());

    s.animation_tick(ms(5_900));
    assert!(s.chrome().is_auto_hidden());

    s.pointer_activity(ms(6_000));
    assert!(s.chrome().is_visible());
}

#[test]
fn hovering_the_menu_cancels_auto_hide() {
    let mut s = session_with("one two three");
    s.pointer_activity(ms(0));
    s.pointer_enter_menu();
    s.animation_tick(ms(10_000));
    assert!(s.chrome().is_visible());

    s.pointer_leave_menu(ms(10_000));
    s.animation_tick(ms(13_000));
    assert!(s.chrome().is_auto_hidden());
}

#[test]
fn collapsed_menu_never_auto_hides() {
    let mut s = session_with("one two three");
    assert!(s.toggle_menu_collapse(ms(0)));
    assert!(s.chrome().is_collapsed());
    s.pointer_activity(ms(0));
    assert_eq!(s.chrome().hide_deadline(), None);
    s.animation_tick(ms(10_000));
    assert!(!s.chrome().is_auto_hidden());
}

#[test]
fn keys_map_to_operations() {
    let mut s = session_with("one two three");
    assert!(s.handle_key(Key::from_name(" "), ms(0)));
    assert!(!s.engine().is_playing());

    s.handle_key(Key::ArrowDown, ms(0));
    assert_eq!(s.engine().position(), 150.0);
    s.handle_key(Key::ArrowUp, ms(0));
    assert_eq!(s.engine().position(), 200.0);
    s.handle_key(Key::ArrowUp, ms(0));
    assert_eq!(s.engine().position(), 200.0);

    s.handle_key(Key::from_name("+"), ms(0));
    assert_eq!(s.engine().speed(), 1.1);
    s.handle_key(Key::from_name("-"), ms(0));
    assert_eq!(s.engine().speed(), 1.0);

    s.handle_key(Key::from_name("f"), ms(0));
    assert!(s.is_fullscreen());
    assert!(!s.handle_key(Key::from_name("q"), ms(0)));
    assert_eq!(s.chrome().hide_deadline(), Some(MENU_HIDE_DELAY));
}

#[test]
fn touch_drag_only_moves_while_paused() {
    let mut s = session_with("one two three");
    s.touch_start(100.0, ms(0));
    assert!(!s.touch_move(80.0));
    assert_eq!(s.engine().position(), 200.0);

    s.toggle_play();
    s.touch_start(100.0, ms(0));
    assert!(s.touch_move(80.0));
    assert_eq!(s.engine().position(), 180.0);
    assert!(s.touch_move(60.0));
    assert_eq!(s.engine().position(), 160.0);
}

#[test]
fn load_text_persists_and_restarts() {
    let store = SharedStore::default();
    let mut s = SessionController::new(
        &test_config(),
        Box::new(store.clone()),
        Box::new(ApproxMeasure),
    )
    .unwrap();
    for _ in 0..30 {
        s.animation_tick(ms(0));
    }
    assert_eq!(s.engine().position(), 170.0);

    assert!(s.load_text("# Title\n\nsome **bold** words").unwrap());
    assert_eq!(s.revision(), 2);
    assert_eq!(s.engine().position(), 200.0);
    assert_eq!(s.document().word_count(), 4);
    assert_eq!(
        store.0.lock().unwrap().as_deref(),
        Some("# Title\n\nsome **bold** words")
    );
}

#[test]
fn load_text_surfaces_store_errors() {
    let mut s =
        SessionController::new(&test_config(), Box::new(BrokenStore), Box::new(ApproxMeasure))
            .unwrap();
    let err = s.load_text("hello").unwrap_err();
    assert!(matches!(err, ReelError::Storage(_)));
    assert_eq!(s.revision(), 1);
}

#[test]
fn import_file_reads_text() {
    let dir = std::path::Path::new("target/session-tests");
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join("import.txt");
    std::fs::write(&path, "alpha beta").unwrap();

    let mut s = session_with("one");
    assert!(s.import_file(&path).unwrap());
    assert_eq!(s.document().words().collect::<Vec<_>>(), vec!["alpha", "beta"]);

    assert!(s.import_file(&dir.join("missing.txt")).is_err());
}

#[test]
fn resize_relayouts_and_resets_position() {
    let mut s = session_with("one two three four five six seven eight nine ten");
    let rows = s.layout().rows();
    s.nudge(-40.0);
    s.resize(120.0, 300.0);
    assert!(s.layout().rows() > rows);
    assert_eq!(s.engine().position(), 300.0);
    assert_eq!(s.engine().viewport_height(), 300.0);

    s.resize(0.0, 100.0);
    assert_eq!(s.engine().viewport_height(), 300.0);
}

#[test]
fn presets_update_pending_recording_and_text_scale() {
    let mut s = session_with("one two three");
    let base = s.layout().words()[0].font_size;
    s.set_record_config(RecordConfig {
        prefer_mp4: false,
        ..*s.record_config()
    });

    assert!(s.apply_preset(Preset::Linkedin));
    let cfg = s.record_config();
    assert_eq!(cfg.resolution, Canvas::new(1920, 1080).unwrap());
    assert_eq!(cfg.speed, 0.75);
    assert!(!cfg.prefer_mp4);
    assert_eq!(s.text_scale(), 1.2);
    assert!((s.layout().words()[0].font_size - base * 1.2).abs() < 1e-9);

    assert!(s.apply_preset(Preset::Custom));
    assert_eq!(s.record_config().resolution, Canvas::new(1920, 1080).unwrap());
    assert_eq!(s.text_scale(), 1.0);
}

#[test]
fn seek_updates_highlight() {
    let mut s = session_with("one two three");
    assert!(s.active_words().is_empty());
    // Row 0 spans [0, 42); its centre sits on the midpoint at position 79.
    s.toggle_play();
    s.nudge(79.0 - 200.0);
    assert_eq!(s.active_words(), &[0, 1, 2]);
    s.seek_fraction(1.0);
    assert!(s.active_words().is_empty());
}

#[test]
fn duration_estimate_uses_recording_speed() {
    let s = session_with("one two three");
    let total = s.engine().total_scroll_distance();
    assert_eq!(s.estimated_duration_secs(), (total / 60.0).round() as u64);
}

#[test]
fn recording_auto_stops_and_delivers() {
    let mut s = session_with("one two three");
    let mut raster = CpuRasterizer::new();
    let mut sink = MemoryArtifactSink::default();
    let mut notifier = CollectingNotifier::default();

    assert!(s.start_recording(ms(0), Box::new(InMemoryEncoder::new()), &mut notifier));
    let mut captured = 0;
    for i in 1..=600u64 {
        let now = Duration::from_secs_f64(i as f64 / 60.0);
        s.animation_tick(now);
        if i == 60 {
            let info = s.recording_info().unwrap();
            assert_eq!(info.elapsed_label(), "0:01");
            assert_eq!(info.scrolled, 60.0);
        }
        if s.capture_tick(now, &mut raster, &mut sink, &mut notifier) == CaptureOutcome::Captured {
            captured += 1;
        }
        if !s.is_recording() {
            break;
        }
    }

    assert!(!s.is_recording());
    assert!(s.recording_info().is_none());
    assert!(s.engine().position() < -s.engine().content_height() + AUTO_STOP_MARGIN);
    assert!(captured > 10);
    assert_eq!(sink.artifacts.len(), 1);
    let artifact = &sink.artifacts[0];
    assert!(artifact.filename.starts_with("karaoke-custom-4x4-0m2s"));
    assert!(artifact.filename.ends_with(".mp4"));
    assert_eq!(artifact.bytes.len(), captured * 12);
    assert!(matches!(notifier.notices.as_slice(), [Notice::Complete(_)]));
    let report = s.last_stop().unwrap();
    assert_eq!(report.delivered.as_deref(), Some(artifact.filename.as_str()));
    assert_eq!(report.frames, captured as u64);
}

#[test]
fn encoder_failure_stops_the_recording() {
    let mut s = session_with("one two three");
    let mut raster = CpuRasterizer::new();
    let mut sink = MemoryArtifactSink::default();
    let mut notifier = CollectingNotifier::default();

    let encoder = InMemoryEncoder::new().with_behavior(MemoryBehavior::ErrorAtFrame(0));
    assert!(s.start_recording(ms(0), Box::new(encoder), &mut notifier));
    let outcome = s.capture_tick(ms(100), &mut raster, &mut sink, &mut notifier);
    assert_eq!(outcome, CaptureOutcome::EncoderFailed);
    assert!(!s.is_recording());
    assert!(sink.artifacts.is_empty());
    assert!(matches!(
        notifier.notices.as_slice(),
        [Notice::EmptyOutput, Notice::EncoderError(_)]
    ));
}

#[test]
fn failed_start_leaves_controls_unlocked() {
    let mut s = session_with("one two three");
    s.toggle_play();
    let mut notifier = CollectingNotifier::default();
    let encoder = InMemoryEncoder::new().with_behavior(MemoryBehavior::FailBegin);
    assert!(!s.start_recording(ms(0), Box::new(encoder), &mut notifier));
    assert!(!s.is_recording());
    assert!(!s.engine().is_playing());
    assert!(!s.chrome().is_collapsed());
    assert!(matches!(notifier.notices.as_slice(), [Notice::StartFailed(_)]));
}

#[test]
fn shutdown_stops_an_active_recording() {
    let mut s = session_with("one two three");
    let mut sink = MemoryArtifactSink::default();
    let mut notifier = CollectingNotifier::default();
    assert!(s.shutdown(ms(0), &mut sink, &mut notifier).is_none());

    assert!(start(&mut s, InMemoryEncoder::new()));
    let report = s.shutdown(ms(50), &mut sink, &mut notifier).unwrap();
    assert_eq!(report.frames, 0);
    assert!(!s.is_recording());
}
