//! scrollreel is a scrolling karaoke / teleprompter engine.
//!
//! Raw text (plain, Markdown or HTML) is normalized into a [`ContentDocument`], laid out into
//! word boxes and scrolled upward at a configurable speed. Words crossing the viewport's
//! vertical midpoint are highlighted. The viewport can be captured frame by frame and streamed
//! into a video encoder:
//!
//! - Build a [`SessionController`] from an [`AppConfig`]
//! - Feed it input events and display-refresh ticks (or let a [`Studio`] do it)
//! - Start a recording with a [`StreamEncoder`] and collect the [`RecordingArtifact`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Text normalization (format detection, Markdown rewrite, sanitization, tokenization).
pub mod content;
/// Streaming video encoders.
pub mod encode;
/// Word highlighting around the viewport midpoint.
pub mod highlight;
/// Word-box layout.
pub mod layout;
/// Recording pipeline.
pub mod record;
/// Frame projection and rasterization.
pub mod render;
/// Scroll position and speed.
pub mod scroll;
/// Session state and input handling.
pub mod session;
/// Persisted content.
pub mod storage;

pub mod config;
pub mod studio;

pub use crate::foundation::core::{Affine, Canvas, Fps, Point, Rect, Rgba8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::AppConfig;
pub use crate::content::{ContentDocument, ContentFormat, normalize};
pub use crate::encode::ffmpeg::FfmpegEncoder;
pub use crate::encode::memory::InMemoryEncoder;
pub use crate::encode::{Codec, EncoderConfig, EncoderEvent, StreamEncoder};
pub use crate::highlight::WordHighlighter;
pub use crate::layout::{DocumentLayout, LayoutParams, TextMeasure, WordBox};
pub use crate::record::{
    ArtifactSink, Notice, Notifier, Preset, RecordConfig, Recorder, RecordingArtifact,
};
pub use crate::render::{CpuRasterizer, FrameRGBA, FrameView, Theme, ViewportRasterizer};
pub use crate::scroll::ScrollEngine;
pub use crate::session::{Key, SessionController};
pub use crate::storage::{ContentStore, FileStore, MemoryStore};
pub use crate::studio::{RecordRun, Studio};
