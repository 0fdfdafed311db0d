//! Streaming encoders.
//!
//! An encoder is opened with [`StreamEncoder::begin`], receives frames through
//! [`StreamEncoder::push_frame`] and is finalized with [`StreamEncoder::finish`]. Encoded bytes
//! never come back through those calls: they arrive on the [`EncoderEvent`] channel handed to
//! `begin`, so the consumer that owns the output buffer is decoupled from the frame producer.

/// `ffmpeg`-backed encoder (system binary).
pub mod ffmpeg;
/// In-memory encoder for tests and dry runs.
pub mod memory;

use std::sync::mpsc;

use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::ReelResult;
use crate::render::FrameRGBA;

/// A container/codec pairing identified by its MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Codec {
    /// MIME type including codec parameters.
    pub mime: &'static str,
    /// File extension of the resulting artifact.
    pub extension: &'static str,
}

impl Codec {
    /// Whether this codec produces an MP4 container.
    pub fn is_mp4(self) -> bool {
        self.mime.starts_with("video/mp4")
    }
}

/// MP4 codecs tried in order when MP4 output is preferred.
pub const MP4_CANDIDATES: [Codec; 3] = [
    Codec {
        mime: "video/mp4;codecs=h264",
        extension: "mp4",
    },
    Codec {
        mime: "video/mp4;codecs=avc1",
        extension: "mp4",
    },
    Codec {
        mime: "video/mp4",
        extension: "mp4",
    },
];

/// Codec used when MP4 is not preferred or none of [`MP4_CANDIDATES`] is supported.
pub const DEFAULT_CODEC: Codec = Codec {
    mime: "video/webm;codecs=vp9",
    extension: "webm",
};

/// Pick the codec for a recording.
pub fn negotiate_codec(encoder: &dyn StreamEncoder, prefer_mp4: bool) -> Codec {
    if prefer_mp4 {
        if let Some(c) = MP4_CANDIDATES.iter().find(|c| encoder.supports(c.mime)) {
            return *c;
        }
        tracing::info!(fallback = DEFAULT_CODEC.mime, "no supported mp4 codec");
    }
    DEFAULT_CODEC
}

/// Parameters for one encoding session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Frame size in pixels.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Target video bitrate in bits per second.
    pub bitrate: u32,
    /// Negotiated codec.
    pub codec: Codec,
    /// Color used to flatten any transparency before encoding.
    pub background: Rgba8,
}

/// Message from an encoder to the recording that owns it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A piece of encoded output, in stream order.
    Chunk(Vec<u8>),
    /// The encoder failed asynchronously.
    Error(String),
    /// All output has been delivered.
    Finished,
}

/// Encoding collaborator used by the recorder.
pub trait StreamEncoder: Send {
    /// Whether `mime` can be produced.
    fn supports(&self, mime: &str) -> bool;
    /// Start a session; output goes to `events`.
    fn begin(&mut self, cfg: EncoderConfig, events: mpsc::Sender<EncoderEvent>) -> ReelResult<()>;
    /// Encode one frame. Frames must match `cfg.canvas`.
    fn push_frame(&mut self, frame: &FrameRGBA) -> ReelResult<()>;
    /// Flush and close. [`EncoderEvent::Finished`] is sent once all chunks are out.
    fn finish(&mut self) -> ReelResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/encode/negotiate.rs"]
mod tests;
