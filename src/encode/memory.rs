use std::sync::{Arc, Mutex, mpsc};

use crate::encode::{EncoderConfig, EncoderEvent, StreamEncoder};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::FrameRGBA;

/// How an [`InMemoryEncoder`] responds to frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryBehavior {
    /// Emit one chunk per frame.
    #[default]
    Normal,
    /// Accept frames but never emit a chunk.
    Silent,
    /// Emit an [`EncoderEvent::Error`] on the frame with this zero-based index.
    ErrorAtFrame(u64),
    /// Fail [`StreamEncoder::begin`].
    FailBegin,
}

/// What an [`InMemoryEncoder`] has seen; shared so it can be inspected after the encoder is
/// boxed and handed away.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Config received by `begin`.
    pub config: Option<EncoderConfig>,
    /// Frames accepted.
    pub frames: u64,
    /// Whether `finish` ran.
    pub finished: bool,
}

/// Encoder that produces a tiny deterministic byte stream instead of video.
///
/// Each chunk is the frame index (little-endian `u64`) followed by the first pixel.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    supported: Option<Vec<String>>,
    behavior: MemoryBehavior,
    events: Option<mpsc::Sender<EncoderEvent>>,
    stats: Arc<Mutex<MemoryStats>>,
}

impl InMemoryEncoder {
    /// Encoder that supports every MIME type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict supported MIME types to exactly `mimes`.
    pub fn with_supported(mut self, mimes: &[&str]) -> Self {
        self.supported = Some(mimes.iter().map(|m| m.to_string()).collect());
        self
    }

    /// Change the frame behavior.
    pub fn with_behavior(mut self, behavior: MemoryBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Shared view of the encoder's counters.
    pub fn stats(&self) -> Arc<Mutex<MemoryStats>> {
        Arc::clone(&self.stats)
    }

    fn update(&self, f: impl FnOnce(&mut MemoryStats)) {
        if let Ok(mut s) = self.stats.lock() {
            f(&mut s);
        }
    }
}

impl StreamEncoder for InMemoryEncoder {
    fn supports(&self, mime: &str) -> bool {
        self.supported
            .as_ref()
            .is_none_or(|list| list.iter().any(|m| m == mime))
    }

    fn begin(&mut self, cfg: EncoderConfig, events: mpsc::Sender<EncoderEvent>) -> ReelResult<()> {
        if self.behavior == MemoryBehavior::FailBegin {
            return Err(ReelError::encode("in-memory encoder configured to fail"));
        }
        self.events = Some(events);
        self.update(|s| {
            *s = MemoryStats {
                config: Some(cfg),
                ..MemoryStats::default()
            }
        });
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA) -> ReelResult<()> {
        let tx = self
            .events
            .as_ref()
            .ok_or_else(|| ReelError::encode("in-memory encoder not started"))?;
        let index = self.stats.lock().map(|s| s.frames).unwrap_or_default();

        match self.behavior {
            MemoryBehavior::ErrorAtFrame(n) if n == index => {
                let _ = tx.send(EncoderEvent::Error(format!("injected failure at frame {n}")));
            }
            MemoryBehavior::Silent => {}
            _ => {
                let mut chunk = index.to_le_bytes().to_vec();
                chunk.extend(frame.data.iter().take(4));
                let _ = tx.send(EncoderEvent::Chunk(chunk));
            }
        }
        self.update(|s| s.frames += 1);
        Ok(())
    }

    fn finish(&mut self) -> ReelResult<()> {
        let tx = self
            .events
            .take()
            .ok_or_else(|| ReelError::encode("in-memory encoder not started"))?;
        let _ = tx.send(EncoderEvent::Finished);
        self.update(|s| s.finished = true);
        Ok(())
    }
}
