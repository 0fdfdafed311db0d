use std::io::{Read, Write as _};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc;
use std::thread::JoinHandle;

use once_cell::sync::OnceCell;

use crate::encode::{EncoderConfig, EncoderEvent, StreamEncoder};
use crate::foundation::core::{Fps, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::FrameRGBA;

const CHUNK_SIZE: usize = 64 * 1024;

/// Encoder that spawns the system `ffmpeg`, writes raw frames to its stdin and streams the
/// container bytes it writes to stdout back as [`EncoderEvent::Chunk`]s.
///
/// MP4 output is fragmented so it can be written to a pipe; WebM uses VP9.
pub struct FfmpegEncoder {
    program: String,
    available: OnceCell<Vec<String>>,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_reader: Option<JoinHandle<()>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    events: Option<mpsc::Sender<EncoderEvent>>,

    scratch: Vec<u8>,
    cfg: Option<EncoderConfig>,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific `ffmpeg` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            available: OnceCell::new(),
            child: None,
            stdin: None,
            stdout_reader: None,
            stderr_drain: None,
            events: None,
            scratch: Vec::new(),
            cfg: None,
        }
    }

    fn encoders(&self) -> &[String] {
        self.available.get_or_init(|| probe_encoders(&self.program))
    }

    fn video_args(cfg: &EncoderConfig) -> Vec<String> {
        let bitrate = cfg.bitrate.to_string();
        if cfg.codec.is_mp4() {
            vec![
                "-c:v".into(),
                "libx264".into(),
                "-pix_fmt".into(),
                "yuv420p".into(),
                "-b:v".into(),
                bitrate,
                "-movflags".into(),
                "frag_keyframe+empty_moov+default_base_moof".into(),
                "-f".into(),
                "mp4".into(),
            ]
        } else {
            vec![
                "-c:v".into(),
                "libvpx-vp9".into(),
                "-pix_fmt".into(),
                "yuv420p".into(),
                "-b:v".into(),
                bitrate,
                "-deadline".into(),
                "realtime".into(),
                "-f".into(),
                "webm".into(),
            ]
        }
    }
}

impl StreamEncoder for FfmpegEncoder {
    fn supports(&self, mime: &str) -> bool {
        let needed = if mime.starts_with("video/mp4") {
            "libx264"
        } else if mime.starts_with("video/webm") {
            "libvpx-vp9"
        } else {
            return false;
        };
        self.encoders().iter().any(|e| e == needed)
    }

    #[tracing::instrument(skip(self, cfg, events), fields(canvas = %cfg.canvas, fps = %cfg.fps, codec = cfg.codec.mime))]
    fn begin(&mut self, cfg: EncoderConfig, events: mpsc::Sender<EncoderEvent>) -> ReelResult<()> {
        if self.child.is_some() {
            return Err(ReelError::encode("ffmpeg encoder already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if cfg.bitrate == 0 {
            return Err(ReelError::validation("bitrate must be non-zero"));
        }
        let (width, height) = (cfg.canvas.width, cfg.canvas.height);
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "ffmpeg encoder width/height must be even (required for yuv420p output)",
            ));
        }
        if self.program == "ffmpeg" && !is_ffmpeg_on_path() {
            return Err(ReelError::encode(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input: raw RGBA8 frames, flattened to opaque in push_frame.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an"]);
        cmd.args(Self::video_args(&cfg));
        cmd.arg("pipe:1");

        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encode("failed to open ffmpeg stderr (unexpected)"))?;

        let chunk_tx = events.clone();
        let stdout_reader = std::thread::spawn(move || {
            let mut buf = vec![0u8; CHUNK_SIZE];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if chunk_tx.send(EncoderEvent::Chunk(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        let _ = chunk_tx.send(EncoderEvent::Error(format!(
                            "ffmpeg stdout read failed: {e}"
                        )));
                        break;
                    }
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.scratch = vec![0u8; cfg.canvas.rgba8_len()];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.events = Some(events);
        self.cfg = Some(cfg);
        tracing::debug!("ffmpeg started");
        Ok(())
    }

    fn push_frame(&mut self, frame: &FrameRGBA) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::encode("ffmpeg encoder not started"))?;
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}",
                frame.width, frame.height, cfg.canvas
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ReelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            cfg.background,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::encode("ffmpeg encoder is already finalized"));
        };
        stdin
            .write_all(&self.scratch)
            .map_err(|e| ReelError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))
    }

    fn finish(&mut self) -> ReelResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg encoder not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        if let Some(handle) = self.stdout_reader.take() {
            handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stdout reader thread panicked"))?;
        }
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        self.cfg = None;
        let events = self.events.take();
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        if let Some(tx) = events {
            let _ = tx.send(EncoderEvent::Finished);
        }
        tracing::debug!("ffmpeg finished");
        Ok(())
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            tracing::warn!("ffmpeg encoder dropped before finish; killing child");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // `-r` before `-i` sets the rawvideo input rate.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn probe_encoders(program: &str) -> Vec<String> {
    let output = Command::new(program)
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(out) if out.status.success() => {
            parse_encoder_list(&String::from_utf8_lossy(&out.stdout))
        }
        Ok(out) => {
            tracing::warn!(status = %out.status, "ffmpeg -encoders failed");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "ffmpeg not runnable");
            Vec::new()
        }
    }
}

/// Extract encoder names from `ffmpeg -encoders` output.
///
/// Entry lines look like ` V....D libx264  libx264 H.264 ...`; the legend above the `------`
/// separator is skipped.
pub(crate) fn parse_encoder_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip_while(|l| !l.trim_start().starts_with("---"))
        .skip(1)
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            let flags = parts.next()?;
            let name = parts.next()?;
            (flags.len() == 6).then(|| name.to_string())
        })
        .collect()
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg.r);
    let bg_g = u16::from(bg.g);
    let bg_b = u16::from(bg.b);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255_u16(bg_r, inv),
                u16::from(s[1]) + mul_div255_u16(bg_g, inv),
                u16::from(s[2]) + mul_div255_u16(bg_b, inv),
            )
        } else {
            (
                mul_div255_u16(u16::from(s[0]), a) + mul_div255_u16(bg_r, inv),
                mul_div255_u16(u16::from(s[1]), a) + mul_div255_u16(bg_g, inv),
                mul_div255_u16(u16::from(s[2]), a) + mul_div255_u16(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
