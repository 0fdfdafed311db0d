use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_opaque_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, Rgba8::rgb(10, 20, 30)).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_straight_over_black() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, Rgba8::rgb(0, 0, 0)).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, Rgba8::rgb(0, 0, 0)).is_err());
}

#[test]
fn encoder_list_parsing_skips_legend() {
    let out = "Encoders:\n V..... = Video\n A..... = Audio\n ------\n V....D libx264              libx264 H.264 / AVC\n V....D libvpx-vp9           libvpx VP9\n A....D aac                  AAC (Advanced Audio Coding)\n";
    let names = parse_encoder_list(out);
    assert_eq!(names, vec!["libx264", "libvpx-vp9", "aac"]);
}

#[test]
fn begin_rejects_odd_dimensions_before_spawning() {
    use crate::encode::DEFAULT_CODEC;
    use crate::foundation::core::Canvas;

    let mut enc = FfmpegEncoder::with_program("definitely-not-ffmpeg");
    let (tx, _rx) = std::sync::mpsc::channel();
    let cfg = EncoderConfig {
        canvas: Canvas::new(11, 10).unwrap(),
        fps: Fps::whole(30).unwrap(),
        bitrate: 1_000_000,
        codec: DEFAULT_CODEC,
        background: Rgba8::rgb(0, 0, 0),
    };
    let err = enc.begin(cfg, tx).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn missing_program_supports_nothing() {
    let enc = FfmpegEncoder::with_program("definitely-not-ffmpeg");
    assert!(!enc.supports("video/mp4"));
    assert!(!enc.supports("video/webm;codecs=vp9"));
    assert!(!enc.supports("audio/ogg"));
}

#[test]
fn push_before_begin_is_an_encode_error() {
    let mut enc = FfmpegEncoder::with_program("definitely-not-ffmpeg");
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    assert!(matches!(
        enc.push_frame(&frame).unwrap_err(),
        ReelError::Encode(_)
    ));
}
