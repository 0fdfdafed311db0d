use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scrollreel::record::Preset;
use scrollreel::studio::ffmpeg_encoder;
use scrollreel::{AppConfig, Canvas, Studio, Theme};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Config JSON; missing file means defaults.
    #[arg(long, global = true, default_value = "scrollreel.json")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the normalized token stream of a text file (`-` for stdin).
    Tokens(TokensArgs),
    /// Save a text file as the current content.
    Load(LoadArgs),
    /// Render the viewport at a point in time as a PNG.
    Frame(FrameArgs),
    /// Record the scrolling viewport to a video (requires `ffmpeg`).
    Record(RecordArgs),
    /// List recording presets.
    Presets,
    /// Write a config file with every default spelled out.
    Init(InitArgs),
}

#[derive(Parser, Debug)]
struct TokensArgs {
    /// Input text, Markdown or HTML.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print highlight-ready markup instead of JSON.
    #[arg(long, default_value_t = false)]
    html: bool,
}

#[derive(Parser, Debug)]
struct LoadArgs {
    /// Input text, Markdown or HTML.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Seconds of playback before the frame is taken.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Jump to this fraction of the track instead of playing.
    #[arg(long)]
    seek: Option<f64>,

    /// Theme override.
    #[arg(long)]
    theme: Option<String>,

    /// Output size as `WxH`; defaults to the viewport size.
    #[arg(long)]
    size: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// Preset name (`instagram_story`, `linkedin`, ...).
    #[arg(long)]
    preset: Option<String>,

    /// Custom resolution as `WxH`.
    #[arg(long)]
    resolution: Option<String>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Bitrate in bits per second.
    #[arg(long)]
    bitrate: Option<u32>,

    /// Recording speed.
    #[arg(long)]
    speed: Option<f64>,

    /// Prefer WebM even when MP4 is available.
    #[arg(long, default_value_t = false)]
    webm: bool,

    /// Keep recording after the content has scrolled out.
    #[arg(long, default_value_t = false)]
    no_auto_stop: bool,

    /// Hard limit on recording length, in seconds.
    #[arg(long, default_value_t = 600)]
    max_secs: u64,

    /// Load this file before recording.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Theme override.
    #[arg(long)]
    theme: Option<String>,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Overwrite an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Tokens(args) => cmd_tokens(args),
        Command::Load(args) => cmd_load(&cli.config, args),
        Command::Frame(args) => cmd_frame(&cli.config, args),
        Command::Record(args) => cmd_record(&cli.config, args),
        Command::Presets => cmd_presets(),
        Command::Init(args) => cmd_init(&cli.config, args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn parse_theme(name: &str) -> anyhow::Result<Theme> {
    Theme::from_name(name).with_context(|| {
        let names: Vec<_> = Theme::ALL.iter().map(|t| t.name()).collect();
        format!("unknown theme '{name}' (expected one of: {})", names.join(", "))
    })
}

fn cmd_tokens(args: TokensArgs) -> anyhow::Result<()> {
    let raw = read_input(&args.in_path)?;
    let doc = scrollreel::normalize(&raw);
    if args.html {
        println!("{}", doc.to_html());
    } else {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    Ok(())
}

fn cmd_load(config: &Path, args: LoadArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load(config)?;
    let mut studio = Studio::from_config(&cfg)?;
    let raw = read_input(&args.in_path)?;
    studio.session_mut().load_text(&raw)?;
    let doc = studio.session().document();
    eprintln!(
        "saved {} ({} lines, {} words) to {}",
        doc.format(),
        doc.lines().len(),
        doc.word_count(),
        cfg.storage_path.display()
    );
    Ok(())
}

fn cmd_frame(config: &Path, args: FrameArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load(config)?;
    let mut studio = Studio::from_config(&cfg)?;
    if let Some(name) = &args.theme {
        studio.session_mut().set_theme(parse_theme(name)?);
    }

    match args.seek {
        Some(fraction) => {
            studio.session_mut().seek_fraction(fraction);
        }
        None => {
            let at = Duration::try_from_secs_f64(args.at)
                .with_context(|| format!("--at {} is not a usable number of seconds", args.at))?;
            studio.advance(at);
        }
    }

    let size = match &args.size {
        Some(s) => Canvas::parse(s)?,
        None => Canvas::new(
            cfg.viewport_width.round() as u32,
            cfg.viewport_height.round() as u32,
        )?,
    };
    let frame = studio.render_frame(size)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_record(config: &Path, args: RecordArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load(config)?;
    let mut studio = Studio::from_config(&cfg)?;
    let session = studio.session_mut();

    if let Some(path) = &args.in_path {
        session.import_file(path)?;
    }
    if let Some(name) = &args.theme {
        session.set_theme(parse_theme(name)?);
    }
    if let Some(name) = &args.preset {
        let preset = Preset::from_name(name).with_context(|| {
            let names: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
            format!("unknown preset '{name}' (expected one of: {})", names.join(", "))
        })?;
        session.apply_preset(preset);
    }

    let mut rc = *session.record_config();
    if let Some(res) = &args.resolution {
        rc.resolution = Canvas::parse(res)?;
        rc.preset = Preset::Custom;
    }
    if let Some(fps) = args.fps {
        rc.fps = scrollreel::Fps::whole(fps)?;
    }
    if let Some(bitrate) = args.bitrate {
        rc.bitrate = bitrate;
    }
    if let Some(speed) = args.speed {
        rc.speed = speed;
    }
    rc.prefer_mp4 &= !args.webm;
    rc.auto_stop &= !args.no_auto_stop;
    rc.validate()?;
    session.set_record_config(rc);

    eprintln!(
        "recording {} at {} fps, speed {:.2}x (about {}s)",
        rc.resolution,
        rc.fps.as_f64(),
        rc.speed,
        session.estimated_duration_secs()
    );

    let run = studio.record(
        Box::new(ffmpeg_encoder(&cfg)),
        Duration::from_secs(args.max_secs),
    )?;

    if run.timed_out {
        eprintln!("stopped after {}s limit", args.max_secs);
    }
    let report = run.report.context("recording produced no report")?;
    if let Some(err) = &report.encoder_error {
        eprintln!("encoder error: {err}");
    }
    for path in studio.sink().written() {
        eprintln!("wrote {}", path.display());
    }
    anyhow::ensure!(
        report.delivered.is_some(),
        "recording failed ({} frames captured)",
        report.frames
    );
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    for preset in Preset::ALL {
        match preset.spec() {
            Some(spec) => println!(
                "{:<16} {:>9}  {} fps  {:.1} Mbps  speed {:.2}  text x{:.1}",
                preset.name(),
                spec.resolution.to_string(),
                spec.fps,
                f64::from(spec.bitrate) / 1_000_000.0,
                spec.speed,
                spec.text_scale
            ),
            None => println!("{:<16} {:>9}  user-supplied", preset.name(), "WxH"),
        }
    }
    Ok(())
}

fn cmd_init(config: &Path, args: InitArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.force || !config.exists(),
        "'{}' already exists (use --force to overwrite)",
        config.display()
    );
    AppConfig::default().save(config)?;
    eprintln!("wrote {}", config.display());
    Ok(())
}
