use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use frameseq::{
    CpuSurface, FsFetcher, PlaybackConfig, PlaybackController, RenderOutcome, ScrollResponse,
    Surface as _, ViewportSize,
};
use tracing_subscriber::EnvFilter;

const LOAD_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "frameseq", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame for one scroll position as a PNG.
    Frame(FrameArgs),
    /// Simulate a scroll pass over the sequence region and report paint statistics.
    Scrub(ScrubArgs),
}

#[derive(clap::Args, Debug)]
struct SequenceArgs {
    /// Playback config JSON. Overrides the naming flags below.
    #[arg(long, conflicts_with = "dir")]
    config: Option<PathBuf>,

    /// Directory holding the frames.
    #[arg(long)]
    dir: Option<PathBuf>,

    #[arg(long, default_value = frameseq::playback::config::DEFAULT_PREFIX)]
    prefix: String,

    #[arg(long, default_value = frameseq::playback::config::DEFAULT_EXTENSION)]
    ext: String,

    /// Number of frames in the sequence.
    #[arg(long)]
    frames: Option<usize>,
}

#[derive(clap::Args, Debug)]
struct ViewportArgs {
    /// Viewport width in logical pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in logical pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    seq: SequenceArgs,

    #[command(flatten)]
    view: ViewportArgs,

    /// Normalized scroll progress in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScrubArgs {
    #[command(flatten)]
    seq: SequenceArgs,

    #[command(flatten)]
    view: ViewportArgs,

    /// Height of the scroll region in viewport heights.
    #[arg(long, default_value_t = 4.0)]
    region_vh: f64,

    /// Display refreshes over the whole pass.
    #[arg(long, default_value_t = 60)]
    steps: usize,

    /// Scroll events delivered between two display refreshes.
    #[arg(long, default_value_t = 1)]
    events_per_refresh: usize,

    /// Write every painted frame as a numbered PNG here.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

type Controller = PlaybackController<FsFetcher, CpuSurface>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Scrub(args) => cmd_scrub(args),
    }
}

fn read_config(args: &SequenceArgs) -> anyhow::Result<PlaybackConfig> {
    if let Some(path) = args.config.as_deref() {
        return Ok(PlaybackConfig::from_json_path(path)?);
    }
    let Some(dir) = args.dir.clone() else {
        anyhow::bail!("pass either --config or --dir with --frames");
    };
    let Some(frames) = args.frames else {
        anyhow::bail!("--frames is required with --dir");
    };
    let cfg = PlaybackConfig::new(dir, frames).with_naming(args.prefix.clone(), args.ext.clone());
    cfg.validate()?;
    Ok(cfg)
}

fn viewport(args: &ViewportArgs) -> ViewportSize {
    ViewportSize::new(args.width, args.height, args.dpr)
}

/// Mount and block until every frame has resolved, reporting progress on stderr.
fn load(cfg: PlaybackConfig, view: ViewportSize) -> anyhow::Result<Controller> {
    let surface = CpuSurface::new(view.backing_size()).with_clear_rgba([0, 0, 0, 255]);
    let mut controller = PlaybackController::new(cfg, FsFetcher::new(), Some(surface), view)?;
    controller.mount();

    let started = Instant::now();
    let mut shown = None;
    while !controller.is_ready() {
        let progress = controller.pump_timeout(POLL_INTERVAL);
        if shown != Some(progress) {
            eprintln!("loading {}%", progress.percent());
            shown = Some(progress);
        }
        if started.elapsed() > LOAD_TIMEOUT {
            anyhow::bail!("timed out loading frames at {}%", progress.percent());
        }
    }

    let failed = controller.store().failed_count();
    if failed > 0 {
        eprintln!("{failed} of {} frames failed to load", controller.frames().len());
    }
    Ok(controller)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.seq)?;
    let mut controller = load(cfg, viewport(&args.view))?;

    if controller.on_scroll(args.progress) != ScrollResponse::Ignored {
        controller.on_display_refresh();
    }
    let Some(surface) = controller.surface() else {
        anyhow::bail!("no surface attached");
    };
    save_png(surface, &args.out)?;

    let shown = controller.last_painted().unwrap_or(controller.latest_index());
    eprintln!("wrote {} (frame {})", args.out.display(), shown.0 + 1);
    Ok(())
}

#[derive(Debug, Default)]
struct ScrubStats {
    events: usize,
    refreshes: usize,
    coalesced: usize,
    painted: usize,
    unchanged: usize,
    unrenderable: usize,
}

fn cmd_scrub(args: ScrubArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.seq)?;
    let view = viewport(&args.view);
    let mut controller = load(cfg, view)?;

    if let Some(dir) = args.out_dir.as_deref() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
    }

    let per_refresh = args.events_per_refresh.max(1);
    let total_events = args.steps.max(1) * per_refresh;
    let travel = view.height * (args.region_vh - 1.0);
    let mut stats = ScrubStats::default();

    for event in 0..=total_events {
        let scroll_y = travel * event as f64 / total_events as f64;
        let response = controller.on_scroll(scroll_progress(scroll_y, view.height, args.region_vh));
        stats.events += 1;
        if response == ScrollResponse::Coalesced {
            stats.coalesced += 1;
        }

        if event % per_refresh != 0 && event != total_events {
            continue;
        }
        let Some(outcome) = controller.on_display_refresh() else {
            continue;
        };
        stats.refreshes += 1;
        match outcome {
            RenderOutcome::Painted(_) => {
                stats.painted += 1;
                if let (Some(dir), Some(surface)) = (args.out_dir.as_deref(), controller.surface())
                {
                    save_png(surface, &dir.join(format!("scrub-{:04}.png", stats.painted)))?;
                }
            }
            RenderOutcome::SkippedUnchanged => stats.unchanged += 1,
            RenderOutcome::SkippedUnrenderable | RenderOutcome::SkippedNoSurface => {
                stats.unrenderable += 1
            }
        }
    }

    println!(
        "events={} refreshes={} coalesced={} painted={} unchanged={} unrenderable={} total_paints={}",
        stats.events,
        stats.refreshes,
        stats.coalesced,
        stats.painted,
        stats.unchanged,
        stats.unrenderable,
        controller.paint_count(),
    );
    Ok(())
}

/// Progress through a region `region_vh` viewports tall, from its top meeting the viewport
/// top to its bottom meeting the viewport bottom.
fn scroll_progress(scroll_y: f64, viewport_h: f64, region_vh: f64) -> f64 {
    let travel = viewport_h * region_vh - viewport_h;
    if travel.is_nan() || travel <= 0.0 {
        return 0.0;
    }
    (scroll_y / travel).clamp(0.0, 1.0)
}

fn save_png(surface: &CpuSurface, path: &Path) -> anyhow::Result<()> {
    let size = surface.pixel_size();
    let rgba: Vec<u8> = surface
        .data()
        .chunks_exact(4)
        .flat_map(unpremultiply)
        .collect();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &rgba,
        size.width,
        size.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn unpremultiply(px: &[u8]) -> [u8; 4] {
    let a = px[3];
    if a == 0 || a == 255 {
        return [px[0], px[1], px[2], a];
    }
    let a16 = u16::from(a);
    let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), a]
}
