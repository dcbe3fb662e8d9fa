use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use leafcolors::{
    FanoutSink, FfmpegSink, FfmpegSinkOpts, FrameRenderer, HttpTransport, LeafBoxes,
    ObservationFetcher, ObservationSet, PhotoSize, RenderOpts, SvgDirSink, SvgTemplate,
};

const DEFAULT_QUERY: &str = "https://api.inaturalist.org/v1/observations?taxon_id=48098&d1=2015-01-01&d2=2015-12-31&quality_grade=research&page=1&per_page=200&order=desc&order_by=observed_on";

#[derive(Parser, Debug)]
#[command(name = "leafcolors", version)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch every observation record of a paginated query.
    Fetch(FetchArgs),
    /// Download the photos referenced by a records file.
    Download(DownloadArgs),
    /// Pick each observation's leaf colour from its downloaded photo.
    Colorize(ColorizeArgs),
    /// Render one SVG map per day (and optionally an MP4, requires `ffmpeg` on PATH).
    Frames(FramesArgs),
    /// Write a segmentation montage PNG for a set of leaf photos.
    Montage(MontageArgs),
}

#[derive(Parser, Debug)]
struct FetchArgs {
    /// Query URL; must carry `page` and `per_page`.
    #[arg(long, default_value = DEFAULT_QUERY)]
    url: String,

    /// Output records JSON.
    #[arg(long, default_value = "records.json")]
    out: PathBuf,

    /// Also download photos into this directory.
    #[arg(long)]
    photos: Option<PathBuf>,

    /// Photo size variant.
    #[arg(long, default_value_t = PhotoSize::Medium)]
    size: PhotoSize,
}

#[derive(Parser, Debug)]
struct DownloadArgs {
    /// Input records JSON.
    #[arg(long, default_value = "records.json")]
    records: PathBuf,

    /// Output photo directory.
    #[arg(long, default_value = "images")]
    out: PathBuf,

    /// Photo size variant.
    #[arg(long, default_value_t = PhotoSize::Medium)]
    size: PhotoSize,
}

#[derive(Parser, Debug)]
struct ColorizeArgs {
    /// Input records JSON.
    #[arg(long, default_value = "records.json")]
    records: PathBuf,

    /// Directory holding `<photo id>.jpg` files.
    #[arg(long, default_value = "images")]
    photos: PathBuf,

    /// Leaf boxes JSON keyed by photo id.
    #[arg(long)]
    boxes: Option<PathBuf>,

    /// Output observations JSON.
    #[arg(long, default_value = "data.json")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input observations JSON.
    #[arg(long = "in", default_value = "data.json")]
    in_path: PathBuf,

    /// Output frame directory (created if missing).
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Header template; the bundled map is used when omitted.
    #[arg(long, requires = "ender")]
    starter: Option<PathBuf>,

    /// Footer template.
    #[arg(long, requires = "starter")]
    ender: Option<PathBuf>,

    /// Also encode the frames to this MP4.
    #[arg(long)]
    video: Option<PathBuf>,

    /// Days per second of video.
    #[arg(long, default_value_t = 10)]
    fps: u32,

    /// Video width in pixels.
    #[arg(long, default_value_t = 1000)]
    width: u32,
}

#[derive(Parser, Debug)]
struct MontageArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Leaf photos, one montage column each.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Fetch(args) => cmd_fetch(args),
        Command::Download(args) => cmd_download(args),
        Command::Colorize(args) => cmd_colorize(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Montage(args) => cmd_montage(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn http_fetcher() -> anyhow::Result<ObservationFetcher<HttpTransport>> {
    let transport = HttpTransport::new(concat!("leafcolors/", env!("CARGO_PKG_VERSION")))?;
    Ok(ObservationFetcher::new(transport))
}

fn create_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create dir '{}'", dir.display()))
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir(parent),
        _ => Ok(()),
    }
}

fn cmd_fetch(args: FetchArgs) -> anyhow::Result<()> {
    let fetcher = http_fetcher()?;
    let records = fetcher.fetch(&args.url)?;

    create_parent(&args.out)?;
    leafcolors::write_records(&args.out, &records)
        .with_context(|| format!("write records '{}'", args.out.display()))?;
    eprintln!("wrote {} records to {}", records.len(), args.out.display());

    if let Some(dir) = &args.photos {
        create_dir(dir)?;
        let stats = fetcher.download_photos(&records, dir, args.size)?;
        eprintln!("saved {} photos to {}", stats.photos, dir.display());
    }
    Ok(())
}

fn cmd_download(args: DownloadArgs) -> anyhow::Result<()> {
    let records = leafcolors::read_records(&args.records)
        .with_context(|| format!("read records '{}'", args.records.display()))?;
    create_dir(&args.out)?;
    let stats = http_fetcher()?.download_photos(&records, &args.out, args.size)?;
    eprintln!("saved {} photos to {}", stats.photos, args.out.display());
    Ok(())
}

fn cmd_colorize(args: ColorizeArgs) -> anyhow::Result<()> {
    let records = leafcolors::read_records(&args.records)
        .with_context(|| format!("read records '{}'", args.records.display()))?;
    let boxes = match &args.boxes {
        Some(p) => leafcolors::read_leaf_boxes(p)?,
        None => LeafBoxes::new(),
    };

    let (observations, stats) = leafcolors::colorize(&records, &args.photos, &boxes)?;

    create_parent(&args.out)?;
    observations
        .write_to_path(&args.out)
        .with_context(|| format!("write observations '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} observations to {} ({} skipped)",
        stats.colored,
        args.out.display(),
        stats.skipped
    );
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let observations = ObservationSet::from_path(&args.in_path)?;

    let template = match (&args.starter, &args.ender) {
        (Some(starter), Some(ender)) => SvgTemplate::from_paths(starter, ender)?,
        _ => SvgTemplate::builtin(),
    };
    let opts = RenderOpts {
        template,
        ..RenderOpts::default()
    };

    create_dir(&args.out)?;
    let mut sink = FanoutSink::new().with(SvgDirSink::new(&args.out));
    if let Some(video) = &args.video {
        let mut ff = FfmpegSinkOpts::new(video);
        ff.fps = args.fps;
        ff.width = args.width;
        sink = sink.with(FfmpegSink::new(ff));
    }

    let stats = FrameRenderer::new(opts).render(observations.as_slice(), &mut sink)?;

    eprintln!(
        "wrote {} frames ({} carry-forward) to {}",
        stats.frames,
        stats.carry_forward_frames,
        args.out.display()
    );
    if let Some(video) = &args.video {
        eprintln!("wrote {}", video.display());
    }
    Ok(())
}

fn cmd_montage(args: MontageArgs) -> anyhow::Result<()> {
    let images = args
        .images
        .iter()
        .map(|p| leafcolors::load_rgb(p).with_context(|| format!("load '{}'", p.display())))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let montage = leafcolors::segmentation_montage(&images)?;

    create_parent(&args.out)?;
    montage
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
