use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "paintmask", version)]
struct Cli {
    /// Settings JSON (painting, brush, compositor, compare, scoring).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an input script and write the composed painting as a PNG.
    Render(RenderArgs),
    /// Compare two PNGs and print their similarity.
    Compare(CompareArgs),
    /// Score a forgery script against a reference script and print the outcome as JSON.
    Score(ScoreArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width (defaults to the painting width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height (defaults to the painting height).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricChoice {
    Luma,
    Channels,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// First PNG.
    a: PathBuf,

    /// Second PNG.
    b: PathBuf,

    /// Error metric (defaults to the config's).
    #[arg(long, value_enum)]
    metric: Option<MetricChoice>,

    /// Include alpha differences in the error.
    #[arg(long, default_value_t = false)]
    with_alpha: bool,

    /// Write the per-pixel error as a grayscale PNG.
    #[arg(long)]
    diff: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ScoreArgs {
    /// Reference (artist) script JSON.
    #[arg(long)]
    reference: PathBuf,

    /// Forgery script JSON.
    #[arg(long)]
    forgery: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => paintmask::PaintMaskConfig::from_path(path)?,
        None => paintmask::PaintMaskConfig::default(),
    };
    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Compare(args) => cmd_compare(&cfg, args),
        Command::Score(args) => cmd_score(&cfg, args),
    }
}

fn replay(cfg: &paintmask::PaintMaskConfig, path: &Path) -> anyhow::Result<paintmask::Painting> {
    let script = paintmask::Script::from_path(path)?;
    let (painting, report) = script
        .replay(cfg)
        .with_context(|| format!("replay script '{}'", path.display()))?;
    if report.rejected > 0 {
        eprintln!(
            "{}: {} of {} ops rejected",
            path.display(),
            report.rejected,
            report.applied + report.rejected
        );
    }
    Ok(painting)
}

fn cmd_render(cfg: &paintmask::PaintMaskConfig, args: RenderArgs) -> anyhow::Result<()> {
    let painting = replay(cfg, &args.in_path)?;
    let size = painting.size();
    let mut compositor = paintmask::Compositor::new(
        args.width.unwrap_or(size.width),
        args.height.unwrap_or(size.height),
        cfg.compositor,
    );
    compositor.render_painting(&painting);
    if compositor.packed().source_stroke_count() > compositor.rendered_stroke_count() {
        eprintln!(
            "painting has {} strokes, only the first {} are drawn",
            compositor.packed().source_stroke_count(),
            compositor.rendered_stroke_count()
        );
    }

    compositor.target().save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_png(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

fn cmd_compare(cfg: &paintmask::PaintMaskConfig, args: CompareArgs) -> anyhow::Result<()> {
    let a = load_png(&args.a)?;
    let b = load_png(&args.b)?;

    let mut opts = cfg.compare;
    if let Some(metric) = args.metric {
        opts.metric = match metric {
            MetricChoice::Luma => paintmask::ErrorMetric::Luma,
            MetricChoice::Channels => paintmask::ErrorMetric::Channels,
        };
    }
    if args.with_alpha {
        opts.ignore_alpha = false;
    }
    opts.keep_difference = args.diff.is_some();

    let result = paintmask::compare_images_detailed(&a, &b, &opts);
    println!("{:.6}", result.similarity);

    if let (Some(path), Some(diff)) = (&args.diff, &result.difference) {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        diff.to_gray_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_score(cfg: &paintmask::PaintMaskConfig, args: ScoreArgs) -> anyhow::Result<()> {
    let reference = replay(cfg, &args.reference)?;
    let forgery = replay(cfg, &args.forgery)?;

    let mut scorer = paintmask::SimilarityScorer::new(cfg.compositor, cfg.compare);
    let outcome = paintmask::determine_result(&reference, &forgery, &cfg.scoring, &mut scorer);
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("serialize outcome")?
    );
    Ok(())
}
