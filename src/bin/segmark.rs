use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "segmark", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the segmentation request from an annotations file and a chunk list.
    Aggregate(AggregateArgs),
    /// Decode an RLE mask JSON into a tinted PNG.
    RenderMask(RenderMaskArgs),
    /// Render the marker and mask overlay of one frame as a PNG.
    RenderOverlay(RenderOverlayArgs),
}

#[derive(Parser, Debug)]
struct AggregateArgs {
    /// Annotations JSON: `{ "<frame>": { "player1Positive": [{"x":..,"y":..}], ... } }`.
    #[arg(long)]
    annotations: PathBuf,

    /// Chunk list JSON: `[[[start, end], ...], ...]`.
    #[arg(long)]
    chunks: PathBuf,

    /// Write the request JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Exit successfully even when some chunk lacks positive points.
    #[arg(long, default_value_t = false)]
    allow_invalid: bool,
}

#[derive(Parser, Debug)]
struct RenderMaskArgs {
    /// Mask JSON: `{ "size": [height, width], "counts": "..." }`.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Resample to this width (nearest neighbour). Requires `--height`.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Resample to this height (nearest neighbour). Requires `--width`.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Tint as `r,g,b,a` with 8-bit channels and alpha in [0, 1].
    #[arg(long, default_value = "255,0,0,0.5", value_parser = parse_rgba)]
    color: segmark::Rgba,
}

#[derive(Parser, Debug)]
struct RenderOverlayArgs {
    /// Annotations JSON, same format as `aggregate`.
    #[arg(long)]
    annotations: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Viewport width in pixels.
    #[arg(long)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long)]
    height: u32,

    /// Segmentation results JSON: `[{ "frameIndex": .., "player1Mask": .., "player2Mask": .. }]`.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Font file for marker labels. Labels are omitted without it.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Aggregate(args) => cmd_aggregate(args),
        Command::RenderMask(args) => cmd_render_mask(args),
        Command::RenderOverlay(args) => cmd_render_overlay(args),
    }
}

fn cmd_aggregate(args: AggregateArgs) -> anyhow::Result<()> {
    let collection = read_annotations(&args.annotations)?;
    let chunks_json = std::fs::read_to_string(&args.chunks)
        .with_context(|| format!("read chunks '{}'", args.chunks.display()))?;
    let chunks = segmark::ChunkSet::from_json(&chunks_json)
        .with_context(|| format!("parse chunks '{}'", args.chunks.display()))?;

    let agg = segmark::aggregate(&collection, &chunks);
    let json = serde_json::to_string_pretty(&agg.marker_input).context("serialize markers")?;

    match &args.out {
        Some(out) => {
            ensure_parent(out)?;
            std::fs::write(out, format!("{json}\n"))
                .with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }

    if !agg.is_valid {
        for (chunk, player) in agg.missing() {
            eprintln!(
                "chunk {chunk}: player {} has no positive point",
                player.as_u8()
            );
        }
        if chunks.is_empty() {
            eprintln!("chunk list is empty");
        }
        if !args.allow_invalid {
            std::process::exit(2);
        }
    }
    Ok(())
}

fn cmd_render_mask(args: RenderMaskArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read mask '{}'", args.in_path.display()))?;
    let mask: segmark::SegmentationMask = serde_json::from_str(&json)
        .with_context(|| format!("parse mask '{}'", args.in_path.display()))?;

    let mut bitmap = segmark::try_decode(&mask)?;
    if let (Some(w), Some(h)) = (args.width, args.height) {
        bitmap = segmark::scale_mask(&bitmap, w, h);
    }
    let img = segmark::rasterize(&bitmap, args.color)?;

    ensure_parent(&args.out)?;
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {} foreground px)",
        args.out.display(),
        img.width(),
        img.height(),
        bitmap.area()
    );
    Ok(())
}

fn cmd_render_overlay(args: RenderOverlayArgs) -> anyhow::Result<()> {
    let collection = read_annotations(&args.annotations)?;
    let viewport = segmark::Viewport::new(args.width, args.height)?;
    let frame = segmark::FrameIndex(args.frame);

    let results: Vec<segmark::SegmentationResult> = match &args.results {
        Some(p) => {
            let json = std::fs::read_to_string(p)
                .with_context(|| format!("read results '{}'", p.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parse results '{}'", p.display()))?
        }
        None => Vec::new(),
    };
    let masks = results
        .iter()
        .find(|r| r.frame_index == frame)
        .map(segmark::SegmentationResult::layers)
        .unwrap_or_default();

    let mut style = segmark::OverlayStyle::default();
    if let Some(font) = &args.font {
        style = style.with_label_font(segmark::LabelFont::from_path(font)?);
    }
    let mut compositor = segmark::OverlayCompositor::new(style);
    let out = compositor.render(collection.get(&frame), masks, viewport)?;
    let img = out
        .to_straight_image()
        .context("overlay buffer does not match its dimensions")?;

    ensure_parent(&args.out)?;
    img.save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_annotations(path: &Path) -> anyhow::Result<segmark::AnnotationCollection> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read annotations '{}'", path.display()))?;
    let raw: BTreeMap<String, segmark::FrameAnnotation> = serde_json::from_str(&json)
        .with_context(|| format!("parse annotations '{}'", path.display()))?;

    let mut out = segmark::AnnotationCollection::new();
    for (key, ann) in raw {
        let frame: u64 = key
            .trim()
            .parse()
            .with_context(|| format!("annotation key '{key}' is not a frame index"))?;
        if !ann.is_empty() {
            out.insert(segmark::FrameIndex(frame), ann);
        }
    }
    Ok(out)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn parse_rgba(s: &str) -> Result<segmark::Rgba, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b, a] = parts.as_slice() else {
        return Err(format!("expected r,g,b,a, got '{s}'"));
    };
    let channel = |v: &str| {
        v.parse::<u8>()
            .map_err(|e| format!("bad color channel '{v}': {e}"))
    };
    let alpha: f32 = a.parse().map_err(|e| format!("bad alpha '{a}': {e}"))?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(format!("alpha must be within [0, 1], got {alpha}"));
    }
    Ok(segmark::Rgba::new(channel(*r)?, channel(*g)?, channel(*b)?, alpha))
}
