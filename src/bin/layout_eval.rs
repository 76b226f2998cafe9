//! Command-line front end: evaluate recorded detections against ground truth,
//! or draw them coloured by category.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use layout_eval::image_io::encode_png;
use layout_eval::loader::load_text_lines_from_file;
use layout_eval::{
    detect_layout, evaluate_layout, load_predictions_from_file, EvaluationOptions,
    PrecomputedDetector,
};

#[derive(Parser, Debug)]
#[command(name = "layout-eval", version, about = "Evaluate document layout detections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match detections against ground truth and print metrics as JSON.
    Evaluate(EvaluateArgs),
    /// Draw detections onto the page image, coloured by category.
    Render(RenderArgs),
}

/// Options shared by both subcommands.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Page image (PNG or JPEG).
    #[arg(long)]
    image: PathBuf,

    /// Detector output: JSON list of {"bbox": [x1, y1, x2, y2], "label": ...}.
    #[arg(long, required_unless_present = "text_lines", conflicts_with = "text_lines")]
    predictions: Option<PathBuf>,

    /// Text-line polygons ([[[x, y], ...], ...]) labeled title or text by height.
    #[arg(long)]
    text_lines: Option<PathBuf>,

    /// Minimum height in pixels for a text line to count as a title.
    #[arg(long)]
    title_min_height: Option<f64>,

    /// JSON options file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Outline width in pixels.
    #[arg(long)]
    line_width: Option<u32>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Ground-truth document with categories and [x, y, w, h] annotations.
    #[arg(long)]
    ground_truth: PathBuf,

    /// Minimum IoU for a true positive.
    #[arg(long)]
    iou_threshold: Option<f64>,

    /// Where to write the TP/FP/FN overlay PNG.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Where to write the metrics JSON (printed to stdout as well).
    #[arg(long)]
    metrics: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Where to write the overlay PNG.
    #[arg(long, short)]
    output: PathBuf,
}

fn load_options(common: &CommonArgs, iou_threshold: Option<f64>) -> anyhow::Result<EvaluationOptions> {
    let mut options = match &common.config {
        Some(path) => EvaluationOptions::from_file(path)
            .with_context(|| format!("reading options from {}", path.display()))?,
        None => EvaluationOptions::default(),
    };
    if let Some(line_width) = common.line_width {
        options = options.with_line_width(line_width);
    }
    if let Some(height) = common.title_min_height {
        options = options.with_title_min_height(height);
    }
    if let Some(threshold) = iou_threshold {
        options = options.with_iou_threshold(threshold);
    }
    options.validate()?;
    Ok(options)
}

fn load_inputs(
    common: &CommonArgs,
    options: &EvaluationOptions,
) -> anyhow::Result<(Vec<u8>, PrecomputedDetector)> {
    let image_bytes =
        fs::read(&common.image).with_context(|| format!("reading {}", common.image.display()))?;
    let predictions = match (&common.predictions, &common.text_lines) {
        (Some(path), _) => load_predictions_from_file(path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, Some(path)) => load_text_lines_from_file(path, options.title_min_height)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => anyhow::bail!("either --predictions or --text-lines is required"),
    };
    Ok((image_bytes, PrecomputedDetector::new(predictions)))
}

fn run_evaluate(args: &EvaluateArgs) -> anyhow::Result<()> {
    let options = load_options(&args.common, args.iou_threshold)?;
    let (image_bytes, detector) = load_inputs(&args.common, &options)?;
    let ground_truth = fs::read(&args.ground_truth)
        .with_context(|| format!("reading {}", args.ground_truth.display()))?;

    let result = evaluate_layout(&image_bytes, &ground_truth, &detector, &options)?;

    let report = serde_json::to_string_pretty(&result.metrics().report())?;
    println!("{report}");

    if let Some(path) = &args.metrics {
        fs::write(path, &report).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.output {
        fs::write(path, encode_png(&result.overlay)?)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote overlay to {}", path.display());
    }

    Ok(())
}

fn run_render(args: &RenderArgs) -> anyhow::Result<()> {
    let options = load_options(&args.common, None)?;
    let (image_bytes, detector) = load_inputs(&args.common, &options)?;

    let overlay = detect_layout(&image_bytes, &detector, &options)?;
    fs::write(&args.output, encode_png(&overlay)?)
        .with_context(|| format!("writing {}", args.output.display()))?;
    log::info!("wrote overlay to {}", args.output.display());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Render(args) => run_render(args),
    }
}
