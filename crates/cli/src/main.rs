use anyhow::{bail, Context, Result};
use clap::Parser;
use quickcrop_core::{
    config::parse_size, init, Config, CropJob, ImageProcessor, Point, QuickCrop, Size,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to open (required for headless mode)
    image: Option<PathBuf>,

    /// Crop headlessly: selection corners X1,Y1,X2,Y2 in surface coordinates
    #[arg(long, value_parser = parse_corners, requires = "output", allow_hyphen_values = true)]
    select: Option<(Point, Point)>,

    /// Write the export here and exit without opening a window
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Surface size the selection refers to, e.g. 800x600
    #[arg(long, value_parser = parse_surface)]
    surface: Option<Size>,

    /// Resize percentage applied on export (10-100)
    #[arg(short, long)]
    percent: Option<u32>,

    /// Override the default save directory
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Print the headless result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    // Setup
    init();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Load config and apply CLI overrides
    let config = Config::load().context("Failed to load configuration")?;
    let config = apply_overrides(config, &args)?;

    let app = QuickCrop::with_config(config);

    let Some(output) = args.output else {
        app.run_interactive(args.image)
            .context("Failed to run the cropper window")?;
        return Ok(());
    };

    let Some(input) = args.image else {
        bail!("An input image is required with --output");
    };

    let job = CropJob {
        input,
        output,
        surface: app.config().window_size,
        selection: args.select,
        percent: app.config().default_percent,
    };

    let report = app
        .run_job(&job)
        .with_context(|| format!("Failed to export {}", job.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Saved {} ({}x{}, {})",
            report.path.display(),
            report.width,
            report.height,
            report.format
        );
    }

    Ok(())
}

/// Rebuilds `config` with the command-line overrides so they pass the same
/// validation as environment values.
fn apply_overrides(config: Config, args: &Args) -> Result<Config> {
    if let Some(percent) = args.percent {
        ImageProcessor::validate_percent(percent).context("Invalid --percent")?;
    }

    Config::builder()
        .with_save_dir(args.save_dir.clone().unwrap_or(config.save_dir))
        .with_default_percent(args.percent.unwrap_or(config.default_percent))
        .with_window_size(args.surface.unwrap_or(config.window_size))
        .build()
        .context("Invalid command-line options")
}

/// Parses `X1,Y1,X2,Y2`.
fn parse_corners(raw: &str) -> std::result::Result<(Point, Point), String> {
    let values: Vec<i32> = raw
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid coordinate in '{}': {}", raw, e))?;

    match values.as_slice() {
        [x1, y1, x2, y2] => Ok((Point::new(*x1, *y1), Point::new(*x2, *y2))),
        _ => Err(format!("expected X1,Y1,X2,Y2, got '{}'", raw)),
    }
}

fn parse_surface(raw: &str) -> std::result::Result<Size, String> {
    parse_size(raw).map_err(|e| e.to_string())
}
