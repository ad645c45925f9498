//! pill-check CLI: validate pill marker positions on a batch of chart images.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use pill_check::core::LogOptions;
use pill_check::overlay::{render_overlay, OverlayStyle};
use pill_check::{
    ComputeDevice, FileImageSource, PositionValidator, TimeOfDay, ValidationReport,
    ValidatorParams, NO_PILL_DETECTED,
};
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "pill-check")]
#[command(about = "Check that the pill marker on symptom charts sits at the expected time")]
#[command(version)]
struct Cli {
    /// Log pipeline debug details (mask statistics, mapping) to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more chart images against an expected time.
    Validate(ValidateArgs),

    /// Print the default validator configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct ValidateArgs {
    /// Chart images to validate.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Expected marker time, e.g. "8:00 PM" or "20:00".
    #[arg(long)]
    expected: TimeOfDay,

    /// JSON file with `ValidatorParams` overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Allowed time deviation in minutes.
    #[arg(long)]
    tolerance_minutes: Option<u32>,

    /// Top-band fraction of the chart height, in (0, 1].
    #[arg(long)]
    band: Option<f64>,

    /// Where the color comparison runs: cpu or accelerated.
    #[arg(long)]
    device: Option<ComputeDevice>,

    /// Write a JSON report of every image to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write `<name>_overlay.png` debug renderings into this directory.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
}

impl ValidateArgs {
    fn to_params(&self) -> CliResult<ValidatorParams> {
        let mut params = match &self.config {
            Some(path) => load_params(path)?,
            None => ValidatorParams::default(),
        };
        if let Some(minutes) = self.tolerance_minutes {
            params.tolerance_minutes = minutes;
        }
        if let Some(band) = self.band {
            params.calibration.top_band_fraction = band;
        }
        if let Some(device) = self.device {
            params.device = device;
        }
        Ok(params)
    }
}

#[derive(Debug, Serialize)]
struct ImageReport {
    image_path: String,
    is_valid: bool,
    message: String,
    detail: Option<ValidationReport>,
    error: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {}", error_chain(&*err));
            ExitCode::from(2)
        }
    }
}

fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::DefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&ValidatorParams::default())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) -> CliResult<()> {
    pill_check::core::init(LogOptions::verbose(verbose))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: bool) -> CliResult<()> {
    pill_check::core::init_tracing(LogOptions::verbose(verbose), false);
    Ok(())
}

fn run_validate(args: &ValidateArgs) -> CliResult<ExitCode> {
    let params = args.to_params()?;
    let validator = PositionValidator::new(params)?;
    info!(
        "validating {} image(s) against {} (tolerance {} min, band {:.2}, device {})",
        args.images.len(),
        args.expected,
        params.tolerance_minutes,
        params.calibration.top_band_fraction,
        params.device
    );

    if let Some(dir) = &args.overlay_dir {
        fs::create_dir_all(dir)?;
    }

    let mut reports = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let entry = validate_one(&validator, path, args.expected);
        println!(
            "{}: {}",
            path.display(),
            if entry.is_valid { "Valid" } else { "Invalid" }
        );
        println!("  {}", entry.message);

        if let (Some(dir), Some(detail)) = (&args.overlay_dir, &entry.detail) {
            if let Err(err) = write_overlay(path, detail, &params, dir) {
                warn!("{}: overlay not written: {err}", path.display());
            }
        }
        reports.push(entry);
    }

    let failed = reports.iter().filter(|r| !r.is_valid).count();
    info!("{} valid, {} invalid", reports.len() - failed, failed);

    if let Some(out) = &args.report {
        write_report(out, &reports)?;
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn validate_one(validator: &PositionValidator, path: &Path, expected: TimeOfDay) -> ImageReport {
    let image_path = path.to_string_lossy().into_owned();
    match validator.validate_path(&FileImageSource, path, expected) {
        Ok(detail) => ImageReport {
            image_path,
            is_valid: detail.is_valid(),
            message: detail.message(),
            detail: Some(detail),
            error: None,
        },
        Err(err) => {
            warn!("{}: {err}", path.display());
            ImageReport {
                image_path,
                is_valid: false,
                message: NO_PILL_DETECTED.to_string(),
                detail: None,
                error: Some(error_chain(&err)),
            }
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

fn load_params(path: &Path) -> CliResult<ValidatorParams> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_overlay(
    path: &Path,
    detail: &ValidationReport,
    params: &ValidatorParams,
    dir: &Path,
) -> CliResult<()> {
    let img = image::open(path)?.to_rgb8();
    let out = render_overlay(&img, detail, &params.calibration, &OverlayStyle::default());
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".to_string());
    let out_path = dir.join(format!("{stem}_overlay.png"));
    out.save(&out_path)?;
    info!("overlay written to {}", out_path.display());
    Ok(())
}

fn write_report(path: &Path, reports: &[ImageReport]) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(reports)?)?;
    info!("report written to {}", path.display());
    Ok(())
}
