//! Command-line front end: measures one photograph using landmarks exported by
//! an external pose service.
//!
//! Usage:
//!   attribute-estimator capture.jpg                        # reads capture.landmarks.json
//!   attribute-estimator capture.jpg -l pose.json --json    # JSON output
//!   attribute-estimator capture.jpg --calibration 0.12     # override the factor

use attribute_estimator::{
    AppError, CalibrationConfig, Configuration, ConsoleReporter, LandmarkExportDetector,
    MeasurementPipeline, OutputFormat,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "attribute-estimator")]
#[command(author, version, about = "Estimate standing height from a photograph", long_about = None)]
struct Args {
    /// Captured photograph
    #[arg(required = true)]
    image: PathBuf,

    /// Landmark export from the pose service (default: <image>.landmarks.json)
    #[arg(short, long)]
    landmarks: Option<PathBuf>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pixels-to-centimeters factor, overrides the configuration
    #[arg(long)]
    calibration: Option<f32>,

    /// Per-axis downsampling factor, overrides the configuration
    #[arg(long)]
    sample_size: Option<u32>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether a height estimate was produced.
async fn run(args: Args) -> Result<bool, AppError> {
    let mut configuration = Configuration::load(args.config.as_deref())?;
    if let Some(factor) = args.calibration {
        configuration = configuration.with_calibration(CalibrationConfig::new(factor)?);
    }
    if let Some(sample_size) = args.sample_size {
        configuration = configuration.with_sample_size(sample_size);
    }
    if args.verbose {
        configuration = configuration.with_log_level("debug");
    }
    init_logging(configuration.log_level.parse().unwrap_or(Level::INFO));

    let landmarks = args
        .landmarks
        .unwrap_or_else(|| LandmarkExportDetector::sidecar_for(&args.image));
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let pipeline = MeasurementPipeline::builder(configuration)
        .detector(LandmarkExportDetector::new(landmarks))
        .reporter(ConsoleReporter::new(format))
        .build()?;

    let handle = pipeline.spawn(args.image);
    tokio::select! {
        outcome = handle.outcome() => {
            let outcome = outcome
                .ok_or_else(|| AppError::Pipeline("Measurement was abandoned".to_string()))?;
            Ok(outcome.is_ok())
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, abandoning measurement");
            Ok(false)
        }
    }
}
