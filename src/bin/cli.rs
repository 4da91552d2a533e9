//! CLI for landmark export, makeup, and facial enhancement.
//!
//! Usage:
//!   facepaint --image face.jpg --action landmarks
//!   facepaint --image face.jpg --action makeup --config '{"lipstick": {"color": "#FF0000"}}'
//!   facepaint --image face.jpg --action enhance --detector-cmd ./face-mesh
//!   facepaint --image face.jpg --action makeup --detector-cmd ./face-mesh \
//!       --detector-arg=--action --detector-arg=landmarks --detector-arg=--image

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use facepaint::{
    DetectorCommand, EnhanceConfig, FacePipeline, LandmarkFile, LandmarkProvider, MakeupConfig,
    SidecarFile, DEFAULT_OUTPUT_DIR,
};
use log::{debug, LevelFilter};
use serde::Serialize;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Print the detected landmarks as JSON
    Landmarks,
    /// Apply makeup effects
    Makeup,
    /// Apply eye, nose and lip enhancement
    Enhance,
}

#[derive(Parser, Debug)]
#[command(name = "facepaint")]
#[command(author, version, about = "Landmark-driven makeup and facial enhancement", long_about = None)]
struct Args {
    /// Input image file
    #[arg(long)]
    image: PathBuf,

    /// Action to perform
    #[arg(long, value_enum)]
    action: Action,

    /// JSON configuration for makeup/enhancement
    #[arg(long, conflicts_with = "config_file")]
    config: Option<String>,

    /// Read the JSON configuration from a file
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Landmark document to use instead of the sidecar file
    #[arg(long, conflicts_with = "detector_cmd")]
    landmarks_file: Option<PathBuf>,

    /// External detector, run as `<cmd> [args...] <image>`, printing a landmark document
    #[arg(long)]
    detector_cmd: Option<PathBuf>,

    /// Argument passed to the detector before the image path (repeatable)
    #[arg(long = "detector-arg", value_name = "ARG", requires = "detector_cmd", allow_hyphen_values = true)]
    detector_args: Vec<String>,

    /// Directory for result images
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Result line for makeup and enhance
#[derive(Serialize)]
struct Outcome {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    match args.action {
        Action::Landmarks => match landmarks(&args) {
            Ok(json) => println!("{}", json),
            Err(facepaint::Error::NoFaceDetected) => {
                println!("No face detected");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        Action::Makeup | Action::Enhance => {
            let outcome = match process(&args) {
                Ok(path) => Outcome {
                    success: true,
                    output_path: Some(path.display().to_string()),
                    error: None,
                },
                Err(e) => Outcome {
                    success: false,
                    output_path: None,
                    error: Some(e.to_string()),
                },
            };
            // Serializing a struct of strings and a bool cannot fail.
            println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
            if !outcome.success {
                std::process::exit(1);
            }
        }
    }
}

fn provider(args: &Args) -> Box<dyn LandmarkProvider> {
    if let Some(ref path) = args.landmarks_file {
        debug!("Using landmark file {:?}", path);
        Box::new(LandmarkFile::new(path))
    } else if let Some(ref cmd) = args.detector_cmd {
        debug!("Using detector command {:?} {:?}", cmd, args.detector_args);
        Box::new(
            args.detector_args
                .iter()
                .fold(DetectorCommand::new(cmd), |command, arg| command.arg(arg.as_str())),
        )
    } else {
        debug!("Using sidecar landmark file");
        Box::new(SidecarFile)
    }
}

fn pipeline(args: &Args) -> FacePipeline {
    FacePipeline::new(provider(args)).output_dir(&args.output_dir)
}

fn config_json(args: &Args) -> facepaint::Result<String> {
    match (&args.config, &args.config_file) {
        (Some(json), _) => Ok(json.clone()),
        (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
        (None, None) => Ok("{}".to_string()),
    }
}

fn landmarks(args: &Args) -> facepaint::Result<String> {
    let report = pipeline(args).landmarks(&args.image)?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn process(args: &Args) -> facepaint::Result<PathBuf> {
    let json = config_json(args)?;
    let pipeline = pipeline(args);

    let processed = match args.action {
        Action::Enhance => pipeline.enhance(&args.image, &EnhanceConfig::from_json(&json)?)?,
        _ => pipeline.makeup(&args.image, &MakeupConfig::from_json(&json)?)?,
    };

    for report in &processed.effects {
        if !report.skipped.is_empty() {
            debug!("{} skipped {:?}", report.effect, report.skipped);
        }
    }

    Ok(processed.output_path)
}
