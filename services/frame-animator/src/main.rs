//! Snow animation frame renderer.
//!
//! Renders one map + surface figure per day of a snow model run.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use frame_animator::{AnimationConfig, CliOverrides, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "frame-animator")]
#[command(about = "Render snow depth animation frames in parallel")]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, env = "SNOW_ANIMATOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: CliOverrides,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_level, args.log_json) {
        eprintln!("failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Run failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_names(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Returns whether every frame was written.
fn run(args: &Args) -> Result<bool> {
    let mut config = match &args.config {
        Some(path) => AnimationConfig::from_file(path)?,
        None => AnimationConfig::default(),
    };
    config.apply(&args.overrides);
    config.expand_paths()?;
    config.validate()?;

    info!(
        snow_root = %config.snow_root.display(),
        terrain = %config.terrain_path.display(),
        output_dir = %config.output_dir.display(),
        workers = config.workers,
        "Starting frame animator"
    );

    netcdf_parser::silence_hdf5_errors();

    let summary = Pipeline::new(config).run()?;
    print!("{}", summary);
    Ok(summary.succeeded())
}
