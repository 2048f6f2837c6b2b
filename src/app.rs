//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - installs logging
//! - loads the model once, before any output or UI
//! - dispatches to the TUI or the one-shot commands

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, ModelArgs, PredictArgs, TuiArgs, VehicleArgs};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::logging::LogTarget;
use crate::models::{ObliviousEnsemble, load_model, resolve_model_path};

pub mod pipeline;

/// Entry point for the `mpg` binary.
pub fn run() -> Result<(), AppError> {
    // `mpg` and `mpg --model x.json` behave like `mpg tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
        Command::Features(args) => handle_features(args),
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = AppConfig::load(&args.model);
    crate::logging::init(&config, LogTarget::Interactive)?;

    // A broken artifact stops here; the form is never shown.
    let model = load_configured_model(&config)?;
    crate::tui::run(&model)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load(&args.model);
    crate::logging::init(&config, LogTarget::Stderr)?;

    let model = load_configured_model(&config)?;
    let spec = args.vehicle.to_spec();
    let run = pipeline::run_prediction(&model, &spec)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run)
            .map_err(|e| AppError::new(4, format!("Failed to encode JSON report: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_spec_summary(&run.spec));
        println!("{}", crate::report::format_prediction(&run.prediction, 40));
    }
    Ok(())
}

fn handle_features(args: VehicleArgs) -> Result<(), AppError> {
    let config = AppConfig::load(&ModelArgs::default());
    crate::logging::init(&config, LogTarget::Stderr)?;

    let features = crate::features::transform(&args.to_spec());
    print!("{}", crate::report::format_feature_vector(&features));
    Ok(())
}

/// Resolve the artifact path and load it. Called once per process.
pub fn load_configured_model(config: &AppConfig) -> Result<ObliviousEnsemble, AppError> {
    let path: PathBuf = resolve_model_path(config.model_path.as_deref())?;
    Ok(load_model(&path)?)
}

/// Rewrite argv so `mpg` defaults to `mpg tui`.
///
/// Rules:
/// - `mpg`                      -> `mpg tui`
/// - `mpg --model x ...`        -> `mpg tui --model x ...`
/// - `mpg --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict" | "features");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
