//! Command-line parsing for the MPG predictor.
//!
//! Argument parsing and command dispatch stay separate from the model and the
//! feature code. Numeric vehicle flags are range-checked here, the CLI's
//! counterpart of the bounded sliders in the TUI.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Cylinders, Origin, VehicleSpec, bounds};

const MODEL_LOCATION_HELP: &str = "\
The model artifact is read from --model, then $MPG_MODEL_PATH, then
`mpg_predictor.json` next to the `mpg` executable. A demo artifact ships in
`assets/mpg_predictor.json`: copy it beside the binary (for example into
target/debug/) or pass `--model assets/mpg_predictor.json`.";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "mpg",
    version,
    about = "Auto MPG Predictor: fuel efficiency from vehicle specs",
    after_help = MODEL_LOCATION_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form (default).
    Tui(TuiArgs),
    /// Predict MPG for one vehicle and print the result.
    Predict(PredictArgs),
    /// Print the model input derived from a vehicle, in model order.
    Features(VehicleArgs),
}

/// Where to find the model artifact and where to log.
#[derive(Debug, Args, Clone, Default)]
pub struct ModelArgs {
    /// Model artifact (JSON). Defaults to $MPG_MODEL_PATH, then
    /// `mpg_predictor.json` next to the executable.
    #[arg(long, value_name = "JSON")]
    pub model: Option<PathBuf>,

    /// Append logs to this file (overrides $MPG_LOG_FILE).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub vehicle: VehicleArgs,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Print a JSON report (inputs, features, raw and clamped prediction).
    #[arg(long)]
    pub json: bool,
}

/// Vehicle attributes. Defaults match the form's initial position.
#[derive(Debug, Args, Clone)]
pub struct VehicleArgs {
    /// Weight in lbs (1500–5200).
    #[arg(long, default_value_t = 3000.0, value_parser = parse_weight)]
    pub weight: f64,

    /// Horsepower (40–250).
    #[arg(long, default_value_t = 130.0, value_parser = parse_horsepower)]
    pub horsepower: f64,

    /// Displacement in cubic inches (60–460).
    #[arg(long, default_value_t = 200.0, value_parser = parse_displacement)]
    pub displacement: f64,

    /// 0–60 time in seconds (8.0–25.0).
    #[arg(long, default_value_t = 15.0, value_parser = parse_acceleration)]
    pub acceleration: f64,

    /// Two-digit model year, 70 = 1970 (70–82).
    #[arg(long, default_value_t = 79, value_parser = clap::value_parser!(u8).range(70..=82))]
    pub model_year: u8,

    /// Cylinder count.
    #[arg(long, value_enum, default_value_t = Cylinders::Four)]
    pub cylinders: Cylinders,

    /// Region of manufacture.
    #[arg(long, value_enum, default_value_t = Origin::Usa)]
    pub origin: Origin,
}

impl VehicleArgs {
    pub fn to_spec(&self) -> VehicleSpec {
        VehicleSpec {
            weight: self.weight,
            horsepower: self.horsepower,
            displacement: self.displacement,
            acceleration: self.acceleration,
            model_year: self.model_year,
            cylinders: self.cylinders,
            origin: self.origin,
        }
    }
}

fn parse_weight(s: &str) -> Result<f64, String> {
    parse_bounded(s, &bounds::WEIGHT)
}

fn parse_horsepower(s: &str) -> Result<f64, String> {
    parse_bounded(s, &bounds::HORSEPOWER)
}

fn parse_displacement(s: &str) -> Result<f64, String> {
    parse_bounded(s, &bounds::DISPLACEMENT)
}

fn parse_acceleration(s: &str) -> Result<f64, String> {
    parse_bounded(s, &bounds::ACCELERATION)
}

fn parse_bounded(s: &str, range: &RangeInclusive<f64>) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if !(value.is_finite() && range.contains(&value)) {
        return Err(format!(
            "{value} is outside {}..={}",
            range.start(),
            range.end()
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_defaults() {
        let cli = Cli::try_parse_from(["mpg", "features"]).unwrap();
        let Command::Features(args) = cli.command else {
            panic!("expected features");
        };
        assert_eq!(args.to_spec(), VehicleSpec::default());
    }

    #[test]
    fn parses_full_vehicle() {
        let cli = Cli::try_parse_from([
            "mpg",
            "predict",
            "--weight",
            "2130",
            "--horsepower",
            "65",
            "--displacement",
            "97",
            "--acceleration",
            "18.6",
            "--model-year",
            "81",
            "--cylinders",
            "5",
            "--origin",
            "europe",
            "--json",
            "--model",
            "custom.json",
        ])
        .unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let spec = args.vehicle.to_spec();
        assert_eq!(spec.weight, 2130.0);
        assert_eq!(spec.acceleration, 18.6);
        assert_eq!(spec.cylinders, Cylinders::Five);
        assert_eq!(spec.origin, Origin::Europe);
        assert!(args.json);
        assert_eq!(args.model.model, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        assert!(Cli::try_parse_from(["mpg", "features", "--horsepower", "20"]).is_err());
        assert!(Cli::try_parse_from(["mpg", "features", "--model-year", "83"]).is_err());
        assert!(Cli::try_parse_from(["mpg", "features", "--cylinders", "7"]).is_err());
        assert!(Cli::try_parse_from(["mpg", "features", "--weight", "NaN"]).is_err());
    }

    #[test]
    fn help_explains_where_the_model_lives() {
        use clap::CommandFactory;

        let help = Cli::command().render_help().to_string();
        assert!(help.contains("MPG_MODEL_PATH"), "got {help}");
        assert!(help.contains("assets/mpg_predictor.json"), "got {help}");
    }

    #[test]
    fn bound_errors_name_the_range() {
        let err = parse_bounded("7.5", &bounds::ACCELERATION).unwrap_err();
        assert!(err.contains("8..=25"), "got {err}");
        assert_eq!(parse_bounded(" 8.0 ", &bounds::ACCELERATION), Ok(8.0));
    }
}
