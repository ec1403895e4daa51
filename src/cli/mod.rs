//! Command-line parsing for the survival-fraction curve tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! model, sampling, and session code. Every session knob can also be set via an
//! `SF_*` environment variable (or a `.env` file).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    DEFAULT_FLOAT_SHIFT, DEFAULT_LEFT_BORDER, DEFAULT_POINTS_COUNT, DEFAULT_RIGHT_COEFFICIENT,
    DEFAULT_SLIDER_MAX, DEFAULT_SLIDER_POSITIONS, SessionConfig, SliderRange,
};
use crate::io::DEFAULT_EXPORT_PATH;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sf", version, about = "Survival-fraction dose-response curve explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI.
    Tui(TuiArgs),
    /// Print the sampled curve for one parameter triple as `dose survival` lines.
    Eval(CurveArgs),
    /// Write the export-resolution curve to a file.
    Export(ExportArgs),
    /// Render an ASCII plot of the data and one or more curves.
    Plot(PlotArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct SessionArgs {
    /// Point file (.txt or .csv) to use instead of the built-in dataset.
    #[arg(short = 'p', long, value_name = "FILE")]
    pub points: Option<PathBuf>,

    /// Left edge of the dose domain.
    #[arg(long, env = "SF_LEFT_BORDER", default_value_t = DEFAULT_LEFT_BORDER)]
    pub left_border: f64,

    /// Right edge of the dose domain as a multiple of the largest dose.
    #[arg(long, env = "SF_RIGHT_COEFFICIENT", default_value_t = DEFAULT_RIGHT_COEFFICIENT)]
    pub right_coefficient: f64,

    /// Number of grid points for displayed curves.
    #[arg(short = 'n', long = "count", env = "SF_POINTS", default_value_t = DEFAULT_POINTS_COUNT)]
    pub points_count: usize,

    /// Slider position divisor (positions are integers).
    #[arg(long, env = "SF_FLOAT_SHIFT", default_value_t = DEFAULT_FLOAT_SHIFT, value_parser = parse_positive_f64)]
    pub float_shift: f64,

    /// Largest slider position.
    #[arg(
        long,
        env = "SF_SLIDER_MAX",
        default_value_t = DEFAULT_SLIDER_MAX,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    pub slider_max: i64,
}

fn parse_positive_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("invalid number '{raw}': {e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive number, got {raw}"))
    }
}

impl SessionArgs {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            left_border: self.left_border,
            right_coefficient: self.right_coefficient,
            points_count: self.points_count,
            float_shift: self.float_shift,
            slider_range: SliderRange {
                min: 0,
                max: self.slider_max,
            },
            initial_positions: DEFAULT_SLIDER_POSITIONS,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Where the `x` key writes the export file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_EXPORT_PATH)]
    pub out: PathBuf,
}

/// Parameter values, validated like the UI text fields (invalid → 0).
#[derive(Debug, Args, Clone)]
pub struct ParamArgs {
    /// Rate coefficient A.
    #[arg(short = 'a', default_value = "0.3", allow_hyphen_values = true)]
    pub a: String,

    /// Exponent E.
    #[arg(short = 'e', default_value = "2", allow_hyphen_values = true)]
    pub e: String,

    /// Time modifier T.
    #[arg(short = 't', default_value = "1", allow_hyphen_values = true)]
    pub t: String,
}

#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(flatten)]
    pub params: ParamArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Output file for `dose survival` lines.
    #[arg(short = 'o', long, value_name = "FILE", default_value = DEFAULT_EXPORT_PATH)]
    pub out: PathBuf,

    /// Also write the curve and stored triples as JSON.
    #[arg(long = "curve-json", value_name = "JSON")]
    pub curve_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(flatten)]
    pub params: ParamArgs,

    /// Additional comparison curve as `A,E,T` (repeatable).
    #[arg(long = "add", value_name = "A,E,T")]
    pub add: Vec<String>,

    /// Plot a curve JSON written by `sf export --curve-json` instead.
    #[arg(long, value_name = "JSON", conflicts_with = "add")]
    pub curve: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plot_with_added_curves() {
        let cli = Cli::try_parse_from([
            "sf", "plot", "-a", "0.5", "-e", "3", "--add", "0.3,2,1", "--add", "1,1,1", "--width", "40",
        ])
        .unwrap();
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.params.a, "0.5");
        assert_eq!(args.params.t, "1");
        assert_eq!(args.add, vec!["0.3,2,1", "1,1,1"]);
        assert_eq!(args.width, 40);
    }

    #[test]
    fn session_args_build_config() {
        let cli = Cli::try_parse_from(["sf", "eval", "--count", "10", "--slider-max", "500"]).unwrap();
        let Command::Eval(args) = cli.command else {
            panic!("expected eval");
        };
        let config = args.session.session_config();
        assert_eq!(config.points_count, 10);
        assert_eq!(config.slider_range, SliderRange { min: 0, max: 500 });
        assert_eq!(config.initial_positions, DEFAULT_SLIDER_POSITIONS);
    }

    #[test]
    fn rejects_negative_slider_max_and_non_positive_shift() {
        for args in [
            ["sf", "eval", "--slider-max=-5"],
            ["sf", "eval", "--float-shift=0"],
            ["sf", "eval", "--float-shift=-2"],
        ] {
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{err}");
        }

        let cli = Cli::try_parse_from(["sf", "eval", "--slider-max=0", "--float-shift=0.5"]).unwrap();
        let Command::Eval(args) = cli.command else {
            panic!("expected eval");
        };
        assert_eq!(args.session.session_config().slider_range.max, 0);
        assert_eq!(args.session.session_config().float_shift, 0.5);
    }
}
