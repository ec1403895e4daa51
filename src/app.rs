//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the tracing subscriber
//! - builds a [`Session`] from the built-in or imported dataset
//! - dispatches to the TUI or to one of the print/export commands

use std::fs::File;
use std::sync::Mutex;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CurveArgs, ExportArgs, ParamArgs, PlotArgs, SessionArgs, TuiArgs};
use crate::domain::{ParamKind, ParameterTriple};
use crate::error::AppError;
use crate::io::{FormatRegistry, read_curve_json};

pub mod session;

use session::Session;

/// Environment variable holding the tracing filter (e.g. `SF_LOG=debug`).
pub const LOG_ENV: &str = "SF_LOG";

/// Log file used in TUI mode, where stderr would corrupt the screen.
const TUI_LOG_FILE: &str = "sf.log";

/// Entry point for the `sf` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // We want `sf` and `sf -p data.txt` to behave like `sf tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Eval(args) => {
            init_stderr_logging();
            handle_eval(args)
        }
        Command::Export(args) => {
            init_stderr_logging();
            handle_export(args)
        }
        Command::Plot(args) => {
            init_stderr_logging();
            handle_plot(args)
        }
    }
}

fn init_stderr_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// In TUI mode we only log when asked to, and only to a file.
fn init_tui_logging() -> Result<(), AppError> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(TUI_LOG_FILE)
        .map_err(|e| AppError::new(2, format!("Failed to create log file '{TUI_LOG_FILE}': {e}")))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    init_tui_logging()?;
    let session = build_session(&args.session)?;
    crate::tui::run(session, args.out)
}

fn handle_eval(args: CurveArgs) -> Result<(), AppError> {
    let mut session = build_session(&args.session)?;
    session.set_params(params_from_args(&args.params));

    for (dose, survival) in session.scene().live.points() {
        println!("{dose} {survival}");
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let mut session = build_session(&args.session)?;
    session.set_params(params_from_args(&args.params));
    session.draw_replace();

    let curve = session.export(&args.out)?;
    println!("Export complete: {} ({} rows)", args.out.display(), curve.len());

    if let Some(path) = &args.curve_json {
        session.export_json(path)?;
        println!("Curve JSON: {}", path.display());
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    if let Some(path) = &args.curve {
        let curve = read_curve_json(path)?;
        println!("{}", crate::plot::render_curve_file_plot(&curve, args.width, args.height));
        return Ok(());
    }

    let mut session = build_session(&args.session)?;
    let extra = args
        .add
        .iter()
        .map(|raw| parse_triple(raw))
        .collect::<Result<Vec<_>, _>>()?;

    // Stored curves first, each committed with "add", then the live triple.
    for (idx, params) in extra.iter().enumerate() {
        session.set_params(*params);
        if idx == 0 {
            session.draw_replace();
        } else {
            session.draw_add();
        }
    }
    session.set_params(params_from_args(&args.params));
    if !extra.is_empty() {
        session.draw_add();
    }

    let plot = crate::plot::render_scene_plot(
        session.scene(),
        session.points(),
        session.domain(),
        args.width,
        args.height,
    );
    println!("{plot}");
    Ok(())
}

/// Build a session from the built-in dataset or `--points`.
fn build_session(args: &SessionArgs) -> Result<Session, AppError> {
    let config = args.session_config();
    let mut session = Session::new(config, crate::config::default_points())?;
    if let Some(path) = &args.points {
        let report = session.import(path, &FormatRegistry::default())?;
        if report.skipped > 0 {
            warn!(path = %path.display(), skipped = report.skipped, "skipped malformed rows");
        }
    }
    Ok(session)
}

fn params_from_args(args: &ParamArgs) -> ParameterTriple {
    let mut params = ParameterTriple::default();
    for (kind, text) in [(ParamKind::A, &args.a), (ParamKind::E, &args.e), (ParamKind::T, &args.t)] {
        params.set(kind, param_value(kind, text));
    }
    params
}

fn param_value(kind: ParamKind, text: &str) -> f64 {
    crate::input::parse_param_text(text).unwrap_or_else(|| {
        warn!(param = kind.display_name(), text, "invalid parameter, using 0");
        0.0
    })
}

/// Parse an `A,E,T` triple; each part follows the parameter text rules.
fn parse_triple(raw: &str) -> Result<ParameterTriple, AppError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [a, e, t] = parts.as_slice() else {
        return Err(AppError::new(
            2,
            format!("Expected A,E,T for --add (got: {raw})"),
        ));
    };
    Ok(ParameterTriple::new(
        param_value(ParamKind::A, a),
        param_value(ParamKind::E, e),
        param_value(ParamKind::T, t),
    ))
}

/// Rewrite argv so `sf` defaults to `sf tui`.
///
/// Rules:
/// - `sf`                      -> `sf tui`
/// - `sf -p data.txt ...`      -> `sf tui -p data.txt ...`
/// - `sf --help/--version/-h`  -> unchanged (show top-level help/version)
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

    let is_subcommand = matches!(arg1.as_str(), "tui" | "eval" | "export" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_tui() {
        assert_eq!(rewrite_args(argv(&["sf"])), argv(&["sf", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["sf", "-p", "d.txt"])),
            argv(&["sf", "tui", "-p", "d.txt"])
        );
        assert_eq!(rewrite_args(argv(&["sf", "--help"])), argv(&["sf", "--help"]));
        assert_eq!(rewrite_args(argv(&["sf", "plot"])), argv(&["sf", "plot"]));
    }

    #[test]
    fn triple_parsing() {
        assert_eq!(parse_triple("0.3, 2, 1").unwrap(), ParameterTriple::new(0.3, 2.0, 1.0));
        assert_eq!(parse_triple("x,2,1").unwrap(), ParameterTriple::new(0.0, 2.0, 1.0));
        assert!(parse_triple("1,2").is_err());
    }

    #[test]
    fn invalid_cli_params_become_zero() {
        let args = ParamArgs {
            a: "-0.5".to_string(),
            e: "2.5".to_string(),
            t: "1e2".to_string(),
        };
        assert_eq!(params_from_args(&args), ParameterTriple::new(0.0, 2.5, 0.0));
    }
}
