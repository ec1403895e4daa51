//! `sf-curves` library crate.
//!
//! The binary (`sf`) is a thin wrapper around this library so that:
//!
//! - the survival model, sampling, and session logic are testable without a terminal
//! - the CLI and the TUI share one [`app::session::Session`]

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod input;
pub mod io;
pub mod models;
pub mod plot;
pub mod sampling;
pub mod tui;
