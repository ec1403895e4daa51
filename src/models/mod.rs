//! Survival-fraction model.
//!
//! The model is a small, pure function so the sampler, the exporter, and the
//! front-ends can all share it.

pub mod survival;

pub use survival::*;
