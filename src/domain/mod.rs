//! Domain types shared by the evaluator, the sampler, the session, and the
//! front-ends.
//!
//! This module defines:
//!
//! - model parameters (`ParameterTriple`, `ParamKind`)
//! - observed data (`DosePoints`) and the plotting domain derived from it (`Domain`)
//! - sampled output (`Curve`, `Scene`) and the saved-curve schema (`CurveFile`)

pub mod types;

pub use types::*;
