//! Curve sampling.
//!
//! Responsibilities:
//!
//! - generate evenly spaced dose grids over the plotting domain
//! - evaluate the live curve, every stored curve, and the export curve

pub mod grid;
pub mod sampler;

pub use grid::*;
pub use sampler::*;
