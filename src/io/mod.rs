//! Input/output helpers.
//!
//! - point file parsing for `.txt` and `.csv` (`points`)
//! - extension → parser lookup (`registry`)
//! - resampled curve export as `dose survival` lines (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod points;
pub mod registry;

pub use curve::*;
pub use export::*;
pub use points::*;
pub use registry::*;
