//! Export a resampled curve as plain `dose survival` lines.
//!
//! The output is read back by the `.txt` point parser, so an exported curve can
//! be re-imported as data.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::Curve;
use crate::error::AppError;

/// Default export file name (relative to the working directory).
pub const DEFAULT_EXPORT_PATH: &str = "points.txt";

/// Write one `"{dose} {survival}"` line per curve point (UTF-8).
///
/// Suppressed values are written as `NaN`.
pub fn write_points_txt(path: &Path, curve: &Curve) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export file '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    for (dose, survival) in curve.points() {
        writeln!(out, "{dose} {survival}")
            .map_err(|e| AppError::new(2, format!("Failed to write export row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export file: {e}")))?;

    info!(path = %path.display(), label = %curve.label, rows = curve.len(), "exported curve");
    Ok(())
}
