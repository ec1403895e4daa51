//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a session's live curve:
//! - the `(A, E, T)` triple and the stored comparison triples
//! - the dose domain it was sampled over
//! - the export-resolution grid, with suppressed values as `null`
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::domain::{Curve, CurveFile, CurveGrid, Domain, ParameterTriple};
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    curve: &Curve,
    history: &[ParameterTriple],
    domain: Domain,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let out = CurveFile {
        tool: "sf".to_string(),
        exported_at: Local::now(),
        params: curve.params,
        history: history.to_vec(),
        domain,
        grid: CurveGrid::from_curve(curve),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid curve JSON: {e}")))?;
    if curve.grid.dose.len() != curve.grid.survival.len() {
        return Err(AppError::new(
            2,
            format!(
                "Invalid curve JSON: {} doses but {} survival values",
                curve.grid.dose.len(),
                curve.grid.survival.len()
            ),
        ));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::sample_export;

    #[test]
    fn saved_curve_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.json");

        let domain = Domain { left: 0.0, right: 8.8 };
        let params = ParameterTriple::new(2.0, 1.0, 0.0);
        let curve = sample_export(domain, &params);
        let history = [ParameterTriple::new(0.3, 2.0, 1.0)];
        write_curve_json(&path, &curve, &history, domain).unwrap();

        let file = read_curve_json(&path).unwrap();
        assert_eq!(file.tool, "sf");
        assert_eq!(file.params, params);
        assert_eq!(file.history, history.to_vec());
        assert_eq!(file.domain, domain);
        assert_eq!(file.grid.dose.len(), curve.len());
        // e^(−2·8.8) is suppressed and stored as null.
        assert_eq!(file.grid.survival.last(), Some(&None));
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"tool":"sf","exported_at":"2026-01-01T00:00:00+00:00",
                "params":{"a":1.0,"e":1.0,"t":1.0},"history":[],
                "domain":{"left":0.0,"right":1.0},
                "grid":{"dose":[0.0,1.0],"survival":[1.0]}}"#,
        )
        .unwrap();
        let err = read_curve_json(&path).err().unwrap();
        assert!(err.message().contains("2 doses"), "{err}");
    }
}
