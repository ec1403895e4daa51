//! Sample the survival model over a domain.
//!
//! Three call sites exist and they differ only in grid handling:
//! - live: display resolution, collapsed to `[0.0]` when `E == 0`
//! - history: display resolution for every stored triple, no collapse
//! - export: fixed [`EXPORT_POINTS`] resolution, never collapsed, so the
//!   file always holds one row per grid point

use tracing::debug;

use crate::domain::{Curve, Domain, ParameterTriple};
use crate::models::evaluate_params;
use crate::sampling::linspace;

/// Resolution of exported curves, independent of the display resolution.
pub const EXPORT_POINTS: usize = 250;

/// Sample the live (currently edited) curve.
pub fn sample_live(domain: Domain, count: usize, params: &ParameterTriple) -> Curve {
    let doses = if params.e == 0.0 {
        vec![0.0]
    } else {
        linspace(domain.left, domain.right, count)
    };
    let survivals = evaluate_params(&doses, params);
    debug!(label = %params.label(), n = doses.len(), "sampled live curve");
    Curve::new(*params, doses, survivals)
}

/// Re-sample every stored triple at full display resolution.
pub fn sample_history(domain: Domain, count: usize, history: &[ParameterTriple]) -> Vec<Curve> {
    history
        .iter()
        .map(|params| {
            let doses = linspace(domain.left, domain.right, count);
            let survivals = evaluate_params(&doses, params);
            Curve::new(*params, doses, survivals)
        })
        .collect()
}

/// Sample the live curve at export resolution.
pub fn sample_export(domain: Domain, params: &ParameterTriple) -> Curve {
    let doses = linspace(domain.left, domain.right, EXPORT_POINTS);
    let survivals = evaluate_params(&doses, params);
    Curve::new(*params, doses, survivals)
}
