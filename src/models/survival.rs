//! Survival fraction as a function of dose.
//!
//! For each dose `x`:
//!
//! ```text
//! S(x) = (1 + A·x/E · (1 − e^(−T)))^E / e^(A·x)
//! ```
//!
//! Two conventions apply on top of the formula:
//! - an exponent of exactly zero collapses the curve to identically zero
//! - results below [`SENTINEL_THRESHOLD`] are replaced with NaN, meaning
//!   "below the plottable range" rather than a computed near-zero value
//!
//! A negative base with a fractional exponent follows IEEE `powf` and yields NaN.

use crate::domain::ParameterTriple;

/// Survival values below this are suppressed (replaced with NaN).
pub const SENTINEL_THRESHOLD: f64 = 1e-6;

/// Evaluate the model elementwise over `doses`.
pub fn evaluate(doses: &[f64], a: f64, e: f64, t: f64) -> Vec<f64> {
    if e == 0.0 {
        return vec![0.0; doses.len()];
    }

    let time_factor = 1.0 - (-t).exp();
    doses
        .iter()
        .map(|&x| {
            let y = (1.0 + a * x / e * time_factor).powf(e) / (a * x).exp();
            suppress_below_threshold(y)
        })
        .collect()
}

/// Evaluate with a parameter triple.
pub fn evaluate_params(doses: &[f64], params: &ParameterTriple) -> Vec<f64> {
    evaluate(doses, params.a, params.e, params.t)
}

fn suppress_below_threshold(y: f64) -> f64 {
    if y < SENTINEL_THRESHOLD { f64::NAN } else { y }
}
