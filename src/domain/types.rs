use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One model configuration `(A, E, T)`.
///
/// - `a`: rate-like coefficient (per Gy)
/// - `e`: exponent
/// - `t`: time-like modifier
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterTriple {
    pub a: f64,
    pub e: f64,
    pub t: f64,
}

impl ParameterTriple {
    pub fn new(a: f64, e: f64, t: f64) -> Self {
        Self { a, e, t }
    }

    /// Legend/export label built from the literal parameter values.
    pub fn label(&self) -> String {
        format!("{} {} {}", self.a, self.e, self.t)
    }

    pub fn get(&self, kind: ParamKind) -> f64 {
        match kind {
            ParamKind::A => self.a,
            ParamKind::E => self.e,
            ParamKind::T => self.t,
        }
    }

    pub fn set(&mut self, kind: ParamKind, value: f64) {
        match kind {
            ParamKind::A => self.a = value,
            ParamKind::E => self.e = value,
            ParamKind::T => self.t = value,
        }
    }
}

/// Which of the three model parameters an input controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    A,
    E,
    T,
}

impl ParamKind {
    pub const ALL: [ParamKind; 3] = [ParamKind::A, ParamKind::E, ParamKind::T];

    pub fn display_name(self) -> &'static str {
        match self {
            ParamKind::A => "A",
            ParamKind::E => "E",
            ParamKind::T => "T",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ParamKind::A => 0,
            ParamKind::E => 1,
            ParamKind::T => 2,
        }
    }
}

/// Observed `(dose, survival)` pairs, stored as two parallel sequences.
///
/// The sequences always have equal length; values are not range-checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DosePoints {
    doses: Vec<f64>,
    survivals: Vec<f64>,
}

impl DosePoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let mut points = Self::new();
        for &(dose, survival) in pairs {
            points.push(dose, survival);
        }
        points
    }

    pub fn push(&mut self, dose: f64, survival: f64) {
        self.doses.push(dose);
        self.survivals.push(survival);
    }

    pub fn doses(&self) -> &[f64] {
        &self.doses
    }

    pub fn survivals(&self) -> &[f64] {
        &self.survivals
    }

    pub fn len(&self) -> usize {
        self.doses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.doses.iter().copied().zip(self.survivals.iter().copied())
    }

    /// Largest dose, ignoring NaN entries. `None` for an empty set.
    pub fn max_dose(&self) -> Option<f64> {
        self.doses
            .iter()
            .copied()
            .filter(|d| !d.is_nan())
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |m| m.max(d))))
    }
}

/// Closed dose interval `[left, right]` every curve is sampled over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub left: f64,
    pub right: f64,
}

impl Domain {
    /// `right = max(doses) * coefficient`; `None` when there are no doses.
    pub fn from_points(points: &DosePoints, left: f64, coefficient: f64) -> Option<Self> {
        let max = points.max_dose()?;
        Some(Self {
            left,
            right: max * coefficient,
        })
    }
}

/// Whether a sampled survival value can be drawn on a log axis.
///
/// Values suppressed by the evaluator are NaN and fail this check, as do
/// zeros from the degenerate `E = 0` curve.
pub fn is_plottable(survival: f64) -> bool {
    survival.is_finite() && survival > 0.0
}

/// A sampled curve: dose grid, evaluated survival fractions, and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub params: ParameterTriple,
    pub label: String,
    pub doses: Vec<f64>,
    pub survivals: Vec<f64>,
}

impl Curve {
    pub fn new(params: ParameterTriple, doses: Vec<f64>, survivals: Vec<f64>) -> Self {
        Self {
            label: params.label(),
            params,
            doses,
            survivals,
        }
    }

    pub fn len(&self) -> usize {
        self.doses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doses.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.doses.iter().copied().zip(self.survivals.iter().copied())
    }

    /// Runs of consecutive plottable points. A suppressed sample ends the
    /// current run, so line drawing leaves a gap instead of bridging it.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut out: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut current = Vec::new();
        for (x, y) in self.points() {
            if x.is_finite() && is_plottable(y) {
                current.push((x, y));
            } else if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

/// What the chart currently shows: the live curve plus any stored curves
/// redrawn by the last "add graph" action.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub live: Curve,
    pub overlays: Vec<Curve>,
}

/// A saved curve file (JSON).
///
/// Suppressed survival values are written as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub exported_at: DateTime<Local>,
    pub params: ParameterTriple,
    pub history: Vec<ParameterTriple>,
    pub domain: Domain,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub dose: Vec<f64>,
    pub survival: Vec<Option<f64>>,
}

impl CurveGrid {
    pub fn from_curve(curve: &Curve) -> Self {
        Self {
            dose: curve.doses.clone(),
            survival: curve
                .survivals
                .iter()
                .map(|&y| if y.is_nan() { None } else { Some(y) })
                .collect(),
        }
    }

    /// Back to the in-memory representation (`null` becomes NaN).
    pub fn to_curve(&self, params: ParameterTriple) -> Curve {
        Curve::new(
            params,
            self.dose.clone(),
            self.survival.iter().map(|y| y.unwrap_or(f64::NAN)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_literal_values() {
        let p = ParameterTriple::new(0.35, 2.0, 1.5);
        assert_eq!(p.label(), "0.35 2 1.5");
    }

    #[test]
    fn max_dose_skips_nan_and_handles_empty() {
        assert_eq!(DosePoints::new().max_dose(), None);
        let points = DosePoints::from_pairs(&[(1.0, 0.5), (f64::NAN, 0.1), (6.0, 0.01)]);
        assert_eq!(points.max_dose(), Some(6.0));
    }

    #[test]
    fn domain_scales_max_dose() {
        let points = DosePoints::from_pairs(&[(2.0, 0.5), (8.0, 0.01)]);
        let domain = Domain::from_points(&points, 0.0, 1.1).unwrap();
        assert_eq!(domain.left, 0.0);
        assert!((domain.right - 8.8).abs() < 1e-12);
    }

    #[test]
    fn segments_split_at_suppressed_samples() {
        let curve = Curve::new(
            ParameterTriple::new(1.0, 1.0, 1.0),
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            vec![1.0, 0.5, f64::NAN, f64::NAN, 0.2, 0.1],
        );
        assert_eq!(
            curve.segments(),
            vec![vec![(0.0, 1.0), (1.0, 0.5)], vec![(4.0, 0.2), (5.0, 0.1)]]
        );

        let none = Curve::new(ParameterTriple::new(1.0, 0.0, 1.0), vec![0.0, 1.0], vec![0.0, 0.0]);
        assert!(none.segments().is_empty());
    }

    #[test]
    fn grid_maps_nan_to_null() {
        let curve = Curve::new(
            ParameterTriple::new(1.0, 1.0, 1.0),
            vec![0.0, 1.0],
            vec![1.0, f64::NAN],
        );
        let grid = CurveGrid::from_curve(&curve);
        assert_eq!(grid.survival, vec![Some(1.0), None]);
        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.contains("null"), "{json}");

        let back = grid.to_curve(curve.params);
        assert_eq!(back.survivals[0], 1.0);
        assert!(back.survivals[1].is_nan());
    }
}
