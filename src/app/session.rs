//! Session state shared by the CLI and TUI front-ends.
//!
//! A [`Session`] owns everything the presentation layer would otherwise keep
//! in widgets: the three parameter inputs, the [`ParameterStore`] (live triple
//! plus committed history), the observed dataset, its dose domain, and the
//! scene currently on screen. Front-ends only read and write through it.

use std::path::Path;

use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::domain::{Curve, DosePoints, Domain, ParamKind, ParameterTriple, Scene};
use crate::error::AppError;
use crate::input::{ParamField, TextCommit};
use crate::io::{FormatRegistry, ParsedPoints, write_curve_json, write_points_txt};
use crate::sampling::{sample_export, sample_history, sample_live};

/// The live triple plus the committed comparison curves.
///
/// Editing only ever touches `live`; `history` changes only through the two
/// commit transitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    live: ParameterTriple,
    history: Vec<ParameterTriple>,
}

impl ParameterStore {
    pub fn new(live: ParameterTriple) -> Self {
        Self {
            live,
            history: Vec::new(),
        }
    }

    pub fn live(&self) -> ParameterTriple {
        self.live
    }

    pub fn history(&self) -> &[ParameterTriple] {
        &self.history
    }

    pub fn set(&mut self, kind: ParamKind, value: f64) {
        self.live.set(kind, value);
    }

    /// HISTORY = [live].
    pub fn commit_replace(&mut self) {
        self.history.clear();
        self.history.push(self.live);
    }

    /// HISTORY += [live].
    pub fn commit_add(&mut self) {
        self.history.push(self.live);
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub points: usize,
    pub skipped: usize,
    pub domain: Domain,
}

pub struct Session {
    config: SessionConfig,
    fields: [ParamField; 3],
    store: ParameterStore,
    points: DosePoints,
    domain: Domain,
    scene: Scene,
}

impl Session {
    /// Start a session over `points`, with inputs at their initial positions.
    ///
    /// Fails when `points` is empty, since no domain can be derived from it.
    pub fn new(config: SessionConfig, points: DosePoints) -> Result<Self, AppError> {
        config.validate()?;
        let domain = domain_for(&config, &points)?;
        let fields = ParamKind::ALL.map(|kind| {
            ParamField::new(
                config.initial_position(kind),
                config.slider_range,
                config.float_shift,
            )
        });

        let mut store = ParameterStore::default();
        for kind in ParamKind::ALL {
            store.set(kind, fields[kind.index()].value());
        }

        let scene = Scene {
            live: sample_live(domain, config.points_count, &store.live()),
            overlays: Vec::new(),
        };

        Ok(Self {
            config,
            fields,
            store,
            points,
            domain,
            scene,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn field(&self, kind: ParamKind) -> &ParamField {
        &self.fields[kind.index()]
    }

    pub fn params(&self) -> ParameterTriple {
        self.store.live()
    }

    pub fn history(&self) -> &[ParameterTriple] {
        self.store.history()
    }

    pub fn points(&self) -> &DosePoints {
        &self.points
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Move a parameter slider by `delta` positions.
    pub fn step_param(&mut self, kind: ParamKind, delta: i64) {
        self.fields[kind.index()].step(delta);
        self.sync_param(kind);
    }

    /// Set a parameter to an exact value, bypassing slider clamping.
    pub fn set_param(&mut self, kind: ParamKind, value: f64) {
        self.fields[kind.index()].set_value(value);
        self.sync_param(kind);
    }

    /// Set all three parameters.
    pub fn set_params(&mut self, params: ParameterTriple) {
        for kind in ParamKind::ALL {
            self.set_param(kind, params.get(kind));
        }
    }

    /// Commit typed text for a parameter.
    pub fn commit_param_text(&mut self, kind: ParamKind, text: &str) -> TextCommit {
        let outcome = self.fields[kind.index()].commit_text(text);
        self.sync_param(kind);
        outcome
    }

    /// "Print graph": show the live curve and the data only, then make the
    /// live triple the sole stored curve.
    pub fn draw_replace(&mut self) -> &Scene {
        self.scene = Scene {
            live: self.live_curve(),
            overlays: Vec::new(),
        };
        self.store.commit_replace();
        info!(label = %self.params().label(), "replaced stored curves");
        &self.scene
    }

    /// "Add graph": show the live curve over every stored curve, then append
    /// the live triple to the stored curves.
    pub fn draw_add(&mut self) -> &Scene {
        self.scene = Scene {
            live: self.live_curve(),
            overlays: sample_history(self.domain, self.config.points_count, self.store.history()),
        };
        self.store.commit_add();
        info!(
            label = %self.params().label(),
            stored = self.store.history().len(),
            "added stored curve"
        );
        &self.scene
    }

    /// Replace the dataset and recompute the domain.
    ///
    /// An empty dataset is rejected and the session is left unchanged. On
    /// success the chart shows the live curve without overlays.
    pub fn replace_points(&mut self, points: DosePoints) -> Result<Domain, AppError> {
        let domain = domain_for(&self.config, &points)?;
        self.points = points;
        self.domain = domain;
        self.scene = Scene {
            live: self.live_curve(),
            overlays: Vec::new(),
        };
        Ok(domain)
    }

    /// Load a point file and make it the session's dataset.
    pub fn import(&mut self, path: &Path, registry: &FormatRegistry) -> Result<ImportReport, AppError> {
        let ParsedPoints {
            points, row_errors, ..
        } = registry.load(path)?;

        let count = points.len();
        let domain = self.replace_points(points).map_err(|_| {
            AppError::new(
                3,
                format!(
                    "No valid points in '{}' ({} rows skipped); keeping the current data.",
                    path.display(),
                    row_errors.len()
                ),
            )
        })?;

        Ok(ImportReport {
            points: count,
            skipped: row_errors.len(),
            domain,
        })
    }

    /// The live curve at export resolution.
    pub fn export_curve(&self) -> Curve {
        sample_export(self.domain, &self.params())
    }

    /// Write the export curve as `dose survival` lines.
    pub fn export(&self, path: &Path) -> Result<Curve, AppError> {
        let curve = self.export_curve();
        write_points_txt(path, &curve)?;
        Ok(curve)
    }

    /// Write the export curve plus the stored triples as JSON.
    pub fn export_json(&self, path: &Path) -> Result<(), AppError> {
        write_curve_json(path, &self.export_curve(), self.store.history(), self.domain)
    }

    fn live_curve(&self) -> Curve {
        sample_live(self.domain, self.config.points_count, &self.params())
    }

    fn sync_param(&mut self, kind: ParamKind) {
        let value = self.fields[kind.index()].value();
        self.store.set(kind, value);
        self.scene.live = self.live_curve();
        debug!(param = kind.display_name(), value, "parameter changed");
    }
}

fn domain_for(config: &SessionConfig, points: &DosePoints) -> Result<Domain, AppError> {
    Domain::from_points(points, config.left_border, config.right_coefficient)
        .ok_or_else(|| AppError::new(3, "No valid points: cannot derive a dose domain."))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::default_points;
    use crate::input::RESET_TEXT;

    fn session() -> Session {
        Session::new(SessionConfig::default(), default_points()).unwrap()
    }

    #[test]
    fn store_transitions() {
        let p1 = ParameterTriple::new(0.3, 2.0, 1.0);
        let p2 = ParameterTriple::new(0.5, 3.0, 2.0);

        let mut store = ParameterStore::new(p1);
        store.commit_replace();
        store.set(ParamKind::A, 0.5);
        store.set(ParamKind::E, 3.0);
        store.set(ParamKind::T, 2.0);
        assert_eq!(store.history(), &[p1]);
        store.commit_add();
        assert_eq!(store.history(), &[p1, p2]);

        let mut store = ParameterStore::new(p1);
        store.commit_replace();
        store.set(ParamKind::A, 0.5);
        store.set(ParamKind::E, 3.0);
        store.set(ParamKind::T, 2.0);
        store.commit_replace();
        assert_eq!(store.history(), &[p2]);
    }

    #[test]
    fn new_session_reads_initial_sliders() {
        let s = session();
        assert_eq!(s.params(), ParameterTriple::new(0.3, 2.0, 1.0));
        assert_eq!(s.field(ParamKind::E).text(), "2");
        assert!(s.history().is_empty());
        assert!((s.domain().right - 8.8).abs() < 1e-12);
        assert_eq!(s.scene().live.len(), 100);
    }

    #[test]
    fn invalid_config_is_an_error_not_a_panic() {
        let config = SessionConfig {
            slider_range: crate::config::SliderRange { min: 0, max: -5 },
            ..SessionConfig::default()
        };
        let err = Session::new(config, default_points()).err().unwrap();
        assert_eq!(err.exit_code(), 2);

        let config = SessionConfig {
            float_shift: 0.0,
            ..SessionConfig::default()
        };
        assert!(Session::new(config, default_points()).is_err());
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = Session::new(SessionConfig::default(), DosePoints::new()).err().unwrap();
        assert_eq!(err.exit_code(), 3);

        let mut s = session();
        let before = s.domain();
        assert!(s.replace_points(DosePoints::new()).is_err());
        assert_eq!(s.domain(), before);
        assert_eq!(s.points().len(), 8);
    }

    #[test]
    fn editing_touches_only_live_triple() {
        let mut s = session();
        s.draw_replace();
        let stored = s.history().to_vec();

        s.step_param(ParamKind::A, 10);
        assert_eq!(s.params().a, 0.4);
        assert_eq!(s.history(), stored.as_slice());
        assert_eq!(s.scene().live.params.a, 0.4);
    }

    #[test]
    fn set_params_is_exact() {
        let mut s = session();
        let p = ParameterTriple::new(0.123, 25.0, 3.5);
        s.set_params(p);
        assert_eq!(s.params(), p);
        assert_eq!(s.scene().live.params, p);
    }

    #[test]
    fn invalid_text_resets_parameter_to_zero() {
        let mut s = session();
        assert_eq!(s.commit_param_text(ParamKind::E, "two"), TextCommit::Reset);
        assert_eq!(s.field(ParamKind::E).text(), RESET_TEXT);
        assert_eq!(s.params().e, 0.0);
        // E = 0 collapses the live curve to a single point.
        assert_eq!(s.scene().live.doses, vec![0.0]);
    }

    #[test]
    fn draw_add_overlays_previous_curves() {
        let mut s = session();
        s.draw_replace();
        let p1 = s.params();

        s.commit_param_text(ParamKind::A, "0.5");
        let scene = s.draw_add().clone();
        assert_eq!(scene.overlays.len(), 1);
        assert_eq!(scene.overlays[0].params, p1);
        assert_eq!(scene.live.params.a, 0.5);
        assert_eq!(s.history().len(), 2);

        let scene = s.draw_replace().clone();
        assert!(scene.overlays.is_empty());
        assert_eq!(s.history(), &[s.params()]);
    }

    #[test]
    fn import_replaces_data_and_domain() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"0 1\n10 0.01\nnot a point\n").unwrap();

        let mut s = session();
        s.draw_add();
        let report = s.import(file.path(), &FormatRegistry::default()).unwrap();
        assert_eq!(report.points, 2);
        assert_eq!(report.skipped, 1);
        assert!((report.domain.right - 11.0).abs() < 1e-12);
        assert!(s.scene().overlays.is_empty());
        assert!((s.scene().live.doses.last().unwrap() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn import_without_valid_rows_keeps_data() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"dose,sf\n").unwrap();

        let mut s = session();
        let err = s.import(file.path(), &FormatRegistry::default()).err().unwrap();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(s.points().len(), 8);
    }

    #[test]
    fn export_writes_250_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.txt");
        let s = session();
        let curve = s.export(&path).unwrap();
        assert_eq!(curve.len(), 250);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 250);
    }
}
