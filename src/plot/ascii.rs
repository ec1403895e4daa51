//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The y-axis is log10(SF); suppressed (NaN) and non-positive values are not drawn.
//!
//! Plot elements:
//! - observed points: `o`
//! - live curve: `-` line
//! - stored comparison curves: `*` line

use crate::domain::{Curve, CurveFile, DosePoints, Domain, Scene, is_plottable};

const LIVE_CH: char = '-';
const STORED_CH: char = '*';
const POINT_CH: char = 'o';

/// Render the data points plus the scene's live and stored curves.
pub fn render_scene_plot(
    scene: &Scene,
    points: &DosePoints,
    domain: Domain,
    width: usize,
    height: usize,
) -> String {
    let data: Vec<(f64, f64)> = points.iter().collect();
    render_plot(&data, &scene.live, &scene.overlays, domain, width, height)
}

/// Render a saved curve JSON file (curve only, no overlay points).
pub fn render_curve_file_plot(curve: &CurveFile, width: usize, height: usize) -> String {
    let live = curve.grid.to_curve(curve.params);
    render_plot(&[], &live, &[], curve.domain, width, height)
}

fn render_plot(
    data: &[(f64, f64)],
    live: &Curve,
    stored: &[Curve],
    domain: Domain,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(domain, data);

    let live_segs = log_segments(live);
    let stored_segs: Vec<Vec<Vec<(f64, f64)>>> = stored.iter().map(log_segments).collect();
    let data_pts = log_points(data.iter().copied());

    let all = live_segs
        .iter()
        .flatten()
        .chain(stored_segs.iter().flatten().flatten())
        .chain(data_pts.iter());
    let (y_min, y_max) = y_range(all).unwrap_or((-1.0, 0.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Stored curves first, then live (so it wins), then points on top.
    for segment in stored_segs.iter().flatten() {
        draw_curve(&mut grid, segment, x_min, x_max, y_min, y_max, STORED_CH);
    }
    for segment in &live_segs {
        draw_curve(&mut grid, segment, x_min, x_max, y_min, y_max, LIVE_CH);
    }

    for &(x, y) in &data_pts {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = POINT_CH;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dose=[{x_min:.3}, {x_max:.3}] Gy | SF=[{:.3e}, {:.3e}] (log)\n",
        10f64.powf(y_min),
        10f64.powf(y_max),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str(&format!("{LIVE_CH} {}\n", live.label));
    for curve in stored {
        out.push_str(&format!("{STORED_CH} {}\n", curve.label));
    }
    if !data.is_empty() {
        out.push_str(&format!("{POINT_CH} data (n={})\n", data.len()));
    }

    out
}

/// Log-space runs of a curve; a suppressed sample starts a new run.
fn log_segments(curve: &Curve) -> Vec<Vec<(f64, f64)>> {
    curve
        .segments()
        .into_iter()
        .map(|seg| seg.into_iter().map(|(x, y)| (x, y.log10())).collect())
        .collect()
}

fn log_points(points: impl Iterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    points
        .filter(|&(x, y)| x.is_finite() && is_plottable(y))
        .map(|(x, y)| (x, y.log10()))
        .collect()
}

fn x_range(domain: Domain, data: &[(f64, f64)]) -> (f64, f64) {
    if domain.left.is_finite() && domain.right.is_finite() && domain.right > domain.left {
        return (domain.left, domain.right);
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in data {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        (min_x, max_x)
    } else {
        (0.0, 1.0)
    }
}

fn y_range<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // A single level (e.g. only SF = 1): show one decade below it.
        Some((min_y - 1.0, max_y))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurveGrid, ParameterTriple};

    fn flat_curve(params: ParameterTriple, sf: f64) -> Curve {
        Curve::new(params, vec![0.0, 10.0], vec![sf, sf])
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let domain = Domain { left: 0.0, right: 10.0 };
        let scene = Scene {
            live: flat_curve(ParameterTriple::new(1.0, 1.0, 1.0), 1.0),
            overlays: Vec::new(),
        };
        let points = DosePoints::from_pairs(&[(10.0, 0.1)]);

        let txt = render_scene_plot(&scene, &points, domain, 10, 5);
        let expected = concat!(
            "Plot: dose=[0.000, 10.000] Gy | SF=[8.913e-2, 1.122e0] (log)\n",
            "----------\n",
            "          \n",
            "          \n",
            "          \n",
            "         o\n",
            "- 1 1 1\n",
            "o data (n=1)\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn stored_curves_and_sentinels() {
        let domain = Domain { left: 0.0, right: 10.0 };
        let live = Curve::new(
            ParameterTriple::new(2.0, 1.0, 0.0),
            vec![0.0, 5.0, 10.0],
            vec![1.0, f64::NAN, f64::NAN],
        );
        let stored = flat_curve(ParameterTriple::new(0.3, 2.0, 1.0), 0.01);
        let scene = Scene {
            live,
            overlays: vec![stored],
        };

        let txt = render_scene_plot(&scene, &DosePoints::new(), domain, 20, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 1 + 6 + 2);
        assert!(lines[1].starts_with('-'), "{txt}");
        assert!(lines[6].chars().all(|c| c == '*'), "{txt}");
        assert_eq!(lines[7], "- 2 1 0");
        assert_eq!(lines[8], "* 0.3 2 1");
        assert!(lines[1..7].iter().all(|l| !l.contains('o')));
    }

    #[test]
    fn suppressed_samples_break_the_line() {
        let domain = Domain { left: 0.0, right: 4.0 };
        let live = Curve::new(
            ParameterTriple::new(1.0, 1.0, 1.0),
            vec![0.0, 1.0, 2.0, 3.0, 4.0],
            vec![1.0, 1.0, f64::NAN, 1.0, 1.0],
        );
        let scene = Scene {
            live,
            overlays: Vec::new(),
        };

        let txt = render_scene_plot(&scene, &DosePoints::new(), domain, 9, 5);
        // Columns 0..=2 and 6..=8 are drawn; the suppressed dose at column 4 is not.
        assert_eq!(txt.lines().nth(1).unwrap(), "---   ---", "{txt}");
    }

    #[test]
    fn curve_file_plot_skips_nulls() {
        let file = CurveFile {
            tool: "sf".to_string(),
            exported_at: chrono::Local::now(),
            params: ParameterTriple::new(1.0, 1.0, 0.0),
            history: Vec::new(),
            domain: Domain { left: 0.0, right: 2.0 },
            grid: CurveGrid {
                dose: vec![0.0, 1.0, 2.0],
                survival: vec![Some(1.0), Some(0.1), None],
            },
        };
        let txt = render_curve_file_plot(&file, 12, 5);
        assert_eq!(txt.lines().count(), 1 + 5 + 1);
        assert!(txt.lines().nth(1).unwrap().starts_with('-'), "{txt}");
    }
}
