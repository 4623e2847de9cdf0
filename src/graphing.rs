//! Function sampling for plots
//!
//! Sampling never fails on individual points: anything that does not
//! evaluate to a finite, plottable number becomes a gap (`NaN` or `None`)
//! so a renderer breaks the line there instead of joining across a pole.

use crate::ast::Expr;
use crate::error::CalcResult;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// Samples with `|y|` at or above this are treated as off-chart
pub const PLOT_LIMIT: f64 = 1e10;

pub const DEFAULT_POINTS: usize = 500;

const PARAMETRIC_STEPS: usize = 20;
const POLAR_STEPS: usize = 24;

const ASYMPTOTE_SCAN: (f64, f64) = (-10.0, 10.0);
const ASYMPTOTE_STEP: f64 = 0.1;
const ASYMPTOTE_OFFSET: f64 = 0.01;
const ASYMPTOTE_BLOWUP: f64 = 1000.0;
const ASYMPTOTE_DEDUP: f64 = 0.2;
const FAR_X: f64 = 1e5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphPoint {
    pub x: f64,
    /// `NaN` marks a gap in the curve
    pub y: f64,
}

impl GraphPoint {
    pub fn is_gap(&self) -> bool {
        self.y.is_nan()
    }
}

fn plottable(y: CalcResult<f64>) -> Option<f64> {
    y.ok().filter(|v| v.is_finite() && v.abs() < PLOT_LIMIT)
}

/// Bindings for a sample at `x`, with the animation parameter when given
fn bindings(x: f64, t: Option<f64>) -> Vec<(&'static str, f64)> {
    match t {
        Some(t) => vec![("x", x), ("t", t)],
        None => vec![("x", x)],
    }
}

/// `num_points + 1` evenly spaced samples of a parsed formula in `x`
pub fn sample(expr: &Expr, x_min: f64, x_max: f64, num_points: usize, t: Option<f64>) -> Vec<GraphPoint> {
    let steps = num_points.max(1);
    let step = (x_max - x_min) / steps as f64;
    let points: Vec<GraphPoint> = (0..=steps)
        .map(|i| {
            let x = x_min + i as f64 * step;
            let y = plottable(expr.eval(&bindings(x, t))).unwrap_or(f64::NAN);
            GraphPoint { x, y }
        })
        .collect();

    let gaps = points.iter().filter(|p| p.is_gap()).count();
    if gaps > 0 {
        debug!(gaps, total = points.len(), "samples dropped from plot");
    }
    points
}

/// Sample `formula` for plotting; an unparsable formula gives no points
///
/// # Example
/// ```
/// let pts = graphium::graphing::generate_graph_points("1/x", -1.0, 1.0, 2);
/// assert_eq!(pts.len(), 3);
/// assert!(pts[1].y.is_nan());
/// ```
pub fn generate_graph_points(formula: &str, x_min: f64, x_max: f64, num_points: usize) -> Vec<GraphPoint> {
    match crate::parse(formula) {
        Ok(expr) => sample(&expr, x_min, x_max, num_points, None),
        Err(err) => {
            warn!(formula, %err, "cannot plot formula");
            Vec::new()
        }
    }
}

/// Visible region of the plot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
        }
    }
}

impl Viewport {
    /// Scale both ranges about their centres; `factor < 1` zooms in
    pub fn zoom(&mut self, factor: f64) {
        let scale = |lo: f64, hi: f64| {
            let centre = (lo + hi) / 2.0;
            let half = (hi - lo) / 2.0 * factor;
            (centre - half, centre + half)
        };
        (self.x_min, self.x_max) = scale(self.x_min, self.x_max);
        (self.y_min, self.y_max) = scale(self.y_min, self.y_max);
    }

    pub fn reset(&mut self) {
        *self = Viewport::default();
    }

    pub fn contains_y(&self, y: f64) -> bool {
        (self.y_min..=self.y_max).contains(&y)
    }
}

/// Several curves sampled on a shared x grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSet {
    pub xs: Vec<f64>,
    /// One column per formula, `None` where the curve leaves the viewport
    pub series: Vec<Vec<Option<f64>>>,
}

/// Sample each formula across the viewport, clipping to its y-range
///
/// Formulas that fail to parse produce an all-gap column. `t` is bound for
/// animated formulas.
pub fn sample_curves(formulas: &[&str], viewport: &Viewport, num_points: usize, t: Option<f64>) -> CurveSet {
    let steps = num_points.max(1);
    let step = (viewport.x_max - viewport.x_min) / steps as f64;
    let xs: Vec<f64> = (0..=steps).map(|i| viewport.x_min + i as f64 * step).collect();

    let series = formulas
        .iter()
        .map(|formula| match crate::parse(formula) {
            Ok(expr) => xs
                .iter()
                .map(|&x| plottable(expr.eval(&bindings(x, t))).filter(|y| viewport.contains_y(*y)))
                .collect(),
            Err(err) => {
                warn!(formula, %err, "cannot plot formula");
                vec![None; xs.len()]
            }
        })
        .collect();

    CurveSet { xs, series }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub formula: String,
    pub x: f64,
    /// `None` when the formula is undefined at `x`
    pub y: Option<f64>,
}

/// Value of every formula at one x position
pub fn inspect(formulas: &[&str], x: f64, t: Option<f64>) -> Vec<Inspection> {
    formulas
        .iter()
        .map(|formula| {
            let y = crate::parse(formula)
                .and_then(|e| e.eval(&bindings(x, t)))
                .ok()
                .filter(|v| v.is_finite());
            Inspection {
                formula: formula.to_string(),
                x,
                y,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametricCurve {
    /// `(t, x, y)` samples
    pub points: Vec<(f64, f64, f64)>,
    /// Length of the polyline through the samples
    pub arc_length: f64,
    pub dx_dt: String,
    pub dy_dt: String,
}

/// Sample `(x(t), y(t))` at 21 points over `[t_min, t_max]`
pub fn parametric(x_formula: &str, y_formula: &str, t_min: f64, t_max: f64) -> CalcResult<ParametricCurve> {
    let fx = crate::parse(x_formula)?;
    let fy = crate::parse(y_formula)?;

    let points = (0..=PARAMETRIC_STEPS)
        .map(|i| {
            let t = t_min + (t_max - t_min) * (i as f64 / PARAMETRIC_STEPS as f64);
            Ok((t, fx.eval(&[("t", t)])?, fy.eval(&[("t", t)])?))
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let arc_length = points
        .windows(2)
        .map(|w| (w[1].1 - w[0].1).hypot(w[1].2 - w[0].2))
        .sum::<f64>();

    Ok(ParametricCurve {
        points,
        arc_length,
        dx_dt: fx.derivative("t")?.to_string(),
        dy_dt: fy.derivative("t")?.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarPoint {
    pub theta: f64,
    pub r: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarCurve {
    pub points: Vec<PolarPoint>,
    /// `½ Σ r² Δθ` over every sample
    pub area: f64,
}

/// Sample `r(theta)` at 25 angles over `[0, 2π]`
pub fn polar(r_formula: &str) -> CalcResult<PolarCurve> {
    let fr = crate::parse(r_formula)?;
    let d_theta = TAU / POLAR_STEPS as f64;

    let points = (0..=POLAR_STEPS)
        .map(|i| {
            let theta = TAU * i as f64 / POLAR_STEPS as f64;
            let r = fr.eval(&[("theta", theta)])?;
            Ok(PolarPoint {
                theta,
                r,
                x: r * theta.cos(),
                y: r * theta.sin(),
            })
        })
        .collect::<CalcResult<Vec<_>>>()?;

    let area = points.iter().map(|p| 0.5 * p.r * p.r * d_theta).sum::<f64>().abs();
    Ok(PolarCurve { points, area })
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Asymptotes {
    /// x positions rounded to one decimal
    pub vertical: Vec<f64>,
    /// Value at `x = 1e5` when bounded
    pub horizontal_right: Option<f64>,
    /// Value at `x = -1e5` when bounded and different from the right one
    pub horizontal_left: Option<f64>,
    /// `(slope, intercept)` estimated at `x = 1e5`
    pub oblique: Option<(f64, f64)>,
}

/// Numerical asymptote search for a formula in `x`
///
/// Vertical asymptotes are grid points in [-10, 10] (step 0.1) where `|f|`
/// exceeds 1000 at the point or 0.01 to its right.
pub fn asymptotes(formula: &str) -> CalcResult<Asymptotes> {
    let expr = crate::parse(formula)?;
    let f = |x: f64| expr.eval(&[("x", x)]);
    let blows_up = |v: f64| v.abs() > ASYMPTOTE_BLOWUP;
    let mut found = Asymptotes::default();

    let mut x = ASYMPTOTE_SCAN.0;
    while x <= ASYMPTOTE_SCAN.1 {
        if let (Ok(v), Ok(next)) = (f(x), f(x + ASYMPTOTE_OFFSET))
            && (blows_up(v) || blows_up(next))
        {
            let rounded = (x * 10.0).round() / 10.0;
            if !found.vertical.iter().any(|v| (v - rounded).abs() < ASYMPTOTE_DEDUP) {
                found.vertical.push(rounded);
            }
        }
        x += ASYMPTOTE_STEP;
    }

    if let (Ok(right), Ok(left)) = (f(FAR_X), f(-FAR_X)) {
        if right.abs() < ASYMPTOTE_BLOWUP {
            found.horizontal_right = Some(right);
        }
        if left.abs() < ASYMPTOTE_BLOWUP && (right - left).abs() > 1e-4 {
            found.horizontal_left = Some(left);
        }
    }

    if let Ok(far) = f(FAR_X) {
        let slope = far / FAR_X;
        let intercept = far - slope * FAR_X;
        if slope.abs() > 1e-4 && slope.abs() < ASYMPTOTE_BLOWUP && intercept.abs() < ASYMPTOTE_BLOWUP {
            found.oblique = Some((slope, intercept));
        }
    }

    debug!(formula, vertical = found.vertical.len(), "asymptote scan");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_points() {
        let pts = generate_graph_points("x^2", -2.0, 2.0, 4);
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![4.0, 1.0, 0.0, 1.0, 4.0]);
    }

    #[test]
    fn test_graph_gaps() {
        let pts = generate_graph_points("sqrt(x)", -1.0, 1.0, 2);
        assert!(pts[0].is_gap());
        assert_eq!(pts[2].y, 1.0);

        let pts = generate_graph_points("10^x", 0.0, 20.0, 2);
        assert_eq!(pts[0].y, 1.0);
        assert!(pts[2].is_gap());
    }

    #[test]
    fn test_unparsable_formula_is_empty() {
        assert!(generate_graph_points("2 +", -1.0, 1.0, 10).is_empty());
    }

    #[test]
    fn test_viewport_zoom_and_reset() {
        let mut v = Viewport::default();
        v.zoom(0.5);
        assert_eq!((v.x_min, v.x_max, v.y_min, v.y_max), (-5.0, 5.0, -5.0, 5.0));
        v.reset();
        assert_eq!(v, Viewport::default());
    }

    #[test]
    fn test_sample_curves_clips_to_viewport() {
        let v = Viewport::default();
        let set = sample_curves(&["x^2", "nope("], &v, 4, None);
        assert_eq!(set.xs, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        assert_eq!(set.series[0], vec![None, None, Some(0.0), None, None]);
        assert!(set.series[1].iter().all(Option::is_none));
    }

    #[test]
    fn test_animated_formula() {
        let set = sample_curves(&["x + t"], &Viewport::default(), 2, Some(1.0));
        assert_eq!(set.series[0], vec![Some(-9.0), Some(1.0), None]);
    }

    #[test]
    fn test_inspect() {
        let out = inspect(&["x^2", "1/x", "y"], 0.0, None);
        assert_eq!(out[0].y, Some(0.0));
        assert_eq!(out[1].y, None);
        assert_eq!(out[2].y, None);
    }

    #[test]
    fn test_parametric_circle() {
        let c = parametric("cos(t)", "sin(t)", 0.0, TAU).unwrap();
        assert_eq!(c.points.len(), 21);
        // Inscribed 20-gon
        let expected = 20.0 * 2.0 * (std::f64::consts::PI / 20.0).sin();
        assert!((c.arc_length - expected).abs() < 1e-9);
        assert_eq!(c.dx_dt, "-sin(t)");
        assert_eq!(c.dy_dt, "cos(t)");
    }

    #[test]
    fn test_polar_circle_area() {
        let c = polar("2").unwrap();
        assert_eq!(c.points.len(), 25);
        // 25 samples of r² = 4 over 24 intervals
        let expected = 0.5 * 4.0 * TAU / 24.0 * 25.0;
        assert!((c.area - expected).abs() < 1e-9);
    }

    #[test]
    fn test_asymptotes_of_reciprocal() {
        let a = asymptotes("1/x").unwrap();
        assert_eq!(a.vertical, vec![0.0]);
        assert_eq!(a.horizontal_right, Some(1e-5));
        assert_eq!(a.horizontal_left, None);
        assert_eq!(a.oblique, None);
    }

    #[test]
    fn test_oblique_asymptote() {
        let a = asymptotes("2*x + 1 + 1/x").unwrap();
        let (m, b) = a.oblique.unwrap();
        assert!((m - 2.00001).abs() < 1e-6);
        assert!(b.abs() < 1e-6);
    }
}
