//! Numerical calculus on single-variable functions
//!
//! Every routine takes the function as a closure `Fn(f64) -> CalcResult<f64>`,
//! so callers can pass a compiled formula ([`Expr::to_fn`]) or plain Rust code.
//! Evaluation failures propagate unchanged; no partial result is returned.

use crate::ast::Expr;
use crate::error::{CalcError, CalcResult};
use serde::Serialize;
use tracing::{debug, warn};

/// Subintervals used by [`integrate`]; must stay even for Simpson's rule
pub const SIMPSON_INTERVALS: usize = 1000;

/// Half-width of the two-sided offset in [`limit`]
pub const LIMIT_EPSILON: f64 = 1e-10;

/// Largest gap between the one-sided estimates still treated as continuous
pub const LIMIT_THRESHOLD: f64 = 1e-6;

/// Below this `|f'(x)|` Newton's method gives up
pub const DERIVATIVE_EPSILON: f64 = 1e-10;

pub const DEFAULT_NEWTON_ITERATIONS: usize = 50;

const CRITICAL_SCAN_STEPS: usize = 1000;
const CRITICAL_REFINE_ITERATIONS: usize = 10;
const CURVATURE_EPSILON: f64 = 1e-4;
const CRITICAL_DEDUP: f64 = 0.01;

/// Definite integral by composite Simpson's rule with [`SIMPSON_INTERVALS`]
///
/// # Example
/// ```
/// use graphium::calculus::integrate;
///
/// let area = integrate(|x| Ok(x * x), 0.0, 3.0).unwrap();
/// assert!((area - 9.0).abs() < 1e-9);
/// ```
pub fn integrate<F>(f: F, lower: f64, upper: f64) -> CalcResult<f64>
where
    F: Fn(f64) -> CalcResult<f64>,
{
    let n = SIMPSON_INTERVALS;
    let h = (upper - lower) / n as f64;

    let mut sum = f(lower)? + f(upper)?;
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(lower + i as f64 * h)?;
    }
    let result = h / 3.0 * sum;

    debug!(lower, upper, result, "simpson integration");
    if !result.is_finite() {
        return Err(CalcError::NonFinite(format!(
            "Integral does not converge on [{}, {}]",
            lower, upper
        )));
    }
    Ok(result)
}

/// Two-sided limit estimate at `approaching`
///
/// Samples `f` at `approaching ± 1e-10`; when the samples agree within 1e-6
/// the limit is their average, otherwise [`CalcError::LimitDoesNotExist`].
pub fn limit<F>(f: F, approaching: f64) -> CalcResult<f64>
where
    F: Fn(f64) -> CalcResult<f64>,
{
    let left = f(approaching - LIMIT_EPSILON)?;
    let right = f(approaching + LIMIT_EPSILON)?;
    debug!(approaching, left, right, "limit sides");

    if (left - right).abs() < LIMIT_THRESHOLD {
        Ok((left + right) / 2.0)
    } else {
        Err(CalcError::LimitDoesNotExist)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NewtonStatus {
    /// `|f(root)| < tolerance`
    Converged,
    /// Iteration budget spent; `root` is the last iterate
    Exhausted,
}

/// One row of the Newton iteration table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NewtonStep {
    pub iteration: usize,
    pub x: f64,
    pub fx: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewtonReport {
    pub root: f64,
    /// Index of the iterate that satisfied the tolerance, or the budget
    pub iterations: usize,
    pub status: NewtonStatus,
    pub trace: Vec<NewtonStep>,
}

/// Newton-Raphson root finding
///
/// Running out of iterations is not an error: the report carries the last
/// iterate with [`NewtonStatus::Exhausted`].
pub fn newton<F, D>(
    f: F,
    df: D,
    x0: f64,
    tolerance: f64,
    max_iterations: usize,
) -> CalcResult<NewtonReport>
where
    F: Fn(f64) -> CalcResult<f64>,
    D: Fn(f64) -> CalcResult<f64>,
{
    let mut x = x0;
    let mut trace = Vec::new();

    for i in 0..max_iterations {
        let fx = f(x)?;
        let dfx = df(x)?;
        trace.push(NewtonStep { iteration: i, x, fx });

        if fx.abs() < tolerance {
            debug!(root = x, iterations = i, "newton converged");
            return Ok(NewtonReport {
                root: x,
                iterations: i,
                status: NewtonStatus::Converged,
                trace,
            });
        }
        if dfx.abs() < DERIVATIVE_EPSILON {
            return Err(CalcError::DerivativeNearZero { x });
        }
        x -= fx / dfx;
    }

    warn!(x, max_iterations, "newton did not converge");
    Ok(NewtonReport {
        root: x,
        iterations: max_iterations,
        status: NewtonStatus::Exhausted,
        trace,
    })
}

/// Newton's method on a formula in `x`, derivative taken symbolically
pub fn find_root(
    formula: &str,
    x0: f64,
    tolerance: f64,
    max_iterations: usize,
) -> CalcResult<NewtonReport> {
    let f = crate::parse(formula)?;
    let df = f.derivative("x")?;
    newton(f.to_fn("x"), df.to_fn("x"), x0, tolerance, max_iterations)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CriticalKind {
    LocalMinimum,
    LocalMaximum,
    Inflection,
}

impl CriticalKind {
    fn from_curvature(d2: f64) -> Self {
        if d2 > 0.0 {
            CriticalKind::LocalMinimum
        } else if d2 < 0.0 {
            CriticalKind::LocalMaximum
        } else {
            CriticalKind::Inflection
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CriticalKind::LocalMinimum => "Local Minimum",
            CriticalKind::LocalMaximum => "Local Maximum",
            CriticalKind::Inflection => "Inflection Point",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalPoint {
    pub x: f64,
    pub y: f64,
    pub kind: CriticalKind,
}

/// Sign changes of `f'` on a 1000-step grid, refined by Newton on `f'`
///
/// Refinement runs exactly 10 times and skips the update while
/// `|f''| <= 1e-4`. Refined points outside `[x_min, x_max]` are dropped and
/// points within 0.01 of an accepted one are duplicates.
pub fn find_critical_points<F, D, D2>(
    f: F,
    df: D,
    d2f: D2,
    x_min: f64,
    x_max: f64,
) -> CalcResult<Vec<CriticalPoint>>
where
    F: Fn(f64) -> CalcResult<f64>,
    D: Fn(f64) -> CalcResult<f64>,
    D2: Fn(f64) -> CalcResult<f64>,
{
    let step = (x_max - x_min) / CRITICAL_SCAN_STEPS as f64;
    let mut points: Vec<CriticalPoint> = Vec::new();
    if !step.is_finite() || step <= 0.0 {
        return Ok(points);
    }

    // Grid points are computed from their index, so a step below the float
    // spacing at x_min cannot stall the scan
    for i in 1..CRITICAL_SCAN_STEPS {
        let x = x_min + i as f64 * step;
        if x >= x_max - step {
            break;
        }
        let previous = x_min + (i - 1) as f64 * step;
        if df(previous)? * df(x)? < 0.0 {
            let mut x_crit = x;
            for _ in 0..CRITICAL_REFINE_ITERATIONS {
                let slope = df(x_crit)?;
                let curvature = d2f(x_crit)?;
                if curvature.abs() > CURVATURE_EPSILON {
                    x_crit -= slope / curvature;
                }
            }

            if (x_min..=x_max).contains(&x_crit)
                && !points.iter().any(|p| (p.x - x_crit).abs() < CRITICAL_DEDUP)
            {
                let y = f(x_crit)?;
                let kind = CriticalKind::from_curvature(d2f(x_crit)?);
                points.push(CriticalPoint { x: x_crit, y, kind });
            }
        }
    }

    debug!(count = points.len(), x_min, x_max, "critical point scan");
    Ok(points)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extremum {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extrema {
    pub min: Extremum,
    pub max: Extremum,
}

/// Absolute extrema over `[x_min, x_max]`
///
/// Candidates are `x_min`, `x_max`, then the critical points in scan order;
/// on ties the first candidate wins.
pub fn absolute_extrema<F>(
    f: F,
    x_min: f64,
    x_max: f64,
    critical: &[CriticalPoint],
) -> CalcResult<Extrema>
where
    F: Fn(f64) -> CalcResult<f64>,
{
    let mut candidates = vec![
        Extremum { x: x_min, y: f(x_min)? },
        Extremum { x: x_max, y: f(x_max)? },
    ];
    candidates.extend(critical.iter().map(|p| Extremum { x: p.x, y: p.y }));

    let first = candidates[0];
    let (min, max) = candidates
        .iter()
        .skip(1)
        .fold((first, first), |(min, max), &p| {
            (
                if p.y < min.y { p } else { min },
                if p.y > max.y { p } else { max },
            )
        });
    Ok(Extrema { min, max })
}

/// Full single-variable optimisation report for a formula in `x`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub function: String,
    pub first_derivative: String,
    pub second_derivative: String,
    pub critical_points: Vec<CriticalPoint>,
    /// `f(x_min)` and `f(x_max)`
    pub boundary: [Extremum; 2],
    pub extrema: Extrema,
}

/// Critical points, boundary values and absolute extrema of `formula` on
/// `[x_min, x_max]`, with `f'` and `f''` derived symbolically
pub fn optimize_function(formula: &str, x_min: f64, x_max: f64) -> CalcResult<OptimizationReport> {
    let f: Expr = crate::parse(formula)?;
    let df = f.derivative("x")?;
    let d2f = df.derivative("x")?;

    let critical_points =
        find_critical_points(f.to_fn("x"), df.to_fn("x"), d2f.to_fn("x"), x_min, x_max)?;
    let extrema = absolute_extrema(f.to_fn("x"), x_min, x_max, &critical_points)?;

    Ok(OptimizationReport {
        function: formula.to_string(),
        first_derivative: df.to_string(),
        second_derivative: d2f.to_string(),
        boundary: [
            Extremum { x: x_min, y: f.eval(&[("x", x_min)])? },
            Extremum { x: x_max, y: f.eval(&[("x", x_max)])? },
        ],
        critical_points,
        extrema,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(s: &str) -> Expr {
        crate::parse(s).unwrap()
    }

    #[test]
    fn test_integrate_polynomial() {
        let f = formula("x^2");
        let v = integrate(f.to_fn("x"), 0.0, 3.0).unwrap();
        assert!((v - 9.0).abs() < 1e-9);
        assert_eq!(crate::format::to_precision(v, 10), "9.000000000");
    }

    #[test]
    fn test_integrate_reversed_bounds() {
        let v = integrate(|x| Ok(x), 2.0, 0.0).unwrap();
        assert!((v + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_integrate_singularity() {
        let f = formula("1/x");
        let err = integrate(f.to_fn("x"), 0.0, 1.0).unwrap_err();
        assert!(matches!(err, CalcError::NonFinite(_)));
    }

    #[test]
    fn test_integrate_propagates_eval_error() {
        let f = formula("y * x");
        let err = integrate(f.to_fn("x"), 0.0, 1.0).unwrap_err();
        assert_eq!(err, CalcError::UnknownVariable("y".to_string()));
    }

    #[test]
    fn test_limit_removable_singularity() {
        let f = formula("sin(x)/x");
        let v = limit(f.to_fn("x"), 0.0).unwrap();
        assert!((v - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_limit_jump() {
        let f = formula("abs(x)/x");
        assert_eq!(limit(f.to_fn("x"), 0.0), Err(CalcError::LimitDoesNotExist));
    }

    #[test]
    fn test_newton_converges() {
        let report = find_root("x^3 - 2*x - 5", 2.0, 1e-6, 50).unwrap();
        assert_eq!(report.status, NewtonStatus::Converged);
        assert!((report.root - 2.0945514815).abs() < 1e-8);
        assert_eq!(report.trace.len(), report.iterations + 1);
    }

    #[test]
    fn test_newton_derivative_near_zero() {
        let err = newton(|x| Ok(x * x + 1.0), |x| Ok(2.0 * x), 0.0, 1e-6, 50).unwrap_err();
        assert_eq!(err, CalcError::DerivativeNearZero { x: 0.0 });
    }

    #[test]
    fn test_newton_exhausted_is_not_an_error() {
        let report = newton(|x| Ok(x * x - 2.0), |x| Ok(2.0 * x), 100.0, 1e-12, 3).unwrap();
        assert_eq!(report.status, NewtonStatus::Exhausted);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.trace.len(), 3);
    }

    #[test]
    fn test_critical_points_of_cubic() {
        let report = optimize_function("x^3 - 3*x", -3.05, 3.05).unwrap();
        let pts = &report.critical_points;
        assert_eq!(pts.len(), 2);
        assert!((pts[0].x + 1.0).abs() < 1e-6);
        assert_eq!(pts[0].kind, CriticalKind::LocalMaximum);
        assert!((pts[1].x - 1.0).abs() < 1e-6);
        assert_eq!(pts[1].kind, CriticalKind::LocalMinimum);

        // Boundaries dominate the local extrema
        assert_eq!(report.extrema.min.x, -3.05);
        assert_eq!(report.extrema.max.x, 3.05);
    }

    #[test]
    fn test_extrema_ties_prefer_boundary() {
        let report = optimize_function("x^2", -2.0, 2.0).unwrap();
        // f(-2) == f(2): the lower boundary is seen first
        assert_eq!(report.extrema.max.x, -2.0);
        assert_eq!(report.first_derivative, "2 * x");
        assert_eq!(report.second_derivative, "2");
    }

    #[test]
    fn test_critical_scan_far_from_origin() {
        // The grid step (1000) is below the float spacing at 1e20 (16384)
        let (lo, hi) = (1e20, 1e20 + 1e6);
        let turn = 1e20 + 5e5;
        let slope = |x: f64| Ok(if x < turn { -1.0 } else { 1.0 });
        let pts = find_critical_points(|_| Ok(0.0), slope, |_| Ok(0.0), lo, hi).unwrap();
        assert_eq!(pts.len(), 1);
        assert!((pts[0].x - turn).abs() < 4e4);

        // Overflowing width: the scan does nothing
        let pts = find_critical_points(|_| Ok(0.0), slope, |_| Ok(0.0), -f64::MAX, f64::MAX);
        assert_eq!(pts, Ok(vec![]));
    }

    #[test]
    fn test_no_critical_points() {
        let report = optimize_function("2*x + 1", 0.0, 5.0).unwrap();
        assert!(report.critical_points.is_empty());
        assert_eq!(report.extrema.min.x, 0.0);
        assert_eq!(report.extrema.max.x, 5.0);
    }
}
