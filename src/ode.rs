//! Initial value problems `dy/dx = f(x, y)` and constant-coefficient ODEs

use crate::error::{CalcError, CalcResult};
use serde::Serialize;
use tracing::debug;

/// Step size of the first-order linear solver
pub const LINEAR_STEP: f64 = 0.1;

/// A visited `(x, y)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OdePoint {
    pub x: f64,
    pub y: f64,
}

/// Most steps a single solve may take
pub const MAX_STEPS: usize = 1_000_000;

fn check_step(h: f64) -> CalcResult<()> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(format!("step size must be positive, got {}", h)))
    }
}

/// Step count from its real-valued estimate, rejecting anything above
/// [`MAX_STEPS`] (including infinite and NaN estimates)
fn bounded_steps(estimate: f64) -> CalcResult<usize> {
    if estimate <= MAX_STEPS as f64 {
        Ok(estimate.max(0.0) as usize)
    } else {
        Err(CalcError::invalid_input(format!(
            "interval needs {estimate} steps, more than the limit of {MAX_STEPS}"
        )))
    }
}

/// Explicit Euler with `ceil(|xf - x0| / h)` steps of size `h`
///
/// When the interval is not a whole number of steps the last point
/// overshoots `xf`. The returned path starts at `(x0, y0)`.
pub fn euler<F>(f: F, x0: f64, y0: f64, h: f64, xf: f64) -> CalcResult<Vec<OdePoint>>
where
    F: Fn(f64, f64) -> CalcResult<f64>,
{
    check_step(h)?;
    let steps = bounded_steps(((xf - x0).abs() / h).ceil())?;

    let (mut x, mut y) = (x0, y0);
    let mut path = vec![OdePoint { x, y }];
    for _ in 0..steps {
        y += h * f(x, y)?;
        x += h;
        path.push(OdePoint { x, y });
    }

    debug!(steps, x, y, "euler finished");
    Ok(path)
}

/// Classic fourth-order Runge-Kutta over every grid point `x0 + i·h`
/// below `xf - h/2`
pub fn runge_kutta4<F>(f: F, x0: f64, y0: f64, h: f64, xf: f64) -> CalcResult<Vec<OdePoint>>
where
    F: Fn(f64, f64) -> CalcResult<f64>,
{
    check_step(h)?;
    let steps = bounded_steps(((xf - x0) / h - 0.5).ceil())?;

    let (mut x, mut y) = (x0, y0);
    let mut path = vec![OdePoint { x, y }];
    for i in 1..=steps {
        let k1 = f(x, y)?;
        let k2 = f(x + h / 2.0, y + h * k1 / 2.0)?;
        let k3 = f(x + h / 2.0, y + h * k2 / 2.0)?;
        let k4 = f(x + h, y + h * k3)?;
        y += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
        x = x0 + i as f64 * h;
        path.push(OdePoint { x, y });
    }

    debug!(steps, x, y, "runge-kutta finished");
    Ok(path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OdeMethod {
    Euler,
    RungeKutta4,
}

/// Integrate `dy/dx = formula` where the formula may use `x` and `y`
pub fn solve(
    formula: &str,
    method: OdeMethod,
    x0: f64,
    y0: f64,
    h: f64,
    xf: f64,
) -> CalcResult<Vec<OdePoint>> {
    let expr = crate::parse(formula)?;
    let f = |x: f64, y: f64| expr.eval(&[("x", x), ("y", y)]);
    match method {
        OdeMethod::Euler => euler(f, x0, y0, h, xf),
        OdeMethod::RungeKutta4 => runge_kutta4(f, x0, y0, h, xf),
    }
}

/// `dy/dx + P(x)·y = Q(x)` solved by Euler with h = 0.1; returns `y(xf)`
pub fn first_order_linear(p: &str, q: &str, x0: f64, y0: f64, xf: f64) -> CalcResult<f64> {
    let p = crate::parse(p)?;
    let q = crate::parse(q)?;
    let path = euler(
        |x, y| Ok(q.eval(&[("x", x)])? - p.eval(&[("x", x)])? * y),
        x0,
        y0,
        LINEAR_STEP,
        xf,
    )?;
    Ok(path.last().map_or(y0, |pt| pt.y))
}

/// Roots of the characteristic equation `a r² + b r + c = 0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CharacteristicRoots {
    Distinct { r1: f64, r2: f64 },
    Repeated { r: f64 },
    Complex { alpha: f64, beta: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondOrderSolution {
    pub discriminant: f64,
    pub roots: CharacteristicRoots,
    pub general_solution: String,
}

/// General solution of `a y'' + b y' + c y = 0`
pub fn second_order_constant(a: f64, b: f64, c: f64) -> CalcResult<SecondOrderSolution> {
    if a == 0.0 {
        return Err(CalcError::invalid_input(
            "leading coefficient a must be non-zero",
        ));
    }
    let discriminant = b * b - 4.0 * a * c;
    let fmt = |v: f64| crate::format::to_fixed(v, 4);

    let (roots, general_solution) = if discriminant > 0.0 {
        let r1 = (-b + discriminant.sqrt()) / (2.0 * a);
        let r2 = (-b - discriminant.sqrt()) / (2.0 * a);
        (
            CharacteristicRoots::Distinct { r1, r2 },
            format!("y = C₁e^({}x) + C₂e^({}x)", fmt(r1), fmt(r2)),
        )
    } else if discriminant == 0.0 {
        let r = -b / (2.0 * a);
        (
            CharacteristicRoots::Repeated { r },
            format!("y = (C₁ + C₂x)e^({}x)", fmt(r)),
        )
    } else {
        let alpha = -b / (2.0 * a);
        let beta = (-discriminant).sqrt() / (2.0 * a);
        (
            CharacteristicRoots::Complex { alpha, beta },
            format!(
                "y = e^({a}x)[C₁cos({b}x) + C₂sin({b}x)]",
                a = fmt(alpha),
                b = fmt(beta)
            ),
        )
    };

    Ok(SecondOrderSolution {
        discriminant,
        roots,
        general_solution,
    })
}
