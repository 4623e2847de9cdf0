use crate::error::{CalcError, CalcResult};
use serde::Serialize;
use tracing::debug;

/// Central-difference step for the numerical gradient
pub const GRADIENT_STEP: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescentStep {
    pub iteration: usize,
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescentResult {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    /// Iterations 0 through 5, every 20th, and the last
    pub trace: Vec<DescentStep>,
}

fn is_traced(i: usize, iterations: usize) -> bool {
    i <= 5 || i == iterations || i % 20 == 0
}

/// `(∂f/∂x, ∂f/∂y)` by central differences
pub fn numerical_gradient<F>(f: &F, x: f64, y: f64) -> CalcResult<(f64, f64)>
where
    F: Fn(f64, f64) -> CalcResult<f64>,
{
    let h = GRADIENT_STEP;
    let dx = (f(x + h, y)? - f(x - h, y)?) / (2.0 * h);
    let dy = (f(x, y + h)? - f(x, y - h)?) / (2.0 * h);
    Ok((dx, dy))
}

/// Fixed-budget gradient descent on a function of two variables
///
/// Runs exactly `iterations` updates `p -= alpha * ∇f(p)`; there is no
/// convergence check.
pub fn gradient_descent<F>(
    f: F,
    x0: f64,
    y0: f64,
    alpha: f64,
    iterations: usize,
) -> CalcResult<DescentResult>
where
    F: Fn(f64, f64) -> CalcResult<f64>,
{
    if !alpha.is_finite() {
        return Err(CalcError::invalid_input("learning rate must be finite"));
    }

    let (mut x, mut y) = (x0, y0);
    let mut trace = vec![DescentStep {
        iteration: 0,
        x,
        y,
        value: f(x, y)?,
    }];

    for i in 1..=iterations {
        let (gx, gy) = numerical_gradient(&f, x, y)?;
        x -= alpha * gx;
        y -= alpha * gy;
        if is_traced(i, iterations) {
            trace.push(DescentStep {
                iteration: i,
                x,
                y,
                value: f(x, y)?,
            });
        }
    }

    let value = f(x, y)?;
    debug!(x, y, value, iterations, "gradient descent finished");
    Ok(DescentResult { x, y, value, trace })
}

/// Gradient descent on a formula in `x` and `y`
pub fn minimize(
    formula: &str,
    x0: f64,
    y0: f64,
    alpha: f64,
    iterations: usize,
) -> CalcResult<DescentResult> {
    let expr = crate::parse(formula)?;
    gradient_descent(
        |x, y| expr.eval(&[("x", x), ("y", y)]),
        x0,
        y0,
        alpha,
        iterations,
    )
}
