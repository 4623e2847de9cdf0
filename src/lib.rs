//! Numerical core of a multi-mode calculator
//!
//! A typed expression engine (parser, interpreter, symbolic derivative and
//! simplifier) with the numerical methods the calculator modes are built on.
//!
//! # Features
//! - Pratt parser with implicit multiplication (`2x`, `3(x+1)`) and spans in
//!   every syntax error
//! - Tree-walking evaluator with degree/radian trig and floored `mod`
//! - Symbolic differentiation with a rule-based simplifier
//! - Simpson integration, two-sided limits, Newton-Raphson, extremum search
//! - Euler and RK4 steppers, gradient descent, two-variable linear programs
//! - Descriptive statistics, least-squares regression, curve sampling
//! - Exact combinatorics and number theory, geometry, unit conversion
//!
//! # Usage Examples
//!
//! ## String API
//! Every function here folds failures into a [`Calculation`] instead of
//! returning an error:
//! ```
//! use graphium::{ResultKind, evaluate, integrate};
//!
//! assert_eq!(evaluate("0.1 + 0.2").value, "0.3");
//! assert_eq!(evaluate("1 km to m").kind, ResultKind::Unit);
//! assert_eq!(integrate("x^2", "x", 0.0, 1.0).value, "0.3333333333");
//! ```
//!
//! ## Configured calculator
//! [`Calculator`] applies a [`CalculatorConfig`] (digits, angle mode, graph
//! viewport, Newton settings) to the same operations.
//!
//! ## Typed API
//! ```
//! use graphium::{calculus, parse};
//!
//! let f = parse("x^3 - 2*x - 5").unwrap();
//! let df = f.derivative("x").unwrap();
//! let report = calculus::newton(f.to_fn("x"), df.to_fn("x"), 2.0, 1e-6, 50).unwrap();
//! assert!((report.root - 2.0945515).abs() < 1e-6);
//! ```

mod ast;
mod differentiation;
mod display;
mod error;
mod evaluator;
pub mod functions;
mod parser;
mod simplification;
mod traits;
mod validator;
pub mod visitor;

pub mod analysis;
pub mod animation;
pub mod calculator;
pub mod calculus;
pub mod config;
pub mod discrete;
pub mod format;
pub mod geometry;
pub mod graphing;
pub mod linalg;
pub mod ode;
pub mod optimize;
pub mod regression;
pub mod stats;
pub mod units;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use calculator::Calculator;
pub use config::CalculatorConfig;
pub use error::{CalcError, CalcResult, Span};
pub use evaluator::{AngleMode, EvalOptions, constant};
pub use parser::{MAX_DEPTH, MAX_NODES, parse};
pub use simplification::simplify;
pub use validator::{ValidationResult, check_expression};
pub use visitor::ExprVisitor;

use serde::Serialize;

/// Significant digits of a plain evaluation
pub const EVALUATE_DIGITS: usize = 12;
/// Significant digits of an integral or limit
pub const CALCULUS_DIGITS: usize = 10;

/// What a [`Calculation`] holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Number,
    Expression,
    Unit,
    Error,
}

/// Outcome of a string-level calculation, ready for display
///
/// `error` is set exactly when `kind` is [`ResultKind::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calculation {
    pub value: String,
    pub error: Option<String>,
    pub kind: ResultKind,
}

impl Calculation {
    fn ok(value: impl Into<String>, kind: ResultKind) -> Self {
        Self {
            value: value.into(),
            error: None,
            kind,
        }
    }

    fn failed(value: impl Into<String>, error: impl ToString) -> Self {
        Self {
            value: value.into(),
            error: Some(error.to_string()),
            kind: ResultKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<CalcError> for Calculation {
    fn from(err: CalcError) -> Self {
        Calculation::failed("", err)
    }
}

/// Evaluate a closed formula, or a `<number> <unit> to <unit>` conversion
///
/// # Arguments
/// * `expression` - Formula such as `"2 + 2"`, `"sqrt(16)"` or `"5 ft to m"`
///
/// # Returns
/// Numbers are rounded to 12 significant digits and printed in shortest
/// form. An empty input yields an empty value with no error. Infinite and
/// `NaN` results are reported as errors.
pub fn evaluate(expression: &str) -> Calculation {
    Calculator::default().evaluate(expression)
}

/// [`evaluate`] with explicit options, e.g. degree-mode trigonometry
pub fn evaluate_with(expression: &str, options: &EvalOptions) -> Calculation {
    let mut config = CalculatorConfig::default();
    config.angle.mode = options.angle;
    Calculator::new(config).evaluate(expression)
}

/// Symbolic derivative of `expression` with respect to `variable`
///
/// # Example
/// ```
/// let d = graphium::derivative("x^3 - 2*x - 5", "x");
/// assert_eq!(d.value, "3 * x^2 - 2");
/// ```
pub fn derivative(expression: &str, variable: &str) -> Calculation {
    Calculator::default().derivative(expression, variable)
}

/// Definite integral by composite Simpson's rule, 10 significant digits
///
/// A sample on a singularity (`1/x` across 0) is reported as an error.
pub fn integrate(expression: &str, variable: &str, lower: f64, upper: f64) -> Calculation {
    Calculator::default().integrate(expression, variable, lower, upper)
}

/// Two-sided numerical limit, 10 significant digits
pub fn limit(expression: &str, variable: &str, approaching: f64) -> Calculation {
    Calculator::default().limit(expression, variable, approaching)
}

/// Convert `value` between two units of the same category
///
/// # Example
/// ```
/// assert_eq!(graphium::convert_unit(1.0, "km", "m").value, "1000 m");
/// ```
pub fn convert_unit(value: f64, from: &str, to: &str) -> Calculation {
    Calculator::default().convert_unit(value, from, to)
}
