//! Calculator front end bound to a [`CalculatorConfig`]
//!
//! The free functions in the crate root ([`crate::evaluate`],
//! [`crate::integrate`], ...) run through a default `Calculator`.
//!
//! ```
//! use graphium::{Calculator, CalculatorConfig};
//!
//! let config = CalculatorConfig::from_toml_str("[display]\nevaluate_digits = 4").unwrap();
//! let calc = Calculator::new(config);
//! assert_eq!(calc.evaluate("1/3").value, "0.3333");
//! ```

use crate::calculus::{self, NewtonReport};
use crate::config::CalculatorConfig;
use crate::error::CalcResult;
use crate::format::{self, format_significant, to_precision};
use crate::graphing::{CurveSet, sample_curves};
use crate::{Calculation, ResultKind, parse, units};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calculator {
    config: CalculatorConfig,
}

impl Calculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Evaluate a closed formula, or a `<number> <unit> to <unit>` conversion
    ///
    /// Numbers are rounded to `display.evaluate_digits` significant digits
    /// and printed in shortest form. Trig functions follow `angle.mode`.
    pub fn evaluate(&self, expression: &str) -> Calculation {
        if expression.trim().is_empty() {
            return Calculation::ok("", ResultKind::Expression);
        }
        if let Some((value, from, to)) = units::parse_conversion(expression) {
            return self.convert_unit(value, from, to);
        }
        let options = self.config.eval_options();
        let value = match parse(expression).and_then(|e| e.eval_with(&[], &options)) {
            Ok(v) => v,
            Err(err) => return err.into(),
        };
        if value.is_nan() {
            Calculation::failed("NaN", "Result is not a real number")
        } else if value.is_infinite() {
            Calculation::failed(format::shortest(value), "Result is infinite")
        } else {
            let digits = self.config.display.evaluate_digits;
            Calculation::ok(format_significant(value, digits), ResultKind::Number)
        }
    }

    pub fn derivative(&self, expression: &str, variable: &str) -> Calculation {
        match parse(expression).and_then(|e| e.derivative(variable)) {
            Ok(d) => Calculation::ok(d.to_string(), ResultKind::Expression),
            Err(err) => err.into(),
        }
    }

    /// Definite integral by composite Simpson's rule
    pub fn integrate(&self, expression: &str, variable: &str, lower: f64, upper: f64) -> Calculation {
        let result = parse(expression).and_then(|e| calculus::integrate(e.to_fn(variable), lower, upper));
        self.calculus_result(result)
    }

    /// Two-sided numerical limit
    pub fn limit(&self, expression: &str, variable: &str, approaching: f64) -> Calculation {
        let result = parse(expression).and_then(|e| calculus::limit(e.to_fn(variable), approaching));
        self.calculus_result(result)
    }

    pub fn convert_unit(&self, value: f64, from: &str, to: &str) -> Calculation {
        match units::convert(value, from, to) {
            Ok(q) => {
                let digits = self.config.display.evaluate_digits;
                Calculation::ok(format!("{} {}", format_significant(q.value, digits), q.unit), ResultKind::Unit)
            }
            Err(err) => err.into(),
        }
    }

    /// Newton-Raphson on `formula` in `x` with the configured tolerance and budget
    pub fn find_root(&self, formula: &str, x0: f64) -> CalcResult<NewtonReport> {
        let newton = &self.config.newton;
        calculus::find_root(formula, x0, newton.tolerance, newton.max_iterations)
    }

    /// Sample `formulas` across the configured viewport and point count
    pub fn graph(&self, formulas: &[&str], t: Option<f64>) -> CurveSet {
        let graph = &self.config.graph;
        sample_curves(formulas, &graph.viewport, graph.points, t)
    }

    fn calculus_result(&self, result: CalcResult<f64>) -> Calculation {
        match result {
            Ok(v) => Calculation::ok(to_precision(v, self.config.display.calculus_digits), ResultKind::Number),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculus::NewtonStatus;

    fn with(toml: &str) -> Calculator {
        Calculator::new(CalculatorConfig::from_toml_str(toml).unwrap())
    }

    #[test]
    fn test_default_matches_free_functions() {
        let calc = Calculator::default();
        for src in ["1/3", "2^10", "sqrt(-1)", "1/0", "5 ft to m", ""] {
            assert_eq!(calc.evaluate(src), crate::evaluate(src), "{src}");
        }
        assert_eq!(calc.integrate("x^2", "x", 0.0, 1.0), crate::integrate("x^2", "x", 0.0, 1.0));
        assert_eq!(calc.limit("sin(x)/x", "x", 0.0), crate::limit("sin(x)/x", "x", 0.0));
    }

    #[test]
    fn test_display_digits() {
        let calc = with("[display]\nevaluate_digits = 4\ncalculus_digits = 3");
        assert_eq!(calc.evaluate("1/3").value, "0.3333");
        assert_eq!(crate::evaluate("1/3").value, "0.333333333333");
        assert_eq!(calc.evaluate("2/3").value, "0.6667");
        assert_eq!(calc.evaluate("1 mi to km").value, "1.609 km");
        assert_eq!(calc.integrate("x^2", "x", 0.0, 1.0).value, "0.333");
        assert_eq!(calc.limit("sin(x)/x", "x", 0.0).value, "1.00");
    }

    #[test]
    fn test_angle_mode() {
        let calc = with("[angle]\nmode = \"degrees\"");
        assert_eq!(calc.evaluate("sin(90)").value, "1");
        assert_eq!(calc.evaluate("cos(180)").value, "-1");
    }

    #[test]
    fn test_graph_settings() {
        let calc = with("[graph]\npoints = 20\nviewport = { x_min = 0.0, x_max = 2.0, y_min = -1.0, y_max = 1.0 }");
        let curves = calc.graph(&["x", "x - 1"], None);
        assert_eq!(curves.xs.len(), 21);
        assert_eq!(curves.xs[0], 0.0);
        assert!((curves.xs[20] - 2.0).abs() < 1e-12);
        // x leaves the viewport above 1
        assert_eq!(curves.series[0][15], None);
        assert!(curves.series[1][15].is_some());
    }

    #[test]
    fn test_newton_settings() {
        let report = with("[newton]\nmax_iterations = 1").find_root("x^3 - 2*x - 5", 10.0).unwrap();
        assert_eq!(report.status, NewtonStatus::Exhausted);

        let report = Calculator::default().find_root("x^3 - 2*x - 5", 2.0).unwrap();
        assert_eq!(report.status, NewtonStatus::Converged);
        assert!((report.root - 2.0945515).abs() < 1e-6);
    }
}
