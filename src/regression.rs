//! Least-squares curve fitting
//!
//! Both models implement [`Fit`], which is all the plotting side needs:
//! a predictor, a goodness-of-fit score and a printable equation.

use crate::error::{CalcError, CalcResult};
use crate::format::to_fixed;
use crate::linalg::{normal_equations, vandermonde};
use serde::Serialize;
use tracing::debug;

/// Segments used when sampling a fitted curve for display
pub const CURVE_SEGMENTS: usize = 50;

pub trait Fit {
    fn predict(&self, x: f64) -> f64;

    fn r_squared(&self) -> f64;

    /// Coefficients printed with four decimals, e.g. `y = 3.0000x + 2.0000`
    fn equation(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl Fit for LinearModel {
    fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    fn r_squared(&self) -> f64 {
        self.r_squared
    }

    fn equation(&self) -> String {
        format!(
            "y = {}x + {}",
            to_fixed(self.slope, 4),
            to_fixed(self.intercept, 4)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolynomialModel {
    /// Ascending by power: `c0 + c1·x + c2·x² + …`
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
}

impl Fit for PolynomialModel {
    fn predict(&self, x: f64) -> f64 {
        // Horner
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    fn r_squared(&self) -> f64 {
        self.r_squared
    }

    fn equation(&self) -> String {
        let terms: Vec<String> = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| match i {
                0 => to_fixed(*c, 4),
                1 => format!("{}x", to_fixed(*c, 4)),
                _ => format!("{}x^{}", to_fixed(*c, 4), i),
            })
            .collect();
        format!("y = {}", terms.join(" + "))
    }
}

fn check_shape(x: &[f64], y: &[f64]) -> CalcResult<()> {
    if x.len() != y.len() {
        return Err(CalcError::DimensionMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(CalcError::TooFewPoints {
            got: x.len(),
            min: 2,
        });
    }
    Ok(())
}

/// `1 - SS_res / SS_tot` for predictions `predict(x_i)`
fn r_squared(x: &[f64], y: &[f64], predict: impl Fn(f64) -> f64) -> f64 {
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_total: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_residual: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| (yi - predict(xi)).powi(2))
        .sum();
    1.0 - ss_residual / ss_total
}

/// Ordinary least squares line through `(x_i, y_i)`
pub fn linear_regression(x: &[f64], y: &[f64]) -> CalcResult<LinearModel> {
    check_shape(x, y)?;
    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        // Every x is the same: the line is vertical
        return Err(CalcError::SingularMatrix);
    }
    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    let r_squared = r_squared(x, y, |v| slope * v + intercept);

    debug!(slope, intercept, r_squared, "linear regression");
    Ok(LinearModel {
        slope,
        intercept,
        r_squared,
    })
}

/// Least-squares polynomial of the given degree via the normal equations
///
/// Needs more points than the degree; a singular system is reported as
/// [`CalcError::SingularMatrix`].
pub fn polynomial_regression(x: &[f64], y: &[f64], degree: usize) -> CalcResult<PolynomialModel> {
    check_shape(x, y)?;
    if x.len() <= degree {
        return Err(CalcError::TooFewPoints {
            got: x.len(),
            min: degree + 1,
        });
    }

    let beta = normal_equations(&vandermonde(x, degree), y)?;
    let mut model = PolynomialModel {
        coefficients: beta.iter().copied().collect(),
        r_squared: 0.0,
    };
    model.r_squared = r_squared(x, y, |v| model.predict(v));

    debug!(degree, r_squared = model.r_squared, "polynomial regression");
    Ok(model)
}

/// Sample a fitted curve across `[min x, max x]` for drawing
pub fn sample_curve(model: &dyn Fit, x: &[f64]) -> Vec<(f64, f64)> {
    if x.is_empty() {
        return Vec::new();
    }
    let min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![(min, model.predict(min))];
    }
    let step = (max - min) / CURVE_SEGMENTS as f64;
    (0..=CURVE_SEGMENTS)
        .map(|i| {
            let xi = min + i as f64 * step;
            (xi, model.predict(xi))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_line() {
        let m = linear_regression(&[1.0, 2.0, 3.0, 4.0], &[5.0, 8.0, 11.0, 14.0]).unwrap();
        assert!((m.slope - 3.0).abs() < 1e-12);
        assert!((m.intercept - 2.0).abs() < 1e-12);
        assert!((m.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(m.equation(), "y = 3.0000x + 2.0000");
    }

    #[test]
    fn test_noisy_line() {
        let m = linear_regression(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.1, 4.0, 5.9, 8.1, 10.0]).unwrap();
        assert!((m.slope - 1.99).abs() < 1e-9);
        assert!(m.r_squared > 0.99 && m.r_squared < 1.0);
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            linear_regression(&[1.0, 2.0], &[1.0]),
            Err(CalcError::DimensionMismatch { x_len: 2, y_len: 1 })
        );
        assert_eq!(
            linear_regression(&[1.0], &[1.0]),
            Err(CalcError::TooFewPoints { got: 1, min: 2 })
        );
        assert_eq!(
            linear_regression(&[2.0, 2.0], &[1.0, 3.0]),
            Err(CalcError::SingularMatrix)
        );
    }

    #[test]
    fn test_quadratic_fit() {
        let x = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 1.0 - 2.0 * v + 0.5 * v * v).collect();
        let m = polynomial_regression(&x, &y, 2).unwrap();
        let expected = [1.0, -2.0, 0.5];
        for (c, e) in m.coefficients.iter().zip(expected) {
            assert!((c - e).abs() < 1e-9, "{:?}", m.coefficients);
        }
        assert!((m.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(m.equation(), "y = 1.0000 + -2.0000x + 0.5000x^2");
    }

    #[test]
    fn test_polynomial_needs_enough_points() {
        assert_eq!(
            polynomial_regression(&[1.0, 2.0], &[1.0, 2.0], 3),
            Err(CalcError::TooFewPoints { got: 2, min: 4 })
        );
    }

    #[test]
    fn test_polynomial_singular() {
        // Repeated x values cannot pin down a quadratic
        let err = polynomial_regression(&[1.0, 1.0, 2.0, 2.0], &[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(err, Err(CalcError::SingularMatrix));
    }

    #[test]
    fn test_sample_curve() {
        let m = LinearModel {
            slope: 2.0,
            intercept: 0.0,
            r_squared: 1.0,
        };
        let pts = sample_curve(&m, &[0.0, 5.0, 10.0]);
        assert_eq!(pts.len(), CURVE_SEGMENTS + 1);
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(pts[CURVE_SEGMENTS], (10.0, 20.0));
    }
}
