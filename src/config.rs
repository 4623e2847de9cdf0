//! Calculator settings loaded from TOML
//!
//! Every section and field is optional; anything missing keeps its default.
//!
//! ```toml
//! [display]
//! evaluate_digits = 10
//!
//! [graph]
//! points = 200
//! viewport = { x_min = -5.0, x_max = 5.0, y_min = -5.0, y_max = 5.0 }
//!
//! [angle]
//! mode = "degrees"
//! ```

use crate::error::{CalcError, CalcResult};
use crate::evaluator::{AngleMode, EvalOptions};
use crate::graphing::{DEFAULT_POINTS, Viewport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub display: DisplayConfig,
    pub graph: GraphConfig,
    pub newton: NewtonConfig,
    pub angle: AngleConfig,
}

/// Significant digits used when printing results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub evaluate_digits: usize,
    /// Integrals and limits
    pub calculus_digits: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub points: usize,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleConfig {
    pub mode: AngleMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            evaluate_digits: crate::EVALUATE_DIGITS,
            calculus_digits: crate::CALCULUS_DIGITS,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS,
            viewport: Viewport::default(),
        }
    }
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: crate::calculus::DEFAULT_NEWTON_ITERATIONS,
        }
    }
}

impl CalculatorConfig {
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| CalcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CalcError::Config(format!("reading {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loading calculator config");
        Self::from_toml_str(&text).map_err(|e| match e {
            CalcError::Config(msg) => CalcError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            angle: self.angle.mode,
        }
    }

    fn validate(&self) -> CalcResult<()> {
        let digits = 1..=100;
        if !digits.contains(&self.display.evaluate_digits)
            || !digits.contains(&self.display.calculus_digits)
        {
            return Err(CalcError::Config(
                "display digits must be between 1 and 100".to_string(),
            ));
        }
        if self.graph.points == 0 {
            return Err(CalcError::Config("graph.points must be positive".to_string()));
        }
        let v = &self.graph.viewport;
        if !(v.x_min < v.x_max && v.y_min < v.y_max) {
            return Err(CalcError::Config(
                "graph.viewport minimums must be below maximums".to_string(),
            ));
        }
        if !(self.newton.tolerance.is_finite() && self.newton.tolerance > 0.0)
            || self.newton.max_iterations == 0
        {
            return Err(CalcError::Config(
                "newton.tolerance and newton.max_iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.display.evaluate_digits, 12);
        assert_eq!(config.display.calculus_digits, 10);
        assert_eq!(config.graph.points, 500);
        assert_eq!(config.newton.tolerance, 1e-6);
        assert_eq!(config.newton.max_iterations, 50);
        assert_eq!(config.angle.mode, AngleMode::Radians);
        assert_eq!(CalculatorConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_toml() {
        let config = CalculatorConfig::from_toml_str(
            r#"
[graph]
points = 200

[angle]
mode = "degrees"
"#,
        )
        .unwrap();
        assert_eq!(config.graph.points, 200);
        assert_eq!(config.graph.viewport, Viewport::default());
        assert_eq!(config.eval_options(), EvalOptions::degrees());
        assert_eq!(config.display.evaluate_digits, 12);
    }

    #[test]
    fn test_invalid_config() {
        for text in [
            "[angle]\nmode = \"gradians\"",
            "[graph]\npoints = 0",
            "[graph.viewport]\nx_min = 5.0\nx_max = -5.0\ny_min = -1.0\ny_max = 1.0",
            "[newton]\ntolerance = -1.0",
            "[display]\nevaluate_digits = 0",
        ] {
            assert!(
                matches!(CalculatorConfig::from_toml_str(text), Err(CalcError::Config(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn test_missing_file() {
        let err = CalculatorConfig::load("/nonexistent/graphium.toml").unwrap_err();
        assert!(matches!(err, CalcError::Config(msg) if msg.contains("graphium.toml")));
    }
}
