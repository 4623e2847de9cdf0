//! Heuristic real analysis: sequences, series and numeric limits
//!
//! All of these sample a formula at a handful of points and report what the
//! samples suggest. None of the verdicts is a proof.

use crate::error::{CalcError, CalcResult};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

const BOUNDED_LIMIT: f64 = 1e10;
const CONVERGENCE_VARIANCE: f64 = 1e-4;
const CAUCHY_GAP: f64 = 0.01;
const TERM_TEST_THRESHOLD: f64 = 1e-4;
const LIMIT_AGREEMENT: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SequenceAnalysis {
    /// `a_1 ..= a_terms`
    pub values: Vec<f64>,
    pub increasing: bool,
    pub decreasing: bool,
    pub supremum: f64,
    pub infimum: f64,
    pub bounded: bool,
    /// Mean of the last five terms when they have settled
    pub converges_to: Option<f64>,
    pub cauchy: bool,
}

/// Evaluate `formula` at `n = 1..=terms` and describe the sequence
pub fn analyze_sequence(formula: &str, terms: usize) -> CalcResult<SequenceAnalysis> {
    if terms == 0 {
        return Err(CalcError::invalid_input("number of terms must be positive"));
    }
    let expr = crate::parse(formula)?;
    let values = (1..=terms)
        .map(|n| expr.eval(&[("n", n as f64)]))
        .collect::<CalcResult<Vec<f64>>>()?;

    let increasing = values.windows(2).all(|w| w[1] > w[0]);
    let decreasing = values.windows(2).all(|w| w[1] < w[0]);
    let supremum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let infimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let bounded = supremum.abs() < BOUNDED_LIMIT && infimum.abs() < BOUNDED_LIMIT;

    let tail = &values[values.len().saturating_sub(5)..];
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / tail.len() as f64;
    let converges_to = (variance < CONVERGENCE_VARIANCE).then_some(mean);

    let cauchy = values[values.len().saturating_sub(10)..]
        .windows(2)
        .all(|w| (w[1] - w[0]).abs() < CAUCHY_GAP);

    debug!(formula, terms, ?converges_to, "sequence analysed");
    Ok(SequenceAnalysis {
        values,
        increasing,
        decreasing,
        supremum,
        infimum,
        bounded,
        converges_to,
        cauchy,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatioVerdict {
    Converges,
    Diverges,
    Inconclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesAnalysis {
    /// `(n, S_n)` for the first ten terms, every `terms/5`-th and the last
    pub partial_sums: Vec<(usize, f64)>,
    pub last_term: f64,
    /// `|a_N| > 1e-4`: the terms do not vanish
    pub term_test_diverges: bool,
    pub ratio: f64,
    pub ratio_verdict: RatioVerdict,
    /// Set when the last three recorded partial sums agree
    pub estimated_sum: Option<f64>,
}

/// Partial sums of `formula` over `n = 1..=terms` with simple convergence tests
pub fn analyze_series(formula: &str, terms: usize) -> CalcResult<SeriesAnalysis> {
    if terms == 0 {
        return Err(CalcError::invalid_input("number of terms must be positive"));
    }
    let expr = crate::parse(formula)?;
    let term = |n: usize| expr.eval(&[("n", n as f64)]);

    let stride = terms as f64 / 5.0;
    let mut sum = 0.0;
    let mut partial_sums = Vec::new();
    for n in 1..=terms {
        sum += term(n)?;
        if n <= 10 || n == terms || (n as f64) % stride < 1.0 {
            partial_sums.push((n, sum));
        }
    }

    let last_term = term(terms)?;
    let ratio = (term(terms + 1)? / last_term).abs();
    let ratio_verdict = if ratio < 1.0 {
        RatioVerdict::Converges
    } else if ratio > 1.0 {
        RatioVerdict::Diverges
    } else {
        RatioVerdict::Inconclusive
    };

    let recent: Vec<f64> = partial_sums.iter().rev().take(3).map(|&(_, s)| s).collect();
    let deviation: f64 = recent.iter().map(|s| (s - recent[0]).powi(2)).sum();
    let estimated_sum = (deviation < CONVERGENCE_VARIANCE).then_some(sum);

    debug!(formula, terms, sum, ratio, "series analysed");
    Ok(SeriesAnalysis {
        partial_sums,
        last_term,
        term_test_diverges: last_term.abs() > TERM_TEST_THRESHOLD,
        ratio,
        ratio_verdict,
        estimated_sum,
    })
}

/// Where a numeric limit is taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitTarget {
    Infinity,
    Zero,
    /// From the right of a finite point
    Value(f64),
}

impl LimitTarget {
    pub fn sample_points(&self) -> Vec<f64> {
        match self {
            LimitTarget::Infinity => vec![10.0, 100.0, 1000.0, 10000.0, 100000.0],
            LimitTarget::Zero => vec![0.1, 0.01, 0.001, 0.0001, 0.00001],
            LimitTarget::Value(a) => vec![a + 0.1, a + 0.01, a + 0.001],
        }
    }
}

impl FromStr for LimitTarget {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "infinity" | "inf" | "Infinity" | "∞" => Ok(LimitTarget::Infinity),
            "0" => Ok(LimitTarget::Zero),
            other => other
                .parse::<f64>()
                .map(LimitTarget::Value)
                .map_err(|_| CalcError::invalid_input(format!("bad limit target '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericLimit {
    /// Each sample point with its value; `None` where evaluation failed
    pub samples: Vec<(f64, Option<f64>)>,
    pub estimate: Option<f64>,
}

/// Tabulate `formula` as `variable` approaches `toward`
///
/// The estimate is the last finite sample among the final three, accepted
/// when it agrees with the one before it to within 1e-4.
pub fn numeric_limit(formula: &str, variable: &str, toward: LimitTarget) -> CalcResult<NumericLimit> {
    let expr = crate::parse(formula)?;
    let samples: Vec<(f64, Option<f64>)> = toward
        .sample_points()
        .into_iter()
        .map(|v| (v, expr.eval(&[(variable, v)]).ok()))
        .collect();

    let tail: Vec<f64> = samples[samples.len().saturating_sub(3)..]
        .iter()
        .filter_map(|&(_, y)| y.filter(|y| y.is_finite()))
        .collect();
    let estimate = match tail.as_slice() {
        [.., prev, last] if (last - prev).abs() < LIMIT_AGREEMENT => Some(*last),
        _ => None,
    };

    debug!(formula, variable, ?toward, ?estimate, "numeric limit");
    Ok(NumericLimit { samples, estimate })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_converging() {
        let a = analyze_sequence("n/(n+1)", 200).unwrap();
        assert!(a.increasing);
        assert!(!a.decreasing);
        assert!(a.bounded);
        assert!(a.cauchy);
        assert_eq!(a.infimum, 0.5);
        assert!((a.converges_to.unwrap() - 0.995).abs() < 1e-3);
    }

    #[test]
    fn test_sequence_diverging() {
        let a = analyze_sequence("n^2", 15).unwrap();
        assert!(a.increasing);
        assert_eq!(a.converges_to, None);
        assert!(!a.cauchy);
        assert_eq!(a.supremum, 225.0);
    }

    #[test]
    fn test_sequence_alternating() {
        let a = analyze_sequence("(-1)^n", 10).unwrap();
        assert!(!a.increasing && !a.decreasing);
        assert_eq!(a.converges_to, None);
    }

    #[test]
    fn test_series_basel() {
        let s = analyze_series("1/n^2", 100).unwrap();
        assert!(!s.term_test_diverges);
        assert_eq!(s.partial_sums.len(), 15);
        assert_eq!(s.partial_sums[10].0, 20);
        assert_eq!(s.partial_sums.last().unwrap().0, 100);
        assert!(s.ratio < 1.0);
        let sum = s.estimated_sum.unwrap();
        assert!((sum - std::f64::consts::PI.powi(2) / 6.0).abs() < 0.011);
    }

    #[test]
    fn test_series_term_test() {
        let s = analyze_series("n/(n+1)", 50).unwrap();
        assert!(s.term_test_diverges);
        assert_eq!(s.estimated_sum, None);
    }

    #[test]
    fn test_numeric_limit_at_infinity() {
        let l = numeric_limit("3 + 1/n", "n", LimitTarget::Infinity).unwrap();
        assert_eq!(l.samples.len(), 5);
        assert!((l.estimate.unwrap() - 3.0).abs() < 1e-4);

        // Converges too slowly for the sample table
        let l = numeric_limit("(1 + 1/n)^n", "n", LimitTarget::Infinity).unwrap();
        assert_eq!(l.estimate, None);
    }

    #[test]
    fn test_numeric_limit_at_point() {
        let l = numeric_limit("sin(x)/x", "x", "0".parse().unwrap()).unwrap();
        assert!((l.estimate.unwrap() - 1.0).abs() < 1e-6);

        let l = numeric_limit("1/(x-2)", "x", LimitTarget::Value(2.0)).unwrap();
        assert_eq!(l.estimate, None);
    }

    #[test]
    fn test_limit_target_parse() {
        assert_eq!("infinity".parse::<LimitTarget>().unwrap(), LimitTarget::Infinity);
        assert_eq!("2.5".parse::<LimitTarget>().unwrap(), LimitTarget::Value(2.5));
        assert!("abc".parse::<LimitTarget>().is_err());
    }
}
