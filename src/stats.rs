//! Descriptive statistics over a flat data set

use crate::error::{CalcError, CalcResult};
use crate::format::to_fixed;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("valid regex"));

const MAX_BINS: usize = 10;

/// Summary of a data set; variance and standard deviation are population
/// statistics (divide by `n`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    /// Every value reaching the highest frequency, ascending
    pub mode: Vec<f64>,
    pub std_dev: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub sum: f64,
    pub count: usize,
}

/// Numbers separated by commas and/or whitespace; other tokens are dropped
///
/// # Example
/// ```
/// assert_eq!(graphium::stats::parse_data("1, 2 x 3\n4"), vec![1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn parse_data(text: &str) -> Vec<f64> {
    SEPARATORS
        .split(text)
        .filter_map(|s| s.trim().parse::<f64>().ok())
        .filter(|v| !v.is_nan())
        .collect()
}

fn sorted(data: &[f64]) -> Vec<f64> {
    let mut v = data.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Values with the highest frequency, in ascending order
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &v in sorted {
        // -0 and 0 share a bucket
        let v = v + 0.0;
        match runs.last_mut() {
            Some((last, count)) if *last == v => *count += 1,
            _ => runs.push((v, 1)),
        }
    }
    let best = runs.iter().map(|&(_, c)| c).max().unwrap_or(0);
    runs.into_iter()
        .filter(|&(_, c)| c == best)
        .map(|(v, _)| v)
        .collect()
}

/// Mean, median, mode, spread and totals of `data`
pub fn statistics(data: &[f64]) -> CalcResult<Summary> {
    let n = data.len();
    if n < 2 {
        return Err(CalcError::TooFewPoints { got: n, min: 2 });
    }

    let sum: f64 = data.iter().sum();
    let mean = sum / n as f64;
    let sorted = sorted(data);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let (min, max) = (sorted[0], sorted[n - 1]);

    Ok(Summary {
        mean,
        median,
        mode: modes(&sorted),
        std_dev: variance.sqrt(),
        variance,
        min,
        max,
        range: max - min,
        sum,
        count: n,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    /// `"start-end"` with one decimal each
    pub fn label(&self) -> String {
        format!("{}-{}", to_fixed(self.start, 1), to_fixed(self.end, 1))
    }
}

/// `min(10, ceil(sqrt(n)))` equal-width bins from min to max
///
/// Bins are half-open except the last, which also takes the maximum. A data
/// set with no spread uses a bin width of 1.
pub fn histogram(data: &[f64]) -> Vec<Bin> {
    if data.len() < 2 {
        return Vec::new();
    }
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bins = MAX_BINS.min((data.len() as f64).sqrt().ceil() as usize);
    let width = match (max - min) / bins as f64 {
        w if w == 0.0 || !w.is_finite() => 1.0,
        w => w,
    };

    let mut counts = vec![0usize; bins];
    for &v in data {
        // The maximum lands in the last bin
        let i = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[i] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = min + i as f64 * width;
            Bin {
                start,
                end: start + width,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let s = statistics(&parse_data("1, 2, 3, 4, 5, 6, 7, 8, 9, 10")).unwrap();
        assert_eq!(s.mean, 5.5);
        assert_eq!(s.median, 5.5);
        assert_eq!(s.variance, 8.25);
        assert_eq!(s.range, 9.0);
        assert_eq!(s.sum, 55.0);
        assert_eq!(s.count, 10);
        assert_eq!(s.mode.len(), 10);
    }

    #[test]
    fn test_population_variance() {
        let s = statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(s.variance, 4.0);
        assert_eq!(s.std_dev, 2.0);
        assert_eq!(s.mode, vec![4.0]);
        assert_eq!(s.median, 4.5);
    }

    #[test]
    fn test_mode_ascending() {
        let s = statistics(&[3.0, 1.0, 3.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.mode, vec![1.0, 3.0]);
        assert_eq!(s.median, 2.0);
    }

    #[test]
    fn test_too_few_points() {
        assert_eq!(
            statistics(&[1.0]),
            Err(CalcError::TooFewPoints { got: 1, min: 2 })
        );
    }

    #[test]
    fn test_parse_data_drops_garbage() {
        assert_eq!(parse_data(" 1.5,,abc -2 \t3e2 "), vec![1.5, -2.0, 300.0]);
        assert!(parse_data("").is_empty());
    }

    #[test]
    fn test_histogram() {
        let data: Vec<f64> = (1..=10).map(f64::from).collect();
        let bins = histogram(&data);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 10);
        // Last bin is closed
        assert_eq!(bins[3].count, 3);
        assert_eq!(bins[3].end, 10.0);
    }

    #[test]
    fn test_histogram_constant_data() {
        let bins = histogram(&[5.0, 5.0, 5.0]);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 3);
        assert_eq!(bins[0].label(), "5.0-6.0");
    }
}
