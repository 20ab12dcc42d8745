//! Summary Statistics
//!
//! Mean, spread and margin of error of one run's samples. The relative
//! margin of error is what a run reports alongside its mean.

use crate::distribution::t_critical;
use serde::{Deserialize, Serialize};

/// Summary of one run's samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Sample variance (n - 1 denominator)
    pub variance: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Standard error of the mean
    pub sem: f64,
    /// Critical value used for the margin of error
    pub critical_value: f64,
    /// Margin of error (same unit as the samples)
    pub moe: f64,
    /// Relative margin of error in percent of the mean
    pub rme: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Number of samples
    pub sample_count: usize,
}

/// Compute summary statistics of `samples`.
///
/// An empty slice yields all zeros. Quantities that would divide by zero
/// (variance of one sample, rme of a zero mean) are reported as zero.
pub fn compute_summary(samples: &[f64]) -> SummaryStatistics {
    if samples.is_empty() {
        return SummaryStatistics::default();
    }

    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let variance = if n < 2 {
        0.0
    } else {
        samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    };
    let std_dev = variance.sqrt();
    let sem = std_dev / (n as f64).sqrt();
    let critical_value = t_critical(n - 1);
    let moe = sem * critical_value;
    let rme = if mean == 0.0 { 0.0 } else { moe / mean * 100.0 };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    SummaryStatistics {
        mean,
        variance,
        std_dev,
        sem,
        critical_value,
        moe,
        rme,
        min,
        max,
        sample_count: n,
    }
}
