//! Scoring Engine
//!
//! Pure functions turning a benchmark's run means into its contribution to
//! the index. A benchmark exactly as fast as its baseline contributes its
//! computed weight, so a full suite at baseline speed scores 100.

use crate::benchmark::{Benchmark, RunResult};
use serde::{Deserialize, Serialize};

/// Sum of the run means of one benchmark, in milliseconds
pub fn accumulated_mean(results: &[RunResult]) -> f64 {
    results.iter().map(|r| r.mean_ms).sum()
}

/// Weighted score: `baseline * computed_weight / accumulated_mean`
pub fn score(baseline_time: f64, computed_weight: f64, accumulated_mean: f64) -> f64 {
    baseline_time * computed_weight / accumulated_mean
}

/// Raw score: `accumulated_mean * computed_weight`
pub fn raw_score(accumulated_mean: f64, computed_weight: f64) -> f64 {
    accumulated_mean * computed_weight
}

/// Format the index with two decimals.
///
/// While a run is in progress the integer part is zero-padded to at least
/// three digits; the final index is unpadded.
pub fn format_index(score: f64, is_final: bool) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    if is_final {
        format!("{rounded:.2}")
    } else {
        format!("{rounded:06.2}")
    }
}

/// Score contribution of one benchmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkScore {
    /// Sum of run means in milliseconds
    pub accumulated_mean: f64,
    /// Weighted score
    pub score: f64,
    /// Raw score
    pub raw_score: f64,
}

impl BenchmarkScore {
    /// Score a benchmark from its stored results
    pub fn of(benchmark: &Benchmark) -> Self {
        Self::compute(
            benchmark.baseline_time(),
            benchmark.computed_weight(),
            benchmark.results(),
        )
    }

    /// Score results against a baseline and weight
    pub fn compute(baseline_time: f64, computed_weight: f64, results: &[RunResult]) -> Self {
        let accumulated_mean = accumulated_mean(results);
        Self {
            accumulated_mean,
            score: score(baseline_time, computed_weight, accumulated_mean),
            raw_score: raw_score(accumulated_mean, computed_weight),
        }
    }
}

/// Running totals across one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreTotals {
    /// Sum of weighted scores (the index)
    pub score: f64,
    /// Sum of raw scores
    pub raw_score: f64,
}

impl ScoreTotals {
    /// Zero both totals
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add one benchmark's contribution
    pub fn add(&mut self, contribution: &BenchmarkScore) {
        self.score += contribution.score;
        self.raw_score += contribution.raw_score;
    }

    /// Index formatted for display
    pub fn index(&self, is_final: bool) -> String {
        format_index(self.score, is_final)
    }

    /// Raw score formatted for display
    pub fn raw_display(&self) -> String {
        format!("{:.2}", self.raw_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(mean_ms: f64) -> RunResult {
        RunResult {
            name: "run".to_string(),
            mean_ms,
            rme: 0.0,
            samples: 5,
        }
    }

    #[test]
    fn test_reference_example() {
        // weight 50 of 100, baseline 100ms, one run at 200ms
        let contribution = BenchmarkScore::compute(100.0, 50.0, &[result(200.0)]);
        assert!((contribution.score - 25.0).abs() < 1e-12);
        assert!((contribution.raw_score - 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_accumulated_mean_sums_runs() {
        let results = [result(10.0), result(15.5), result(4.5)];
        assert!((accumulated_mean(&results) - 30.0).abs() < f64::EPSILON);
        assert_eq!(accumulated_mean(&[]), 0.0);
    }

    #[test]
    fn test_baseline_speed_contributes_weight() {
        assert!((score(40.0, 12.5, 40.0) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_accumulate() {
        let mut totals = ScoreTotals::default();
        totals.add(&BenchmarkScore::compute(100.0, 50.0, &[result(200.0)]));
        totals.add(&BenchmarkScore::compute(10.0, 50.0, &[result(5.0)]));
        assert!((totals.score - 125.0).abs() < 1e-9);
        assert!((totals.raw_score - 10_250.0).abs() < 1e-9);

        totals.reset();
        assert_eq!(totals, ScoreTotals::default());
    }

    #[test]
    fn test_format_index() {
        assert_eq!(format_index(25.0, false), "025.00");
        assert_eq!(format_index(25.0, true), "25.00");
        assert_eq!(format_index(0.0, false), "000.00");
        assert_eq!(format_index(7.456, false), "007.46");
        assert_eq!(format_index(123.4, false), "123.40");
        assert_eq!(format_index(1234.5, false), "1234.50");
        assert_eq!(format_index(99.999, true), "100.00");
    }
}
