//! Terminal progress for a running suite

use hornet_core::{Benchmark, BenchmarkScore, ScoreTotals};
use hornet_runner::{RunObserver, RunOutcome};
use indicatif::{ProgressBar, ProgressStyle};

/// Shows an indicatif bar advancing as benchmarks finish
pub struct ProgressObserver {
    pb: ProgressBar,
    total: usize,
}

impl ProgressObserver {
    /// Bar sized for `total` benchmarks
    pub fn new(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { pb, total }
    }

    /// Bar that draws nothing (JSON output, tests)
    pub fn hidden(total: usize) -> Self {
        Self {
            pb: ProgressBar::hidden(),
            total,
        }
    }
}

impl RunObserver for ProgressObserver {
    fn on_benchmark_status(&mut self, benchmark: &Benchmark) {
        if benchmark.status().is_in_flight() {
            self.pb
                .set_message(format!("{} ({})", benchmark.id(), benchmark.status()));
        }
    }

    fn on_progress(&mut self, fraction: f64) {
        self.pb.set_position((fraction * self.total as f64).round() as u64);
    }

    fn on_benchmark_scored(
        &mut self,
        benchmark: &Benchmark,
        score: &BenchmarkScore,
        totals: &ScoreTotals,
    ) {
        self.pb.println(format!(
            "  ✓ {:<24} {:>10.2}ms  score {:>7.2}  index {}",
            benchmark.id(),
            score.accumulated_mean,
            score.score,
            totals.index(false)
        ));
    }

    fn on_finish(&mut self, outcome: &RunOutcome, _totals: &ScoreTotals) {
        self.pb.set_position(self.total as u64);
        let message = match outcome.index() {
            Some(index) => format!("Index {index}"),
            None => "Finished".to_string(),
        };
        self.pb.finish_with_message(message);
    }
}
