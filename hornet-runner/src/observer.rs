//! Run Observer
//!
//! Rendering is somebody else's job; the orchestrator only reports what
//! happened. Every method has an empty default.

use crate::orchestrator::RunnerStatus;
use crate::outcome::RunOutcome;
use hornet_core::{Benchmark, BenchmarkScore, ScoreTotals};

/// Receives notifications while a run progresses
pub trait RunObserver {
    /// The process-level status changed
    fn on_runner_status(&mut self, _status: RunnerStatus) {}

    /// A benchmark changed status
    fn on_benchmark_status(&mut self, _benchmark: &Benchmark) {}

    /// Fraction of the registry walked so far, in `0.0..=1.0`
    fn on_progress(&mut self, _fraction: f64) {}

    /// A benchmark succeeded and was added to the totals
    fn on_benchmark_scored(
        &mut self,
        _benchmark: &Benchmark,
        _score: &BenchmarkScore,
        _totals: &ScoreTotals,
    ) {
    }

    /// The run finished
    fn on_finish(&mut self, _outcome: &RunOutcome, _totals: &ScoreTotals) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
