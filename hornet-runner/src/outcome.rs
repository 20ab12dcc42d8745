//! Run Outcome
//!
//! Tallies the final statuses of all benchmarks and picks the end-of-run
//! message. Failures are reported as counts only.

use hornet_core::{BenchmarkStatus, ScoreTotals, format_index};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Count of benchmarks per final status class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    /// Completed successfully
    pub succeeded: usize,
    /// Disabled extended benchmarks
    pub non_core: usize,
    /// Context creation blocked
    pub blocked: usize,
    /// Disabled core benchmarks
    pub skipped: usize,
    /// Everything else (load failures, run failures, aborts)
    pub failed: usize,
    /// All benchmarks
    pub total: usize,
}

impl StatusTally {
    /// Tally a sequence of statuses
    pub fn from_statuses(statuses: impl IntoIterator<Item = BenchmarkStatus>) -> Self {
        let mut tally = Self::default();
        for status in statuses {
            tally.total += 1;
            match status {
                BenchmarkStatus::Success => tally.succeeded += 1,
                BenchmarkStatus::NonCore => tally.non_core += 1,
                BenchmarkStatus::PopupBlocked => tally.blocked += 1,
                BenchmarkStatus::Skipped => tally.skipped += 1,
                _ => tally.failed += 1,
            }
        }
        tally
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every benchmark succeeded or sat outside the core suite
    Index {
        /// Final index
        score: f64,
        /// Final raw score
        raw_score: f64,
        /// Where the scoring is explained
        learn_more_url: String,
    },
    /// At least one context was blocked
    PopupBlocked {
        /// Number of blocked benchmarks
        blocked: usize,
    },
    /// At least one benchmark failed
    Failed {
        /// Failed benchmarks
        failed: usize,
        /// All benchmarks
        total: usize,
    },
    /// Some benchmarks were skipped
    Partial {
        /// Successful benchmarks
        succeeded: usize,
        /// All benchmarks
        total: usize,
    },
}

impl RunOutcome {
    /// Pick the outcome for a finished run.
    ///
    /// A final index requires every benchmark to be SUCCESS or NON_CORE.
    /// Otherwise blocked contexts take precedence over other failures.
    pub fn decide(tally: &StatusTally, totals: &ScoreTotals, learn_more_url: &str) -> Self {
        if tally.succeeded + tally.non_core == tally.total {
            RunOutcome::Index {
                score: totals.score,
                raw_score: totals.raw_score,
                learn_more_url: learn_more_url.to_string(),
            }
        } else if tally.blocked > 0 {
            RunOutcome::PopupBlocked {
                blocked: tally.blocked,
            }
        } else if tally.failed > 0 {
            RunOutcome::Failed {
                failed: tally.failed,
                total: tally.total,
            }
        } else {
            RunOutcome::Partial {
                succeeded: tally.succeeded,
                total: tally.total,
            }
        }
    }

    /// Final unpadded index, if the run produced one
    pub fn index(&self) -> Option<String> {
        match self {
            RunOutcome::Index { score, .. } => Some(format_index(*score, true)),
            _ => None,
        }
    }

    /// Whether the run produced a final index
    pub fn is_final(&self) -> bool {
        matches!(self, RunOutcome::Index { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Index { learn_more_url, .. } => write!(
                f,
                "The index is normalized to 100 and roughly shows this machine's performance \
                 compared to other modern setups on reference hardware. Learn more: {learn_more_url}"
            ),
            RunOutcome::PopupBlocked { .. } => f.write_str(
                "The popup blocker prevented some of the benchmarks from running. \
                 Disable the popup blocker and run the test again to see the index.",
            ),
            RunOutcome::Failed { failed, total } => {
                write!(f, "{failed} out of {total} benchmark(s) failed.")
            }
            RunOutcome::Partial { succeeded, total } => write!(
                f,
                "Ran {succeeded} out of {total} benchmarks. Enable all benchmarks to compute the index."
            ),
        }
    }
}
