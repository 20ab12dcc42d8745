//! Runner Configuration
//!
//! Plain resolved settings. File parsing lives in the CLI; these structs
//! only carry `Duration`s and numbers.

use std::time::Duration;

/// Link appended to the final-index message
pub const DEFAULT_LEARN_MORE_URL: &str = "https://code.google.com/p/robohornet/wiki/BenchmarkScoring";

/// Query marker appended to a benchmark's path when its context is opened
pub const DEFAULT_QUERY_MARKER: &str = "use_test_runner";

/// Orchestrator settings
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Short delay between successful steps
    pub settle_delay: Duration,
    /// Long delay after an abort, before the next context opens
    pub cooldown_delay: Duration,
    /// How long a context may take to signal "loaded"
    pub load_timeout: Duration,
    /// How long a deferred run may stay unresolved
    pub run_timeout: Duration,
    /// Context viewport width
    pub viewport_width: u32,
    /// Context viewport height
    pub viewport_height: u32,
    /// Query marker addressing a benchmark's isolated context
    pub query_marker: String,
    /// Link included in the final-index message
    pub learn_more_url: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(25),
            cooldown_delay: Duration::from_millis(250),
            load_timeout: Duration::from_secs(60),
            run_timeout: Duration::from_secs(60),
            viewport_width: 800,
            viewport_height: 600,
            query_marker: DEFAULT_QUERY_MARKER.to_string(),
            learn_more_url: DEFAULT_LEARN_MORE_URL.to_string(),
        }
    }
}

/// Sampling settings for [`crate::SampledSuite`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuiteConfig {
    /// Samples collected before a run may finish
    pub min_samples: usize,
    /// Hard cap on samples per run
    pub max_samples: usize,
    /// Time a run keeps sampling once `min_samples` is reached
    pub min_time: Duration,
    /// Hard cap on time per run
    pub max_time: Duration,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            min_samples: hornet_stats::DEFAULT_MIN_SAMPLES,
            max_samples: 100,
            min_time: Duration::from_secs(1),
            max_time: Duration::from_secs(5),
        }
    }
}

impl SuiteConfig {
    /// Whether a run with `samples` collected over `elapsed` is done
    pub fn run_finished(&self, samples: usize, elapsed: Duration) -> bool {
        if samples == 0 {
            return false;
        }
        samples >= self.max_samples.max(1)
            || elapsed >= self.max_time
            || (samples >= self.min_samples && elapsed >= self.min_time)
    }
}
