#![warn(missing_docs)]
//! # Hornet
//!
//! Runs a suite of labeled, weighted benchmarks one at a time and folds their
//! timings into a single index normalized to 100.
//!
//! - **Registry**: benchmarks with weights normalized to a share of 100
//! - **Tags**: CORE, EXTENDED and NONE plus technology and app tags
//! - **Selection**: which benchmarks are enabled, as a short shareable fragment
//! - **Orchestrator**: strictly sequential load/run/retire with isolated contexts
//! - **Scoring**: `baseline * weight / mean` per benchmark, summed into the index
//!
//! ## Quick Start
//!
//! ```ignore
//! use hornet::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let launcher = InProcessLauncher::new().with_page("benchmarks/sort.html", || {
//!         BenchmarkPage::new().with_test(|arg| {
//!             let n = arg.as_u64().unwrap_or(1000);
//!             let mut v: Vec<u64> = (0..n).rev().collect();
//!             v.sort();
//!         })
//!     });
//!     hornet::run(launcher)
//! }
//! ```
//!
//! ## Deferred Benchmarks
//!
//! ```ignore
//! BenchmarkPage::new().with_test_async(|deferred, _arg| {
//!     std::thread::spawn(move || {
//!         do_work();
//!         deferred.resolve();
//!     });
//! })
//! ```

// Re-export core types
pub use hornet_core::{
    Benchmark, BenchmarkDef, BenchmarkScore, BenchmarkStatus, CORE_TAG, EXTENDED_TAG, NONE_TAG,
    Registry, RegistryError, Run, RunResult, ScoreTotals, Tag, TagActivity, TagDef, TagError,
    TagIndex, TagKind, derive_id, format_index, raw_score, score,
};

// Re-export the selection codec
pub use hornet_selection::{add_tag_to_selection, decode, encode, select_tag};

// Re-export the runner
pub use hornet_runner::{
    BenchmarkPage, Clock, ContextBlocked, ContextLauncher, ContextRequest, ContextStats, Deferred,
    ExecutionContext, InProcessLauncher, ManualClock, Orchestrator, OrchestratorConfig,
    RunObserver, RunOutcome, RunReport, RunnerError, RunnerStatus, SampledSuite, ScreenArea,
    SignalSender, SuiteConfig, SuiteEvent, SuiteProgress, SuiteSession, SystemClock, TimingSuite,
    WindowGeometry, generate_json_report,
};

// Re-export stats
pub use hornet_stats::{SummaryStatistics, compute_summary};

// Re-export configuration
pub use hornet_cli::{HornetConfig, SuiteFile};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchmarkPage, BenchmarkStatus, Deferred, InProcessLauncher, Orchestrator, Registry,
        RunOutcome, SuiteFile, TagIndex,
    };
}

/// Run the Hornet CLI harness.
///
/// Call this from your suite binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     hornet::run(launcher)
/// }
/// ```
pub use hornet_cli::run;
