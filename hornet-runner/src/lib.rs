#![warn(missing_docs)]
//! Hornet Runner - Execution Orchestrator
//!
//! Runs the enabled benchmarks of a registry strictly one at a time:
//! - `Orchestrator` sequences load, run and retire for each benchmark
//! - `ContextLauncher` opens the isolated context a benchmark runs in
//! - `TimingSuite` measures a loaded page's runs (`SampledSuite` by default)
//! - `RunObserver` receives progress for whoever renders it
//! - `RunReport` captures the finished run for JSON output

mod clock;
mod config;
mod context;
mod error;
mod observer;
mod orchestrator;
mod outcome;
mod page;
mod queue;
mod report;
mod signal;
mod suite;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{DEFAULT_LEARN_MORE_URL, DEFAULT_QUERY_MARKER, OrchestratorConfig, SuiteConfig};
pub use context::{
    ContextBlocked, ContextLauncher, ContextRequest, ContextStats, ExecutionContext,
    InProcessLauncher, ScreenArea, WindowGeometry,
};
pub use error::{Result, RunnerError};
pub use observer::{NoopObserver, RunObserver};
pub use orchestrator::{Orchestrator, RunnerStatus};
pub use outcome::{RunOutcome, StatusTally};
pub use page::BenchmarkPage;
pub use report::{BenchmarkReport, ReportMeta, ReportSummary, RunReport, generate_json_report};
pub use signal::{Deferred, SignalSender, Ticket};
pub use suite::{SampledSuite, SuiteEvent, SuiteProgress, SuiteSession, TimingSuite};
