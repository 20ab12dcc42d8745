//! Benchmark Data Model
//!
//! `BenchmarkDef` is the raw record as it appears in a definitions file.
//! `Benchmark` is the registered entity: it carries the normalized weight,
//! the user's enabled flag and, while a run is in progress, its status and
//! per-run results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One parameterized measurement within a benchmark.
///
/// Serialized as a `[name, argument]` pair. The argument is opaque to the
/// runner and handed verbatim to the benchmark's hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, Value)", into = "(String, Value)")]
pub struct Run {
    /// Display name of the run (usually the parameter value)
    pub name: String,
    /// Argument passed to `setUp`, `test` and `tearDown`
    pub argument: Value,
}

impl Run {
    /// Create a run with the given name and argument
    pub fn new(name: impl Into<String>, argument: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            argument: argument.into(),
        }
    }
}

impl From<(String, Value)> for Run {
    fn from((name, argument): (String, Value)) -> Self {
        Self { name, argument }
    }
}

impl From<Run> for (String, Value) {
    fn from(run: Run) -> Self {
        (run.name, run.argument)
    }
}

/// Timing statistics of one completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Name of the run this result belongs to
    pub name: String,
    /// Mean duration of one test invocation in milliseconds
    pub mean_ms: f64,
    /// Relative margin of error in percent
    pub rme: f64,
    /// Number of samples the statistics were computed from
    pub samples: usize,
}

/// Raw benchmark definition, as loaded from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkDef {
    /// Human-readable name
    pub name: String,
    /// Longer description of what is measured
    #[serde(default)]
    pub description: String,
    /// Identifying path of the benchmark page; the id is derived from it
    pub filename: String,
    /// Ordered runs
    #[serde(default)]
    pub runs: Vec<Run>,
    /// Raw weight, normalized against the sum of all weights
    pub weight: f64,
    /// Reference duration in milliseconds
    pub baseline_time: f64,
    /// Names of technology/app tags this benchmark belongs to
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tracking issue for this benchmark
    #[serde(default)]
    pub issue_number: Option<u32>,
    /// Excluded from the default core set
    #[serde(default)]
    pub extended: bool,
}

/// Per-benchmark execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkStatus {
    /// Never run
    #[default]
    NoStatus,
    /// Waiting for its turn in the current run
    Pending,
    /// Execution context requested, not yet loaded
    Loading,
    /// Timing suite executing
    Running,
    /// All runs completed and scored
    Success,
    /// The execution context never finished loading
    LoadFailed,
    /// The benchmark failed while running
    RunFailed,
    /// Disabled core benchmark passed over by the run
    Skipped,
    /// The execution context could not be created
    PopupBlocked,
    /// The timing suite aborted
    Aborted,
    /// Disabled extended benchmark, outside the core suite
    NonCore,
}

impl BenchmarkStatus {
    /// Short caption shown next to the benchmark
    pub fn caption(self) -> &'static str {
        match self {
            BenchmarkStatus::NoStatus => "-",
            BenchmarkStatus::Pending => "Pending",
            BenchmarkStatus::Loading => "Loading...",
            BenchmarkStatus::Running => "Running...",
            BenchmarkStatus::Success => "Completed successfully",
            BenchmarkStatus::LoadFailed => "Failed to load",
            BenchmarkStatus::RunFailed => "Failed to run",
            BenchmarkStatus::Skipped => "Skipped",
            BenchmarkStatus::PopupBlocked => "Benchmark window blocked",
            BenchmarkStatus::Aborted => "Aborted by user",
            BenchmarkStatus::NonCore => "Not a part of the core suite",
        }
    }

    /// Whether the benchmark is still waiting on or inside its turn
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            BenchmarkStatus::Pending | BenchmarkStatus::Loading | BenchmarkStatus::Running
        )
    }
}

impl std::fmt::Display for BenchmarkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.caption())
    }
}

/// A registered benchmark
#[derive(Debug, Clone)]
pub struct Benchmark {
    pub(crate) index: usize,
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) filename: String,
    pub(crate) runs: Vec<Run>,
    pub(crate) weight: f64,
    pub(crate) computed_weight: f64,
    pub(crate) baseline_time: f64,
    pub(crate) tags: Vec<String>,
    pub(crate) issue_number: Option<u32>,
    pub(crate) extended: bool,
    pub(crate) enabled: bool,
    pub(crate) status: BenchmarkStatus,
    pub(crate) results: Vec<RunResult>,
}

impl Benchmark {
    /// Position in registry order
    pub fn index(&self) -> usize {
        self.index
    }

    /// Stable lowercase id derived from the identifying path
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description of what is measured
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Identifying path of the benchmark page
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Ordered runs
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Raw weight as declared
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Share of 100 across all registered benchmarks
    pub fn computed_weight(&self) -> f64 {
        self.computed_weight
    }

    /// Reference duration in milliseconds
    pub fn baseline_time(&self) -> f64 {
        self.baseline_time
    }

    /// Declared technology/app tag names (canonical upper case)
    pub fn declared_tags(&self) -> &[String] {
        &self.tags
    }

    /// Tracking issue number, if any
    pub fn issue_number(&self) -> Option<u32> {
        self.issue_number
    }

    /// Excluded from the default core set
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Selected for the next run
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle selection
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current execution status
    pub fn status(&self) -> BenchmarkStatus {
        self.status
    }

    /// Update execution status
    pub fn set_status(&mut self, status: BenchmarkStatus) {
        self.status = status;
    }

    /// Per-run results of the last successful execution
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    /// Store per-run results
    pub fn set_results(&mut self, results: Vec<RunResult>) {
        self.results = results;
    }

    /// Forget results and status from a previous run
    pub fn reset(&mut self, status: BenchmarkStatus) {
        self.results.clear();
        self.status = status;
    }
}
