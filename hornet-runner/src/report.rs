//! Run Report
//!
//! Serializable snapshot of a finished run, written as JSON by the CLI.

use crate::orchestrator::Orchestrator;
use crate::outcome::{RunOutcome, StatusTally};
use chrono::{DateTime, Utc};
use hornet_core::{BenchmarkScore, BenchmarkStatus, RunResult};
use serde::{Deserialize, Serialize};

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report metadata
    pub meta: ReportMeta,
    /// One entry per benchmark, in registry order
    pub benchmarks: Vec<BenchmarkReport>,
    /// Totals and outcome
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Hornet version
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Selection fragment the run used
    pub selection: String,
    /// Run duration as measured by the orchestrator's clock
    pub duration_ms: Option<f64>,
}

/// One benchmark's entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Benchmark id
    pub id: String,
    /// Display name
    pub name: String,
    /// Final status
    pub status: BenchmarkStatus,
    /// Human-readable status
    pub caption: String,
    /// Whether the benchmark was selected
    pub enabled: bool,
    /// Outside the core suite
    pub extended: bool,
    /// Tag names, special tags included
    pub tags: Vec<String>,
    /// Share of 100
    pub computed_weight: f64,
    /// Reference duration in milliseconds
    pub baseline_time: f64,
    /// Tracking issue, if any
    pub issue_number: Option<u32>,
    /// Per-run results
    pub results: Vec<RunResult>,
    /// Present for successful benchmarks
    pub score: Option<BenchmarkScore>,
}

/// Totals and outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Benchmarks per final status class
    pub tally: StatusTally,
    /// Summed score
    pub score: f64,
    /// Summed raw score
    pub raw_score: f64,
    /// Index as displayed (unpadded only when final)
    pub index: String,
    /// How the run ended
    pub outcome: Option<RunOutcome>,
    /// End-of-run message
    pub message: Option<String>,
}

impl RunReport {
    /// Snapshot the orchestrator's registry and totals
    pub fn build(orchestrator: &Orchestrator) -> Self {
        let registry = orchestrator.registry();
        let tags = orchestrator.tags();

        let benchmarks = registry
            .iter()
            .map(|b| BenchmarkReport {
                id: b.id().to_string(),
                name: b.name().to_string(),
                status: b.status(),
                caption: b.status().caption().to_string(),
                enabled: b.is_enabled(),
                extended: b.is_extended(),
                tags: tags.tags_of(b.index()).map(|t| t.name().to_string()).collect(),
                computed_weight: b.computed_weight(),
                baseline_time: b.baseline_time(),
                issue_number: b.issue_number(),
                results: b.results().to_vec(),
                score: (b.status() == BenchmarkStatus::Success).then(|| BenchmarkScore::of(b)),
            })
            .collect();

        let totals = orchestrator.totals();
        let outcome = orchestrator.outcome().cloned();

        Self {
            meta: ReportMeta {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                selection: orchestrator.selection(),
                duration_ms: orchestrator.elapsed().map(|d| d.as_secs_f64() * 1000.0),
            },
            benchmarks,
            summary: ReportSummary {
                tally: StatusTally::from_statuses(registry.iter().map(|b| b.status())),
                score: totals.score,
                raw_score: totals.raw_score,
                index: orchestrator.index_display(),
                message: outcome.as_ref().map(ToString::to_string),
                outcome,
            },
        }
    }
}

/// Serialize a report as pretty-printed JSON
pub fn generate_json_report(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
