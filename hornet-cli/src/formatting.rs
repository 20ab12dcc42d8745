//! Output Formatting
//!
//! Human-readable output for the benchmark list, selections and finished
//! runs:
//! - Benchmarks with weight, baseline time and tags
//! - Tags in display order with their activity under the current selection
//! - Per-benchmark status, run means and margins of error
//! - The index and the end-of-run message

use hornet_core::{BenchmarkStatus, Registry, TagActivity, TagIndex};
use hornet_runner::RunReport;

/// Format the registry and tag index for `hornet list`
pub fn format_benchmark_list(version: &str, registry: &Registry, tags: &TagIndex) -> String {
    let mut output = String::new();

    if version.is_empty() {
        output.push_str("Hornet Suite\n");
    } else {
        output.push_str(&format!("Hornet Suite {}\n", version));
    }
    output.push_str(&"=".repeat(60));
    output.push('\n');

    for benchmark in registry {
        let marker = if benchmark.is_enabled() { "x" } else { " " };
        let tag_names: Vec<&str> = tags.tags_of(benchmark.index()).map(|t| t.name()).collect();
        output.push_str(&format!(
            "[{}] {:<24} {:>8.2}ms {:>7.2}%  [{}]\n",
            marker,
            benchmark.id(),
            benchmark.baseline_time(),
            benchmark.computed_weight(),
            tag_names.join(", ")
        ));
        if !benchmark.description().is_empty() {
            output.push_str(&format!("      {}\n", benchmark.description()));
        }
    }

    output.push_str(&format!("{} benchmarks found.\n\n", registry.len()));
    output.push_str(&format_tags(registry, tags));
    output
}

/// Tags in display order with selection activity
pub fn format_tags(registry: &Registry, tags: &TagIndex) -> String {
    let mut output = String::from("Tags:\n");
    for tag in tags.iter() {
        let activity = match tags.activity(tag, registry) {
            TagActivity::Active => "●",
            TagActivity::Partial => "◐",
            TagActivity::Inactive => "○",
        };
        output.push_str(&format!(
            "  {} {:<12} {} ({})\n",
            activity,
            tag.name().to_lowercase(),
            tag.pretty_name(),
            tag.members().len()
        ));
    }
    output
}

/// Enabled ids and canonical fragment for `hornet select`
pub fn format_selection(registry: &Registry, fragment: &str) -> String {
    let enabled = registry.enabled_ids();
    let mut output = format!("Enabled ({}/{}):", enabled.len(), registry.len());
    if enabled.is_empty() {
        output.push_str(" none");
    } else {
        output.push(' ');
        output.push_str(&enabled.join(", "));
    }
    output.push('\n');
    output.push_str(&format!("Fragment: #{}\n", fragment));
    output
}

/// Format a finished run for terminal display
pub fn format_human_output(report: &RunReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Hornet Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    for benchmark in &report.benchmarks {
        let status_icon = match benchmark.status {
            BenchmarkStatus::Success => "✓",
            BenchmarkStatus::Skipped | BenchmarkStatus::NonCore | BenchmarkStatus::NoStatus => "⊘",
            BenchmarkStatus::PopupBlocked => "⊗",
            _ => "✗",
        };
        output.push_str(&format!(
            "  {} {:<24} {}\n",
            status_icon, benchmark.id, benchmark.caption
        ));

        for result in &benchmark.results {
            output.push_str(&format!(
                "      {:<12} mean: {:.3} ms  ±{:.2}%  samples: {}\n",
                result.name, result.mean_ms, result.rme, result.samples
            ));
        }
        if let Some(score) = &benchmark.score {
            output.push_str(&format!(
                "      score: {:.2}  raw: {:.2}\n",
                score.score, score.raw_score
            ));
        }
    }

    output.push('\n');
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!("Index: {}\n", report.summary.index));
    output.push_str(&format!("Raw score: {:.2}\n", report.summary.raw_score));
    if let Some(message) = &report.summary.message {
        output.push('\n');
        output.push_str(message);
        output.push('\n');
    }
    output
}
