//! Integration tests for Hornet
//!
//! These tests drive whole runs through the public API: definitions in,
//! statuses, scores and the end-of-run outcome out.

use hornet::{
    BenchmarkDef, BenchmarkPage, BenchmarkStatus, Clock, InProcessLauncher, ManualClock,
    Orchestrator, OrchestratorConfig, Registry, Run, RunOutcome, RunReport, RunnerStatus, SuiteConfig, SuiteFile,
    SystemClock, TagDef, TagIndex, TagKind, generate_json_report,
};
use serde_json::Value;
use std::time::Duration;

fn def(id: &str, weight: f64, baseline: f64, tags: &[&str], extended: bool) -> BenchmarkDef {
    BenchmarkDef {
        name: id.to_uppercase(),
        description: format!("{id} benchmark"),
        filename: format!("benchmarks/{id}.html"),
        runs: vec![Run::new("default", Value::from(100))],
        weight,
        baseline_time: baseline,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        issue_number: None,
        extended,
    }
}

/// Page whose test hook takes exactly `ms` of manual time
fn timed(clock: &ManualClock, ms: u64) -> impl Fn() -> BenchmarkPage + 'static {
    let clock = clock.clone();
    move || {
        let clock = clock.clone();
        BenchmarkPage::new().with_test(move |_| clock.advance(Duration::from_millis(ms)))
    }
}

fn quick_suite() -> SuiteConfig {
    SuiteConfig {
        min_samples: 2,
        max_samples: 5,
        min_time: Duration::ZERO,
        max_time: Duration::from_secs(2),
    }
}

fn orchestrator(
    defs: Vec<BenchmarkDef>,
    tags: Vec<TagDef>,
    launcher: InProcessLauncher,
    clock: &ManualClock,
) -> Orchestrator {
    let registry = Registry::new(defs).unwrap();
    let tags = TagIndex::new(&registry, tags).unwrap();
    Orchestrator::new(registry, tags, launcher)
        .with_clock(clock.clone())
        .with_suite_config(quick_suite())
}

#[test]
fn test_reference_scoring_end_to_end() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/slow.html", timed(&clock, 200))
        .with_page("benchmarks/fast.html", timed(&clock, 50));
    let mut orchestrator = orchestrator(
        vec![
            def("slow", 1.0, 100.0, &[], false),
            def("fast", 1.0, 100.0, &[], false),
        ],
        Vec::new(),
        launcher,
        &clock,
    );

    let outcome = orchestrator.run_to_completion().unwrap();

    // slow: 100 * 50 / 200 = 25, fast: 100 * 50 / 50 = 100
    let slow = &orchestrator.registry()[0];
    assert!((slow.computed_weight() - 50.0).abs() < 1e-9);
    assert!((slow.results()[0].mean_ms - 200.0).abs() < 1e-9);
    assert!((orchestrator.totals().score - 125.0).abs() < 1e-9);
    // raw: 200 * 50 + 50 * 50
    assert!((orchestrator.totals().raw_score - 12_500.0).abs() < 1e-6);

    assert!(outcome.is_final());
    assert_eq!(outcome.index().as_deref(), Some("125.00"));
    assert!(outcome.to_string().contains("Learn more:"));
    assert_eq!(orchestrator.status(), RunnerStatus::Ready);
}

#[test]
fn test_disabled_extended_still_yields_final_index() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/core.html", timed(&clock, 10))
        .with_page("benchmarks/extra.html", timed(&clock, 10));
    let mut orchestrator = orchestrator(
        vec![
            def("core", 1.0, 10.0, &[], false),
            def("extra", 1.0, 10.0, &[], true),
        ],
        Vec::new(),
        launcher,
        &clock,
    );

    // Empty fragment selects the core suite
    orchestrator.select("").unwrap();
    let outcome = orchestrator.run_to_completion().unwrap();

    assert_eq!(orchestrator.registry()[0].status(), BenchmarkStatus::Success);
    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::NonCore);
    assert!(outcome.is_final());
    assert!((orchestrator.totals().score - 50.0).abs() < 1e-9);
}

#[test]
fn test_skipped_core_benchmark_gives_partial_outcome() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/a.html", timed(&clock, 10))
        .with_page("benchmarks/b.html", timed(&clock, 10));
    let mut orchestrator = orchestrator(
        vec![def("a", 1.0, 10.0, &[], false), def("b", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    );

    orchestrator.select("d=b").unwrap();
    let outcome = orchestrator.run_to_completion().unwrap();

    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::Skipped);
    assert_eq!(outcome, RunOutcome::Partial { succeeded: 1, total: 2 });
    assert!(!outcome.is_final());
    assert_eq!(orchestrator.index_display(), "050.00");
}

#[test]
fn test_blocked_context_reports_popup_blocker() {
    let clock = ManualClock::new();
    // Nothing registered for "b": opening it is blocked
    let launcher = InProcessLauncher::new().with_page("benchmarks/a.html", timed(&clock, 10));
    let mut orchestrator = orchestrator(
        vec![def("a", 1.0, 10.0, &[], false), def("b", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    );

    let outcome = orchestrator.run_to_completion().unwrap();

    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::PopupBlocked);
    assert!(matches!(outcome, RunOutcome::PopupBlocked { blocked: 1 }));
    assert_eq!(
        outcome.to_string(),
        "The popup blocker prevented some of the benchmarks from running. \
         Disable the popup blocker and run the test again to see the index."
    );
}

#[test]
fn test_failures_are_counted_over_all_benchmarks() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/ok.html", timed(&clock, 10))
        .with_page("benchmarks/panics.html", || {
            BenchmarkPage::new().with_test(|_| panic!("boom"))
        })
        .with_stalled_page("benchmarks/stalls.html");
    let mut orchestrator = orchestrator(
        vec![
            def("ok", 1.0, 10.0, &[], false),
            def("panics", 1.0, 10.0, &[], false),
            def("stalls", 1.0, 10.0, &[], false),
        ],
        Vec::new(),
        launcher,
        &clock,
    );

    let outcome = orchestrator.run_to_completion().unwrap();

    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::Aborted);
    assert_eq!(orchestrator.registry()[2].status(), BenchmarkStatus::LoadFailed);
    assert_eq!(outcome.to_string(), "2 out of 3 benchmark(s) failed.");
    // Only the successful benchmark contributed
    assert!((orchestrator.totals().score - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_single_failure_message() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new().with_stalled_page("benchmarks/only.html");
    let mut orchestrator = orchestrator(
        vec![def("only", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    );

    let outcome = orchestrator.run_to_completion().unwrap();

    assert_eq!(outcome, RunOutcome::Failed { failed: 1, total: 1 });
    assert_eq!(outcome.to_string(), "1 out of 1 benchmark(s) failed.");
    assert_eq!(orchestrator.index_display(), "000.00");
}

#[test]
fn test_index_message_links_configured_url() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new().with_page("benchmarks/a.html", timed(&clock, 10));
    let config = OrchestratorConfig {
        learn_more_url: "https://bench.example.org/scoring".to_string(),
        ..OrchestratorConfig::default()
    };
    let mut orchestrator = orchestrator(
        vec![def("a", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    )
    .with_config(config);

    let outcome = orchestrator.run_to_completion().unwrap();

    let message = outcome.to_string();
    assert!(message.ends_with("Learn more: https://bench.example.org/scoring"));
    let RunOutcome::Index { learn_more_url, .. } = &outcome else {
        panic!("expected a final index, got {outcome:?}");
    };
    assert_eq!(learn_more_url, "https://bench.example.org/scoring");
    assert_eq!(orchestrator.index_display(), "100.00");
}

#[test]
fn test_at_most_one_context_is_live() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/a.html", timed(&clock, 5))
        .with_page("benchmarks/b.html", timed(&clock, 5))
        .with_page("benchmarks/c.html", timed(&clock, 5));
    let stats = launcher.stats();
    let mut orchestrator = orchestrator(
        vec![
            def("a", 1.0, 10.0, &[], false),
            def("b", 1.0, 10.0, &[], false),
            def("c", 1.0, 10.0, &[], false),
        ],
        Vec::new(),
        launcher,
        &clock,
    );

    orchestrator.run_to_completion().unwrap();

    assert_eq!(stats.opened(), 3);
    assert_eq!(stats.peak(), 1);
    assert_eq!(stats.live(), 0);
}

#[test]
fn test_benchmarks_run_in_registry_order() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/a.html", timed(&clock, 10))
        .with_page("benchmarks/b.html", timed(&clock, 10));
    let mut orchestrator = orchestrator(
        vec![def("a", 1.0, 10.0, &[], false), def("b", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    );

    orchestrator.run().unwrap();
    assert_eq!(orchestrator.registry()[0].status(), BenchmarkStatus::Pending);
    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::Pending);

    // First advance waits for the settle delay
    orchestrator.poll();
    assert_eq!(orchestrator.registry()[0].status(), BenchmarkStatus::Pending);

    clock.advance(Duration::from_millis(25));
    orchestrator.poll();
    assert_eq!(orchestrator.registry()[0].status(), BenchmarkStatus::Success);
    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::Pending);

    orchestrator.wait_until_ready();
    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::Success);
}

#[test]
fn test_rerun_resets_previous_results() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new()
        .with_page("benchmarks/a.html", timed(&clock, 10))
        .with_page("benchmarks/b.html", timed(&clock, 10));
    let mut orchestrator = orchestrator(
        vec![def("a", 1.0, 10.0, &[], false), def("b", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    );

    orchestrator.run_to_completion().unwrap();
    assert!((orchestrator.totals().score - 100.0).abs() < 1e-9);

    orchestrator.set_enabled("b", false).unwrap();
    orchestrator.run_to_completion().unwrap();
    assert!((orchestrator.totals().score - 50.0).abs() < 1e-9);
    assert!(orchestrator.registry()[1].results().is_empty());
    assert_eq!(orchestrator.registry()[1].status(), BenchmarkStatus::Skipped);
}

#[test]
fn test_selection_round_trips_through_orchestrator() {
    let clock = ManualClock::new();
    let mut orchestrator = orchestrator(
        vec![
            def("addrow", 1.0, 10.0, &["dom"], false),
            def("sortrows", 1.0, 10.0, &["dom", "table"], false),
            def("canvas", 1.0, 10.0, &[], false),
            def("svgresize", 1.0, 10.0, &[], true),
        ],
        vec![
            TagDef::new("DOM", "DOM", TagKind::Technology),
            TagDef::new("TABLE", "Table", TagKind::App),
        ],
        InProcessLauncher::new(),
        &clock,
    );

    orchestrator.select("et=dom").unwrap();
    assert_eq!(orchestrator.registry().enabled_ids(), vec!["addrow", "sortrows"]);
    assert_eq!(orchestrator.selection(), "et=dom");

    orchestrator.select("#e=canvas,svgresize").unwrap();
    assert_eq!(orchestrator.selection(), "e=canvas,svgresize");

    orchestrator.select("d=svgresize").unwrap();
    assert_eq!(orchestrator.selection(), "e=canvas");

    orchestrator.enable_all().unwrap();
    assert_eq!(orchestrator.selection(), "et=extended");

    orchestrator.select_tag("table").unwrap();
    orchestrator.add_tag_to_selection("core").unwrap();
    assert_eq!(orchestrator.selection(), "");
}

#[test]
fn test_deferred_test_resolved_from_another_thread() {
    let launcher = InProcessLauncher::new().with_page("benchmarks/worker.html", || {
        BenchmarkPage::new().with_test_async(|deferred, _| {
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(2));
                deferred.resolve();
            });
        })
    });
    let registry = Registry::new(vec![def("worker", 1.0, 2.0, &[], false)]).unwrap();
    let tags = TagIndex::new(&registry, Vec::new()).unwrap();
    let mut orchestrator = Orchestrator::new(registry, tags, launcher)
        .with_clock(SystemClock::new())
        .with_suite_config(SuiteConfig {
            min_samples: 2,
            max_samples: 3,
            min_time: Duration::ZERO,
            max_time: Duration::from_secs(5),
        });

    let outcome = orchestrator.run_to_completion().unwrap();

    let worker = &orchestrator.registry()[0];
    assert_eq!(worker.status(), BenchmarkStatus::Success);
    assert!(worker.results()[0].samples >= 2);
    assert!(worker.results()[0].mean_ms >= 2.0);
    assert!(outcome.is_final());
}

#[test]
fn test_load_timeout_uses_manual_time() {
    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new().with_stalled_page("benchmarks/a.html");
    let mut orchestrator = orchestrator(
        vec![def("a", 1.0, 10.0, &[], false)],
        Vec::new(),
        launcher,
        &clock,
    );

    orchestrator.run_to_completion().unwrap();
    assert_eq!(orchestrator.registry()[0].status(), BenchmarkStatus::LoadFailed);
    assert!(clock.now() >= Duration::from_secs(60));
}

#[test]
fn test_suite_file_to_report() {
    let json = r#"{
        "version": "RH-T1",
        "tags": [{ "name": "DOM", "prettyName": "DOM", "type": "technology" }],
        "benchmarks": [
            {
                "name": "Add Row",
                "description": "Appends rows",
                "filename": "benchmarks/addrow.html",
                "runs": [["100", 100]],
                "weight": 1,
                "baselineTime": 20,
                "tags": ["DOM"]
            }
        ]
    }"#;
    let suite = SuiteFile::parse(json).unwrap();
    let (registry, tags) = suite.build().unwrap();

    let clock = ManualClock::new();
    let launcher = InProcessLauncher::new().with_page("benchmarks/addrow.html", timed(&clock, 20));
    let mut orchestrator = Orchestrator::new(registry, tags, launcher)
        .with_clock(clock.clone())
        .with_suite_config(quick_suite());
    orchestrator.run_to_completion().unwrap();

    let report = RunReport::build(&orchestrator);
    assert_eq!(report.benchmarks.len(), 1);
    assert_eq!(report.benchmarks[0].id, "addrow");
    assert_eq!(report.summary.index, "100.00");

    let json = generate_json_report(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["outcome"]["kind"], "index");
}
