//! Timing Suite Adapter
//!
//! Executes a benchmark's runs against its loaded page and reports either
//! per-run statistics or an abort. A session is driven step by step: it
//! returns `Waiting` while a deferred invocation is outstanding and picks
//! up again when the orchestrator hands it the resolution.
//!
//! `SampledSuite` is the default adapter:
//! - each sample is one cycle of setUp, resetMathRandom, test, tearDown
//! - only the test call is timed
//! - a page with both `test` and `test_async` uses the deferred form
//! - a panicking hook aborts the suite

use crate::clock::Clock;
use crate::config::SuiteConfig;
use crate::page::BenchmarkPage;
use crate::signal::SignalSender;
use hornet_core::{Run, RunResult};
use hornet_stats::compute_summary;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::debug;

/// What wakes a suite session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteEvent {
    /// The page just loaded
    Start,
    /// Deferred invocation `cycle` resolved
    Resolved {
        /// Cycle number the handle was created with
        cycle: u64,
    },
}

/// Where a suite session stands after a step
#[derive(Debug, Clone, PartialEq)]
pub enum SuiteProgress {
    /// A deferred invocation is outstanding
    Waiting,
    /// All runs finished, one result per run in run order
    Complete(Vec<RunResult>),
    /// The suite gave up
    Aborted(String),
}

/// Creates suite sessions, one per benchmark
pub trait TimingSuite {
    /// Start a session for `runs`
    fn begin(&self, runs: &[Run]) -> Box<dyn SuiteSession>;
}

/// Execution of one benchmark's runs
pub trait SuiteSession {
    /// Advance as far as possible without blocking
    fn drive(
        &mut self,
        event: SuiteEvent,
        page: &mut BenchmarkPage,
        signals: &SignalSender,
        clock: &dyn Clock,
    ) -> SuiteProgress;
}

/// Repeated-sampling suite with statistics from `hornet-stats`
#[derive(Debug, Clone, Default)]
pub struct SampledSuite {
    config: SuiteConfig,
}

impl SampledSuite {
    /// Suite with the given sampling limits
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }
}

impl TimingSuite for SampledSuite {
    fn begin(&self, runs: &[Run]) -> Box<dyn SuiteSession> {
        Box::new(SampledSession {
            config: self.config,
            runs: runs.to_vec(),
            current: 0,
            run_started: None,
            samples: Vec::new(),
            pending: None,
            cycles: 0,
            results: Vec::with_capacity(runs.len()),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingCycle {
    cycle: u64,
    started: Duration,
}

struct SampledSession {
    config: SuiteConfig,
    runs: Vec<Run>,
    current: usize,
    run_started: Option<Duration>,
    /// Sample durations of the current run, in milliseconds
    samples: Vec<f64>,
    pending: Option<PendingCycle>,
    cycles: u64,
    results: Vec<RunResult>,
}

impl SampledSession {
    fn step(
        &mut self,
        event: SuiteEvent,
        page: &mut BenchmarkPage,
        signals: &SignalSender,
        clock: &dyn Clock,
    ) -> Result<SuiteProgress, String> {
        if let SuiteEvent::Resolved { cycle } = event {
            match self.pending {
                Some(pending) if pending.cycle == cycle => {
                    self.pending = None;
                    self.samples
                        .push(millis(clock.now().saturating_sub(pending.started)));
                    let argument = &self.runs[self.current].argument;
                    guarded("tearDown", || page.call_tear_down(argument))?;
                }
                Some(_) => {
                    debug!("ignoring resolution of stale cycle {}", cycle);
                    return Ok(SuiteProgress::Waiting);
                }
                None => debug!("ignoring resolution of cycle {} with nothing pending", cycle),
            }
        } else if self.pending.is_some() {
            return Ok(SuiteProgress::Waiting);
        }

        loop {
            let Some(run) = self.runs.get(self.current) else {
                return Ok(SuiteProgress::Complete(std::mem::take(&mut self.results)));
            };

            let started = *self.run_started.get_or_insert_with(|| clock.now());
            let elapsed = clock.now().saturating_sub(started);
            if self.config.run_finished(self.samples.len(), elapsed) {
                let summary = compute_summary(&self.samples);
                debug!(
                    "run '{}' finished: mean {:.3}ms ±{:.2}% over {} samples",
                    run.name, summary.mean, summary.rme, summary.sample_count
                );
                self.results.push(RunResult {
                    name: run.name.clone(),
                    mean_ms: summary.mean,
                    rme: summary.rme,
                    samples: summary.sample_count,
                });
                self.samples.clear();
                self.run_started = None;
                self.current += 1;
                continue;
            }

            let argument = &run.argument;
            guarded("setUp", || page.call_set_up(argument))?;
            guarded("resetMathRandom", || page.call_reset_math_random())?;

            if page.has_test_async() {
                self.cycles += 1;
                let cycle = self.cycles;
                self.pending = Some(PendingCycle {
                    cycle,
                    started: clock.now(),
                });
                let deferred = signals.deferred(cycle);
                guarded("testAsync", || {
                    let _ = page.call_test_async(deferred, argument);
                })?;
                return Ok(SuiteProgress::Waiting);
            }

            if !page.has_test() {
                return Err("benchmark page defines no test hook".to_string());
            }

            let start = clock.now();
            guarded("test", || {
                page.call_test(argument);
            })?;
            self.samples.push(millis(clock.now().saturating_sub(start)));
            guarded("tearDown", || page.call_tear_down(argument))?;
        }
    }
}

impl SuiteSession for SampledSession {
    fn drive(
        &mut self,
        event: SuiteEvent,
        page: &mut BenchmarkPage,
        signals: &SignalSender,
        clock: &dyn Clock,
    ) -> SuiteProgress {
        self.step(event, page, signals, clock)
            .unwrap_or_else(SuiteProgress::Aborted)
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Call a page hook, turning a panic into an abort reason
fn guarded(hook: &str, f: impl FnOnce()) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        format!("{hook} panicked: {message}")
    })
}
