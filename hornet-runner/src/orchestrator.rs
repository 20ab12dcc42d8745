//! Execution Orchestrator
//!
//! Sequential state machine walking the registry one benchmark at a time:
//!
//! ```text
//! run() ─► Advance ─► load ─► LOADING ──loaded──► RUNNING ──complete──► SUCCESS ─┐
//!             ▲          │         │                  │                          │
//!             │       blocked  load timeout        abort / run timeout           │
//!             │          ▼         ▼                  ▼                          │
//!             │    POPUP_BLOCKED LOAD_FAILED       ABORTED                       │
//!             └──── settle ──────── cooldown ───── cooldown ───────── settle ────┘
//! ```
//!
//! All continuations go through a single event queue and all context
//! signals through a single channel, so the orchestrator itself never runs
//! two things at once. At most one execution context is live, and it is
//! closed before the next one is requested.

use crate::clock::{Clock, SystemClock};
use crate::config::{OrchestratorConfig, SuiteConfig};
use crate::context::{ContextLauncher, ContextRequest, ExecutionContext, WindowGeometry};
use crate::error::{Result, RunnerError};
use crate::observer::{NoopObserver, RunObserver};
use crate::outcome::{RunOutcome, StatusTally};
use crate::queue::{Continuation, Delay, EventQueue};
use crate::signal::{Envelope, SignalKind, SignalSender, Ticket};
use crate::suite::{SampledSuite, SuiteEvent, SuiteProgress, SuiteSession, TimingSuite};
use hornet_core::{BenchmarkScore, BenchmarkStatus, Registry, RunResult, ScoreTotals, TagIndex};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Process-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerStatus {
    /// Idle; the selection may change
    Ready,
    /// A run is in progress
    Running,
}

struct LiveContext {
    ticket: Ticket,
    handle: Box<dyn ExecutionContext>,
    signals: SignalSender,
    session: Option<Box<dyn SuiteSession>>,
}

/// Runs enabled benchmarks one after another and keeps the score
pub struct Orchestrator {
    registry: Registry,
    tags: TagIndex,
    config: OrchestratorConfig,
    launcher: Box<dyn ContextLauncher>,
    suite: Box<dyn TimingSuite>,
    clock: Box<dyn Clock>,
    observer: Box<dyn RunObserver>,

    status: RunnerStatus,
    /// Last registry position the run reached
    cursor: Option<usize>,
    /// Benchmark whose turn it is, until the next advance
    active: Option<usize>,
    context: Option<LiveContext>,
    queue: EventQueue,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
    tickets: u64,
    /// Bumped every time the suite starts waiting on a deferred run
    wait_epoch: u64,

    totals: ScoreTotals,
    outcome: Option<RunOutcome>,
    run_started: Duration,
    run_elapsed: Option<Duration>,
}

impl Orchestrator {
    /// Orchestrator with default configuration, the sampled suite and the
    /// system clock.
    pub fn new(registry: Registry, tags: TagIndex, launcher: impl ContextLauncher + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            registry,
            tags,
            config: OrchestratorConfig::default(),
            launcher: Box::new(launcher),
            suite: Box::new(SampledSuite::default()),
            clock: Box::new(SystemClock::new()),
            observer: Box::new(NoopObserver),
            status: RunnerStatus::Ready,
            cursor: None,
            active: None,
            context: None,
            queue: EventQueue::default(),
            tx,
            rx,
            tickets: 0,
            wait_epoch: 0,
            totals: ScoreTotals::default(),
            outcome: None,
            run_started: Duration::ZERO,
            run_elapsed: None,
        }
    }

    /// Replace the orchestrator settings
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a [`SampledSuite`] with these sampling limits
    pub fn with_suite_config(self, config: SuiteConfig) -> Self {
        self.with_suite(SampledSuite::new(config))
    }

    /// Replace the timing suite adapter
    pub fn with_suite(mut self, suite: impl TimingSuite + 'static) -> Self {
        self.suite = Box::new(suite);
        self
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Receive run notifications
    pub fn with_observer(mut self, observer: impl RunObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The benchmarks and their current state
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The tag index
    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Active settings
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Process-level status
    pub fn status(&self) -> RunnerStatus {
        self.status
    }

    /// Score totals of the current or last run
    pub fn totals(&self) -> &ScoreTotals {
        &self.totals
    }

    /// Outcome of the last finished run
    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Index for display: padded while running or incomplete, unpadded once
    /// a run produced a final index
    pub fn index_display(&self) -> String {
        let is_final = self.status == RunnerStatus::Ready
            && self.outcome.as_ref().is_some_and(RunOutcome::is_final);
        self.totals.index(is_final)
    }

    /// Wall time of the last finished run, as seen by the clock
    pub fn elapsed(&self) -> Option<Duration> {
        self.run_elapsed
    }

    // ------------------------------------------------------------------
    // Selection (only while READY)
    // ------------------------------------------------------------------

    fn ensure_ready(&self) -> Result<()> {
        match self.status {
            RunnerStatus::Ready => Ok(()),
            RunnerStatus::Running => Err(RunnerError::Busy),
        }
    }

    /// Apply a selection fragment
    pub fn select(&mut self, fragment: &str) -> Result<()> {
        self.ensure_ready()?;
        hornet_selection::decode(fragment, &mut self.registry, &self.tags);
        Ok(())
    }

    /// Fragment encoding the current selection
    pub fn selection(&self) -> String {
        hornet_selection::encode(&self.registry, &self.tags)
    }

    /// Toggle one benchmark. Returns `false` for an unknown id.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<bool> {
        self.ensure_ready()?;
        Ok(self.registry.set_enabled(id, enabled))
    }

    /// Enable exactly the members of tag `name`
    pub fn select_tag(&mut self, name: &str) -> Result<()> {
        self.ensure_ready()?;
        let tag = self
            .tags
            .get(name)
            .ok_or_else(|| RunnerError::UnknownTag(name.to_string()))?;
        hornet_selection::select_tag(&mut self.registry, tag);
        Ok(())
    }

    /// Enable the members of tag `name`, keeping the rest
    pub fn add_tag_to_selection(&mut self, name: &str) -> Result<()> {
        self.ensure_ready()?;
        let tag = self
            .tags
            .get(name)
            .ok_or_else(|| RunnerError::UnknownTag(name.to_string()))?;
        hornet_selection::add_tag_to_selection(&mut self.registry, tag);
        Ok(())
    }

    /// Enable every benchmark
    pub fn enable_all(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.registry.enable_all();
        Ok(())
    }

    /// Disable every benchmark
    pub fn disable_all(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.registry.disable_all();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Run control
    // ------------------------------------------------------------------

    /// Start a run. Progress happens in [`poll`](Self::poll) and
    /// [`wait`](Self::wait).
    pub fn run(&mut self) -> Result<()> {
        self.ensure_ready()?;

        self.release_context();
        self.queue.clear();
        while self.rx.try_recv().is_ok() {}

        for index in 0..self.registry.len() {
            if let Some(benchmark) = self.registry.get_mut(index) {
                let status = if benchmark.is_enabled() {
                    BenchmarkStatus::Pending
                } else {
                    BenchmarkStatus::NoStatus
                };
                benchmark.reset(status);
                self.observer.on_benchmark_status(benchmark);
            }
        }

        self.totals.reset();
        self.cursor = None;
        self.active = None;
        self.outcome = None;
        self.run_started = self.clock.now();
        self.run_elapsed = None;
        self.set_runner_status(RunnerStatus::Running);

        info!(
            "Starting run: {} of {} benchmark(s) enabled",
            self.registry.enabled_count(),
            self.registry.len()
        );
        self.schedule(Delay::Settle, Continuation::Advance);
        Ok(())
    }

    /// Handle every signal that has arrived and every continuation that is
    /// due, without blocking.
    pub fn poll(&mut self) -> RunnerStatus {
        loop {
            if let Ok(envelope) = self.rx.try_recv() {
                self.on_signal(envelope);
                continue;
            }
            match self.queue.pop_due(self.clock.now()) {
                Some(continuation) => self.on_continuation(continuation),
                None => break,
            }
        }
        self.status
    }

    /// Block until a signal arrives or the next continuation is due, then
    /// poll. Returns immediately when READY.
    pub fn wait(&mut self) -> RunnerStatus {
        if self.poll() == RunnerStatus::Ready {
            return self.status;
        }

        let Some(deadline) = self.queue.next_deadline() else {
            warn!("Run stalled with nothing scheduled; finishing");
            self.finish();
            return self.status;
        };

        match self.rx.recv_timeout(self.clock.time_until(deadline)) {
            Ok(envelope) => self.on_signal(envelope),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.clock.reached(deadline)
            }
        }
        self.poll()
    }

    /// Drive the current run until the process is READY again
    pub fn wait_until_ready(&mut self) {
        while self.wait() == RunnerStatus::Running {}
    }

    /// Start a run and drive it to the end
    pub fn run_to_completion(&mut self) -> Result<RunOutcome> {
        self.run()?;
        self.wait_until_ready();
        Ok(self.outcome.clone().unwrap_or_else(|| self.decide_outcome()))
    }

    /// Close any live context and stop the current run. Benchmarks still
    /// in flight are marked aborted.
    pub fn shutdown(&mut self) {
        self.release_context();
        self.queue.clear();
        while self.rx.try_recv().is_ok() {}

        if self.status == RunnerStatus::Running {
            for index in 0..self.registry.len() {
                if self.registry[index].status().is_in_flight() {
                    self.set_status(index, BenchmarkStatus::Aborted);
                }
            }
            self.active = None;
            self.set_runner_status(RunnerStatus::Ready);
            info!("Run shut down");
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn on_continuation(&mut self, continuation: Continuation) {
        debug!("Continuation due: {:?}", continuation);
        match continuation {
            Continuation::Advance => self.advance(),
            Continuation::LoadTimeout { ticket } => {
                if !self.is_live(ticket) || !self.active_has(BenchmarkStatus::Loading) {
                    return;
                }
                if let Some(index) = self.active {
                    warn!(
                        "{} did not load within {:?}",
                        self.registry[index].id(),
                        self.config.load_timeout
                    );
                    self.release_context();
                    self.set_status(index, BenchmarkStatus::LoadFailed);
                    self.schedule(Delay::Cooldown, Continuation::Advance);
                }
            }
            Continuation::RunTimeout { ticket, epoch } => {
                if self.is_live(ticket)
                    && epoch == self.wait_epoch
                    && self.active_has(BenchmarkStatus::Running)
                {
                    let reason = format!(
                        "deferred run not resolved within {:?}",
                        self.config.run_timeout
                    );
                    self.on_abort(&reason);
                }
            }
        }
    }

    fn on_signal(&mut self, envelope: Envelope) {
        if !self.is_live(envelope.ticket) {
            debug!(
                "Dropping {:?} from released context {:?}",
                envelope.kind, envelope.ticket
            );
            return;
        }
        match envelope.kind {
            SignalKind::Loaded => self.on_loaded(),
            SignalKind::Resolved { cycle } => self.drive_suite(SuiteEvent::Resolved { cycle }),
            SignalKind::Abort => self.on_abort("aborted by the benchmark"),
        }
    }

    /// Scan forward to the next enabled benchmark, marking the disabled
    /// ones on the way, and load it or finish the run.
    fn advance(&mut self) {
        if self.status != RunnerStatus::Running {
            return;
        }
        self.release_context();
        self.active = None;

        let total = self.registry.len();
        let mut next = self.cursor.map_or(0, |c| c + 1);
        while next < total && !self.registry[next].is_enabled() {
            let status = if self.registry[next].is_extended() {
                BenchmarkStatus::NonCore
            } else {
                BenchmarkStatus::Skipped
            };
            self.set_status(next, status);
            next += 1;
        }
        self.cursor = Some(next);

        if total > 0 {
            self.observer.on_progress(next.min(total) as f64 / total as f64);
        }

        if next < total {
            self.load(next);
        } else {
            self.finish();
        }
    }

    fn load(&mut self, index: usize) {
        self.release_context();
        self.set_status(index, BenchmarkStatus::Loading);
        self.active = Some(index);

        self.tickets += 1;
        let ticket = Ticket(self.tickets);
        let signals = SignalSender::new(ticket, self.tx.clone());

        let geometry = WindowGeometry::bottom_right(
            self.launcher.screen(),
            self.config.viewport_width,
            self.config.viewport_height,
        );
        let benchmark = &self.registry[index];
        let request = ContextRequest::new(
            benchmark.id(),
            benchmark.filename(),
            &self.config.query_marker,
            geometry,
        );
        debug!("Loading {} at {:?}", request.url, geometry);

        match self.launcher.open(&request, signals.clone()) {
            Ok(handle) => {
                self.context = Some(LiveContext {
                    ticket,
                    handle,
                    signals,
                    session: None,
                });
                let due = self.clock.now() + self.config.load_timeout;
                self.queue.schedule(due, Continuation::LoadTimeout { ticket });
            }
            Err(blocked) => {
                warn!("{}", blocked);
                self.set_status(index, BenchmarkStatus::PopupBlocked);
                self.schedule(Delay::Settle, Continuation::Advance);
            }
        }
    }

    fn on_loaded(&mut self) {
        let Some(index) = self.active else {
            return;
        };
        if self.registry[index].status() != BenchmarkStatus::Loading {
            debug!("Ignoring repeated load signal for {}", self.registry[index].id());
            return;
        }

        self.queue
            .cancel(|c| matches!(c, Continuation::LoadTimeout { .. }));
        let session = self.suite.begin(self.registry[index].runs());
        if let Some(live) = self.context.as_mut() {
            live.session = Some(session);
        }
        self.set_status(index, BenchmarkStatus::Running);
        self.drive_suite(SuiteEvent::Start);
    }

    fn drive_suite(&mut self, event: SuiteEvent) {
        let Some(live) = self.context.as_mut() else {
            return;
        };
        let Some(session) = live.session.as_mut() else {
            debug!("Ignoring {:?} before the suite started", event);
            return;
        };
        let ticket = live.ticket;
        let progress = session.drive(event, live.handle.page(), &live.signals, &*self.clock);

        match progress {
            SuiteProgress::Waiting => {
                // Only the newest deferred invocation is watched
                self.queue
                    .cancel(|c| matches!(c, Continuation::RunTimeout { .. }));
                self.wait_epoch += 1;
                let due = self.clock.now() + self.config.run_timeout;
                self.queue.schedule(
                    due,
                    Continuation::RunTimeout {
                        ticket,
                        epoch: self.wait_epoch,
                    },
                );
            }
            SuiteProgress::Complete(results) => self.on_complete(results),
            SuiteProgress::Aborted(reason) => self.on_abort(&reason),
        }
    }

    fn on_complete(&mut self, results: Vec<RunResult>) {
        let Some(index) = self.active else {
            return;
        };
        if !self.context.as_ref().is_some_and(|c| c.handle.is_open()) {
            self.on_abort("context closed before the suite completed");
            return;
        }
        self.release_context();

        if results.is_empty() {
            warn!("{} has no runs to measure", self.registry[index].id());
            self.set_status(index, BenchmarkStatus::RunFailed);
            self.schedule(Delay::Settle, Continuation::Advance);
            return;
        }

        let contribution = BenchmarkScore::compute(
            self.registry[index].baseline_time(),
            self.registry[index].computed_weight(),
            &results,
        );
        if let Some(benchmark) = self.registry.get_mut(index) {
            benchmark.set_results(results);
        }
        self.set_status(index, BenchmarkStatus::Success);
        self.totals.add(&contribution);

        let benchmark = &self.registry[index];
        info!(
            "{} completed: mean {:.2}ms, score {:.2}, index {}",
            benchmark.id(),
            contribution.accumulated_mean,
            contribution.score,
            self.totals.index(false)
        );
        self.observer
            .on_benchmark_scored(benchmark, &contribution, &self.totals);
        self.schedule(Delay::Settle, Continuation::Advance);
    }

    fn on_abort(&mut self, reason: &str) {
        let Some(index) = self.active else {
            debug!("Ignoring abort with no active benchmark");
            return;
        };
        let status = self.registry[index].status();
        if status == BenchmarkStatus::Aborted {
            return;
        }
        if !status.is_in_flight() {
            debug!(
                "Ignoring abort of {} in state {:?}",
                self.registry[index].id(),
                status
            );
            return;
        }

        warn!("{} aborted: {}", self.registry[index].id(), reason);
        self.set_status(index, BenchmarkStatus::Aborted);
        self.release_context();
        self.schedule(Delay::Cooldown, Continuation::Advance);
    }

    fn finish(&mut self) {
        self.release_context();
        self.active = None;

        let outcome = self.decide_outcome();
        self.run_elapsed = Some(self.clock.now().saturating_sub(self.run_started));
        match outcome.index() {
            Some(index) => info!("Run finished with index {}", index),
            None => info!("Run finished: {}", outcome),
        }

        self.outcome = Some(outcome.clone());
        self.set_runner_status(RunnerStatus::Ready);
        self.observer.on_finish(&outcome, &self.totals);
    }

    fn decide_outcome(&self) -> RunOutcome {
        let tally = StatusTally::from_statuses(self.registry.iter().map(|b| b.status()));
        RunOutcome::decide(&tally, &self.totals, &self.config.learn_more_url)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn schedule(&mut self, delay: Delay, continuation: Continuation) {
        let wait = match delay {
            Delay::Settle => self.config.settle_delay,
            Delay::Cooldown => self.config.cooldown_delay,
        };
        debug!("Scheduling {:?} after {:?} ({:?})", continuation, wait, delay);
        self.queue.schedule(self.clock.now() + wait, continuation);
    }

    fn is_live(&self, ticket: Ticket) -> bool {
        self.context.as_ref().is_some_and(|c| c.ticket == ticket)
    }

    fn active_has(&self, status: BenchmarkStatus) -> bool {
        self.active
            .is_some_and(|index| self.registry[index].status() == status)
    }

    fn release_context(&mut self) {
        if let Some(mut live) = self.context.take() {
            debug!("Closing context {:?}", live.ticket);
            live.handle.close();
            self.queue.cancel(|c| {
                matches!(
                    c,
                    Continuation::LoadTimeout { .. } | Continuation::RunTimeout { .. }
                )
            });
        }
    }

    fn set_status(&mut self, index: usize, status: BenchmarkStatus) {
        if let Some(benchmark) = self.registry.get_mut(index) {
            debug!("{}: {:?} -> {:?}", benchmark.id(), benchmark.status(), status);
            benchmark.set_status(status);
            self.observer.on_benchmark_status(benchmark);
        }
    }

    fn set_runner_status(&mut self, status: RunnerStatus) {
        self.status = status;
        self.observer.on_runner_status(status);
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.release_context();
    }
}
