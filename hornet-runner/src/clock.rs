//! Time Source
//!
//! The orchestrator reads time only through [`Clock`], so delays, watchdogs
//! and sample durations can run against a virtual clock in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// How long to block for a signal before `deadline` is reached
    fn time_until(&self, deadline: Duration) -> Duration {
        deadline.saturating_sub(self.now())
    }

    /// Called when a wait for `deadline` ended without a signal
    fn reached(&self, _deadline: Duration) {}
}

/// Wall-clock time
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock starting now
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock that only moves when told to.
///
/// Waits never block: when the orchestrator would sleep until a deadline,
/// the clock jumps there instead. Benchmark pages advance it to simulate
/// the time their work takes. Clones share the same time.
///
/// Because waits never block, a deferred run resolved from another thread
/// is not waited for: the run watchdog fires first and aborts the suite.
/// Pages that hand their [`Deferred`](crate::Deferred) to another thread
/// need [`SystemClock`]; with a manual clock, resolve on the calling thread
/// or from the test between polls.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Move time forward to `instant` (never backwards)
    pub fn advance_to(&self, instant: Duration) {
        self.nanos
            .fetch_max(instant.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }

    fn time_until(&self, _deadline: Duration) -> Duration {
        Duration::ZERO
    }

    fn reached(&self, deadline: Duration) {
        self.advance_to(deadline);
    }
}
