//! Event Queue
//!
//! Scheduled continuations of the orchestrator, ordered by due time and
//! then by scheduling order. Nothing runs here; the orchestrator pops what
//! is due and handles it.

use crate::signal::Ticket;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Named delay classes between orchestration steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Short pause between successful steps
    Settle,
    /// Long pause after an aborted context
    Cooldown,
}

/// Work the orchestrator has scheduled for later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// Move on to the next benchmark
    Advance,
    /// The context with this ticket should have loaded by now
    LoadTimeout { ticket: Ticket },
    /// The deferred run started in `epoch` should have resolved by now
    RunTimeout { ticket: Ticket, epoch: u64 },
}

#[derive(Debug)]
struct Scheduled {
    due: Duration,
    seq: u64,
    continuation: Continuation,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and the earliest entry must pop first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-queue of continuations keyed by due time
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    seq: u64,
}

impl EventQueue {
    pub(crate) fn schedule(&mut self, due: Duration, continuation: Continuation) {
        self.seq += 1;
        self.heap.push(Scheduled {
            due,
            seq: self.seq,
            continuation,
        });
    }

    /// Pop the earliest continuation due at or before `now`
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<Continuation> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop().map(|s| s.continuation)
    }

    pub(crate) fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|s| s.due)
    }

    /// Drop every scheduled continuation matching `cancelled`
    pub(crate) fn cancel(&mut self, mut cancelled: impl FnMut(&Continuation) -> bool) {
        self.heap.retain(|s| !cancelled(&s.continuation));
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
