//! Signals from execution contexts
//!
//! Everything an execution context reports back (loaded, a deferred run
//! resolved, the suite aborted) travels over one channel to the
//! orchestrator. Each message carries the ticket of the context that sent
//! it, so signals from a context that has since been released are dropped.

use std::sync::mpsc::Sender;

/// Identifies one opened execution context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignalKind {
    Loaded,
    Resolved { cycle: u64 },
    Abort,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Envelope {
    pub(crate) ticket: Ticket,
    pub(crate) kind: SignalKind,
}

/// Handle an execution context uses to talk to the orchestrator
#[derive(Debug, Clone)]
pub struct SignalSender {
    ticket: Ticket,
    tx: Sender<Envelope>,
}

impl SignalSender {
    pub(crate) fn new(ticket: Ticket, tx: Sender<Envelope>) -> Self {
        Self { ticket, tx }
    }

    /// Ticket of the context this sender belongs to
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// The context finished loading and its hooks can be called
    pub fn loaded(&self) {
        self.send(SignalKind::Loaded);
    }

    /// The benchmark failed; abort its suite
    pub fn abort(&self) {
        self.send(SignalKind::Abort);
    }

    /// Completion handle for deferred invocation number `cycle`
    pub fn deferred(&self, cycle: u64) -> Deferred {
        Deferred {
            sender: self.clone(),
            cycle,
        }
    }

    fn send(&self, kind: SignalKind) {
        // The receiver outlives every run; a send error means the
        // orchestrator is gone and nobody is listening.
        let _ = self.tx.send(Envelope {
            ticket: self.ticket,
            kind,
        });
    }
}

/// Single-resolution completion handle for one deferred test invocation.
///
/// Handed to `test_async`; the benchmark resolves it (exactly once, by
/// consuming it) when its asynchronous work is done, or aborts through it.
/// It may be moved to another thread.
#[derive(Debug)]
#[must_use = "a deferred run never completes unless resolved"]
pub struct Deferred {
    sender: SignalSender,
    cycle: u64,
}

impl Deferred {
    /// Complete this invocation
    pub fn resolve(self) {
        self.sender.send(SignalKind::Resolved { cycle: self.cycle });
    }

    /// Fail this invocation and abort the suite
    pub fn abort(self) {
        self.sender.abort();
    }
}
