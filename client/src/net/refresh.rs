//! Single-flight coordination for access-token refresh.
//!
//! DESIGN
//! ======
//! A request that sees a 401 calls [`RefreshGate::enter`] with the token it
//! was sent with. Under one lock the gate decides its role:
//! - a refresh is running: queue a continuation and wait (`Wait`);
//! - the cached token already changed since the request was sent: retry with
//!   it (`Fresh`);
//! - the cached session was cleared since the request was sent: give up
//!   (`Expired`);
//! - otherwise: become the leader and run the refresh (`Lead`).
//!
//! The leader updates the session first and then settles the gate, which
//! clears the flag and releases queued continuations in arrival order. A
//! 401 observed after settlement therefore sees the rotated token and never
//! starts a second refresh for the same wave.
//!
//! TRADE-OFFS
//! ==========
//! Continuations are `oneshot` channels, not callbacks, so a waiter that
//! stops polling costs nothing. A leader dropped mid-refresh releases the
//! queue with a failure instead of leaving it parked.

#[cfg(test)]
#[path = "refresh_test.rs"]
mod refresh_test;

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

/// Terminal failure of a refresh wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("token refresh failed")]
pub struct RefreshFailed;

/// New access token, or the failure every queued request receives.
pub type RefreshOutcome = Result<String, RefreshFailed>;

/// Role assigned to a request that observed a 401.
pub enum Ticket<'a> {
    Fresh(String),
    Expired,
    Wait(oneshot::Receiver<RefreshOutcome>),
    Lead(RefreshLead<'a>),
}

#[derive(Default)]
struct GateInner {
    in_progress: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Refresh flag plus ordered queue of pending continuations.
#[derive(Default)]
pub struct RefreshGate {
    inner: Mutex<GateInner>,
}

impl RefreshGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide how a request that was sent with `sent_with` and got a 401
    /// should continue. `current` reads the cached access token and is
    /// evaluated under the gate lock.
    pub fn enter(&self, sent_with: Option<&str>, current: impl FnOnce() -> Option<String>) -> Ticket<'_> {
        let mut inner = self.lock();
        if inner.in_progress {
            let (tx, rx) = oneshot::channel();
            inner.waiters.push_back(tx);
            tracing::debug!(queued = inner.waiters.len(), "request queued behind token refresh");
            return Ticket::Wait(rx);
        }

        match (sent_with, current()) {
            (Some(sent), Some(current)) if sent != current => Ticket::Fresh(current),
            (Some(_), None) => Ticket::Expired,
            _ => {
                inner.in_progress = true;
                Ticket::Lead(RefreshLead { gate: self, settled: false })
            }
        }
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.lock().in_progress
    }

    /// Number of continuations waiting on the running refresh.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut inner = self.lock();
            inner.in_progress = false;
            std::mem::take(&mut inner.waiters)
        };
        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away simply misses the result.
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the request running the refresh. Settling releases the queue.
pub struct RefreshLead<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl RefreshLead<'_> {
    /// Release every queued request with `outcome`; returns how many were
    /// released.
    pub fn finish(mut self, outcome: RefreshOutcome) -> usize {
        self.settled = true;
        self.gate.settle(&outcome)
    }
}

impl Drop for RefreshLead<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("token refresh abandoned; releasing queued requests");
            self.gate.settle(&Err(RefreshFailed));
        }
    }
}
