//! Bookkeeping for the epochs the agent has in flight.

use crate::proxy::{Epoch, SupervisorResult};

/// What the agent loop does after an epoch finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// Other epochs are still running.
    Continue,
    /// The last running epoch finished.
    Done,
    /// The error cannot be retried; stop the agent now.
    Fatal,
}

/// Counts running epochs and remembers whether the agent should exit non-zero.
///
/// Once any epoch fails outside of draining the agent stays failed, no
/// matter how the remaining epochs end.
#[derive(Debug, Default)]
pub struct EpochTracker {
    running: usize,
    draining: bool,
    failed: bool,
}

impl EpochTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&mut self) {
        self.running += 1;
    }

    /// Errors reported after this point no longer mark the agent as failed.
    pub fn begin_drain(&mut self) {
        self.draining = true;
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Record that `epoch` finished with `result`.
    pub fn finished(&mut self, epoch: Epoch, result: &SupervisorResult<()>) -> Finish {
        self.running = self.running.saturating_sub(1);
        match result {
            Ok(()) => tracing::info!(epoch = %epoch, "Epoch finished"),
            Err(e) if e.is_fatal() => {
                tracing::error!(epoch = %epoch, error = %e, "Fatal supervisor error, exiting");
                self.failed = true;
                return Finish::Fatal;
            }
            Err(e) => {
                self.failed |= !self.draining;
                tracing::warn!(epoch = %epoch, error = %e, "Epoch ended with error");
            }
        }

        if self.running == 0 {
            Finish::Done
        } else {
            Finish::Continue
        }
    }
}
