//! Abort coordination for running epochs.

use std::future;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::proxy::Epoch;

/// Why an epoch was told to stop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbortCause {
    /// The agent is shutting down.
    #[error("agent shutting down")]
    Shutdown,

    /// A newer epoch replaced this one.
    #[error("superseded by epoch {0}")]
    Superseded(Epoch),

    /// Any other reason, carried as a message.
    #[error("{0}")]
    Other(String),
}

/// Coordinator for aborting running epochs.
///
/// Provides a broadcast channel that every running epoch subscribes to.
pub struct AbortSignal {
    /// Broadcast channel sender.
    tx: broadcast::Sender<AbortCause>,
}

impl AbortSignal {
    /// Create a new abort coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(4);
        Self { tx }
    }

    /// Subscribe to the abort signal.
    pub fn subscribe(&self) -> broadcast::Receiver<AbortCause> {
        self.tx.subscribe()
    }

    /// Abort every subscribed epoch.
    pub fn trigger(&self, cause: AbortCause) {
        let _ = self.tx.send(cause);
    }

    /// Get the number of active subscribers (epochs still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve with the next abort cause.
///
/// A closed channel never resolves: with no sender left, nobody can abort.
pub async fn next_abort(rx: &mut broadcast::Receiver<AbortCause>) -> AbortCause {
    loop {
        match rx.recv().await {
            Ok(cause) => return cause,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Abort receiver lagged");
            }
            Err(broadcast::error::RecvError::Closed) => future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let signal = AbortSignal::new();
        let mut a = signal.subscribe();
        let mut b = signal.subscribe();
        assert_eq!(signal.receiver_count(), 2);

        signal.trigger(AbortCause::Shutdown);

        assert_eq!(next_abort(&mut a).await, AbortCause::Shutdown);
        assert_eq!(next_abort(&mut b).await, AbortCause::Shutdown);
    }

    #[tokio::test]
    async fn test_closed_channel_never_fires() {
        let signal = AbortSignal::new();
        let mut rx = signal.subscribe();
        drop(signal);

        let waited = tokio::time::timeout(Duration::from_millis(50), next_abort(&mut rx)).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_lagged_receiver_still_gets_latest_cause() {
        let signal = AbortSignal::new();
        let mut rx = signal.subscribe();
        for n in 0..10u32 {
            signal.trigger(AbortCause::Superseded(Epoch(n)));
        }

        let cause = next_abort(&mut rx).await;
        assert!(matches!(cause, AbortCause::Superseded(_)));
    }
}
