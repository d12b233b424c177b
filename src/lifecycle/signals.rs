//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - Translate signals to agent events
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers a hot restart, not shutdown

use tokio::signal::unix::{signal, Signal, SignalKind};

/// What the agent was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentSignal {
    /// Start the next epoch with fresh configuration.
    Restart,
    /// Drain the proxy and exit.
    Terminate,
}

/// Registered handlers for the signals the agent reacts to.
pub struct Signals {
    hangup: Signal,
    interrupt: Signal,
    terminate: Signal,
}

impl Signals {
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next signal.
    pub async fn recv(&mut self) -> AgentSignal {
        tokio::select! {
            _ = self.hangup.recv() => {
                tracing::info!("Received SIGHUP");
                AgentSignal::Restart
            }
            _ = self.interrupt.recv() => {
                tracing::info!("Received SIGINT");
                AgentSignal::Terminate
            }
            _ = self.terminate.recv() => {
                tracing::info!("Received SIGTERM");
                AgentSignal::Terminate
            }
        }
    }
}
