//! Core supervision types.

use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::lifecycle::abort::AbortCause;

/// Generation number of a proxy process.
///
/// Strictly increasing across hot restarts of one logical proxy instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(pub u32);

impl Epoch {
    /// The epoch that hot restarts from this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u32> for Epoch {
    fn from(epoch: u32) -> Self {
        Self(epoch)
    }
}

impl From<Epoch> for u32 {
    fn from(epoch: Epoch) -> Self {
        epoch.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What configuration the caller asks a run to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigRequest {
    /// Normal generation: custom override or a freshly generated bootstrap.
    Bootstrap,
    /// Graceful termination: load the empty drain config.
    Drain,
}

/// The configuration source selected for one epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigVariant {
    /// Bootstrap file generated for this epoch.
    Generated(Epoch),
    /// The fixed drain config.
    Drain,
    /// Operator-supplied file, used as-is.
    CustomOverride(PathBuf),
}

/// How the race between process exit and abort ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The child exited on its own.
    Completed(std::io::Result<ExitStatus>),
    /// The abort signal fired first.
    Aborted(AbortCause),
}

impl RunOutcome {
    /// Label used for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Completed(Ok(status)) if status.success() => "exited",
            RunOutcome::Completed(Ok(_)) => "failed",
            RunOutcome::Completed(Err(_)) => "wait_error",
            RunOutcome::Aborted(_) => "aborted",
        }
    }
}
