//! Supervisor error definitions.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::lifecycle::abort::AbortCause;

/// Errors raised while writing a bootstrap file for an epoch.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No template was configured to render from.
    #[error("no bootstrap template configured")]
    MissingTemplate,

    /// Reading the template or writing the epoch file failed.
    #[error("bootstrap file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors returned by [`crate::proxy::ProcessSupervisor::run`].
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The bootstrap file could not be generated. Fatal for the whole agent.
    #[error("failed to generate bootstrap config: {0}")]
    ConfigGeneration(#[from] BootstrapError),

    /// The proxy binary could not be started; no process exists.
    #[error("failed to spawn proxy: {0}")]
    Spawn(#[source] io::Error),

    /// The epoch was aborted from outside.
    #[error("epoch aborted: {0}")]
    Aborted(AbortCause),

    /// The proxy exited unsuccessfully on its own.
    #[error("proxy exited: {0}")]
    Exited(ExitStatus),

    /// Waiting on the child failed.
    #[error("failed to wait on proxy: {0}")]
    Wait(#[source] io::Error),
}

impl SupervisorError {
    /// Whether the caller must stop the agent instead of retrying the epoch.
    ///
    /// Retrying a broken bootstrap generation would loop forever writing
    /// the same bad artifact.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SupervisorError::ConfigGeneration(_))
    }
}

/// Result type for supervisor operations.
pub type SupervisorResult<T> = Result<T, SupervisorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::types::Epoch;

    #[test]
    fn test_only_generation_failure_is_fatal() {
        assert!(SupervisorError::ConfigGeneration(BootstrapError::MissingTemplate).is_fatal());
        assert!(!SupervisorError::Spawn(io::Error::from(io::ErrorKind::NotFound)).is_fatal());
        assert!(!SupervisorError::Aborted(AbortCause::Shutdown).is_fatal());
    }

    #[test]
    fn test_abort_error_wraps_cause() {
        let err = SupervisorError::Aborted(AbortCause::Superseded(Epoch(4)));
        assert_eq!(err.to_string(), "epoch aborted: superseded by epoch 4");
    }
}
