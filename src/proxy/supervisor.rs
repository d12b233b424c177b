//! Per-epoch process supervision.
//!
//! # States
//! ```text
//! Resolving → Spawning → Running → Exited
//!     │           │          └───→ Aborted
//!     │           └──────────────→ SpawnFailed
//!     └──────────────────────────→ ConfigGeneration (fatal)
//! ```

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::ProxyConfiguration;
use crate::lifecycle::abort::{next_abort, AbortCause};
use crate::observability::metrics;
use crate::proxy::args::{read_bootstrap_override, ArgumentBuilder};
use crate::proxy::bootstrap::BootstrapGenerator;
use crate::proxy::error::{SupervisorError, SupervisorResult};
use crate::proxy::process::{CommandLauncher, ProcessHandle, ProcessLauncher};
use crate::proxy::resolver::ConfigResolver;
use crate::proxy::types::{ConfigRequest, Epoch, RunOutcome};

/// Runs one proxy generation per call to [`ProcessSupervisor::run`].
pub struct ProcessSupervisor<L = CommandLauncher> {
    resolver: ConfigResolver,
    args: ArgumentBuilder,
    launcher: L,
}

impl ProcessSupervisor<CommandLauncher> {
    /// Supervisor launching real processes.
    pub fn new(config: ProxyConfiguration, generator: Arc<dyn BootstrapGenerator>) -> Self {
        Self::with_launcher(config, generator, CommandLauncher)
    }
}

impl<L: ProcessLauncher> ProcessSupervisor<L> {
    pub fn with_launcher(
        config: ProxyConfiguration,
        generator: Arc<dyn BootstrapGenerator>,
        launcher: L,
    ) -> Self {
        let resolver = ConfigResolver::new(config.custom_config_file.clone(), generator);
        Self {
            resolver,
            args: ArgumentBuilder::new(config),
            launcher,
        }
    }

    pub fn config(&self) -> &ProxyConfiguration {
        self.args.config()
    }

    /// Resolve the config file for `epoch` and build the full command line.
    pub fn startup_args(
        &self,
        request: ConfigRequest,
        epoch: Epoch,
    ) -> SupervisorResult<(PathBuf, Vec<OsString>)> {
        let config_path = self.resolver.resolve(request, epoch)?;
        let bootstrap_override = self
            .config()
            .bootstrap_override
            .as_deref()
            .and_then(read_bootstrap_override);
        let args = self
            .args
            .build(&config_path, epoch, bootstrap_override.as_deref());
        Ok((config_path, args))
    }

    /// Run the proxy for one epoch until it exits or `abort` fires.
    ///
    /// A [`SupervisorError::ConfigGeneration`] must stop the agent; every other
    /// error leaves the retry decision to the caller.
    pub async fn run(
        &self,
        request: ConfigRequest,
        epoch: Epoch,
        mut abort: broadcast::Receiver<AbortCause>,
    ) -> SupervisorResult<()> {
        tracing::debug!(epoch = %epoch, request = ?request, "Resolving proxy config");
        let (config_path, args) = match self.startup_args(request, epoch) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::error!(epoch = %epoch, error = %e, "Failed to generate bootstrap config");
                return Err(e);
            }
        };

        tracing::info!(
            epoch = %epoch,
            config = %config_path.display(),
            args = ?args,
            "Starting proxy"
        );

        let binary = &self.config().binary_path;
        let mut handle = match self.launcher.start(binary, &args) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(
                    epoch = %epoch,
                    binary = %binary.display(),
                    error = %e,
                    "Failed to spawn proxy"
                );
                metrics::record_epoch_outcome("spawn_failed");
                return Err(SupervisorError::Spawn(e));
            }
        };

        metrics::record_epoch_started();
        tracing::info!(epoch = %epoch, pid = ?handle.id(), "Proxy running");

        let outcome = supervise(&mut handle, epoch, &mut abort).await;
        metrics::record_epoch_outcome(outcome.label());

        match outcome {
            RunOutcome::Completed(Ok(status)) if status.success() => {
                tracing::info!(epoch = %epoch, "Proxy exited");
                Ok(())
            }
            RunOutcome::Completed(Ok(status)) => {
                tracing::warn!(epoch = %epoch, status = %status, "Proxy exited with failure");
                Err(SupervisorError::Exited(status))
            }
            RunOutcome::Completed(Err(e)) => Err(SupervisorError::Wait(e)),
            RunOutcome::Aborted(cause) => Err(SupervisorError::Aborted(cause)),
        }
    }
}

/// Race the child's exit against the abort signal.
///
/// When abort wins the child is sent one kill request and the outcome is
/// returned immediately; the kill itself completes asynchronously.
pub async fn supervise<H: ProcessHandle>(
    handle: &mut H,
    epoch: Epoch,
    abort: &mut broadcast::Receiver<AbortCause>,
) -> RunOutcome {
    let outcome = tokio::select! {
        status = handle.wait() => RunOutcome::Completed(status),
        cause = next_abort(abort) => RunOutcome::Aborted(cause),
    };

    if let RunOutcome::Aborted(cause) = &outcome {
        tracing::warn!(epoch = %epoch, cause = %cause, "Aborting epoch");
        if let Err(e) = handle.terminate() {
            tracing::warn!(epoch = %epoch, error = %e, "Killing epoch failed");
        }
    }

    outcome
}
