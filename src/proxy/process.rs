//! Child process boundary.
//!
//! The supervisor only ever sees a [`ProcessHandle`]; everything platform
//! specific about starting, reaping and killing lives behind it.

use std::ffi::OsString;
use std::future::Future;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, Command};

/// A running child owned by exactly one epoch.
pub trait ProcessHandle: Send {
    /// Wait for the child to exit.
    fn wait(&mut self) -> impl Future<Output = io::Result<ExitStatus>> + Send;

    /// Request forceful termination without waiting for it to take effect.
    fn terminate(&mut self) -> io::Result<()>;

    /// OS process id, if the child has not been reaped yet.
    fn id(&self) -> Option<u32>;
}

/// Starts child processes.
pub trait ProcessLauncher: Send + Sync {
    type Handle: ProcessHandle;

    fn start(&self, binary: &Path, args: &[OsString]) -> io::Result<Self::Handle>;
}

/// Launches real processes through `tokio::process`.
///
/// The child shares the agent's stdout and stderr and gets no stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLauncher;

impl ProcessLauncher for CommandLauncher {
    type Handle = ChildHandle;

    fn start(&self, binary: &Path, args: &[OsString]) -> io::Result<ChildHandle> {
        let child = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;
        Ok(ChildHandle { child })
    }
}

/// [`ProcessHandle`] over a `tokio::process::Child`.
#[derive(Debug)]
pub struct ChildHandle {
    child: Child,
}

impl ProcessHandle for ChildHandle {
    async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    fn terminate(&mut self) -> io::Result<()> {
        // SIGKILL on unix; the runtime reaps the child once it is dropped.
        self.child.start_kill()
    }

    fn id(&self) -> Option<u32> {
        self.child.id()
    }
}
