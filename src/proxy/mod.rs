//! Proxy process supervision subsystem.
//!
//! # Data Flow
//! ```text
//! ProcessSupervisor::run(request, epoch, abort)
//!     → resolver.rs (Drain / CustomOverride / Generated(epoch))
//!         → bootstrap.rs (writes envoy-rev<epoch>.json when generated)
//!     → args.rs (ordered startup flags)
//!     → process.rs (spawn child, stdout/stderr inherited)
//!     → race: child exit vs abort signal
//!         → abort first: kill child, return Aborted(cause)
//!         → exit first: return exit status
//!
//! After the epoch:
//!     janitor.rs removes envoy-rev<epoch>.json
//! ```
//!
//! # Design Decisions
//! - One run per epoch; the child handle never outlives or leaves its run
//! - No grace period inside a run; draining is a separate Drain epoch
//! - Bootstrap generation failure is fatal to the agent, not just the epoch
//! - Soft failures (override file, cleanup) are logged, never returned

pub mod args;
pub mod bootstrap;
pub mod error;
pub mod janitor;
pub mod process;
pub mod resolver;
pub mod supervisor;
pub mod types;

pub use args::ArgumentBuilder;
pub use bootstrap::{BootstrapGenerator, TemplateBootstrap};
pub use error::{BootstrapError, SupervisorError, SupervisorResult};
pub use janitor::EpochJanitor;
pub use process::{CommandLauncher, ProcessHandle, ProcessLauncher};
pub use resolver::{ConfigResolver, DRAIN_CONFIG_PATH};
pub use supervisor::ProcessSupervisor;
pub use types::{ConfigRequest, ConfigVariant, Epoch, RunOutcome};
