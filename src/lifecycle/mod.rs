//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Abort (abort.rs):
//!     Controller decides an epoch must stop → trigger(cause)
//!     → every running epoch's receiver fires → supervisor kills its child
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → drain epoch, then abort all
//!     SIGHUP → hot restart into the next epoch
//!
//! Tracker (tracker.rs):
//!     epoch finished → running count and agent exit status
//! ```
//!
//! # Design Decisions
//! - Abort is the only cancellation primitive a run honours
//! - Draining is done by starting a Drain epoch before aborting

pub mod abort;
pub mod signals;
pub mod tracker;

pub use abort::{AbortCause, AbortSignal};
pub use signals::{AgentSignal, Signals};
pub use tracker::{EpochTracker, Finish};
