//! Sidecar agent library supervising an external proxy process.
//!
//! Starts the proxy, hot restarts it epoch by epoch, drains it on shutdown
//! and reports whether it is live.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::{AgentConfig, ProxyConfiguration};
pub use health::LivenessProbe;
pub use lifecycle::{AbortCause, AbortSignal};
pub use proxy::{ConfigRequest, Epoch, EpochJanitor, ProcessSupervisor, SupervisorError};
