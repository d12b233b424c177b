//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Liveness (liveness.rs):
//!     Caller's poll timer
//!     → GET 127.0.0.1:<admin port>/server_info
//!     → state == LIVE ? true : false
//! ```
//!
//! # Design Decisions
//! - One request per call; polling and backoff stay with the caller
//! - Every failure collapses to "not live", no error escapes
//! - Results are logged and exported as a gauge

pub mod liveness;

pub use liveness::{LivenessProbe, ServerInfo, ServerState};
