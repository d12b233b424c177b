//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! supervisor, janitor, liveness probe produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Epoch number is a field on every supervision event
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
