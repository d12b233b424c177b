//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → ProxyConfiguration handed to the supervisor at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new epoch
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Environment input is read once by the loader, never during a run

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AgentConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
pub use schema::ProxyConfiguration;
