//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, lengths, durations)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AgentConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Unparsable node IPs are tolerated; the argument builder skips them

use std::fmt;
use std::net::IpAddr;

use crate::config::schema::AgentConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &AgentConfig) -> Result<(), Vec<ValidationError>> {
    let proxy = &config.proxy;
    let mut errors = Vec::new();

    if proxy.binary_path.as_os_str().is_empty() {
        errors.push(ValidationError::new("proxy.binary_path", "must not be empty"));
    }
    if proxy.admin_port == 0 {
        errors.push(ValidationError::new("proxy.admin_port", "must be non-zero"));
    }
    if proxy.stat_name_length == 0 {
        errors.push(ValidationError::new("proxy.stat_name_length", "must be non-zero"));
    }
    if proxy.service_cluster.is_empty() {
        errors.push(ValidationError::new("proxy.service_cluster", "must not be empty"));
    }
    if proxy.service_node.is_empty() {
        errors.push(ValidationError::new("proxy.service_node", "must not be empty"));
    }
    if proxy.parent_shutdown_duration_ms < proxy.drain_duration_ms {
        errors.push(ValidationError::new(
            "proxy.parent_shutdown_duration_ms",
            format!(
                "must be at least the drain duration ({} ms)",
                proxy.drain_duration_ms
            ),
        ));
    }
    if proxy.custom_config_file.is_none() && proxy.config_dir.as_os_str().is_empty() {
        errors.push(ValidationError::new(
            "proxy.config_dir",
            "must be set when no custom config file is used",
        ));
    }
    if config.probe.timeout_ms == 0 {
        errors.push(ValidationError::new("probe.timeout_ms", "must be non-zero"));
    }

    for ip in &proxy.node_ips {
        if ip.parse::<IpAddr>().is_err() {
            tracing::warn!(ip = %ip, "Ignoring unparsable node IP");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
