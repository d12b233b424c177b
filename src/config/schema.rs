//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the sidecar agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Settings of the supervised proxy process.
    pub proxy: ProxyConfiguration,

    /// Liveness probe settings.
    pub probe: ProbeConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Everything the supervisor needs to launch one proxy generation.
///
/// Immutable once handed to a [`crate::proxy::ProcessSupervisor`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfiguration {
    /// Path to the proxy binary.
    pub binary_path: PathBuf,

    /// Directory generated bootstrap files are written to.
    pub config_dir: PathBuf,

    /// Template copied into each generated bootstrap file.
    pub bootstrap_template: Option<PathBuf>,

    /// Use this file instead of generating one per epoch.
    pub custom_config_file: Option<PathBuf>,

    /// File whose raw contents are passed as `--config-yaml`.
    ///
    /// Populated from the `BOOTSTRAP_OVERRIDE` environment variable by the loader.
    pub bootstrap_override: Option<PathBuf>,

    /// Local admin port of the proxy.
    pub admin_port: u16,

    /// How long the proxy drains listeners during a hot restart.
    pub drain_duration_ms: u64,

    /// How long the parent generation lives after the child takes over.
    pub parent_shutdown_duration_ms: u64,

    /// Cluster name reported by the proxy.
    pub service_cluster: String,

    /// Node identifier reported by the proxy.
    pub service_node: String,

    /// Maximum length of stat names.
    pub stat_name_length: u32,

    /// Worker thread count; 0 leaves the proxy default.
    pub concurrency: u32,

    /// IP addresses of the node the proxy runs on.
    pub node_ips: Vec<String>,

    /// Proxy log level (`-l`).
    pub log_level: Option<String>,

    /// Per-component proxy log levels (`--component-log-level`).
    pub component_log_level: Option<String>,
}

impl ProxyConfiguration {
    /// Drain duration as a [`Duration`].
    pub fn drain_duration(&self) -> Duration {
        Duration::from_millis(self.drain_duration_ms)
    }

    /// Parent shutdown duration as a [`Duration`].
    pub fn parent_shutdown_duration(&self) -> Duration {
        Duration::from_millis(self.parent_shutdown_duration_ms)
    }
}

impl Default for ProxyConfiguration {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("/usr/local/bin/envoy"),
            config_dir: PathBuf::from("/etc/proxy-agent"),
            bootstrap_template: None,
            custom_config_file: None,
            bootstrap_override: None,
            admin_port: 15000,
            drain_duration_ms: 45_000,
            parent_shutdown_duration_ms: 60_000,
            service_cluster: "proxy".to_string(),
            service_node: "sidecar~127.0.0.1~proxy.default~cluster.local".to_string(),
            stat_name_length: 189,
            concurrency: 0,
            node_ips: Vec::new(),
            log_level: None,
            component_log_level: None,
        }
    }
}

/// Liveness probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Per-request timeout for the admin status query.
    pub timeout_ms: u64,

    /// How often the agent polls liveness while an epoch runs.
    pub interval_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1_000,
            interval_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:15090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AgentConfig = toml::from_str("").unwrap();
        assert_eq!(config.proxy.admin_port, 15000);
        assert_eq!(config.proxy.stat_name_length, 189);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
        assert!(config.proxy.custom_config_file.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AgentConfig = toml::from_str(
            r#"
            [proxy]
            drain_duration_ms = 2500
            node_ips = ["10.0.0.1"]

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.proxy.drain_duration(), Duration::from_millis(2500));
        assert_eq!(config.proxy.node_ips, vec!["10.0.0.1".to_string()]);
        assert_eq!(config.proxy.parent_shutdown_duration_ms, 60_000);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
