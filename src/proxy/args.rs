//! Startup argument construction.
//!
//! The argument list is a contract with the proxy binary: flag names, order
//! and units must stay exactly as produced here.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::net::IpAddr;
use std::os::unix::ffi::OsStringExt;
use std::path::Path;

use crate::config::ProxyConfiguration;
use crate::proxy::types::Epoch;

/// Local address family the proxy binds upstream connections with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::V4 => "v4",
            IpVersion::V6 => "v6",
        }
    }
}

/// Select the address family from the node's IPs.
///
/// Any parsable IPv4 address (IPv4-mapped IPv6 included) selects v4. Everything
/// else selects v6, including an empty list or one where nothing parses.
// TODO: decide whether an empty or unparsable list should select v4 instead.
pub fn local_address_ip_version(node_ips: &[String]) -> IpVersion {
    for raw in node_ips {
        let Ok(addr) = raw.parse::<IpAddr>() else {
            continue;
        };
        let is_v4 = match addr {
            IpAddr::V4(_) => true,
            IpAddr::V6(v6) => v6.to_ipv4_mapped().is_some(),
        };
        if is_v4 {
            return IpVersion::V4;
        }
    }
    IpVersion::V6
}

/// Read the bootstrap override file, if one is configured.
///
/// The contents are returned byte for byte, UTF-8 or not. An unreadable file
/// only costs the `--config-yaml` flag; startup goes on.
pub fn read_bootstrap_override(path: &Path) -> Option<OsString> {
    match fs::read(path) {
        Ok(bytes) => Some(OsString::from_vec(bytes)),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read bootstrap override"
            );
            None
        }
    }
}

/// Builds the proxy's command line for an epoch.
#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    config: ProxyConfiguration,
    extra_args: Vec<OsString>,
}

impl ArgumentBuilder {
    /// Capture the configuration and the log-level flags it implies.
    pub fn new(config: ProxyConfiguration) -> Self {
        let mut extra_args = Vec::new();
        if let Some(level) = config.log_level.as_deref().filter(|l| !l.is_empty()) {
            extra_args.push("-l".into());
            extra_args.push(level.into());
        }
        if let Some(levels) = config
            .component_log_level
            .as_deref()
            .filter(|l| !l.is_empty())
        {
            extra_args.push("--component-log-level".into());
            extra_args.push(levels.into());
        }

        Self { config, extra_args }
    }

    pub fn config(&self) -> &ProxyConfiguration {
        &self.config
    }

    /// Build the argument list for `epoch` loading `config_path`.
    ///
    /// The path and the override contents are passed through as raw OS
    /// strings, never re-encoded.
    pub fn build(
        &self,
        config_path: &Path,
        epoch: Epoch,
        bootstrap_override: Option<&OsStr>,
    ) -> Vec<OsString> {
        let config = &self.config;
        let ip_version = local_address_ip_version(&config.node_ips);

        let mut args: Vec<OsString> = vec![
            "-c".into(),
            config_path.as_os_str().to_os_string(),
            "--restart-epoch".into(),
            epoch.to_string().into(),
            "--drain-time-s".into(),
            config.drain_duration().as_secs().to_string().into(),
            "--parent-shutdown-time-s".into(),
            config.parent_shutdown_duration().as_secs().to_string().into(),
            "--service-cluster".into(),
            config.service_cluster.clone().into(),
            "--service-node".into(),
            config.service_node.clone().into(),
            "--max-obj-name-len".into(),
            config.stat_name_length.to_string().into(),
            "--local-address-ip-version".into(),
            ip_version.as_str().into(),
        ];

        args.extend(self.extra_args.iter().cloned());

        if let Some(contents) = bootstrap_override {
            args.push("--config-yaml".into());
            args.push(contents.to_os_string());
        }

        if config.concurrency > 0 {
            args.push("--concurrency".into());
            args.push(config.concurrency.to_string().into());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::ffi::OsStrExt;

    fn ips(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn os(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    fn test_config() -> ProxyConfiguration {
        ProxyConfiguration {
            drain_duration_ms: 2_500,
            parent_shutdown_duration_ms: 10_999,
            service_cluster: "reviews".to_string(),
            service_node: "sidecar~10.0.0.1~reviews-v1.default~cluster.local".to_string(),
            stat_name_length: 189,
            node_ips: ips(&["10.0.0.1"]),
            ..ProxyConfiguration::default()
        }
    }

    #[test]
    fn test_required_flags_in_order() {
        let builder = ArgumentBuilder::new(test_config());
        let args = builder.build(Path::new("/etc/proxy-agent/envoy-rev3.json"), Epoch(3), None);

        assert_eq!(
            args,
            os(&[
                "-c",
                "/etc/proxy-agent/envoy-rev3.json",
                "--restart-epoch",
                "3",
                "--drain-time-s",
                "2",
                "--parent-shutdown-time-s",
                "10",
                "--service-cluster",
                "reviews",
                "--service-node",
                "sidecar~10.0.0.1~reviews-v1.default~cluster.local",
                "--max-obj-name-len",
                "189",
                "--local-address-ip-version",
                "v4",
            ])
        );
    }

    #[test]
    fn test_each_required_flag_appears_once() {
        let mut config = test_config();
        config.log_level = Some("debug".to_string());
        config.concurrency = 2;
        let args = ArgumentBuilder::new(config).build(
            Path::new("/c.json"),
            Epoch(0),
            Some(OsStr::new("a: b")),
        );

        for flag in [
            "-c",
            "--restart-epoch",
            "--drain-time-s",
            "--parent-shutdown-time-s",
            "--service-cluster",
            "--service-node",
            "--max-obj-name-len",
            "--local-address-ip-version",
        ] {
            assert_eq!(args.iter().filter(|a| *a == flag).count(), 1, "{flag}");
        }
    }

    #[test]
    fn test_durations_truncate_to_whole_seconds() {
        let mut config = test_config();
        config.drain_duration_ms = 999;
        config.parent_shutdown_duration_ms = 1_999;
        let args = ArgumentBuilder::new(config).build(Path::new("/c.json"), Epoch(0), None);
        assert_eq!(args[5], "0");
        assert_eq!(args[7], "1");
    }

    #[test]
    fn test_optional_flags_are_appended_in_order() {
        let mut config = test_config();
        config.log_level = Some("debug".to_string());
        config.component_log_level = Some("upstream:trace".to_string());
        config.concurrency = 4;

        let args = ArgumentBuilder::new(config).build(
            Path::new("/c.json"),
            Epoch(1),
            Some(OsStr::new("admin:\n  access_log_path: /dev/null\n")),
        );

        assert_eq!(
            &args[16..],
            &os(&[
                "-l",
                "debug",
                "--component-log-level",
                "upstream:trace",
                "--config-yaml",
                "admin:\n  access_log_path: /dev/null\n",
                "--concurrency",
                "4",
            ])[..]
        );
    }

    #[test]
    fn test_zero_concurrency_and_empty_levels_are_omitted() {
        let mut config = test_config();
        config.log_level = Some(String::new());
        config.concurrency = 0;
        let args = ArgumentBuilder::new(config).build(Path::new("/c.json"), Epoch(0), None);
        assert_eq!(args.len(), 16);
    }

    #[test]
    fn test_ip_version_ipv4_node() {
        assert_eq!(local_address_ip_version(&ips(&["10.0.0.1"])), IpVersion::V4);
    }

    #[test]
    fn test_ip_version_ipv6_node() {
        assert_eq!(local_address_ip_version(&ips(&["::1"])), IpVersion::V6);
    }

    #[test]
    fn test_ip_version_empty_list_selects_v6() {
        // Preserved quirk: no addresses at all is treated as an IPv6 node.
        assert_eq!(local_address_ip_version(&[]), IpVersion::V6);
    }

    #[test]
    fn test_ip_version_unparsable_list_selects_v6() {
        assert_eq!(local_address_ip_version(&ips(&["nope", "10.0.0"])), IpVersion::V6);
    }

    #[test]
    fn test_ip_version_mixed_and_mapped() {
        assert_eq!(local_address_ip_version(&ips(&["fd00::1", "10.0.0.1"])), IpVersion::V4);
        assert_eq!(local_address_ip_version(&ips(&["::ffff:10.0.0.1"])), IpVersion::V4);
        assert_eq!(local_address_ip_version(&ips(&["bogus", "fd00::1"])), IpVersion::V6);
    }

    #[test]
    fn test_override_file_is_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"stats_flush_interval: 5s\n").unwrap();
        assert_eq!(
            read_bootstrap_override(file.path()),
            Some(OsString::from("stats_flush_interval: 5s\n"))
        );
    }

    #[test]
    fn test_non_utf8_override_keeps_raw_bytes() {
        let raw = b"key: \xff\xfe value\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw).unwrap();

        let contents = read_bootstrap_override(file.path()).unwrap();
        assert_eq!(contents.as_bytes(), raw);

        let args = ArgumentBuilder::new(test_config()).build(
            Path::new("/c.json"),
            Epoch(0),
            Some(contents.as_os_str()),
        );
        assert_eq!(args[16], "--config-yaml");
        assert_eq!(args[17].as_bytes(), raw);
    }

    #[test]
    fn test_non_utf8_config_path_is_passed_through() {
        let path = Path::new(OsStr::from_bytes(b"/etc/proxy-agent/\xffrev.json"));
        let args = ArgumentBuilder::new(test_config()).build(path, Epoch(0), None);
        assert_eq!(args[1].as_bytes(), path.as_os_str().as_bytes());
    }

    #[test]
    fn test_unreadable_override_is_skipped() {
        assert!(read_bootstrap_override(Path::new("/nonexistent/override.yaml")).is_none());
    }
}
