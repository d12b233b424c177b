//! Proxy liveness probing.
//!
//! # Responsibilities
//! - Query the proxy's admin `/server_info` endpoint once
//! - Classify the reported server state as live or not

use std::time::Duration;

use serde::Deserialize;

use crate::observability::metrics;

/// Lifecycle state reported by the proxy admin endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerState {
    Live,
    Draining,
    PreInitializing,
    Initializing,
    #[serde(other)]
    Unknown,
}

/// Subset of the admin `/server_info` response the agent cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub state: ServerState,
}

#[derive(Debug, thiserror::Error)]
enum ProbeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Single-shot liveness check against a local admin port.
///
/// Retries and polling cadence belong to the caller.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    admin_port: u16,
    client: reqwest::Client,
}

impl LivenessProbe {
    /// Every request made through the returned value is bounded by `timeout`.
    pub fn new(admin_port: u16, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { admin_port, client })
    }

    /// True only when the proxy reports itself `LIVE`.
    pub async fn is_live(&self) -> bool {
        let live = match self.server_info().await {
            Ok(info) if info.state == ServerState::Live => true,
            Ok(info) => {
                tracing::info!(state = ?info.state, "Proxy server not yet live");
                false
            }
            Err(e) => {
                tracing::info!(
                    port = self.admin_port,
                    error = %e,
                    "Failed retrieving server info from proxy"
                );
                false
            }
        };

        metrics::record_proxy_live(live);
        live
    }

    async fn server_info(&self) -> Result<ServerInfo, ProbeError> {
        let url = format!("http://127.0.0.1:{}/server_info", self.admin_port);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ProbeError::Status(response.status()));
        }
        Ok(response.json::<ServerInfo>().await?)
    }
}
