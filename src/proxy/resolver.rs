//! Selection of the configuration file a run starts from.

use std::path::PathBuf;
use std::sync::Arc;

use crate::proxy::bootstrap::BootstrapGenerator;
use crate::proxy::error::SupervisorResult;
use crate::proxy::types::{ConfigRequest, ConfigVariant, Epoch};

/// Bootstrap loaded during graceful termination. Holds no listeners, so the
/// proxy stops accepting new connections while in-flight ones finish.
pub const DRAIN_CONFIG_PATH: &str = "/var/lib/proxy-agent/envoy_bootstrap_drain.json";

/// Decides which configuration file each epoch uses.
pub struct ConfigResolver {
    custom_config_file: Option<PathBuf>,
    generator: Arc<dyn BootstrapGenerator>,
}

impl ConfigResolver {
    pub fn new(custom_config_file: Option<PathBuf>, generator: Arc<dyn BootstrapGenerator>) -> Self {
        Self {
            custom_config_file,
            generator,
        }
    }

    /// Pick the variant for a request. Drain beats a custom file, which beats
    /// generation.
    pub fn select(&self, request: ConfigRequest, epoch: Epoch) -> ConfigVariant {
        match (request, &self.custom_config_file) {
            (ConfigRequest::Drain, _) => ConfigVariant::Drain,
            (ConfigRequest::Bootstrap, Some(path)) => ConfigVariant::CustomOverride(path.clone()),
            (ConfigRequest::Bootstrap, None) => ConfigVariant::Generated(epoch),
        }
    }

    /// Resolve a request to the file the proxy should load.
    ///
    /// Only the generated variant touches disk. A custom file is passed through
    /// unchecked; whoever supplies it keeps watching its certificates.
    pub fn resolve(&self, request: ConfigRequest, epoch: Epoch) -> SupervisorResult<PathBuf> {
        match self.select(request, epoch) {
            ConfigVariant::Drain => Ok(PathBuf::from(DRAIN_CONFIG_PATH)),
            ConfigVariant::CustomOverride(path) => Ok(path),
            ConfigVariant::Generated(epoch) => {
                let path = self.generator.create_file_for_epoch(epoch)?;
                Ok(path)
            }
        }
    }
}
