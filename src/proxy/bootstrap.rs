//! Bootstrap file generation.
//!
//! The content of a bootstrap file is produced outside the supervisor; this
//! module only fixes where each epoch's file lives and provides a template
//! copier for deployments that ship a static bootstrap.

use std::fs;
use std::path::{Path, PathBuf};

use crate::proxy::error::BootstrapError;
use crate::proxy::types::Epoch;

/// Path of the generated bootstrap file for `epoch` under `dir`.
pub fn epoch_config_file(dir: &Path, epoch: Epoch) -> PathBuf {
    dir.join(format!("envoy-rev{}.json", epoch))
}

/// Writes a fresh bootstrap file for an epoch.
pub trait BootstrapGenerator: Send + Sync {
    /// Write the bootstrap for `epoch` and return its path.
    fn create_file_for_epoch(&self, epoch: Epoch) -> Result<PathBuf, BootstrapError>;
}

/// Copies a template file to the epoch's bootstrap path.
#[derive(Debug, Clone)]
pub struct TemplateBootstrap {
    template: Option<PathBuf>,
    config_dir: PathBuf,
}

impl TemplateBootstrap {
    pub fn new(template: Option<PathBuf>, config_dir: PathBuf) -> Self {
        Self {
            template,
            config_dir,
        }
    }
}

impl BootstrapGenerator for TemplateBootstrap {
    fn create_file_for_epoch(&self, epoch: Epoch) -> Result<PathBuf, BootstrapError> {
        let template = self.template.as_ref().ok_or(BootstrapError::MissingTemplate)?;
        let contents = fs::read(template).map_err(|source| BootstrapError::Io {
            path: template.clone(),
            source,
        })?;

        fs::create_dir_all(&self.config_dir).map_err(|source| BootstrapError::Io {
            path: self.config_dir.clone(),
            source,
        })?;

        let path = epoch_config_file(&self.config_dir, epoch);
        fs::write(&path, contents).map_err(|source| BootstrapError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(epoch = %epoch, path = %path.display(), "Bootstrap file written");
        Ok(path)
    }
}
