//! Removal of finished epochs' bootstrap files.

use std::fs;
use std::path::PathBuf;

use crate::observability::metrics;
use crate::proxy::bootstrap::epoch_config_file;
use crate::proxy::types::Epoch;

/// Deletes generated bootstrap files once their epoch is over.
#[derive(Debug, Clone)]
pub struct EpochJanitor {
    config_dir: PathBuf,
}

impl EpochJanitor {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Remove the bootstrap file generated for `epoch`.
    ///
    /// A leftover file only costs disk space, so failures are logged and
    /// swallowed.
    pub fn cleanup(&self, epoch: Epoch) {
        let path = epoch_config_file(&self.config_dir, epoch);
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(epoch = %epoch, path = %path.display(), "Removed config file"),
            Err(e) => {
                metrics::record_cleanup_failure();
                tracing::warn!(
                    epoch = %epoch,
                    path = %path.display(),
                    error = %e,
                    "Failed to delete config file"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cleanup_removes_only_that_epoch() {
        let temp = tempdir().unwrap();
        let janitor = EpochJanitor::new(temp.path().to_path_buf());
        let current = epoch_config_file(temp.path(), Epoch(1));
        let next = epoch_config_file(temp.path(), Epoch(2));
        fs::write(&current, "{}").unwrap();
        fs::write(&next, "{}").unwrap();

        janitor.cleanup(Epoch(1));

        assert!(!current.exists());
        assert!(next.exists());
    }

    #[test]
    fn test_cleanup_of_missing_file_is_silent() {
        let temp = tempdir().unwrap();
        let janitor = EpochJanitor::new(temp.path().to_path_buf());
        janitor.cleanup(Epoch(9));
        janitor.cleanup(Epoch(9));
    }
}
