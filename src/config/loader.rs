//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::AgentConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming a file inlined as `--config-yaml`.
pub const BOOTSTRAP_OVERRIDE_ENV: &str = "BOOTSTRAP_OVERRIDE";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied after parsing and before validation.
pub fn load_config(path: &Path) -> Result<AgentConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, std::env::var(BOOTSTRAP_OVERRIDE_ENV).ok())
}

/// Parse and validate configuration text with an explicit override value.
pub fn parse_config(
    content: &str,
    bootstrap_override: Option<String>,
) -> Result<AgentConfig, ConfigError> {
    let mut config: AgentConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    if let Some(value) = bootstrap_override.filter(|v| !v.is_empty()) {
        config.proxy.bootstrap_override = Some(PathBuf::from(value));
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
