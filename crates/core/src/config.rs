//! Registry configuration via `rxregistry.toml`
//!
//! On first start the host writes a default `rxregistry.toml`. To change
//! capacity or fees, edit the file and restart. Missing fields take their
//! defaults.
//!
//! The authority contract is not read from this file. It is delegated once,
//! at runtime, through governance.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::limits::{DEFAULT_FEE, DEFAULT_MAX_RECORDS};

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "rxregistry.toml";

/// Configuration load/store failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("config file '{}': {source}", path.display())]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid TOML for this schema
    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(String),

    /// A value is out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Capacity and fee of one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySettings {
    /// Maximum number of records (default: 100000)
    #[serde(default = "default_max_records")]
    pub max_records: u64,
    /// Fee charged per successful create (default: 100)
    #[serde(default = "default_fee")]
    pub fee: u64,
}

fn default_max_records() -> u64 {
    DEFAULT_MAX_RECORDS
}

fn default_fee() -> u64 {
    DEFAULT_FEE
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            fee: default_fee(),
        }
    }
}

/// Configuration loaded from `rxregistry.toml`.
///
/// # Example
///
/// ```toml
/// [drugs]
/// max_records = 100000
/// fee = 100
///
/// [interactions]
/// max_records = 100000
/// fee = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Drug registry settings
    #[serde(default)]
    pub drugs: RegistrySettings,
    /// Interaction registry settings
    #[serde(default)]
    pub interactions: RegistrySettings,
}

impl Config {
    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error if either registry has zero capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drugs.max_records == 0 {
            return Err(ConfigError::Invalid(
                "drugs.max_records must be at least 1".to_string(),
            ));
        }
        if self.interactions.max_records == 0 {
            return Err(ConfigError::Invalid(
                "interactions.max_records must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse config from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value is out of range.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# rxregistry configuration
#
# Each registry has a record capacity and a fee charged to the caller on
# every successful registration. The fee is paid to the authority contract,
# which is delegated at runtime and cannot be set here.

[drugs]
# Maximum number of drug records (default: 100000)
max_records = 100000
# Registration fee (default: 100)
fee = 100

[interactions]
# Maximum number of interaction records (default: 100000)
max_records = 100000
# Registration fee (default: 100)
fee = 100
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
