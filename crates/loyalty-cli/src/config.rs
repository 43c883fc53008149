//! CLI configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "loyalty.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`CliConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings shared by every command.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Journal file holding the ledger.
    #[serde(default = "default_journal")]
    pub journal: PathBuf,

    /// fsync after every append.
    #[serde(default)]
    pub sync: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter, e.g. "warn" or "info,loyalty_store=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_journal() -> PathBuf {
    PathBuf::from("ledger.lrj")
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            journal: default_journal(),
            sync: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl CliConfig {
    /// Loads `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it
    /// exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_toml_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    /// Reads configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config.journal, PathBuf::from("ledger.lrj"));
        assert!(!config.sync);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn partial_toml_overrides() {
        let config = CliConfig::from_toml_str(
            r#"
            journal = "/var/lib/loyalty/shop.lrj"
            sync = true
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.journal, PathBuf::from("/var/lib/loyalty/shop.lrj"));
        assert!(config.sync);
        assert_eq!(config.log_format, "json");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(CliConfig::from_toml_str("sync = \"yes\"").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/loyalty.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
