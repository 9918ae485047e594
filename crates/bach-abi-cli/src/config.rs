//! CLI configuration management

use bach_abi::Labels;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Selector hash algorithm (`keccak-256` or `sha3-256`)
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
    /// Hex dump label style (`none`, `rows` or `offsets`)
    #[serde(default = "default_labels")]
    pub labels: String,
    /// Default log filter
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_hash_algorithm() -> String {
    "keccak-256".to_string()
}

fn default_labels() -> String {
    "offsets".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hash_algorithm: default_hash_algorithm(),
            labels: default_labels(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".bachledger"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("abi.toml"))
    }

    /// Load config from `path` (or the default location), falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        path.map(Path::to_path_buf)
            .or_else(Self::config_path)
            .and_then(|path| {
                if path.exists() {
                    std::fs::read_to_string(&path).ok()
                } else {
                    None
                }
            })
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to `path` (or the default location)
    pub fn save(&self, path: Option<&Path>) -> Result<(), std::io::Error> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_path)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine config path")
            })?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }

    /// Configured label style
    pub fn label_style(&self) -> Result<Labels, CliError> {
        self.labels
            .parse()
            .map_err(|_| CliError::Config(format!("unknown label style: {}", self.labels)))
    }

    /// A fresh hasher for the configured algorithm
    pub fn hasher(&self) -> Result<Box<dyn bach_crypto::Hasher256>, CliError> {
        bach_crypto::hasher_by_name(&self.hash_algorithm).ok_or_else(|| {
            CliError::Config(format!("unknown hash algorithm: {}", self.hash_algorithm))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.hash_algorithm, "keccak-256");
        assert_eq!(config.labels, "offsets");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.label_style().unwrap(), Labels::Offsets);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            hash_algorithm = "sha3-256"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.hash_algorithm, "sha3-256");
        assert_eq!(config.labels, "offsets");
        assert_eq!(config.hasher().unwrap().algorithm(), bach_crypto::SHA3_256);
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("abi.toml");
        let config = Config {
            labels: "rows".to_string(),
            ..Config::default()
        };
        config.save(Some(&path)).unwrap();
        assert_eq!(Config::load(Some(&path)), config);
    }

    #[test]
    fn test_unknown_values() {
        let config = Config {
            hash_algorithm: "md5".to_string(),
            labels: "columns".to_string(),
            ..Config::default()
        };
        assert!(config.hasher().is_err());
        assert!(config.label_style().is_err());
    }
}
