//! Configuration loading and typed config structures.
//!
//! Hosts tune the equipment system through a small YAML file (or embed the
//! YAML in their own config). Every field has a default matching the
//! original balance values, so an absent or empty file yields stock
//! behaviour.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Tunables for one player's equipment bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WardplateConfig {
    /// Maximum total upgrade cost a player may hold (default: 100).
    #[serde(default = "default_max_budget")]
    pub max_budget: u32,

    /// Tracker thresholds as a percentage of their defaults (default: 100).
    ///
    /// Below 100 makes upgrades quicker to earn, above 100 slower. Applied
    /// to every tracker built for a session.
    #[serde(default = "default_threshold_scale_pct")]
    pub threshold_scale_pct: u32,
}

impl WardplateConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yml::from_str(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

impl Default for WardplateConfig {
    fn default() -> Self {
        Self {
            max_budget: default_max_budget(),
            threshold_scale_pct: default_threshold_scale_pct(),
        }
    }
}

const fn default_max_budget() -> u32 {
    100
}

const fn default_threshold_scale_pct() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = WardplateConfig::default();
        assert_eq!(config.max_budget, 100);
        assert_eq!(config.threshold_scale_pct, 100);
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = WardplateConfig::parse("{}");
        assert_eq!(config.ok(), Some(WardplateConfig::default()));
    }

    #[test]
    fn partial_yaml_overrides_one_field() {
        let config = WardplateConfig::parse("max_budget: 60\n");
        assert_eq!(
            config.ok(),
            Some(WardplateConfig {
                max_budget: 60,
                threshold_scale_pct: 100,
            })
        );
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = WardplateConfig::parse("max_budget: [not a number");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }
}
