//! Application configuration module.
//!
//! [`MergeConfig`] holds the thresholds of the cell/text reconciliation and is
//! passed explicitly to the merge pipeline. [`AppConfig`] is the boundary
//! configuration of the CLI and server, loaded from a JSON file.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/app_config.json";

/// Thresholds controlling how text items are assigned to cells.
///
/// Every field has a default, so a partial JSON object such as
/// `{"overlap_threshold": 0.6}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Minimum overlap for assigning a text item to its single best cell.
    pub overlap_threshold: f64,

    /// Minimum overlap for a cell to count as a spanning candidate.
    pub min_overlap_for_spanning: f64,

    /// Texts must be longer than this many characters to be split.
    pub length_threshold: usize,

    /// Row tolerance for positional splitting, as a multiple of the text height.
    pub row_tolerance: f64,

    /// Also treat all-digit texts of at least `numeric_min_digits` characters
    /// as split candidates, regardless of `length_threshold`.
    pub split_numeric_sequences: bool,

    /// Minimum digit count for `split_numeric_sequences`.
    pub numeric_min_digits: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.5,
            min_overlap_for_spanning: 0.1,
            length_threshold: 10,
            row_tolerance: 2.0,
            split_numeric_sequences: false,
            numeric_min_digits: 10,
        }
    }
}

impl MergeConfig {
    /// Checks that thresholds are within their valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("overlap_threshold", self.overlap_threshold)?;
        check_fraction("min_overlap_for_spanning", self.min_overlap_for_spanning)?;

        if !self.row_tolerance.is_finite() || self.row_tolerance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "row_tolerance",
                message: format!("must be a positive number, got {}", self.row_tolerance),
            });
        }

        if self.numeric_min_digits == 0 {
            return Err(ConfigError::InvalidValue {
                field: "numeric_min_digits",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            message: format!("must be within [0, 1], got {value}"),
        })
    }
}

/// Application configuration structure.
///
/// This struct represents the boundary settings of the CLI and the server.
/// String fields use `Box<str>` since they are set once and never modified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the server binds to
    pub host_url: Box<str>,

    /// Maximum accepted request body size in bytes
    pub max_payload_size: usize,

    /// Merge thresholds used when a request does not carry its own
    #[serde(default)]
    pub merge: MergeConfig,
}

impl AppConfig {
    /// Load configuration from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration JSON file
    ///
    /// # Returns
    ///
    /// Returns the parsed and validated `AppConfig` or a `ConfigError` if loading fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.merge.validate()?;
        Ok(config)
    }

    /// Load configuration from the default path.
    ///
    /// Falls back to [`AppConfig::default`] when `config/app_config.json` does
    /// not exist. A file that exists but cannot be parsed is still an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Ok(Self::default())
        }
    }

    /// Create a new configuration with default values.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            host_url: "0.0.0.0:3000".into(),
            max_payload_size: 64 * 1024 * 1024, // 64 MB
            merge: MergeConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}
