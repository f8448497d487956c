//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::route::ResolverConfig;

/// Tunable parameters for the tracking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Distance below which the bus is reported at a stop (meters)
    pub at_stop_radius_m: f64,
    /// At-stop distance used when bus and stop share a route index (meters)
    pub equal_index_radius_m: f64,
    /// Minimum route-index delta before the travel direction flips
    pub direction_hysteresis: u32,
    /// Delay between poll cycles (milliseconds)
    pub poll_interval_ms: u64,
    /// Distance band announced as "arriving" (meters)
    pub arriving_radius_m: f64,
    /// Distance band announced as "approaching" (meters)
    pub approaching_radius_m: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            at_stop_radius_m: 100.0,
            equal_index_radius_m: 200.0,
            direction_hysteresis: 2,
            poll_interval_ms: 5000,
            arriving_radius_m: 500.0,
            approaching_radius_m: 2000.0,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Invalid parameter value
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    IoError { message: String },
    /// JSON serialization/deserialization error
    SerializationError { message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{}' = '{}': {}", parameter, value, reason)
            }
            ConfigError::IoError { message } => write!(f, "I/O error: {}", message),
            ConfigError::SerializationError { message } => {
                write!(f, "Serialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationReport {
    /// Whether configuration is usable
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl TrackerConfig {
    /// Load configuration from a JSON file, rejecting invalid parameters.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: TrackerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        let validation = config.validate();
        if let Some(error) = validation.errors.into_iter().next() {
            return Err(error);
        }
        for warning in &validation.warnings {
            log::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    /// Validate all parameters.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.at_stop_radius_m <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "at_stop_radius_m".to_string(),
                value: self.at_stop_radius_m.to_string(),
                reason: "At-stop radius must be positive".to_string(),
            });
        }

        if self.equal_index_radius_m <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "equal_index_radius_m".to_string(),
                value: self.equal_index_radius_m.to_string(),
                reason: "Equal-index radius must be positive".to_string(),
            });
        } else if self.equal_index_radius_m < self.at_stop_radius_m {
            warnings.push(
                "Equal-index radius below at-stop radius makes the equal-index rule unreachable"
                    .to_string(),
            );
        }

        if self.direction_hysteresis == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "direction_hysteresis".to_string(),
                value: self.direction_hysteresis.to_string(),
                reason: "Hysteresis of zero flips direction on every snap".to_string(),
            });
        } else if self.direction_hysteresis == 1 {
            warnings
                .push("Hysteresis of 1 flips direction on adjacent-vertex jitter".to_string());
        }

        if self.poll_interval_ms == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "poll_interval_ms".to_string(),
                value: self.poll_interval_ms.to_string(),
                reason: "Poll interval must be positive".to_string(),
            });
        } else if self.poll_interval_ms < 1000 {
            warnings.push("Sub-second polling may drain the battery".to_string());
        }

        if self.arriving_radius_m <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "arriving_radius_m".to_string(),
                value: self.arriving_radius_m.to_string(),
                reason: "Arriving radius must be positive".to_string(),
            });
        }

        if self.approaching_radius_m <= 0.0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "approaching_radius_m".to_string(),
                value: self.approaching_radius_m.to_string(),
                reason: "Approaching radius must be positive".to_string(),
            });
        } else if self.arriving_radius_m >= self.approaching_radius_m {
            warnings.push("Arriving band should be narrower than the approaching band".to_string());
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Update the poll interval with validation, returning the old value.
    pub fn set_poll_interval_ms(&mut self, interval_ms: u64) -> Result<u64, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "poll_interval_ms".to_string(),
                value: interval_ms.to_string(),
                reason: "Poll interval must be positive".to_string(),
            });
        }

        let old_value = self.poll_interval_ms;
        self.poll_interval_ms = interval_ms;
        Ok(old_value)
    }

    /// Thresholds consumed by the stop status resolver.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            at_stop_radius_m: self.at_stop_radius_m,
            equal_index_radius_m: self.equal_index_radius_m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrackerConfig::default();
        assert_eq!(config.at_stop_radius_m, 100.0);
        assert_eq!(config.equal_index_radius_m, 200.0);
        assert_eq!(config.direction_hysteresis, 2);
        assert_eq!(config.poll_interval_ms, 5000);

        let report = config.validate();
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_zero_hysteresis_is_rejected() {
        let config = TrackerConfig {
            direction_hysteresis: 0,
            ..TrackerConfig::default()
        };
        let report = config.validate();
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_overlapping_display_bands_warn() {
        let config = TrackerConfig {
            arriving_radius_m: 2500.0,
            ..TrackerConfig::default()
        };
        let report = config.validate();
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_poll_interval_setter_returns_old_value() {
        let mut config = TrackerConfig::default();

        let old = config.set_poll_interval_ms(10000).unwrap();
        assert_eq!(old, 5000);
        assert_eq!(config.poll_interval_ms, 10000);

        assert!(config.set_poll_interval_ms(0).is_err());
        assert_eq!(config.poll_interval_ms, 10000);
    }

    #[test]
    fn test_config_round_trip() {
        let config = TrackerConfig {
            poll_interval_ms: 2000,
            ..TrackerConfig::default()
        };

        let temp_path = PathBuf::from("test_tracker_config.json");
        config.save_to_file(&temp_path).unwrap();
        let loaded = TrackerConfig::from_file(&temp_path).unwrap();

        assert_eq!(loaded, config);

        let _ = fs::remove_file(temp_path);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        assert!(matches!(
            TrackerConfig::from_file("/nonexistent/config.json"),
            Err(ConfigError::IoError { .. })
        ));
    }
}
