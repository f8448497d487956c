//! Public result and report types for the tracking API

use serde::{Deserialize, Serialize};

use crate::core::{CellReading, GeoPoint, Stop, StopStatus};
use crate::utils::ConfigError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Route polyline has no vertices, so nothing can be snapped
    EmptyRoute,
    /// Stop list is empty, so no status can ever be resolved
    EmptyStops,
    /// Tracker configuration failed validation
    ConfigurationError { parameter: String, reason: String },
    /// Caller passed something the service cannot act on
    InvalidRequest { reason: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::EmptyRoute => write!(f, "Route polyline is empty"),
            ApiError::EmptyStops => write!(f, "Stop list is empty"),
            ApiError::ConfigurationError { parameter, reason } => {
                write!(f, "Configuration error in '{}': {}", parameter, reason)
            }
            ApiError::InvalidRequest { reason } => write!(f, "Invalid request: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ConfigError> for ApiError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidParameter {
                parameter, reason, ..
            } => ApiError::ConfigurationError { parameter, reason },
            other => ApiError::ConfigurationError {
                parameter: String::from("config"),
                reason: other.to_string(),
            },
        }
    }
}

/// One tracking cycle's outcome.
///
/// `Unresolved` is the normal answer whenever any link in the chain is
/// missing: no registered cell, an unusable reading, or a tower the
/// database has never seen. Consumers should treat it as "keep showing
/// the last known state", not as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum PositionReport {
    /// Nothing usable this cycle
    Unresolved,
    /// Bus located on the route
    Resolved {
        /// Tower position snapped onto the route polyline
        estimated_position: GeoPoint,
        /// Nearest stop, or the re-targeted upcoming stop after departure
        stop: Stop,
        /// Straight-line distance from the bus to that stop
        distance_to_stop_m: f64,
        status: StopStatus,
        /// Raw reading the estimate came from
        reading: CellReading,
        /// Human-readable operator name for the serving network
        network_label: String,
    },
}

impl PositionReport {
    pub fn is_resolved(&self) -> bool {
        matches!(self, PositionReport::Resolved { .. })
    }

    /// Name of the reported stop, if there is one
    pub fn stop_name(&self) -> Option<&str> {
        match self {
            PositionReport::Unresolved => None,
            PositionReport::Resolved { stop, .. } => Some(&stop.name),
        }
    }
}

/// Counters accumulated over one tracking session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Total poll cycles executed
    pub polls_completed: u32,
    /// Cycles that produced a resolved report
    pub reports_resolved: u32,
    /// Cycles dropped because the serving tower was not in the database
    pub lookup_misses: u32,
    /// Cycles dropped because the modem read failed
    pub radio_errors: u32,
}

impl SessionStats {
    /// Fraction of cycles that resolved, 0.0 when nothing has run yet
    pub fn resolution_rate(&self) -> f64 {
        if self.polls_completed == 0 {
            return 0.0;
        }
        f64::from(self.reports_resolved) / f64::from(self.polls_completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RadioType;

    #[test]
    fn test_unresolved_has_no_stop() {
        let report = PositionReport::Unresolved;
        assert!(!report.is_resolved());
        assert_eq!(report.stop_name(), None);
    }

    #[test]
    fn test_resolved_exposes_stop_name() {
        let report = PositionReport::Resolved {
            estimated_position: GeoPoint::new(12.97, 77.59),
            stop: Stop {
                id: String::from("mkt"),
                name: String::from("Market"),
                position: GeoPoint::new(12.97, 77.59),
                sequence: 1,
            },
            distance_to_stop_m: 42.0,
            status: StopStatus::AtStop,
            reading: CellReading::new(404, 45, 1801, 7_431_902, RadioType::Lte),
            network_label: String::from("Airtel"),
        };
        assert!(report.is_resolved());
        assert_eq!(report.stop_name(), Some("Market"));
    }

    #[test]
    fn test_report_serializes_with_state_tag() {
        let json = serde_json::to_string(&PositionReport::Unresolved).unwrap();
        assert!(json.contains("\"state\":\"Unresolved\""));
    }

    #[test]
    fn test_config_error_maps_to_configuration_error() {
        let error = ConfigError::InvalidParameter {
            parameter: String::from("poll_interval_ms"),
            value: String::from("0"),
            reason: String::from("must be positive"),
        };
        let api: ApiError = error.into();
        match api {
            ApiError::ConfigurationError { parameter, .. } => {
                assert_eq!(parameter, "poll_interval_ms");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolution_rate_handles_empty_session() {
        let stats = SessionStats::default();
        assert_eq!(stats.resolution_rate(), 0.0);

        let stats = SessionStats {
            polls_completed: 4,
            reports_resolved: 1,
            ..SessionStats::default()
        };
        assert!((stats.resolution_rate() - 0.25).abs() < 1e-12);
    }
}
