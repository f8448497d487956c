//! Report formatting for riders, logs, and machine consumers

use crate::api::types::PositionReport;
use crate::core::StopStatus;
use crate::utils::TrackerConfig;

/// One-line rider-facing status text.
///
/// Approaching reports are banded by distance so the wording tightens
/// as the bus closes in; beyond the outer band the distance is shown
/// as truncated whole kilometres.
pub fn status_line(report: &PositionReport, config: &TrackerConfig) -> String {
    match report {
        PositionReport::Unresolved => String::from("Searching for signal..."),
        PositionReport::Resolved {
            stop,
            distance_to_stop_m,
            status,
            ..
        } => match status {
            StopStatus::AtStop => format!("At {}", stop.name),
            StopStatus::Departed => format!("Departed {}", stop.name),
            StopStatus::Approaching => {
                if *distance_to_stop_m < config.arriving_radius_m {
                    format!("Arriving at {}", stop.name)
                } else if *distance_to_stop_m < config.approaching_radius_m {
                    format!("Approaching {}", stop.name)
                } else {
                    format!(
                        "{}km to {}",
                        (*distance_to_stop_m / 1000.0) as u64,
                        stop.name
                    )
                }
            }
        },
    }
}

/// Human-readable text formatter
pub struct TextFormatter {
    /// Use the one-line format instead of the multi-line block
    pub compact: bool,
    config: TrackerConfig,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            compact: false,
            config: TrackerConfig::default(),
        }
    }
}

impl TextFormatter {
    /// Create a formatter using the session's distance bands
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            compact: false,
            config: config.clone(),
        }
    }

    /// Create a one-line formatter
    pub fn compact(config: &TrackerConfig) -> Self {
        Self {
            compact: true,
            config: config.clone(),
        }
    }

    /// Format a report as human-readable text
    pub fn format_text(&self, report: &PositionReport) -> String {
        if self.compact {
            return status_line(report, &self.config);
        }

        let mut output = String::new();
        output.push_str(&format!("Status: {}\n", status_line(report, &self.config)));

        if let PositionReport::Resolved {
            estimated_position,
            stop,
            distance_to_stop_m,
            reading,
            network_label,
            ..
        } = report
        {
            output.push_str("Position:\n");
            output.push_str(&format!("  Latitude:  {:.6}\n", estimated_position.lat));
            output.push_str(&format!("  Longitude: {:.6}\n", estimated_position.lon));
            output.push_str(&format!(
                "Stop: {} ({:.0} m away)\n",
                stop.name, distance_to_stop_m
            ));
            output.push_str(&format!(
                "Network: {} ({}-{})\n",
                network_label, reading.mcc, reading.mnc
            ));
            output.push_str(&format!(
                "Cell: LAC {}, CID {}\n",
                reading.lac, reading.cid
            ));
        }

        output
    }
}

/// JSON formatter for machine consumers
pub struct JsonFormatter {
    /// Pretty-print with indentation
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: false }
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Serialize a report to JSON
    pub fn format_json(&self, report: &PositionReport) -> Result<String, serde_json::Error> {
        if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        }
    }
}
