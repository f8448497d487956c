//! Public tracking API
//!
//! This module ties the radio, store, and route layers together into a
//! poll-driven position estimator, a background tracking service with
//! observable reports, and formatters for the resulting reports.

pub mod engine;
pub mod formatting;
pub mod service;
pub mod types;

// Re-export commonly used API types
pub use types::{ApiError, ApiResult, PositionReport, SessionStats};
pub use engine::PositionEstimator;
pub use service::{CallbackHandle, ReportCallback, TrackingService};
pub use formatting::{status_line, JsonFormatter, TextFormatter};
