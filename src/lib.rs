//! Offline Bus Position Tracking
//!
//! Estimates a bus's position along a fixed route from the identity of
//! the cell tower its modem is registered to. No GPS and no network
//! connectivity are needed at runtime: tower positions come from a local
//! SQLite database and the route model from bundled GeoJSON files.

pub mod core;
pub mod route;
pub mod radio;
pub mod store;
pub mod ingest;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use core::{
    CellReading, GeoPoint, RadioType, Stop, StopStatus, TowerRecord, TrackerState,
    TravelDirection,
};
pub use route::{RouteGeometry, StopRegistry};
pub use radio::{CellReader, MockCellReader, RadioError, RadioResult};
pub use store::TowerStore;
pub use ingest::{load_route_polyline, load_stops, load_towers};
pub use utils::TrackerConfig;
pub use api::{
    ApiError, ApiResult, JsonFormatter, PositionEstimator, PositionReport, SessionStats,
    TextFormatter, TrackingService,
};
