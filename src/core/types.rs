//! Core data types for the tracking system

use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Radio access technology of a cell reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RadioType {
    Gsm,
    Wcdma,
    Lte,
    Nr,
}

/// Identifier tuple of the currently registered cell, one per poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReading {
    /// Mobile country code
    pub mcc: u16,
    /// Mobile network code
    pub mnc: u16,
    /// Location/tracking area code
    pub lac: u32,
    /// Cell identity
    pub cid: u64,
    pub radio: RadioType,
}

impl CellReading {
    pub fn new(mcc: u16, mnc: u16, lac: u32, cid: u64, radio: RadioType) -> Self {
        Self { mcc, mnc, lac, cid, radio }
    }
}

/// Persisted mapping from a cell identifier tuple to a known coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerRecord {
    pub mcc: u16,
    pub mnc: u16,
    pub lac: u32,
    pub cid: u64,
    pub position: GeoPoint,
}

/// Named route stop with its ordering along the line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub position: GeoPoint,
    pub sequence: u32,
}

/// Inferred direction of travel along the route polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelDirection {
    Forward,
    Backward,
}

impl Default for TravelDirection {
    fn default() -> Self {
        TravelDirection::Forward
    }
}

/// Per-session direction-inference state, one writer per poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerState {
    /// Route index from the previous completed poll, if any
    pub previous_route_index: Option<usize>,
    pub direction: TravelDirection,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            previous_route_index: None,
            direction: TravelDirection::Forward,
        }
    }
}

/// Relationship of the bus to the reported stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopStatus {
    Approaching,
    AtStop,
    Departed,
}
