//! Physical constants and identifier bounds

/// Mean Earth radius used for great-circle distances (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Lower bound of the geographic mobile country code range
pub const MCC_MIN: u16 = 200;

/// Upper bound of the geographic mobile country code range
pub const MCC_MAX: u16 = 799;
