//! Cell reading validation

use crate::core::{CellReading, MCC_MAX, MCC_MIN};
use std::fmt;

/// Reasons a reading is rejected before lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingError {
    /// Mobile country code outside the assigned ITU range
    MccOutOfRange { mcc: u16 },
    /// Area code carried the modem's unset sentinel
    MissingAreaCode,
    /// Cell identity carried the modem's unset sentinel
    MissingCellId,
}

impl fmt::Display for ReadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingError::MccOutOfRange { mcc } => {
                write!(f, "MCC {} outside valid range {}..={}", mcc, MCC_MIN, MCC_MAX)
            }
            ReadingError::MissingAreaCode => write!(f, "Reading has no area code"),
            ReadingError::MissingCellId => write!(f, "Reading has no cell identity"),
        }
    }
}

impl std::error::Error for ReadingError {}

/// Check a reading is usable for tower lookup.
///
/// Modems report placeholder identities while searching for service;
/// those must be dropped rather than looked up, so an invalid reading is
/// treated the same as no reading at all by the estimator.
pub fn validate_reading(reading: &CellReading) -> Result<(), ReadingError> {
    if reading.mcc < MCC_MIN || reading.mcc > MCC_MAX {
        return Err(ReadingError::MccOutOfRange { mcc: reading.mcc });
    }
    if reading.lac == 0 {
        return Err(ReadingError::MissingAreaCode);
    }
    if reading.cid == 0 {
        return Err(ReadingError::MissingCellId);
    }
    Ok(())
}
