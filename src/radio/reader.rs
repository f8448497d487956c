//! Cell reader trait and status reporting

use crate::core::CellReading;
use crate::radio::error::RadioResult;

/// Abstraction over the device's cellular modem.
///
/// Implementations report the currently registered cell only, never the
/// full set of visible cells.
pub trait CellReader {
    /// Read the currently registered cell.
    /// Returns Ok(Some(reading)) when the modem is camped on a cell,
    /// Ok(None) when there is no registration, and Err on modem failure.
    fn current_cell(&mut self) -> RadioResult<Option<CellReading>>;

    /// Get current reader status
    fn status(&self) -> ReaderStatus;

    /// Reset the modem connection
    fn reset(&mut self) -> RadioResult<()>;

    /// Check if the modem is reachable
    fn is_connected(&self) -> bool;
}

/// Reader health and counters
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderStatus {
    pub connected: bool,
    pub readings_returned: u32,
    pub error_count: u32,
    pub last_reading_time: Option<u64>,
}

impl ReaderStatus {
    pub fn new() -> Self {
        Self {
            connected: false,
            readings_returned: 0,
            error_count: 0,
            last_reading_time: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.connected && self.error_count < 10
    }
}

impl Default for ReaderStatus {
    fn default() -> Self {
        Self::new()
    }
}
