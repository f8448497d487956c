//! Mock cell reader for testing and development

use crate::core::{CellReading, RadioType};
use crate::radio::error::{RadioError, RadioResult};
use crate::radio::reader::{CellReader, ReaderStatus};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Scripted reader that replays a queue of readings.
///
/// Each queue entry is one poll's worth of modem output; `None` entries
/// model a tick with no registered cell. An exhausted queue also reads
/// as no registration.
pub struct MockCellReader {
    queue: VecDeque<Option<CellReading>>,
    status: ReaderStatus,
    simulate_errors: bool,
    error_probability: f32,
    connected: bool,
}

impl MockCellReader {
    pub fn new() -> Self {
        let mut status = ReaderStatus::new();
        status.connected = true;

        Self {
            queue: VecDeque::new(),
            status,
            simulate_errors: false,
            error_probability: 0.0,
            connected: true,
        }
    }

    /// Queue a reading for the next poll
    pub fn push_reading(&mut self, reading: CellReading) {
        self.queue.push_back(Some(reading));
    }

    /// Queue an LTE reading by identifier tuple
    pub fn push_cell(&mut self, mcc: u16, mnc: u16, lac: u32, cid: u64) {
        self.push_reading(CellReading::new(mcc, mnc, lac, cid, RadioType::Lte));
    }

    /// Queue a tick with no registered cell
    pub fn push_no_service(&mut self) {
        self.queue.push_back(None);
    }

    /// Enable error simulation with given probability (0.0 to 1.0)
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Simulate modem loss
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.status.connected = false;
    }

    /// Restore the modem connection
    pub fn reconnect(&mut self) {
        self.connected = true;
        self.status.connected = true;
    }

    /// Get the number of queued poll entries
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl Default for MockCellReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CellReader for MockCellReader {
    fn current_cell(&mut self) -> RadioResult<Option<CellReading>> {
        if !self.connected {
            return Err(RadioError::ConnectionLost);
        }

        if self.should_simulate_error() {
            self.status.error_count += 1;
            return Err(RadioError::Timeout { timeout_ms: 100 });
        }

        match self.queue.pop_front().flatten() {
            Some(reading) => {
                self.status.readings_returned += 1;
                self.status.last_reading_time = Some(Self::now_ms());
                Ok(Some(reading))
            }
            None => Ok(None),
        }
    }

    fn status(&self) -> ReaderStatus {
        self.status.clone()
    }

    fn reset(&mut self) -> RadioResult<()> {
        self.queue.clear();
        self.status.error_count = 0;
        self.status.readings_returned = 0;
        self.status.last_reading_time = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
