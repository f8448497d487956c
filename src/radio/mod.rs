//! Modem access layer
//!
//! Abstracts the cellular modem behind the [`CellReader`] trait so the
//! estimator can run against real hardware or the scripted mock used in
//! tests and demos.

pub mod error;
pub mod mock;
pub mod reader;
pub mod validate;

pub use error::{RadioError, RadioResult, RecoveryStrategy};
pub use mock::MockCellReader;
pub use reader::{CellReader, ReaderStatus};
pub use validate::{validate_reading, ReadingError};
