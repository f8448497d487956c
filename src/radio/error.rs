//! Radio error types and recovery classification

use std::fmt;

/// Errors raised while querying the cellular modem
#[derive(Debug, Clone, PartialEq)]
pub enum RadioError {
    /// Modem or telephony subsystem is unreachable
    ConnectionLost,
    /// Caller lacks the permission required to read cell identities
    PermissionDenied,
    /// Timeout waiting for the modem to answer
    Timeout { timeout_ms: u32 },
    /// Modem reported a cell of a technology the tracker cannot use
    UnsupportedRadio { details: String },
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioError::ConnectionLost => {
                write!(f, "Connection to the cellular modem lost")
            }
            RadioError::PermissionDenied => {
                write!(f, "Permission to read cell identities denied")
            }
            RadioError::Timeout { timeout_ms } => {
                write!(f, "Modem query timed out after {}ms", timeout_ms)
            }
            RadioError::UnsupportedRadio { details } => {
                write!(f, "Unsupported radio technology: {}", details)
            }
        }
    }
}

impl std::error::Error for RadioError {}

/// Result type for radio operations
pub type RadioResult<T> = Result<T, RadioError>;

/// Recovery strategy for radio failures
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecoveryStrategy {
    /// Wait and then retry
    RetryWithDelay { delay_ms: u32 },
    /// Reset the modem connection and retry
    ResetAndRetry,
    /// Skip this reading and continue with the next poll
    Skip,
    /// Fail permanently
    Fail,
}

impl RadioError {
    /// Get the recommended recovery strategy for this error
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            RadioError::ConnectionLost => RecoveryStrategy::ResetAndRetry,
            RadioError::PermissionDenied => RecoveryStrategy::Fail,
            RadioError::Timeout { .. } => RecoveryStrategy::RetryWithDelay { delay_ms: 100 },
            RadioError::UnsupportedRadio { .. } => RecoveryStrategy::Skip,
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery_strategy(), RecoveryStrategy::Fail)
    }
}
