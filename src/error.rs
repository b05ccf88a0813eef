//! Error types for the exercise alarm library.

use crate::alarm::AlarmStatus;
use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),

    /// A recorded pose frame could not be parsed
    #[error("Frame parse error on line {line}: {reason}")]
    FrameParse {
        /// 1-based line number in the recording
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Stop was requested before the required repetitions were verified
    #[error("Alarm cannot be stopped yet: {current}/{target} reps verified")]
    NotVerified {
        /// Verified repetitions so far
        current: u32,
        /// Repetitions required to unlock
        target: u32,
    },

    /// A manual repetition was requested after the target was reached
    #[error("Repetition target already reached")]
    RepsComplete,

    /// The alarm was asked to do something its current state does not allow
    #[error("Cannot {action} while alarm is {from}")]
    InvalidTransition {
        /// Status at the time of the call
        from: AlarmStatus,
        /// The rejected action
        action: &'static str,
    },
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
