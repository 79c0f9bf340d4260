//! Error types for the print engine

use thiserror::Error;

use crate::driver::DriverError;
use crate::status::StatusProblem;

/// Print request failure reasons.
///
/// Every variant renders as the human-readable sentence the caller sees in
/// `PrintOutcome::error`; nothing structured leaks across the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrintError {
    /// Request validation failed before any transport was touched.
    #[error("Printer target not provided")]
    MissingTarget,

    /// Driver/transport level failure during connect or send.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Transport fine, but the device cannot physically print.
    #[error(transparent)]
    Status(#[from] StatusProblem),

    /// Anything else (worker panic, join failure).
    #[error("{0}")]
    Unexpected(String),
}

/// Result type for print engine operations
pub type PrintResult<T> = Result<T, PrintError>;
