//! Error types for the likely engine
//!
//! All fallible operations return `Result<T, Error>`.
//! Tracking failures are deliberately coarse: the engine is a
//! best-effort observer, and a failed observation must never corrupt
//! the records accumulated so far.

use thiserror::Error;

/// Likely engine error types
#[derive(Debug, Error)]
pub enum Error {
    /// Two observed values whose variants cannot be ordered against
    /// each other (e.g. a string tracked where integers were seen)
    #[error("incomparable values: {left} vs {right}")]
    IncomparableValues {
        left: &'static str,
        right: &'static str,
    },

    /// A wire event that is not a well-formed trace event
    #[error("trace format error: {0}")]
    TraceFormat(String),

    /// I/O failure while reading a trace
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for likely operations
pub type Result<T> = std::result::Result<T, Error>;
