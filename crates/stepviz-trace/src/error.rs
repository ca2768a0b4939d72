//! Error types for stepviz-trace.

use thiserror::Error;

/// Result type for stepviz-trace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a step trace.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No dedicated simulator is registered for this algorithm id.
    ///
    /// Callers recover with the generic trace from `simulate_or_fallback`.
    #[error("no simulator registered for algorithm '{id}'")]
    UnsupportedAlgorithm { id: String },
}
