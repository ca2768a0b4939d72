//! Error types for stepviz-vis.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result type for stepviz-vis operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, driving or serving playback.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value could not be parsed
    #[error("invalid {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Speed tier outside 1..=3
    #[error("speed tier must be 1, 2 or 3 (got {0})")]
    InvalidSpeed(u8),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The playback task has stopped
    #[error("playback driver has shut down")]
    DriverClosed,

    /// A required request field is missing or empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Unknown algorithm id or name
    #[error("Algorithm not found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::MissingField(_) | Error::InvalidSpeed(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DriverClosed => StatusCode::SERVICE_UNAVAILABLE,
            Error::InvalidConfig { .. } | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
