//! Distance matrix error types

use thiserror::Error;

use crate::options::TravelMode;

/// Errors that can occur while executing a distance matrix query
#[derive(Debug, Error)]
pub enum DistanceMatrixError {
    /// The request has no origins
    #[error("Request must contain at least one origin")]
    MissingOrigins,

    /// The request has no destinations
    #[error("Request must contain at least one destination")]
    MissingDestinations,

    /// Both departure and arrival time were given
    #[error("Departure time and arrival time are mutually exclusive")]
    ConflictingTimeParameters,

    /// A modifier was set that the travel mode does not accept
    #[error("{modifier} is not valid for travel mode {mode}")]
    InvalidModifierForMode {
        /// Wire name of the offending parameter
        modifier: &'static str,
        /// Effective travel mode of the request
        mode: TravelMode,
    },

    /// The call was cancelled before it completed
    #[error("Request cancelled")]
    Cancelled,

    /// Client setup or credentials are unusable
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The HTTP exchange failed or returned a non-2xx status
    #[error("Transport error{}: {body}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    TransportError {
        /// HTTP status, `None` when no response was received
        status: Option<u16>,
        /// Response body snippet or transport failure description
        body: String,
    },

    /// The service rejected the whole request
    #[error("Service returned status {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    ServiceError {
        /// Top-level status string, e.g. `INVALID_REQUEST`
        status: String,
        /// Optional `error_message` supplied by the service
        message: Option<String>,
    },

    /// The response body did not have the expected shape
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl DistanceMatrixError {
    /// Returns true if the request was rejected before any network I/O
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingOrigins
                | Self::MissingDestinations
                | Self::ConflictingTimeParameters
                | Self::InvalidModifierForMode { .. }
        )
    }

    /// Returns true if re-issuing the same request may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportError { status: None, .. } => true,
            Self::TransportError {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            Self::ServiceError { status, .. } => {
                matches!(status.as_str(), "OVER_QUERY_LIMIT" | "UNKNOWN_ERROR")
            },
            _ => false,
        }
    }
}
