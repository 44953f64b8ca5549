//! Error types and handling for the `tripwindow` service

use thiserror::Error;

/// Main error type for the `tripwindow` service
#[derive(Error, Debug)]
pub enum TripError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Request message parsing and validation errors
    #[error("Invalid message: {message}")]
    Parse { message: String },

    /// Persistence-layer failures on closure/traffic queries
    #[error("Store error: {message}")]
    Store { message: String },

    /// The search horizon contained no candidate window
    #[error("No suitable window found")]
    NoWindow,
}

impl TripError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// True for errors caused by the client's request
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, TripError::Parse { .. })
    }
}
