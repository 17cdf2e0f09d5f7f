//! Service error types.
//!
//! This module defines the error types that can occur while calling the
//! embedding service or fetching article content.

use thiserror::Error;

/// Errors that can occur during collaborator calls.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The client could not be built from its configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The service answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    StatusError { status: u16, body: String },

    /// The response body could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::HttpError(msg.into())
    }

    /// Create an invalid response error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::StatusError {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => Self::HttpError(err.to_string()),
        }
    }
}
