//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(String),

    /// The applied-versions query itself failed. Nothing can be applied
    /// safely without knowing the remote state.
    #[error("Failed to fetch applied versions (HTTP {status}): {body}")]
    FetchApplied { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Http(format!("request timed out: {}", error))
        } else if error.is_connect() {
            Self::Http(format!("unable to connect to the Management API: {}", error))
        } else {
            Self::Http(error.to_string())
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_applied_message_includes_body() {
        let err = Error::FetchApplied {
            status: 401,
            body: r#"{"message":"JWT expired"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("HTTP 401"));
        assert!(msg.contains("JWT expired"));
    }

    #[test]
    fn test_helper_constructors() {
        assert!(Error::config("missing token").to_string().starts_with("Configuration error"));
        assert!(Error::validation("bad name").to_string().starts_with("Validation error"));
        assert!(Error::http("refused").to_string().starts_with("HTTP error"));
    }
}
