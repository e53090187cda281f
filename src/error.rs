//! Error handling for the QuickHands sync client

use std::fmt;
use thiserror::Error;

/// Unified error type for the QuickHands sync client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The server answered with a non-2xx status or `success: false`
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The token source has not become callable yet
    #[error("Authentication not ready")]
    AuthNotReady,

    /// The token provider failed to issue a token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Client-side validation rejected the input before any request
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The message a screen would show for this error.
    ///
    /// Server-reported failures surface the server's own text; everything
    /// else falls back to the `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } if message.is_empty() => {
                "Request was not successful".to_string()
            }
            Error::Api { message, .. } => message.clone(),
            Error::AuthNotReady => "Authentication not ready. Please refresh the page.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_user_message_is_server_text() {
        let err = Error::api(500, "Database unavailable");
        assert_eq!(err.user_message(), "Database unavailable");
        assert_eq!(err.to_string(), "API error (500): Database unavailable");
    }

    #[test]
    fn api_error_without_text_has_generic_user_message() {
        assert_eq!(Error::api(200, "").user_message(), "Request was not successful");
    }

    #[test]
    fn auth_not_ready_user_message() {
        assert_eq!(
            Error::AuthNotReady.user_message(),
            "Authentication not ready. Please refresh the page."
        );
    }
}
