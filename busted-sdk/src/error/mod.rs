//! Error handling for the busted SDK
//!
//! Every failure of an HTTP call is normalized into a single `ClientError`
//! that carries a human-readable message and, when a response was received,
//! the numeric HTTP status. Callers that only need to show something to the
//! user read `message()`; the variants exist for logging and for library
//! callers that want to branch on the failure kind.

use thiserror::Error;

pub mod mapping;

/// Result type for busted SDK operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for the busted SDK
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// The request never produced a response (DNS, connection refused, timeout)
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered with a success status but the body was unusable
    #[error("Decode error: {message}")]
    Decode { status: Option<u16>, message: String },

    /// The request could not be built (body serialization, invalid URL)
    #[error("Request error: {0}")]
    Request(String),

    /// Invalid configuration or client construction failure
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        ClientError::Transport {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        ClientError::Http {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(status: Option<u16>, message: impl Into<String>) -> Self {
        ClientError::Decode {
            status,
            message: message.into(),
        }
    }

    /// Create a request construction error
    pub fn request(message: impl Into<String>) -> Self {
        ClientError::Request(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ClientError::Configuration(message.into())
    }

    /// The bare message, without the kind prefix used by `Display`
    pub fn message(&self) -> &str {
        match self {
            ClientError::Transport { message }
            | ClientError::Http { message, .. }
            | ClientError::Decode { message, .. } => message,
            ClientError::Request(message) | ClientError::Configuration(message) => message,
        }
    }

    /// The HTTP status code if a response was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Decode { status, .. } => *status,
            _ => None,
        }
    }

    /// Short name of the failure kind, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport { .. } => "transport",
            ClientError::Http { .. } => "http",
            ClientError::Decode { .. } => "decode",
            ClientError::Request(_) => "request",
            ClientError::Configuration(_) => "configuration",
        }
    }

    /// Check if the server was never reached
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

/// Convert reqwest errors raised before a status was received
impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            ClientError::transport(format!("Connection error: {}", err))
        } else if err.is_builder() {
            ClientError::request(format!("Invalid request: {}", err))
        } else if err.is_decode() || err.is_body() {
            ClientError::decode(
                err.status().map(|s| s.as_u16()),
                format!("Response decode error: {}", err),
            )
        } else {
            ClientError::transport(format!("HTTP client error: {}", err))
        }
    }
}

/// Convert serde_json errors raised while building a request body
impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::request(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::request(format!("Invalid URL: {}", err))
    }
}
