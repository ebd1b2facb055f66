//! Error types for the InfraPilot client library.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for plan requests, configuration and client setup.
#[derive(Error, Debug)]
pub enum PilotError {
    /// The plan endpoint answered with a non-success status
    #[error("Failed to process agent request: {message}")]
    PlanRequest { status: Option<u16>, message: String },
    /// The plan endpoint answered successfully with an unusable body
    #[error("Invalid plan response: {reason}")]
    InvalidResponse { reason: String },
    /// The normalized plan violates a plan invariant
    #[error("Invalid execution plan: {reason}")]
    InvalidPlan { reason: String },
    /// Transport-level HTTP errors
    #[error("HTTP error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// The execution task could not be joined
    #[error("Task join error: {message}")]
    TaskJoin { message: String },
}

/// Builder for creating plan request errors.
pub struct PlanRequestErrorBuilder {
    status: Option<u16>,
}

impl PlanRequestErrorBuilder {
    /// Create a new plan request error builder for an HTTP status.
    pub fn new(status: Option<u16>) -> Self {
        Self { status }
    }

    /// Build the error with the given diagnostic text.
    pub fn with_message(self, message: impl Into<String>) -> PilotError {
        PilotError::PlanRequest {
            status: self.status,
            message: message.into(),
        }
    }
}

impl PilotError {
    /// Creates a builder for plan request errors.
    pub fn plan_request(status: Option<u16>) -> PlanRequestErrorBuilder {
        PlanRequestErrorBuilder::new(status)
    }

    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new invalid response error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }
}

/// Failure of a single execution attempt, delivered through the event stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// No token or identity could be obtained before opening the stream
    #[error("Failed to get authentication token: {0}")]
    Auth(String),
    /// Connection-level failure during the stream's lifetime
    #[error("Execution stream failed: {0}")]
    Transport(String),
    /// An inbound frame could not be understood
    #[error("Failed to parse execution stream message: {0}")]
    Protocol(String),
    /// A structured `error` event sent by the backend
    #[error("{0}")]
    Backend(String),
    /// The stream closed before any terminal event
    #[error("Connection closed unexpectedly.")]
    UnexpectedClose,
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, PilotError>;
