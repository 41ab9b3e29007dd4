//! Error types for the client invocation path.

use parley_json_rpc::ErrorObject;
use thiserror::Error;

/// Result type for client calls
pub type ClientResult<T> = Result<T, RequestError>;

/// An opaque transporter failure. The engine never inspects it beyond the
/// message and source; every transporter failure maps to the Request
/// Failure wire error.
#[derive(Debug, Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// The single failure kind a caller sees from a client call, always
/// carrying the wire error - either the server's own, or a locally
/// synthesized one (Request Failure, Convert-*-Failure).
#[derive(Debug, Error)]
#[error("[{}] {}", .error.code, .error.message)]
pub struct RequestError {
    error: ErrorObject,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RequestError {
    pub fn new(error: ErrorObject) -> Self {
        Self {
            error,
            source: None,
        }
    }

    pub fn with_source(
        error: ErrorObject,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            error,
            source: Some(Box::new(source)),
        }
    }

    /// The wire error behind this failure.
    pub fn error(&self) -> &ErrorObject {
        &self.error
    }

    pub fn code(&self) -> i64 {
        self.error.code
    }

    pub fn into_error(self) -> ErrorObject {
        self.error
    }
}
