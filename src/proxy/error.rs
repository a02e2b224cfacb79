//! Proxy-level failures and the error envelope they collapse to.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `error` field of every envelope the gateway emits itself.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Failures raised by the gateway itself, as opposed to error responses
/// returned by the backend (those are relayed, not wrapped).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProxyError {
    /// DNS, connect or transport failure while dispatching.
    #[error("{0}")]
    BackendUnreachable(String),

    /// The backend call exceeded the configured timeout.
    #[error("{0}")]
    BackendTimeout(String),

    /// The backend answered with a body that is not JSON.
    #[error("{0}")]
    MalformedBackendResponse(String),

    /// The inbound body had to be forwarded but is not JSON.
    #[error("{0}")]
    InvalidRequestBody(String),
}

impl ProxyError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::BackendUnreachable(_) => "backend_unreachable",
            ProxyError::BackendTimeout(_) => "backend_timeout",
            ProxyError::MalformedBackendResponse(_) => "malformed_backend_response",
            ProxyError::InvalidRequestBody(_) => "invalid_request_body",
        }
    }

    /// Every kind is reported to the caller the same way.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: INTERNAL_ERROR.to_string(),
            message: self.to_string(),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        let description = describe(&e);
        if e.is_timeout() {
            ProxyError::BackendTimeout(description)
        } else if e.is_decode() || e.is_body() {
            ProxyError::MalformedBackendResponse(description)
        } else {
            ProxyError::BackendUnreachable(description)
        }
    }
}

/// Flatten an error and its sources into one line.
///
/// reqwest's own Display stops at "error sending request"; the useful part
/// (e.g. "Connection refused") lives further down the chain.
fn describe(e: &(dyn std::error::Error + 'static)) -> String {
    let mut description = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}

/// Body of a gateway-generated 500.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
}
