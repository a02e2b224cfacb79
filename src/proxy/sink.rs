//! Where proxy failures are reported.
//!
//! Reporting is fire-and-forget: a sink cannot fail the request and nothing
//! is retried.

use std::sync::{Arc, Mutex};

use axum::http::Method;

use crate::proxy::error::ProxyError;

/// One failed proxy call, with enough context to find it in the logs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyFailure {
    pub resource: String,
    pub method: Method,
    /// Backend URL, when the failure happened after it was computed.
    pub url: Option<String>,
    pub request_id: Option<String>,
    pub error: ProxyError,
}

/// Receives every failure the proxies turn into an error envelope.
pub trait FailureSink: Send + Sync {
    fn record(&self, failure: &ProxyFailure);
}

/// Default sink: one structured `error` event per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record(&self, failure: &ProxyFailure) {
        tracing::error!(
            request_id = failure.request_id.as_deref().unwrap_or("unknown"),
            resource = %failure.resource,
            method = %failure.method,
            url = failure.url.as_deref().unwrap_or(""),
            kind = failure.error.kind(),
            error = %failure.error,
            "Backend proxy failure"
        );
    }
}

/// Sink that keeps failures in memory, for tests and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    failures: Arc<Mutex<Vec<ProxyFailure>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Failures recorded so far, oldest first.
    pub fn failures(&self) -> Vec<ProxyFailure> {
        match self.failures.lock() {
            Ok(failures) => failures.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl FailureSink for RecordingSink {
    fn record(&self, failure: &ProxyFailure) {
        match self.failures.lock() {
            Ok(mut failures) => failures.push(failure.clone()),
            Err(poisoned) => poisoned.into_inner().push(failure.clone()),
        }
    }
}
