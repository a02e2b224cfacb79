//! HTTP client for backend calls.
//!
//! # Responsibilities
//! - Dispatch one request per inbound request (no retries)
//! - Always send `Content-Type: application/json`
//! - Read the whole backend body and parse it as JSON
//! - Relay an empty body only for statuses that never carry one
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by every route
//! - The total timeout is applied per call from the live settings, so a
//!   reloaded value takes effect on the next request
//! - The connect timeout is fixed when the client is built

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;

use crate::config::BackendConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::request::BackendRequest;
use crate::proxy::response::OutboundResponse;

/// Shared backend client.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }

    /// Execute `request` once.
    ///
    /// Any status the backend returns is a success here; only transport,
    /// timeout and body failures are errors.
    pub async fn execute(
        &self,
        request: &BackendRequest,
        timeout: Duration,
    ) -> Result<OutboundResponse, ProxyError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout);

        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ProxyError::InvalidRequestBody(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            if is_bodiless(status) {
                return Ok(OutboundResponse::relayed(status, None));
            }
            return Err(ProxyError::MalformedBackendResponse(format!(
                "backend answered {} with an empty body",
                status
            )));
        }

        let body = serde_json::from_slice(&bytes)
            .map_err(|e| ProxyError::MalformedBackendResponse(e.to_string()))?;
        Ok(OutboundResponse::relayed(status, Some(body)))
    }
}

/// Statuses whose responses carry no content.
fn is_bodiless(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
    )
}
