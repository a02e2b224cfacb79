//! Shared dispatch path of both proxies.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{BackendConfig, BackendHandle};
use crate::observability::metrics;
use crate::proxy::client::BackendClient;
use crate::proxy::request::BackendRequest;
use crate::proxy::response::OutboundResponse;
use crate::proxy::sink::{FailureSink, ProxyFailure, TracingSink};

/// Live settings, client and failure sink, shared by every proxy.
#[derive(Clone)]
pub struct Forwarder {
    backend: BackendHandle,
    client: BackendClient,
    sink: Arc<dyn FailureSink>,
}

impl Forwarder {
    /// Forwarder reporting failures through `tracing`.
    pub fn new(backend: BackendHandle, client: BackendClient) -> Self {
        Self {
            backend,
            client,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Backend settings for the request being built.
    pub fn settings(&self) -> Arc<BackendConfig> {
        self.backend.current()
    }

    /// Send `request` once and relay whatever comes back.
    pub async fn forward(
        &self,
        resource: &str,
        request: BackendRequest,
        request_id: Option<&str>,
    ) -> OutboundResponse {
        let start = Instant::now();
        let timeout = Duration::from_secs(self.settings().timeout_secs);

        tracing::debug!(
            request_id = request_id.unwrap_or("unknown"),
            resource = %resource,
            method = %request.method,
            url = %request.url,
            has_body = request.body.is_some(),
            "Forwarding to backend"
        );

        let result = self.client.execute(&request, timeout).await;
        let response = match result {
            Ok(response) => response,
            Err(error) => self.fail(ProxyFailure {
                resource: resource.to_string(),
                method: request.method.clone(),
                url: Some(request.url),
                request_id: request_id.map(str::to_string),
                error,
            }),
        };

        metrics::record_request(resource, request.method.as_str(), response.status.as_u16(), start);
        response
    }

    /// Report a failure and produce the envelope for it.
    pub fn fail(&self, failure: ProxyFailure) -> OutboundResponse {
        metrics::record_failure(failure.error.kind());
        self.sink.record(&failure);
        OutboundResponse::from_error(&failure.error)
    }
}
