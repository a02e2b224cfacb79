//! Path-segment proxy.
//!
//! Forwards catch-all requests to `<root>/<segments>`, method verbatim,
//! query parameters dropped, body forwarded for POST and PUT.

use axum::http::Method;

use crate::proxy::error::ProxyError;
use crate::proxy::forward::Forwarder;
use crate::proxy::request::{BackendRequest, BodyPolicy, InboundRequest, PathSegments};
use crate::proxy::resolver::BackendTarget;
use crate::proxy::response::OutboundResponse;
use crate::proxy::sink::ProxyFailure;

/// Proxy for one backend resource addressed by trailing path segments.
#[derive(Clone)]
pub struct PathProxy {
    resource: String,
    forwarder: Forwarder,
}

impl PathProxy {
    pub const BODY_POLICY: BodyPolicy = BodyPolicy::PostOrPut;

    pub fn new(resource: impl Into<String>, forwarder: Forwarder) -> Self {
        Self {
            resource: resource.into(),
            forwarder,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Backend location of `segments`, resolved against the current base URL.
    pub fn target(&self, segments: &PathSegments) -> BackendTarget {
        let settings = self.forwarder.settings();
        BackendTarget::root(&settings.base_url, &self.resource).with_segments(segments)
    }

    pub fn build_request(&self, inbound: &InboundRequest) -> BackendRequest {
        BackendRequest {
            method: inbound.method.clone(),
            url: self.target(&inbound.segments).url,
            body: Self::BODY_POLICY.outbound_body(&inbound.method, inbound.body.as_ref()),
        }
    }

    pub async fn handle(&self, inbound: InboundRequest) -> OutboundResponse {
        let request = self.build_request(&inbound);
        self.forwarder
            .forward(&self.resource, request, inbound.request_id.as_deref())
            .await
    }

    /// Answer a request that failed before it could be forwarded.
    pub fn reject(&self, method: Method, request_id: Option<String>, error: ProxyError) -> OutboundResponse {
        self.forwarder.fail(ProxyFailure {
            resource: self.resource.clone(),
            method,
            url: None,
            request_id,
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, BackendHandle};
    use crate::proxy::client::BackendClient;
    use crate::proxy::sink::RecordingSink;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    fn proxy(base_url: &str, sink: RecordingSink) -> PathProxy {
        let backend = BackendConfig {
            base_url: base_url.into(),
            ..BackendConfig::default()
        };
        let client = BackendClient::new(&backend).unwrap();
        let forwarder = Forwarder::new(BackendHandle::new(backend), client).with_sink(Arc::new(sink));
        PathProxy::new("templates", forwarder)
    }

    #[test]
    fn test_url_is_root_plus_joined_segments() {
        let proxy = proxy("http://localhost:4000", RecordingSink::new());
        for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let request = proxy.build_request(&InboundRequest::new(method.clone()).segments(["42", "preview"]));
            assert_eq!(request.url, "http://localhost:4000/api/templates/42/preview");
            assert_eq!(request.method, method);
        }
    }

    #[test]
    fn test_query_not_forwarded() {
        let proxy = proxy("http://api.example.com/api", RecordingSink::new());
        let request = proxy.build_request(
            &InboundRequest::new(Method::GET)
                .segments("42")
                .query_param("search", "x"),
        );
        assert_eq!(request.url, "http://api.example.com/api/templates/42");
    }

    #[test]
    fn test_body_rules() {
        let proxy = proxy("http://localhost:4000", RecordingSink::new());
        let body = json!({"name": "Welcome", "content": {"subject": "Hi"}});

        let put = proxy.build_request(&InboundRequest::new(Method::PUT).segments("1").body(body.clone()));
        assert_eq!(put.body, Some(body.clone()));

        let empty = proxy.build_request(&InboundRequest::new(Method::POST).segments("1").body(json!({})));
        assert_eq!(empty.body, None);

        let delete = proxy.build_request(&InboundRequest::new(Method::DELETE).segments("1").body(body));
        assert_eq!(delete.body, None);
    }

    #[test]
    fn test_reject_reports_and_envelopes() {
        let sink = RecordingSink::new();
        let proxy = proxy("http://localhost:4000", sink.clone());

        let response = proxy.reject(
            Method::POST,
            Some("req-1".into()),
            ProxyError::InvalidRequestBody("expected value at line 1 column 1".into()),
        );

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body,
            Some(json!({
                "error": "Internal server error",
                "message": "expected value at line 1 column 1"
            }))
        );

        let failures = sink.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].resource, "templates");
        assert_eq!(failures[0].request_id.as_deref(), Some("req-1"));
        assert_eq!(failures[0].url, None);
    }
}
