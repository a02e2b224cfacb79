//! Query-aware collection proxy.
//!
//! Forwards requests against a fixed collection to `<root>?<query>`, keeping
//! only the recognized query parameters; a body is forwarded for POST only.

use axum::http::Method;

use crate::proxy::error::ProxyError;
use crate::proxy::forward::Forwarder;
use crate::proxy::query::CollectionQuery;
use crate::proxy::request::{BackendRequest, BodyPolicy, InboundRequest};
use crate::proxy::resolver::BackendTarget;
use crate::proxy::response::OutboundResponse;
use crate::proxy::sink::ProxyFailure;

/// Proxy for one backend collection resource.
#[derive(Clone)]
pub struct CollectionProxy {
    resource: String,
    forwarder: Forwarder,
}

impl CollectionProxy {
    pub const BODY_POLICY: BodyPolicy = BodyPolicy::PostOnly;

    pub fn new(resource: impl Into<String>, forwarder: Forwarder) -> Self {
        Self {
            resource: resource.into(),
            forwarder,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn target(&self, query: &CollectionQuery) -> BackendTarget {
        let settings = self.forwarder.settings();
        BackendTarget::root(&settings.base_url, &self.resource).with_query(query.to_query_string())
    }

    pub fn build_request(&self, inbound: &InboundRequest) -> BackendRequest {
        let query = CollectionQuery::from_params(&inbound.query);
        BackendRequest {
            method: inbound.method.clone(),
            url: self.target(&query).url,
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
