//! Inbound request adaptation.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the caller sent none
//! - Take catch-all segments from the raw, still-encoded path
//! - Read and parse the body only when it may be forwarded

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Method, Request};
use serde_json::Value;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::proxy::{BodyPolicy, InboundRequest, PathSegments, ProxyError};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Segments after `mount` in the raw request path.
pub fn tail_segments(path: &str, mount: &str) -> PathSegments {
    PathSegments::from_tail(path.strip_prefix(mount).unwrap_or_default())
}

/// A request that failed before it could be forwarded.
#[derive(Debug)]
pub struct Rejected {
    pub method: Method,
    pub request_id: Option<String>,
    pub error: ProxyError,
}

/// Turn an axum request into an [`InboundRequest`].
///
/// The body is only read when `policy` lets this method forward one; a body
/// that cannot be read or is not JSON is rejected.
pub async fn into_inbound(
    request: Request<Body>,
    segments: PathSegments,
    policy: BodyPolicy,
    max_body_bytes: usize,
) -> Result<InboundRequest, Rejected> {
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers);

    let mut inbound = InboundRequest::new(parts.method).segments(segments);
    inbound.request_id = request_id;
    if let Some(query) = parts.uri.query() {
        inbound = inbound.query_str(query);
    }

    if policy.accepts(&inbound.method) {
        match read_json_body(body, max_body_bytes).await {
            Ok(body) => inbound.body = body,
            Err(error) => {
                return Err(Rejected {
                    method: inbound.method,
                    request_id: inbound.request_id,
                    error,
                })
            }
        }
    }

    Ok(inbound)
}

async fn read_json_body(body: Body, limit: usize) -> Result<Option<Value>, ProxyError> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|e| ProxyError::InvalidRequestBody(format!("failed to read request body: {}", e)))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ProxyError::InvalidRequestBody(e.to_string()))
}
