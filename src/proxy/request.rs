//! Request-scoped types flowing through the proxies.
//!
//! ```text
//! InboundRequest ──(target + BodyPolicy)──▶ BackendRequest ──▶ backend
//! ```

use std::collections::HashMap;

use axum::http::Method;
use serde_json::Value;

/// Ordered path segments taken from a catch-all route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments(Vec<String>);

impl PathSegments {
    /// Split a raw `a/b/c` tail. Leading, trailing and repeated slashes
    /// produce no empty segments.
    pub fn from_tail(tail: &str) -> Self {
        Self(
            tail.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Segments joined with `/`, no leading or trailing slash.
    pub fn joined(&self) -> String {
        self.0.join("/")
    }
}

/// A single value is a one-segment path.
impl From<String> for PathSegments {
    fn from(segment: String) -> Self {
        Self(vec![segment])
    }
}

impl From<&str> for PathSegments {
    fn from(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }
}

impl From<Vec<String>> for PathSegments {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl<const N: usize> From<[&str; N]> for PathSegments {
    fn from(segments: [&str; N]) -> Self {
        Self(segments.iter().map(|s| s.to_string()).collect())
    }
}

/// Request as received from the browser, reduced to what the proxies use.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub segments: PathSegments,
    /// One value per name; repeated names keep the first value.
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    /// Correlation id for logs; never sent to the backend.
    pub request_id: Option<String>,
}

impl InboundRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            segments: PathSegments::default(),
            query: HashMap::new(),
            body: None,
            request_id: None,
        }
    }

    pub fn segments(mut self, segments: impl Into<PathSegments>) -> Self {
        self.segments = segments.into();
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.entry(name.into()).or_insert_with(|| value.into());
        self
    }

    /// Replace the query mapping with the parameters of a raw query string.
    pub fn query_str(mut self, raw: &str) -> Self {
        self.query = parse_query(raw);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        params
            .entry(name.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Which inbound requests carry their body through to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyPolicy {
    /// POST and PUT forward a body.
    PostOrPut,
    /// Only POST forwards a body.
    PostOnly,
}

impl BodyPolicy {
    /// Whether a request with this method may forward a body at all.
    pub fn accepts(&self, method: &Method) -> bool {
        match self {
            BodyPolicy::PostOrPut => *method == Method::POST || *method == Method::PUT,
            BodyPolicy::PostOnly => *method == Method::POST,
        }
    }

    /// The body to send upstream, if any.
    ///
    /// Only non-empty JSON objects are forwarded; `{}`, arrays, scalars and
    /// an absent body are all dropped.
    pub fn outbound_body(&self, method: &Method, body: Option<&Value>) -> Option<Value> {
        if !self.accepts(method) {
            return None;
        }
        match body {
            Some(Value::Object(fields)) if !fields.is_empty() => body.cloned(),
            _ => None,
        }
    }
}

/// The call the gateway makes to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}
