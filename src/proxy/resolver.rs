//! Backend URL resolution.
//!
//! The configured base may be a bare host (`http://localhost:4000`) or a host
//! that already includes the `/api` mount point (`http://h/api`). Resolution
//! must produce exactly one `/api` segment either way.

use crate::proxy::request::PathSegments;

/// Mount point the backend serves its resources under.
const API_MOUNT: &str = "/api";

/// Where one request goes on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    pub base_url: String,
    pub resource: String,
    /// Full URL: resolved root plus optional trailing path and query.
    pub url: String,
}

impl BackendTarget {
    /// Target pointing at the resource root.
    pub fn root(base_url: &str, resource: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            resource: resource.to_string(),
            url: resolve_root(base_url, resource),
        }
    }

    /// Append `/` and the joined segments, even when there are none.
    pub fn with_segments(mut self, segments: &PathSegments) -> Self {
        self.url.push('/');
        self.url.push_str(&segments.joined());
        self
    }

    /// Append `?query` when a query string is given.
    pub fn with_query(mut self, query: Option<String>) -> Self {
        if let Some(query) = query {
            self.url.push('?');
            self.url.push_str(&query);
        }
        self
    }
}

/// Root URL of `resource` on the backend at `base`.
///
/// A single trailing `/` on the base is ignored.
pub fn resolve_root(base: &str, resource: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);

    if base.ends_with(API_MOUNT) {
        format!("{}/{}", base, resource)
    } else {
        format!("{}{}/{}", base, API_MOUNT, resource)
    }
}
