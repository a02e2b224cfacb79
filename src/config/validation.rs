//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the backend base URL is usable as a URL prefix
//! - Detect conflicting routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{BackendConfig, GatewayConfig, RouteConfig};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("backend.base_url '{url}' is not a valid http(s) URL: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("{field} '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("route mount '{0}' must be a literal path: a leading '/', no trailing '/', no empty segments, no '{{', '}}', '*' or ':'-prefixed segments")]
    InvalidMount(String),

    #[error("route mount '{0}' is reserved")]
    ReservedMount(String),

    #[error("route resource '{0}' must be non-empty and must not contain '/'")]
    InvalidResource(String),

    #[error("duplicate {kind} route mounted at '{mount}'")]
    DuplicateRoute { kind: String, mount: String },
}

/// Validate a full gateway configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(mut backend_errors) = validate_backend(&config.backend) {
        errors.append(&mut backend_errors);
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    validate_routes(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the backend section on its own.
///
/// Used on hot reload, where only this section is swapped in.
pub fn validate_backend(backend: &BackendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&backend.base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(ValidationError::InvalidBaseUrl {
                url: backend.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url) if url.query().is_some() || url.fragment().is_some() => {
            errors.push(ValidationError::InvalidBaseUrl {
                url: backend.base_url.clone(),
                reason: "query and fragment are not allowed".to_string(),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: backend.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if backend.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "backend.timeout_secs",
        });
    }
    if backend.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout {
            field: "backend.connect_timeout_secs",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Paths the gateway serves itself.
const RESERVED_MOUNTS: &[&str] = &["/healthz"];

/// A mount must match request paths byte for byte: the router would read
/// `{..}`, `*` and `:` as captures, and the catch-all tail is cut off the
/// raw path by prefix.
fn is_literal_mount(mount: &str) -> bool {
    let Some(rest) = mount.strip_prefix('/') else {
        return false;
    };
    rest.split('/').all(|segment| {
        !segment.is_empty()
            && !segment.starts_with(':')
            && !segment.contains(['{', '}', '*'])
    })
}

fn validate_routes(routes: &[RouteConfig], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();

    for route in routes {
        if !is_literal_mount(&route.mount) {
            errors.push(ValidationError::InvalidMount(route.mount.clone()));
        } else if RESERVED_MOUNTS.contains(&route.mount.as_str()) {
            errors.push(ValidationError::ReservedMount(route.mount.clone()));
        }
        if route.resource.is_empty() || route.resource.contains('/') {
            errors.push(ValidationError::InvalidResource(route.resource.clone()));
        }
        if !seen.insert((route.kind, route.mount.as_str())) {
            errors.push(ValidationError::DuplicateRoute {
                kind: format!("{:?}", route.kind).to_lowercase(),
                mount: route.mount.clone(),
            });
        }
    }
}
