//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Base URL used when neither the config file nor the environment names one.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4000";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend API settings.
    pub backend: BackendConfig,

    /// Proxy routes exposed on the inbound surface.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backend: BackendConfig::default(),
            routes: default_routes(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Largest inbound body read for forwarding, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Backend API configuration.
///
/// This is the only section that can change while the gateway runs,
/// except for `connect_timeout_secs`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, with or without the `/api` mount point.
    pub base_url: String,

    /// Total time allowed for one backend call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    ///
    /// Fixed when the client is built; not picked up on reload.
    pub connect_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Which proxy variant serves a route.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Catch-all sub-path forwarding (`<mount>/{*path}`).
    Path,
    /// Fixed collection path with whitelisted query parameters.
    Collection,
}

/// A single inbound route bound to a backend resource.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Proxy variant.
    pub kind: RouteKind,

    /// Inbound path the route is mounted on (e.g. "/api/templates").
    pub mount: String,

    /// Backend resource name (e.g. "templates").
    pub resource: String,
}

impl RouteConfig {
    pub fn path(mount: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            kind: RouteKind::Path,
            mount: mount.into(),
            resource: resource.into(),
        }
    }

    pub fn collection(mount: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            kind: RouteKind::Collection,
            mount: mount.into(),
            resource: resource.into(),
        }
    }
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::collection("/api/custom-variables", "custom-variables"),
        RouteConfig::path("/api/custom-variables", "custom-variables"),
        RouteConfig::path("/api/templates", "templates"),
    ]
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format (pretty, json, compact).
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
