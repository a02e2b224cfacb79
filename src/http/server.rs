//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router: one route per configured proxy, plus `/healthz`
//! - Wire up middleware (request ID, tracing)
//! - Adapt inbound requests and hand them to the matching proxy
//! - Serve until the shutdown signal fires

use std::io;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::validation::validate_config;
use crate::config::{BackendHandle, ConfigError, GatewayConfig, RouteConfig, RouteKind};
use crate::http::request::{into_inbound, tail_segments, MakeRequestUuid, Rejected, X_REQUEST_ID};
use crate::proxy::{
    BackendClient, BodyPolicy, CollectionProxy, FailureSink, Forwarder, InboundRequest,
    OutboundResponse, PathProxy, PathSegments, TracingSink,
};

/// Errors raised while building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build backend client: {0}")]
    Client(#[from] reqwest::Error),
}

/// The proxy serving one route.
enum RouteProxy {
    Path(PathProxy),
    Collection(CollectionProxy),
}

impl RouteProxy {
    fn body_policy(&self) -> BodyPolicy {
        match self {
            RouteProxy::Path(_) => PathProxy::BODY_POLICY,
            RouteProxy::Collection(_) => CollectionProxy::BODY_POLICY,
        }
    }

    async fn handle(&self, inbound: InboundRequest) -> OutboundResponse {
        match self {
            RouteProxy::Path(proxy) => proxy.handle(inbound).await,
            RouteProxy::Collection(proxy) => proxy.handle(inbound).await,
        }
    }

    fn reject(&self, rejected: Rejected) -> OutboundResponse {
        match self {
            RouteProxy::Path(proxy) => proxy.reject(rejected.method, rejected.request_id, rejected.error),
            RouteProxy::Collection(proxy) => {
                proxy.reject(rejected.method, rejected.request_id, rejected.error)
            }
        }
    }
}

/// State injected into each proxy route.
#[derive(Clone)]
struct RouteState {
    mount: Arc<str>,
    proxy: Arc<RouteProxy>,
    max_body_bytes: usize,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    backend: BackendHandle,
}

impl GatewayServer {
    /// Create a server that reports proxy failures through `tracing`.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a server reporting proxy failures to `sink`.
    ///
    /// The configuration is validated first; routes with bad mounts would
    /// otherwise make the router panic.
    pub fn with_sink(config: GatewayConfig, sink: Arc<dyn FailureSink>) -> Result<Self, ServerError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let backend = BackendHandle::new(config.backend.clone());
        let client = BackendClient::new(&config.backend)?;
        let forwarder = Forwarder::new(backend.clone(), client).with_sink(sink);

        let router = Self::build_router(&config, &forwarder);
        Ok(Self {
            router,
            config,
            backend,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, forwarder: &Forwarder) -> Router {
        let mut router = Router::new().route("/healthz", get(health));

        for route in &config.routes {
            let path = route_path(route);
            let proxy = match route.kind {
                RouteKind::Path => RouteProxy::Path(PathProxy::new(&route.resource, forwarder.clone())),
                RouteKind::Collection => {
                    RouteProxy::Collection(CollectionProxy::new(&route.resource, forwarder.clone()))
                }
            };
            let state = RouteState {
                mount: Arc::from(route.mount.as_str()),
                proxy: Arc::new(proxy),
                max_body_bytes: config.listener.max_body_bytes,
            };

            tracing::info!(path = %path, resource = %route.resource, kind = ?route.kind, "Route mounted");
            router = router.route(&path, any(proxy_handler).with_state(state));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Handle for the live backend settings, for the config watcher.
    pub fn backend(&self) -> BackendHandle {
        self.backend.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_url = %self.backend.current().base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Axum path a route binds: the catch-all below the mount for path proxies,
/// the mount itself for collections.
fn route_path(route: &RouteConfig) -> String {
    match route.kind {
        RouteKind::Path => format!("{}/{{*path}}", route.mount),
        RouteKind::Collection => route.mount.clone(),
    }
}

async fn proxy_handler(State(route): State<RouteState>, request: Request<Body>) -> Response {
    let segments = match route.proxy.as_ref() {
        RouteProxy::Path(_) => tail_segments(request.uri().path(), &route.mount),
        RouteProxy::Collection(_) => PathSegments::default(),
    };

    match into_inbound(request, segments, route.proxy.body_policy(), route.max_body_bytes).await {
        Ok(inbound) => route.proxy.handle(inbound).await.into_response(),
        Err(rejected) => route.proxy.reject(rejected).into_response(),
    }
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
