//! Backend API gateway library.
//!
//! Browser-facing handlers that forward requests to a separate backend API
//! and relay its answers unchanged, except for one normalized 500 envelope
//! when the gateway itself fails.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
