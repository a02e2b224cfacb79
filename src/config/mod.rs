//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + API_URL
//!     → loader.rs (parse, deserialize, environment override)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → backend section published through live.rs (BackendHandle)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the backend section
//!     → next request resolves against the new base URL
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only the backend section is reloadable

pub mod live;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use live::BackendHandle;
pub use loader::{load_config, ConfigError};
pub use schema::{BackendConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RouteConfig, RouteKind};
