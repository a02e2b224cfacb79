//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! proxies and http layer produce:
//!     → logging.rs (structured events, request id on every failure)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty, compact or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
