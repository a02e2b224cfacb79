//! Backend proxying subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (method, segments, query, body)
//!     → path.rs / collection.rs (pick segments or recognized query)
//!     → resolver.rs (base URL + conditional /api + resource)
//!     → request.rs (BodyPolicy decides the outbound body)
//!     → forward.rs → client.rs (one call, bounded by a timeout)
//!     → OutboundResponse (backend status + JSON body, verbatim)
//!
//! On transport, timeout or parse failure:
//!     → sink.rs (report) → 500 { error, message } envelope
//! ```
//!
//! # Design Decisions
//! - Request-scoped: nothing is cached between requests
//! - Backend error statuses are relayed, never wrapped
//! - No retries; one failed attempt is the answer

pub mod client;
pub mod collection;
pub mod error;
pub mod forward;
pub mod path;
pub mod query;
pub mod request;
pub mod resolver;
pub mod response;
pub mod sink;

pub use client::BackendClient;
pub use collection::CollectionProxy;
pub use error::{ErrorEnvelope, ProxyError};
pub use forward::Forwarder;
pub use path::PathProxy;
pub use query::CollectionQuery;
pub use request::{BackendRequest, BodyPolicy, InboundRequest, PathSegments};
pub use resolver::{resolve_root, BackendTarget};
pub use response::OutboundResponse;
pub use sink::{FailureSink, ProxyFailure, RecordingSink, TracingSink};
