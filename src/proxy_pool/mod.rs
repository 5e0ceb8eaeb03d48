//! Proxy pool subsystem.
//!
//! # Data Flow
//! ```text
//! Config proxies
//!     → endpoint.rs (ProxyEndpoint + optional ProxyAuth)
//!     → rotator.rs (round-robin cursor under a mutex)
//!     → executor asks for next() once per attempt
//!     → NoProxyConfigured means "connect directly"
//! ```
//!
//! # Design Decisions
//! - Pool is immutable after construction; only the cursor moves
//! - Every call advances the cursor exactly once, even under contention
//! - An empty pool is a valid configuration, never an error for the caller

pub mod endpoint;
pub mod rotator;

pub use endpoint::{ProxyAuth, ProxyEndpoint};
pub use rotator::{NoProxyConfigured, ProxyRotator};
