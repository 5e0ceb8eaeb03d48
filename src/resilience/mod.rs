//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Source request:
//!     → executor.rs (attempt loop)
//!         → backoff.rs (delay before each attempt, full jitter, capped)
//!         → proxy rotator (egress for this attempt)
//!         → transport (per-request timeout)
//!     → On failure: retries.rs (retryable or unrecoverable?)
//! ```
//!
//! # Design Decisions
//! - Every request has a timeout; every call has an overall deadline
//! - Backoff applies before the first attempt too, spreading out
//!   sources launched at the same instant
//! - Unrecoverable errors end the attempt loop immediately

pub mod backoff;
pub mod executor;
pub mod retries;

pub use executor::ResilientExecutor;
pub use retries::RetryPolicy;
