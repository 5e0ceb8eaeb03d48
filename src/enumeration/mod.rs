//! Enumeration subsystem.
//!
//! # Data Flow
//! ```text
//! enumerate(domain)
//!     → orchestrator.rs spawns one task per SourceDescriptor
//!         → SourceRequest::build → ResilientExecutor → ParseStrategy
//!         → success: results.rs merge under the aggregation lock
//!         → failure: error_sink.rs (observer logs + collects)
//!     → all tasks joined (or deadline/cancel aborts them)
//!     → Enumeration { subdomains, errors }
//! ```
//!
//! # Design Decisions
//! - Structured concurrency: no task outlives the call
//! - Per-source errors never unwind the orchestrator
//! - Result ordering is not meaningful; output is sorted for display

pub mod error_sink;
pub mod orchestrator;
pub mod results;

pub use orchestrator::{enumerate, Enumeration, Enumerator, DEFAULT_DEADLINE};
pub use results::ResultSet;
