//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured tracing events, one span per enumeration)
//!     → metrics.rs (per-source counters and histograms)
//!
//! Consumers:
//!     → stderr (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Every enumeration span carries a UUID run id for correlation
//! - Metrics are recorded unconditionally; export is opt-in

pub mod logging;
pub mod metrics;
