//! Data source subsystem.
//!
//! # Data Flow
//! ```text
//! SourceRegistry (explicit value, no globals)
//!     → SourceDescriptor per source
//!         → request template + headers + timeout + retry policy
//!         → ParseStrategy
//!             - crtsh.rs (JSON records, `common_name`)
//!             - hackertarget.rs (`host,ip` lines)
//! ```
//!
//! # Design Decisions
//! - Strategies are a closed enum dispatching to pure functions
//! - Parsers collapse duplicates and skip incomplete records
//! - Empty bodies parse to empty sets; unparseable bodies are errors

pub mod crtsh;
pub mod hackertarget;
pub mod registry;
pub mod strategy;

pub use registry::{SourceDescriptor, SourceRegistry, UnknownSource};
pub use strategy::ParseStrategy;
