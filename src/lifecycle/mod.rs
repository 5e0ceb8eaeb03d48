//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → every subscribed enumeration aborts its source tasks
//!             → enumerate returns Cancelled
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
