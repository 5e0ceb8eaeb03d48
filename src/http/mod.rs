//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! SourceDescriptor + domain
//!     → request.rs (interpolate URL template, validate method/headers)
//!     → transport.rs (one attempt via reqwest, direct or proxied)
//!     → RawResponse { status, body }
//! ```
//!
//! # Design Decisions
//! - Request construction errors surface before any network I/O
//! - The transport is a trait so the retry loop can be driven by fakes

pub mod request;
pub mod transport;

pub use request::SourceRequest;
pub use transport::{HttpTransport, RawResponse, Transport, TransportSettings};
