//! Subdomain enumeration over certificate-transparency and OSINT sources.

pub mod config;
pub mod enumeration;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy_pool;
pub mod resilience;
pub mod sources;

pub use config::EnumeratorConfig;
pub use enumeration::{enumerate, Enumeration, Enumerator};
pub use error::{EnumerationError, FetchError, ParseError, SourceError};
pub use lifecycle::Shutdown;
pub use sources::{SourceDescriptor, SourceRegistry};
