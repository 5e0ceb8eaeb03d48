//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks against the source registry)
//!     → EnumeratorConfig (validated, immutable)
//!     → proxies, transport settings and enabled sources handed to the
//!       Enumerator at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::EnumeratorConfig;
pub use schema::HttpConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
pub use validation::{validate_config, ValidationError};
