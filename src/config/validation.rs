//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: (config, registry) → Result<(), Vec<ValidationError>>
//! - Runs before any network activity

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::EnumeratorConfig;
use crate::sources::SourceRegistry;

const PROXY_PROTOCOLS: &[&str] = &["http", "https", "socks5"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("deadline_secs must be greater than zero")]
    ZeroDeadline,

    #[error("proxy '{url}': invalid URL: {reason}")]
    InvalidProxyUrl { url: String, reason: String },

    #[error("proxy '{url}': unsupported protocol '{protocol}'")]
    UnsupportedProxyProtocol { url: String, protocol: String },

    #[error("proxy '{url}': URL scheme does not match declared protocol '{protocol}'")]
    ProxyProtocolMismatch { url: String, protocol: String },

    #[error("proxy '{url}': username and password must be set together")]
    IncompleteProxyCredentials { url: String },

    #[error("unknown source '{0}'")]
    UnknownSource(String),

    #[error("{0}")]
    InvalidSource(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("invalid metrics address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check `config` against itself and the sources it may select from.
pub fn validate_config(config: &EnumeratorConfig, registry: &SourceRegistry) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.deadline_secs == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }

    for proxy in &config.proxies {
        let protocol = proxy.protocol.to_ascii_lowercase();
        if !PROXY_PROTOCOLS.contains(&protocol.as_str()) {
            errors.push(ValidationError::UnsupportedProxyProtocol {
                url: proxy.url.clone(),
                protocol: proxy.protocol.clone(),
            });
        }

        match Url::parse(&proxy.url) {
            Ok(url) if url.host_str().is_none() => errors.push(ValidationError::InvalidProxyUrl {
                url: proxy.url.clone(),
                reason: "missing host".to_string(),
            }),
            Ok(url) if url.scheme() != protocol && PROXY_PROTOCOLS.contains(&protocol.as_str()) => {
                errors.push(ValidationError::ProxyProtocolMismatch {
                    url: proxy.url.clone(),
                    protocol: proxy.protocol.clone(),
                })
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::InvalidProxyUrl {
                url: proxy.url.clone(),
                reason: e.to_string(),
            }),
        }

        if proxy.username.is_some() != proxy.password.is_some() {
            errors.push(ValidationError::IncompleteProxyCredentials { url: proxy.url.clone() });
        }
    }

    for name in &config.sources {
        if !registry.contains(name) {
            errors.push(ValidationError::UnknownSource(name.clone()));
        }
    }

    for problem in registry.problems() {
        errors.push(ValidationError::InvalidSource(problem));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
