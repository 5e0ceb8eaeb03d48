//! Per-source request construction.

use std::time::Duration;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::error::FetchError;
use crate::sources::SourceDescriptor;

/// Placeholder replaced by the target domain in URL templates.
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// A fully built request for one source and one domain.
#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub source_name: String,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

impl SourceRequest {
    /// Interpolate `domain` into the descriptor's template and attach its headers.
    pub fn build(descriptor: &SourceDescriptor, domain: &str) -> Result<Self, FetchError> {
        let raw_url = descriptor.url_template.replacen(DOMAIN_PLACEHOLDER, domain, 1);
        let url = Url::parse(&raw_url)
            .map_err(|e| FetchError::Config(format!("invalid request URL '{}': {}", raw_url, e)))?;

        let method = Method::from_bytes(descriptor.method.as_bytes())
            .map_err(|e| FetchError::Config(format!("invalid method '{}': {}", descriptor.method, e)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FetchError::Config(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FetchError::Config(format!("invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        Ok(Self {
            source_name: descriptor.name.clone(),
            method,
            url,
            headers,
            timeout: descriptor.timeout,
        })
    }
}
