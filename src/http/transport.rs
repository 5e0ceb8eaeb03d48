//! HTTP transport used by the executor.
//!
//! # Responsibilities
//! - Send one attempt of a `SourceRequest`, optionally through a proxy
//! - Read the full response body
//! - Map reqwest failures onto the retryable/unrecoverable taxonomy

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::FetchError;
use crate::http::request::SourceRequest;
use crate::proxy_pool::ProxyEndpoint;
use crate::resilience::retries::classify_reqwest_error;

/// Status and body of a completed request. Any status is a success here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single-attempt request sender.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &SourceRequest,
        proxy: Option<&ProxyEndpoint>,
    ) -> impl Future<Output = Result<RawResponse, FetchError>> + Send;
}

/// TLS and connection-pool settings for the reqwest transport.
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Skip certificate verification. Enumeration queries public OSINT
    /// services on a best-effort basis, so the default trusts any
    /// certificate; set to false to verify.
    pub accept_invalid_certs: bool,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

/// reqwest-backed transport.
///
/// Direct requests share one pooled client. reqwest binds proxies at client
/// build time, so each proxy endpoint gets its own client, built on first use
/// and reused for every later attempt through it.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    direct: reqwest::Client,
    proxied: Arc<Mutex<HashMap<ProxyEndpoint, reqwest::Client>>>,
    settings: TransportSettings,
}

impl HttpTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, FetchError> {
        if settings.accept_invalid_certs {
            tracing::warn!(
                "TLS certificate verification is disabled for source requests; \
                 set accept_invalid_certs = false to verify"
            );
        }

        let direct = Self::builder(&settings)
            .no_proxy()
            .build()
            .map_err(|e| FetchError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            direct,
            proxied: Arc::new(Mutex::new(HashMap::new())),
            settings,
        })
    }

    fn builder(settings: &TransportSettings) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .pool_max_idle_per_host(settings.pool_max_idle_per_host)
            .pool_idle_timeout(settings.pool_idle_timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
    }

    fn client_for(&self, proxy: Option<&ProxyEndpoint>) -> Result<reqwest::Client, FetchError> {
        let Some(endpoint) = proxy else {
            return Ok(self.direct.clone());
        };

        let mut clients = self.proxied.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(endpoint) {
            return Ok(client.clone());
        }

        let client = Self::builder(&self.settings)
            .proxy(endpoint.to_reqwest_proxy()?)
            .build()
            .map_err(|e| FetchError::Config(format!("failed to build proxied client: {}", e)))?;
        tracing::debug!(proxy = %endpoint.display_url(), "Built client for proxy");
        clients.insert(endpoint.clone(), client.clone());
        Ok(client)
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &SourceRequest,
        proxy: Option<&ProxyEndpoint>,
    ) -> Result<RawResponse, FetchError> {
        let client = self.client_for(proxy)?;

        let response = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cached(transport: &HttpTransport) -> usize {
        transport.proxied.lock().unwrap().len()
    }

    #[tokio::test]
    async fn test_proxied_clients_are_reused() {
        let transport = HttpTransport::new(TransportSettings::default()).unwrap();
        let a = ProxyEndpoint::new("http://10.0.0.1:3128", "http");
        let b = ProxyEndpoint::new("http://10.0.0.2:3128", "http").with_auth("user", "pass");

        transport.client_for(Some(&a)).unwrap();
        transport.client_for(Some(&a)).unwrap();
        assert_eq!(cached(&transport), 1);

        transport.client_for(Some(&b)).unwrap();
        transport.client_for(Some(&b)).unwrap();
        transport.client_for(None).unwrap();
        assert_eq!(cached(&transport), 2);
    }

    #[tokio::test]
    async fn test_clones_share_the_cache() {
        let transport = HttpTransport::new(TransportSettings::default()).unwrap();
        let clone = transport.clone();

        clone.client_for(Some(&ProxyEndpoint::new("http://10.0.0.1:3128", "http"))).unwrap();
        assert_eq!(cached(&transport), 1);
    }

    #[tokio::test]
    async fn test_bad_proxy_is_not_cached() {
        let transport = HttpTransport::new(TransportSettings::default()).unwrap();
        let bad = ProxyEndpoint::new("not a url", "http");

        assert!(matches!(transport.client_for(Some(&bad)), Err(FetchError::Config(_))));
        assert_eq!(cached(&transport), 0);
    }

    #[test]
    fn test_success_range() {
        assert!(RawResponse { status: 204, body: Vec::new() }.is_success());
        assert!(!RawResponse { status: 503, body: Vec::new() }.is_success());
    }
}
