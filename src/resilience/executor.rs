//! Resilient request execution.
//!
//! # Responsibilities
//! - Run one source request with retry, backoff and proxy rotation
//! - Keep a minimum interval between attempts against the same source
//! - Abort immediately on unrecoverable errors

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::FetchError;
use crate::http::{RawResponse, SourceRequest, Transport};
use crate::observability::metrics;
use crate::proxy_pool::ProxyRotator;
use crate::resilience::backoff::backoff_delay;
use crate::resilience::retries::RetryPolicy;

/// Wraps a transport with the retry policy and proxy assignment.
#[derive(Debug)]
pub struct ResilientExecutor<T> {
    transport: T,
    proxies: Arc<ProxyRotator>,
}

impl<T: Transport> ResilientExecutor<T> {
    pub fn new(transport: T, proxies: Arc<ProxyRotator>) -> Self {
        Self { transport, proxies }
    }

    /// Execute with no pacing between attempts beyond backoff.
    pub async fn execute(&self, request: &SourceRequest, policy: &RetryPolicy) -> Result<RawResponse, FetchError> {
        self.execute_paced(request, policy, Duration::ZERO).await
    }

    /// Execute, waiting at least `min_interval` between consecutive attempts.
    ///
    /// Any HTTP status counts as success; only transport errors are retried.
    pub async fn execute_paced(
        &self,
        request: &SourceRequest,
        policy: &RetryPolicy,
        min_interval: Duration,
    ) -> Result<RawResponse, FetchError> {
        let attempts = policy.attempts();
        let mut last_error: Option<FetchError> = None;
        let mut last_attempt_at: Option<Instant> = None;

        for attempt in 0..attempts {
            let mut delay = backoff_delay(policy, attempt);
            if let Some(at) = last_attempt_at {
                delay = delay.max(min_interval.saturating_sub(at.elapsed()));
            }
            if !delay.is_zero() {
                tracing::debug!(source = %request.source_name, attempt = attempt + 1, delay = ?delay, "Waiting before attempt");
                tokio::time::sleep(delay).await;
            }

            let proxy = match self.proxies.next() {
                Ok((endpoint, auth)) => {
                    tracing::debug!(
                        source = %request.source_name,
                        proxy = %endpoint.display_url(),
                        authenticated = auth.is_some(),
                        "Routing attempt through proxy"
                    );
                    Some(endpoint)
                }
                Err(_) => None,
            };

            metrics::record_attempt(&request.source_name);
            last_attempt_at = Some(Instant::now());

            match self.transport.send(request, proxy).await {
                Ok(response) => {
                    tracing::debug!(source = %request.source_name, attempt = attempt + 1, status = response.status, "Request completed");
                    return Ok(response);
                }
                Err(err) => {
                    tracing::warn!(
                        source = %request.source_name,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %err,
                        "Request attempt failed"
                    );
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts,
            last: Box::new(last_error.unwrap_or_else(|| FetchError::Network("no attempt made".into()))),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
