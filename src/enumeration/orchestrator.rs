//! Enumeration orchestrator.
//!
//! # State Machine
//! ```text
//! Start → Fan-out → Collect → Merge → Done
//!            │         │
//!            └─────────┴──→ deadline / cancel → tasks aborted → Err
//! ```
//!
//! # Design Decisions
//! - One task per source; a failing source contributes nothing and
//!   reports to the error sink
//! - Only the deadline and explicit cancellation fail the call
//! - Partial results are discarded when the call fails

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use crate::enumeration::error_sink::{error_sink, ErrorSink};
use crate::enumeration::results::ResultSet;
use crate::error::{EnumerationError, EnumerationResult, SourceError};
use crate::http::{HttpTransport, SourceRequest, Transport, TransportSettings};
use crate::observability::metrics;
use crate::proxy_pool::{ProxyEndpoint, ProxyRotator};
use crate::resilience::executor::ResilientExecutor;
use crate::sources::{SourceDescriptor, SourceRegistry};

/// Upper bound for one whole enumeration call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5 * 60);

/// Outcome of a completed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub domain: String,
    /// Deduplicated names, sorted.
    pub subdomains: Vec<String>,
    /// Every per-source failure the error sink observed.
    pub errors: Vec<SourceError>,
}

/// Fans a domain out to every configured source and merges the answers.
#[derive(Debug)]
pub struct Enumerator<T = HttpTransport> {
    executor: Arc<ResilientExecutor<T>>,
    registry: Arc<SourceRegistry>,
    deadline: Duration,
}

impl Enumerator<HttpTransport> {
    /// Build an enumerator over the reqwest transport.
    pub fn with_http(
        registry: SourceRegistry,
        proxies: Vec<ProxyEndpoint>,
        settings: TransportSettings,
    ) -> EnumerationResult<Self> {
        let transport = HttpTransport::new(settings)?;
        Ok(Self::new(transport, registry, proxies))
    }
}

impl<T: Transport + 'static> Enumerator<T> {
    pub fn new(transport: T, registry: SourceRegistry, proxies: Vec<ProxyEndpoint>) -> Self {
        let rotator = Arc::new(ProxyRotator::new(proxies));
        Self {
            executor: Arc::new(ResilientExecutor::new(transport, rotator)),
            registry: Arc::new(registry),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Enumerate subdomains of `domain`, bounded by the deadline.
    pub async fn enumerate(&self, domain: &str) -> EnumerationResult<Enumeration> {
        self.enumerate_until(domain, None).await
    }

    /// Like [`enumerate`](Self::enumerate), also ending early when `shutdown` fires.
    pub async fn enumerate_until(
        &self,
        domain: &str,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> EnumerationResult<Enumeration> {
        let domain = normalize_domain(domain)?;
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("enumerate", domain = %domain, run_id = %run_id);

        self.run(domain, shutdown).instrument(span).await
    }

    async fn run(
        &self,
        domain: String,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> EnumerationResult<Enumeration> {
        let started = Instant::now();
        tracing::info!(
            sources = ?self.registry.names(),
            deadline = ?self.deadline,
            "Enumeration starting"
        );

        let results = Arc::new(ResultSet::new());
        let (sink, observer) = error_sink(self.registry.len());

        // Fan-out
        let mut tasks = JoinSet::new();
        for descriptor in self.registry.iter() {
            tasks.spawn(source_task(
                self.executor.clone(),
                descriptor.clone(),
                domain.clone(),
                results.clone(),
                sink.clone(),
            ));
        }
        drop(sink);

        // Collect
        let deadline = tokio::time::sleep(self.deadline);
        tokio::pin!(deadline);
        let cancelled = wait_for_cancel(shutdown);
        tokio::pin!(cancelled);

        let outcome = loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok(())) => continue,
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Source task did not complete");
                        continue;
                    }
                    None => break Ok(()),
                },
                _ = &mut deadline => break Err(EnumerationError::DeadlineExceeded(self.deadline)),
                _ = &mut cancelled => break Err(EnumerationError::Cancelled),
            }
        };

        if let Err(e) = outcome {
            tasks.shutdown().await;
            let errors = observer.finish().await;
            tracing::warn!(
                error = %e,
                partial = results.len(),
                source_errors = errors.len(),
                "Enumeration aborted, discarding partial results"
            );
            metrics::record_enumeration(outcome_label(&e), started.elapsed());
            return Err(e);
        }

        // Done
        let errors = observer.finish().await;
        let subdomains = results.snapshot();
        tracing::info!(
            subdomains = subdomains.len(),
            source_errors = errors.len(),
            elapsed = ?started.elapsed(),
            "Enumeration complete"
        );
        metrics::record_enumeration("success", started.elapsed());

        Ok(Enumeration {
            domain,
            subdomains,
            errors,
        })
    }
}

/// Enumerate with the reqwest transport and default settings.
pub async fn enumerate(
    domain: &str,
    registry: SourceRegistry,
    proxies: Vec<ProxyEndpoint>,
) -> EnumerationResult<Enumeration> {
    Enumerator::with_http(registry, proxies, TransportSettings::default())?
        .enumerate(domain)
        .await
}

async fn source_task<T: Transport>(
    executor: Arc<ResilientExecutor<T>>,
    descriptor: SourceDescriptor,
    domain: String,
    results: Arc<ResultSet>,
    sink: ErrorSink,
) {
    let started = Instant::now();
    match fetch_source(&executor, &descriptor, &domain).await {
        Ok(names) => {
            let found = names.len();
            let added = results.merge(names);
            metrics::record_subdomains(&descriptor.name, found);
            tracing::info!(source = %descriptor.name, found, new = added, "Source finished");
        }
        Err(error) => sink.report(error),
    }
    metrics::record_source_duration(&descriptor.name, started.elapsed());
}

async fn fetch_source<T: Transport>(
    executor: &ResilientExecutor<T>,
    descriptor: &SourceDescriptor,
    domain: &str,
) -> Result<HashSet<String>, SourceError> {
    let request =
        SourceRequest::build(descriptor, domain).map_err(|e| SourceError::new(&descriptor.name, e))?;

    let response = executor
        .execute_paced(&request, &descriptor.retry, descriptor.min_interval)
        .await
        .map_err(|e| SourceError::new(&descriptor.name, e))?;

    if !response.is_success() {
        tracing::warn!(
            source = %descriptor.name,
            status = response.status,
            "Non-success status, handing body to parser"
        );
    }

    descriptor
        .strategy
        .parse(&response.body)
        .map_err(|e| SourceError::new(&descriptor.name, e))
}

/// Resolves when `shutdown` fires; never resolves without one.
async fn wait_for_cancel(shutdown: Option<broadcast::Receiver<()>>) {
    if let Some(mut rx) = shutdown {
        match rx.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => return,
            Err(RecvError::Closed) => {}
        }
    }
    std::future::pending::<()>().await
}

fn normalize_domain(domain: &str) -> EnumerationResult<String> {
    let normalized = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    let valid = !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if valid {
        Ok(normalized)
    } else {
        Err(EnumerationError::InvalidDomain(domain.to_string()))
    }
}

fn outcome_label(error: &EnumerationError) -> &'static str {
    match error {
        EnumerationError::DeadlineExceeded(_) => "deadline_exceeded",
        EnumerationError::Cancelled => "cancelled",
        EnumerationError::InvalidDomain(_) => "invalid_domain",
        EnumerationError::Transport(_) => "transport",
    }
}
