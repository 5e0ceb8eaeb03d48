//! Source descriptors and the registry that holds them.

use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::http::request::DOMAIN_PLACEHOLDER;
use crate::resilience::retries::RetryPolicy;
use crate::sources::strategy::ParseStrategy;

const USER_AGENT: &str = "Mozilla/5.0 (Advanced Recon Tool)";

/// A data source queried for subdomains. Immutable once registered.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDescriptor {
    /// Unique key.
    pub name: String,
    /// URL with exactly one `{domain}` placeholder.
    pub url_template: String,
    /// HTTP method ("GET").
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Minimum time between consecutive attempts.
    pub min_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub strategy: ParseStrategy,
}

impl SourceDescriptor {
    /// A GET source with the default user agent.
    pub fn get(name: impl Into<String>, url_template: impl Into<String>, strategy: ParseStrategy) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            method: "GET".to_string(),
            headers: BTreeMap::from([("User-Agent".to_string(), USER_AGENT.to_string())]),
            min_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            strategy,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Semantic problems with this descriptor, if any.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let placeholders = self.url_template.matches(DOMAIN_PLACEHOLDER).count();
        if placeholders != 1 {
            problems.push(format!(
                "source '{}': url_template must contain exactly one {} placeholder, found {}",
                self.name, DOMAIN_PLACEHOLDER, placeholders
            ));
        }
        if self.timeout.is_zero() {
            problems.push(format!("source '{}': timeout must be greater than zero", self.name));
        }
        for problem in self.retry.problems() {
            problems.push(format!("source '{}': {}", self.name, problem));
        }
        problems
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown source '{0}'")]
pub struct UnknownSource(pub String);

/// Immutable table of source descriptors, passed into the orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    /// Build a registry; a later descriptor with a duplicate name replaces the earlier one.
    pub fn new(descriptors: Vec<SourceDescriptor>) -> Self {
        let mut sources: Vec<SourceDescriptor> = Vec::with_capacity(descriptors.len());
        for desc in descriptors {
            match sources.iter_mut().find(|s| s.name == desc.name) {
                Some(existing) => *existing = desc,
                None => sources.push(desc),
            }
        }
        Self { sources }
    }

    /// The sources shipped with the tool.
    pub fn builtin() -> Self {
        let retry = RetryPolicy::new(3, Duration::from_secs(1), Duration::from_secs(30));
        Self::new(vec![
            SourceDescriptor::get(
                "crtsh",
                "https://crt.sh/?q=%25.{domain}&output=json",
                ParseStrategy::CrtSh,
            )
            .with_retry(retry),
            SourceDescriptor::get(
                "hackertarget",
                "https://api.hackertarget.com/hostsearch/?q={domain}",
                ParseStrategy::HackerTarget,
            )
            .with_retry(retry),
        ])
    }

    /// Keep only the named sources. An empty selection keeps everything.
    pub fn select(&self, names: &[String]) -> Result<Self, UnknownSource> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let desc = self.get(name).ok_or_else(|| UnknownSource(name.clone()))?;
            selected.push(desc.clone());
        }
        Ok(Self::new(selected))
    }

    pub fn get(&self, name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Problems across all descriptors.
    pub fn problems(&self) -> Vec<String> {
        self.sources.iter().flat_map(|s| s.problems()).collect()
    }
}
