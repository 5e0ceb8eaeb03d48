//! Error taxonomy for enumeration.
//!
//! Per-source failures (`FetchError`, `ParseError`) are recovered inside the
//! orchestrator and reported through the error sink as `SourceError`.
//! Only `EnumerationError` is surfaced to the caller of `enumerate`.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while executing a single source request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Request or proxy could not be constructed (bad proxy URL, bad header).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport-level failure worth retrying (refused, reset, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// Transport failure that will not succeed on retry.
    #[error("unrecoverable error: {0}")]
    Unrecoverable(String),

    /// Every attempt failed with a retryable error.
    #[error("request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Config(_) => "config",
            FetchError::Network(_) => "network",
            FetchError::Unrecoverable(_) => "unrecoverable",
            FetchError::RetriesExhausted { .. } => "retries_exhausted",
        }
    }
}

/// The response body did not have the structure a parsing strategy expects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("source reported an error: {0}")]
    Upstream(String),
}

/// What went wrong for one source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceErrorKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A per-source failure, as delivered to the error sink.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("source {source_name}: {kind}")]
pub struct SourceError {
    pub source_name: String,
    pub kind: SourceErrorKind,
}

impl SourceError {
    pub fn new(source_name: impl Into<String>, kind: impl Into<SourceErrorKind>) -> Self {
        Self {
            source_name: source_name.into(),
            kind: kind.into(),
        }
    }

    /// Short label used for metrics.
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            SourceErrorKind::Fetch(e) => e.kind(),
            SourceErrorKind::Parse(_) => "parse",
        }
    }
}

/// Call-level failures of an enumeration.
#[derive(Debug, Error)]
pub enum EnumerationError {
    /// The overall deadline fired before every source finished.
    #[error("enumeration deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The caller triggered cancellation.
    #[error("enumeration cancelled")]
    Cancelled,

    /// The target is not a plausible domain name.
    #[error("invalid target domain '{0}'")]
    InvalidDomain(String),

    /// The HTTP transport could not be built.
    #[error("transport setup failed: {0}")]
    Transport(#[from] FetchError),
}

/// Result type for enumeration calls.
pub type EnumerationResult<T> = Result<T, EnumerationError>;
