//! Retry policy and transport error classification.
//!
//! # Design Decisions
//! - Transport errors are retryable unless classified unrecoverable
//! - Non-2xx statuses are not retry triggers; the parser sees the body
//! - Request-construction errors never reach the retry loop twice

use std::error::Error as StdError;
use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// How many times, and how patiently, a source is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Must be at least 1.
    pub max_attempts: u32,

    /// Base delay for exponential backoff.
    #[serde(with = "millis")]
    pub base_delay: Duration,

    /// Upper bound on any single backoff delay.
    #[serde(with = "millis")]
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Attempts to actually make; a zero policy still tries once.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Semantic problems with this policy, if any.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.max_attempts < 1 {
            problems.push("max_attempts must be at least 1".to_string());
        }
        if self.base_delay > self.max_delay {
            problems.push(format!(
                "base_delay {:?} exceeds max_delay {:?}",
                self.base_delay, self.max_delay
            ));
        }
        problems
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Classify a reqwest failure as retryable or not.
pub fn classify_reqwest_error(err: &reqwest::Error) -> FetchError {
    let message = error_chain(err);

    if err.is_builder() || err.is_redirect() {
        return FetchError::Unrecoverable(message);
    }
    if is_tls_failure(err) {
        return FetchError::Unrecoverable(message);
    }

    FetchError::Network(message)
}

/// Certificate and handshake configuration problems do not fix themselves.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(e) = current {
        let text = e.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("handshake") {
            return true;
        }
        current = e.source();
    }
    false
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        message.push_str(": ");
        message.push_str(&e.to_string());
        current = e.source();
    }
    message
}

mod millis {
    use std::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
