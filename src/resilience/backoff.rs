//! Exponential backoff with full jitter.

use std::time::Duration;
use rand::Rng;

use crate::resilience::retries::RetryPolicy;

/// Upper bound (exclusive) of the random jitter added to every delay.
pub const MAX_JITTER: Duration = Duration::from_secs(1);

/// Calculate the delay before the zero-based `attempt`.
///
/// `delay = min(base * 2^attempt + jitter, max_delay)` with jitter drawn
/// uniformly from `[0, 1s)`. Saturates instead of overflowing for large
/// attempt numbers, so the result is always within `[0, max_delay]`.
pub fn calculate_backoff<R: Rng>(policy: &RetryPolicy, attempt: u32, rng: &mut R) -> Duration {
    let base_ms = policy.base_delay.as_millis().min(u64::MAX as u128) as u64;
    let max_ms = policy.max_delay.as_millis().min(u64::MAX as u128) as u64;

    let exponential_base = 2u64.saturating_pow(attempt);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    let jitter_ms = rng.gen_range(0..MAX_JITTER.as_millis() as u64);

    Duration::from_millis(delay_ms.saturating_add(jitter_ms).min(max_ms))
}

/// Convenience wrapper using the thread-local RNG.
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    calculate_backoff(policy, attempt, &mut rand::thread_rng())
}
