use std::time::Duration;

/// How often, and how patiently, a failed transport call is retried.
///
/// Only retryable failures are retried (see [`Error::is_retryable`]). The
/// wait before attempt `n + 1` is `delay * (n + 1)`.
///
/// [`Error::is_retryable`]: crate::Error::is_retryable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> RetryPolicy {
        RetryPolicy { max_retries, delay }
    }

    /// Never retry.
    pub fn none() -> RetryPolicy {
        RetryPolicy {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Wait before retrying after the `attempt`-th failure (zero based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.delay.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}
