use std::time::Duration;

use crate::ApiError;

/// Retry budget of one logical call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

/// What to do after attempt `attempt` (0-based) failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum NextStep {
    Retry(Duration),
    GiveUp,
}

/// Decides whether a failed attempt is retried, and after how long.
pub(crate) fn next_step(error: &ApiError, attempt: u32, policy: RetryPolicy) -> NextStep {
    if !error.is_transient() || attempt >= policy.max_retries {
        return NextStep::GiveUp;
    }
    NextStep::Retry(backoff_delay(policy.retry_delay, attempt))
}

/// Linear backoff: `delay × (attempt + 1)`.
pub(crate) fn backoff_delay(delay: Duration, attempt: u32) -> Duration {
    delay.saturating_mul(attempt.saturating_add(1))
}
