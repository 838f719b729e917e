use std::time::Duration;

use rand::Rng;
use reqwest::header::{HeaderMap, RETRY_AFTER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Retry policy for transient failures (connection errors, 429 and 5xx responses).
///
/// `max_retries` counts retries after the first attempt, so the default makes up to
/// four attempts in total.
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Lower bound for any wait between attempts.
    pub min_wait: Duration,
    /// Upper bound for any wait between attempts, including `Retry-After`.
    pub max_wait: Duration,
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0-based): `min_wait * 2^retry` plus up to 50%
    /// jitter, clamped to `[min_wait, max_wait]`.
    pub(crate) fn backoff(&self, retry: u32) -> Duration {
        let min_ms = duration_ms(self.min_wait);
        let max_ms = duration_ms(self.max_wait).max(min_ms);

        let mut base = min_ms;
        for _ in 0..retry {
            base = base.saturating_mul(2);
            if base >= max_ms {
                base = max_ms;
                break;
            }
        }

        let jitter_max = std::cmp::max(base / 2, 1);
        let jitter = rand::thread_rng().gen_range(0..jitter_max);
        Duration::from_millis(base.saturating_add(jitter).clamp(min_ms, max_ms))
    }

    /// Like [`Self::backoff`], but honors a `Retry-After: <seconds>` header (capped at
    /// `max_wait`).
    pub(crate) fn backoff_for_response(&self, retry: u32, headers: &HeaderMap) -> Duration {
        match retry_after(headers) {
            Some(wait) => wait.min(self.max_wait),
            None => self.backoff(retry),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(30),
        }
    }
}

pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn policy(min_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            min_wait: Duration::from_millis(min_ms),
            max_wait: Duration::from_millis(max_ms),
        }
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(200));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn backoff_grows_and_stays_within_bounds() {
        let policy = policy(100, 1_000);
        for _ in 0..50 {
            let first = policy.backoff(0);
            assert!(first >= Duration::from_millis(100));
            assert!(first < Duration::from_millis(150));

            let third = policy.backoff(2);
            assert!(third >= Duration::from_millis(400));
            assert!(third < Duration::from_millis(600));

            let late = policy.backoff(20);
            assert_eq!(late, Duration::from_millis(1_000));
        }
    }

    #[test]
    fn backoff_handles_inverted_bounds() {
        let policy = policy(500, 100);
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
    }

    #[test]
    fn retry_after_seconds_is_honored_and_capped() {
        let policy = policy(100, 5_000);
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(
            policy.backoff_for_response(0, &headers),
            Duration::from_secs(2)
        );

        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(
            policy.backoff_for_response(0, &headers),
            Duration::from_secs(5)
        );

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert!(policy.backoff_for_response(0, &headers) < Duration::from_millis(150));
    }

    #[test]
    fn defaults_allow_three_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(RetryPolicy::disabled().max_retries, 0);
    }
}
