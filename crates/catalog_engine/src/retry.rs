use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Bounded retry policy for idempotent GETs.
///
/// Every retry consumes one unit of `total` plus one unit of the budget for
/// its cause (`connect`, `read`, or retryable status). Retrying stops once any
/// budget would go negative.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub total: u32,
    pub connect: u32,
    pub read: u32,
    pub backoff_factor: f64,
    pub backoff_max: Duration,
    pub status_forcelist: Vec<u16>,
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: 5,
            connect: 3,
            read: 3,
            backoff_factor: 1.5,
            backoff_max: Duration::from_secs(120),
            status_forcelist: vec![429, 500, 502, 503, 504],
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            total: 0,
            connect: 0,
            read: 0,
            ..Self::default()
        }
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Delay before the retry following `consecutive_errors` failures:
    /// nothing after the first, then `backoff_factor * 2^(n-1)` seconds,
    /// capped at `backoff_max`.
    pub fn backoff(&self, consecutive_errors: u32) -> Duration {
        if consecutive_errors <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(consecutive_errors - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(secs.min(self.backoff_max.as_secs_f64()))
    }

    pub(crate) fn budget(&self) -> RetryBudget<'_> {
        RetryBudget {
            policy: self,
            total: i64::from(self.total),
            connect: i64::from(self.connect),
            read: i64::from(self.read),
            attempts: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryCause {
    Connect,
    Read,
    Status,
}

/// Remaining retries for one request.
#[derive(Debug)]
pub(crate) struct RetryBudget<'a> {
    policy: &'a RetryPolicy,
    total: i64,
    connect: i64,
    read: i64,
    attempts: u32,
}

impl RetryBudget<'_> {
    /// Charges one retry for `cause`. Returns the delay to wait before
    /// retrying, or `None` once the budget is exhausted.
    pub(crate) fn next_delay(
        &mut self,
        cause: RetryCause,
        retry_after: Option<Duration>,
    ) -> Option<Duration> {
        self.total -= 1;
        match cause {
            RetryCause::Connect => self.connect -= 1,
            RetryCause::Read => self.read -= 1,
            RetryCause::Status => {}
        }
        if self.total < 0 || self.connect < 0 || self.read < 0 {
            return None;
        }
        self.attempts += 1;

        let delay = match retry_after {
            Some(wait) if self.policy.respect_retry_after => wait.min(self.policy.backoff_max),
            _ => self.policy.backoff(self.attempts),
        };
        Some(delay)
    }
}

/// `Retry-After` in whole seconds; HTTP-date values are ignored.
pub(crate) fn retry_after(status: u16, headers: &HeaderMap) -> Option<Duration> {
    if !matches!(status, 429 | 503) {
        return None;
    }
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    use super::{retry_after, RetryCause, RetryPolicy};

    #[test]
    fn backoff_is_zero_then_doubles_from_factor() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (1..=5).map(|n| policy.backoff(n)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::ZERO,
                Duration::from_secs(3),
                Duration::from_secs(6),
                Duration::from_secs(12),
                Duration::from_secs(24),
            ]
        );
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(12), Duration::from_secs(120));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(120));
    }

    #[test]
    fn zero_factor_never_waits() {
        let policy = RetryPolicy {
            backoff_factor: 0.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(4), Duration::ZERO);
    }

    #[test]
    fn status_retries_stop_at_total() {
        let policy = RetryPolicy::default();
        let mut budget = policy.budget();
        let granted = (0..10)
            .map_while(|_| budget.next_delay(RetryCause::Status, None))
            .count();
        assert_eq!(granted, 5);
    }

    #[test]
    fn connect_and_read_have_their_own_caps() {
        let policy = RetryPolicy::default();

        let mut budget = policy.budget();
        let connects = (0..10)
            .map_while(|_| budget.next_delay(RetryCause::Connect, None))
            .count();
        assert_eq!(connects, 3);

        let mut budget = policy.budget();
        let reads = (0..10)
            .map_while(|_| budget.next_delay(RetryCause::Read, None))
            .count();
        assert_eq!(reads, 3);
    }

    #[test]
    fn mixed_causes_share_the_total() {
        let policy = RetryPolicy::default();
        let mut budget = policy.budget();
        let causes = [
            RetryCause::Connect,
            RetryCause::Read,
            RetryCause::Status,
            RetryCause::Connect,
            RetryCause::Read,
            RetryCause::Status,
        ];
        let granted: Vec<_> = causes
            .iter()
            .map(|cause| budget.next_delay(*cause, None).is_some())
            .collect();
        assert_eq!(granted, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn no_retry_policy_grants_nothing() {
        let policy = RetryPolicy::none();
        assert!(policy.budget().next_delay(RetryCause::Status, None).is_none());
    }

    #[test]
    fn retry_after_overrides_backoff_up_to_the_cap() {
        let policy = RetryPolicy::default();
        let mut budget = policy.budget();
        assert_eq!(
            budget.next_delay(RetryCause::Status, Some(Duration::from_secs(7))),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            budget.next_delay(RetryCause::Status, Some(Duration::from_secs(600))),
            Some(Duration::from_secs(120))
        );

        let ignoring = RetryPolicy {
            respect_retry_after: false,
            ..RetryPolicy::default()
        };
        let mut budget = ignoring.budget();
        assert_eq!(
            budget.next_delay(RetryCause::Status, Some(Duration::from_secs(7))),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn retry_after_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(429, &headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 4 "));
        assert_eq!(retry_after(429, &headers), Some(Duration::from_secs(4)));
        assert_eq!(retry_after(503, &headers), Some(Duration::from_secs(4)));
        assert_eq!(retry_after(500, &headers), None);

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(429, &headers), None);
    }
}
