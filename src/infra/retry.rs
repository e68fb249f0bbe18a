//! Bounded retry with a fixed pause between attempts.
//!
//! Attempts run strictly one after another. The operation owns its own
//! timeout; this module only decides whether to try again.

use std::{fmt::Display, future::Future, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Delay used when a call site does not pick its own.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Fixed pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Longest a full sequence can take when every attempt hits its timeout.
    #[cfg(test)]
    pub fn worst_case(&self, per_attempt_timeout: Duration) -> Duration {
        let attempts = self.attempts();
        per_attempt_timeout * attempts + self.delay * (attempts - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

#[derive(Debug, PartialEq)]
pub enum CallOutcome<T, E> {
    Success(T),
    /// Every attempt failed; only the last error is kept.
    Failure { attempts: u32, error: E },
    Cancelled,
}

#[cfg(test)]
impl<T, E> CallOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }
}

/// Runs `operation` until it succeeds, the policy is exhausted, or `cancel`
/// fires. Cancellation interrupts both a running attempt and a pending delay.
pub async fn attempt<T, E, F, Fut>(
    operation_name: &str,
    policy: RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> CallOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        debug!(operation = operation_name, attempt, max_attempts, "Starting attempt");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(operation = operation_name, attempt, "Call cancelled");
                return CallOutcome::Cancelled;
            }
            result = operation() => result,
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation = operation_name, attempt, "Succeeded after retry");
                }
                return CallOutcome::Success(value);
            }
            Err(error) if attempt >= max_attempts => {
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    error = %error,
                    "Giving up after final attempt"
                );
                return CallOutcome::Failure {
                    attempts: attempt,
                    error,
                };
            }
            Err(error) => {
                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    error = %error,
                    delay_ms = policy.delay.as_millis() as u64,
                    "Attempt failed, retrying"
                );
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(operation = operation_name, attempt, "Call cancelled while waiting to retry");
                return CallOutcome::Cancelled;
            }
            _ = tokio::time::sleep(policy.delay) => {}
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use tokio::time::Instant;

    use super::*;

    const ATTEMPT_TIME: Duration = Duration::from_secs(30);
    const SLACK: Duration = Duration::from_millis(10);

    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + SLACK,
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_operation_runs_exactly_max_attempts() {
        let policy = RetryPolicy::new(4, Duration::from_secs(10));
        let token = CancellationToken::new();
        let starts = RefCell::new(Vec::new());
        let began = Instant::now();

        let outcome: CallOutcome<(), String> = attempt("always-fails", policy, &token, || {
            starts.borrow_mut().push(Instant::now());
            let n = starts.borrow().len();
            async move {
                tokio::time::sleep(ATTEMPT_TIME).await;
                Err(format!("failure #{n}"))
            }
        })
        .await;

        assert_eq!(
            outcome,
            CallOutcome::Failure {
                attempts: 4,
                error: "failure #4".to_string()
            }
        );

        let starts = starts.into_inner();
        assert_eq!(starts.len(), 4);
        for pair in starts.windows(2) {
            assert_close(pair[1] - pair[0], ATTEMPT_TIME + policy.delay);
        }
        assert_close(began.elapsed(), policy.worst_case(ATTEMPT_TIME));
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_success() {
        let policy = RetryPolicy::new(5, Duration::from_secs(10));
        let token = CancellationToken::new();
        let calls = Cell::new(0u32);

        let outcome = attempt("succeeds-third", policy, &token, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(format!("failure #{n}"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(outcome, CallOutcome::Success(3));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_incurs_no_delay() {
        let token = CancellationToken::new();
        let began = Instant::now();

        let outcome = attempt("ok", RetryPolicy::default(), &token, || async {
            Ok::<_, String>("payload")
        })
        .await;

        assert!(outcome.is_success());
        assert_eq!(began.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn single_attempt_policy_never_retries() {
        let token = CancellationToken::new();
        let calls = Cell::new(0u32);
        let began = Instant::now();

        let outcome: CallOutcome<(), &str> =
            attempt("once", RetryPolicy::new(1, Duration::from_secs(60)), &token, || {
                calls.set(calls.get() + 1);
                async { Err("nope") }
            })
            .await;

        assert_eq!(
            outcome,
            CallOutcome::Failure {
                attempts: 1,
                error: "nope"
            }
        );
        assert_eq!(calls.get(), 1);
        assert_eq!(began.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempts_behaves_like_one() {
        let token = CancellationToken::new();
        let calls = Cell::new(0u32);

        let outcome: CallOutcome<(), &str> =
            attempt("zero", RetryPolicy::new(0, Duration::ZERO), &token, || {
                calls.set(calls.get() + 1);
                async { Err("nope") }
            })
            .await;

        assert!(matches!(outcome, CallOutcome::Failure { attempts: 1, .. }));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_retries_immediately() {
        let token = CancellationToken::new();
        let calls = Cell::new(0u32);
        let began = Instant::now();

        let outcome: CallOutcome<(), &str> =
            attempt("no-delay", RetryPolicy::new(3, Duration::ZERO), &token, || {
                calls.set(calls.get() + 1);
                async { Err("nope") }
            })
            .await;

        assert!(matches!(outcome, CallOutcome::Failure { attempts: 3, .. }));
        assert_eq!(calls.get(), 3);
        assert!(began.elapsed() < SLACK);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_pending_delay() {
        let token = CancellationToken::new();
        let calls = Cell::new(0u32);

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(2)).await;
            canceller.cancel();
        });

        let began = Instant::now();
        let outcome: CallOutcome<(), &str> =
            attempt("cancel-me", RetryPolicy::new(5, Duration::from_secs(10)), &token, || {
                calls.set(calls.get() + 1);
                async { Err("nope") }
            })
            .await;

        assert_eq!(outcome, CallOutcome::Cancelled);
        assert_eq!(calls.get(), 1);
        assert_close(began.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_running_attempt() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let outcome: CallOutcome<(), &str> =
            attempt("slow", RetryPolicy::default(), &token, || async {
                tokio::time::sleep(ATTEMPT_TIME).await;
                Err("timed out")
            })
            .await;

        assert_eq!(outcome, CallOutcome::Cancelled);
    }

    #[test]
    fn worst_case_latency_counts_timeouts_and_delays() {
        let policy = RetryPolicy::new(5, Duration::from_secs(10));
        assert_eq!(
            policy.worst_case(Duration::from_secs(30)),
            Duration::from_secs(5 * 30 + 4 * 10)
        );
        assert_eq!(RetryPolicy::default().delay, Duration::from_secs(5));
    }
}
