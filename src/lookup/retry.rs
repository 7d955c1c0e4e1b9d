use std::{
    future::Future,
    time::Duration,
};

use crate::core::{
    Lookup,
    SukiyakiError,
};

/// Fixed-delay retry for remote lookups. `retries` is the number of extra
/// attempts after the first, so the default makes three attempts total.
/// `timeout` bounds each individual attempt and is applied by the HTTP
/// client, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 2,
            delay: Duration::from_secs(2),
            timeout: Duration::from_secs(7),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration, timeout: Duration) -> Self {
        RetryPolicy { retries, delay, timeout }
    }

    /// Drives `op` until it resolves or the attempt budget runs out. An
    /// `Ok` outcome ends the run immediately: `Absent` is an answer, not a
    /// failure, so it is never retried. Only `Err` (network trouble, bad
    /// status) consumes attempts; exhaustion degrades to `TransientError`.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Lookup<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Lookup<T>, SukiyakiError>>,
    {
        let attempts = self.retries + 1;
        for attempt in 1..=attempts {
            match op().await {
                Ok(outcome) => return outcome,
                Err(e) => {
                    eprintln!("{} attempt {}/{} failed: {}", label, attempt, attempts, e);
                    if attempt < attempts {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }

        Lookup::TransientError
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{
        AtomicU32,
        Ordering,
    };

    use super::*;

    fn fast_policy(retries: u32) -> RetryPolicy {
        RetryPolicy::new(retries, Duration::ZERO, Duration::from_secs(7))
    }

    #[tokio::test]
    async fn returns_found_on_first_success() {
        let calls = AtomicU32::new(0);
        let result = fast_policy(2)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Lookup::Found(42))
            })
            .await;

        assert_eq!(result, Lookup::Found(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absent_is_an_answer_not_a_retry() {
        let calls = AtomicU32::new(0);
        let result: Lookup<u32> = fast_policy(2)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Lookup::Absent)
            })
            .await;

        assert_eq!(result, Lookup::Absent);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = fast_policy(2)
            .run("test", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(SukiyakiError::Custom("connection refused".to_string()))
                } else {
                    Ok(Lookup::Found("ok"))
                }
            })
            .await;

        assert_eq!(result, Lookup::Found("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_degrades_to_transient_error() {
        let calls = AtomicU32::new(0);
        let result: Lookup<u32> = fast_policy(2)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SukiyakiError::Custom("timed out".to_string()))
            })
            .await;

        assert_eq!(result, Lookup::TransientError);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_means_one_attempt() {
        let calls = AtomicU32::new(0);
        let result: Lookup<u32> = fast_policy(0)
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SukiyakiError::Custom("boom".to_string()))
            })
            .await;

        assert_eq!(result, Lookup::TransientError);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
