//! Exponential-backoff retry for provider calls.

use std::future::Future;
use std::time::Duration;

use haven_core::Result;

/// Runs `op` up to `attempts` times, doubling the delay after each failure.
///
/// The first retry waits `base_delay`, the second `2 * base_delay`, and so
/// on. The error from the final attempt is returned unchanged.
///
/// # Errors
///
/// Propagates the last error once all attempts are exhausted.
pub async fn with_backoff<T, F, Fut>(attempts: u32, base_delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut delay = base_delay;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "Retrying after failure");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => return Err(err),
        }
    }

    unreachable!("loop returns on final attempt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_on_later_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(3, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::provider("mock", "transient"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_backoff(3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::provider("mock", "permanent")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_attempt_no_sleep() {
        let result = with_backoff(1, Duration::from_secs(3600), || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }
}
