//! Retry with exponential back-off and jitter for page fetches.
//!
//! Transient failures (429, network errors, 5xx) are retried; everything else
//! is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Returns `true` if `err` represents a transient condition worth retrying.
///
/// Retriable:
/// - [`FetchError::RateLimited`]: HTTP 429.
/// - [`FetchError::Http`]: connection reset, timeout, TLS hiccup.
/// - [`FetchError::UnexpectedStatus`] with a 5xx status.
///
/// Not retriable: [`FetchError::NotFound`], 4xx statuses,
/// [`FetchError::InvalidUrl`] and [`FetchError::Unavailable`].
pub(crate) fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::RateLimited { .. } | FetchError::Http(_) => true,
        FetchError::UnexpectedStatus { status, .. } => *status >= 500,
        FetchError::NotFound { .. }
        | FetchError::InvalidUrl { .. }
        | FetchError::Unavailable { .. } => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Lower bound on the next delay: the server's `Retry-After` for a 429, capped
/// like the computed back-off.
fn min_delay_ms(err: &FetchError) -> u64 {
    match err {
        FetchError::RateLimited {
            retry_after_secs, ..
        } => retry_after_secs.saturating_mul(1000).min(MAX_DELAY_MS),
        _ => 0,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt     |
/// |---------|-------------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 500 ms × 2¹ ± 25 % jitter     |
/// | 3       | 500 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 30 s, and never shorter than a 429's `Retry-After`.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                let delay_ms = jittered.max(min_delay_ms(&err));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient fetch error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> FetchError {
        FetchError::RateLimited {
            url: "https://test.example.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&FetchError::UnexpectedStatus {
            status: 503,
            url: "https://a.com".to_owned(),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&FetchError::UnexpectedStatus {
            status: 403,
            url: "https://a.com".to_owned(),
        }));
        assert!(!is_retriable(&FetchError::NotFound {
            url: "https://a.com/pricing".to_owned(),
        }));
    }

    #[test]
    fn retry_after_sets_a_capped_floor() {
        let after = |secs| FetchError::RateLimited {
            url: "https://a.com".to_owned(),
            retry_after_secs: secs,
        };
        assert_eq!(min_delay_ms(&after(7)), 7_000);
        assert_eq!(min_delay_ms(&after(600)), MAX_DELAY_MS);
        assert_eq!(min_delay_ms(&after(0)), 0);
        assert_eq!(
            min_delay_ms(&FetchError::UnexpectedStatus {
                status: 503,
                url: "https://a.com".to_owned(),
            }),
            0
        );
    }

    #[tokio::test]
    async fn rate_limited_retry_waits_for_retry_after() {
        let started = std::time::Instant::now();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(1, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::RateLimited {
                        url: "https://a.com".to_owned(),
                        retry_after_secs: 1,
                    })
                } else {
                    Ok::<u32, FetchError>(1)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, FetchError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, FetchError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, FetchError>(rate_limited())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(FetchError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, FetchError>(FetchError::NotFound {
                    url: "https://example.com/pricing".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }
}
