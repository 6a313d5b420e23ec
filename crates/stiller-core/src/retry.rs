//! Fixed-backoff retry around a fallible external call.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::{Error, Result};

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Invoke `op` up to [`MAX_RETRIES`] times with a fixed delay in between.
///
/// A classified domain error aborts immediately and propagates unchanged:
/// retrying "not found" or "name taken" cannot resolve it. Unclassified
/// errors are retried; after exhausting all attempts the last cause is
/// wrapped in [`Error::MaxRetriesExceeded`].
pub async fn with_retry<T, F, Fut>(mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;

    for attempt in 1..=MAX_RETRIES {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_classified() => return Err(e),
            Err(e) => {
                if attempt < MAX_RETRIES {
                    warn!("attempt {attempt} failed: {e}; retrying in {RETRY_DELAY:?}");
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                last_err = Some(e);
            }
        }
    }

    Err(Error::MaxRetriesExceeded {
        attempts: MAX_RETRIES,
        source: Box::new(last_err.unwrap_or(Error::Platform("retry without attempts".into()))),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::ErrorCode;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let out = with_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(Error::Platform(format!("boom {n}")))
                } else {
                    Ok(42u32)
                }
            }
        })
        .await;

        assert_eq!(out.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn classified_error_aborts_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let out: Result<u32> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::classified(ErrorCode::PackNotFound, "nope")) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(out.unwrap_err().code(), Some(ErrorCode::PackNotFound));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_wraps_the_last_cause() {
        let calls = AtomicU32::new(0);
        let out: Result<u32> = with_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Err(Error::Platform(format!("boom {n}"))) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES);
        match out.unwrap_err() {
            Error::MaxRetriesExceeded { attempts, source } => {
                assert_eq!(attempts, MAX_RETRIES);
                assert!(source.to_string().contains("boom 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
