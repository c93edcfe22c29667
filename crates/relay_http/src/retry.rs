use std::future::Future;
use std::time::Duration;

use crate::error::{HttpClientError, HttpClientResult};

/// Up to this many retries are attempted (four attempts total) before the
/// final error is surfaced to the caller.
pub const MAX_RETRIES: u32 = 3;

/// Run `operation` with exponential backoff on retryable errors.
///
/// The delay for retry attempt `n` (1-indexed) is `kind.base_backoff() *
/// 2^(n-1)`. A non-retryable error, or exhausting [`MAX_RETRIES`], returns
/// the final error untouched.
pub async fn retry_with_backoff<F, Fut, T>(mut operation: F) -> HttpClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HttpClientResult<T>>,
{
    retry_with_backoff_and_sleep(&mut operation, tokio::time::sleep).await
}

/// Same as [`retry_with_backoff`] but with an injectable sleep function, so
/// tests can assert the delay sequence without waiting in real time.
pub(crate) async fn retry_with_backoff_and_sleep<F, Fut, T, S, SFut>(
    operation: &mut F,
    sleep: S,
) -> HttpClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HttpClientResult<T>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= MAX_RETRIES || !err.kind().is_retryable() {
                    return Err(err);
                }
                attempt += 1;
                let delay = err.kind().base_backoff() * 2u32.pow(attempt - 1);
                tracing::warn!(attempt, ?delay, error = %err, "retrying chat completion request");
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpClientErrorKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[tokio::test]
    async fn retries_up_to_max_then_surfaces_error() {
        let calls = Rc::new(RefCell::new(0));
        let delays: Rc<RefCell<Vec<Duration>>> = Rc::new(RefCell::new(Vec::new()));

        let calls_clone = calls.clone();
        let mut op = move || {
            let calls = calls_clone.clone();
            async move {
                *calls.borrow_mut() += 1;
                Err::<(), _>(HttpClientError::new(HttpClientErrorKind::TransientStatus {
                    status: 429,
                    body: String::new(),
                }))
            }
        };

        let delays_clone = delays.clone();
        let sleep = move |d: Duration| {
            let delays = delays_clone.clone();
            async move {
                delays.borrow_mut().push(d);
            }
        };

        let result = retry_with_backoff_and_sleep(&mut op, sleep).await;
        assert!(result.is_err());
        assert_eq!(*calls.borrow(), (MAX_RETRIES + 1) as i32);
        assert_eq!(
            *delays.borrow(),
            vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(20)
            ]
        );
    }

    #[tokio::test]
    async fn non_retryable_error_returns_immediately() {
        let calls = Rc::new(RefCell::new(0));
        let calls_clone = calls.clone();
        let mut op = move || {
            let calls = calls_clone.clone();
            async move {
                *calls.borrow_mut() += 1;
                Err::<(), _>(HttpClientError::new(HttpClientErrorKind::FatalStatus {
                    status: 404,
                    body: String::new(),
                }))
            }
        };
        let sleep = |_: Duration| async {};
        let result = retry_with_backoff_and_sleep(&mut op, sleep).await;
        assert!(result.is_err());
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn success_on_third_attempt_stops_retrying() {
        let calls = Rc::new(RefCell::new(0));
        let calls_clone = calls.clone();
        let mut op = move || {
            let calls = calls_clone.clone();
            async move {
                *calls.borrow_mut() += 1;
                if *calls.borrow() < 3 {
                    Err(HttpClientError::new(HttpClientErrorKind::TransientStatus {
                        status: 500,
                        body: String::new(),
                    }))
                } else {
                    Ok(42)
                }
            }
        };
        let sleep = |_: Duration| async {};
        let result = retry_with_backoff_and_sleep(&mut op, sleep).await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(*calls.borrow(), 3);
    }
}
