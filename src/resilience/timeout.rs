use crate::config::DEFAULT_TIMEOUT_MS;
use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

/// Timeout budget applied to outbound lookup requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub request_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl From<Duration> for TimeoutConfig {
    fn from(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

/// Extension trait racing a future against a timer.
///
/// The future and the timer start together and whichever settles first
/// decides the outcome. When the timer wins the future is dropped, so a
/// late result is never observed by the caller.
pub trait TimeoutExt<T> {
    /// Race against the default request budget
    async fn with_timeout(self) -> Result<T>;

    /// Race against a custom duration
    async fn with_timeout_duration(self, duration: Duration) -> Result<T>;

    /// Race against a custom duration, logging the outcome under `operation`
    async fn with_timeout_logged(self, duration: Duration, operation: &str) -> Result<T>;
}

impl<F, T> TimeoutExt<T> for F
where
    F: Future<Output = T>,
{
    async fn with_timeout(self) -> Result<T> {
        self.with_timeout_duration(TimeoutConfig::default().request_timeout)
            .await
    }

    async fn with_timeout_duration(self, duration: Duration) -> Result<T> {
        match timeout(duration, self).await {
            Ok(result) => Ok(result),
            Err(_) => Err(Error::Timeout { timeout: duration }),
        }
    }

    async fn with_timeout_logged(self, duration: Duration, operation: &str) -> Result<T> {
        let start_time = Instant::now();
        debug!("Starting '{}' with timeout {:?}", operation, duration);

        match timeout(duration, self).await {
            Ok(value) => {
                debug!("'{}' settled in {:?}", operation, start_time.elapsed());
                Ok(value)
            }
            Err(_) => {
                warn!("'{}' timed out after {:?}", operation, duration);
                Err(Error::Timeout { timeout: duration })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_timeout_ext_success() {
        let result = async { 42 }
            .with_timeout_duration(Duration::from_millis(100))
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_ext_timeout() {
        let result = async {
            sleep(Duration::from_millis(200)).await;
            42
        }
        .with_timeout_duration(Duration::from_millis(100))
        .await;

        assert!(matches!(
            result,
            Err(Error::Timeout { timeout }) if timeout == Duration::from_millis(100)
        ));
    }

    #[tokio::test]
    async fn test_inner_failure_wins_when_first() {
        let result = async { Err::<i32, Error>(Error::RemoteService { status: 503 }) }
            .with_timeout_logged(Duration::from_millis(100), "failing")
            .await;

        let inner = result.expect("timer should not win");
        assert_eq!(inner.unwrap_err().status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_is_discarded() {
        let completed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&completed);

        let result = async move {
            sleep(Duration::from_secs(9)).await;
            flag.store(true, Ordering::SeqCst);
            42
        }
        .with_timeout()
        .await;

        assert!(matches!(result, Err(Error::Timeout { .. })));
        sleep(Duration::from_secs(5)).await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_timeout_config_default() {
        assert_eq!(
            TimeoutConfig::default().request_timeout,
            Duration::from_millis(8000)
        );
        let custom = TimeoutConfig::from(Duration::from_secs(2));
        assert_eq!(custom.request_timeout, Duration::from_secs(2));
    }
}
