use connectors::sink::SinkError;
use std::time::Duration;

/// Indicates whether an error should be retried or treated as final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    Retry,
    Stop,
}

/// Bounded exponential backoff for transient destination failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: if max_delay.is_zero() {
                base_delay
            } else {
                max_delay
            },
        }
    }

    /// Delay before re-running the attempt with the given 0-based
    /// index: doubling from `base_delay`, capped at `max_delay`.
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::from_millis(0);
        }

        let factor = 1u128 << attempt.min(6);
        let base_ms = self.base_delay.as_millis();
        let delay_ms = base_ms.saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis());
        Duration::from_millis(capped as u64)
    }
}

pub fn classify_sink_error(err: &SinkError) -> RetryDisposition {
    match err {
        SinkError::Io(_) => RetryDisposition::Retry,
        SinkError::MySql(mysql_err) => classify_mysql_error(mysql_err),
        SinkError::Constraint { .. } => RetryDisposition::Stop,
        SinkError::BulkLoadUnsupported(_) => RetryDisposition::Stop,
        SinkError::Other(_) => RetryDisposition::Stop,
    }
}

fn classify_mysql_error(err: &mysql_async::Error) -> RetryDisposition {
    match err {
        mysql_async::Error::Io(_) | mysql_async::Error::Other(_) => RetryDisposition::Retry,
        mysql_async::Error::Driver(_) => RetryDisposition::Retry,
        mysql_async::Error::Server(server_err) => {
            if is_retryable_server_error(server_err.code, server_err.state.as_str()) {
                RetryDisposition::Retry
            } else {
                RetryDisposition::Stop
            }
        }
        _ => RetryDisposition::Stop,
    }
}

fn is_retryable_server_error(code: u16, state: &str) -> bool {
    // Common MySQL server error codes that are typically transient.
    // See: https://dev.mysql.com/doc/mysql-errors/8.0/en/server-error-reference.html
    const RETRYABLE_CODES: [u16; 8] = [1205, 1213, 2002, 2003, 2006, 2013, 1040, 1042];
    if RETRYABLE_CODES.contains(&code) {
        return true;
    }

    matches!(state, "40001" | "HYT00" | "08S01")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(
            5,
            Duration::from_millis(100),
            Duration::from_millis(350),
        );
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(350));
        assert_eq!(policy.backoff_delay(10), Duration::from_millis(350));
    }

    #[test]
    fn zero_base_delay_never_sleeps() {
        let policy = RetryPolicy::new(3, Duration::ZERO, Duration::from_secs(5));
        assert_eq!(policy.backoff_delay(4), Duration::ZERO);
    }

    #[test]
    fn attempts_are_clamped_to_at_least_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(1), Duration::from_secs(1));
        assert_eq!(policy.max_attempts, 1);
    }

    #[test]
    fn io_failures_are_retryable() {
        let err = SinkError::Io(std::io::Error::other("connection reset"));
        assert_eq!(classify_sink_error(&err), RetryDisposition::Retry);
    }

    #[test]
    fn constraint_violations_are_final() {
        let err = SinkError::Constraint {
            code: 1062,
            message: "Duplicate entry".to_string(),
        };
        assert_eq!(classify_sink_error(&err), RetryDisposition::Stop);
    }

    #[test]
    fn deadlock_state_is_retryable() {
        assert!(is_retryable_server_error(9999, "40001"));
        assert!(is_retryable_server_error(1213, "XX000"));
        assert!(!is_retryable_server_error(1062, "23000"));
    }
}
