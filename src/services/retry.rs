use std::fmt;
use tracing::{debug, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts allowed, including the first one
    pub max_attempts: u32,
}

impl RetryConfig {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 1 }
    }
}

/// Returned when every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: Option<E>,
}

/// Runs `operation` until it succeeds or `config.max_attempts` attempts have
/// been made. Attempts are numbered from 1 and run back to back with no delay.
///
/// A budget of zero makes no attempt at all.
pub fn with_retry<T, E, F>(
    config: RetryConfig,
    mut operation: F,
) -> Result<(T, u32), RetryExhausted<E>>
where
    F: FnMut(u32) -> Result<T, E>,
    E: fmt::Display,
{
    let mut last_error = None;

    for attempt in 1..=config.max_attempts {
        match operation(attempt) {
            Ok(value) => {
                if attempt > 1 {
                    debug!("Operation succeeded after {} attempts", attempt);
                }
                return Ok((value, attempt));
            }
            Err(error) => {
                if attempt < config.max_attempts {
                    warn!("Attempt {} failed: {}. Retrying immediately", attempt, error);
                } else {
                    warn!("Operation failed after {} attempts: {}", attempt, error);
                }
                last_error = Some(error);
            }
        }
    }

    Err(RetryExhausted {
        attempts: config.max_attempts,
        last_error,
    })
}
