use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::PolicyError;

/// How often a step may be attempted and how long to wait between attempts.
///
/// `max_attempts` counts the first try, so a policy of one attempt never
/// retries. The delay is fixed and only applies before a retry, never before
/// the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: NonZeroU32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Build a policy from raw numbers, as found in configuration files.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::ZeroAttempts` if `max_attempts` is zero.
    pub fn try_new(max_attempts: u32, delay_ms: u64) -> Result<Self, PolicyError> {
        let max_attempts = NonZeroU32::new(max_attempts).ok_or(PolicyError::ZeroAttempts)?;
        Ok(Self::new(max_attempts, Duration::from_millis(delay_ms)))
    }

    /// A single attempt with no delay.
    #[must_use]
    pub const fn once() -> Self {
        Self {
            max_attempts: NonZeroU32::MIN,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether another attempt is permitted after `attempt` has failed.
    #[must_use]
    pub const fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.get()
    }

    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

impl std::fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempt(s), {}ms between attempts",
            self.max_attempts,
            self.delay.as_millis()
        )
    }
}
