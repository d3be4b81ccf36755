//! Bounded retry policy for provider fetches.
//!
//! Retries are immediate: the identical request is re-issued with no delay.

/// Configuration for the automatic retry mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// The maximum number of retries to attempt.
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// The only HTTP status treated as success.
    pub success_status: u16,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            success_status: 200,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Disable retries.
    pub fn no_retry() -> Self {
        Self::with_max_retries(0)
    }

    pub const fn is_success(&self, status: u16) -> bool {
        status == self.success_status
    }

    /// Fresh per-fetch retry state.
    pub const fn start(&self) -> RetryState {
        RetryState {
            attempt: 0,
            ceiling: self.max_retries,
        }
    }
}

/// Attempt counter guarding a single fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    ceiling: u32,
}

impl RetryState {
    /// Number of attempts issued so far.
    pub const fn attempts(&self) -> u32 {
        self.attempt
    }

    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Record an issued attempt.
    pub fn begin_attempt(&mut self) {
        self.attempt += 1;
    }

    /// Whether another attempt is allowed after a failed one.
    pub const fn can_retry(&self) -> bool {
        self.attempt <= self.ceiling
    }
}
