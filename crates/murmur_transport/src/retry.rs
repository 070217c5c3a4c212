//! Per-request retry bookkeeping.

use murmur_error::NetworkErrorKind;
use std::time::Duration;
use tokio::time::Instant;

/// Attempt count, last failure and next deadline for one request.
///
/// Lives for a single request and is dropped on success or once the
/// attempt budget is spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    max_attempts: u32,
    last_failure: Option<NetworkErrorKind>,
    next_attempt_at: Option<Instant>,
}

impl RetryState {
    /// Fresh state for a request allowed `max_attempts` attempts in total.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            last_failure: None,
            next_attempt_at: None,
        }
    }

    /// Count a new attempt.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.next_attempt_at = None;
        self.attempts
    }

    /// Record a failed attempt and when the next one is due, if any.
    pub fn record_failure(&mut self, kind: NetworkErrorKind, delay: Duration) {
        self.last_failure = Some(kind);
        self.next_attempt_at = (!self.is_exhausted()).then(|| Instant::now() + delay);
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Classification of the most recent failure.
    pub fn last_failure(&self) -> Option<NetworkErrorKind> {
        self.last_failure
    }

    /// When the next attempt is scheduled.
    pub fn next_attempt_at(&self) -> Option<Instant> {
        self.next_attempt_at
    }

    /// No attempts left.
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}
