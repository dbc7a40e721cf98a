//! Login failure counting and lockout windows
//!
//! Pure decisions over a user's lockout fields; persisting the resulting
//! update is the caller's job.

use chrono::{DateTime, Duration, Utc};

use crate::domain::user::User;

/// New values for a user's lockout fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutUpdate {
    /// Consecutive failed attempts after this decision
    pub login_failures: u32,
    /// End of the lock window, or `None` to clear it
    pub lock_until: Option<DateTime<Utc>>,
}

/// Failure-counting policy with a fixed threshold and lock duration
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    max_failures: u32,
    lock_duration: Duration,
}

impl LockoutPolicy {
    /// Create a policy that locks for `lock_duration_secs` after
    /// `max_failures` consecutive failed attempts
    pub fn new(max_failures: u32, lock_duration_secs: u64) -> Self {
        Self {
            max_failures,
            lock_duration: Duration::seconds(lock_duration_secs as i64),
        }
    }

    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    /// Check whether the user is inside an active lock window.
    ///
    /// A locked account must be rejected before any password comparison,
    /// so probing cannot extend the lock.
    pub fn is_locked(&self, user: &User, now: DateTime<Utc>) -> bool {
        user.lock_until().is_some_and(|until| until > now)
    }

    /// Record a failed attempt.
    ///
    /// Reaching the threshold resets the counter to zero and opens a lock
    /// window; otherwise the counter increments and any stale lock window
    /// is cleared.
    pub fn on_failure(&self, user: &User, now: DateTime<Utc>) -> LockoutUpdate {
        let failures = user.login_failures().saturating_add(1);

        if failures >= self.max_failures {
            LockoutUpdate {
                login_failures: 0,
                lock_until: Some(now + self.lock_duration),
            }
        } else {
            LockoutUpdate {
                login_failures: failures,
                lock_until: None,
            }
        }
    }

    /// Record a successful attempt.
    ///
    /// Returns `Some` only when there is state to clear, so callers can
    /// skip the write otherwise.
    pub fn on_success(&self, user: &User) -> Option<LockoutUpdate> {
        if user.login_failures() > 0 || user.lock_until().is_some() {
            Some(LockoutUpdate {
                login_failures: 0,
                lock_until: None,
            })
        } else {
            None
        }
    }
}
