//! Per-window suppression policy.
//!
//! Each call site gets a counter that is cleared wholesale at the end of every
//! reset window. With a limit `L`, the first `L` messages of a window pass
//! unchanged, message `L + 1` passes with a one-time announcement prefix, and
//! everything after that is dropped until the next reset.

/// Decision made for a single rate limited message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suppression {
    /// Emit the message unchanged
    Allow,
    /// Emit the message with this prefix prepended
    Announce(String),
    /// Drop the message
    Suppress,
}

impl Suppression {
    /// Returns true if the message must be dropped.
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Suppression::Suppress)
    }

    /// The announcement prefix, if this decision carries one.
    pub fn prefix(&self) -> Option<&str> {
        match self {
            Suppression::Announce(prefix) => Some(prefix),
            _ => None,
        }
    }
}

/// Prefix prepended to the single message that crosses the limit.
pub fn suppression_prefix(limit: u64) -> String {
    format!("suppressing log message with rate limit={}: ", limit)
}

/// Per-second limit for one severity.
///
/// A limit of zero disables rate limiting.
///
/// # Example
/// ```
/// use ratelog::{Suppression, WindowPolicy};
///
/// let policy = WindowPolicy::new(2);
/// let mut count = 0;
///
/// assert_eq!(policy.register(&mut count), Suppression::Allow);
/// assert_eq!(policy.register(&mut count), Suppression::Allow);
/// assert!(policy.register(&mut count).prefix().is_some());
/// assert!(policy.register(&mut count).is_suppressed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowPolicy {
    limit: u64,
}

impl WindowPolicy {
    /// Create a policy allowing `limit` messages per location per window.
    pub const fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// Configured limit.
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns true if this policy never suppresses.
    pub const fn is_disabled(&self) -> bool {
        self.limit == 0
    }

    /// Register one message against a location's window counter.
    ///
    /// `count` is the number of messages already counted for the location in
    /// the current window (zero for a location not seen yet). The counter is
    /// advanced up to `limit + 1`, where it stays: that value marks the
    /// announcement as already made.
    pub fn register(&self, count: &mut u64) -> Suppression {
        if self.is_disabled() {
            return Suppression::Allow;
        }

        let seen = *count;
        if seen > self.limit {
            return Suppression::Suppress;
        }

        *count = seen + 1;
        if seen == self.limit {
            Suppression::Announce(suppression_prefix(self.limit))
        } else {
            Suppression::Allow
        }
    }
}
