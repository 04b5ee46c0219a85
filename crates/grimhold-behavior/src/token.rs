//! Action tokens.
//!
//! Every action an actor starts captures a token. Issuing a new token, or
//! cancelling, retires every token handed out before it, so a suspended
//! sequence that resumes after an interruption finds its token stale and
//! backs out without side effects.

use serde::{Deserialize, Serialize};

/// Opaque, strictly increasing action token scoped to one counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionToken(u64);

impl ActionToken {
    /// Returns the raw token value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Per-actor monotonically increasing token counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTokenCounter {
    current: u64,
}

impl ActionTokenCounter {
    /// Creates a counter with no outstanding token.
    #[must_use]
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Issues a fresh token, retiring every earlier one.
    pub fn begin_action(&mut self) -> ActionToken {
        self.bump();
        ActionToken(self.current)
    }

    /// Retires every outstanding token without issuing a new one.
    pub fn cancel_action(&mut self) {
        self.bump();
    }

    /// Whether `token` is still the authoritative one.
    #[must_use]
    pub fn is_current(&self, token: ActionToken) -> bool {
        token.0 == self.current
    }

    /// Raw counter value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.current
    }

    fn bump(&mut self) {
        debug_assert!(self.current < u64::MAX, "action token counter overflow");
        // Wrapping skips zero so a wrapped counter never matches a
        // default-initialised token.
        self.current = self.current.wrapping_add(1).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_issues_increasing_tokens() {
        let mut counter = ActionTokenCounter::new();
        let first = counter.begin_action();
        let second = counter.begin_action();
        assert!(second > first);
        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }

    #[test]
    fn test_cancel_retires_outstanding_token() {
        let mut counter = ActionTokenCounter::new();
        let token = counter.begin_action();
        counter.cancel_action();
        assert!(!counter.is_current(token));
        assert_eq!(counter.value(), 2);
    }

    #[test]
    fn test_cancel_then_begin_is_fresh() {
        let mut counter = ActionTokenCounter::new();
        let old = counter.begin_action();
        counter.cancel_action();
        counter.cancel_action();
        let fresh = counter.begin_action();
        assert_ne!(old, fresh);
        assert!(counter.is_current(fresh));
    }
}
