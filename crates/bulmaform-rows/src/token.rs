//! Sources of fresh row tokens.
//!
//! Every added row replaces the sentinel with one token; tokens handed out by a single source
//! never repeat.

use chrono::Utc;

/// Produces the token substituted for the sentinel of a new row.
pub trait TokenSource {
    /// Return a token that this source has not returned before.
    fn next_token(&mut self) -> String;
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> String {
        (**self).next_token()
    }
}

/// Millisecond timestamps, bumped forward when two rows are added within one millisecond.
#[derive(Debug, Clone, Default)]
pub struct ClockTokens {
    last: Option<i64>,
}

impl ClockTokens {
    /// Create a clock token source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenSource for ClockTokens {
    fn next_token(&mut self) -> String {
        let now = Utc::now().timestamp_millis();
        let next = match self.last {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last = Some(next);
        next.to_string()
    }
}

/// Counts upward from a starting value. Deterministic, for tests and previews.
#[derive(Debug, Clone)]
pub struct SequentialTokens {
    next: u64,
}

impl SequentialTokens {
    /// Start counting at `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialTokens {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl TokenSource for SequentialTokens {
    fn next_token(&mut self) -> String {
        let token = self.next;
        self.next += 1;
        token.to_string()
    }
}

/// Adapts any `FnMut() -> String` into a token source.
pub struct TokenFn<F>(pub F);

impl<F> std::fmt::Debug for TokenFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TokenFn").finish_non_exhaustive()
    }
}

impl<F: FnMut() -> String> TokenSource for TokenFn<F> {
    fn next_token(&mut self) -> String {
        (self.0)()
    }
}
