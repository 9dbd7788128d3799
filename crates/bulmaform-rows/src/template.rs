//! Template instantiation by token substitution.
//!
//! A [`TokenTemplate`] is a piece of markup in which a sentinel marks every spot where a
//! row-unique value belongs. Instantiating it draws one token and substitutes it for every
//! occurrence, so all names and ids inside one row agree with each other.

use tracing::trace;

use crate::error::{Result, RowError};
use crate::token::TokenSource;

/// Replace every occurrence of `sentinel` in `markup` with `token`.
#[must_use]
pub fn substitute(markup: &str, sentinel: &str, token: &str) -> String {
    if sentinel.is_empty() {
        return markup.to_string();
    }
    markup.replace(sentinel, token)
}

/// Markup together with the sentinel it uses for row-unique values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTemplate {
    markup: String,
    sentinel: String,
}

/// One instantiated row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// The token substituted for the sentinel.
    pub token: String,
    /// The resulting markup.
    pub markup: String,
}

impl TokenTemplate {
    /// Create a template.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::EmptySentinel`] if `sentinel` is empty.
    pub fn new(markup: impl Into<String>, sentinel: impl Into<String>) -> Result<Self> {
        let sentinel = sentinel.into();
        if sentinel.is_empty() {
            return Err(RowError::EmptySentinel);
        }
        Ok(Self {
            markup: markup.into(),
            sentinel,
        })
    }

    /// The raw template markup.
    #[must_use]
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// The sentinel.
    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Number of sentinel occurrences in the markup.
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.markup.matches(self.sentinel.as_str()).count()
    }

    /// Substitute a caller-chosen token.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::TokenContainsSentinel`] if the token would reintroduce the sentinel.
    pub fn instantiate_with(&self, token: &str) -> Result<String> {
        if token.contains(self.sentinel.as_str()) {
            return Err(RowError::TokenContainsSentinel {
                token: token.to_string(),
                sentinel: self.sentinel.clone(),
            });
        }
        Ok(substitute(&self.markup, &self.sentinel, token))
    }

    /// Draw a token from `tokens` and substitute it.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::TokenContainsSentinel`] if the drawn token contains the sentinel.
    pub fn instantiate<T: TokenSource + ?Sized>(&self, tokens: &mut T) -> Result<Instance> {
        let token = tokens.next_token();
        let markup = self.instantiate_with(&token)?;
        trace!(
            token = %token,
            replaced = self.occurrences(),
            "Instantiated row template"
        );
        Ok(Instance { token, markup })
    }
}
