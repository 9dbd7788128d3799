//! Error types for the row behaviors.
//!
//! Every failure here is a configuration defect surfaced at the point of access: a template id
//! or container selector that does not resolve, a malformed selector, or markup the in-memory
//! document cannot parse. None of them are retried.

use thiserror::Error;

/// Errors raised while handling a row action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// The configured template element does not exist in the document.
    #[error("row template '{id}' not found")]
    TemplateNotFound {
        /// The template element id that was looked up.
        id: String,
    },

    /// The configured container selector matched nothing.
    #[error("row container '{selector}' not found")]
    ContainerNotFound {
        /// The selector that was queried.
        selector: String,
    },

    /// A CSS selector could not be parsed.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An insertion position other than the four `insertAdjacentHTML` positions.
    #[error("invalid insert position '{0}'")]
    InvalidPosition(String),

    /// A required controller value was not present on the controller element.
    #[error("missing value '{key}' for controller '{controller}'")]
    MissingValue {
        /// The controller identifier.
        controller: String,
        /// The value key (e.g. `template-id`).
        key: String,
    },

    /// A sentinel must be a non-empty string.
    #[error("sentinel must not be empty")]
    EmptySentinel,

    /// A generated token contained the sentinel and would never be replaced.
    #[error("token '{token}' contains the sentinel '{sentinel}'")]
    TokenContainsSentinel {
        /// The generated token.
        token: String,
        /// The sentinel it collided with.
        sentinel: String,
    },

    /// Markup could not be parsed into the in-memory document.
    #[error("malformed markup at byte {offset}: {message}")]
    Markup {
        /// Byte offset into the parsed input.
        offset: usize,
        /// Description of the problem.
        message: String,
    },

    /// An element handle no longer refers to a usable node.
    #[error("stale element handle: {0}")]
    StaleElement(String),

    /// The browser DOM rejected an operation.
    #[error("browser error: {0}")]
    Browser(String),
}

/// A specialized Result type for row operations.
pub type Result<T> = std::result::Result<T, RowError>;

impl RowError {
    /// Create an invalid selector error.
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing controller value error.
    #[must_use]
    pub fn missing_value(controller: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingValue {
            controller: controller.into(),
            key: key.into(),
        }
    }

    /// Create a markup parse error.
    #[must_use]
    pub fn markup(offset: usize, message: impl Into<String>) -> Self {
        Self::Markup {
            offset,
            message: message.into(),
        }
    }

    /// Create a browser error.
    #[must_use]
    pub fn browser(message: impl Into<String>) -> Self {
        Self::Browser(message.into())
    }

    /// Check if this error comes from a lookup that resolved to nothing.
    #[must_use]
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. } | Self::ContainerNotFound { .. }
        )
    }
}
