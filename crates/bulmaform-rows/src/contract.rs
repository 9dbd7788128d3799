//! The server/client contract for nested-form rows.
//!
//! Both halves of the row mechanism agree on the values in this module: the sentinel that
//! stands in for a record index, the controller identifiers, and the naming scheme of the data
//! attributes that carry controller values and action bindings.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RowError};

/// Placeholder used as the record index inside a row template.
pub const SENTINEL: &str = "NEW_RECORD";

/// Controller identifier of the add-row behavior.
pub const ADD_ROW_CONTROLLER: &str = "bulmaform--nested-forms-add-row";

/// Controller identifier of the delete-row behavior.
pub const DELETE_ROW_CONTROLLER: &str = "bulmaform--nested-forms-delete-row";

/// Substring that identifies a row's destruction flag field.
pub const DESTROY_MARKER: &str = "_destroy";

/// Value written into the destruction flag field.
pub const DESTROY_VALUE: &str = "true";

/// Presentation class added to rows marked for destruction.
pub const HIDDEN_CLASS: &str = "is-hidden";

/// Event announced after a row was removed from the document.
pub const ROW_REMOVED_EVENT: &str = "row-removed";

/// Event announced after a row was marked for destruction.
pub const ROW_MARKED_EVENT: &str = "row-marked-for-destruction";

/// Value key holding the template element id.
pub const TEMPLATE_ID_KEY: &str = "template-id";

/// Value key holding the container selector.
pub const CONTAINER_SELECTOR_KEY: &str = "container-selector";

/// Value key holding the insertion position.
pub const POSITION_KEY: &str = "position";

/// Value key holding the extension name.
pub const MIXIN_KEY: &str = "mixin";

/// Value key holding the row selector.
pub const ROW_SELECTOR_KEY: &str = "row-selector";

/// Value key holding the sentinel of the button's template.
pub const SENTINEL_KEY: &str = "sentinel";

/// Name of the data attribute carrying `key` for `controller`.
///
/// ```
/// use bulmaform_rows::contract::{value_attribute, ADD_ROW_CONTROLLER};
///
/// assert_eq!(
///     value_attribute(ADD_ROW_CONTROLLER, "template-id"),
///     "data-bulmaform--nested-forms-add-row-template-id-value"
/// );
/// ```
#[must_use]
pub fn value_attribute(controller: &str, key: &str) -> String {
    format!("data-{controller}-{}-value", key.replace('_', "-"))
}

/// The `controller#method` action descriptor.
#[must_use]
pub fn action_descriptor(controller: &str, method: &str) -> String {
    format!("{controller}#{method}")
}

/// Sentinel of a template nested `depth` templates deep.
///
/// A template inside another template keeps the outer sentinel in its field names, and
/// adding an outer row replaces every occurrence of it. Inner templates therefore need a
/// sentinel that does not contain the outer one, nor any other depth's. Depth 0 is
/// `sentinel` itself; deeper levels are its lowercase form behind a `d{depth}_` prefix, which
/// never contains an uppercase sentinel.
///
/// ```
/// use bulmaform_rows::contract::{nested_sentinel, SENTINEL};
///
/// assert_eq!(nested_sentinel(SENTINEL, 0), "NEW_RECORD");
/// assert_eq!(nested_sentinel(SENTINEL, 2), "d2_new_record");
/// ```
#[must_use]
pub fn nested_sentinel(sentinel: &str, depth: usize) -> String {
    if depth == 0 {
        sentinel.to_string()
    } else {
        format!("d{depth}_{}", sentinel.to_lowercase())
    }
}

/// Fully qualified name of an event announced by `controller`.
#[must_use]
pub fn event_name(controller: &str, event: &str) -> String {
    format!("{controller}:{event}")
}

/// Where inserted markup lands relative to the container element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InsertPosition {
    /// Before the container itself.
    BeforeBegin,
    /// Inside the container, before its first child.
    AfterBegin,
    /// Inside the container, after its last child.
    #[default]
    BeforeEnd,
    /// After the container itself.
    AfterEnd,
}

impl InsertPosition {
    /// The `insertAdjacentHTML` keyword for this position.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeBegin => "beforebegin",
            Self::AfterBegin => "afterbegin",
            Self::BeforeEnd => "beforeend",
            Self::AfterEnd => "afterend",
        }
    }
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsertPosition {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "beforebegin" => Ok(Self::BeforeBegin),
            "afterbegin" => Ok(Self::AfterBegin),
            "beforeend" => Ok(Self::BeforeEnd),
            "afterend" => Ok(Self::AfterEnd),
            _ => Err(RowError::InvalidPosition(s.to_string())),
        }
    }
}

/// Which delete-row entry point a delete button is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteAction {
    /// Remove the row from the document (record never persisted).
    Remove,
    /// Keep the row, flag it for destruction and hide it (persisted record).
    MarkForDestruction,
}

impl DeleteAction {
    /// Pick the action for a record.
    #[must_use]
    pub fn for_record(persisted: bool) -> Self {
        if persisted {
            Self::MarkForDestruction
        } else {
            Self::Remove
        }
    }

    /// The method name used in action descriptors.
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::MarkForDestruction => "markForDestruction",
        }
    }
}

impl fmt::Display for DeleteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// One parsed entry of a `data-action` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Explicit event name (`click->…`), if any.
    pub event: Option<String>,
    /// Controller identifier.
    pub controller: String,
    /// Method name.
    pub method: String,
}

impl ActionDescriptor {
    /// Parse a whitespace separated `data-action` value.
    ///
    /// Entries without a `#` are skipped.
    #[must_use]
    pub fn parse_all(value: &str) -> Vec<Self> {
        value.split_whitespace().filter_map(Self::parse).collect()
    }

    /// Parse a single `[event->]controller#method` entry.
    #[must_use]
    pub fn parse(entry: &str) -> Option<Self> {
        let (event, rest) = match entry.split_once("->") {
            Some((event, rest)) => (Some(event.to_string()), rest),
            None => (None, entry),
        };
        let (controller, method) = rest.split_once('#')?;
        if controller.is_empty() || method.is_empty() {
            return None;
        }
        Some(Self {
            event,
            controller: controller.to_string(),
            method: method.to_string(),
        })
    }

    /// Check whether this descriptor reacts to a click.
    #[must_use]
    pub fn handles_click(&self) -> bool {
        self.event.as_deref().map_or(true, |event| event == "click")
    }
}
