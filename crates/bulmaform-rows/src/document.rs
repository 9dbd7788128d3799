//! The DOM seam row behaviors are written against.
//!
//! Controllers only ever touch the document through [`RowDocument`], so the same code drives
//! the browser (see `browser`) and the in-memory [`MemoryDocument`](crate::memory::MemoryDocument)
//! used natively and in tests.

use std::fmt::Debug;

use crate::contract::{event_name, InsertPosition, ROW_MARKED_EVENT, ROW_REMOVED_EVENT};
use crate::error::Result;

/// The user interaction that triggered a row action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent<E> {
    target: E,
    default_prevented: bool,
}

impl<E> TriggerEvent<E> {
    /// Create an event fired at `target`.
    pub fn new(target: E) -> Self {
        Self {
            target,
            default_prevented: false,
        }
    }

    /// The element the interaction happened on.
    pub fn target(&self) -> &E {
        &self.target
    }

    /// Suppress the browser's default action (e.g. following a link).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check whether the default action was suppressed.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Row lifecycle events announced to other listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowEventKind {
    /// A row left the document. The subject is the row's former parent.
    RowRemoved,
    /// A row was flagged for destruction and hidden. The subject is the row.
    RowMarkedForDestruction,
}

impl RowEventKind {
    /// Unqualified event name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RowRemoved => ROW_REMOVED_EVENT,
            Self::RowMarkedForDestruction => ROW_MARKED_EVENT,
        }
    }
}

/// An announced row event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEvent<E> {
    /// Identifier of the announcing controller.
    pub controller: String,
    /// What happened.
    pub kind: RowEventKind,
    /// The element the event is dispatched on.
    pub subject: E,
}

impl<E> RowEvent<E> {
    /// Fully qualified event name, `controller:event`.
    #[must_use]
    pub fn name(&self) -> String {
        event_name(&self.controller, self.kind.as_str())
    }
}

/// Document operations needed by the row behaviors.
pub trait RowDocument {
    /// Element handle type.
    type Element: Clone + Debug;

    /// Look up an element by id.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// First element in the document matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// First descendant of `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    fn query_selector_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>>;

    /// Nearest ancestor-or-self of `element` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    fn closest(&self, element: &Self::Element, selector: &str) -> Result<Option<Self::Element>>;

    /// Parent element, if any.
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Attribute value.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Serialized children of `element` (a template's content for `<template>`).
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unusable.
    fn inner_html(&self, element: &Self::Element) -> Result<String>;

    /// Parse `html` and insert it relative to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be parsed or the position has no parent.
    fn insert_adjacent_html(
        &mut self,
        target: &Self::Element,
        position: InsertPosition,
        html: &str,
    ) -> Result<()>;

    /// Detach `element` from the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unusable.
    fn remove(&mut self, element: &Self::Element) -> Result<()>;

    /// Set the value of a form field.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unusable.
    fn set_value(&mut self, element: &Self::Element, value: &str) -> Result<()>;

    /// Add a class to the element's class list.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is unusable.
    fn add_class(&mut self, element: &Self::Element, class: &str) -> Result<()>;

    /// Announce a row event (bubbling) on its subject.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be dispatched.
    fn dispatch(&mut self, event: RowEvent<Self::Element>) -> Result<()>;
}
