//! The delete-row behavior.
//!
//! Rows that were never saved are removed outright. Rows backed by a saved record stay in the
//! form: their `_destroy` field is set and they are hidden, so the deletion travels with the
//! next submit.

use tracing::debug;

use crate::contract::{
    value_attribute, DELETE_ROW_CONTROLLER, DESTROY_MARKER, DESTROY_VALUE, HIDDEN_CLASS,
    ROW_SELECTOR_KEY,
};
use crate::document::{RowDocument, RowEvent, RowEventKind, TriggerEvent};
use crate::error::{Result, RowError};

/// Settings of a delete-row behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRowConfig {
    /// Selector of the row element, matched against the trigger and its ancestors.
    pub row_selector: String,
    /// Substring identifying the destruction flag field by name.
    pub destroy_marker: String,
    /// Class added to rows marked for destruction.
    pub hidden_class: String,
    /// Value written into the destruction flag field.
    pub destroy_value: String,
    /// Dispatch row events after removing or marking a row.
    pub announce: bool,
}

impl DeleteRowConfig {
    /// Create a configuration with the conventional marker, class and value.
    pub fn new(row_selector: impl Into<String>) -> Self {
        Self {
            row_selector: row_selector.into(),
            destroy_marker: DESTROY_MARKER.to_string(),
            hidden_class: HIDDEN_CLASS.to_string(),
            destroy_value: DESTROY_VALUE.to_string(),
            announce: true,
        }
    }

    /// Enable or disable row events.
    #[must_use]
    pub fn with_announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    /// Selector of the destruction flag field.
    #[must_use]
    pub fn destroy_field_selector(&self) -> String {
        format!("input[name*=\"{}\"]", self.destroy_marker)
    }

    /// Read the row selector from the controller element, keeping the other settings.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::MissingValue`] when the row selector is missing or empty.
    pub fn from_values<F>(self, value: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let row_selector = value(&value_attribute(DELETE_ROW_CONTROLLER, ROW_SELECTOR_KEY))
            .filter(|selector| !selector.is_empty())
            .ok_or_else(|| RowError::missing_value(DELETE_ROW_CONTROLLER, ROW_SELECTOR_KEY))?;
        Ok(Self {
            row_selector,
            ..self
        })
    }
}

/// What a delete did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The row was removed from the document.
    Removed,
    /// The row was flagged and hidden.
    MarkedForDestruction,
    /// No ancestor of the trigger matched the row selector.
    RowNotFound,
    /// The row has no destruction flag field.
    NoDestroyField,
}

/// An initialized delete-row behavior.
#[derive(Debug, Clone)]
pub struct DeleteRowController {
    config: DeleteRowConfig,
}

impl DeleteRowController {
    /// Initialize the behavior.
    #[must_use]
    pub fn new(config: DeleteRowConfig) -> Self {
        Self { config }
    }

    /// The configuration this behavior was built from.
    #[must_use]
    pub fn config(&self) -> &DeleteRowConfig {
        &self.config
    }

    /// Remove the row around the trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if the row selector is invalid or the document rejects the removal.
    pub fn remove<D: RowDocument>(
        &self,
        document: &mut D,
        event: &mut TriggerEvent<D::Element>,
    ) -> Result<DeleteOutcome> {
        event.prevent_default();
        let Some(row) = self.find_row(document, event)? else {
            return Ok(DeleteOutcome::RowNotFound);
        };

        let parent = document.parent_element(&row);
        document.remove(&row)?;
        debug!(row = ?row, "Removed row");

        if self.config.announce {
            if let Some(parent) = parent {
                document.dispatch(RowEvent {
                    controller: DELETE_ROW_CONTROLLER.to_string(),
                    kind: RowEventKind::RowRemoved,
                    subject: parent,
                })?;
            }
        }
        Ok(DeleteOutcome::Removed)
    }

    /// Flag the row around the trigger for destruction and hide it.
    ///
    /// A row without a destruction flag field is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector is invalid or the document rejects a change.
    pub fn mark_for_destruction<D: RowDocument>(
        &self,
        document: &mut D,
        event: &mut TriggerEvent<D::Element>,
    ) -> Result<DeleteOutcome> {
        event.prevent_default();
        let Some(row) = self.find_row(document, event)? else {
            return Ok(DeleteOutcome::RowNotFound);
        };

        let Some(field) =
            document.query_selector_within(&row, &self.config.destroy_field_selector())?
        else {
            debug!(row = ?row, marker = %self.config.destroy_marker, "Row has no destroy field");
            return Ok(DeleteOutcome::NoDestroyField);
        };

        document.set_value(&field, &self.config.destroy_value)?;
        document.add_class(&row, &self.config.hidden_class)?;
        debug!(row = ?row, "Marked row for destruction");

        if self.config.announce {
            document.dispatch(RowEvent {
                controller: DELETE_ROW_CONTROLLER.to_string(),
                kind: RowEventKind::RowMarkedForDestruction,
                subject: row,
            })?;
        }
        Ok(DeleteOutcome::MarkedForDestruction)
    }

    fn find_row<D: RowDocument>(
        &self,
        document: &D,
        event: &TriggerEvent<D::Element>,
    ) -> Result<Option<D::Element>> {
        let row = document.closest(event.target(), &self.config.row_selector)?;
        if row.is_none() {
            debug!(selector = %self.config.row_selector, "No row around trigger");
        }
        Ok(row)
    }
}
