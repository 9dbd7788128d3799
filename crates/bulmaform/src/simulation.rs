//! Clicking through rendered forms without a browser.
//!
//! [`RowSimulation`] loads rendered markup into a [`MemoryDocument`] and drives the row
//! behaviors the same way the browser listener does.

use bulmaform_rows::contract::{
    value_attribute, ADD_ROW_CONTROLLER, DELETE_ROW_CONTROLLER, TEMPLATE_ID_KEY,
};
use bulmaform_rows::{
    ActionOutcome, ClockTokens, ExtensionRegistry, MemoryDocument, NodeId, RowActions,
    TokenSource, TriggerEvent,
};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::field_name;

/// A rendered form loaded into an in-memory document.
#[derive(Debug)]
pub struct RowSimulation<T = ClockTokens> {
    document: MemoryDocument,
    actions: RowActions<NodeId, T>,
    destroy_field: String,
}

impl RowSimulation<ClockTokens> {
    /// Load `html`, numbering new rows by the clock like a browser does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rows`] if the markup cannot be parsed.
    pub fn new(html: &str, config: &Config) -> Result<Self> {
        Self::with_tokens(html, config, ClockTokens::new())
    }
}

impl<T: TokenSource> RowSimulation<T> {
    /// Load `html`, numbering new rows from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rows`] if the markup cannot be parsed.
    pub fn with_tokens(html: &str, config: &Config, tokens: T) -> Result<Self> {
        Ok(Self {
            document: MemoryDocument::parse(html)?,
            actions: RowActions::with_tokens(ExtensionRegistry::new(), config.row_settings(), tokens),
            destroy_field: config.nested.destroy_field.clone(),
        })
    }

    /// The document in its current state.
    #[must_use]
    pub fn document(&self) -> &MemoryDocument {
        &self.document
    }

    /// Serialize the document.
    #[must_use]
    pub fn html(&self) -> String {
        self.document.to_html()
    }

    /// Click the first add button bound to `template_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Simulation`] if there is no such button, or the behavior's error.
    pub fn click_add(&mut self, template_id: &str) -> Result<Vec<ActionOutcome>> {
        let selector = format!(
            "button[data-controller~=\"{ADD_ROW_CONTROLLER}\"][{}=\"{template_id}\"]",
            value_attribute(ADD_ROW_CONTROLLER, TEMPLATE_ID_KEY)
        );
        let button = self
            .document
            .select_first(self.document.root(), &selector)?
            .ok_or_else(|| Error::simulation(format!("no add button for '{template_id}'")))?;
        self.click(button)
    }

    /// Click the delete button of the row rendered under `object_name`
    /// (e.g. `order[items_attributes][0]`).
    ///
    /// The button is found next to the row's hidden destruction flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Simulation`] if the row or its button is missing, or the behavior's
    /// error.
    pub fn click_delete(&mut self, object_name: &str) -> Result<Vec<ActionOutcome>> {
        let flag_name = field_name(object_name, &self.destroy_field);
        let flag = self
            .document
            .select_first(self.document.root(), &format!("input[name=\"{flag_name}\"]"))?
            .ok_or_else(|| Error::simulation(format!("no row named '{object_name}'")))?;
        let row = self
            .document
            .parent(flag)
            .ok_or_else(|| Error::simulation(format!("row '{object_name}' is detached")))?;

        let selector = format!("button[data-controller~=\"{DELETE_ROW_CONTROLLER}\"]");
        let mut button = None;
        for child in self.document.element_children(row) {
            if !self.document.has_class(child, "field") {
                continue;
            }
            if let Some(found) = self.document.select_first(child, &selector)? {
                button = Some(found);
                break;
            }
        }
        let button = button
            .ok_or_else(|| Error::simulation(format!("row '{object_name}' has no delete button")))?;
        self.click(button)
    }

    fn click(&mut self, target: NodeId) -> Result<Vec<ActionOutcome>> {
        let mut event = TriggerEvent::new(target);
        let outcomes = self.actions.handle(&mut self.document, &mut event)?;
        debug!(?outcomes, prevented = event.default_prevented(), "Simulated click");
        Ok(outcomes)
    }
}
