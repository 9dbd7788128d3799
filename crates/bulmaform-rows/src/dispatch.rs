//! Routes clicks to the row behaviors.
//!
//! Buttons rendered by the server carry `data-controller`, `data-…-value` and `data-action`
//! attributes. [`RowActions::handle`] reads them off the clicked element, builds the behavior
//! the attributes describe and runs the named method.

use tracing::{debug, warn};

use crate::add_row::{AddOutcome, AddRowConfig, AddRowController};
use crate::contract::{
    value_attribute, ActionDescriptor, DeleteAction, ADD_ROW_CONTROLLER, DELETE_ROW_CONTROLLER,
    DESTROY_MARKER, DESTROY_VALUE, HIDDEN_CLASS, SENTINEL, SENTINEL_KEY,
};
use crate::delete_row::{DeleteOutcome, DeleteRowConfig, DeleteRowController};
use crate::document::{RowDocument, TriggerEvent};
use crate::error::Result;
use crate::extension::ExtensionRegistry;
use crate::token::{ClockTokens, TokenSource};

/// Settings shared by every row behavior on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSettings {
    /// Placeholder replaced when a row is added, unless the add button names its own.
    pub sentinel: String,
    /// Substring identifying the destruction flag field.
    pub destroy_marker: String,
    /// Class added to rows marked for destruction.
    pub hidden_class: String,
    /// Value written into the destruction flag field.
    pub destroy_value: String,
    /// Dispatch row events after deletes.
    pub announce: bool,
}

impl Default for RowSettings {
    fn default() -> Self {
        Self {
            sentinel: SENTINEL.to_string(),
            destroy_marker: DESTROY_MARKER.to_string(),
            hidden_class: HIDDEN_CLASS.to_string(),
            destroy_value: DESTROY_VALUE.to_string(),
            announce: true,
        }
    }
}

impl RowSettings {
    fn delete_config(&self) -> DeleteRowConfig {
        DeleteRowConfig {
            row_selector: String::new(),
            destroy_marker: self.destroy_marker.clone(),
            hidden_class: self.hidden_class.clone(),
            destroy_value: self.destroy_value.clone(),
            announce: self.announce,
        }
    }
}

/// Result of one handled action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// An add-row action ran.
    Added(AddOutcome),
    /// A delete-row action ran.
    Deleted(DeleteOutcome),
}

/// Click handler for all row buttons of a document.
pub struct RowActions<E, T = ClockTokens> {
    registry: ExtensionRegistry<E>,
    tokens: T,
    settings: RowSettings,
}

impl<E, T: std::fmt::Debug> std::fmt::Debug for RowActions<E, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowActions")
            .field("registry", &self.registry)
            .field("tokens", &self.tokens)
            .field("settings", &self.settings)
            .finish()
    }
}

impl<E> RowActions<E, ClockTokens> {
    /// Create a handler using clock tokens.
    pub fn new(registry: ExtensionRegistry<E>, settings: RowSettings) -> Self {
        Self::with_tokens(registry, settings, ClockTokens::new())
    }
}

impl<E, T: TokenSource> RowActions<E, T> {
    /// Create a handler with a specific token source.
    pub fn with_tokens(registry: ExtensionRegistry<E>, settings: RowSettings, tokens: T) -> Self {
        Self {
            registry,
            tokens,
            settings,
        }
    }

    /// The shared settings.
    pub fn settings(&self) -> &RowSettings {
        &self.settings
    }

    /// Handle a click.
    ///
    /// Every click-bound descriptor on the nearest `[data-action]` element runs in order.
    /// Descriptors for other controllers or methods are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a behavior; later descriptors do not run.
    pub fn handle<D>(
        &mut self,
        document: &mut D,
        event: &mut TriggerEvent<E>,
    ) -> Result<Vec<ActionOutcome>>
    where
        D: RowDocument<Element = E>,
    {
        let Some(actor) = document.closest(event.target(), "[data-action]")? else {
            return Ok(Vec::new());
        };
        let descriptors = document
            .attribute(&actor, "data-action")
            .map(|value| ActionDescriptor::parse_all(&value))
            .unwrap_or_default();

        let mut outcomes = Vec::new();
        for descriptor in descriptors.iter().filter(|d| d.handles_click()) {
            let selector = format!("[data-controller~=\"{}\"]", descriptor.controller);
            let Some(host) = document.closest(&actor, &selector)? else {
                warn!(
                    controller = %descriptor.controller,
                    "Action has no matching controller element"
                );
                continue;
            };
            let value = |name: &str| document.attribute(&host, name);

            let outcome = match (descriptor.controller.as_str(), descriptor.method.as_str()) {
                (ADD_ROW_CONTROLLER, "add") => {
                    let mut config = AddRowConfig::from_values(&value)?;
                    if value(&value_attribute(ADD_ROW_CONTROLLER, SENTINEL_KEY)).is_none() {
                        config.sentinel.clone_from(&self.settings.sentinel);
                    }
                    let mut controller =
                        AddRowController::with_tokens(config, &self.registry, &mut self.tokens);
                    ActionOutcome::Added(controller.add(document, event)?)
                }
                (DELETE_ROW_CONTROLLER, method) => {
                    let action = if method == DeleteAction::Remove.method() {
                        DeleteAction::Remove
                    } else if method == DeleteAction::MarkForDestruction.method() {
                        DeleteAction::MarkForDestruction
                    } else {
                        warn!(method = %method, "Unknown delete-row method");
                        continue;
                    };
                    let config = self.settings.delete_config().from_values(value)?;
                    let controller = DeleteRowController::new(config);
                    ActionOutcome::Deleted(match action {
                        DeleteAction::Remove => controller.remove(document, event)?,
                        DeleteAction::MarkForDestruction => {
                            controller.mark_for_destruction(document, event)?
                        }
                    })
                }
                (controller, method) => {
                    debug!(controller = %controller, method = %method, "Ignoring action");
                    continue;
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::BeforeAdd;
    use crate::memory::{MemoryDocument, NodeId};
    use crate::token::SequentialTokens;

    const PAGE: &str = concat!(
        r#"<form id="order"><div id="items-container">"#,
        r#"<div class="nested-row" id="row-0">"#,
        r#"<input type="hidden" name="order[items_attributes][0][_destroy]" value="false">"#,
        r#"<button type="button" id="mark" data-controller="bulmaform--nested-forms-delete-row" "#,
        r#"data-bulmaform--nested-forms-delete-row-row-selector-value=".nested-row" "#,
        r#"data-action="bulmaform--nested-forms-delete-row#markForDestruction"><span id="mark-label">x</span></button>"#,
        r#"</div></div>"#,
        r#"<button type="button" id="add" data-controller="bulmaform--nested-forms-add-row" "#,
        r#"data-bulmaform--nested-forms-add-row-template-id-value="order_items_fields_template" "#,
        r##"data-bulmaform--nested-forms-add-row-container-selector-value="#items-container" "##,
        r#"data-action="bulmaform--nested-forms-add-row#add"><span id="add-label">Add</span></button>"#,
        r#"<template id="order_items_fields_template"><div class="nested-row">"#,
        r#"<input type="text" name="order[items_attributes][NEW_RECORD][name]">"#,
        r#"<button type="button" class="remove" data-controller="bulmaform--nested-forms-delete-row" "#,
        r#"data-bulmaform--nested-forms-delete-row-row-selector-value=".nested-row" "#,
        r#"data-action="bulmaform--nested-forms-delete-row#remove">x</button>"#,
        r#"</div></template><p id="plain">text</p></form>"#,
    );

    fn actions() -> RowActions<NodeId, SequentialTokens> {
        RowActions::with_tokens(
            ExtensionRegistry::new(),
            RowSettings::default(),
            SequentialTokens::starting_at(1),
        )
    }

    fn click(
        actions: &mut RowActions<NodeId, SequentialTokens>,
        doc: &mut MemoryDocument,
        target: NodeId,
    ) -> Vec<ActionOutcome> {
        let mut event = TriggerEvent::new(target);
        actions.handle(doc, &mut event).unwrap()
    }

    #[test]
    fn test_click_on_add_label_adds_row() {
        let mut doc = MemoryDocument::parse(PAGE).unwrap();
        let mut actions = actions();
        let label = doc.element_by_id("add-label").unwrap();

        let outcomes = click(&mut actions, &mut doc, label);
        assert_eq!(
            outcomes,
            vec![ActionOutcome::Added(AddOutcome::Inserted {
                token: "1".to_string()
            })]
        );
        assert!(doc
            .query_selector(r#"input[name="order[items_attributes][1][name]"]"#)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_added_row_can_be_removed() {
        let mut doc = MemoryDocument::parse(PAGE).unwrap();
        let mut actions = actions();
        let add = doc.element_by_id("add").unwrap();
        click(&mut actions, &mut doc, add);
        click(&mut actions, &mut doc, add);

        let container = doc.element_by_id("items-container").unwrap();
        assert_eq!(doc.element_children(container).len(), 3);

        let remove = doc.select_all(doc.root(), "button.remove").unwrap()[0];
        let outcomes = click(&mut actions, &mut doc, remove);
        assert_eq!(outcomes, vec![ActionOutcome::Deleted(DeleteOutcome::Removed)]);

        let rows = doc.element_children(container);
        assert_eq!(rows.len(), 2);
        assert!(doc.outer_html(rows[1]).unwrap().contains("[2][name]"));
    }

    #[test]
    fn test_button_sentinel_overrides_settings() {
        let page = PAGE.replace("NEW_RECORD", "ROW_INDEX").replace(
            r#"data-action="bulmaform--nested-forms-add-row#add""#,
            r#"data-bulmaform--nested-forms-add-row-sentinel-value="ROW_INDEX" data-action="bulmaform--nested-forms-add-row#add""#,
        );
        let mut doc = MemoryDocument::parse(&page).unwrap();
        let mut actions = actions();
        let add = doc.element_by_id("add").unwrap();

        click(&mut actions, &mut doc, add);

        let container = doc.element_by_id("items-container").unwrap();
        let rows = doc.element_children(container);
        assert_eq!(rows.len(), 2);
        let added = doc.outer_html(rows[1]).unwrap();
        assert!(added.contains("order[items_attributes][1][name]"));
        assert!(!added.contains("ROW_INDEX"));
    }

    #[test]
    fn test_settings_sentinel_applies_without_button_value() {
        let page = PAGE.replace("NEW_RECORD", "ROW_INDEX");
        let mut doc = MemoryDocument::parse(&page).unwrap();
        let settings = RowSettings {
            sentinel: "ROW_INDEX".to_string(),
            ..RowSettings::default()
        };
        let mut actions =
            RowActions::with_tokens(ExtensionRegistry::new(), settings, SequentialTokens::starting_at(7));
        let add = doc.element_by_id("add").unwrap();

        click(&mut actions, &mut doc, add);
        assert!(doc
            .query_selector(r#"input[name="order[items_attributes][7][name]"]"#)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_click_marks_persisted_row() {
        let mut doc = MemoryDocument::parse(PAGE).unwrap();
        let mut actions = actions();
        let label = doc.element_by_id("mark-label").unwrap();

        let mut event = TriggerEvent::new(label);
        let outcomes = actions.handle(&mut doc, &mut event).unwrap();
        assert_eq!(
            outcomes,
            vec![ActionOutcome::Deleted(DeleteOutcome::MarkedForDestruction)]
        );
        assert!(event.default_prevented());

        let row = doc.element_by_id("row-0").unwrap();
        assert!(doc.has_class(row, "is-hidden"));
    }

    #[test]
    fn test_click_without_action() {
        let mut doc = MemoryDocument::parse(PAGE).unwrap();
        let plain = doc.element_by_id("plain").unwrap();
        let before = doc.to_html();

        assert!(click(&mut actions(), &mut doc, plain).is_empty());
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_unknown_controller_is_ignored() {
        let mut doc = MemoryDocument::parse(
            r#"<button id="b" data-controller="other" data-action="other#go">x</button>"#,
        )
        .unwrap();
        let button = doc.element_by_id("b").unwrap();
        assert!(click(&mut actions(), &mut doc, button).is_empty());
    }

    #[test]
    fn test_action_without_controller_element_is_skipped() {
        let mut doc = MemoryDocument::parse(
            r#"<button id="b" data-action="bulmaform--nested-forms-add-row#add">x</button>"#,
        )
        .unwrap();
        let button = doc.element_by_id("b").unwrap();
        assert!(click(&mut actions(), &mut doc, button).is_empty());
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let mut doc = MemoryDocument::parse(concat!(
            r#"<button id="b" data-controller="bulmaform--nested-forms-add-row" "#,
            r#"data-action="bulmaform--nested-forms-add-row#add">x</button>"#,
        ))
        .unwrap();
        let button = doc.element_by_id("b").unwrap();
        let mut event = TriggerEvent::new(button);
        assert!(actions().handle(&mut doc, &mut event).is_err());
    }

    #[test]
    fn test_registered_extension_is_used() {
        let mut doc = MemoryDocument::parse(&PAGE.replace(
            r#"data-action="bulmaform--nested-forms-add-row#add""#,
            r#"data-bulmaform--nested-forms-add-row-mixin-value="veto" data-action="bulmaform--nested-forms-add-row#add""#,
        ))
        .unwrap();
        let mut registry = ExtensionRegistry::new();
        registry.register(
            ADD_ROW_CONTROLLER,
            "veto",
            BeforeAdd(|_: &TriggerEvent<NodeId>, _: &mut String| false),
        );
        let mut actions =
            RowActions::with_tokens(registry, RowSettings::default(), SequentialTokens::default());
        let add = doc.element_by_id("add").unwrap();

        let outcomes = click(&mut actions, &mut doc, add);
        assert_eq!(outcomes, vec![ActionOutcome::Added(AddOutcome::Vetoed)]);
    }
}
