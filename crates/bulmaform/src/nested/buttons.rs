//! The add-row and delete-row buttons.
//!
//! Both render as `div.field > div.control > button` and carry the data attributes the
//! row behaviors in `bulmaform-rows` read on click.

use maud::{Markup, Render};

use bulmaform_rows::contract::{
    action_descriptor, value_attribute, ADD_ROW_CONTROLLER, CONTAINER_SELECTOR_KEY,
    DELETE_ROW_CONTROLLER, MIXIN_KEY, POSITION_KEY, ROW_SELECTOR_KEY, SENTINEL_KEY,
    TEMPLATE_ID_KEY,
};
use bulmaform_rows::{DeleteAction, InsertPosition};

use crate::form::{AddButtonOptions, DeleteButtonOptions};
use crate::markup::{element, FormField, HtmlAttributes};

fn button_attributes(controller: &str) -> HtmlAttributes {
    HtmlAttributes::new()
        .with("type", "button")
        .with("class", "button")
        .with("data-controller", controller)
}

/// Button that appends a row built from an association's template.
#[derive(Debug, Clone)]
pub struct NestedFormAddButton<'a> {
    template_id: &'a str,
    options: &'a AddButtonOptions,
    position: Option<InsertPosition>,
    sentinel: Option<&'a str>,
    icons: bool,
}

impl<'a> NestedFormAddButton<'a> {
    /// A button bound to the template `template_id`.
    #[must_use]
    pub fn new(template_id: &'a str, options: &'a AddButtonOptions) -> Self {
        Self {
            template_id,
            options,
            position: options.position,
            sentinel: None,
            icons: true,
        }
    }

    /// Name the sentinel the template uses as its row index.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: Option<&'a str>) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Override the insertion position written to the markup.
    #[must_use]
    pub fn with_position(mut self, position: Option<InsertPosition>) -> Self {
        self.position = position;
        self
    }

    /// Whether to render icon spans.
    #[must_use]
    pub fn with_icons(mut self, icons: bool) -> Self {
        self.icons = icons;
        self
    }

    /// The button's attributes.
    #[must_use]
    pub fn attributes(&self) -> HtmlAttributes {
        let mut attributes = button_attributes(ADD_ROW_CONTROLLER)
            .with(
                value_attribute(ADD_ROW_CONTROLLER, CONTAINER_SELECTOR_KEY),
                self.options.container.as_str(),
            )
            .with(
                value_attribute(ADD_ROW_CONTROLLER, TEMPLATE_ID_KEY),
                self.template_id,
            );
        if let Some(sentinel) = self.sentinel {
            attributes.set(value_attribute(ADD_ROW_CONTROLLER, SENTINEL_KEY), sentinel);
        }
        if let Some(position) = self.position {
            attributes.set(
                value_attribute(ADD_ROW_CONTROLLER, POSITION_KEY),
                position.as_str(),
            );
        }
        if let Some(mixin) = &self.options.mixin {
            attributes.set(value_attribute(ADD_ROW_CONTROLLER, MIXIN_KEY), mixin.as_str());
        }
        attributes.set("data-action", action_descriptor(ADD_ROW_CONTROLLER, "add"));
        attributes.mix(&self.options.attributes);
        attributes
    }
}

impl Render for NestedFormAddButton<'_> {
    fn render(&self) -> Markup {
        let contents = self.options.label.contents(self.icons);
        FormField::new().render_with(element("button", &self.attributes(), contents))
    }
}

/// Button that removes its row, or flags a persisted one for destruction.
#[derive(Debug, Clone)]
pub struct NestedFormDeleteButton<'a> {
    options: &'a DeleteButtonOptions,
    action: DeleteAction,
    icons: bool,
}

impl<'a> NestedFormDeleteButton<'a> {
    /// A button running `action` on the row matched by `options.row_selector`.
    #[must_use]
    pub fn new(options: &'a DeleteButtonOptions, action: DeleteAction) -> Self {
        Self {
            options,
            action,
            icons: true,
        }
    }

    /// Whether to render icon spans.
    #[must_use]
    pub fn with_icons(mut self, icons: bool) -> Self {
        self.icons = icons;
        self
    }

    /// The button's attributes.
    #[must_use]
    pub fn attributes(&self) -> HtmlAttributes {
        button_attributes(DELETE_ROW_CONTROLLER)
            .with(
                value_attribute(DELETE_ROW_CONTROLLER, ROW_SELECTOR_KEY),
                self.options.row_selector.as_str(),
            )
            .with(
                "data-action",
                action_descriptor(DELETE_ROW_CONTROLLER, self.action.method()),
            )
            .mixed(&self.options.attributes)
    }
}

impl Render for NestedFormDeleteButton<'_> {
    fn render(&self) -> Markup {
        let contents = self.options.label.contents(self.icons);
        FormField::new().render_with(element("button", &self.attributes(), contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ButtonLabel;

    #[test]
    fn test_add_button_markup() {
        let options = AddButtonOptions::new("#items")
            .with_label(ButtonLabel::text("Add item").with_icon("fas fa-plus"));
        let html = NestedFormAddButton::new("order_items_fields_template", &options)
            .render()
            .into_string();

        assert_eq!(
            html,
            concat!(
                r#"<div class="field"><div class="control">"#,
                r#"<button type="button" class="button" data-controller="bulmaform--nested-forms-add-row" "#,
                r##"data-bulmaform--nested-forms-add-row-container-selector-value="#items" "##,
                r#"data-bulmaform--nested-forms-add-row-template-id-value="order_items_fields_template" "#,
                r#"data-action="bulmaform--nested-forms-add-row#add">"#,
                r#"<span class="icon"><i class="fas fa-plus"></i></span><span>Add item</span>"#,
                r#"</button></div></div>"#
            )
        );
    }

    #[test]
    fn test_add_button_optional_values() {
        let options = AddButtonOptions::new("#items")
            .with_position(InsertPosition::AfterBegin)
            .with_mixin("numbered");
        let attributes = NestedFormAddButton::new("t", &options)
            .with_sentinel(Some("ROW_INDEX"))
            .attributes();

        assert_eq!(
            attributes.get("data-bulmaform--nested-forms-add-row-sentinel-value"),
            Some("ROW_INDEX")
        );
        assert_eq!(
            attributes.get("data-bulmaform--nested-forms-add-row-position-value"),
            Some("afterbegin")
        );
        assert_eq!(
            attributes.get("data-bulmaform--nested-forms-add-row-mixin-value"),
            Some("numbered")
        );
    }

    #[test]
    fn test_add_button_mixes_caller_attributes() {
        let options = AddButtonOptions::new("#items").with_attributes(
            HtmlAttributes::new()
                .with("class", "is-small")
                .with("data-action", "analytics#track"),
        );
        let attributes = NestedFormAddButton::new("t", &options).attributes();

        assert_eq!(attributes.get("class"), Some("button is-small"));
        assert_eq!(
            attributes.get("data-action"),
            Some("bulmaform--nested-forms-add-row#add analytics#track")
        );
    }

    #[test]
    fn test_delete_button_actions() {
        let options = DeleteButtonOptions::new(".nested-row");

        let remove = NestedFormDeleteButton::new(&options, DeleteAction::Remove).attributes();
        assert_eq!(
            remove.get("data-action"),
            Some("bulmaform--nested-forms-delete-row#remove")
        );
        assert_eq!(
            remove.get("data-bulmaform--nested-forms-delete-row-row-selector-value"),
            Some(".nested-row")
        );

        let mark =
            NestedFormDeleteButton::new(&options, DeleteAction::MarkForDestruction).attributes();
        assert_eq!(
            mark.get("data-action"),
            Some("bulmaform--nested-forms-delete-row#markForDestruction")
        );
    }

    #[test]
    fn test_delete_button_without_icons() {
        let options = DeleteButtonOptions::new(".nested-row")
            .with_label(ButtonLabel::text("Remove").with_icon("fas fa-trash"));
        let html = NestedFormDeleteButton::new(&options, DeleteAction::Remove)
            .with_icons(false)
            .render()
            .into_string();
        assert!(!html.contains("fa-trash"));
        assert!(html.contains("<span>Remove</span>"));
    }
}
