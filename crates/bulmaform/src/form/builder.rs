//! The form builder.
//!
//! A [`FormBuilder`] renders fields for one object name. Builders for nested rows share the
//! render context of their root: configuration, the open layout blocks and the
//! [`TemplateRegistry`] that collects row templates until [`FormBuilder::finish`].

use std::cell::RefCell;
use std::rc::Rc;

use maud::{html, Markup, PreEscaped, Render};
use tracing::{debug, warn};

use bulmaform_rows::contract::nested_sentinel;
use bulmaform_rows::{DeleteAction, InsertPosition};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::markup::{
    element, void_element, BlockLayout, FieldLayout, FormButtonLabel, FormControl, FormField,
    HtmlAttributes, LayoutStack,
};
use crate::nested::{
    NestedFormAddButton, NestedFormDeleteButton, PendingTemplate, RowBlock, TemplateKey,
    TemplateRegistry,
};
use crate::record::Record;

use super::naming;
use super::options::{
    AddButtonOptions, DeleteButtonOptions, FieldsForOptions, InputOptions, InputType,
};

/// State shared by every builder of one form render.
#[derive(Debug)]
struct FormContext {
    config: Config,
    registry: RefCell<TemplateRegistry>,
    layout: RefCell<LayoutStack>,
}

/// Renders Bulma form fields for a [`Record`].
///
/// # Examples
///
/// ```
/// use bulmaform::form::{AddButtonOptions, FieldsForOptions, FormBuilder, InputOptions};
/// use bulmaform::markup::HtmlAttributes;
/// use bulmaform::record::{Association, Record};
/// use bulmaform::Config;
/// use maud::html;
///
/// let order = Record::new().with_association("items", Association::default());
/// let form = FormBuilder::new("order", order, Config::default());
///
/// let html = form
///     .form(&HtmlAttributes::new().with("action", "/orders"), |f| {
///         let rows = f.nested_fields("items", FieldsForOptions::default(), |row| {
///             Ok(row.text_field("name", &InputOptions::default()))
///         })?;
///         let button = f.add_row_button("items", &AddButtonOptions::new("#items"))?;
///         Ok(html! { div id="items" { (rows) } (button) })
///     })
///     .unwrap()
///     .into_string();
///
/// assert!(html.contains(r#"<template id="order_items_fields_template">"#));
/// assert!(html.contains("order[items_attributes][NEW_RECORD][name]"));
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder {
    object_name: String,
    record: Rc<Record>,
    nested: bool,
    template_depth: usize,
    context: Rc<FormContext>,
}

impl FormBuilder {
    /// A root builder for `record` under `object_name`.
    #[must_use]
    pub fn new(object_name: impl Into<String>, record: Record, config: Config) -> Self {
        Self {
            object_name: object_name.into(),
            record: Rc::new(record),
            nested: false,
            template_depth: 0,
            context: Rc::new(FormContext {
                config,
                registry: RefCell::new(TemplateRegistry::new()),
                layout: RefCell::new(LayoutStack::new()),
            }),
        }
    }

    fn child(&self, object_name: String, record: Record) -> Self {
        Self {
            object_name,
            record: Rc::new(record),
            nested: true,
            template_depth: self.template_depth,
            context: Rc::clone(&self.context),
        }
    }

    /// Sentinel of templates registered by this builder.
    fn sentinel(&self) -> String {
        nested_sentinel(&self.config().nested.sentinel, self.template_depth)
    }

    /// The object name fields are named after.
    #[must_use]
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// The record being rendered.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// The render configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.context.config
    }

    /// Whether this builder renders a nested row.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Parameter name of `method`.
    #[must_use]
    pub fn field_name(&self, method: &str) -> String {
        naming::field_name(&self.object_name, method)
    }

    /// Element id of `method`'s input.
    #[must_use]
    pub fn field_id(&self, method: &str) -> String {
        naming::field_id(&self.object_name, method)
    }

    /// Id of the row template for `association`.
    #[must_use]
    pub fn template_id(&self, association: &str) -> String {
        naming::template_id(
            &self.object_name,
            association,
            &self.config().nested.template_suffix,
        )
    }

    /// `label.label` for `method`. Without `text`, the method name is humanized.
    #[must_use]
    pub fn label(&self, method: &str, text: Option<&str>) -> Markup {
        let text = text.map_or_else(|| naming::humanize(method), str::to_string);
        html! {
            label class="label" for=(self.field_id(method)) { (text) }
        }
    }

    /// A bare `input.input` holding the record's value for `method`.
    #[must_use]
    pub fn input(&self, input_type: InputType, method: &str, attributes: &HtmlAttributes) -> Markup {
        let mut attrs = HtmlAttributes::new()
            .with("type", input_type.as_str())
            .with("class", "input");
        if let Some(value) = self.record.attribute(method) {
            attrs.set("value", value);
        }
        attrs
            .set("name", self.field_name(method))
            .set("id", self.field_id(method))
            .mix(attributes);
        void_element("input", &attrs)
    }

    /// A hidden input holding the record's value for `method`.
    #[must_use]
    pub fn hidden_field(&self, method: &str) -> Markup {
        self.hidden_value(method, self.record.attribute(method).unwrap_or_default())
    }

    fn hidden_value(&self, method: &str, value: &str) -> Markup {
        let attrs = HtmlAttributes::new()
            .with("autocomplete", "off")
            .with("type", "hidden")
            .with("value", value)
            .with("name", self.field_name(method))
            .with("id", self.field_id(method));
        void_element("input", &attrs)
    }

    /// An input wrapped in `div.field` with label, control and help.
    #[must_use]
    pub fn field(&self, input_type: InputType, method: &str, options: &InputOptions) -> Markup {
        let label = (!options.suppress_label)
            .then(|| self.label(method, options.label.as_deref()));
        let control = if self.config().capabilities.icons {
            FormControl::new()
                .with_icon_left(options.icon_left.as_deref())
                .with_icon_right(options.icon_right.as_deref())
        } else {
            FormControl::new()
        };

        FormField::new()
            .with_label(label)
            .with_help(options.help.as_deref())
            .with_layout(self.field_layout(options))
            .with_control(control)
            .render_with(self.input(input_type, method, &options.attributes))
    }

    /// [`field`](Self::field) with a text input.
    #[must_use]
    pub fn text_field(&self, method: &str, options: &InputOptions) -> Markup {
        self.field(InputType::Text, method, options)
    }

    fn field_layout(&self, options: &InputOptions) -> FieldLayout {
        if options.column {
            FieldLayout::Column
        } else if options.cell {
            FieldLayout::Cell
        } else {
            self.context.layout.borrow().field_layout()
        }
    }

    /// A submit button.
    #[must_use]
    pub fn submit(&self, label: &str) -> Markup {
        let attrs = HtmlAttributes::new()
            .with("type", "submit")
            .with("class", "button is-primary");
        FormField::new().render_with(element("button", &attrs, FormButtonLabel::text(label)))
    }

    /// Render `block` inside `div.columns`; fields in it become columns.
    ///
    /// # Errors
    ///
    /// Returns whatever `block` returns.
    pub fn columns<F>(&self, block: F) -> Result<Markup>
    where
        F: FnOnce(&Self) -> Result<Markup>,
    {
        self.layout_block(BlockLayout::Columns, block)
    }

    /// Render `block` inside `div.grid`; fields in it become cells.
    ///
    /// # Errors
    ///
    /// Returns whatever `block` returns.
    pub fn grid<F>(&self, class: Option<&str>, block: F) -> Result<Markup>
    where
        F: FnOnce(&Self) -> Result<Markup>,
    {
        self.layout_block(BlockLayout::Grid(class.map(str::to_string)), block)
    }

    /// Render `block` inside `div.fixed-grid > div.grid`.
    ///
    /// # Errors
    ///
    /// Returns whatever `block` returns.
    pub fn fixed_grid<F>(&self, class: Option<&str>, block: F) -> Result<Markup>
    where
        F: FnOnce(&Self) -> Result<Markup>,
    {
        self.layout_block(BlockLayout::FixedGrid(class.map(str::to_string)), block)
    }

    fn layout_block<F>(&self, layout: BlockLayout, block: F) -> Result<Markup>
    where
        F: FnOnce(&Self) -> Result<Markup>,
    {
        self.context.layout.borrow_mut().push(layout.clone());
        let content = block(self);
        self.context.layout.borrow_mut().pop();
        Ok(layout.wrap(content?))
    }

    /// Render the rows of `association` and capture `block` for its row template.
    ///
    /// Each existing child is rendered by `block` under
    /// `{object_name}[{association}_attributes][{index}]`. Rows marked for destruction carry
    /// the hidden class, on a plain `div` when the options name no row element. The template
    /// itself is built by
    /// [`finish`](Self::finish), and only if an add button is rendered for the association.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAssociation`] if the record has no such association,
    /// [`Error::DuplicateNestedFields`] if the association was already rendered in this form,
    /// and any error from `block`.
    pub fn nested_fields<F>(
        &self,
        association: &str,
        options: FieldsForOptions,
        block: F,
    ) -> Result<Markup>
    where
        F: Fn(&FormBuilder) -> Result<Markup> + 'static,
    {
        let children = self
            .record
            .association(association)
            .ok_or_else(|| Error::unknown_association(&self.object_name, association))?;
        let block: RowBlock = Rc::new(block);

        let layout = self.context.layout.borrow().clone();
        self.context.registry.borrow_mut().register(
            TemplateKey::new(self.object_name.as_str(), association),
            PendingTemplate {
                template_id: self.template_id(association),
                options: options.clone(),
                block: Rc::clone(&block),
                prototype: children.build(),
                layout,
                depth: self.template_depth,
            },
        )?;

        let hidden_class = self.config().rows.hidden_class.as_str();
        let mut rows = String::new();
        for (index, child) in children.records.iter().enumerate() {
            let object_name =
                naming::child_object_name(&self.object_name, association, &index.to_string());
            let builder = self.child(object_name, child.clone());
            let mut row = block(&builder)?;
            if let (true, Some(id)) = (options.include_id, &child.id) {
                row = html! { (row) (builder.hidden_value("id", id)) };
            }
            let hidden = child.marked_for_destruction.then_some(hidden_class);
            rows.push_str(&wrap_row(options.row.as_ref(), hidden, row).into_string());
        }
        Ok(PreEscaped(rows))
    }

    /// Render the add-row button for `association`.
    ///
    /// Any number of buttons may point at the same association; its template is built once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAssociation`] if the record has no such association, or a
    /// configuration error if the configured default position is invalid.
    pub fn add_row_button(&self, association: &str, options: &AddButtonOptions) -> Result<Markup> {
        if self.record.association(association).is_none() {
            return Err(Error::unknown_association(&self.object_name, association));
        }
        let key = TemplateKey::new(self.object_name.as_str(), association);
        if !self.context.registry.borrow_mut().register_button(key) {
            debug!(association = %association, "Another add button for the same template");
        }

        let label = &options.label;
        if label.label.is_none() && label.left_icon().is_none() && label.icon_right.is_none() {
            warn!(association = %association, "Add button has neither label nor icon");
        }

        let position = match options.position {
            Some(position) => Some(position),
            None => {
                let default = self.config().default_position()?;
                (default != InsertPosition::default()).then_some(default)
            }
        };
        let template_id = self.template_id(association);
        let sentinel = self.sentinel();
        Ok(NestedFormAddButton::new(&template_id, options)
            .with_sentinel(Some(&sentinel))
            .with_position(position)
            .with_icons(self.config().capabilities.icons)
            .render())
    }

    /// Render the delete-row button for this nested row, followed by its hidden
    /// destruction flag.
    ///
    /// Persisted records are marked for destruction; new records are removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotNested`] on a root builder.
    pub fn delete_row_button(&self, options: &DeleteButtonOptions) -> Result<Markup> {
        if !self.nested {
            return Err(Error::NotNested {
                object_name: self.object_name.clone(),
            });
        }
        let config = self.config();
        let action = DeleteAction::for_record(self.record.is_persisted());
        let flag = if self.record.marked_for_destruction {
            config.rows.destroy_value.as_str()
        } else {
            "false"
        };

        let button = NestedFormDeleteButton::new(options, action)
            .with_icons(config.capabilities.icons)
            .render();
        Ok(html! {
            (button)
            (self.hidden_value(&config.nested.destroy_field, flag))
        })
    }

    /// Build the row templates of every association that has both nested fields and an add
    /// button.
    ///
    /// Templates may themselves render nested fields and add buttons. Those inner templates
    /// are built inside the enclosing template, so they are cloned along with each new outer
    /// row and their ids follow its token. Building repeats until nothing new is ready.
    /// Calling `finish` again only returns templates registered since.
    ///
    /// # Errors
    ///
    /// Returns any error raised by a captured block.
    pub fn finish(&self) -> Result<Markup> {
        let mut templates = String::new();
        loop {
            let ready = self.context.registry.borrow_mut().take_ready();
            if ready.is_empty() {
                break;
            }
            for (key, pending) in ready {
                templates.push_str(&self.build_template(&key, pending)?.into_string());
            }
        }

        let registry = self.context.registry.borrow();
        for key in registry.unmatched_buttons() {
            warn!(key = %key, "Add button has no nested fields; no template rendered");
        }
        for key in registry.unused_blocks() {
            debug!(key = %key, "Nested fields have no add button; no template rendered");
        }
        Ok(PreEscaped(templates))
    }

    fn build_template(&self, key: &TemplateKey, pending: PendingTemplate) -> Result<Markup> {
        let object_name = naming::child_object_name(
            &key.object_name,
            &key.association,
            &nested_sentinel(&self.config().nested.sentinel, pending.depth),
        );
        let mut builder = self.child(object_name, pending.prototype);
        builder.template_depth = pending.depth + 1;

        let enclosing = self.context.layout.replace(pending.layout);
        let row = (pending.block)(&builder);
        self.context.layout.replace(enclosing);
        let row = row?;

        let ready = self
            .context
            .registry
            .borrow_mut()
            .take_ready_within(&builder.object_name);
        let mut inner = String::new();
        for (inner_key, inner_pending) in ready {
            inner.push_str(&self.build_template(&inner_key, inner_pending)?.into_string());
        }

        let row = wrap_row(
            pending.options.row.as_ref(),
            None,
            html! { (row) (PreEscaped(inner)) },
        );
        debug!(
            template_id = %pending.template_id,
            depth = pending.depth,
            "Built row template"
        );
        Ok(html! {
            template id=(pending.template_id) { (row) }
        })
    }

    /// Render `<form>` around `block`, followed by the row templates.
    ///
    /// # Errors
    ///
    /// Returns any error from `block` or [`finish`](Self::finish).
    pub fn form<F>(&self, attributes: &HtmlAttributes, block: F) -> Result<Markup>
    where
        F: FnOnce(&Self) -> Result<Markup>,
    {
        let body = block(self)?;
        let templates = self.finish()?;
        let attrs = HtmlAttributes::new()
            .with("method", "post")
            .mixed(attributes);
        Ok(element("form", &attrs, html! { (body) (templates) }))
    }
}

fn wrap_row(row: Option<&HtmlAttributes>, hidden_class: Option<&str>, content: Markup) -> Markup {
    match row {
        Some(attributes) => {
            let mut attributes = attributes.clone();
            if let Some(class) = hidden_class {
                attributes.add_class(class);
            }
            element("div", &attributes, content)
        }
        None => match hidden_class {
            Some(class) => element("div", &HtmlAttributes::new().with_class(class), content),
            None => content,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ButtonLabel;
    use crate::record::Association;

    fn order() -> Record {
        let items = Association::new(Record::new().with_attribute("quantity", "1"))
            .with_record(
                Record::new()
                    .with_id("11")
                    .with_attribute("name", "Widget")
                    .with_attribute("quantity", "2"),
            );
        Record::new()
            .with_attribute("customer", "Ada")
            .with_association("items", items)
    }

    fn row_options() -> FieldsForOptions {
        FieldsForOptions::default().with_row(HtmlAttributes::new().with_class("nested-row"))
    }

    fn item_row(row: &FormBuilder) -> Result<Markup> {
        let name = row.text_field("name", &InputOptions::default());
        let delete = row.delete_row_button(&DeleteButtonOptions::new(".nested-row"))?;
        Ok(html! { (name) (delete) })
    }

    fn render(button_first: bool) -> String {
        let form = FormBuilder::new("order", order(), Config::default());
        form.form(&HtmlAttributes::new(), |f| {
            let button = AddButtonOptions::new("#items");
            if button_first {
                let button = f.add_row_button("items", &button)?;
                let rows = f.nested_fields("items", row_options(), item_row)?;
                Ok(html! { (button) div id="items" { (rows) } })
            } else {
                let rows = f.nested_fields("items", row_options(), item_row)?;
                let button = f.add_row_button("items", &button)?;
                Ok(html! { div id="items" { (rows) } (button) })
            }
        })
        .unwrap()
        .into_string()
    }

    fn template_of(html: &str) -> &str {
        let start = html.find("<template").unwrap();
        let end = html.find("</template>").unwrap();
        &html[start..end]
    }

    #[test]
    fn test_input_uses_record_value() {
        let form = FormBuilder::new("order", order(), Config::default());
        assert_eq!(
            form.input(InputType::Text, "customer", &HtmlAttributes::new())
                .into_string(),
            r#"<input type="text" class="input" value="Ada" name="order[customer]" id="order_customer">"#
        );
    }

    #[test]
    fn test_input_mixes_classes() {
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .input(
                InputType::Email,
                "email",
                &HtmlAttributes::new().with_class("is-rounded").with("required", ""),
            )
            .into_string();
        assert!(html.contains(r#"type="email" class="input is-rounded""#));
        assert!(html.contains(r#"required="""#));
    }

    #[test]
    fn test_hidden_field() {
        let form = FormBuilder::new("order", order(), Config::default());
        assert_eq!(
            form.hidden_field("customer").into_string(),
            r#"<input autocomplete="off" type="hidden" value="Ada" name="order[customer]" id="order_customer">"#
        );
    }

    #[test]
    fn test_field_with_options() {
        let form = FormBuilder::new("order", order(), Config::default());
        let options = InputOptions {
            label: Some("Customer name".to_string()),
            icon_left: Some("fas fa-user".to_string()),
            help: Some("As on the invoice".to_string()),
            ..InputOptions::default()
        };
        let html = form.text_field("customer", &options).into_string();

        assert!(html.starts_with(
            r#"<div class="field"><label class="label" for="order_customer">Customer name</label>"#
        ));
        assert!(html.contains(r#"<div class="control has-icons-left"><input"#));
        assert!(html.contains(r#"<span class="icon is-small is-left">"#));
        assert!(html.ends_with(r#"<p class="help">As on the invoice</p></div>"#));
    }

    #[test]
    fn test_field_suppress_label() {
        let form = FormBuilder::new("order", order(), Config::default());
        let options = InputOptions {
            suppress_label: true,
            ..InputOptions::default()
        };
        assert!(!form.text_field("customer", &options).into_string().contains("<label"));
    }

    #[test]
    fn test_icons_follow_capability() {
        let mut config = Config::default();
        config.capabilities.icons = false;
        let form = FormBuilder::new("order", order(), config);
        let options = InputOptions {
            icon_left: Some("fas fa-user".to_string()),
            ..InputOptions::default()
        };
        let html = form.text_field("customer", &options).into_string();
        assert!(!html.contains("has-icons-left"));
        assert!(!html.contains("fa-user"));
    }

    #[test]
    fn test_layout_blocks() {
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .columns(|f| {
                let name = f.text_field("customer", &InputOptions::default());
                let grid = f.grid(None, |g| Ok(g.text_field("note", &InputOptions::default())))?;
                let after = f.text_field("email", &InputOptions::default());
                Ok(html! { (name) (grid) (after) })
            })
            .unwrap()
            .into_string();

        assert!(html.starts_with(r#"<div class="columns"><div class="field column">"#));
        assert!(html.contains(r#"<div class="grid"><div class="field cell">"#));
        assert_eq!(html.matches("field column").count(), 2);

        let plain = form.text_field("customer", &InputOptions::default()).into_string();
        assert!(plain.starts_with(r#"<div class="field">"#));
    }

    #[test]
    fn test_fixed_grid() {
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .fixed_grid(Some("has-2-cols"), |f| Ok(f.text_field("customer", &InputOptions::default())))
            .unwrap()
            .into_string();
        assert!(html.starts_with(r#"<div class="fixed-grid has-2-cols"><div class="grid"><div class="field cell">"#));
    }

    #[test]
    fn test_existing_rows_are_rendered() {
        let html = render(false);

        assert!(html.contains(r#"name="order[items_attributes][0][name]" id="order_items_attributes_0_name""#));
        assert!(html.contains(r#"value="Widget""#));
        assert!(html.contains(
            r#"<input autocomplete="off" type="hidden" value="11" name="order[items_attributes][0][id]""#
        ));
    }

    #[test]
    fn test_template_uses_sentinel() {
        let html = render(false);
        let template = template_of(&html);

        assert!(template.starts_with(r#"<template id="order_items_fields_template"><div class="nested-row">"#));
        assert!(template.contains(r#"name="order[items_attributes][NEW_RECORD][name]""#));
        assert!(template.contains(r#"id="order_items_attributes_NEW_RECORD_name""#));
        assert!(!template.contains("[id]"));
    }

    #[test]
    fn test_call_order_does_not_matter() {
        let fields_first = render(false);
        let button_first = render(true);

        assert_eq!(fields_first.matches("<template").count(), 1);
        assert_eq!(button_first.matches("<template").count(), 1);
        assert_eq!(template_of(&fields_first), template_of(&button_first));
    }

    #[test]
    fn test_templates_follow_the_form_body() {
        let html = render(true);
        assert!(html.starts_with(r#"<form method="post">"#));
        assert!(html.ends_with("</template></form>"));
    }

    #[test]
    fn test_delete_button_action_depends_on_persistence() {
        let html = render(false);
        let (body, template) = html.split_at(html.find("<template").unwrap());

        assert!(body.contains("bulmaform--nested-forms-delete-row#markForDestruction"));
        assert!(body.contains(r#"value="false" name="order[items_attributes][0][_destroy]""#));
        assert!(template.contains("bulmaform--nested-forms-delete-row#remove"));
        assert!(template.contains(r#"value="false" name="order[items_attributes][NEW_RECORD][_destroy]""#));
    }

    #[test]
    fn test_marked_row_is_hidden() {
        let mut record = order();
        if let Some(items) = record.associations.get_mut("items") {
            items.records[0].marked_for_destruction = true;
        }
        let form = FormBuilder::new("order", record, Config::default());
        let html = form
            .nested_fields("items", row_options(), item_row)
            .unwrap()
            .into_string();

        assert!(html.starts_with(r#"<div class="nested-row is-hidden">"#));
        assert!(html.contains(r#"value="true" name="order[items_attributes][0][_destroy]""#));
    }

    #[test]
    fn test_marked_row_without_row_attributes_is_wrapped() {
        let mut record = order();
        if let Some(items) = record.associations.get_mut("items") {
            items.records[0].marked_for_destruction = true;
        }
        let form = FormBuilder::new("order", record, Config::default());
        let html = form
            .nested_fields("items", FieldsForOptions::default(), item_row)
            .unwrap()
            .into_string();

        assert!(html.starts_with(r#"<div class="is-hidden"><div class="field">"#));
        assert!(html.contains(r#"value="true" name="order[items_attributes][0][_destroy]""#));
        assert_eq!(html.matches("is-hidden").count(), 1);
    }

    #[test]
    fn test_no_template_without_button() {
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .form(&HtmlAttributes::new(), |f| {
                f.nested_fields("items", row_options(), item_row)
            })
            .unwrap()
            .into_string();
        assert!(!html.contains("<template"));
    }

    #[test]
    fn test_no_template_without_fields() {
        crate::logging::init_test_logging();
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .form(&HtmlAttributes::new(), |f| {
                f.add_row_button("items", &AddButtonOptions::new("#items"))
            })
            .unwrap()
            .into_string();
        assert!(html.contains("bulmaform--nested-forms-add-row#add"));
        assert!(!html.contains("<template"));
    }

    #[test]
    fn test_two_buttons_share_one_template() {
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .form(&HtmlAttributes::new(), |f| {
                let top = f.add_row_button(
                    "items",
                    &AddButtonOptions::new("#items").with_position(InsertPosition::AfterBegin),
                )?;
                let rows = f.nested_fields("items", row_options(), item_row)?;
                let bottom = f.add_row_button("items", &AddButtonOptions::new("#items"))?;
                Ok(html! { (top) div id="items" { (rows) } (bottom) })
            })
            .unwrap()
            .into_string();

        assert_eq!(html.matches("bulmaform--nested-forms-add-row#add").count(), 2);
        assert_eq!(html.matches("<template").count(), 1);
    }

    #[test]
    fn test_duplicate_nested_fields() {
        let form = FormBuilder::new("order", order(), Config::default());
        form.nested_fields("items", row_options(), item_row).unwrap();

        let err = form
            .nested_fields("items", row_options(), item_row)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateNestedFields { .. }));
    }

    #[test]
    fn test_unknown_association() {
        let form = FormBuilder::new("order", order(), Config::default());
        let err = form
            .nested_fields("widgets", FieldsForOptions::default(), item_row)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAssociation { .. }));
        assert!(form
            .add_row_button("widgets", &AddButtonOptions::new("#w"))
            .is_err());
    }

    #[test]
    fn test_delete_button_requires_nested_builder() {
        let form = FormBuilder::new("order", order(), Config::default());
        let err = form
            .delete_row_button(&DeleteButtonOptions::new(".nested-row"))
            .unwrap_err();
        assert!(matches!(err, Error::NotNested { .. }));
    }

    #[test]
    fn test_block_errors_propagate() {
        let form = FormBuilder::new("order", order(), Config::default());
        let err = form
            .nested_fields("items", FieldsForOptions::default(), |_| {
                Err(Error::render("broken row"))
            })
            .unwrap_err();
        assert!(err.to_string().contains("broken row"));
    }

    #[test]
    fn test_default_position_from_config() {
        let mut config = Config::default();
        config.rows.default_position = "afterbegin".to_string();
        let form = FormBuilder::new("order", order(), config);

        let html = form
            .add_row_button("items", &AddButtonOptions::new("#items"))
            .unwrap()
            .into_string();
        assert!(html.contains(r#"data-bulmaform--nested-forms-add-row-position-value="afterbegin""#));

        let default = FormBuilder::new("order", order(), Config::default())
            .add_row_button("items", &AddButtonOptions::new("#items"))
            .unwrap()
            .into_string();
        assert!(!default.contains("position-value"));
    }

    #[test]
    fn test_template_keeps_registration_layout() {
        let form = FormBuilder::new("order", order(), Config::default());
        let html = form
            .form(&HtmlAttributes::new(), |f| {
                let rows = f.columns(|c| {
                    c.nested_fields("items", FieldsForOptions::default(), |row| {
                        Ok(row.text_field("name", &InputOptions::default()))
                    })
                })?;
                let button = f.add_row_button("items", &AddButtonOptions::new("#items"))?;
                Ok(html! { (rows) (button) })
            })
            .unwrap()
            .into_string();

        assert!(template_of(&html).contains(r#"<div class="field column">"#));
    }

    #[test]
    fn test_custom_sentinel() {
        let mut config = Config::default();
        config.nested.sentinel = "ROW_INDEX".to_string();
        let form = FormBuilder::new("order", order(), config);
        let html = form
            .form(&HtmlAttributes::new(), |f| {
                let rows = f.nested_fields("items", row_options(), item_row)?;
                let button = f.add_row_button("items", &AddButtonOptions::new("#items"))?;
                Ok(html! { (rows) (button) })
            })
            .unwrap()
            .into_string();
        assert!(html.contains("order[items_attributes][ROW_INDEX][name]"));
        assert!(!html.contains("NEW_RECORD"));
    }

    #[test]
    fn test_deeper_templates_are_built() {
        let tags = Association::new(Record::new());
        let items = Association::new(Record::new().with_association("tags", tags));
        let record = Record::new().with_association("items", items);
        let form = FormBuilder::new("order", record, Config::default());

        let html = form
            .form(&HtmlAttributes::new(), |f| {
                let rows = f.nested_fields("items", row_options(), |item| {
                    let tags = item.nested_fields("tags", FieldsForOptions::default(), |tag| {
                        Ok(tag.text_field("label", &InputOptions::default()))
                    })?;
                    let add_tag = item.add_row_button(
                        "tags",
                        &AddButtonOptions::new(".tags")
                            .with_label(ButtonLabel::text("Add tag")),
                    )?;
                    Ok(html! { div class="tags" { (tags) } (add_tag) })
                })?;
                let button = f.add_row_button("items", &AddButtonOptions::new("#items"))?;
                Ok(html! { div id="items" { (rows) } (button) })
            })
            .unwrap()
            .into_string();

        assert_eq!(html.matches("<template").count(), 2);
        let outer = html.find(r#"<template id="order_items_fields_template">"#).unwrap();
        let inner = html
            .find(r#"<template id="order_items_attributes_NEW_RECORD_tags_fields_template">"#)
            .unwrap();
        assert!(outer < inner);
        assert!(html.ends_with("</template></div></template></form>"));
        assert!(html.contains("order[items_attributes][NEW_RECORD][tags_attributes][d1_new_record][label]"));
        assert!(html.contains(r#"data-bulmaform--nested-forms-add-row-sentinel-value="d1_new_record""#));
    }

    #[test]
    fn test_templates_of_persisted_rows_stay_at_top_level() {
        let tags = Association::new(Record::new());
        let items = Association::new(Record::new().with_association("tags", tags.clone()))
            .with_record(Record::new().with_id("11").with_association("tags", tags));
        let record = Record::new().with_association("items", items);
        let form = FormBuilder::new("order", record, Config::default());

        let html = form
            .form(&HtmlAttributes::new(), |f| {
                f.nested_fields("items", row_options(), |item| {
                    let tags = item.nested_fields("tags", FieldsForOptions::default(), |tag| {
                        Ok(tag.text_field("label", &InputOptions::default()))
                    })?;
                    let add_tag = item.add_row_button("tags", &AddButtonOptions::new(".tags"))?;
                    Ok(html! { (tags) (add_tag) })
                })
            })
            .unwrap()
            .into_string();

        assert_eq!(html.matches("<template").count(), 1);
        let template = html
            .find(r#"<template id="order_items_attributes_0_tags_fields_template">"#)
            .unwrap();
        assert!(html.ends_with("</template></form>"));
        assert!(html[template..].contains("order[items_attributes][0][tags_attributes][NEW_RECORD][label]"));
        assert!(html[..template].contains("bulmaform--nested-forms-add-row#add"));
        assert!(html.contains(r#"data-bulmaform--nested-forms-add-row-sentinel-value="NEW_RECORD""#));
    }

    #[test]
    fn test_submit() {
        let form = FormBuilder::new("order", order(), Config::default());
        assert_eq!(
            form.submit("Save").into_string(),
            r#"<div class="field"><div class="control"><button type="submit" class="button is-primary">Save</button></div></div>"#
        );
    }
}
