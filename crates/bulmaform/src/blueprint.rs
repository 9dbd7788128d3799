//! JSON form blueprints for the CLI.
//!
//! A blueprint names the form object, supplies the record, and lists plain fields and nested
//! sections. Each nested section renders its rows inside a container `div` (id
//! `{field_id}_rows`), an add button, and optionally a delete button per row.
//!
//! ```json
//! {
//!   "object_name": "order",
//!   "attributes": {"action": "/orders"},
//!   "record": {"associations": {"items": {"records": [{"id": 1, "attributes": {"name": "Widget"}}]}}},
//!   "fields": [{"name": "customer"}],
//!   "nested": [{
//!     "association": "items",
//!     "fields": [{"name": "name"}, {"name": "quantity", "type": "number"}],
//!     "add_button": {"label": "Add item", "icon": "fas fa-plus"},
//!     "delete_button": {"label": "Remove"}
//!   }],
//!   "submit": "Save"
//! }
//! ```

use std::path::Path;

use maud::{html, Markup, PreEscaped};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::form::{
    AddButtonOptions, DeleteButtonOptions, FieldsForOptions, FormBuilder, InputOptions, InputType,
};
use crate::markup::{ButtonLabel, HtmlAttributes};
use crate::record::Record;

/// Row wrapper class used when a section does not name one.
const DEFAULT_ROW_CLASS: &str = "nested-row";

/// A whole form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormBlueprint {
    /// Root object name (`order` gives `order[...]` parameters).
    pub object_name: String,
    /// Attributes of the `<form>` element.
    pub attributes: HtmlAttributes,
    /// The form object.
    pub record: Record,
    /// Fields of the root object.
    pub fields: Vec<FieldBlueprint>,
    /// Nested association sections.
    pub nested: Vec<NestedBlueprint>,
    /// Submit button label.
    pub submit: Option<String>,
}

/// One input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBlueprint {
    /// Attribute name.
    pub name: String,
    /// Input type.
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Render a bare hidden input instead of a field.
    pub hidden: bool,
    /// Field options.
    pub options: InputOptions,
}

/// A nested association section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestedBlueprint {
    /// Association name.
    pub association: String,
    /// Class of the row wrapper; also the delete buttons' row selector.
    pub row_class: Option<String>,
    /// Lay the row's fields out as columns.
    pub columns: bool,
    /// Fields of each row.
    pub fields: Vec<FieldBlueprint>,
    /// Sections nested inside each row.
    pub nested: Vec<NestedBlueprint>,
    /// The add button.
    pub add_button: AddButtonBlueprint,
    /// Render a delete button in each row.
    pub delete_button: Option<ButtonLabel>,
    /// Render the add button before the rows instead of after.
    pub button_first: bool,
}

/// The add button of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddButtonBlueprint {
    /// Label and icons.
    #[serde(flatten)]
    pub label: ButtonLabel,
    /// Insertion position keyword.
    pub position: Option<String>,
    /// Extension name.
    pub mixin: Option<String>,
    /// Extra button attributes.
    pub attributes: HtmlAttributes,
}

impl FormBlueprint {
    /// Parse and check a blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and [`Error::InvalidBlueprint`] for missing
    /// names.
    pub fn from_json(json: &str) -> Result<Self> {
        let blueprint: Self = serde_json::from_str(json)?;
        blueprint.validate()?;
        Ok(blueprint)
    }

    /// Read a blueprint file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded blueprint");
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if self.object_name.trim().is_empty() {
            return Err(Error::invalid_blueprint("object_name must not be empty"));
        }
        validate_fields(&self.fields)?;
        validate_sections(&self.nested)
    }

    /// Find the top-level section for `association`.
    #[must_use]
    pub fn section(&self, association: &str) -> Option<&NestedBlueprint> {
        self.nested.iter().find(|s| s.association == association)
    }

    /// Render the form, templates included.
    ///
    /// # Errors
    ///
    /// Returns rendering errors such as [`Error::UnknownAssociation`].
    pub fn render(&self, config: &Config) -> Result<Markup> {
        let builder = FormBuilder::new(
            self.object_name.as_str(),
            self.record.clone(),
            config.clone(),
        );
        builder.form(&self.attributes, |form| {
            let mut body = String::new();
            for field in &self.fields {
                body.push_str(&render_field(form, field).into_string());
            }
            for section in &self.nested {
                body.push_str(&render_section(form, section)?.into_string());
            }
            if let Some(label) = &self.submit {
                body.push_str(&form.submit(label).into_string());
            }
            Ok(PreEscaped(body))
        })
    }
}

fn validate_fields(fields: &[FieldBlueprint]) -> Result<()> {
    match fields.iter().find(|f| f.name.trim().is_empty()) {
        Some(_) => Err(Error::invalid_blueprint("field name must not be empty")),
        None => Ok(()),
    }
}

fn validate_sections(sections: &[NestedBlueprint]) -> Result<()> {
    for section in sections {
        if section.association.trim().is_empty() {
            return Err(Error::invalid_blueprint("association must not be empty"));
        }
        validate_fields(&section.fields)?;
        validate_sections(&section.nested)?;
    }
    Ok(())
}

impl NestedBlueprint {
    /// The row wrapper class.
    #[must_use]
    pub fn row_class(&self) -> &str {
        self.row_class.as_deref().unwrap_or(DEFAULT_ROW_CLASS)
    }
}

impl AddButtonBlueprint {
    /// Button options targeting `container`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rows`] for an unknown position keyword.
    pub fn options(&self, container: &str) -> Result<AddButtonOptions> {
        let mut options = AddButtonOptions::new(container)
            .with_label(self.label.clone())
            .with_attributes(self.attributes.clone());
        if let Some(position) = &self.position {
            options = options.with_position(position.parse()?);
        }
        if let Some(mixin) = &self.mixin {
            options = options.with_mixin(mixin.as_str());
        }
        Ok(options)
    }
}

/// Id of the element holding a section's rows.
#[must_use]
pub fn container_id(builder: &FormBuilder, association: &str) -> String {
    format!("{}_rows", builder.field_id(association))
}

fn render_field(builder: &FormBuilder, field: &FieldBlueprint) -> Markup {
    if field.hidden {
        builder.hidden_field(&field.name)
    } else {
        builder.field(field.input_type, &field.name, &field.options)
    }
}

fn render_section(builder: &FormBuilder, section: &NestedBlueprint) -> Result<Markup> {
    let container = container_id(builder, &section.association);
    let row_options = FieldsForOptions::default()
        .with_row(HtmlAttributes::new().with_class(section.row_class()));

    let row_section = section.clone();
    let rows = builder.nested_fields(&section.association, row_options, move |row| {
        render_row(row, &row_section)
    })?;
    let button = builder.add_row_button(
        &section.association,
        &section.add_button.options(&format!("#{container}"))?,
    )?;

    let rows = html! { div id=(container) { (rows) } };
    Ok(if section.button_first {
        html! { (button) (rows) }
    } else {
        html! { (rows) (button) }
    })
}

fn render_row(row: &FormBuilder, section: &NestedBlueprint) -> Result<Markup> {
    let fields = |builder: &FormBuilder| -> Result<Markup> {
        let mut out = String::new();
        for field in &section.fields {
            out.push_str(&render_field(builder, field).into_string());
        }
        Ok(PreEscaped(out))
    };
    let fields = if section.columns {
        row.columns(fields)?
    } else {
        fields(row)?
    };

    let mut out = fields.into_string();
    for child in &section.nested {
        out.push_str(&render_section(row, child)?.into_string());
    }
    if let Some(label) = &section.delete_button {
        let options = DeleteButtonOptions::new(format!(".{}", section.row_class()))
            .with_label(label.clone());
        out.push_str(&row.delete_row_button(&options)?.into_string());
    }
    Ok(PreEscaped(out))
}
