//! Options accepted by the form builder.

use serde::{Deserialize, Serialize};

use bulmaform_rows::InsertPosition;

use crate::markup::{ButtonLabel, HtmlAttributes};

/// `type` of an `<input>` rendered by [`FormBuilder::field`](super::FormBuilder::field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// `text`.
    #[default]
    Text,
    /// `password`.
    Password,
    /// `email`.
    Email,
    /// `number`.
    Number,
    /// `search`.
    Search,
    /// `tel`.
    Tel,
    /// `url`.
    Url,
    /// `color`.
    Color,
    /// `date`.
    Date,
    /// `time`.
    Time,
    /// `datetime-local`.
    DatetimeLocal,
    /// `month`.
    Month,
    /// `week`.
    Week,
}

impl InputType {
    /// The `type` attribute value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Password => "password",
            Self::Email => "email",
            Self::Number => "number",
            Self::Search => "search",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Color => "color",
            Self::Date => "date",
            Self::Time => "time",
            Self::DatetimeLocal => "datetime-local",
            Self::Month => "month",
            Self::Week => "week",
        }
    }
}

/// How a field wraps its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    /// Render no label.
    pub suppress_label: bool,
    /// Label text; defaults to the humanized method name.
    pub label: Option<String>,
    /// Left icon class.
    pub icon_left: Option<String>,
    /// Right icon class.
    pub icon_right: Option<String>,
    /// Force the `column` layout class.
    pub column: bool,
    /// Force the `cell` layout class.
    pub cell: bool,
    /// Help text below the control.
    pub help: Option<String>,
    /// Extra attributes for the `<input>`.
    pub attributes: HtmlAttributes,
}

/// Options for [`FormBuilder::nested_fields`](super::FormBuilder::nested_fields).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldsForOptions {
    /// Append a hidden `id` field to rows of persisted records.
    pub include_id: bool,
    /// Wrap every row (template included) in a `div` with these attributes.
    pub row: Option<HtmlAttributes>,
}

impl Default for FieldsForOptions {
    fn default() -> Self {
        Self {
            include_id: true,
            row: None,
        }
    }
}

impl FieldsForOptions {
    /// Wrap rows in a `div` with `attributes`.
    #[must_use]
    pub fn with_row(mut self, attributes: HtmlAttributes) -> Self {
        self.row = Some(attributes);
        self
    }

    /// Do not emit hidden `id` fields.
    #[must_use]
    pub fn without_id(mut self) -> Self {
        self.include_id = false;
        self
    }
}

/// Options for [`FormBuilder::add_row_button`](super::FormBuilder::add_row_button).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddButtonOptions {
    /// Selector of the element new rows are inserted relative to.
    pub container: String,
    /// Label and icons.
    pub label: ButtonLabel,
    /// Insertion position; omitted from the markup when unset.
    pub position: Option<InsertPosition>,
    /// Name of a registered add-row extension.
    pub mixin: Option<String>,
    /// Extra button attributes, mixed into the generated ones.
    pub attributes: HtmlAttributes,
}

impl AddButtonOptions {
    /// Insert rows relative to `container`.
    #[must_use]
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Self::default()
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: ButtonLabel) -> Self {
        self.label = label;
        self
    }

    /// Set the insertion position.
    #[must_use]
    pub fn with_position(mut self, position: InsertPosition) -> Self {
        self.position = Some(position);
        self
    }

    /// Use a registered extension.
    #[must_use]
    pub fn with_mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixin = Some(mixin.into());
        self
    }

    /// Mix in extra attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: HtmlAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Options for [`FormBuilder::delete_row_button`](super::FormBuilder::delete_row_button).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteButtonOptions {
    /// Selector matching the row element (nearest ancestor-or-self).
    pub row_selector: String,
    /// Label and icons.
    pub label: ButtonLabel,
    /// Extra button attributes.
    pub attributes: HtmlAttributes,
}

impl DeleteButtonOptions {
    /// Delete the nearest ancestor matching `row_selector`.
    #[must_use]
    pub fn new(row_selector: impl Into<String>) -> Self {
        Self {
            row_selector: row_selector.into(),
            ..Self::default()
        }
    }

    /// Set the label.
    #[must_use]
    pub fn with_label(mut self, label: ButtonLabel) -> Self {
        self.label = label;
        self
    }
}
