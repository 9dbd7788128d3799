//! Bulma markup components.
//!
//! Components implement [`maud::Render`] and compose with `html!`.

mod attributes;
mod button_label;
mod element;
mod field;
mod icon;
mod layout;

pub use attributes::{data_attribute_name, HtmlAttributes};
pub use button_label::{ButtonLabel, FormButtonLabel};
pub use element::{element, void_element};
pub use field::{FieldLayout, FormControl, FormField};
pub use icon::{Icon, IconPlacement};
pub use layout::{BlockLayout, LayoutStack};
