//! The form builder and its options.

mod builder;
mod naming;
mod options;

pub use builder::FormBuilder;
pub use naming::{
    child_object_name, field_id, field_name, humanize, sanitized_object_name, template_id,
};
pub use options::{AddButtonOptions, DeleteButtonOptions, FieldsForOptions, InputOptions, InputType};
