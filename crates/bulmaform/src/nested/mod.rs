//! Nested dynamic rows on the server side: the template registry and the row buttons.

mod buttons;
mod registry;

pub use buttons::{NestedFormAddButton, NestedFormDeleteButton};
pub use registry::{PendingTemplate, RowBlock, TemplateKey, TemplateRegistry};
