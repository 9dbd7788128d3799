//! Render-scoped bookkeeping for deferred row templates.
//!
//! Nested-fields blocks and add buttons can appear in either order. Both register here under
//! the same [`TemplateKey`]; the form's finish step builds a template for every key that has
//! both a block and a button.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use maud::Markup;
use tracing::debug;

use crate::error::{Error, Result};
use crate::form::{FieldsForOptions, FormBuilder};
use crate::markup::LayoutStack;
use crate::record::Record;

/// Renders one nested row for the given child builder.
pub type RowBlock = Rc<dyn Fn(&FormBuilder) -> Result<Markup>>;

/// Identifies one association of one form object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateKey {
    /// Object name of the builder that owns the association.
    pub object_name: String,
    /// Association name.
    pub association: String,
}

impl TemplateKey {
    /// Key for `association` on `object_name`.
    #[must_use]
    pub fn new(object_name: impl Into<String>, association: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            association: association.into(),
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object_name, self.association)
    }
}

/// A captured nested-fields block waiting for its template to be built.
pub struct PendingTemplate {
    /// Id the template element will carry.
    pub template_id: String,
    /// Options the block was rendered with.
    pub options: FieldsForOptions,
    /// The row block.
    pub block: RowBlock,
    /// Record the template row is rendered for.
    pub prototype: Record,
    /// Layout blocks open when the block was registered.
    pub layout: LayoutStack,
    /// Number of templates enclosing the registering builder.
    pub depth: usize,
}

impl fmt::Debug for PendingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTemplate")
            .field("template_id", &self.template_id)
            .field("options", &self.options)
            .field("prototype", &self.prototype)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// Pending blocks and rendered add buttons of one form render.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    pending: BTreeMap<TemplateKey, PendingTemplate>,
    buttons: BTreeSet<TemplateKey>,
    built: BTreeSet<TemplateKey>,
}

impl TemplateRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a nested-fields block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateNestedFields`] if a block is already registered (or was
    /// already built) for `key`.
    pub fn register(&mut self, key: TemplateKey, template: PendingTemplate) -> Result<()> {
        if self.pending.contains_key(&key) || self.built.contains(&key) {
            return Err(Error::duplicate_nested_fields(
                key.association,
                template.template_id,
            ));
        }
        debug!(key = %key, template_id = %template.template_id, "Registered nested fields");
        self.pending.insert(key, template);
        Ok(())
    }

    /// Record that an add button was rendered for `key`. Returns false if one already was.
    pub fn register_button(&mut self, key: TemplateKey) -> bool {
        if self.buttons.contains(&key) {
            return false;
        }
        debug!(key = %key, "Registered add button");
        self.buttons.insert(key)
    }

    /// Remove and return every pending block that has a button.
    pub fn take_ready(&mut self) -> Vec<(TemplateKey, PendingTemplate)> {
        self.take_ready_where(|_| true)
    }

    /// Like [`take_ready`](Self::take_ready), limited to keys whose object is `scope` or
    /// nested under it.
    pub fn take_ready_within(&mut self, scope: &str) -> Vec<(TemplateKey, PendingTemplate)> {
        self.take_ready_where(|key| {
            key.object_name
                .strip_prefix(scope)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('['))
        })
    }

    fn take_ready_where<F>(&mut self, in_scope: F) -> Vec<(TemplateKey, PendingTemplate)>
    where
        F: Fn(&TemplateKey) -> bool,
    {
        let ready: Vec<TemplateKey> = self
            .pending
            .keys()
            .filter(|key| self.buttons.contains(*key) && in_scope(key))
            .cloned()
            .collect();

        ready
            .into_iter()
            .filter_map(|key| {
                let template = self.pending.remove(&key)?;
                self.built.insert(key.clone());
                Some((key, template))
            })
            .collect()
    }

    /// Buttons with no block registered or built.
    pub fn unmatched_buttons(&self) -> impl Iterator<Item = &TemplateKey> {
        self.buttons
            .iter()
            .filter(move |key| !self.pending.contains_key(*key) && !self.built.contains(*key))
    }

    /// Blocks that never got a button.
    pub fn unused_blocks(&self) -> impl Iterator<Item = &TemplateKey> {
        self.pending
            .keys()
            .filter(move |key| !self.buttons.contains(*key))
    }

    /// Whether a template has been built for `key`.
    #[must_use]
    pub fn is_built(&self, key: &TemplateKey) -> bool {
        self.built.contains(key)
    }
}
