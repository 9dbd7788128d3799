//! Named extensions for the add-row behavior.
//!
//! An application registers extension objects under a controller identifier and a name. An
//! add button that carries a mixin name gets the matching extension when its controller is
//! constructed; the lookup happens once, not on every click.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::document::TriggerEvent;

/// Hooks an application can attach to the add-row behavior.
pub trait AddRowExtension<E> {
    /// Called with the cloned template markup before the sentinel is substituted.
    ///
    /// The markup may be edited in place. Returning `false` aborts the add and leaves the
    /// document untouched.
    fn before_add(&self, event: &TriggerEvent<E>, content: &mut String) -> bool {
        let _ = (event, content);
        true
    }
}

/// Wraps a closure as a `before_add` extension.
pub struct BeforeAdd<F>(pub F);

impl<F> fmt::Debug for BeforeAdd<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeforeAdd").finish_non_exhaustive()
    }
}

impl<E, F> AddRowExtension<E> for BeforeAdd<F>
where
    F: Fn(&TriggerEvent<E>, &mut String) -> bool,
{
    fn before_add(&self, event: &TriggerEvent<E>, content: &mut String) -> bool {
        (self.0)(event, content)
    }
}

/// Extensions keyed by controller identifier, then by name.
pub struct ExtensionRegistry<E> {
    extensions: HashMap<String, HashMap<String, Rc<dyn AddRowExtension<E>>>>,
}

impl<E> Default for ExtensionRegistry<E> {
    fn default() -> Self {
        Self {
            extensions: HashMap::new(),
        }
    }
}

impl<E> fmt::Debug for ExtensionRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .extensions
            .iter()
            .flat_map(|(controller, named)| {
                named.keys().map(move |name| format!("{controller}/{name}"))
            })
            .collect();
        names.sort();
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &names)
            .finish()
    }
}

impl<E> ExtensionRegistry<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `extension` as `name` for `controller`, replacing any previous one.
    pub fn register(
        &mut self,
        controller: impl Into<String>,
        name: impl Into<String>,
        extension: impl AddRowExtension<E> + 'static,
    ) -> &mut Self {
        self.extensions
            .entry(controller.into())
            .or_default()
            .insert(name.into(), Rc::new(extension));
        self
    }

    /// Look up an extension.
    #[must_use]
    pub fn resolve(&self, controller: &str, name: &str) -> Option<Rc<dyn AddRowExtension<E>>> {
        self.extensions.get(controller)?.get(name).cloned()
    }

    /// Number of registered extensions across all controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.values().map(HashMap::len).sum()
    }

    /// Check whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ADD_ROW_CONTROLLER, DELETE_ROW_CONTROLLER};

    struct Noop;

    impl AddRowExtension<()> for Noop {}

    #[test]
    fn test_default_hook_allows_add() {
        let mut content = "<p></p>".to_string();
        assert!(Noop.before_add(&TriggerEvent::new(()), &mut content));
        assert_eq!(content, "<p></p>");
    }

    #[test]
    fn test_closure_extension() {
        let veto = BeforeAdd(|_: &TriggerEvent<()>, content: &mut String| {
            content.push_str("<hr>");
            false
        });
        let mut content = String::new();
        assert!(!veto.before_add(&TriggerEvent::new(()), &mut content));
        assert_eq!(content, "<hr>");
    }

    #[test]
    fn test_resolve_is_scoped_by_controller() {
        let mut registry = ExtensionRegistry::new();
        registry.register(ADD_ROW_CONTROLLER, "noop", Noop);

        assert!(registry.resolve(ADD_ROW_CONTROLLER, "noop").is_some());
        assert!(registry.resolve(DELETE_ROW_CONTROLLER, "noop").is_none());
        assert!(registry.resolve(ADD_ROW_CONTROLLER, "other").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("b", "two", Noop)
            .register("a", "one", Noop);
        assert_eq!(
            format!("{registry:?}"),
            r#"ExtensionRegistry { extensions: ["a/one", "b/two"] }"#
        );
    }
}
