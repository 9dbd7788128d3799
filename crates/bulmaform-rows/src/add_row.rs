//! The add-row behavior.
//!
//! Clicking an add button clones the markup of a `<template>` element, gives it a fresh token
//! in place of the sentinel, and inserts it into a container element.

use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::contract::{
    value_attribute, InsertPosition, ADD_ROW_CONTROLLER, CONTAINER_SELECTOR_KEY, MIXIN_KEY,
    POSITION_KEY, SENTINEL, SENTINEL_KEY, TEMPLATE_ID_KEY,
};
use crate::document::{RowDocument, TriggerEvent};
use crate::error::{Result, RowError};
use crate::extension::{AddRowExtension, ExtensionRegistry};
use crate::template::TokenTemplate;
use crate::token::{ClockTokens, TokenSource};

/// Values an add button carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRowConfig {
    /// Id of the `<template>` element holding the row markup.
    pub template_id: String,
    /// Selector of the element rows are inserted relative to.
    pub container_selector: String,
    /// Where rows are inserted.
    pub position: InsertPosition,
    /// Name of an extension to resolve from the registry.
    pub mixin: Option<String>,
    /// Placeholder replaced in the template markup.
    pub sentinel: String,
}

impl AddRowConfig {
    /// Create a configuration with the default position and sentinel.
    pub fn new(template_id: impl Into<String>, container_selector: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            container_selector: container_selector.into(),
            position: InsertPosition::default(),
            mixin: None,
            sentinel: SENTINEL.to_string(),
        }
    }

    /// Set the insertion position.
    #[must_use]
    pub fn with_position(mut self, position: InsertPosition) -> Self {
        self.position = position;
        self
    }

    /// Set the extension name.
    #[must_use]
    pub fn with_mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixin = Some(mixin.into());
        self
    }

    /// Set the sentinel.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Read the configuration from the `data-…-value` attributes of a controller element.
    ///
    /// `value` looks up an attribute by its full name. Empty position, mixin and sentinel
    /// values count as absent; an absent sentinel is [`SENTINEL`].
    ///
    /// # Errors
    ///
    /// Returns [`RowError::MissingValue`] when the template id or container selector is
    /// missing, and [`RowError::InvalidPosition`] for an unknown position.
    pub fn from_values<F>(value: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            value(&value_attribute(ADD_ROW_CONTROLLER, key)).filter(|v| !v.is_empty())
        };
        let template_id =
            read(TEMPLATE_ID_KEY).ok_or_else(|| RowError::missing_value(ADD_ROW_CONTROLLER, TEMPLATE_ID_KEY))?;
        let container_selector = read(CONTAINER_SELECTOR_KEY)
            .ok_or_else(|| RowError::missing_value(ADD_ROW_CONTROLLER, CONTAINER_SELECTOR_KEY))?;

        let mut config = Self::new(template_id, container_selector);
        if let Some(position) = read(POSITION_KEY) {
            config.position = position.parse()?;
        }
        config.mixin = read(MIXIN_KEY);
        if let Some(sentinel) = read(SENTINEL_KEY) {
            config.sentinel = sentinel;
        }
        Ok(config)
    }
}

/// What an add did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A row was inserted using `token`.
    Inserted {
        /// The token that replaced the sentinel.
        token: String,
    },
    /// The extension vetoed the add.
    Vetoed,
}

/// An initialized add-row behavior.
pub struct AddRowController<E, T = ClockTokens> {
    config: AddRowConfig,
    extension: Option<Rc<dyn AddRowExtension<E>>>,
    tokens: T,
}

impl<E, T: fmt::Debug> fmt::Debug for AddRowController<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddRowController")
            .field("config", &self.config)
            .field("extension", &self.extension.is_some())
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl<E> AddRowController<E, ClockTokens> {
    /// Initialize the behavior, resolving the configured extension.
    ///
    /// An extension name that is not registered is logged and ignored.
    pub fn new(config: AddRowConfig, registry: &ExtensionRegistry<E>) -> Self {
        Self::with_tokens(config, registry, ClockTokens::new())
    }
}

impl<E, T: TokenSource> AddRowController<E, T> {
    /// Initialize the behavior with a specific token source.
    pub fn with_tokens(config: AddRowConfig, registry: &ExtensionRegistry<E>, tokens: T) -> Self {
        let extension = config.mixin.as_deref().and_then(|name| {
            let found = registry.resolve(ADD_ROW_CONTROLLER, name);
            if found.is_none() {
                warn!(
                    mixin = %name,
                    controller = ADD_ROW_CONTROLLER,
                    "Extension not registered, continuing without it"
                );
            }
            found
        });

        Self {
            config,
            extension,
            tokens,
        }
    }

    /// The configuration this behavior was built from.
    pub fn config(&self) -> &AddRowConfig {
        &self.config
    }

    /// Check whether an extension was resolved.
    pub fn has_extension(&self) -> bool {
        self.extension.is_some()
    }

    /// Insert one new row.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::TemplateNotFound`] or [`RowError::ContainerNotFound`] when the
    /// configured elements do not exist, and any error from parsing or inserting the markup.
    pub fn add<D>(&mut self, document: &mut D, event: &TriggerEvent<E>) -> Result<AddOutcome>
    where
        D: RowDocument<Element = E>,
    {
        let template = document.element_by_id(&self.config.template_id).ok_or_else(|| {
            RowError::TemplateNotFound {
                id: self.config.template_id.clone(),
            }
        })?;
        let mut content = document.inner_html(&template)?;

        if let Some(extension) = &self.extension {
            if !extension.before_add(event, &mut content) {
                debug!(template = %self.config.template_id, "Add vetoed by extension");
                return Ok(AddOutcome::Vetoed);
            }
        }

        let template = TokenTemplate::new(content, self.config.sentinel.as_str())?;
        if template.occurrences() == 0 {
            warn!(
                template = %self.config.template_id,
                sentinel = %self.config.sentinel,
                "Template does not contain the sentinel; rows will share names"
            );
        }
        let instance = template.instantiate(&mut self.tokens)?;

        let container = document
            .query_selector(&self.config.container_selector)?
            .ok_or_else(|| RowError::ContainerNotFound {
                selector: self.config.container_selector.clone(),
            })?;
        document.insert_adjacent_html(&container, self.config.position, &instance.markup)?;

        debug!(
            template = %self.config.template_id,
            container = %self.config.container_selector,
            position = %self.config.position,
            token = %instance.token,
            "Added row"
        );
        Ok(AddOutcome::Inserted {
            token: instance.token,
        })
    }
}
