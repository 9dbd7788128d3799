//! Ordered HTML attribute lists.
//!
//! `maud` fixes attribute names at compile time, but form components receive passthrough
//! attributes (`data-*`, `aria-*`, arbitrary classes) from callers. [`HtmlAttributes`] carries
//! those and renders them with escaped values.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use maud::{Escaper, Render};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Attributes whose values are whitespace-separated token lists. Mixing appends to them.
const TOKEN_LIST_ATTRIBUTES: &[&str] = &["class", "data-controller", "data-action"];

/// An insertion-ordered set of HTML attributes.
///
/// Serializes as a JSON object (sorted by name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct HtmlAttributes {
    entries: Vec<(String, String)>,
}

impl HtmlAttributes {
    /// An empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// The value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `name` is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Append classes, skipping ones already present.
    pub fn add_class(&mut self, classes: &str) -> &mut Self {
        self.append_tokens("class", classes)
    }

    /// Builder form of [`add_class`](Self::add_class).
    #[must_use]
    pub fn with_class(mut self, classes: &str) -> Self {
        self.add_class(classes);
        self
    }

    /// Set a `data-*` attribute. Underscores in `key` become dashes.
    pub fn data(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.set(data_attribute_name(key), value)
    }

    /// Merge `other` into `self`.
    ///
    /// Token-list attributes (`class`, `data-controller`, `data-action`) are concatenated;
    /// everything else from `other` overrides.
    pub fn mix(&mut self, other: &HtmlAttributes) -> &mut Self {
        for (name, value) in &other.entries {
            if TOKEN_LIST_ATTRIBUTES.contains(&name.as_str()) {
                self.append_tokens(name, value);
            } else {
                self.set(name.clone(), value.clone());
            }
        }
        self
    }

    /// Builder form of [`mix`](Self::mix).
    #[must_use]
    pub fn mixed(mut self, other: &HtmlAttributes) -> Self {
        self.mix(other);
        self
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    fn append_tokens(&mut self, name: &str, tokens: &str) -> &mut Self {
        let Some(existing) = self.entries.iter_mut().find(|(n, _)| n == name) else {
            let joined = tokens.split_whitespace().collect::<Vec<_>>().join(" ");
            self.entries.push((name.to_string(), joined));
            return self;
        };
        for token in tokens.split_whitespace() {
            if !existing.1.split_whitespace().any(|t| t == token) {
                if !existing.1.is_empty() {
                    existing.1.push(' ');
                }
                existing.1.push_str(token);
            }
        }
        self
    }
}

/// The attribute name for a `data-*` key.
///
/// ```
/// use bulmaform::markup::data_attribute_name;
///
/// assert_eq!(data_attribute_name("row_selector"), "data-row-selector");
/// ```
#[must_use]
pub fn data_attribute_name(key: &str) -> String {
    format!("data-{}", key.replace('_', "-"))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

impl Render for HtmlAttributes {
    fn render_to(&self, buffer: &mut String) {
        for (name, value) in &self.entries {
            if !is_valid_name(name) {
                warn!(attribute = %name, "Skipping invalid attribute name");
                continue;
            }
            buffer.push(' ');
            buffer.push_str(name);
            buffer.push_str("=\"");
            // Writing into a String cannot fail.
            let _ = Escaper::new(buffer).write_str(value);
            buffer.push('"');
        }
    }
}

impl<N, V> FromIterator<(N, V)> for HtmlAttributes
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.set(name, value);
        }
        attributes
    }
}

impl From<BTreeMap<String, String>> for HtmlAttributes {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<HtmlAttributes> for BTreeMap<String, String> {
    fn from(attributes: HtmlAttributes) -> Self {
        attributes.entries.into_iter().collect()
    }
}
