//! Button contents: optional icons around a label.

use maud::{html, Markup, Render};
use serde::{Deserialize, Serialize};

use super::icon::Icon;

/// Caller-facing label options shared by the row buttons.
///
/// `icon` is shorthand for `icon_left`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLabel {
    /// Label text.
    pub label: Option<String>,
    /// Left icon class, when `icon_left` is not given.
    pub icon: Option<String>,
    /// Left icon class.
    pub icon_left: Option<String>,
    /// Right icon class.
    pub icon_right: Option<String>,
}

impl ButtonLabel {
    /// A text-only label.
    #[must_use]
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Set the left icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon_left = Some(icon.into());
        self
    }

    /// The effective left icon.
    #[must_use]
    pub fn left_icon(&self) -> Option<&str> {
        self.icon_left.as_deref().or(self.icon.as_deref())
    }

    /// Contents for a button, with `span`-wrapped text. Icons are dropped when
    /// `icons` is false.
    #[must_use]
    pub fn contents(&self, icons: bool) -> FormButtonLabel<'_> {
        let label = FormButtonLabel::spanned(self.label.as_deref().unwrap_or_default());
        if icons {
            label.with_icons(self.left_icon(), self.icon_right.as_deref())
        } else {
            label
        }
    }
}

/// Rendered button contents: `[icon] label [icon]`.
#[derive(Debug, Clone)]
pub struct FormButtonLabel<'a> {
    content: Markup,
    icon_left: Option<&'a str>,
    icon_right: Option<&'a str>,
}

impl<'a> FormButtonLabel<'a> {
    /// Bare text.
    #[must_use]
    pub fn text(label: &str) -> Self {
        Self::from_markup(html! { (label) })
    }

    /// Text in a `span`, so it lines up with icon spans.
    #[must_use]
    pub fn spanned(label: &str) -> Self {
        Self::from_markup(html! { span { (label) } })
    }

    /// Arbitrary block output.
    #[must_use]
    pub fn from_markup(content: Markup) -> Self {
        Self {
            content,
            icon_left: None,
            icon_right: None,
        }
    }

    /// Add icons around the content.
    #[must_use]
    pub fn with_icons(mut self, left: Option<&'a str>, right: Option<&'a str>) -> Self {
        self.icon_left = left;
        self.icon_right = right;
        self
    }
}

impl Render for FormButtonLabel<'_> {
    fn render(&self) -> Markup {
        html! {
            @if let Some(icon) = self.icon_left {
                (Icon::new(icon))
            }
            (self.content)
            @if let Some(icon) = self.icon_right {
                (Icon::new(icon))
            }
        }
    }
}
