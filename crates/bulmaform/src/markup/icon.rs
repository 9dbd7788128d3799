//! Bulma icon spans.

use maud::{html, Markup, Render};

/// Where an icon sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconPlacement {
    /// Inline with text, e.g. inside a button.
    #[default]
    Inline,
    /// Left edge of an input control.
    Left,
    /// Right edge of an input control.
    Right,
}

impl IconPlacement {
    fn span_class(self) -> &'static str {
        match self {
            Self::Inline => "icon",
            Self::Left => "icon is-small is-left",
            Self::Right => "icon is-small is-right",
        }
    }
}

/// `span.icon > i.{class}`.
///
/// ```
/// use bulmaform::markup::Icon;
/// use maud::Render;
///
/// assert_eq!(
///     Icon::new("fas fa-plus").render().into_string(),
///     r#"<span class="icon"><i class="fas fa-plus"></i></span>"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon<'a> {
    class: &'a str,
    placement: IconPlacement,
}

impl<'a> Icon<'a> {
    /// An inline icon.
    #[must_use]
    pub fn new(class: &'a str) -> Self {
        Self {
            class,
            placement: IconPlacement::Inline,
        }
    }

    /// An icon on the left edge of an input.
    #[must_use]
    pub fn left(class: &'a str) -> Self {
        Self {
            class,
            placement: IconPlacement::Left,
        }
    }

    /// An icon on the right edge of an input.
    #[must_use]
    pub fn right(class: &'a str) -> Self {
        Self {
            class,
            placement: IconPlacement::Right,
        }
    }

    /// The icon's placement.
    #[must_use]
    pub fn placement(&self) -> IconPlacement {
        self.placement
    }
}

impl Render for Icon<'_> {
    fn render(&self) -> Markup {
        html! {
            span class=(self.placement.span_class()) {
                i class=(self.class) {}
            }
        }
    }
}
