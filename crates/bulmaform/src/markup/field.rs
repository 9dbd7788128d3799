//! `div.field` and `div.control` wrappers.

use maud::{html, Markup, Render};

use super::icon::Icon;

/// How a field participates in the enclosing layout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldLayout {
    /// A plain stacked field.
    #[default]
    Plain,
    /// A column inside `div.columns`.
    Column,
    /// A cell inside `div.grid`.
    Cell,
}

impl FieldLayout {
    fn field_class(self) -> &'static str {
        match self {
            Self::Plain => "field",
            Self::Column => "field column",
            Self::Cell => "field cell",
        }
    }
}

/// `div.control`, with optional icons after the wrapped content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormControl {
    icon_left: Option<String>,
    icon_right: Option<String>,
}

impl FormControl {
    /// A control without icons.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `icon` on the left edge.
    #[must_use]
    pub fn with_icon_left(mut self, icon: Option<impl Into<String>>) -> Self {
        self.icon_left = icon.map(Into::into);
        self
    }

    /// Show `icon` on the right edge.
    #[must_use]
    pub fn with_icon_right(mut self, icon: Option<impl Into<String>>) -> Self {
        self.icon_right = icon.map(Into::into);
        self
    }

    fn class(&self) -> String {
        let mut class = String::from("control");
        if self.icon_left.is_some() {
            class.push_str(" has-icons-left");
        }
        if self.icon_right.is_some() {
            class.push_str(" has-icons-right");
        }
        class
    }

    /// Wrap `content` in the control.
    pub fn wrap(&self, content: impl Render) -> Markup {
        html! {
            div class=(self.class()) {
                (content)
                @if let Some(icon) = &self.icon_left {
                    (Icon::left(icon))
                }
                @if let Some(icon) = &self.icon_right {
                    (Icon::right(icon))
                }
            }
        }
    }
}

/// `div.field`: optional label, a control, optional help text.
#[derive(Debug, Clone, Default)]
pub struct FormField {
    label: Option<Markup>,
    help: Option<String>,
    layout: FieldLayout,
    control: FormControl,
}

impl FormField {
    /// A field with no label.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `label` before the control.
    #[must_use]
    pub fn with_label(mut self, label: Option<Markup>) -> Self {
        self.label = label;
        self
    }

    /// Render `help` as `p.help` after the control.
    #[must_use]
    pub fn with_help(mut self, help: Option<impl Into<String>>) -> Self {
        self.help = help.map(Into::into);
        self
    }

    /// Set the layout class.
    #[must_use]
    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Use `control` around the content.
    #[must_use]
    pub fn with_control(mut self, control: FormControl) -> Self {
        self.control = control;
        self
    }

    /// Render the field around `content`.
    pub fn render_with(&self, content: impl Render) -> Markup {
        html! {
            div class=(self.layout.field_class()) {
                @if let Some(label) = &self.label {
                    (label)
                }
                (self.control.wrap(content))
                @if let Some(help) = &self.help {
                    p class="help" { (help) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::PreEscaped;

    #[test]
    fn test_plain_field() {
        let html = FormField::new()
            .render_with(PreEscaped("<input>"))
            .into_string();
        assert_eq!(
            html,
            r#"<div class="field"><div class="control"><input></div></div>"#
        );
    }

    #[test]
    fn test_field_with_label_help_and_layout() {
        let html = FormField::new()
            .with_label(Some(html! { label class="label" { "Name" } }))
            .with_help(Some("Required"))
            .with_layout(FieldLayout::Column)
            .render_with(PreEscaped("<input>"))
            .into_string();
        assert_eq!(
            html,
            concat!(
                r#"<div class="field column"><label class="label">Name</label>"#,
                r#"<div class="control"><input></div><p class="help">Required</p></div>"#
            )
        );
    }

    #[test]
    fn test_control_icons_follow_content() {
        let html = FormControl::new()
            .with_icon_left(Some("fas fa-user"))
            .with_icon_right(Some("fas fa-check"))
            .wrap(PreEscaped("<input>"))
            .into_string();
        assert!(html.starts_with(r#"<div class="control has-icons-left has-icons-right"><input>"#));
        assert!(html.find("is-left").unwrap() < html.find("is-right").unwrap());
    }

    #[test]
    fn test_cell_layout() {
        let html = FormField::new()
            .with_layout(FieldLayout::Cell)
            .render_with("x")
            .into_string();
        assert!(html.starts_with(r#"<div class="field cell">"#));
    }
}
