//! Elements with runtime attribute lists.

use maud::{Markup, PreEscaped, Render};

use super::attributes::HtmlAttributes;

/// Render `<tag attributes>content</tag>`.
///
/// `tag` is trusted; it always comes from this crate.
pub fn element(tag: &str, attributes: &HtmlAttributes, content: impl Render) -> Markup {
    let mut buffer = String::new();
    open_tag(tag, attributes, &mut buffer);
    content.render_to(&mut buffer);
    buffer.push_str("</");
    buffer.push_str(tag);
    buffer.push('>');
    PreEscaped(buffer)
}

/// Render a void element such as `<input attributes>`.
#[must_use]
pub fn void_element(tag: &str, attributes: &HtmlAttributes) -> Markup {
    let mut buffer = String::new();
    open_tag(tag, attributes, &mut buffer);
    PreEscaped(buffer)
}

fn open_tag(tag: &str, attributes: &HtmlAttributes, buffer: &mut String) {
    buffer.push('<');
    buffer.push_str(tag);
    attributes.render_to(buffer);
    buffer.push('>');
}
