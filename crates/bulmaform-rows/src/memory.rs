//! An in-memory HTML document.
//!
//! [`MemoryDocument`] is a small arena DOM that implements [`RowDocument`]. It is what the
//! row behaviors run against outside the browser: the CLI's `simulate` command and the tests.
//!
//! Parsing is lenient in the way HTML parsing is: void elements need no end tag, stray end
//! tags are ignored and unclosed elements are closed at the end of input. Only structural
//! breakage (an unterminated tag, comment or quoted value) is an error. Lookups do not
//! descend into `<template>` elements, whose children are inert content.

use std::fmt::{self, Write as _};

use tracing::trace;

use crate::contract::InsertPosition;
use crate::document::{RowDocument, RowEvent};
use crate::error::{Result, RowError};
use crate::selector::{ElementAccess, Selector};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

// Content is kept verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

// Content is text, entities are decoded.
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Handle to a node of a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Container,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena-backed HTML document.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    events: Vec<RowEvent<NodeId>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Container,
                parent: None,
                children: Vec::new(),
            }],
            events: Vec::new(),
        }
    }

    /// Parse `html` into a new document.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::Markup`] for unterminated tags, comments or attribute values.
    pub fn parse(html: &str) -> Result<Self> {
        let mut document = Self::new();
        document.parse_into(document.root(), html)?;
        Ok(document)
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Serialize the whole document.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root(), &mut out);
        out
    }

    /// Serialize `id` including its own tag.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::StaleElement`] if `id` does not belong to this document.
    pub fn outer_html(&self, id: NodeId) -> Result<String> {
        self.node(id)?;
        let mut out = String::new();
        self.write_node(id, &mut out);
        Ok(out)
    }

    /// Events dispatched so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[RowEvent<NodeId>] {
        &self.events
    }

    /// Drain the dispatched events.
    pub fn take_events(&mut self) -> Vec<RowEvent<NodeId>> {
        std::mem::take(&mut self.events)
    }

    /// Parent node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Child nodes in order. Empty for unknown handles.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// Child elements in order.
    #[must_use]
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.tag_name(child).is_some())
            .collect()
    }

    /// Attribute value by name.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Set or replace an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::StaleElement`] if `id` is not an element of this document.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let attributes = self.attributes_mut(id)?;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Check the element's class list.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.get_attribute(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Check whether `id` is attached to the document.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root() {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get(current.0) else {
                continue;
            };
            if let NodeKind::Text(text) = &node.kind {
                out.push_str(text);
            }
            pending.extend(node.children.iter().rev());
        }
        out
    }

    /// All elements below `scope` matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::InvalidSelector`] if the selector cannot be parsed.
    pub fn select_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendant_elements(scope)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect())
    }

    /// First element below `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::InvalidSelector`] if the selector cannot be parsed.
    pub fn select_first(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendant_elements(scope)
            .into_iter()
            .find(|&id| selector.matches(self, id)))
    }

    /// Detach `id` from its parent, returning the former parent.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::StaleElement`] for unknown handles and the document node.
    pub fn detach(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        if id == self.root() {
            return Err(RowError::StaleElement(
                "the document node cannot be removed".to_string(),
            ));
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|&child| child != id);
            self.nodes[id.0].parent = None;
        }
        Ok(parent)
    }

    /// Parse `html` and insert the resulting nodes relative to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::Markup`] for malformed markup, [`RowError::StaleElement`] if
    /// `target` is not an element, and [`RowError::Browser`] for `beforebegin`/`afterend`
    /// on a detached element.
    pub fn insert_html(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        html: &str,
    ) -> Result<Vec<NodeId>> {
        if self.tag_name(target).is_none() {
            return Err(RowError::StaleElement(format!("{target:?} is not an element")));
        }

        let (parent, index) = match position {
            InsertPosition::AfterBegin => (target, 0),
            InsertPosition::BeforeEnd => (target, self.nodes[target.0].children.len()),
            InsertPosition::BeforeBegin | InsertPosition::AfterEnd => {
                let parent = self.nodes[target.0].parent.ok_or_else(|| {
                    RowError::browser(format!("cannot insert {position} of a detached element"))
                })?;
                let index = self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|&child| child == target)
                    .unwrap_or_default();
                let offset = usize::from(position == InsertPosition::AfterEnd);
                (parent, index + offset)
            }
        };

        // Parse into a detached holder so a parse error leaves the document untouched.
        let holder = self.alloc(NodeKind::Container);
        self.parse_into(holder, html)?;
        let inserted = std::mem::take(&mut self.nodes[holder.0].children);
        for &id in &inserted {
            self.nodes[id.0].parent = Some(parent);
        }
        self.nodes[parent.0]
            .children
            .splice(index..index, inserted.iter().copied());

        trace!(
            position = %position,
            nodes = inserted.len(),
            "Inserted markup"
        );
        Ok(inserted)
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| RowError::StaleElement(format!("{id:?} does not exist")))
    }

    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Vec<(String, String)>> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element { attributes, .. }) => Ok(attributes),
            _ => Err(RowError::StaleElement(format!("{id:?} is not an element"))),
        }
    }

    fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn descendant_elements(&self, scope: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id.0];
            if let NodeKind::Element { tag, .. } = &node.kind {
                found.push(id);
                if tag != "template" {
                    pending.extend(node.children.iter().rev());
                }
            }
        }
        found
    }

    fn find_by_id(&self, value: &str) -> Option<NodeId> {
        self.descendant_elements(self.root())
            .into_iter()
            .find(|&id| self.get_attribute(id, "id") == Some(value))
    }

    fn find_closest(&self, id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        let mut current = self.tag_name(id).map(|_| id);
        while let Some(candidate) = current {
            if selector.matches(self, candidate) {
                return Ok(Some(candidate));
            }
            current = self.parent_of(candidate);
        }
        Ok(None)
    }

    fn push_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let classes = match self.get_attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", &classes)
    }

    fn parse_into(&mut self, parent: NodeId, html: &str) -> Result<()> {
        let mut stack = vec![parent];
        let mut pos = 0;

        while pos < html.len() {
            let rest = &html[pos..];
            let current = stack.last().copied().unwrap_or(parent);

            if let Some(body) = rest.strip_prefix("<!--") {
                let end = body
                    .find("-->")
                    .ok_or_else(|| RowError::markup(pos, "unterminated comment"))?;
                self.append(current, NodeKind::Comment(body[..end].to_string()));
                pos += 4 + end + 3;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                let end = rest
                    .find('>')
                    .ok_or_else(|| RowError::markup(pos, "unterminated declaration"))?;
                pos += end + 1;
            } else if let Some(body) = rest.strip_prefix("</") {
                let end = body
                    .find('>')
                    .ok_or_else(|| RowError::markup(pos, "unterminated end tag"))?;
                let name = body[..end].trim().to_ascii_lowercase();
                // Stray end tags are ignored; the parse root is never closed.
                if let Some(depth) = stack
                    .iter()
                    .rposition(|&id| self.tag_name(id) == Some(name.as_str()))
                {
                    if depth > 0 {
                        stack.truncate(depth);
                    }
                }
                pos += 2 + end + 1;
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                pos = self.parse_start_tag(html, pos, &mut stack)?;
            } else {
                let first = rest.chars().next().map_or(1, char::len_utf8);
                let len = rest[first..].find('<').map_or(rest.len(), |i| i + first);
                self.append(current, NodeKind::Text(decode_entities(&rest[..len])));
                pos += len;
            }
        }

        Ok(())
    }

    fn parse_start_tag(&mut self, html: &str, start: usize, stack: &mut Vec<NodeId>) -> Result<usize> {
        let unterminated = || RowError::markup(start, "unterminated start tag");

        let mut pos = start + 1;
        let name_len = html[pos..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(html.len() - pos);
        let tag = html[pos..pos + name_len].to_ascii_lowercase();
        pos += name_len;

        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;
        loop {
            pos += leading_whitespace(&html[pos..]);
            let rest = &html[pos..];
            if rest.is_empty() {
                return Err(unterminated());
            }
            if rest.starts_with("/>") {
                self_closing = true;
                pos += 2;
                break;
            }
            if rest.starts_with('>') {
                pos += 1;
                break;
            }
            if rest.starts_with('/') {
                pos += 1;
                continue;
            }

            let name_len = rest
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(rest.len())
                .max(1);
            let name = rest[..name_len].to_ascii_lowercase();
            pos += name_len;
            pos += leading_whitespace(&html[pos..]);

            let mut value = String::new();
            if html[pos..].starts_with('=') {
                pos += 1;
                pos += leading_whitespace(&html[pos..]);
                let rest = &html[pos..];
                match rest.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let end = rest[1..]
                            .find(quote)
                            .ok_or_else(|| RowError::markup(pos, "unterminated attribute value"))?;
                        value = decode_entities(&rest[1..=end]);
                        pos += end + 2;
                    }
                    Some(_) => {
                        let end = rest
                            .find(|c: char| c.is_whitespace() || c == '>')
                            .unwrap_or(rest.len());
                        value = decode_entities(&rest[..end]);
                        pos += end;
                    }
                    None => return Err(unterminated()),
                }
            }

            // The first occurrence of a duplicated attribute wins.
            if !attributes.iter().any(|(existing, _)| *existing == name) {
                attributes.push((name, value));
            }
        }

        let parent = stack.last().copied().unwrap_or_else(|| self.root());
        let element = self.append(
            parent,
            NodeKind::Element {
                tag: tag.clone(),
                attributes,
            },
        );

        if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
            return Ok(pos);
        }

        let raw = RAW_TEXT_ELEMENTS.contains(&tag.as_str());
        if raw || ESCAPABLE_RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let close = format!("</{tag}");
            let end = html[pos..]
                .to_ascii_lowercase()
                .find(&close)
                .ok_or_else(|| RowError::markup(start, format!("unterminated <{tag}> element")))?;
            let content = &html[pos..pos + end];
            if !content.is_empty() {
                let text = if raw {
                    content.to_string()
                } else {
                    decode_entities(content)
                };
                self.append(element, NodeKind::Text(text));
            }
            let after = pos + end;
            let gt = html[after..]
                .find('>')
                .ok_or_else(|| RowError::markup(after, "unterminated end tag"))?;
            return Ok(after + gt + 1);
        }

        stack.push(element);
        Ok(pos)
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Container => {
                for &child in &node.children {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in &node.children {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
            NodeKind::Text(text) => {
                let raw = node
                    .parent
                    .and_then(|parent| self.tag_name(parent))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeKind::Comment(comment) => {
                let _ = write!(out, "<!--{comment}-->");
            }
        }
    }
}

impl fmt::Display for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl ElementAccess for MemoryDocument {
    type Handle = NodeId;

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        MemoryDocument::tag_name(self, element)
    }

    fn attribute_value(&self, element: NodeId, name: &str) -> Option<&str> {
        self.get_attribute(element, name)
    }

    fn parent_of(&self, element: NodeId) -> Option<NodeId> {
        self.parent(element)
            .filter(|&parent| MemoryDocument::tag_name(self, parent).is_some())
    }
}

impl RowDocument for MemoryDocument {
    type Element = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.select_first(self.root(), selector)
    }

    fn query_selector_within(&self, scope: &NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.select_first(*scope, selector)
    }

    fn closest(&self, element: &NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.find_closest(*element, selector)
    }

    fn parent_element(&self, element: &NodeId) -> Option<NodeId> {
        self.parent_of(*element)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.get_attribute(*element, name).map(str::to_string)
    }

    fn inner_html(&self, element: &NodeId) -> Result<String> {
        let node = self.node(*element)?;
        let mut out = String::new();
        for &child in &node.children {
            self.write_node(child, &mut out);
        }
        Ok(out)
    }

    fn insert_adjacent_html(
        &mut self,
        target: &NodeId,
        position: InsertPosition,
        html: &str,
    ) -> Result<()> {
        self.insert_html(*target, position, html).map(|_| ())
    }

    fn remove(&mut self, element: &NodeId) -> Result<()> {
        self.detach(*element).map(|_| ())
    }

    // Sets the attribute; for hidden inputs the property and the attribute are the same.
    fn set_value(&mut self, element: &NodeId, value: &str) -> Result<()> {
        self.set_attribute(*element, "value", value)
    }

    fn add_class(&mut self, element: &NodeId, class: &str) -> Result<()> {
        self.push_class(*element, class)
    }

    fn dispatch(&mut self, event: RowEvent<NodeId>) -> Result<()> {
        self.node(event.subject)?;
        trace!(event = %event.name(), subject = ?event.subject, "Dispatched row event");
        self.events.push(event);
        Ok(())
    }
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (semi, c)));
        match decoded {
            Some((semi, c)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RowEventKind;

    const FORM: &str = concat!(
        r#"<form id="order"><div id="items-container">"#,
        r#"<div class="nested-row"><input type="hidden" name="order[items_attributes][0][_destroy]" value="false"></div>"#,
        r#"</div><template id="order_items_fields_template"><div class="nested-row" id="inside">NEW_RECORD</div></template></form>"#,
    );

    #[test]
    fn test_parse_and_serialize() {
        let doc = MemoryDocument::parse(FORM).unwrap();
        assert_eq!(doc.to_html(), FORM);
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let doc = MemoryDocument::parse(r#"<p>a<br>b<input name="x"/>c</p>"#).unwrap();
        assert_eq!(doc.to_html(), r#"<p>a<br>b<input name="x">c</p>"#);
    }

    #[test]
    fn test_bare_attributes_serialize_with_empty_value() {
        let doc = MemoryDocument::parse("<input required disabled=disabled>").unwrap();
        assert_eq!(doc.to_html(), r#"<input required="" disabled="disabled">"#);
    }

    #[test]
    fn test_entities_are_decoded_and_reescaped() {
        let doc = MemoryDocument::parse(r#"<p title="a &quot;b&quot; &amp; c">1 &lt; 2 &#38; &#x41;</p>"#)
            .unwrap();
        let p = doc.select_first(doc.root(), "p").unwrap().unwrap();
        assert_eq!(doc.get_attribute(p, "title"), Some(r#"a "b" & c"#));
        assert_eq!(doc.text_content(p), "1 < 2 & A");
        assert_eq!(
            doc.to_html(),
            r#"<p title="a &quot;b&quot; &amp; c">1 &lt; 2 &amp; A</p>"#
        );
    }

    #[test]
    fn test_unknown_entity_is_kept() {
        let doc = MemoryDocument::parse("<p>fish &chips; & more</p>").unwrap();
        let p = doc.select_first(doc.root(), "p").unwrap().unwrap();
        assert_eq!(doc.text_content(p), "fish &chips; & more");
    }

    #[test]
    fn test_multibyte_text() {
        let doc = MemoryDocument::parse("ünïcødé <b>ß</b>").unwrap();
        assert_eq!(doc.to_html(), "ünïcødé <b>ß</b>");
    }

    #[test]
    fn test_comments_and_doctype() {
        let doc = MemoryDocument::parse("<!DOCTYPE html><!-- note --><p>x</p>").unwrap();
        assert_eq!(doc.to_html(), "<!-- note --><p>x</p>");
    }

    #[test]
    fn test_script_content_is_raw() {
        let html = "<script>if (a < b && c) {}</script>";
        let doc = MemoryDocument::parse(html).unwrap();
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = MemoryDocument::parse("<div>a</span>b</div>").unwrap();
        assert_eq!(doc.to_html(), "<div>ab</div>");
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let doc = MemoryDocument::parse("<div><p>text").unwrap();
        assert_eq!(doc.to_html(), "<div><p>text</p></div>");
    }

    #[test]
    fn test_malformed_markup() {
        for html in ["<div class=\"x>", "<!-- open", "<input name=x", "</div"] {
            let err = MemoryDocument::parse(html).unwrap_err();
            assert!(matches!(err, RowError::Markup { .. }), "{html:?}");
        }
    }

    #[test]
    fn test_lookups_skip_template_content() {
        let doc = MemoryDocument::parse(FORM).unwrap();
        assert!(doc.element_by_id("inside").is_none());
        assert!(doc.element_by_id("order_items_fields_template").is_some());
        assert_eq!(doc.select_all(doc.root(), ".nested-row").unwrap().len(), 1);
    }

    #[test]
    fn test_template_inner_html() {
        let doc = MemoryDocument::parse(FORM).unwrap();
        let template = doc.element_by_id("order_items_fields_template").unwrap();
        assert_eq!(
            doc.inner_html(&template).unwrap(),
            r#"<div class="nested-row" id="inside">NEW_RECORD</div>"#
        );
    }

    #[test]
    fn test_closest() {
        let doc = MemoryDocument::parse(FORM).unwrap();
        let input = doc.query_selector("input").unwrap().unwrap();
        let row = doc.closest(&input, ".nested-row").unwrap().unwrap();
        assert!(doc.has_class(row, "nested-row"));
        assert_eq!(doc.closest(&input, "input").unwrap(), Some(input));
        assert_eq!(doc.closest(&input, "table").unwrap(), None);
    }

    #[test]
    fn test_insert_positions() {
        let mut doc = MemoryDocument::parse(r#"<main><ul id="list"><li>b</li></ul></main>"#).unwrap();
        let list = doc.element_by_id("list").unwrap();

        doc.insert_adjacent_html(&list, InsertPosition::AfterBegin, "<li>a</li>")
            .unwrap();
        doc.insert_adjacent_html(&list, InsertPosition::BeforeEnd, "<li>c</li>")
            .unwrap();
        doc.insert_adjacent_html(&list, InsertPosition::BeforeBegin, "<h1>t</h1>")
            .unwrap();
        doc.insert_adjacent_html(&list, InsertPosition::AfterEnd, "<p>end</p>")
            .unwrap();

        assert_eq!(
            doc.to_html(),
            r#"<main><h1>t</h1><ul id="list"><li>a</li><li>b</li><li>c</li></ul><p>end</p></main>"#
        );
    }

    #[test]
    fn test_insert_parse_error_leaves_document_untouched() {
        let mut doc = MemoryDocument::parse(r#"<div id="c"></div>"#).unwrap();
        let container = doc.element_by_id("c").unwrap();
        let before = doc.to_html();

        assert!(doc
            .insert_adjacent_html(&container, InsertPosition::BeforeEnd, "<p class=\"x>")
            .is_err());
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_insert_next_to_detached_element_fails() {
        let mut doc = MemoryDocument::parse(r#"<div id="c"></div>"#).unwrap();
        let container = doc.element_by_id("c").unwrap();
        doc.detach(container).unwrap();

        let err = doc
            .insert_adjacent_html(&container, InsertPosition::AfterEnd, "<p></p>")
            .unwrap_err();
        assert!(matches!(err, RowError::Browser(_)));
    }

    #[test]
    fn test_remove_detaches() {
        let mut doc = MemoryDocument::parse(FORM).unwrap();
        let row = doc.query_selector(".nested-row").unwrap().unwrap();
        let container = doc.parent(row).unwrap();

        assert_eq!(doc.detach(row).unwrap(), Some(container));
        assert!(!doc.is_connected(row));
        assert!(doc.element_children(container).is_empty());
        assert!(doc.query_selector(".nested-row").unwrap().is_none());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        assert!(doc.remove(&root).is_err());
    }

    #[test]
    fn test_set_value_and_add_class() {
        let mut doc = MemoryDocument::parse(FORM).unwrap();
        let row = doc.query_selector(".nested-row").unwrap().unwrap();
        let input = doc.query_selector_within(&row, "input").unwrap().unwrap();

        doc.set_value(&input, "true").unwrap();
        doc.add_class(&row, "is-hidden").unwrap();
        doc.add_class(&row, "is-hidden").unwrap();

        assert_eq!(doc.attribute(&input, "value").as_deref(), Some("true"));
        assert_eq!(doc.get_attribute(row, "class"), Some("nested-row is-hidden"));
    }

    #[test]
    fn test_add_class_without_class_attribute() {
        let mut doc = MemoryDocument::parse("<div></div>").unwrap();
        let div = doc.query_selector("div").unwrap().unwrap();
        doc.add_class(&div, "is-hidden").unwrap();
        assert_eq!(doc.to_html(), r#"<div class="is-hidden"></div>"#);
    }

    #[test]
    fn test_dispatch_records_events() {
        let mut doc = MemoryDocument::parse("<div></div>").unwrap();
        let div = doc.query_selector("div").unwrap().unwrap();
        doc.dispatch(RowEvent {
            controller: "c".to_string(),
            kind: RowEventKind::RowRemoved,
            subject: div,
        })
        .unwrap();

        assert_eq!(doc.events().len(), 1);
        assert_eq!(doc.take_events()[0].name(), "c:row-removed");
        assert!(doc.events().is_empty());
    }

    #[test]
    fn test_stale_handle() {
        let mut doc = MemoryDocument::new();
        let other = MemoryDocument::parse("<a></a><b></b>").unwrap();
        let foreign = other.query_selector("b").unwrap().unwrap();
        assert!(matches!(
            doc.set_value(&foreign, "x"),
            Err(RowError::StaleElement(_))
        ));
    }
}
