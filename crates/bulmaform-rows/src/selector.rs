//! CSS selectors for the in-memory document.
//!
//! Supports the subset row behaviors rely on: type, universal, `#id`, `.class`, attribute
//! matchers (`[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`), descendant and child
//! combinators, and comma separated selector lists. Pseudo-classes are rejected.

use crate::error::{Result, RowError};

/// Read access to elements, as needed to match selectors.
pub trait ElementAccess {
    /// Handle to an element.
    type Handle: Copy;

    /// Lowercase tag name, or `None` if the handle is not an element.
    fn tag_name(&self, element: Self::Handle) -> Option<&str>;

    /// Attribute value by name.
    fn attribute_value(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// Parent element, if the parent is an element.
    fn parent_of(&self, element: Self::Handle) -> Option<Self::Handle>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOp {
    Exists,
    Equals,
    Word,
    Prefix,
    Suffix,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatcher {
    name: String,
    op: AttributeOp,
    value: String,
}

impl AttributeMatcher {
    fn matches(&self, actual: &str) -> bool {
        match self.op {
            AttributeOp::Exists => true,
            AttributeOp::Equals => actual == self.value,
            AttributeOp::Word => actual.split_whitespace().any(|word| word == self.value),
            // Empty values never match for the substring operators.
            AttributeOp::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttributeOp::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
            AttributeOp::Contains => !self.value.is_empty() && actual.contains(&self.value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatcher>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches<A: ElementAccess + ?Sized>(&self, access: &A, element: A::Handle) -> bool {
        let Some(tag) = access.tag_name(element) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if expected != "*" && !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if access.attribute_value(element, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let classes = access.attribute_value(element, "class").unwrap_or_default();
            if !self
                .classes
                .iter()
                .all(|class| classes.split_whitespace().any(|c| c == class))
            {
                return false;
            }
        }
        self.attributes.iter().all(|matcher| {
            access
                .attribute_value(element, &matcher.name)
                .is_some_and(|actual| matcher.matches(actual))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    // Left to right; the combinator of the first part is unused.
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches<A: ElementAccess + ?Sized>(&self, access: &A, element: A::Handle) -> bool {
        self.matches_at(access, element, self.parts.len() - 1)
    }

    fn matches_at<A: ElementAccess + ?Sized>(
        &self,
        access: &A,
        element: A::Handle,
        index: usize,
    ) -> bool {
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(access, element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => access
                .parent_of(element)
                .is_some_and(|parent| self.matches_at(access, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = access.parent_of(element);
                while let Some(candidate) = ancestor {
                    if self.matches_at(access, candidate, index - 1) {
                        return true;
                    }
                    ancestor = access.parent_of(candidate);
                }
                false
            }
        }
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::InvalidSelector`] for empty input, unsupported syntax or
    /// unterminated attribute matchers.
    pub fn parse(source: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        for part in split_top_level(source) {
            alternatives.push(Parser::new(source, part).complex()?);
        }
        if alternatives.is_empty() {
            return Err(RowError::invalid_selector(source, "empty selector"));
        }
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The selector text this was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check whether `element` matches any selector in the list.
    pub fn matches<A: ElementAccess + ?Sized>(&self, access: &A, element: A::Handle) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches(access, element))
    }
}

/// Split on commas that are not inside brackets or quotes.
fn split_top_level(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

struct Parser<'s> {
    full: &'s str,
    chars: std::iter::Peekable<std::str::Chars<'s>>,
}

impl<'s> Parser<'s> {
    fn new(full: &'s str, part: &'s str) -> Self {
        Self {
            full,
            chars: part.chars().peekable(),
        }
    }

    fn error(&self, reason: &str) -> RowError {
        RowError::invalid_selector(self.full, reason)
    }

    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            ident.push(c);
            self.chars.next();
        }
        ident
    }

    fn complex(&mut self) -> Result<Complex> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;
        self.skip_whitespace();

        loop {
            let compound = self.compound()?;
            if compound.is_empty() {
                return Err(self.error("expected a simple selector"));
            }
            parts.push((combinator, compound));

            let had_space = self.skip_whitespace();
            match self.chars.peek() {
                None => break,
                Some('>') => {
                    self.chars.next();
                    self.skip_whitespace();
                    combinator = Combinator::Child;
                }
                Some(_) if had_space => combinator = Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            }
        }

        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();

        if self.chars.peek() == Some(&'*') {
            self.chars.next();
            compound.tag = Some("*".to_string());
        } else if self.chars.peek().is_some_and(|&c| is_ident_char(c)) {
            compound.tag = Some(self.ident().to_ascii_lowercase());
        }

        while let Some(&c) = self.chars.peek() {
            match c {
                '#' => {
                    self.chars.next();
                    let id = self.ident();
                    if id.is_empty() {
                        return Err(self.error("empty id selector"));
                    }
                    compound.id = Some(id);
                }
                '.' => {
                    self.chars.next();
                    let class = self.ident();
                    if class.is_empty() {
                        return Err(self.error("empty class selector"));
                    }
                    compound.classes.push(class);
                }
                '[' => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                ':' => return Err(self.error("pseudo-classes are not supported")),
                _ => break,
            }
        }

        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeMatcher> {
        self.skip_whitespace();
        let name = self.ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error("empty attribute name"));
        }
        self.skip_whitespace();

        let op = match self.chars.next() {
            Some(']') => {
                return Ok(AttributeMatcher {
                    name,
                    op: AttributeOp::Exists,
                    value: String::new(),
                })
            }
            Some('=') => AttributeOp::Equals,
            Some(prefix @ ('~' | '^' | '$' | '*')) => {
                if self.chars.next() != Some('=') {
                    return Err(self.error("expected '=' in attribute matcher"));
                }
                match prefix {
                    '~' => AttributeOp::Word,
                    '^' => AttributeOp::Prefix,
                    '$' => AttributeOp::Suffix,
                    _ => AttributeOp::Contains,
                }
            }
            _ => return Err(self.error("unterminated attribute matcher")),
        };

        self.skip_whitespace();
        let value = match self.chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                let mut value = String::new();
                loop {
                    match self.chars.next() {
                        Some(c) if c == quote => break,
                        Some(c) => value.push(c),
                        None => return Err(self.error("unterminated attribute value")),
                    }
                }
                value
            }
            _ => self.ident(),
        };

        self.skip_whitespace();
        if self.chars.next() != Some(']') {
            return Err(self.error("unterminated attribute matcher"));
        }

        Ok(AttributeMatcher { name, op, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A tiny fixed tree: 0 = form#order.form, 1 = div.row (parent 0), 2 = input (parent 1).
    struct Fixture;

    impl ElementAccess for Fixture {
        type Handle = usize;

        fn tag_name(&self, element: usize) -> Option<&str> {
            ["form", "div", "input"].get(element).copied()
        }

        fn attribute_value(&self, element: usize, name: &str) -> Option<&str> {
            match (element, name) {
                (0, "id") => Some("order"),
                (0, "class") => Some("form"),
                (1, "class") => Some("row nested-row"),
                (1, "data-controller") => Some("alpha bulmaform--nested-forms-delete-row"),
                (2, "name") => Some("order[items_attributes][3][_destroy]"),
                (2, "type") => Some("hidden"),
                _ => None,
            }
        }

        fn parent_of(&self, element: usize) -> Option<usize> {
            element.checked_sub(1)
        }
    }

    fn matches(selector: &str, element: usize) -> bool {
        Selector::parse(selector).unwrap().matches(&Fixture, element)
    }

    #[test]
    fn test_type_selector() {
        assert!(matches("input", 2));
        assert!(matches("INPUT", 2));
        assert!(!matches("input", 1));
    }

    #[test]
    fn test_universal_selector() {
        assert!(matches("*", 0));
        assert!(matches("*", 2));
    }

    #[test]
    fn test_id_and_class() {
        assert!(matches("#order", 0));
        assert!(matches("form#order.form", 0));
        assert!(matches(".nested-row", 1));
        assert!(matches(".row.nested-row", 1));
        assert!(!matches(".row.missing", 1));
    }

    #[test]
    fn test_attribute_operators() {
        assert!(matches("[type]", 2));
        assert!(matches("[type=hidden]", 2));
        assert!(matches(r#"input[name*="_destroy"]"#, 2));
        assert!(matches("[name^='order[']", 2));
        assert!(matches(r#"[name$="[_destroy]"]"#, 2));
        assert!(matches(
            r#"[data-controller~="bulmaform--nested-forms-delete-row"]"#,
            1
        ));
        assert!(!matches(r#"[data-controller~="bulmaform"]"#, 1));
        assert!(!matches(r#"[name*=""]"#, 2));
    }

    #[test]
    fn test_descendant_combinator() {
        assert!(matches("#order input", 2));
        assert!(matches("form .row input", 2));
        assert!(!matches(".row form", 0));
    }

    #[test]
    fn test_child_combinator() {
        assert!(matches(".row > input", 2));
        assert!(matches("form>div>input", 2));
        assert!(!matches("form > input", 2));
    }

    #[test]
    fn test_selector_list() {
        assert!(matches("span, .row", 1));
        assert!(matches("[data-x], input", 2));
    }

    #[test]
    fn test_comma_inside_attribute_value() {
        let selector = Selector::parse(r#"[title="a,b"], input"#).unwrap();
        assert!(selector.matches(&Fixture, 2));
    }

    #[test]
    fn test_invalid_selectors() {
        for source in ["", "  ", "div:first-child", "[name", "[name~x]", "#", "a,"] {
            let err = Selector::parse(source).unwrap_err();
            assert!(
                matches!(err, RowError::InvalidSelector { .. }),
                "{source:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_source_is_kept() {
        let selector = Selector::parse("#items-container").unwrap();
        assert_eq!(selector.source(), "#items-container");
    }
}
