//! Layout blocks: `columns`, `grid` and `fixed-grid`.
//!
//! Fields rendered inside a block pick up the matching class (`column` or `cell`). Blocks
//! nest; leaving one restores the enclosing layout.

use maud::{html, Markup};

use super::field::FieldLayout;

/// One open layout block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLayout {
    /// `div.columns`.
    Columns,
    /// `div.grid`, with optional extra classes.
    Grid(Option<String>),
    /// `div.fixed-grid > div.grid`, with optional extra classes on the outer element.
    FixedGrid(Option<String>),
}

impl BlockLayout {
    /// The layout fields take inside this block.
    #[must_use]
    pub fn field_layout(&self) -> FieldLayout {
        match self {
            Self::Columns => FieldLayout::Column,
            Self::Grid(_) | Self::FixedGrid(_) => FieldLayout::Cell,
        }
    }

    /// Wrap `content` in the block's elements.
    #[must_use]
    pub fn wrap(&self, content: Markup) -> Markup {
        match self {
            Self::Columns => html! { div class="columns" { (content) } },
            Self::Grid(extra) => html! { div class=(with_extra("grid", extra.as_deref())) { (content) } },
            Self::FixedGrid(extra) => html! {
                div class=(with_extra("fixed-grid", extra.as_deref())) {
                    div class="grid" { (content) }
                }
            },
        }
    }
}

fn with_extra(base: &str, extra: Option<&str>) -> String {
    match extra.map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{base} {extra}"),
        _ => base.to_string(),
    }
}

/// The stack of open layout blocks during one form render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutStack {
    blocks: Vec<BlockLayout>,
}

impl LayoutStack {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a block.
    pub fn push(&mut self, block: BlockLayout) {
        self.blocks.push(block);
    }

    /// Leave the innermost block.
    pub fn pop(&mut self) -> Option<BlockLayout> {
        self.blocks.pop()
    }

    /// The innermost open block.
    #[must_use]
    pub fn current(&self) -> Option<&BlockLayout> {
        self.blocks.last()
    }

    /// The layout a field rendered now should take.
    #[must_use]
    pub fn field_layout(&self) -> FieldLayout {
        self.current()
            .map_or(FieldLayout::Plain, BlockLayout::field_layout)
    }
}
