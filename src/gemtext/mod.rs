//! Gemtext document model, parser and differential renderer.
//!
//! # Module Structure
//!
//! - `parse` - Line-oriented parser (text -> [`Document`])
//! - `render` - Differential HTML renderer ([`Document`] + baseline -> HTML)
//!
//! # Equality
//!
//! Blocks compare structurally: line numbers are anchors for the preview
//! pane, not identity, so two blocks with the same content at different
//! lines are equal. Blocks of different variants are never equal.

mod parse;
mod render;

pub use parse::{parse, parse_str};
pub use render::{Rendered, diff, render, render_document};

// =============================================================================
// Document
// =============================================================================

/// One immutable snapshot of a parsed gemtext file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

// =============================================================================
// Block
// =============================================================================

/// A structural unit of a document, anchored at its first source line.
#[derive(Debug, Clone)]
pub struct Block {
    /// 1-based source line of the first line of the block.
    pub line: usize,
    pub kind: BlockKind,
}

impl Block {
    pub fn new(line: usize, kind: BlockKind) -> Self {
        Self { line, kind }
    }

    /// Whether this block is a paragraph holding only whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(&self.kind, BlockKind::Paragraph(text) if text.trim().is_empty())
    }
}

/// Line numbers are excluded from equality.
impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Block variants.
#[derive(Debug, Clone)]
pub enum BlockKind {
    /// Plain text line, kept verbatim.
    Paragraph(String),
    /// `=> url [label]`. The label is empty when absent.
    Link { url: String, label: String },
    /// `#`, `##` or `###` heading.
    Heading { level: u8, text: String },
    /// Contiguous `* ` items.
    List(Vec<Line>),
    /// Contiguous `>` lines, stored with their marker.
    Quote(Vec<Line>),
    /// Verbatim region between two toggle lines.
    Preformatted { alt: String, lines: Vec<Line> },
}

impl BlockKind {
    /// Short variant name used in logs and tests.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Link { .. } => "link",
            Self::Heading { .. } => "heading",
            Self::List(_) => "list",
            Self::Quote(_) => "quote",
            Self::Preformatted { .. } => "preformatted",
        }
    }
}

impl PartialEq for BlockKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Paragraph(a), Self::Paragraph(b)) => a == b,
            (Self::Link { url: u1, label: l1 }, Self::Link { url: u2, label: l2 }) => {
                u1 == u2 && l1 == l2
            }
            (
                Self::Heading { level: v1, text: t1 },
                Self::Heading { level: v2, text: t2 },
            ) => v1 == v2 && t1 == t2,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Quote(a), Self::Quote(b)) => a == b,
            // Alt-text is never rendered, so it does not count as a change.
            (Self::Preformatted { lines: a, .. }, Self::Preformatted { lines: b, .. }) => a == b,
            _ => false,
        }
    }
}

// =============================================================================
// Line
// =============================================================================

/// One line inside a list, quote or preformatted block.
#[derive(Debug, Clone)]
pub struct Line {
    pub line: usize,
    pub text: String,
}

impl Line {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
        }
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn para(line: usize, text: &str) -> Block {
        Block::new(line, BlockKind::Paragraph(text.to_string()))
    }

    #[test]
    fn test_line_number_excluded_from_equality() {
        assert_eq!(para(1, "hello"), para(7, "hello"));
        assert_ne!(para(1, "hello"), para(1, "world"));
    }

    #[test]
    fn test_different_variants_never_equal() {
        let heading = Block::new(
            1,
            BlockKind::Heading {
                level: 1,
                text: "x".into(),
            },
        );
        let quote = Block::new(1, BlockKind::Quote(vec![Line::new(1, "x")]));
        let list = Block::new(1, BlockKind::List(vec![Line::new(1, "x")]));

        assert_ne!(para(1, "x"), heading);
        assert_ne!(quote, list);
    }

    #[test]
    fn test_heading_level_matters() {
        let h1 = BlockKind::Heading {
            level: 1,
            text: "t".into(),
        };
        let h2 = BlockKind::Heading {
            level: 2,
            text: "t".into(),
        };
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_link_label_matters() {
        let a = BlockKind::Link {
            url: "gemini://a".into(),
            label: String::new(),
        };
        let b = BlockKind::Link {
            url: "gemini://a".into(),
            label: "A".into(),
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_list_items_compared_recursively() {
        let a = BlockKind::List(vec![Line::new(1, "one"), Line::new(2, "two")]);
        let b = BlockKind::List(vec![Line::new(5, "one"), Line::new(6, "two")]);
        let c = BlockKind::List(vec![Line::new(5, "one")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_preformatted_ignores_alt() {
        let a = BlockKind::Preformatted {
            alt: "rust".into(),
            lines: vec![Line::new(2, "fn main() {}")],
        };
        let b = BlockKind::Preformatted {
            alt: "text".into(),
            lines: vec![Line::new(9, "fn main() {}")],
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_paragraph() {
        assert!(para(1, "").is_blank());
        assert!(para(1, " \t ").is_blank());
        assert!(!para(1, " x ").is_blank());
        assert!(!Block::new(1, BlockKind::List(Vec::new())).is_blank());
    }
}
