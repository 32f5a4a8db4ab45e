//! Flow story construction.
//!
//! The editor tree is first reduced to a flat story of styled paragraphs,
//! lists and vertical spacers. The PDF composer then lays the story out
//! page by page.

use crate::model::{EditorDocument, Element, Node, NodeKind};

use super::markup::to_markup;
use super::options::Spacing;

/// One of the three heading tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingTier {
    H1,
    H2,
    H3,
}

impl HeadingTier {
    /// Tier for an editor heading level; levels of 3 and above share tier 3.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=1 => HeadingTier::H1,
            2 => HeadingTier::H2,
            _ => HeadingTier::H3,
        }
    }

    /// 1-based tier number.
    pub fn number(&self) -> u8 {
        match self {
            HeadingTier::H1 => 1,
            HeadingTier::H2 => 2,
            HeadingTier::H3 => 3,
        }
    }
}

/// Paragraph style of a flow paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    Body,
    Heading(HeadingTier),
}

/// Marker style of a flow list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `•` markers
    Bullet,
    /// `1.`, `2.`, ... markers
    Ordered,
}

/// A block of the flow story.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowBlock {
    /// A paragraph of inline markup
    Paragraph {
        markup: String,
        style: ParagraphStyle,
    },
    /// Fixed vertical space in points
    Spacer { height: f32 },
    /// A list whose items are body paragraphs of inline markup
    List { kind: ListKind, items: Vec<String> },
}

/// The story handed to the composer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowDocument {
    pub blocks: Vec<FlowBlock>,
}

impl FlowDocument {
    /// Number of blocks that carry text.
    pub fn content_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !matches!(b, FlowBlock::Spacer { .. }))
            .count()
    }
}

/// Reduce an editor document to a flow story.
///
/// The story is never empty: a document without any output block yields a
/// single placeholder spacer.
pub fn build_flow(doc: &EditorDocument, spacing: &Spacing) -> FlowDocument {
    let mut blocks = Vec::new();

    for block in doc.blocks() {
        match &block.kind {
            NodeKind::Heading => {
                let markup = inline_markup(&block.content);
                if !markup.is_empty() {
                    let tier = HeadingTier::from_level(block.heading_level());
                    blocks.push(FlowBlock::Paragraph {
                        markup,
                        style: ParagraphStyle::Heading(tier),
                    });
                    blocks.push(FlowBlock::Spacer {
                        height: spacing.after_heading,
                    });
                }
            }
            kind if kind.is_paragraph_like() => {
                let markup = inline_markup(&block.content);
                if markup.is_empty() {
                    blocks.push(FlowBlock::Spacer {
                        height: spacing.empty_paragraph,
                    });
                } else {
                    blocks.push(FlowBlock::Paragraph {
                        markup,
                        style: ParagraphStyle::Body,
                    });
                    blocks.push(FlowBlock::Spacer {
                        height: spacing.after_paragraph,
                    });
                }
            }
            NodeKind::BulletList | NodeKind::OrderedList => {
                let kind = if block.kind == NodeKind::BulletList {
                    ListKind::Bullet
                } else {
                    ListKind::Ordered
                };
                let items = list_items(block);
                if !items.is_empty() {
                    blocks.push(FlowBlock::List { kind, items });
                    blocks.push(FlowBlock::Spacer {
                        height: spacing.after_list,
                    });
                }
            }
            other => log::debug!("flow: skipping block of type {:?}", other.name()),
        }
    }

    if blocks.is_empty() {
        blocks.push(FlowBlock::Spacer {
            height: spacing.placeholder,
        });
    }

    FlowDocument { blocks }
}

/// Markup of every paragraph inside the list items; empty items are dropped.
fn list_items(list: &Element) -> Vec<String> {
    list.content
        .iter()
        .filter_map(|n| n.element_of(&NodeKind::ListItem))
        .flat_map(|item| item.content.iter())
        .filter_map(|n| n.element_of(&NodeKind::Paragraph))
        .map(|para| inline_markup(&para.content))
        .filter(|markup| !markup.is_empty())
        .collect()
}

/// Concatenate the markup of every text leaf beneath `content`.
pub fn inline_markup(content: &[Node]) -> String {
    let mut out = String::new();
    push_markup(content, &mut out);
    out
}

fn push_markup(content: &[Node], out: &mut String) {
    for node in content {
        match node {
            Node::Text(t) => out.push_str(&to_markup(&t.text, &t.marks)),
            Node::Element(e) => push_markup(&e.content, out),
            _ => {}
        }
    }
}
