//! Content tree: the rich-text model shared by documentation bodies and
//! rendered signatures.
//!
//! Leaves carry text; blocks own an ordered list of children. Trees are built
//! once (by the markup builder or a signature renderer) and read afterwards.

mod document;

pub use document::{Content, ContentTags};

use crate::error::ContentError;
use crate::markup::entity;
use crate::model::NodeId;
use serde::Serialize;

/// What an identifier names, so emitters can style it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum IdentifierKind {
    #[default]
    Other,
    TypeName,
    ParameterName,
    AnnotationName,
    SummarizedTypeName,
}

/// Kinds of content that own children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    /// Anonymous container (signature roots, content bodies).
    Group,
    Paragraph,
    Code,
    BlockCode { language: String },
    Heading(u8),
    UnorderedList,
    OrderedList,
    ListItem,
    Emphasis,
    Strong,
    Strikethrough,
    ExternalLink { href: String },
    InternalLink { target: NodeId },
    Section { tag: String, subject: Option<String> },
}

/// A single node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContentNode {
    Text(String),
    /// Entity literal kept undecoded, e.g. `&amp;`.
    Entity(String),
    Keyword(String),
    Symbol(String),
    Identifier {
        text: String,
        kind: IdentifierKind,
        signature: Option<String>,
    },
    NonBreakingSpace,
    SoftLineBreak,
    IndentedSoftLineBreak,
    Empty,
    Block(ContentBlock),
}

/// A content node that accepts children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    pub kind: BlockKind,
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text(text.into())
    }

    /// Append `child` if this node is a block; leaves reject children.
    pub fn append(&mut self, child: ContentNode) -> Result<(), ContentError> {
        match self {
            ContentNode::Block(block) => {
                block.append(child);
                Ok(())
            }
            leaf => Err(ContentError::LeafNode(leaf.variant_name())),
        }
    }

    pub fn as_block(&self) -> Option<&ContentBlock> {
        match self {
            ContentNode::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ContentNode::Empty => true,
            ContentNode::Block(block) => block.children.iter().all(ContentNode::is_empty),
            _ => false,
        }
    }

    /// Flatten to text: entities are decoded, nbsp becomes a space and
    /// line-break markers vanish.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain_text(&mut out);
        out
    }

    fn write_plain_text(&self, out: &mut String) {
        match self {
            ContentNode::Text(s) | ContentNode::Keyword(s) | ContentNode::Symbol(s) => {
                out.push_str(s)
            }
            ContentNode::Entity(s) => out.push_str(&entity::decode(s)),
            ContentNode::Identifier { text, .. } => out.push_str(text),
            ContentNode::NonBreakingSpace => out.push(' '),
            ContentNode::SoftLineBreak
            | ContentNode::IndentedSoftLineBreak
            | ContentNode::Empty => {}
            ContentNode::Block(block) => {
                for child in &block.children {
                    child.write_plain_text(out);
                }
            }
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            ContentNode::Text(_) => "Text",
            ContentNode::Entity(_) => "Entity",
            ContentNode::Keyword(_) => "Keyword",
            ContentNode::Symbol(_) => "Symbol",
            ContentNode::Identifier { .. } => "Identifier",
            ContentNode::NonBreakingSpace => "NonBreakingSpace",
            ContentNode::SoftLineBreak => "SoftLineBreak",
            ContentNode::IndentedSoftLineBreak => "IndentedSoftLineBreak",
            ContentNode::Empty => "Empty",
            ContentNode::Block(_) => "Block",
        }
    }
}

impl From<ContentBlock> for ContentNode {
    fn from(block: ContentBlock) -> Self {
        ContentNode::Block(block)
    }
}

impl ContentBlock {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(BlockKind::Group)
    }

    pub fn append(&mut self, child: ContentNode) {
        self.children.push(child);
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.append(ContentNode::Text(text.into()));
    }

    pub fn keyword(&mut self, text: impl Into<String>) {
        self.append(ContentNode::Keyword(text.into()));
    }

    pub fn symbol(&mut self, text: impl Into<String>) {
        self.append(ContentNode::Symbol(text.into()));
    }

    pub fn identifier(&mut self, text: impl Into<String>) {
        self.identifier_kind(text, IdentifierKind::Other, None);
    }

    pub fn identifier_kind(
        &mut self,
        text: impl Into<String>,
        kind: IdentifierKind,
        signature: Option<String>,
    ) {
        self.append(ContentNode::Identifier {
            text: text.into(),
            kind,
            signature,
        });
    }

    pub fn nbsp(&mut self) {
        self.append(ContentNode::NonBreakingSpace);
    }

    pub fn soft_line_break(&mut self) {
        self.append(ContentNode::SoftLineBreak);
    }

    pub fn indented_soft_line_break(&mut self) {
        self.append(ContentNode::IndentedSoftLineBreak);
    }

    /// Build a nested block with `body` and append it once complete.
    pub fn nested<E>(
        &mut self,
        kind: BlockKind,
        body: impl FnOnce(&mut ContentBlock) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut block = ContentBlock::new(kind);
        body(&mut block)?;
        self.append(block.into());
        Ok(())
    }

    /// Internal link to `target` whose text is produced by `body`.
    pub fn link<E>(
        &mut self,
        target: NodeId,
        body: impl FnOnce(&mut ContentBlock) -> Result<(), E>,
    ) -> Result<(), E> {
        self.nested(BlockKind::InternalLink { target }, body)
    }

    pub fn is_section(&self) -> bool {
        matches!(self.kind, BlockKind::Section { .. })
    }

    pub fn plain_text(&self) -> String {
        self.children.iter().map(ContentNode::plain_text).collect()
    }
}
