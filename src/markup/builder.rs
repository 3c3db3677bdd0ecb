//! Markup tree → content tree.
//!
//! Structural markup nodes open a new block; the block's children are built
//! completely before it is attached to its parent, so a parent never sees a
//! half-built child.

use super::entity;
use super::{MarkupKind, MarkupNode};
use crate::content::{BlockKind, Content, ContentBlock, ContentNode};

/// Resolves a reference-style link label to the block that will hold the
/// link text, typically an internal link or a placeholder.
pub type LinkResolver<'a> = dyn Fn(&str) -> ContentBlock + 'a;

/// Build a fresh [`Content`] from `tree`. With `inline`, a tree holding a
/// single paragraph is flattened into the body without the paragraph wrapper.
pub fn build_content(tree: &MarkupNode, resolver: &LinkResolver<'_>, inline: bool) -> Content {
    let mut content = Content::new();
    if inline {
        build_inline_content_to(tree, content.body_mut(), resolver);
    } else {
        build_content_to(tree, content.body_mut(), resolver);
    }
    content
}

pub fn build_content_to(tree: &MarkupNode, target: &mut ContentBlock, resolver: &LinkResolver<'_>) {
    let scope = target.kind.clone();
    Builder { resolver }.visit(tree, true, &scope, target);
}

pub fn build_inline_content_to(
    tree: &MarkupNode,
    target: &mut ContentBlock,
    resolver: &LinkResolver<'_>,
) {
    let builder = Builder { resolver };
    let mut paragraphs = tree
        .children
        .iter()
        .filter(|c| c.kind == MarkupKind::Paragraph);
    match (paragraphs.next(), paragraphs.next()) {
        (Some(paragraph), None) => {
            builder.visit_children(&paragraph.children, &BlockKind::Paragraph, target)
        }
        _ => {
            let scope = target.kind.clone();
            builder.visit(tree, true, &scope, target);
        }
    }
}

struct Builder<'r, 'a> {
    resolver: &'r LinkResolver<'a>,
}

impl Builder<'_, '_> {
    /// `scope` is the kind of the block currently receiving content; it
    /// decides whether whitespace survives.
    fn visit(&self, node: &MarkupNode, is_last: bool, scope: &BlockKind, target: &mut ContentBlock) {
        match &node.kind {
            MarkupKind::Heading(level) => self.open(BlockKind::Heading(*level), node, target),
            MarkupKind::UnorderedList => self.open(BlockKind::UnorderedList, node, target),
            MarkupKind::OrderedList => self.open(BlockKind::OrderedList, node, target),
            MarkupKind::ListItem => self.open(BlockKind::ListItem, node, target),
            MarkupKind::Emphasis => self.open(BlockKind::Emphasis, node, target),
            MarkupKind::Strong => self.open(BlockKind::Strong, node, target),
            MarkupKind::Strikethrough => self.open(BlockKind::Strikethrough, node, target),
            MarkupKind::Paragraph => self.open(BlockKind::Paragraph, node, target),
            MarkupKind::CodeBlock { language } => {
                let language = language.trim().to_string();
                self.open(BlockKind::BlockCode { language }, node, target)
            }
            MarkupKind::CodeSpan => {
                let mut code = ContentBlock::new(BlockKind::Code);
                code.text(code_span_text(node));
                target.append(code.into());
            }
            MarkupKind::InlineLink => self.inline_link(node, target),
            MarkupKind::FullReferenceLink | MarkupKind::ShortReferenceLink => {
                self.reference_link(node, target)
            }
            MarkupKind::Whitespace => {
                if keeps_whitespace(scope) && !is_last {
                    target.text(node.text.as_str());
                }
            }
            MarkupKind::Eol => {
                let keep = keeps_whitespace(scope) || matches!(scope, BlockKind::BlockCode { .. });
                if keep && !is_last {
                    target.text(node.text.as_str());
                }
            }
            MarkupKind::Text => target.append(entity_or_text(&node.text)),
            MarkupKind::LinkDefinition => {}
            kind if kind.is_punctuation() => target.text(node.text.as_str()),
            _ => self.visit_children(&node.children, scope, target),
        }
    }

    fn visit_children(&self, children: &[MarkupNode], scope: &BlockKind, target: &mut ContentBlock) {
        for (i, child) in children.iter().enumerate() {
            self.visit(child, i + 1 == children.len(), scope, target);
        }
    }

    fn open(&self, kind: BlockKind, node: &MarkupNode, target: &mut ContentBlock) {
        let mut block = ContentBlock::new(kind);
        let scope = block.kind.clone();
        self.visit_children(&node.children, &scope, &mut block);
        target.append(block.into());
    }

    fn inline_link(&self, node: &MarkupNode, target: &mut ContentBlock) {
        let Some(link_text) = node.child(&MarkupKind::LinkText) else {
            return;
        };
        let href = match node.child(&MarkupKind::LinkDestination) {
            Some(destination) => destination.source_text(),
            None => label_text(link_text),
        };
        let mut link = ContentBlock::new(BlockKind::ExternalLink { href });
        self.link_text_to(link_text, &mut link);
        target.append(link.into());
    }

    fn reference_link(&self, node: &MarkupNode, target: &mut ContentBlock) {
        let Some(label_node) = node.child(&MarkupKind::LinkLabel) else {
            return;
        };
        let label = label_text(label_node);
        tracing::debug!(label = %label, "resolving reference link");
        let mut link = (self.resolver)(&label);
        match node.child(&MarkupKind::LinkText) {
            Some(link_text) => self.link_text_to(link_text, &mut link),
            None => link.append(ContentNode::Text(label)),
        }
        target.append(link.into());
    }

    /// Build link text, leaving out the surrounding brackets if present.
    fn link_text_to(&self, link_text: &MarkupNode, link: &mut ContentBlock) {
        let scope = link.kind.clone();
        self.visit_children(strip_brackets(&link_text.children), &scope, link);
    }
}

fn keeps_whitespace(scope: &BlockKind) -> bool {
    matches!(scope, BlockKind::Paragraph | BlockKind::Section { .. })
}

/// Entity literals stay undecoded so emitters can escape them consistently.
fn entity_or_text(text: &str) -> ContentNode {
    match text {
        "&amp;" | "&quot;" | "&lt;" | "&gt;" => ContentNode::Entity(text.to_string()),
        "&" => ContentNode::Entity("&amp;".to_string()),
        _ if entity::decode(text) != text => ContentNode::Entity(text.to_string()),
        _ => ContentNode::Text(text.to_string()),
    }
}

fn strip_brackets(children: &[MarkupNode]) -> &[MarkupNode] {
    let mut slice = children;
    if let [MarkupNode { kind: MarkupKind::LBracket, .. }, rest @ ..] = slice {
        slice = rest;
    }
    if let [rest @ .., MarkupNode { kind: MarkupKind::RBracket, .. }] = slice {
        slice = rest;
    }
    slice
}

fn label_text(node: &MarkupNode) -> String {
    strip_brackets(&node.children)
        .iter()
        .map(MarkupNode::source_text)
        .collect::<String>()
        + node.text.as_str()
}

fn code_span_text(node: &MarkupNode) -> String {
    let mut children = node.children.as_slice();
    while let [MarkupNode { kind: MarkupKind::Backtick, .. }, rest @ ..] = children {
        children = rest;
    }
    while let [rest @ .., MarkupNode { kind: MarkupKind::Backtick, .. }] = children {
        children = rest;
    }
    let text: String = children.iter().map(MarkupNode::source_text).collect();
    text + node.text.as_str()
}
