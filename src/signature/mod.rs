//! Signature renderers, one per surface language, chosen by name like an
//! output format.

pub mod java;
pub mod kotlin;
pub mod summarize;

use crate::content::{BlockKind, ContentBlock, ContentNode};
use crate::error::RenderError;
use crate::model::{Node, NodeKind};
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// How much of a declaration a signature shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Compact one-liner: no annotations, no visibility/inlining modifiers.
    Summary,
    #[default]
    Full,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "summary" => Ok(RenderMode::Summary),
            "full" => Ok(RenderMode::Full),
            _ => Err(format!("unknown mode: {s}. Use summary or full")),
        }
    }
}

/// Projects declaration nodes into one surface language's syntax.
pub trait LanguageService {
    /// Language tag, also used for fenced signature blocks.
    fn language(&self) -> &str;

    fn render(&self, node: Node<'_>, mode: RenderMode) -> Result<ContentNode, RenderError>;

    /// Display name; constructors are named after their class.
    fn render_name(&self, node: Node<'_>) -> String {
        match node.kind {
            NodeKind::Constructor => node
                .owner()
                .map(|owner| owner.name.clone())
                .unwrap_or_else(|| node.name.clone()),
            _ => node.name.clone(),
        }
    }

    /// One generalised signature for a group of declarations that differ
    /// only in receiver type, or `None` when they cannot be summarized.
    fn summarize_signatures(&self, nodes: &[Node<'_>]) -> Result<Option<ContentNode>, RenderError>;
}

/// Create a language service by name.
pub fn create_service(language: &str) -> Result<Box<dyn LanguageService>> {
    match language {
        "kotlin" | "kt" => Ok(Box::new(kotlin::KotlinLanguageService)),
        "java" => Ok(Box::new(java::JavaLanguageService)),
        _ => Err(anyhow!(
            "unknown language: {}. Use kotlin or java",
            language
        )),
    }
}

pub(crate) fn unsupported(node: Node<'_>, expected: &'static str) -> RenderError {
    RenderError::UnsupportedShape {
        kind: node.kind,
        name: node.name.clone(),
        expected,
    }
}

// -- Shared content primitives -------------------------------------------------

pub(crate) fn render_package(block: &mut ContentBlock, node: Node<'_>) {
    block.keyword("package");
    block.nbsp();
    block.identifier(node.name.as_str());
}

/// Modifier keyword followed by a space; no-wrap contexts use nbsp.
pub(crate) fn render_modifier_keyword(block: &mut ContentBlock, name: &str, nowrap: bool) {
    block.keyword(name);
    if nowrap {
        block.nbsp();
    } else {
        block.text(" ");
    }
}

/// Deprecated declarations print their name struck through.
pub(crate) fn identifier_or_deprecated(block: &mut ContentBlock, node: Node<'_>) {
    if node.is_deprecated() {
        let mut strike = ContentBlock::new(BlockKind::Strikethrough);
        strike.identifier(node.name.as_str());
        block.append(strike.into());
    } else {
        block.identifier(node.name.as_str());
    }
}

/// Wrap whatever `body` prints in a link to the node's first link target.
pub(crate) fn render_linked(
    block: &mut ContentBlock,
    node: Node<'_>,
    body: impl FnOnce(&mut ContentBlock) -> Result<(), RenderError>,
) -> Result<(), RenderError> {
    match node.links().first() {
        Some(target) => block.link(target.id(), body),
        None => body(block),
    }
}

/// Comma-separated list. No-wrap lists use `,` + nbsp so emitters never
/// break inside them.
pub(crate) fn render_list<T: Copy>(
    block: &mut ContentBlock,
    items: &[T],
    no_wrap: bool,
    mut render_item: impl FnMut(&mut ContentBlock, T) -> Result<(), RenderError>,
) -> Result<(), RenderError> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            if no_wrap {
                block.symbol(",");
                block.nbsp();
            } else {
                block.symbol(", ");
            }
        }
        render_item(block, *item)?;
    }
    Ok(())
}
