//! Lightweight markup: the parsed tree vocabulary, the Markdown tokenizer
//! adapter that produces it, and the builder that turns it into content.

pub mod builder;
pub mod entity;
pub mod parse;
pub mod tags;

pub use builder::{build_content, build_content_to, build_inline_content_to, LinkResolver};
pub use parse::parse_markdown;

/// Node kinds of a parsed markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupKind {
    Root,
    Paragraph,
    Heading(u8),
    UnorderedList,
    OrderedList,
    ListItem,
    Emphasis,
    Strong,
    Strikethrough,
    CodeSpan,
    CodeBlock { language: String },
    InlineLink,
    FullReferenceLink,
    ShortReferenceLink,
    LinkText,
    LinkLabel,
    LinkDestination,
    LinkDefinition,
    // tokens
    Text,
    Whitespace,
    Eol,
    Colon,
    SingleQuote,
    DoubleQuote,
    Lt,
    Gt,
    LParen,
    RParen,
    LBracket,
    RBracket,
    ExclamationMark,
    Backtick,
    CodeFenceContent,
    /// Anything the builder does not know; its children are still visited.
    Other,
}

impl MarkupKind {
    /// Tokens emitted verbatim: markup scaffolding characters.
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            MarkupKind::Colon
                | MarkupKind::SingleQuote
                | MarkupKind::DoubleQuote
                | MarkupKind::Lt
                | MarkupKind::Gt
                | MarkupKind::LParen
                | MarkupKind::RParen
                | MarkupKind::LBracket
                | MarkupKind::RBracket
                | MarkupKind::ExclamationMark
                | MarkupKind::Backtick
                | MarkupKind::CodeFenceContent
        )
    }

    /// Token kind for a single punctuation character.
    pub fn for_punctuation(c: char) -> Option<MarkupKind> {
        Some(match c {
            ':' => MarkupKind::Colon,
            '\'' => MarkupKind::SingleQuote,
            '"' => MarkupKind::DoubleQuote,
            '<' => MarkupKind::Lt,
            '>' => MarkupKind::Gt,
            '(' => MarkupKind::LParen,
            ')' => MarkupKind::RParen,
            '[' => MarkupKind::LBracket,
            ']' => MarkupKind::RBracket,
            '!' => MarkupKind::ExclamationMark,
            '`' => MarkupKind::Backtick,
            _ => return None,
        })
    }
}

/// A node of the parsed markup tree. Tokens carry `text`; structural nodes
/// carry children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    pub kind: MarkupKind,
    pub text: String,
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn new(kind: MarkupKind, children: Vec<MarkupNode>) -> Self {
        Self {
            kind,
            text: String::new(),
            children,
        }
    }

    pub fn token(kind: MarkupKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::token(MarkupKind::Text, text)
    }

    pub fn child(&self, kind: &MarkupKind) -> Option<&MarkupNode> {
        self.children.iter().find(|c| &c.kind == kind)
    }

    /// Source text of the node: its own text plus all descendants'.
    pub fn source_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.source_text());
        }
        out
    }
}
