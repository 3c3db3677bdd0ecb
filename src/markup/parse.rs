//! Markdown text → markup tree, on top of `pulldown-cmark`.
//!
//! The event stream is folded into a tree with an explicit stack. Text runs
//! are split so that punctuation and entity references become their own
//! tokens, which is what the builder expects.

use super::entity;
use super::{MarkupKind, MarkupNode};
use pulldown_cmark::{BrokenLink, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};

/// Parse Markdown into a markup tree rooted at [`MarkupKind::Root`].
pub fn parse_markdown(text: &str) -> MarkupNode {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_with_broken_link_callback(text, options, Some(keep_broken_reference));
    let mut tree = TreeBuilder::new();
    for event in parser {
        tree.event(event);
    }
    tree.finish()
}

/// Undefined `[label]` references stay links; the label travels as the
/// destination so the builder can hand it to its resolver.
fn keep_broken_reference<'a>(link: BrokenLink<'a>) -> Option<(CowStr<'a>, CowStr<'a>)> {
    Some((link.reference, CowStr::Borrowed("")))
}

struct PendingLink {
    link_type: LinkType,
    destination: String,
}

struct TreeBuilder {
    stack: Vec<MarkupNode>,
    links: Vec<PendingLink>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![MarkupNode::new(MarkupKind::Root, Vec::new())],
            links: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(end) => self.end(end),
            Event::Text(text) => {
                if self.in_code_block() {
                    self.code_text(&text);
                } else {
                    self.inline_text(&text);
                }
            }
            Event::Code(code) => self.push(MarkupNode::new(
                MarkupKind::CodeSpan,
                vec![MarkupNode::text(code.as_ref())],
            )),
            Event::SoftBreak | Event::HardBreak => {
                self.push(MarkupNode::token(MarkupKind::Eol, "\n"))
            }
            Event::Html(raw) | Event::InlineHtml(raw) => self.inline_text(&raw),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => MarkupKind::Paragraph,
            Tag::Heading { level, .. } => MarkupKind::Heading(level as u8),
            Tag::List(Some(_)) => MarkupKind::OrderedList,
            Tag::List(None) => MarkupKind::UnorderedList,
            Tag::Item => MarkupKind::ListItem,
            Tag::Emphasis => MarkupKind::Emphasis,
            Tag::Strong => MarkupKind::Strong,
            Tag::Strikethrough => MarkupKind::Strikethrough,
            Tag::CodeBlock(CodeBlockKind::Fenced(language)) => MarkupKind::CodeBlock {
                language: language.to_string(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => MarkupKind::CodeBlock {
                language: String::new(),
            },
            Tag::Link {
                link_type,
                dest_url,
                ..
            } => {
                self.links.push(PendingLink {
                    link_type,
                    destination: dest_url.to_string(),
                });
                MarkupKind::LinkText
            }
            _ => MarkupKind::Other,
        };
        self.stack.push(MarkupNode::new(kind, Vec::new()));
    }

    fn end(&mut self, end: TagEnd) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        match end {
            TagEnd::Item => node.children = wrap_inline_runs(std::mem::take(&mut node.children)),
            TagEnd::Link => node = self.finish_link(node),
            _ => {}
        }
        self.push(node);
    }

    fn finish_link(&mut self, text: MarkupNode) -> MarkupNode {
        let Some(link) = self.links.pop() else {
            return text;
        };
        match link.link_type {
            LinkType::ShortcutUnknown | LinkType::CollapsedUnknown | LinkType::ReferenceUnknown => {
                let label = MarkupNode::new(
                    MarkupKind::LinkLabel,
                    vec![MarkupNode::text(link.destination)],
                );
                if text.children.is_empty() {
                    MarkupNode::new(MarkupKind::ShortReferenceLink, vec![label])
                } else {
                    MarkupNode::new(MarkupKind::FullReferenceLink, vec![text, label])
                }
            }
            _ => {
                let mut children = vec![text];
                if !link.destination.is_empty() {
                    children.push(MarkupNode::token(MarkupKind::LinkDestination, link.destination));
                }
                MarkupNode::new(MarkupKind::InlineLink, children)
            }
        }
    }

    fn in_code_block(&self) -> bool {
        matches!(
            self.stack.last().map(|n| &n.kind),
            Some(MarkupKind::CodeBlock { .. })
        )
    }

    fn code_text(&mut self, text: &str) {
        for line in text.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            if !content.is_empty() {
                self.push(MarkupNode::token(MarkupKind::CodeFenceContent, content));
            }
            if line.ends_with('\n') {
                self.push(MarkupNode::token(MarkupKind::Eol, "\n"));
            }
        }
    }

    fn inline_text(&mut self, text: &str) {
        // Bare list item text is wrapped in a paragraph later.
        let split_whitespace = matches!(
            self.stack.last().map(|top| &top.kind),
            Some(MarkupKind::Paragraph | MarkupKind::ListItem)
        );
        for token in tokenize(text, split_whitespace) {
            self.push(token);
        }
    }

    fn push(&mut self, node: MarkupNode) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    fn finish(mut self) -> MarkupNode {
        while self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                self.push(node);
            }
        }
        self.stack
            .pop()
            .unwrap_or_else(|| MarkupNode::new(MarkupKind::Root, Vec::new()))
    }
}

/// Split a text run into plain text, punctuation and entity tokens, and
/// runs of spaces into whitespace tokens when `split_whitespace` is set.
fn tokenize(text: &str, split_whitespace: bool) -> Vec<MarkupNode> {
    let mut tokens = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if split_whitespace && matches!(c, ' ' | '\t') {
            flush(&mut plain, &mut tokens);
            let len = rest
                .find(|c: char| !matches!(c, ' ' | '\t'))
                .unwrap_or(rest.len());
            tokens.push(MarkupNode::token(MarkupKind::Whitespace, &rest[..len]));
            rest = &rest[len..];
        } else if let Some(kind) = MarkupKind::for_punctuation(c) {
            flush(&mut plain, &mut tokens);
            tokens.push(MarkupNode::token(kind, c.to_string()));
            rest = &rest[c.len_utf8()..];
        } else if c == '&' {
            flush(&mut plain, &mut tokens);
            let len = rest
                .find(';')
                .filter(|&end| end <= 10 && entity::is_entity_reference(&rest[..=end]))
                .map_or(1, |end| end + 1);
            tokens.push(MarkupNode::text(&rest[..len]));
            rest = &rest[len..];
        } else {
            plain.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    flush(&mut plain, &mut tokens);
    tokens
}

fn flush(plain: &mut String, tokens: &mut Vec<MarkupNode>) {
    if !plain.is_empty() {
        tokens.push(MarkupNode::text(std::mem::take(plain)));
    }
}

fn is_inline(kind: &MarkupKind) -> bool {
    kind.is_punctuation()
        || matches!(
            kind,
            MarkupKind::Text
                | MarkupKind::Whitespace
                | MarkupKind::Eol
                | MarkupKind::Emphasis
                | MarkupKind::Strong
                | MarkupKind::Strikethrough
                | MarkupKind::CodeSpan
                | MarkupKind::InlineLink
                | MarkupKind::FullReferenceLink
                | MarkupKind::ShortReferenceLink
        )
}

/// Tight list items carry bare inline content; give it a paragraph so list
/// text is built like any other paragraph.
fn wrap_inline_runs(children: Vec<MarkupNode>) -> Vec<MarkupNode> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if is_inline(&child.kind) {
            run.push(child);
            continue;
        }
        if !run.is_empty() {
            out.push(MarkupNode::new(MarkupKind::Paragraph, std::mem::take(&mut run)));
        }
        out.push(child);
    }
    if !run.is_empty() {
        out.push(MarkupNode::new(MarkupKind::Paragraph, run));
    }
    out
}
