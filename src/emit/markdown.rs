//! GitHub-flavored markdown emitter.
//!
//! Each declaration gets a heading with an explicit anchor, its signature in
//! a fenced block and its documentation below. Internal links become in-page
//! links when their target is on the same page.

use super::Emitter;
use crate::content::{BlockKind, Content, ContentBlock, ContentNode};
use crate::error::EmitError;
use crate::page::Page;

pub struct MarkdownEmitter;

impl Emitter for MarkdownEmitter {
    fn emit(&self, page: &Page) -> Result<String, EmitError> {
        let mut out = String::new();

        for entry in &page.entries {
            let level = (entry.depth + 1).min(6);
            out.push_str(&format!("<a id=\"{}\"></a>\n\n", entry.anchor));
            out.push_str(&format!("{} {}\n\n", "#".repeat(level), escape(&entry.title)));
            write_signature(&mut out, &page.language, &entry.signature);

            if let Some(ref deprecation) = entry.deprecation {
                let mut text = String::new();
                write_children(&mut text, &deprecation.body().children, page);
                out.push_str(&format!("> **Deprecated:** {}\n\n", text.trim()));
            }
            write_docs(&mut out, &entry.docs, page);
        }

        if !page.summaries.is_empty() {
            out.push_str("## Summaries\n\n");
            for summary in &page.summaries {
                out.push_str(&format!("<a id=\"{}\"></a>\n\n", summary.anchor));
                out.push_str(&format!("### {}\n\n", escape(&summary.title)));
                write_signature(&mut out, &page.language, &summary.signature);
                let links: Vec<_> = summary
                    .overloads
                    .iter()
                    .enumerate()
                    .map(|(i, anchor)| format!("[{}](#{})", i + 1, anchor))
                    .collect();
                out.push_str(&format!("Summarizes: {}\n\n", links.join(", ")));
            }
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn write_signature(out: &mut String, language: &str, signature: &ContentNode) {
    out.push_str(&format!("```{}\n{}\n```\n\n", language, signature.plain_text()));
}

fn write_docs(out: &mut String, docs: &Content, page: &Page) {
    write_children(out, docs.children(), page);

    let mut previous_tag: Option<&str> = None;
    for section in docs.sections() {
        let BlockKind::Section { ref tag, ref subject } = section.kind else {
            continue;
        };
        let mut body = String::new();
        write_children(&mut body, &section.children, page);
        let body = body.trim();

        if previous_tag != Some(tag.as_str()) {
            if previous_tag.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("**{}**\n\n", escape(tag)));
        }
        match subject {
            Some(subject) => out.push_str(&format!("- `{subject}`: {body}\n")),
            None => out.push_str(&format!("{body}\n")),
        }
        previous_tag = Some(tag.as_str());
    }
    if previous_tag.is_some() {
        out.push('\n');
    }
}

fn write_children(out: &mut String, children: &[ContentNode], page: &Page) {
    for child in children {
        write_node(out, child, page);
    }
}

fn write_node(out: &mut String, node: &ContentNode, page: &Page) {
    match node {
        ContentNode::Text(text) | ContentNode::Keyword(text) | ContentNode::Symbol(text) => {
            out.push_str(&escape(text))
        }
        ContentNode::Identifier { text, .. } => out.push_str(&escape(text)),
        // Entities are valid Markdown as written.
        ContentNode::Entity(raw) => out.push_str(raw),
        ContentNode::NonBreakingSpace => out.push(' '),
        ContentNode::SoftLineBreak | ContentNode::IndentedSoftLineBreak | ContentNode::Empty => {}
        ContentNode::Block(block) => write_block(out, block, page),
    }
}

fn write_block(out: &mut String, block: &ContentBlock, page: &Page) {
    match &block.kind {
        BlockKind::Group | BlockKind::ListItem | BlockKind::Section { .. } => {
            write_children(out, &block.children, page)
        }
        BlockKind::Paragraph => {
            write_children(out, &block.children, page);
            out.push_str("\n\n");
        }
        BlockKind::Heading(level) => {
            // Declaration headings take the top levels.
            let level = (*level as usize + 2).min(6);
            let mut text = String::new();
            write_children(&mut text, &block.children, page);
            out.push_str(&format!("{} {}\n\n", "#".repeat(level), text.trim()));
        }
        BlockKind::Code => out.push_str(&format!("`{}`", block.plain_text())),
        BlockKind::BlockCode { language } => {
            out.push_str(&format!(
                "```{}\n{}\n```\n\n",
                language,
                block.plain_text().trim_end()
            ));
        }
        BlockKind::UnorderedList | BlockKind::OrderedList => {
            let ordered = block.kind == BlockKind::OrderedList;
            for (i, item) in block.children.iter().enumerate() {
                let mut text = String::new();
                write_node(&mut text, item, page);
                let text = text.trim().replace("\n\n", "\n").replace('\n', "\n  ");
                if ordered {
                    out.push_str(&format!("{}. {}\n", i + 1, text));
                } else {
                    out.push_str(&format!("- {}\n", text));
                }
            }
            out.push('\n');
        }
        BlockKind::Emphasis => wrap(out, "*", block, page),
        BlockKind::Strong => wrap(out, "**", block, page),
        BlockKind::Strikethrough => wrap(out, "~~", block, page),
        BlockKind::ExternalLink { href } => {
            out.push('[');
            write_children(out, &block.children, page);
            out.push_str(&format!("]({href})"));
        }
        BlockKind::InternalLink { target } => match page.anchor(*target) {
            Some(anchor) => {
                out.push('[');
                write_children(out, &block.children, page);
                out.push_str(&format!("](#{anchor})"));
            }
            None => write_children(out, &block.children, page),
        },
    }
}

fn wrap(out: &mut String, marker: &str, block: &ContentBlock, page: &Page) {
    out.push_str(marker);
    write_children(out, &block.children, page);
    out.push_str(marker);
}

/// Backslash-escape characters Markdown would otherwise interpret inline.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
