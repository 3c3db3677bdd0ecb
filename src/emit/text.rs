//! Plain-text emitter for terminals and quick inspection.

use super::Emitter;
use crate::content::{BlockKind, Content, ContentBlock, ContentNode};
use crate::error::EmitError;
use crate::page::Page;

const INDENT: &str = "    ";

pub struct TextEmitter;

impl Emitter for TextEmitter {
    fn emit(&self, page: &Page) -> Result<String, EmitError> {
        let mut out = String::new();
        underline(&mut out, &page.title, '=');

        for entry in &page.entries {
            if entry.depth > 0 {
                underline(&mut out, &entry.title, '-');
            }
            out.push_str(&entry.signature.plain_text());
            out.push('\n');
            if let Some(ref deprecation) = entry.deprecation {
                out.push_str(&format!(
                    "{INDENT}Deprecated: {}\n",
                    deprecation.body().plain_text().trim()
                ));
            }
            write_docs(&mut out, &entry.docs);
            out.push('\n');
        }

        if !page.summaries.is_empty() {
            underline(&mut out, "Summaries", '-');
            for summary in &page.summaries {
                out.push_str(&format!(
                    "{}\n{INDENT}{}\n",
                    summary.title,
                    summary.signature.plain_text()
                ));
            }
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

fn underline(out: &mut String, title: &str, c: char) {
    out.push_str(title);
    out.push('\n');
    out.extend(std::iter::repeat(c).take(title.chars().count()));
    out.push_str("\n\n");
}

fn write_docs(out: &mut String, docs: &Content) {
    if docs.is_empty() {
        return;
    }
    let mut paragraphs: Vec<String> = docs.children().iter().map(block_text).collect();
    paragraphs.retain(|p| !p.is_empty());

    let mut previous_tag: Option<&str> = None;
    let mut sections = String::new();
    for section in docs.sections() {
        let BlockKind::Section { ref tag, ref subject } = section.kind else {
            continue;
        };
        let body = section.plain_text().trim().replace('\n', " ");
        match subject {
            Some(subject) => {
                if previous_tag != Some(tag.as_str()) {
                    sections.push_str(&format!("{tag}:\n"));
                }
                sections.push_str(&format!("  {subject}: {body}\n"));
            }
            None => sections.push_str(&format!("{tag}: {body}\n")),
        }
        previous_tag = Some(tag.as_str());
    }
    if !sections.is_empty() {
        paragraphs.push(sections.trim_end().to_string());
    }

    for paragraph in paragraphs {
        out.push('\n');
        for line in paragraph.lines() {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// Text of one top-level documentation block.
fn block_text(node: &ContentNode) -> String {
    let Some(block) = node.as_block() else {
        return node.plain_text().trim().to_string();
    };
    match block.kind {
        BlockKind::UnorderedList | BlockKind::OrderedList => list_text(block),
        BlockKind::BlockCode { .. } => block
            .plain_text()
            .trim_end()
            .lines()
            .map(|line| format!("{INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => block.plain_text().trim().to_string(),
    }
}

fn list_text(list: &ContentBlock) -> String {
    let ordered = list.kind == BlockKind::OrderedList;
    list.children
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let text = item.plain_text().trim().replace('\n', " ");
            if ordered {
                format!("{}. {text}", i + 1)
            } else {
                format!("- {text}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::fixture;
    use crate::page::{build_page, PageOptions};
    use crate::signature::kotlin::KotlinLanguageService;

    fn emit_fixture() -> String {
        let loaded = fixture::load();
        let page = build_page(
            loaded.graph.node(loaded.roots[0]),
            &KotlinLanguageService,
            &PageOptions::default(),
        )
        .unwrap();
        TextEmitter.emit(&page).unwrap()
    }

    #[test]
    fn prints_titles_signatures_and_docs() {
        let out = emit_fixture();
        assert!(out.starts_with("kotlin\n======\n\npackage kotlin\n"));
        assert!(out.contains("Greeter\n-------\n\nclass Greeter\n"));
        assert!(out.contains("    Says hello. See greet.\n"));
        assert!(out.contains("    Parameters:\n      name: who to greet\n    Since: 1.0\n"));
    }

    #[test]
    fn prints_deprecation_and_summaries() {
        let out = emit_fixture();
        assert!(out.contains("fun greet(name: String)\n    Deprecated: Use wave\n"));
        assert!(out.contains("Summaries\n---------\n\nfirst\n    fun <T> any_array_or_list<T>.first(): T\n"));
    }

    #[test]
    fn lists_and_code() {
        let list = {
            let mut list = ContentBlock::new(BlockKind::OrderedList);
            let mut item = ContentBlock::new(BlockKind::ListItem);
            item.text("one");
            list.append(item.into());
            list
        };
        assert_eq!(block_text(&list.into()), "1. one");

        let mut code = ContentBlock::new(BlockKind::BlockCode {
            language: "kotlin".into(),
        });
        code.text("val a = 1\n");
        assert_eq!(block_text(&code.into()), "    val a = 1");
    }
}
