//! Doc-comment block tags (`@param`, `@return`, ...) → content sections.
//!
//! Everything before the first tag line is the body and is built as block
//! content. Each tag becomes a section whose text is built inline.

use super::builder::{build_content_to, build_inline_content_to, LinkResolver};
use super::parse::parse_markdown;
use crate::content::{Content, ContentTags};
use regex::Regex;
use std::sync::LazyLock;

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*@([A-Za-z]+)\b\s*(.*)$").unwrap());

static RE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(```|~~~)").unwrap());

/// Parsed documentation comment.
#[derive(Debug, Default)]
pub struct DocComment {
    pub content: Content,
    /// `@suppress` was present: upstream should hide the declaration.
    pub suppressed: bool,
}

struct TagEntry {
    name: String,
    text: String,
}

/// Tags whose first word names what the section is about.
fn takes_subject(tag: &str) -> bool {
    matches!(
        tag,
        "param" | "property" | "throws" | "exception" | "see" | "sample"
    )
}

fn section_tag(tag: &str) -> &str {
    match tag {
        "param" => ContentTags::PARAMETERS,
        "property" => ContentTags::PROPERTIES,
        "return" => ContentTags::RETURN,
        "throws" | "exception" => ContentTags::EXCEPTIONS,
        "see" => ContentTags::SEE_ALSO,
        "since" => ContentTags::SINCE,
        "author" => ContentTags::AUTHORS,
        "receiver" => ContentTags::RECEIVER,
        "constructor" => ContentTags::CONSTRUCTOR,
        "sample" => ContentTags::SAMPLE,
        other => other,
    }
}

/// Split `text` into body and tags and build a [`Content`] from them.
pub fn parse_doc_comment(text: &str, resolver: &LinkResolver<'_>) -> DocComment {
    let mut body = String::new();
    let mut tags: Vec<TagEntry> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        if RE_FENCE.is_match(line) {
            in_fence = !in_fence;
        }
        let tag = if in_fence { None } else { RE_TAG.captures(line) };
        if let Some(caps) = tag {
            tags.push(TagEntry {
                name: caps[1].to_string(),
                text: caps[2].to_string(),
            });
        } else if let Some(current) = tags.last_mut() {
            current.text.push('\n');
            current.text.push_str(line);
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }

    let mut doc = DocComment::default();
    build_content_to(&parse_markdown(&body), doc.content.body_mut(), resolver);

    for tag in tags {
        if tag.name == "suppress" {
            doc.suppressed = true;
            continue;
        }
        let (subject, rest) = if takes_subject(&tag.name) {
            split_subject(&tag.text)
        } else {
            (None, tag.text.trim())
        };

        let section = doc.content.add_section(section_tag(&tag.name), subject);
        if tag.name == "see" {
            if let Some(target) = subject {
                let mut link = resolver(target);
                link.text(target);
                section.append(link.into());
                if !rest.is_empty() {
                    section.text(" ");
                }
            }
        }
        if !rest.is_empty() {
            build_inline_content_to(&parse_markdown(rest), section, resolver);
        }
    }
    doc
}

/// First word (brackets stripped) and the remaining text.
fn split_subject(text: &str) -> (Option<&str>, &str) {
    let text = text.trim();
    if text.is_empty() {
        return (None, "");
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let subject = text[..end].trim_start_matches('[').trim_end_matches(']');
    (Some(subject), text[end..].trim())
}
