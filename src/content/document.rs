//! Top-level documentation value: body paragraphs plus named sections.

use super::{BlockKind, ContentBlock, ContentNode};
use serde::Serialize;

/// Well-known section tags produced by doc-comment block tags.
pub struct ContentTags;

impl ContentTags {
    pub const DESCRIPTION: &'static str = "Description";
    pub const PARAMETERS: &'static str = "Parameters";
    pub const TYPE_PARAMETERS: &'static str = "Type Parameters";
    pub const RETURN: &'static str = "Return";
    pub const EXCEPTIONS: &'static str = "Exceptions";
    pub const SEE_ALSO: &'static str = "See Also";
    pub const SINCE: &'static str = "Since";
    pub const AUTHORS: &'static str = "Authors";
    pub const RECEIVER: &'static str = "Receiver";
    pub const PROPERTIES: &'static str = "Properties";
    pub const CONSTRUCTOR: &'static str = "Constructor";
    pub const SAMPLE: &'static str = "Sample";
}

/// Documentation attached to one declaration.
///
/// Summary and description are views over the same body: the first child is
/// the summary, everything after it is the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    body: ContentBlock,
    sections: Vec<ContentBlock>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            body: ContentBlock::group(),
            sections: Vec::new(),
        }
    }
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content consisting of a single paragraph of plain text.
    pub fn of_text(text: &str) -> Self {
        let mut content = Self::new();
        let mut paragraph = ContentBlock::new(BlockKind::Paragraph);
        paragraph.text(text);
        content.body.append(paragraph.into());
        content
    }

    pub fn body(&self) -> &ContentBlock {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ContentBlock {
        &mut self.body
    }

    pub fn children(&self) -> &[ContentNode] {
        &self.body.children
    }

    pub fn summary(&self) -> &ContentNode {
        self.body.children.first().unwrap_or(&ContentNode::Empty)
    }

    pub fn description(&self) -> &[ContentNode] {
        self.body.children.get(1..).unwrap_or(&[])
    }

    pub fn sections(&self) -> &[ContentBlock] {
        &self.sections
    }

    /// Add a new section at the end and return it for filling.
    pub fn add_section(&mut self, tag: &str, subject: Option<&str>) -> &mut ContentBlock {
        self.sections.push(ContentBlock::new(BlockKind::Section {
            tag: tag.to_string(),
            subject: subject.map(str::to_string),
        }));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn find_section(&self, tag: &str) -> Option<&ContentBlock> {
        self.sections.iter().find(|s| match &s.kind {
            BlockKind::Section { tag: t, .. } => t.eq_ignore_ascii_case(tag),
            _ => false,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.body.children.is_empty() && self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> ContentNode {
        let mut p = ContentBlock::new(BlockKind::Paragraph);
        p.text(text);
        p.into()
    }

    #[test]
    fn summary_and_description_split_body() {
        let mut content = Content::new();
        content.body_mut().append(paragraph("first"));
        content.body_mut().append(paragraph("second"));
        content.body_mut().append(paragraph("third"));

        assert_eq!(content.summary().plain_text(), "first");
        let rest: Vec<_> = content.description().iter().map(|n| n.plain_text()).collect();
        assert_eq!(rest, vec!["second", "third"]);
    }

    #[test]
    fn empty_content_views() {
        let content = Content::new();
        assert_eq!(content.summary(), &ContentNode::Empty);
        assert!(content.description().is_empty());
        assert!(content.is_empty());
    }

    #[test]
    fn sections_keep_order_and_lookup_ignores_case() {
        let mut content = Content::new();
        content.add_section(ContentTags::PARAMETERS, Some("x")).text("the x");
        content.add_section(ContentTags::RETURN, None).text("result");

        assert_eq!(content.sections().len(), 2);
        let found = content.find_section("return").unwrap();
        assert_eq!(found.plain_text(), "result");
        assert!(content.find_section("Since").is_none());
    }
}
