//! Pages: everything documented under one top-level declaration, in reading
//! order, ready for an emitter.

use crate::content::{Content, ContentNode};
use crate::error::RenderError;
use crate::model::{Node, NodeId, NodeKind};
use crate::signature::{LanguageService, RenderMode};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions {
    pub mode: RenderMode,
    /// Keep declarations whose docs carry `@suppress`.
    pub show_suppressed: bool,
}

#[derive(Debug, Serialize)]
pub struct Page {
    pub title: String,
    pub language: String,
    pub entries: Vec<PageEntry>,
    pub summaries: Vec<SummaryEntry>,
    #[serde(skip)]
    anchors: HashMap<NodeId, String>,
}

impl Page {
    /// In-page anchor of a declaration, if it is on this page.
    pub fn anchor(&self, id: NodeId) -> Option<&str> {
        self.anchors.get(&id).map(String::as_str)
    }
}

/// One declaration with its signature and documentation.
#[derive(Debug, Serialize)]
pub struct PageEntry {
    pub title: String,
    pub anchor: String,
    pub kind: NodeKind,
    /// Nesting below the page root; the root itself is 0.
    pub depth: usize,
    pub signature: ContentNode,
    pub docs: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<Content>,
}

/// Generalised signature standing for a group of same-named members.
#[derive(Debug, Serialize)]
pub struct SummaryEntry {
    pub title: String,
    pub anchor: String,
    pub signature: ContentNode,
    /// Anchors of the summarized entries.
    pub overloads: Vec<String>,
}

/// Build the page for `root`: the root first, then its members depth-first.
pub fn build_page(
    root: Node<'_>,
    service: &dyn LanguageService,
    options: &PageOptions,
) -> Result<Page, RenderError> {
    let mut builder = PageBuilder {
        service,
        options,
        used: HashSet::new(),
        page: Page {
            title: service.render_name(root),
            language: service.language().to_string(),
            entries: Vec::new(),
            summaries: Vec::new(),
            anchors: HashMap::new(),
        },
    };
    builder.visit(root, 0)?;
    tracing::debug!(
        title = %builder.page.title,
        entries = builder.page.entries.len(),
        summaries = builder.page.summaries.len(),
        "built page"
    );
    Ok(builder.page)
}

struct PageBuilder<'s> {
    service: &'s dyn LanguageService,
    options: &'s PageOptions,
    used: HashSet<String>,
    page: Page,
}

impl PageBuilder<'_> {
    fn visit(&mut self, node: Node<'_>, depth: usize) -> Result<(), RenderError> {
        let anchor = self.unique_anchor(&slug(&node.qualified_name()));
        self.page.anchors.insert(node.id(), anchor.clone());
        let signature = self.service.render(node, self.options.mode)?;
        self.page.entries.push(PageEntry {
            title: self.service.render_name(node),
            anchor,
            kind: node.kind,
            depth,
            signature,
            docs: node.content.clone(),
            deprecation: node.deprecation.clone(),
        });

        let members: Vec<_> = node
            .members()
            .into_iter()
            .filter(|m| self.options.show_suppressed || !m.suppressed)
            .collect();
        for member in &members {
            self.visit(*member, depth + 1)?;
        }
        self.summarize(&members)
    }

    /// Summaries for same-named members, in order of first appearance.
    fn summarize(&mut self, members: &[Node<'_>]) -> Result<(), RenderError> {
        let mut groups: Vec<(String, Vec<Node<'_>>)> = Vec::new();
        for member in members {
            match groups.iter_mut().find(|(name, _)| *name == member.name) {
                Some((_, group)) => group.push(*member),
                None => groups.push((member.name.clone(), vec![*member])),
            }
        }

        for (name, group) in groups.into_iter().filter(|(_, g)| g.len() > 1) {
            let Some(signature) = self.service.summarize_signatures(&group)? else {
                continue;
            };
            let overloads = group
                .iter()
                .filter_map(|n| self.page.anchors.get(&n.id()).cloned())
                .collect();
            let base = match group[0].owner() {
                Some(owner) => format!("{}-{}-summary", slug(&owner.qualified_name()), slug(&name)),
                None => format!("{}-summary", slug(&name)),
            };
            let anchor = self.unique_anchor(&base);
            self.page.summaries.push(SummaryEntry {
                title: name,
                anchor,
                signature,
                overloads,
            });
        }
        Ok(())
    }

    /// Overloads share a slug; later ones get a numeric suffix.
    fn unique_anchor(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "declaration" } else { base };
        let mut anchor = base.to_string();
        let mut n = 2;
        while !self.used.insert(anchor.clone()) {
            anchor = format!("{base}-{n}");
            n += 1;
        }
        anchor
    }
}

/// Lowercase, alphanumerics kept, everything else collapsed to single `-`.
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocGraph;
    use crate::signature::kotlin::KotlinLanguageService;

    fn extension(graph: &mut DocGraph, owner: NodeId, receiver_class: NodeId, receiver: &str) {
        let f = graph.add("first", NodeKind::Function);
        graph.append_member(owner, f);
        graph.add_detail(f, "T", NodeKind::TypeParameter);
        let r = graph.add_detail(f, "$receiver", NodeKind::Receiver);
        let ty = graph.add_detail(r, receiver, NodeKind::Type);
        graph.link(ty, receiver_class);
        graph.add_detail(f, "T", NodeKind::Type);
    }

    #[test]
    fn slugs() {
        assert_eq!(slug("com.example.Greeter"), "com-example-greeter");
        assert_eq!(slug("kotlin.<init>"), "kotlin-init");
        assert_eq!(slug("..."), "");
    }

    #[test]
    fn entries_are_depth_first_with_unique_anchors() {
        let mut graph = DocGraph::new();
        let package = graph.add("kotlin", NodeKind::Package);
        let int_array = graph.add("IntArray", NodeKind::Class);
        let list = graph.add("List", NodeKind::Class);
        graph.append_member(package, int_array);
        graph.append_member(package, list);
        extension(&mut graph, package, int_array, "IntArray");
        extension(&mut graph, package, list, "List");

        let page = build_page(
            graph.node(package),
            &KotlinLanguageService,
            &PageOptions::default(),
        )
        .unwrap();

        assert_eq!(page.title, "kotlin");
        assert_eq!(page.language, "kotlin");
        let anchors: Vec<_> = page.entries.iter().map(|e| e.anchor.as_str()).collect();
        assert_eq!(
            anchors,
            vec![
                "kotlin",
                "kotlin-intarray",
                "kotlin-list",
                "kotlin-first",
                "kotlin-first-2"
            ]
        );
        assert_eq!(page.entries[3].depth, 1);
        assert_eq!(page.anchor(int_array), Some("kotlin-intarray"));

        assert_eq!(page.summaries.len(), 1);
        let summary = &page.summaries[0];
        assert_eq!(summary.title, "first");
        assert_eq!(summary.overloads, vec!["kotlin-first", "kotlin-first-2"]);
        assert_eq!(
            summary.signature.plain_text(),
            "fun <T> any_array_or_list<T>.first(): T"
        );
    }

    #[test]
    fn suppressed_members_are_hidden_unless_requested() {
        let mut graph = DocGraph::new();
        let class = graph.add("Widget", NodeKind::Class);
        let hidden = graph.add("internalState", NodeKind::Property);
        graph.add_detail(hidden, "Int", NodeKind::Type);
        graph.append_member(class, hidden);
        graph.get_mut(hidden).suppressed = true;

        let service = KotlinLanguageService;
        let page = build_page(graph.node(class), &service, &PageOptions::default()).unwrap();
        assert_eq!(page.entries.len(), 1);

        let options = PageOptions {
            show_suppressed: true,
            ..PageOptions::default()
        };
        let page = build_page(graph.node(class), &service, &options).unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[1].signature.plain_text(), "val internalState: Int");
    }

    #[test]
    fn render_errors_propagate() {
        let mut graph = DocGraph::new();
        let class = graph.add("Point", NodeKind::Class);
        let ctor = graph.add("<init>", NodeKind::Constructor);
        // Member edge without ownership: the constructor cannot find its class.
        graph.get_mut(class).references.push(crate::model::Reference {
            kind: crate::model::RefKind::Member,
            to: ctor,
        });
        let result = build_page(graph.node(class), &KotlinLanguageService, &PageOptions::default());
        assert!(result.is_err());
    }
}
