//! JSON declaration loader: the boundary where an upstream extractor hands
//! its symbols to the renderers.
//!
//! Links are written as qualified names and resolved once the whole graph is
//! built, so a type may refer to a class declared later in the file.

use super::{DocGraph, NodeId, NodeKind};
use crate::content::{BlockKind, Content, ContentBlock};
use crate::error::ModelError;
use crate::markup::tags;
use serde::Deserialize;
use std::collections::HashMap;

/// Input file: a list of top-level declarations.
#[derive(Debug, Deserialize)]
pub struct DeclFile {
    pub declarations: Vec<DeclInput>,
}

/// One declaration as written by the extractor.
#[derive(Debug, Deserialize)]
pub struct DeclInput {
    pub name: String,
    pub kind: NodeKind,
    /// Raw documentation comment (Markdown with `@tag` lines).
    #[serde(default)]
    pub doc: Option<String>,
    /// Deprecation message; presence marks the node deprecated.
    #[serde(default)]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub qualified_name: Option<String>,
    #[serde(default)]
    pub details: Vec<DeclInput>,
    #[serde(default)]
    pub members: Vec<DeclInput>,
    #[serde(default)]
    pub annotations: Vec<DeclInput>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub hidden_links: Vec<String>,
    /// Declarations this one overrides.
    #[serde(default)]
    pub overrides: Vec<String>,
}

/// A loaded graph and its top-level declarations.
#[derive(Debug)]
pub struct Loaded {
    pub graph: DocGraph,
    pub roots: Vec<NodeId>,
}

#[derive(Clone, Copy)]
enum Edge {
    Link,
    Hidden,
    Override,
}

struct PendingLink {
    from: NodeId,
    target: String,
    edge: Edge,
}

#[derive(Default)]
struct Builder {
    graph: DocGraph,
    links: Vec<PendingLink>,
    docs: Vec<(NodeId, String)>,
}

impl Builder {
    fn insert(&mut self, decl: DeclInput) -> NodeId {
        let id = self.graph.add(decl.name, decl.kind);
        if let Some(message) = decl.deprecated {
            self.graph.deprecate(id, Content::of_text(&message));
        }
        if let Some(doc) = decl.doc {
            self.docs.push((id, doc));
        }
        if let Some(qualified) = decl.qualified_name {
            self.graph.add_detail(id, qualified, NodeKind::QualifiedName);
        }
        for annotation in decl.annotations {
            let child = self.insert(annotation);
            self.graph.annotate(id, child);
        }
        for detail in decl.details {
            let child = self.insert(detail);
            self.graph.append_detail(id, child);
        }
        for member in decl.members {
            let child = self.insert(member);
            self.graph.append_member(id, child);
        }
        let edges = [
            (decl.links, Edge::Link),
            (decl.hidden_links, Edge::Hidden),
            (decl.overrides, Edge::Override),
        ];
        for (targets, edge) in edges {
            for target in targets {
                self.links.push(PendingLink { from: id, target, edge });
            }
        }
        id
    }
}

/// Parse a declaration file and build its graph, links and documentation.
pub fn load_str(input: &str) -> Result<Loaded, ModelError> {
    let file: DeclFile = serde_json::from_str(input)?;
    Ok(build(file))
}

pub fn build(file: DeclFile) -> Loaded {
    let mut builder = Builder::default();
    let roots: Vec<NodeId> = file
        .declarations
        .into_iter()
        .map(|decl| builder.insert(decl))
        .collect();

    let Builder { mut graph, links, docs } = builder;
    let index = NameIndex::new(&graph);

    for link in links {
        match (index.lookup(&link.target), link.edge) {
            (Some(to), Edge::Link) => graph.link(link.from, to),
            (Some(to), Edge::Hidden) => graph.hidden_link(link.from, to),
            (Some(to), Edge::Override) => graph.add_override(link.from, to),
            (None, _) => tracing::warn!(
                from = %graph.get(link.from).name,
                target = %link.target,
                "unresolved link"
            ),
        }
    }

    for (id, text) in docs {
        let doc = tags::parse_doc_comment(&text, &|label: &str| index.resolve_link(label));
        let node = graph.get_mut(id);
        node.content = doc.content;
        node.suppressed = doc.suppressed;
    }

    Loaded { graph, roots }
}

/// Lookup of linkable declarations by qualified and simple name.
pub struct NameIndex {
    qualified: HashMap<String, NodeId>,
    simple: HashMap<String, Vec<NodeId>>,
}

impl NameIndex {
    pub fn new(graph: &DocGraph) -> Self {
        let mut qualified = HashMap::new();
        let mut simple: HashMap<String, Vec<NodeId>> = HashMap::new();
        for id in graph.ids() {
            let node = graph.node(id);
            if !is_linkable(node.kind) {
                continue;
            }
            qualified.entry(node.qualified_name()).or_insert(id);
            simple.entry(node.name.clone()).or_default().push(id);
        }
        Self { qualified, simple }
    }

    /// Exact qualified name first, then a unique simple name.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        if let Some(id) = self.qualified.get(name) {
            return Some(*id);
        }
        match self.simple.get(name).map(Vec::as_slice) {
            Some([only]) => Some(*only),
            _ => None,
        }
    }

    /// Link resolver for the markup builder. Unknown labels become a
    /// placeholder external link to `#`.
    pub fn resolve_link(&self, label: &str) -> ContentBlock {
        let name = label.trim().trim_matches('`');
        match self.lookup(name) {
            Some(target) => ContentBlock::new(BlockKind::InternalLink { target }),
            None => {
                tracing::debug!(label, "unresolved documentation link");
                ContentBlock::new(BlockKind::ExternalLink { href: "#".to_string() })
            }
        }
    }
}

fn is_linkable(kind: NodeKind) -> bool {
    kind.is_class_like()
        || kind.is_function_like()
        || kind.is_property_like()
        || matches!(
            kind,
            NodeKind::Package | NodeKind::EnumItem | NodeKind::ExternalClass | NodeKind::Field
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentNode;

    const INPUT: &str = r#"{
        "declarations": [
            {
                "name": "kotlin",
                "kind": "Package",
                "members": [
                    { "name": "Unit", "kind": "Class" },
                    {
                        "name": "Greeter",
                        "kind": "Class",
                        "doc": "Says hello. See [greet].\n\nMore text.\n\n@since 1.0",
                        "members": [
                            {
                                "name": "greet",
                                "kind": "Function",
                                "deprecated": "use hello",
                                "details": [
                                    { "name": "Unit", "kind": "Type", "hidden_links": ["kotlin.Unit"] }
                                ]
                            }
                        ]
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn loads_nested_declarations() {
        let loaded = load_str(INPUT).unwrap();
        assert_eq!(loaded.roots.len(), 1);
        let package = loaded.graph.node(loaded.roots[0]);
        let members = package.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].qualified_name(), "kotlin.Greeter");
        let greet = members[1].members()[0];
        assert!(greet.is_deprecated());
        assert_eq!(greet.owner().unwrap().name, "Greeter");
    }

    #[test]
    fn resolves_hidden_links_by_qualified_name() {
        let loaded = load_str(INPUT).unwrap();
        let package = loaded.graph.node(loaded.roots[0]);
        let greet = package.members()[1].members()[0];
        let ty = greet.detail(NodeKind::Type).unwrap();
        assert_eq!(ty.hidden_links()[0].qualified_name(), "kotlin.Unit");
    }

    #[test]
    fn builds_documentation_with_resolved_links() {
        let loaded = load_str(INPUT).unwrap();
        let package = loaded.graph.node(loaded.roots[0]);
        let greeter = package.members()[1];
        let greet_id = greeter.members()[0].id();

        let summary = greeter.content.summary().as_block().unwrap();
        let link = summary
            .children
            .iter()
            .filter_map(ContentNode::as_block)
            .find(|b| matches!(b.kind, BlockKind::InternalLink { .. }))
            .unwrap();
        assert_eq!(link.kind, BlockKind::InternalLink { target: greet_id });
        assert_eq!(greeter.content.description().len(), 1);
        assert!(greeter.content.find_section("Since").is_some());
    }

    #[test]
    fn resolves_override_edges() {
        let loaded = load_str(
            r#"{"declarations": [
                { "name": "Shape", "kind": "Interface", "qualified_name": "geo.Shape",
                  "members": [{ "name": "area", "kind": "Function" }] },
                { "name": "Circle", "kind": "Class",
                  "members": [{ "name": "area", "kind": "Function",
                                "overrides": ["geo.Shape.area", "geo.Missing.area"] }] }
            ]}"#,
        )
        .unwrap();
        let shape_area = loaded.graph.node(loaded.roots[0]).members()[0];
        let circle_area = loaded.graph.node(loaded.roots[1]).members()[0];
        let overridden = circle_area.overrides();
        assert_eq!(overridden.len(), 1);
        assert_eq!(overridden[0].id(), shape_area.id());
        assert!(circle_area.links().is_empty());
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(load_str("{\"declarations\": [{\"name\": 1}]}").is_err());
    }
}
