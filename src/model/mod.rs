//! Declaration graph: the documented symbols the renderers project.
//!
//! Nodes live in a [`DocGraph`] arena and refer to each other by [`NodeId`].
//! Owner, link and override edges are lookup keys only; the graph owns every
//! node.

pub mod load;

use crate::content::Content;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a node inside its [`DocGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// What a declaration node describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Module,
    Package,
    Class,
    Interface,
    Enum,
    EnumItem,
    Object,
    AnnotationClass,
    Exception,
    TypeAlias,
    Constructor,
    Function,
    CompanionObjectFunction,
    Property,
    CompanionObjectProperty,
    Field,
    Parameter,
    Receiver,
    TypeParameter,
    Type,
    Supertype,
    UpperBound,
    LowerBound,
    TypeAliasUnderlyingType,
    Modifier,
    NullabilityModifier,
    Value,
    Annotation,
    ExternalClass,
    QualifiedName,
    Signature,
}

impl NodeKind {
    pub fn is_class_like(self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::Interface
                | NodeKind::Enum
                | NodeKind::AnnotationClass
                | NodeKind::Exception
                | NodeKind::Object
                | NodeKind::TypeAlias
        )
    }

    pub fn is_function_like(self) -> bool {
        matches!(
            self,
            NodeKind::Constructor | NodeKind::Function | NodeKind::CompanionObjectFunction
        )
    }

    pub fn is_property_like(self) -> bool {
        matches!(
            self,
            NodeKind::Property | NodeKind::CompanionObjectProperty
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Kind of an outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RefKind {
    /// Structural sub-part: type, parameter, modifier, ...
    Detail,
    Member,
    Annotation,
    /// Visible cross-reference to another declaration.
    Link,
    /// Cross-reference to a builtin that is not hyperlinked.
    HiddenLink,
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub kind: RefKind,
    pub to: NodeId,
}

/// One documented symbol or structural part of one.
#[derive(Debug, Clone)]
pub struct DeclarationNode {
    pub name: String,
    pub kind: NodeKind,
    pub content: Content,
    pub owner: Option<NodeId>,
    pub references: Vec<Reference>,
    /// Present when deprecated; holds the replacement message.
    pub deprecation: Option<Content>,
    /// Documentation asked for this declaration to be hidden.
    pub suppressed: bool,
}

impl DeclarationNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            content: Content::new(),
            owner: None,
            references: Vec::new(),
            deprecation: None,
            suppressed: false,
        }
    }
}

/// Arena of declaration nodes.
#[derive(Debug, Clone, Default)]
pub struct DocGraph {
    nodes: Vec<DeclarationNode>,
}

impl DocGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn insert(&mut self, node: DeclarationNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add(&mut self, name: impl Into<String>, kind: NodeKind) -> NodeId {
        self.insert(DeclarationNode::new(name, kind))
    }

    pub fn get(&self, id: NodeId) -> &DeclarationNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut DeclarationNode {
        &mut self.nodes[id.0]
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { graph: self, id }
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    fn reference(&mut self, from: NodeId, kind: RefKind, to: NodeId) {
        self.get_mut(from).references.push(Reference { kind, to });
    }

    /// Attach `child` as an ordered structural detail of `parent`.
    pub fn append_detail(&mut self, parent: NodeId, child: NodeId) {
        self.get_mut(child).owner = Some(parent);
        self.reference(parent, RefKind::Detail, child);
    }

    pub fn append_member(&mut self, parent: NodeId, child: NodeId) {
        self.get_mut(child).owner = Some(parent);
        self.reference(parent, RefKind::Member, child);
    }

    pub fn annotate(&mut self, node: NodeId, annotation: NodeId) {
        self.get_mut(annotation).owner = Some(node);
        self.reference(node, RefKind::Annotation, annotation);
    }

    pub fn link(&mut self, from: NodeId, to: NodeId) {
        self.reference(from, RefKind::Link, to);
    }

    pub fn hidden_link(&mut self, from: NodeId, to: NodeId) {
        self.reference(from, RefKind::HiddenLink, to);
    }

    pub fn add_override(&mut self, from: NodeId, to: NodeId) {
        self.reference(from, RefKind::Override, to);
    }

    pub fn deprecate(&mut self, node: NodeId, replacement: Content) {
        self.get_mut(node).deprecation = Some(replacement);
    }

    /// Add a detail node in one step and return its id.
    pub fn add_detail(&mut self, parent: NodeId, name: impl Into<String>, kind: NodeKind) -> NodeId {
        let child = self.add(name, kind);
        self.append_detail(parent, child);
        child
    }
}

/// Borrowed view of one node with graph navigation.
#[derive(Clone, Copy)]
pub struct Node<'g> {
    graph: &'g DocGraph,
    id: NodeId,
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` ({:?})", self.kind, self.name, self.id)
    }
}

impl<'g> std::ops::Deref for Node<'g> {
    type Target = DeclarationNode;

    fn deref(&self) -> &DeclarationNode {
        self.graph.get(self.id)
    }
}

impl<'g> Node<'g> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn graph(&self) -> &'g DocGraph {
        self.graph
    }

    fn data(&self) -> &'g DeclarationNode {
        self.graph.get(self.id)
    }

    fn references(&self, kind: RefKind) -> impl Iterator<Item = Node<'g>> + 'g {
        let graph = self.graph;
        self.data()
            .references
            .iter()
            .filter(move |r| r.kind == kind)
            .map(move |r| graph.node(r.to))
    }

    /// Details of `kind`, in declaration order.
    pub fn details(&self, kind: NodeKind) -> Vec<Node<'g>> {
        self.references(RefKind::Detail)
            .filter(|n| n.kind == kind)
            .collect()
    }

    pub fn detail_opt(&self, kind: NodeKind) -> Option<Node<'g>> {
        self.references(RefKind::Detail).find(|n| n.kind == kind)
    }

    /// The first detail of `kind`; its absence is a malformed graph.
    pub fn detail(&self, kind: NodeKind) -> Result<Node<'g>, ModelError> {
        self.detail_opt(kind).ok_or_else(|| ModelError::MissingDetail {
            kind: self.kind,
            name: self.name.clone(),
            wanted: kind,
        })
    }

    pub fn has_detail(&self, kind: NodeKind) -> bool {
        self.detail_opt(kind).is_some()
    }

    pub fn members(&self) -> Vec<Node<'g>> {
        self.references(RefKind::Member).collect()
    }

    pub fn annotations(&self) -> Vec<Node<'g>> {
        self.references(RefKind::Annotation).collect()
    }

    pub fn links(&self) -> Vec<Node<'g>> {
        self.references(RefKind::Link).collect()
    }

    pub fn hidden_links(&self) -> Vec<Node<'g>> {
        self.references(RefKind::HiddenLink).collect()
    }

    pub fn overrides(&self) -> Vec<Node<'g>> {
        self.references(RefKind::Override).collect()
    }

    pub fn owner(&self) -> Option<Node<'g>> {
        self.data().owner.map(|id| self.graph.node(id))
    }

    pub fn require_owner(&self) -> Result<Node<'g>, ModelError> {
        self.owner().ok_or_else(|| ModelError::MissingOwner {
            kind: self.kind,
            name: self.name.clone(),
        })
    }

    pub fn is_deprecated(&self) -> bool {
        self.data().deprecation.is_some()
    }

    /// Dotted name of this declaration; types delegate to what they name.
    /// An explicit `QualifiedName` detail replaces the owner chain.
    pub fn qualified_name(&self) -> String {
        if self.kind == NodeKind::Type {
            return self.qualified_name_from_type();
        }
        if let Some(explicit) = self.detail_opt(NodeKind::QualifiedName) {
            return explicit.name.clone();
        }
        let prefix = match self.owner() {
            Some(owner) if owner.kind != NodeKind::Module => owner.qualified_name(),
            _ => String::new(),
        };
        match (prefix.is_empty(), self.name.is_empty()) {
            (true, _) => self.name.clone(),
            (false, true) => prefix,
            (false, false) => format!("{prefix}.{}", self.name),
        }
    }

    /// Qualified name of the declaration a type node refers to.
    pub fn qualified_name_from_type(&self) -> String {
        if let Some(explicit) = self.detail_opt(NodeKind::QualifiedName) {
            return explicit.name.clone();
        }
        self.links()
            .into_iter()
            .chain(self.hidden_links())
            .next()
            .map(|target| target.qualified_name())
            .unwrap_or_else(|| self.name.clone())
    }
}
