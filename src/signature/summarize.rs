//! Overload summarization: extension declarations that differ only in their
//! receiver collapse into one signature over a receiver family.

use crate::content::{ContentBlock, IdentifierKind};
use crate::model::{Node, NodeKind};

const ARRAY_CLASSES: &[&str] = &[
    "kotlin.Array",
    "kotlin.BooleanArray",
    "kotlin.ByteArray",
    "kotlin.CharArray",
    "kotlin.ShortArray",
    "kotlin.IntArray",
    "kotlin.LongArray",
    "kotlin.FloatArray",
    "kotlin.DoubleArray",
];

const LIST_CLASSES: &[&str] = &["kotlin.List"];

const ITERABLE_CLASSES: &[&str] = &[
    "kotlin.Collection",
    "kotlin.Sequence",
    "kotlin.Iterable",
    "kotlin.Map",
    "kotlin.String",
    "kotlin.CharSequence",
];

/// Receiver families, from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    Array,
    ArrayOrList,
    Iterable,
}

impl ReceiverKind {
    const ALL: [ReceiverKind; 3] = [
        ReceiverKind::Array,
        ReceiverKind::ArrayOrList,
        ReceiverKind::Iterable,
    ];

    /// Placeholder printed in place of the receiver type.
    pub fn receiver_name(self) -> &'static str {
        match self {
            ReceiverKind::Array => "any_array",
            ReceiverKind::ArrayOrList => "any_array_or_list",
            ReceiverKind::Iterable => "any_iterable",
        }
    }

    pub fn contains(self, qualified_name: &str) -> bool {
        match self {
            ReceiverKind::Array => ARRAY_CLASSES.contains(&qualified_name),
            ReceiverKind::ArrayOrList => {
                ReceiverKind::Array.contains(qualified_name) || LIST_CLASSES.contains(&qualified_name)
            }
            ReceiverKind::Iterable => {
                ReceiverKind::ArrayOrList.contains(qualified_name)
                    || ITERABLE_CLASSES.contains(&qualified_name)
            }
        }
    }
}

/// Qualified receiver type of an extension function or property.
pub fn receiver_qualified_name(node: Node<'_>) -> Option<String> {
    if !matches!(node.kind, NodeKind::Function | NodeKind::Property) {
        return None;
    }
    let receivers = node.details(NodeKind::Receiver);
    let [receiver] = receivers.as_slice() else {
        return None;
    };
    receiver
        .detail_opt(NodeKind::Type)
        .map(|ty| ty.qualified_name_from_type())
}

/// Narrowest family containing every node's receiver, if all have one.
pub fn receiver_kind(nodes: &[Node<'_>]) -> Option<ReceiverKind> {
    let names = nodes
        .iter()
        .map(|node| receiver_qualified_name(*node))
        .collect::<Option<Vec<_>>>()?;
    ReceiverKind::ALL
        .into_iter()
        .find(|kind| names.iter().all(|name| kind.contains(name)))
}

/// Hook for replacing how a signature prints its receiver.
pub trait SignatureMapper {
    fn render_receiver(&self, receiver: Node<'_>, to: &mut ContentBlock);
}

/// Prints the receiver as `family<T>`.
pub struct SummarizingMapper {
    kind: ReceiverKind,
    type_parameter: String,
}

impl SummarizingMapper {
    pub fn new(kind: ReceiverKind, type_parameter: &str) -> Self {
        Self {
            kind,
            type_parameter: type_parameter.to_string(),
        }
    }
}

impl SignatureMapper for SummarizingMapper {
    fn render_receiver(&self, _receiver: Node<'_>, to: &mut ContentBlock) {
        to.identifier_kind(
            self.kind.receiver_name(),
            IdentifierKind::SummarizedTypeName,
            None,
        );
        to.text(format!("<{}>", self.type_parameter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentNode;
    use crate::model::{DocGraph, NodeId};
    use crate::signature::kotlin::KotlinLanguageService;
    use crate::signature::LanguageService;

    /// Extension function `fun <T> <receiver>.first(): T`.
    fn extension(graph: &mut DocGraph, receiver_class: NodeId, receiver_name: &str) -> NodeId {
        let f = graph.add("first", NodeKind::Function);
        graph.add_detail(f, "T", NodeKind::TypeParameter);
        let receiver = graph.add_detail(f, "$receiver", NodeKind::Receiver);
        let ty = graph.add_detail(receiver, receiver_name, NodeKind::Type);
        graph.link(ty, receiver_class);
        graph.add_detail(f, "T", NodeKind::Type);
        f
    }

    fn stdlib(graph: &mut DocGraph, names: &[&str]) -> Vec<NodeId> {
        let package = graph.add("kotlin", NodeKind::Package);
        names
            .iter()
            .map(|name| {
                let class = graph.add(*name, NodeKind::Class);
                graph.append_member(package, class);
                class
            })
            .collect()
    }

    #[test]
    fn families_are_nested() {
        assert!(ReceiverKind::Array.contains("kotlin.IntArray"));
        assert!(!ReceiverKind::Array.contains("kotlin.List"));
        assert!(ReceiverKind::ArrayOrList.contains("kotlin.List"));
        assert!(ReceiverKind::Iterable.contains("kotlin.Array"));
        assert!(ReceiverKind::Iterable.contains("kotlin.Sequence"));
        assert!(!ReceiverKind::Iterable.contains("com.example.Bag"));
    }

    #[test]
    fn array_and_list_summarize_together() {
        let mut graph = DocGraph::new();
        let ids = stdlib(&mut graph, &["IntArray", "List"]);
        let on_array = extension(&mut graph, ids[0], "IntArray");
        let on_list = extension(&mut graph, ids[1], "List");
        let nodes = [graph.node(on_array), graph.node(on_list)];

        assert_eq!(receiver_kind(&nodes), Some(ReceiverKind::ArrayOrList));

        let summary = KotlinLanguageService
            .summarize_signatures(&nodes)
            .unwrap()
            .unwrap();
        assert_eq!(summary.plain_text(), "fun <T> any_array_or_list<T>.first(): T");
        let block = summary.as_block().unwrap();
        assert!(block.children.contains(&ContentNode::Identifier {
            text: "any_array_or_list".into(),
            kind: IdentifierKind::SummarizedTypeName,
            signature: None,
        }));
    }

    #[test]
    fn extension_properties_summarize() {
        let mut graph = DocGraph::new();
        let ids = stdlib(&mut graph, &["IntArray", "List"]);
        let properties: Vec<NodeId> = [(ids[0], "IntArray"), (ids[1], "List")]
            .into_iter()
            .map(|(class, name)| {
                let p = graph.add("lastIndex", NodeKind::Property);
                graph.add_detail(p, "T", NodeKind::TypeParameter);
                let receiver = graph.add_detail(p, "$receiver", NodeKind::Receiver);
                let ty = graph.add_detail(receiver, name, NodeKind::Type);
                graph.link(ty, class);
                graph.add_detail(p, "Int", NodeKind::Type);
                p
            })
            .collect();
        let nodes = [graph.node(properties[0]), graph.node(properties[1])];

        let summary = KotlinLanguageService
            .summarize_signatures(&nodes)
            .unwrap()
            .unwrap();
        assert_eq!(
            summary.plain_text(),
            "val <T> any_array_or_list<T>.lastIndex: Int"
        );
    }

    #[test]
    fn arrays_only_use_narrowest_family() {
        let mut graph = DocGraph::new();
        let ids = stdlib(&mut graph, &["IntArray", "LongArray"]);
        let a = extension(&mut graph, ids[0], "IntArray");
        let b = extension(&mut graph, ids[1], "LongArray");
        assert_eq!(
            receiver_kind(&[graph.node(a), graph.node(b)]),
            Some(ReceiverKind::Array)
        );
    }

    #[test]
    fn unrelated_receivers_do_not_summarize() {
        let mut graph = DocGraph::new();
        let ids = stdlib(&mut graph, &["IntArray"]);
        let package = graph.add("com.example", NodeKind::Package);
        let bag = graph.add("Bag", NodeKind::Class);
        graph.append_member(package, bag);
        let a = extension(&mut graph, ids[0], "IntArray");
        let b = extension(&mut graph, bag, "Bag");

        let nodes = [graph.node(a), graph.node(b)];
        assert_eq!(receiver_kind(&nodes), None);
        assert!(KotlinLanguageService
            .summarize_signatures(&nodes)
            .unwrap()
            .is_none());
    }

    #[test]
    fn single_node_is_not_summarized() {
        let mut graph = DocGraph::new();
        let ids = stdlib(&mut graph, &["IntArray"]);
        let a = extension(&mut graph, ids[0], "IntArray");
        assert!(KotlinLanguageService
            .summarize_signatures(&[graph.node(a)])
            .unwrap()
            .is_none());
    }

    #[test]
    fn nodes_without_receiver_are_skipped() {
        let mut graph = DocGraph::new();
        let plain = graph.add("first", NodeKind::Function);
        let other = graph.add("first", NodeKind::Function);
        assert_eq!(receiver_qualified_name(graph.node(plain)), None);
        assert_eq!(receiver_kind(&[graph.node(plain), graph.node(other)]), None);
    }
}
