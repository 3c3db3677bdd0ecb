//! Java-style signatures for Kotlin declarations, as plain text.

use super::{unsupported, LanguageService, RenderMode};
use crate::content::ContentNode;
use crate::error::RenderError;
use crate::model::{Node, NodeKind};

/// Modifiers Java can spell; Kotlin-only ones (`open`, `internal`, `inline`, ...) are dropped.
const JAVA_MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "default",
];

pub struct JavaLanguageService;

impl LanguageService for JavaLanguageService {
    fn language(&self) -> &str {
        "java"
    }

    fn render(&self, node: Node<'_>, _mode: RenderMode) -> Result<ContentNode, RenderError> {
        let text = match node.kind {
            NodeKind::Package => format!("package {}", node.name),
            kind if kind.is_class_like() || kind == NodeKind::EnumItem => render_class(node)?,
            NodeKind::TypeParameter => render_type_parameter(node),
            NodeKind::Type | NodeKind::UpperBound => render_type(node),
            kind if kind.is_function_like() => render_function(node)?,
            kind if kind.is_property_like() => render_property(node)?,
            kind => format!("{}: {}", kind, node.name),
        };
        Ok(ContentNode::Text(text))
    }

    fn summarize_signatures(&self, _nodes: &[Node<'_>]) -> Result<Option<ContentNode>, RenderError> {
        Ok(None)
    }
}

fn primitive_name(kotlin_name: &str) -> Option<&'static str> {
    Some(match kotlin_name {
        "Unit" => "void",
        "Int" => "int",
        "Long" => "long",
        "Short" => "short",
        "Byte" => "byte",
        "Double" => "double",
        "Float" => "float",
        "Char" => "char",
        "Boolean" => "boolean",
        _ => return None,
    })
}

/// `IntArray` → `int`, for the eight primitive array classes.
fn primitive_array_element(kotlin_name: &str) -> Option<&'static str> {
    kotlin_name
        .strip_suffix("Array")
        .filter(|element| *element != "Unit")
        .and_then(primitive_name)
}

fn render_type(node: Node<'_>) -> String {
    let qualified = node.qualified_name_from_type();
    // Unresolved names are taken to be Kotlin builtins.
    let simple = qualified.strip_prefix("kotlin.").unwrap_or(&qualified);
    let arguments = node.details(NodeKind::Type);

    if simple == "Array" {
        let element = arguments
            .first()
            .map(|element| render_type(*element))
            .unwrap_or_else(|| "Object".to_string());
        return format!("{element}[]");
    }
    if let Some(element) = primitive_array_element(simple) {
        return format!("{element}[]");
    }
    if let Some(primitive) = primitive_name(simple) {
        return primitive.to_string();
    }
    if arguments.is_empty() {
        return node.name.clone();
    }
    let arguments: Vec<_> = arguments.into_iter().map(render_type).collect();
    format!("{}<{}>", node.name, arguments.join(", "))
}

fn render_modifiers(node: Node<'_>) -> String {
    node.details(NodeKind::Modifier)
        .iter()
        .map(|m| m.name.as_str())
        .filter(|name| JAVA_MODIFIERS.contains(name))
        .map(|name| format!("{name} "))
        .collect()
}

fn render_type_parameter(node: Node<'_>) -> String {
    let bounds = node.details(NodeKind::UpperBound);
    if bounds.is_empty() {
        return node.name.clone();
    }
    let bounds: Vec<_> = bounds.into_iter().map(render_type).collect();
    format!("{} extends {}", node.name, bounds.join(", "))
}

/// `<T, R> ` with its trailing space, or nothing.
fn render_type_parameters(node: Node<'_>) -> String {
    let parameters = node.details(NodeKind::TypeParameter);
    if parameters.is_empty() {
        return String::new();
    }
    let parameters: Vec<_> = parameters.into_iter().map(render_type_parameter).collect();
    format!("<{}> ", parameters.join(", "))
}

fn render_parameter(node: Node<'_>) -> Result<String, RenderError> {
    let ty = render_type(node.detail(NodeKind::Type)?);
    Ok(format!("{ty} {}", node.name))
}

fn render_class(node: Node<'_>) -> Result<String, RenderError> {
    let keyword = match node.kind {
        NodeKind::Class | NodeKind::Object | NodeKind::Exception => "class ",
        NodeKind::Interface => "interface ",
        NodeKind::AnnotationClass => "@interface ",
        NodeKind::Enum => "enum ",
        NodeKind::EnumItem => "enum value ",
        _ => return Err(unsupported(node, "expressible as a Java class")),
    };
    let text = format!(
        "{}{keyword}{}{}",
        render_modifiers(node),
        node.name,
        render_type_parameters(node).trim_end()
    );
    Ok(text)
}

fn render_function(node: Node<'_>) -> Result<String, RenderError> {
    let head = match node.kind {
        NodeKind::Constructor => {
            format!("{}{}", render_modifiers(node), node.require_owner()?.name)
        }
        NodeKind::Function | NodeKind::CompanionObjectFunction => {
            let result = node
                .detail_opt(NodeKind::Type)
                .map(render_type)
                .unwrap_or_else(|| "void".to_string());
            format!(
                "{}{}{result} {}",
                render_modifiers(node),
                render_type_parameters(node),
                node.name
            )
        }
        _ => return Err(unsupported(node, "a function")),
    };

    // Extension receivers become the first parameter.
    let parameters = node
        .details(NodeKind::Receiver)
        .into_iter()
        .chain(node.details(NodeKind::Parameter))
        .map(render_parameter)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{head}({})", parameters.join(", ")))
}

fn render_property(node: Node<'_>) -> Result<String, RenderError> {
    let receiver = match node.detail_opt(NodeKind::Receiver) {
        Some(receiver) => format!("{}.", render_type(receiver.detail(NodeKind::Type)?)),
        None => String::new(),
    };
    Ok(format!(
        "val {}{receiver}{}: {}",
        render_type_parameters(node),
        node.name,
        render_type(node.detail(NodeKind::Type)?)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocGraph, NodeId};

    fn text(graph: &DocGraph, id: NodeId) -> String {
        match JavaLanguageService.render(graph.node(id), RenderMode::Full).unwrap() {
            ContentNode::Text(text) => text,
            other => panic!("expected flat text, got {other:?}"),
        }
    }

    #[test]
    fn primitive_mapping() {
        let mut graph = DocGraph::new();
        for (kotlin, java) in [
            ("Unit", "void"),
            ("Int", "int"),
            ("Boolean", "boolean"),
            ("Char", "char"),
            ("String", "String"),
        ] {
            let ty = graph.add(kotlin, NodeKind::Type);
            assert_eq!(text(&graph, ty), java);
        }
    }

    #[test]
    fn arrays() {
        let mut graph = DocGraph::new();
        let ints = graph.add("IntArray", NodeKind::Type);
        assert_eq!(text(&graph, ints), "int[]");

        let nested = graph.add("Array", NodeKind::Type);
        let inner = graph.add_detail(nested, "Array", NodeKind::Type);
        graph.add_detail(inner, "String", NodeKind::Type);
        assert_eq!(text(&graph, nested), "String[][]");
    }

    #[test]
    fn user_types_keep_their_names() {
        let mut graph = DocGraph::new();
        let package = graph.add("com.example", NodeKind::Package);
        let class = graph.add("Int", NodeKind::Class);
        graph.append_member(package, class);
        let ty = graph.add("Int", NodeKind::Type);
        graph.link(ty, class);
        assert_eq!(text(&graph, ty), "Int");
    }

    #[test]
    fn extension_function_takes_receiver_first() {
        let mut graph = DocGraph::new();
        let f = graph.add("repeat", NodeKind::Function);
        graph.add_detail(f, "public", NodeKind::Modifier);
        graph.add_detail(f, "open", NodeKind::Modifier);
        let receiver = graph.add_detail(f, "receiver", NodeKind::Receiver);
        graph.add_detail(receiver, "String", NodeKind::Type);
        let n = graph.add_detail(f, "n", NodeKind::Parameter);
        graph.add_detail(n, "Int", NodeKind::Type);
        graph.add_detail(f, "String", NodeKind::Type);

        assert_eq!(
            text(&graph, f),
            "public String repeat(String receiver, int n)"
        );
    }

    #[test]
    fn kotlin_only_modifiers_are_dropped() {
        let mut graph = DocGraph::new();
        let f = graph.add("size", NodeKind::Function);
        for modifier in ["internal", "inline", "suspend", "override", "static", "final"] {
            graph.add_detail(f, modifier, NodeKind::Modifier);
        }
        graph.add_detail(f, "Int", NodeKind::Type);
        assert_eq!(text(&graph, f), "static final int size()");

        let class = graph.add("Point", NodeKind::Class);
        graph.add_detail(class, "public", NodeKind::Modifier);
        graph.add_detail(class, "data", NodeKind::Modifier);
        assert_eq!(text(&graph, class), "public class Point");
    }

    #[test]
    fn generic_function_and_bounds() {
        let mut graph = DocGraph::new();
        let f = graph.add("max", NodeKind::Function);
        let t = graph.add_detail(f, "T", NodeKind::TypeParameter);
        graph.add_detail(t, "Comparable", NodeKind::UpperBound);
        let a = graph.add_detail(f, "a", NodeKind::Parameter);
        graph.add_detail(a, "T", NodeKind::Type);
        graph.add_detail(f, "T", NodeKind::Type);

        assert_eq!(text(&graph, f), "<T extends Comparable> T max(T a)");
    }

    #[test]
    fn classes_and_constructors() {
        let mut graph = DocGraph::new();
        let class = graph.add("Box", NodeKind::Class);
        graph.add_detail(class, "T", NodeKind::TypeParameter);
        assert_eq!(text(&graph, class), "class Box<T>");

        let ctor = graph.add("<init>", NodeKind::Constructor);
        graph.append_member(class, ctor);
        let value = graph.add_detail(ctor, "value", NodeKind::Parameter);
        graph.add_detail(value, "T", NodeKind::Type);
        assert_eq!(text(&graph, ctor), "Box(T value)");

        let object = graph.add("Registry", NodeKind::Object);
        assert_eq!(text(&graph, object), "class Registry");
        let entry = graph.add("RED", NodeKind::EnumItem);
        assert_eq!(text(&graph, entry), "enum value RED");
    }

    #[test]
    fn properties_and_fallbacks() {
        let mut graph = DocGraph::new();
        let p = graph.add("size", NodeKind::Property);
        graph.add_detail(p, "Int", NodeKind::Type);
        assert_eq!(text(&graph, p), "val size: int");

        let package = graph.add("com.example", NodeKind::Package);
        assert_eq!(text(&graph, package), "package com.example");

        let field = graph.add("count", NodeKind::Field);
        assert_eq!(text(&graph, field), "Field: count");
    }

    #[test]
    fn type_alias_is_unsupported() {
        let mut graph = DocGraph::new();
        let alias = graph.add("Handler", NodeKind::TypeAlias);
        let err = JavaLanguageService
            .render(graph.node(alias), RenderMode::Full)
            .unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedShape { .. }));
    }

    #[test]
    fn never_summarizes() {
        let mut graph = DocGraph::new();
        let a = graph.add("f", NodeKind::Function);
        let b = graph.add("f", NodeKind::Function);
        assert!(JavaLanguageService
            .summarize_signatures(&[graph.node(a), graph.node(b)])
            .unwrap()
            .is_none());
    }
}
