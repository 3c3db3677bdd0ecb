//! Kotlin signatures.
//!
//! Output is built from semantic content pieces (keywords, symbols,
//! identifiers, non-breaking spaces) so emitters can style and wrap it.

use super::summarize::{receiver_kind, SignatureMapper, SummarizingMapper};
use super::{
    identifier_or_deprecated, render_linked, render_list, render_modifier_keyword, render_package,
    unsupported, LanguageService, RenderMode,
};
use crate::content::{ContentBlock, ContentNode, IdentifierKind};
use crate::error::RenderError;
use crate::model::{Node, NodeKind};

/// Modifiers implied by Kotlin defaults; never printed.
const BORING_MODIFIERS: &[&str] = &["final", "public", "var"];

/// Visibility and inlining modifiers, only shown in full signatures.
const FULL_ONLY_MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "internal",
    "inline",
    "noinline",
    "crossinline",
    "reified",
];

/// Compiler marker annotations that shape a type but are not printed.
const HIDDEN_ANNOTATIONS: &[&str] = &["ExtensionFunctionType", "ParameterName"];

/// Supertypes every class, enum or annotation class inherits implicitly.
const IMPLICIT_SUPERTYPES: &[&str] = &["kotlin.Any", "kotlin.Enum", "kotlin.Annotation"];

pub struct KotlinLanguageService;

impl LanguageService for KotlinLanguageService {
    fn language(&self) -> &str {
        "kotlin"
    }

    fn render(&self, node: Node<'_>, mode: RenderMode) -> Result<ContentNode, RenderError> {
        let mut block = ContentBlock::group();
        let b = &mut block;
        match node.kind {
            NodeKind::Package => render_package(b, node),
            kind if kind.is_class_like() || kind == NodeKind::EnumItem => {
                render_class(b, node, mode)?
            }
            NodeKind::ExternalClass => b.identifier(node.name.as_str()),
            NodeKind::Parameter => render_parameter(b, node, mode)?,
            NodeKind::TypeParameter => render_type_parameter(b, node, mode)?,
            NodeKind::Type | NodeKind::UpperBound => render_type(b, node, mode)?,
            NodeKind::Modifier => render_modifier(b, node, mode, false),
            kind if kind.is_function_like() => render_function(b, node, mode, None)?,
            kind if kind.is_property_like() => render_property(b, node, mode, None)?,
            _ => b.identifier(node.name.as_str()),
        }
        Ok(block.into())
    }

    fn summarize_signatures(&self, nodes: &[Node<'_>]) -> Result<Option<ContentNode>, RenderError> {
        if nodes.len() < 2 {
            return Ok(None);
        }
        let Some(kind) = receiver_kind(nodes) else {
            return Ok(None);
        };
        let Some(representative) = nodes.iter().find(|n| n.has_detail(NodeKind::TypeParameter))
        else {
            return Ok(None);
        };
        let type_parameter = representative.detail(NodeKind::TypeParameter)?;
        let mapper = SummarizingMapper::new(kind, type_parameter.name.as_str());
        tracing::debug!(
            name = %representative.name,
            overloads = nodes.len(),
            receiver = kind.receiver_name(),
            "summarizing signatures"
        );

        let mut block = ContentBlock::group();
        if representative.kind == NodeKind::Function {
            render_function(&mut block, *representative, RenderMode::Summary, Some(&mapper))?;
        } else {
            render_property(&mut block, *representative, RenderMode::Summary, Some(&mapper))?;
        }
        Ok(Some(block.into()))
    }
}

fn shown_in(mode: RenderMode, modifier: &str) -> bool {
    mode == RenderMode::Full || !FULL_ONLY_MODIFIERS.contains(&modifier)
}

fn render_modifier(b: &mut ContentBlock, node: Node<'_>, mode: RenderMode, nowrap: bool) {
    let name = node.name.as_str();
    if BORING_MODIFIERS.contains(&name) || !shown_in(mode, name) {
        return;
    }
    render_modifier_keyword(b, name, nowrap);
}

fn render_modifiers(b: &mut ContentBlock, node: Node<'_>, mode: RenderMode, nowrap: bool) {
    for modifier in node.details(NodeKind::Modifier) {
        // Interfaces are abstract by definition.
        if node.kind == NodeKind::Interface && modifier.name == "abstract" {
            continue;
        }
        render_modifier(b, modifier, mode, nowrap);
    }
}

fn render_annotations(b: &mut ContentBlock, node: Node<'_>) -> Result<(), RenderError> {
    for annotation in node.annotations() {
        if HIDDEN_ANNOTATIONS.contains(&annotation.name.as_str()) {
            continue;
        }
        render_annotation(b, annotation)?;
    }
    Ok(())
}

fn render_annotation(b: &mut ContentBlock, node: Node<'_>) -> Result<(), RenderError> {
    b.identifier_kind(format!("@{}", node.name), IdentifierKind::AnnotationName, None);
    let parameters = node.details(NodeKind::Parameter);
    if !parameters.is_empty() {
        b.symbol("(");
        render_list(b, &parameters, false, |b, parameter| {
            b.text(parameter.detail(NodeKind::Value)?.name.as_str());
            Ok(())
        })?;
        b.symbol(")");
    }
    b.text(" ");
    Ok(())
}

fn render_class(b: &mut ContentBlock, node: Node<'_>, mode: RenderMode) -> Result<(), RenderError> {
    if mode == RenderMode::Full {
        render_annotations(b, node)?;
    }
    render_modifiers(b, node, mode, false);
    let keyword = match node.kind {
        NodeKind::Class | NodeKind::AnnotationClass | NodeKind::Exception | NodeKind::Enum => {
            "class "
        }
        NodeKind::Interface => "interface ",
        NodeKind::EnumItem => "enum val ",
        NodeKind::Object => "object ",
        NodeKind::TypeAlias => "typealias ",
        _ => return Err(unsupported(node, "a class-like declaration")),
    };
    b.keyword(keyword);
    identifier_or_deprecated(b, node);
    render_type_parameters(b, node, mode)?;
    render_supertypes(b, node, mode)?;
    render_extra_constraints(b, node, mode)?;
    if node.kind == NodeKind::TypeAlias {
        b.nbsp();
        b.symbol("=");
        b.nbsp();
        render_type(b, node.detail(NodeKind::TypeAliasUnderlyingType)?, mode)?;
    }
    Ok(())
}

fn render_supertypes(b: &mut ContentBlock, node: Node<'_>, mode: RenderMode) -> Result<(), RenderError> {
    let supertypes: Vec<_> = node
        .details(NodeKind::Supertype)
        .into_iter()
        .filter(|s| !is_implicit_supertype(*s))
        .collect();
    if supertypes.is_empty() {
        return Ok(());
    }
    b.nbsp();
    b.symbol(":");
    b.nbsp();
    render_list(b, &supertypes, false, |b, supertype| {
        b.indented_soft_line_break();
        render_type(b, supertype, mode)
    })
}

/// Unresolved supertype names are taken as `kotlin` builtins.
fn is_implicit_supertype(node: Node<'_>) -> bool {
    let resolved = node.has_detail(NodeKind::QualifiedName)
        || !node.links().is_empty()
        || !node.hidden_links().is_empty();
    let qualified = if resolved {
        node.qualified_name_from_type()
    } else {
        format!("kotlin.{}", node.name)
    };
    IMPLICIT_SUPERTYPES.contains(&qualified.as_str())
}

fn render_type_parameters(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
) -> Result<(), RenderError> {
    let parameters = node.details(NodeKind::TypeParameter);
    if parameters.is_empty() {
        return Ok(());
    }
    b.symbol("<");
    render_list(b, &parameters, false, |b, p| render_type_parameter(b, p, mode))?;
    b.symbol(">");
    Ok(())
}

fn render_type_parameter(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
) -> Result<(), RenderError> {
    render_modifiers(b, node, mode, true);
    b.identifier(node.name.as_str());

    // Multiple bounds go to the `where` clause instead.
    let bounds = node.details(NodeKind::UpperBound);
    if let [bound] = bounds.as_slice() {
        b.nbsp();
        b.symbol(":");
        b.nbsp();
        render_type(b, *bound, mode)?;
    }
    Ok(())
}

fn render_extra_constraints(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
) -> Result<(), RenderError> {
    let constraints: Vec<_> = node
        .details(NodeKind::TypeParameter)
        .into_iter()
        .filter(|p| p.details(NodeKind::UpperBound).len() > 1)
        .flat_map(|p| {
            p.details(NodeKind::UpperBound)
                .into_iter()
                .map(move |bound| (p, bound))
        })
        .collect();
    if constraints.is_empty() {
        return Ok(());
    }
    b.keyword(" where ");
    render_list(b, &constraints, false, |b, (parameter, bound)| {
        b.identifier(parameter.name.as_str());
        b.nbsp();
        b.symbol(":");
        b.nbsp();
        render_type(b, bound, mode)
    })
}

fn render_parameter(b: &mut ContentBlock, node: Node<'_>, mode: RenderMode) -> Result<(), RenderError> {
    if mode == RenderMode::Full {
        render_annotations(b, node)?;
    }
    render_modifiers(b, node, mode, false);
    let signature = node
        .detail_opt(NodeKind::Signature)
        .map(|s| s.name.clone());
    b.identifier_kind(node.name.as_str(), IdentifierKind::ParameterName, signature);
    b.symbol(":");
    b.nbsp();
    render_type(b, node.detail(NodeKind::Type)?, mode)?;
    if let Some(value) = node.detail_opt(NodeKind::Value) {
        b.nbsp();
        b.symbol("=");
        b.nbsp();
        b.text(value.name.as_str());
    }
    Ok(())
}

/// `FunctionN`/`SuspendFunctionN` whose N matches its argument count minus
/// the return type.
fn is_functional_type(node: Node<'_>) -> bool {
    let arity = node.details(NodeKind::Type).len();
    if arity == 0 {
        return false;
    }
    let n = arity - 1;
    node.name == format!("Function{n}") || node.name == format!("SuspendFunction{n}")
}

fn has_annotation(node: Node<'_>, name: &str) -> bool {
    node.annotations().iter().any(|a| a.name == name)
}

pub(crate) fn render_type(b: &mut ContentBlock, node: Node<'_>, mode: RenderMode) -> Result<(), RenderError> {
    if node.name == "dynamic" {
        b.keyword("dynamic");
        return Ok(());
    }
    if is_functional_type(node) {
        return render_functional_type(b, node, mode);
    }
    if mode == RenderMode::Full {
        render_annotations(b, node)?;
    }
    render_modifiers(b, node, mode, true);
    render_linked(b, node, |b| {
        b.identifier_kind(node.name.as_str(), IdentifierKind::TypeName, None);
        Ok(())
    })?;

    let arguments = node.details(NodeKind::Type);
    if !arguments.is_empty() {
        b.symbol("<");
        render_list(b, &arguments, true, |b, argument| render_type(b, argument, mode))?;
        b.symbol(">");
    }
    if let Some(nullability) = node.detail_opt(NodeKind::NullabilityModifier) {
        b.symbol(nullability.name.as_str());
    }
    Ok(())
}

fn render_functional_type(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
) -> Result<(), RenderError> {
    let all = node.details(NodeKind::Type);
    let mut arguments = all.as_slice();

    if node.name.starts_with("SuspendFunction") {
        b.keyword("suspend ");
    }

    // The receiver may be flagged on the function type or on its first argument.
    let is_extension = has_annotation(node, "ExtensionFunctionType")
        || arguments
            .first()
            .is_some_and(|first| has_annotation(*first, "ExtensionFunctionType"));
    if is_extension {
        if let Some((receiver, rest)) = arguments.split_first() {
            render_type(b, *receiver, mode)?;
            b.symbol(".");
            arguments = rest;
        }
    }

    let Some((result, parameters)) = arguments.split_last() else {
        return Ok(());
    };
    b.symbol("(");
    render_list(b, parameters, true, |b, parameter| {
        render_functional_parameter_name(b, parameter);
        render_type(b, parameter, mode)
    })?;
    b.symbol(")");
    b.nbsp();
    b.symbol("->");
    b.nbsp();
    render_type(b, *result, mode)
}

/// Named lambda parameters: `(name: A) -> R`.
fn render_functional_parameter_name(b: &mut ContentBlock, node: Node<'_>) {
    let name = node
        .annotations()
        .into_iter()
        .find(|a| a.name == "ParameterName")
        .and_then(|a| a.detail_opt(NodeKind::Parameter))
        .and_then(|p| p.detail_opt(NodeKind::Value))
        .map(|value| value.name.trim_matches('"').to_string());
    if let Some(name) = name {
        b.identifier_kind(name, IdentifierKind::ParameterName, None);
        b.symbol(":");
        b.nbsp();
    }
}

fn render_receiver(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
    mapper: Option<&dyn SignatureMapper>,
) -> Result<(), RenderError> {
    let receivers = node.details(NodeKind::Receiver);
    let [receiver] = receivers.as_slice() else {
        return Ok(());
    };
    match mapper {
        Some(mapper) => mapper.render_receiver(*receiver, b),
        None => {
            let ty = receiver.detail(NodeKind::Type)?;
            if is_functional_type(ty) {
                b.symbol("(");
                render_functional_type(b, ty, mode)?;
                b.symbol(")");
            } else {
                render_type(b, ty, mode)?;
            }
        }
    }
    b.symbol(".");
    Ok(())
}

/// Unit results are implicit in Kotlin.
fn is_unit_return_type(node: Node<'_>) -> bool {
    let Some(ty) = node.detail_opt(NodeKind::Type) else {
        return true;
    };
    match ty.hidden_links().first() {
        Some(target) => target.qualified_name() == "kotlin.Unit",
        None => ty.name == "Unit",
    }
}

fn render_function(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
    mapper: Option<&dyn SignatureMapper>,
) -> Result<(), RenderError> {
    if mode == RenderMode::Full {
        render_annotations(b, node)?;
    }
    render_modifiers(b, node, mode, false);
    match node.kind {
        NodeKind::Constructor => b.identifier(node.require_owner()?.name.as_str()),
        NodeKind::Function | NodeKind::CompanionObjectFunction => b.keyword("fun "),
        _ => return Err(unsupported(node, "a function")),
    }

    render_type_parameters(b, node, mode)?;
    if node.has_detail(NodeKind::TypeParameter) {
        b.text(" ");
    }
    render_receiver(b, node, mode, mapper)?;
    if node.kind != NodeKind::Constructor {
        identifier_or_deprecated(b, node);
    }

    b.symbol("(");
    let parameters = node.details(NodeKind::Parameter);
    render_list(b, &parameters, false, |b, parameter| {
        b.indented_soft_line_break();
        render_parameter(b, parameter, mode)
    })?;

    if node.kind != NodeKind::Constructor && !is_unit_return_type(node) {
        if !parameters.is_empty() {
            b.soft_line_break();
        }
        b.symbol(")");
        b.symbol(": ");
        render_type(b, node.detail(NodeKind::Type)?, mode)?;
    } else {
        b.symbol(")");
    }
    render_extra_constraints(b, node, mode)
}

fn render_property(
    b: &mut ContentBlock,
    node: Node<'_>,
    mode: RenderMode,
    mapper: Option<&dyn SignatureMapper>,
) -> Result<(), RenderError> {
    if mode == RenderMode::Full {
        render_annotations(b, node)?;
    }
    render_modifiers(b, node, mode, false);
    if !node.kind.is_property_like() {
        return Err(unsupported(node, "a property"));
    }
    let mutable = node
        .details(NodeKind::Modifier)
        .iter()
        .any(|m| m.name == "var");
    b.keyword(if mutable { "var " } else { "val " });

    render_type_parameters(b, node, mode)?;
    if node.has_detail(NodeKind::TypeParameter) {
        b.text(" ");
    }
    render_receiver(b, node, mode, mapper)?;
    identifier_or_deprecated(b, node);
    b.symbol(": ");
    render_type(b, node.detail(NodeKind::Type)?, mode)?;
    render_extra_constraints(b, node, mode)
}
