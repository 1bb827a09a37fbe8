//! Header text rendering for operator registration headers.
//!
//! Produces the complete `<basename>.h` content for one repository: banner,
//! include guard, then a documentation comment and a `REG_OP` block per
//! operator in declaration order.

use crate::model::{
    AttrType, AttributeDefinition, GraphSlot, OperatorDefinition, OperatorRepository, TensorSlot,
};

use super::comment::{FIELD_INDENT, push_block, push_field, push_line, push_paragraph};

const REG_HEADER: &str = "graph/operator_hiai_reg.h";
const NAMESPACE: &str = "hiai";
const EMPTY_TENSOR: &str = "(new (std::nothrow) Tensor(TensorDesc()))";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TensorKind {
    Input,
    Output,
}

impl TensorKind {
    fn section(self) -> &'static str {
        match self {
            TensorKind::Input => "Input",
            TensorKind::Output => "Output",
        }
    }

    fn directive(self) -> &'static str {
        match self {
            TensorKind::Input => "INPUT",
            TensorKind::Output => "OUTPUT",
        }
    }
}

/// Include guard macro for a generated header: `<prefix><basename>_h`, uppercased.
pub fn guard_macro(macro_prefix: &str, base_name: &str) -> String {
    format!("{macro_prefix}{base_name}_h").to_uppercase()
}

/// Render the full header text.
pub fn render_header(repo: &OperatorRepository, macro_prefix: &str, base_name: &str) -> String {
    let mut out = render_banner(base_name, &guard_macro(macro_prefix, base_name));
    for op in &repo.operators {
        out.push_str(&render_operator(op));
        out.push('\n');
    }
    out.push_str(&format!(
        "}} // namespace {NAMESPACE}\n// clang-format on\n\n#endif\n"
    ));
    out
}

fn render_banner(base_name: &str, guard: &str) -> String {
    format!(
        "/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2018-2022. All rights reserved.
 * Description: {base_name}
 */
#ifndef {guard}
#define {guard}
#include \"{REG_HEADER}\"

// clang-format off
namespace {NAMESPACE} {{

"
    )
}

/// Documentation comment followed by the registration block for one operator.
pub fn render_operator(op: &OperatorDefinition) -> String {
    let mut out = render_doc_comment(op);
    out.push_str(&render_registration(op));
    out
}

fn render_doc_comment(op: &OperatorDefinition) -> String {
    let mut out = String::from("/*\n");

    if let Some(description) = &op.description {
        push_paragraph(&mut out, description);
    }
    push_tensor_fields(&mut out, TensorKind::Input, &op.inputs);
    push_tensor_fields(&mut out, TensorKind::Output, &op.outputs);
    if !op.graphs.is_empty() {
        push_line(&mut out, " * <Graph>");
        for graph in &op.graphs {
            push_field(&mut out, FIELD_INDENT, &graph.name, &graph.description);
        }
    }
    if !op.attrs.is_empty() {
        push_line(&mut out, " * <Attr>");
        for attr in &op.attrs {
            push_field(&mut out, FIELD_INDENT, &attr.name, &attr.description);
        }
    }
    if let Some(version) = op.add_version.as_deref().filter(|v| !v.trim().is_empty()) {
        push_line(&mut out, " * <Added in HiAI version>");
        push_line(&mut out, &format!(" *    {}", version.trim()));
    }
    if let Some(examples) = op.examples.as_deref().filter(|e| !e.trim().is_empty()) {
        push_line(&mut out, " * <Examples>");
        push_block(&mut out, FIELD_INDENT, examples);
    }

    out.push_str(" */\n");
    out
}

fn push_tensor_fields(out: &mut String, kind: TensorKind, slots: &[TensorSlot]) {
    if slots.is_empty() {
        return;
    }
    push_line(out, &format!(" * <{}>", kind.section()));
    for slot in slots {
        push_field(out, FIELD_INDENT, &slot.name, &slot.description);
    }
}

fn render_registration(op: &OperatorDefinition) -> String {
    let mut out = format!("REG_OP({})\n", op.type_name);
    for slot in &op.inputs {
        out.push_str(&render_tensor(TensorKind::Input, slot));
    }
    for slot in &op.outputs {
        out.push_str(&render_tensor(TensorKind::Output, slot));
    }
    for graph in &op.graphs {
        out.push_str(&render_graph(graph));
    }
    for attr in &op.attrs {
        out.push_str(&render_attr(attr));
    }
    out.push_str(".OP_END()\n");
    out
}

/// OPTIONAL wins over DYNAMIC when a slot sets both.
fn tensor_modifier(slot: &TensorSlot) -> &'static str {
    if slot.optional {
        "OPTIONAL_"
    } else if slot.dynamic {
        "DYNAMIC_"
    } else {
        ""
    }
}

fn render_tensor(kind: TensorKind, slot: &TensorSlot) -> String {
    format!(
        ".{modifier}{directive}({name}, TensorType({{ {types} }}))\n",
        modifier = tensor_modifier(slot),
        directive = kind.directive(),
        name = slot.name,
        types = slot.tensor_types,
    )
}

fn render_graph(graph: &GraphSlot) -> String {
    let form = if graph.dynamic { "DYNAMIC" } else { "REQUIRED" };
    format!(".{form}_GRAPH({})\n", graph.name)
}

fn render_attr(attr: &AttributeDefinition) -> String {
    let directive = if attr.required { "REQUIRED_ATTR" } else { "ATTR" };
    let literal = attr
        .default
        .as_deref()
        .map(|d| default_literal(&attr.attr_type, d))
        .unwrap_or_default();
    format!(
        ".{directive}({name}, AttrValue::{tag}{literal})\n",
        name = attr.name,
        tag = attr.attr_type,
    )
}

/// Literal suffix placed after `AttrValue::<TAG>` for a supplied default.
pub fn default_literal(attr_type: &AttrType, default: &str) -> String {
    match attr_type {
        AttrType::Str => format!(" {{ \"{default}\" }}"),
        AttrType::List | AttrType::ListInt | AttrType::ListFloat => wrap(" ({", default, "})"),
        AttrType::NamedAttrs => wrap("(", default, ")"),
        AttrType::Tensor => EMPTY_TENSOR.to_string(),
        AttrType::Int | AttrType::Float | AttrType::Bool | AttrType::Other(_) => {
            wrap(" {", default, "}")
        }
    }
}

fn wrap(open: &str, body: &str, close: &str) -> String {
    if body.is_empty() {
        format!("{open}{close}")
    } else {
        format!("{open} {body} {close}")
    }
}
