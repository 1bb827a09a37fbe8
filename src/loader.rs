//! Schema loader: YAML operator schema → [`OperatorRepository`].
//!
//! Ordering comes straight from `serde_yml::Mapping`, which keeps document
//! order. Duplicate keys are rejected by the YAML layer while the document is
//! parsed, so a duplicated operator, slot or attribute name surfaces as a
//! [`SchemaError::Format`] before any model is built.

use std::path::Path;

use serde_yml::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::model::{
    AttrType, AttributeDefinition, GraphSlot, OperatorDefinition, OperatorRepository, TensorSlot,
};

/// Read and load a schema file from disk.
pub fn load_schema_file(path: &Path) -> Result<OperatorRepository, SchemaError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SchemaError::Reference {
                path: path.to_path_buf(),
            }
        } else {
            SchemaError::format(path.display().to_string(), format!("unreadable: {e}"))
        }
    })?;
    parse_schema(&text, &path.display().to_string())
}

/// Parse YAML schema text. `origin` names the document in error messages.
pub fn parse_schema(text: &str, origin: &str) -> Result<OperatorRepository, SchemaError> {
    let doc: Value =
        serde_yml::from_str(text).map_err(|e| SchemaError::format(origin, e.to_string()))?;
    load_document(&doc, origin)
}

/// Build a repository from an already-parsed document tree.
pub fn load_document(doc: &Value, origin: &str) -> Result<OperatorRepository, SchemaError> {
    let root = doc
        .as_mapping()
        .ok_or_else(|| SchemaError::format(origin, "document root is not a mapping"))?;

    let mut entries = root.iter();
    let (key, ops) = entries
        .next()
        .ok_or_else(|| SchemaError::format(origin, "document has no operator category"))?;
    let category = key_text(key, origin)?;
    if root.len() > 1 {
        warn!(origin, category = %category, extra = root.len() - 1, "ignoring extra top-level keys");
    }

    let ops = ops.as_mapping().ok_or_else(|| {
        SchemaError::format(origin, format!("category `{category}` is not a mapping"))
    })?;

    let mut operators = Vec::with_capacity(ops.len());
    for (name, fields) in ops {
        let name = key_text(name, origin)?;
        operators.push(load_operator(&name, fields, origin)?);
    }

    debug!(origin, category = %category, operators = operators.len(), "loaded schema");
    Ok(OperatorRepository {
        category,
        operators,
    })
}

fn load_operator(
    name: &str,
    fields: &Value,
    origin: &str,
) -> Result<OperatorDefinition, SchemaError> {
    let context = format!("{origin}: operator `{name}`");
    let mut op = OperatorDefinition::new(name);

    // A bare `Op:` line declares an operator with no fields.
    let fields = match fields {
        Value::Null => return Ok(op),
        other => other
            .as_mapping()
            .ok_or_else(|| SchemaError::format(&context, "operator body is not a mapping"))?,
    };

    op.description = opt_text(fields, "comment", &context)?
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    op.add_version = opt_text(fields, "add_version", &context)?;
    op.examples = opt_text(fields, "examples", &context)?;

    for (key, value) in slot_entries(fields, "inputs", &context)? {
        op.inputs.push(load_tensor(key, value, &context)?);
    }
    for (key, value) in slot_entries(fields, "outputs", &context)? {
        op.outputs.push(load_tensor(key, value, &context)?);
    }
    for (key, value) in slot_entries(fields, "graphs", &context)? {
        op.graphs.push(load_graph(key, value, &context)?);
    }
    for (key, value) in slot_entries(fields, "attrs", &context)? {
        op.attrs.push(load_attr(key, value, &context)?);
    }

    Ok(op)
}

fn load_tensor(key: &Value, value: &Value, context: &str) -> Result<TensorSlot, SchemaError> {
    let name = key_text(key, context)?;
    let context = format!("{context}, tensor `{name}`");
    let fields = slot_body(value, &context)?;
    let tensor_types = opt_text(fields, "tensor_types", &context)?
        .ok_or_else(|| SchemaError::format(&context, "missing `tensor_types`"))?;

    Ok(TensorSlot {
        name,
        tensor_types,
        optional: opt_bool(fields, "optional", &context)?,
        dynamic: opt_bool(fields, "dynamic", &context)?,
        description: description(fields, &context)?,
    })
}

fn load_graph(key: &Value, value: &Value, context: &str) -> Result<GraphSlot, SchemaError> {
    let name = key_text(key, context)?;
    let context = format!("{context}, graph `{name}`");
    let fields = slot_body(value, &context)?;

    Ok(GraphSlot {
        name,
        dynamic: opt_bool(fields, "dynamic", &context)?,
        description: description(fields, &context)?,
    })
}

fn load_attr(
    key: &Value,
    value: &Value,
    context: &str,
) -> Result<AttributeDefinition, SchemaError> {
    let name = key_text(key, context)?;
    let context = format!("{context}, attr `{name}`");
    let fields = slot_body(value, &context)?;
    let tag = opt_text(fields, "type", &context)?
        .ok_or_else(|| SchemaError::format(&context, "missing `type`"))?;

    Ok(AttributeDefinition {
        name,
        attr_type: AttrType::parse(&tag),
        required: opt_bool(fields, "required", &context)?,
        default: opt_text(fields, "default", &context)?,
        description: description(fields, &context)?,
    })
}

/// Entries of an optional `inputs`/`outputs`/`graphs`/`attrs` mapping, in document order.
fn slot_entries<'a>(
    fields: &'a Mapping,
    key: &str,
    context: &str,
) -> Result<Vec<(&'a Value, &'a Value)>, SchemaError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Mapping(m)) => Ok(m.iter().collect()),
        Some(_) => Err(SchemaError::format(
            context,
            format!("`{key}` is not a mapping"),
        )),
    }
}

fn slot_body<'a>(value: &'a Value, context: &str) -> Result<&'a Mapping, SchemaError> {
    value
        .as_mapping()
        .ok_or_else(|| SchemaError::format(context, "entry is not a mapping"))
}

fn description(fields: &Mapping, context: &str) -> Result<String, SchemaError> {
    Ok(opt_text(fields, "comment", context)?
        .map(|c| c.trim().to_string())
        .unwrap_or_default())
}

/// String field; booleans are taken as `true`/`false`. `~` counts as absent.
fn opt_text(fields: &Mapping, key: &str, context: &str) -> Result<Option<String>, SchemaError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => scalar_text(v, key, context).map(Some),
    }
}

fn opt_bool(fields: &Mapping, key: &str, context: &str) -> Result<bool, SchemaError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SchemaError::format(
            context,
            format!("`{key}` must be true or false"),
        )),
    }
}

fn key_text(key: &Value, context: &str) -> Result<String, SchemaError> {
    scalar_text(key, "mapping key", context)
}

/// Text of a string or boolean scalar.
///
/// Numbers are refused: YAML has already normalised them (`0x10` → `16`,
/// `1.50` → `1.5`), so their source text can no longer be emitted verbatim.
fn scalar_text(value: &Value, what: &str, context: &str) -> Result<String, SchemaError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Err(SchemaError::format(
            context,
            format!("`{what}` is the number {n}; quote it so the text is kept as written"),
        )),
        _ => Err(SchemaError::format(
            context,
            format!("`{what}` is not a scalar"),
        )),
    }
}
