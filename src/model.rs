//! Schema model: the in-memory form of one operator schema file.
//!
//! Built once by [`crate::loader`] and only read afterwards. Every `Vec` keeps
//! the declaration order of the source document, which is also the order the
//! renderer emits.

use std::fmt;

/// One schema file: a category name and its operators in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRepository {
    pub category: String,
    pub operators: Vec<OperatorDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperatorDefinition {
    pub type_name: String,
    pub description: Option<String>,
    pub add_version: Option<String>,
    pub examples: Option<String>,
    pub inputs: Vec<TensorSlot>,
    pub outputs: Vec<TensorSlot>,
    pub graphs: Vec<GraphSlot>,
    pub attrs: Vec<AttributeDefinition>,
}

impl OperatorDefinition {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSlot {
    pub name: String,
    /// Type-constraint expression, e.g. `DT_FLOAT, DT_INT32`. Passed through verbatim.
    pub tensor_types: String,
    pub optional: bool,
    pub dynamic: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSlot {
    pub name: String,
    pub dynamic: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: String,
    pub attr_type: AttrType,
    pub required: bool,
    /// Raw literal text from the schema. `Some("")` is a present-but-empty default.
    pub default: Option<String>,
    pub description: String,
}

/// Attribute value type tag, as spelled after `AttrValue::` in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    Str,
    Int,
    Float,
    Bool,
    List,
    ListInt,
    ListFloat,
    NamedAttrs,
    Tensor,
    /// Any tag the renderer has no dedicated literal form for (`LIST_TENSOR_DESC`, `LIST_STR`, ...).
    Other(String),
}

impl AttrType {
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "STR" => AttrType::Str,
            "INT" => AttrType::Int,
            "FLOAT" => AttrType::Float,
            "BOOL" => AttrType::Bool,
            "LIST" => AttrType::List,
            "LIST_INT" => AttrType::ListInt,
            "LIST_FLOAT" => AttrType::ListFloat,
            "NamedAttrs" | "NAMED_ATTRS" => AttrType::NamedAttrs,
            "TENSOR" => AttrType::Tensor,
            other => AttrType::Other(other.to_string()),
        }
    }

    /// The tag text emitted after `AttrValue::`.
    pub fn as_str(&self) -> &str {
        match self {
            AttrType::Str => "STR",
            AttrType::Int => "INT",
            AttrType::Float => "FLOAT",
            AttrType::Bool => "BOOL",
            AttrType::List => "LIST",
            AttrType::ListInt => "LIST_INT",
            AttrType::ListFloat => "LIST_FLOAT",
            AttrType::NamedAttrs => "NamedAttrs",
            AttrType::Tensor => "TENSOR",
            AttrType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_type_known_tags_round_trip_through_as_str() {
        for tag in [
            "STR", "INT", "FLOAT", "BOOL", "LIST", "LIST_INT", "LIST_FLOAT", "TENSOR",
        ] {
            assert_eq!(AttrType::parse(tag).as_str(), tag);
        }
    }

    #[test]
    fn test_attr_type_named_attrs_accepts_both_spellings() {
        assert_eq!(AttrType::parse("NAMED_ATTRS"), AttrType::NamedAttrs);
        assert_eq!(AttrType::parse("NamedAttrs"), AttrType::NamedAttrs);
        assert_eq!(AttrType::NamedAttrs.to_string(), "NamedAttrs");
    }

    #[test]
    fn test_attr_type_unknown_tag_kept_verbatim() {
        let t = AttrType::parse("LIST_TENSOR_DESC");
        assert_eq!(t, AttrType::Other("LIST_TENSOR_DESC".to_string()));
        assert_eq!(t.as_str(), "LIST_TENSOR_DESC");
    }
}
