//! Value-type model
//!
//! Every type that can flow through a host module is one variant of the
//! closed [`ValueType`] union. Composite variants refer to their children by
//! [`TypeId`] handle into the owning [`TypeArena`](crate::ir::TypeArena), so
//! a type that is referenced from many places is a single node.
//!
//! # Variant Overview
//!
//! | Variant | Named | Children | Notes |
//! |---------|-------|----------|-------|
//! | `Basic` | no | none | string, number, boolean |
//! | `Interface` | yes | member fields | declared, or a promoted tuple |
//! | `Tuple` | no | member fields | promoted to `Interface` by extraction |
//! | `Enum` | yes | none | declared, or a promoted literal |
//! | `Array` | no | element | |
//! | `Dictionary` | no | value | keys are string or number |
//! | `Optional` | no | wrapped | never wraps another `Optional` |
//! | `Predefined` | yes (external) | none | resolved by the target |
//! | `Literal` | no | none | promoted to `Enum` by extraction |
//! | `Union` | once hoisted | members | |
//! | `Void` | yes | none | always named `void` after extraction |

use crate::ir::{Field, TypeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form directives attached to modules and named types
pub type CustomTags = IndexMap<String, serde_json::Value>;

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicType {
    String,
    Number,
    Boolean,
}

impl BasicType {
    /// IR keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicType::String => "string",
            BasicType::Number => "number",
            BasicType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar kind backing enums, literal sets and dictionary keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Number,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Number => "number",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal constant of a literal set or an enum member value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(serde_json::Number),
}

impl LiteralValue {
    /// Scalar kind of this constant
    pub fn kind(&self) -> ScalarKind {
        match self {
            LiteralValue::String(_) => ScalarKind::String,
            LiteralValue::Number(_) => ScalarKind::Number,
        }
    }

    /// Stringified constant, used as the key of synthesized enum members
    pub fn to_key(&self) -> String {
        match self {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => n.to_string(),
        }
    }

    /// Convert to a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            LiteralValue::String(s) => serde_json::Value::String(s.clone()),
            LiteralValue::Number(n) => serde_json::Value::Number(n.clone()),
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => write!(f, "{:?}", s),
            LiteralValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Named type with ordered fields
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub name: String,
    pub members: Vec<Field>,
    pub documentation: String,
    pub custom_tags: CustomTags,
}

impl InterfaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            documentation: String::new(),
            custom_tags: CustomTags::new(),
        }
    }

    /// Add a member field
    pub fn member(mut self, field: Field) -> Self {
        self.members.push(field);
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = doc.into();
        self
    }
}

/// Anonymous ordered fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TupleType {
    pub members: Vec<Field>,
}

/// Enum member
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub key: String,
    pub value: LiteralValue,
    pub documentation: String,
}

impl EnumMember {
    pub fn new(key: impl Into<String>, value: LiteralValue) -> Self {
        Self {
            key: key.into(),
            value,
            documentation: String::new(),
        }
    }
}

/// Named enumeration, string or number backed
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub sub_type: ScalarKind,
    pub members: Vec<EnumMember>,
    pub documentation: String,
    pub custom_tags: CustomTags,
}

/// Anonymous set of literal constants of one scalar kind
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralType {
    pub kind: ScalarKind,
    pub members: Vec<LiteralValue>,
}

/// Union of member types, named once hoisted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnionType {
    pub name: Option<String>,
    pub members: Vec<TypeId>,
    pub custom_tags: CustomTags,
}

/// The `void` sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct VoidType {
    pub name: String,
    pub documentation: String,
    pub custom_tags: CustomTags,
}

impl Default for VoidType {
    fn default() -> Self {
        Self {
            name: VOID_TYPE_NAME.to_string(),
            documentation: String::new(),
            custom_tags: CustomTags::new(),
        }
    }
}

/// Name every void type is registered under
pub const VOID_TYPE_NAME: &str = "void";

/// Closed set of value types
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Basic(BasicType),
    Interface(InterfaceType),
    Tuple(TupleType),
    Enum(EnumType),
    Array(TypeId),
    Dictionary { key: ScalarKind, value: TypeId },
    Optional(TypeId),
    Predefined(String),
    Literal(LiteralType),
    Union(UnionType),
    Void(VoidType),
}

impl ValueType {
    /// Discriminant name, used when a union member has nothing better to be
    /// called by
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueType::Basic(_) => "basicType",
            ValueType::Interface(_) => "interfaceType",
            ValueType::Tuple(_) => "tupleType",
            ValueType::Enum(_) => "enumType",
            ValueType::Array(_) => "arrayType",
            ValueType::Dictionary { .. } => "dictionaryType",
            ValueType::Optional(_) => "optionalType",
            ValueType::Predefined(_) => "predefinedType",
            ValueType::Literal(_) => "literalType",
            ValueType::Union(_) => "unionType",
            ValueType::Void(_) => "voidType",
        }
    }

    /// Declared or assigned name, if this node carries one
    pub fn name(&self) -> Option<&str> {
        match self {
            ValueType::Interface(i) => Some(&i.name),
            ValueType::Enum(e) => Some(&e.name),
            ValueType::Union(u) => u.name.as_deref(),
            ValueType::Void(v) => Some(&v.name),
            ValueType::Predefined(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this node is one of the named-type variants
    pub fn is_named_type(&self) -> bool {
        match self {
            ValueType::Interface(_) | ValueType::Enum(_) | ValueType::Void(_) => true,
            ValueType::Union(u) => u.name.is_some(),
            _ => false,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ValueType::Optional(_))
    }

    /// Handles of every direct child node
    pub fn child_ids(&self) -> Vec<TypeId> {
        match self {
            ValueType::Interface(InterfaceType { members, .. })
            | ValueType::Tuple(TupleType { members }) => members.iter().map(|f| f.ty).collect(),
            ValueType::Array(inner)
            | ValueType::Optional(inner)
            | ValueType::Dictionary { value: inner, .. } => vec![*inner],
            ValueType::Union(u) => u.members.clone(),
            _ => Vec::new(),
        }
    }

    /// Rebuild this node with every child handle passed through `f`
    pub fn map_ids(self, f: &mut impl FnMut(TypeId) -> TypeId) -> ValueType {
        match self {
            ValueType::Interface(mut i) => {
                i.members = map_field_ids(i.members, f);
                ValueType::Interface(i)
            }
            ValueType::Tuple(t) => ValueType::Tuple(TupleType {
                members: map_field_ids(t.members, f),
            }),
            ValueType::Array(inner) => ValueType::Array(f(inner)),
            ValueType::Optional(inner) => ValueType::Optional(f(inner)),
            ValueType::Dictionary { key, value } => ValueType::Dictionary {
                key,
                value: f(value),
            },
            ValueType::Union(mut u) => {
                u.members = u.members.into_iter().map(&mut *f).collect();
                ValueType::Union(u)
            }
            other => other,
        }
    }
}

fn map_field_ids(members: Vec<Field>, f: &mut impl FnMut(TypeId) -> TypeId) -> Vec<Field> {
    members
        .into_iter()
        .map(|field| Field {
            ty: f(field.ty),
            ..field
        })
        .collect()
}
