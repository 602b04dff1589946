//! JSON schema adapter
//!
//! A [`SchemaDocument`] is the serialized form of a module graph. Modules
//! refer to declared types with `{"kind": "reference", "name": ...}`; every
//! declared type is lowered once per target, so self-referencing types
//! terminate.
//!
//! ```json
//! {
//!   "modules": [{
//!     "name": "Config",
//!     "members": [{ "name": "retryCount", "type": { "kind": "basic", "value": "number" } }],
//!     "methods": [{
//!       "name": "log",
//!       "parameters": [{
//!         "name": "level",
//!         "type": { "kind": "literal", "members": ["debug", "info"] }
//!       }],
//!       "returnType": { "kind": "void" }
//!     }]
//!   }]
//! }
//! ```

use crate::error::{GenError, GenResult};
use crate::ir::{
    BasicType, CustomTags, EnumMember, EnumType, Field, InterfaceType, LiteralType, LiteralValue,
    Method, Module, ScalarKind, Target, TupleType, TypeArena, TypeId, UnionType, ValueType,
    VoidType,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Serialized module graph
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub modules: Vec<ModuleDecl>,
    /// Named types that modules refer to by name
    #[serde(default)]
    pub types: Vec<TypeExpr>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDecl {
    pub name: String,
    #[serde(default)]
    pub members: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub exported_bases: Vec<String>,
    #[serde(default)]
    pub custom_tags: CustomTags,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub static_value: Option<serde_json::Value>,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<FieldDecl>,
    #[serde(default)]
    pub return_type: Option<TypeExpr>,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default)]
    pub documentation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumMemberDecl {
    pub key: String,
    pub value: LiteralValue,
    #[serde(default)]
    pub documentation: String,
}

/// Serialized value type, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TypeExpr {
    Basic {
        value: BasicType,
    },
    Interface {
        name: String,
        #[serde(default)]
        members: Vec<FieldDecl>,
        #[serde(default)]
        documentation: String,
        #[serde(default)]
        custom_tags: CustomTags,
    },
    Tuple {
        #[serde(default)]
        members: Vec<FieldDecl>,
    },
    Enum {
        name: String,
        sub_type: ScalarKind,
        members: Vec<EnumMemberDecl>,
        #[serde(default)]
        documentation: String,
        #[serde(default)]
        custom_tags: CustomTags,
    },
    Array {
        element_type: Box<TypeExpr>,
    },
    Dictionary {
        key_type: ScalarKind,
        value_type: Box<TypeExpr>,
    },
    Optional {
        wrapped_type: Box<TypeExpr>,
    },
    Predefined {
        name: String,
    },
    Literal {
        members: Vec<LiteralValue>,
    },
    Union {
        #[serde(default)]
        name: Option<String>,
        members: Vec<TypeExpr>,
        #[serde(default)]
        custom_tags: CustomTags,
    },
    Void {
        #[serde(default)]
        documentation: String,
    },
    Reference {
        name: String,
    },
}

impl TypeExpr {
    fn kind(&self) -> &'static str {
        match self {
            TypeExpr::Basic { .. } => "basic",
            TypeExpr::Interface { .. } => "interface",
            TypeExpr::Tuple { .. } => "tuple",
            TypeExpr::Enum { .. } => "enum",
            TypeExpr::Array { .. } => "array",
            TypeExpr::Dictionary { .. } => "dictionary",
            TypeExpr::Optional { .. } => "optional",
            TypeExpr::Predefined { .. } => "predefined",
            TypeExpr::Literal { .. } => "literal",
            TypeExpr::Union { .. } => "union",
            TypeExpr::Void { .. } => "void",
            TypeExpr::Reference { .. } => "reference",
        }
    }

    /// Name under which this type can be declared
    fn declared_name(&self) -> Option<&str> {
        match self {
            TypeExpr::Interface { name, .. } | TypeExpr::Enum { name, .. } => Some(name),
            TypeExpr::Union { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}

impl SchemaDocument {
    /// Parse a schema document from JSON text
    pub fn from_json(json: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a schema document
    pub fn from_path(path: impl AsRef<Path>) -> GenResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Build the module graph of one target
    pub fn lower(self) -> GenResult<Target> {
        let mut declared = IndexMap::new();
        for ty in self.types {
            let name = ty
                .declared_name()
                .ok_or_else(|| {
                    GenError::schema(format!("declared `{}` type has no name", ty.kind()))
                })?
                .to_string();
            if declared.contains_key(&name) {
                return Err(GenError::schema(format!("type `{}` is declared twice", name)));
            }
            declared.insert(name, ty);
        }

        let mut lowering = Lowering {
            declared: &declared,
            arena: TypeArena::new(),
            memo: HashMap::new(),
        };
        let modules = self
            .modules
            .iter()
            .map(|decl| lowering.module(decl))
            .collect::<GenResult<Vec<_>>>()?;

        Ok(Target::new(lowering.arena, modules))
    }
}

struct Lowering<'d> {
    declared: &'d IndexMap<String, TypeExpr>,
    arena: TypeArena,
    memo: HashMap<&'d str, TypeId>,
}

impl<'d> Lowering<'d> {
    fn module(&mut self, decl: &ModuleDecl) -> GenResult<Module> {
        let mut module = Module::new(&decl.name).with_doc(&decl.documentation);
        module.exported_bases = decl.exported_bases.clone();
        module.custom_tags = decl.custom_tags.clone();
        module.members = self.fields(&decl.members)?;
        for method in &decl.methods {
            let mut lowered = Method::new(&method.name).with_doc(&method.documentation);
            lowered.parameters = self.fields(&method.parameters)?;
            lowered.return_type = method
                .return_type
                .as_ref()
                .map(|ty| self.expr(ty))
                .transpose()?;
            lowered.is_async = method.is_async;
            module.methods.push(lowered);
        }
        Ok(module)
    }

    fn fields(&mut self, decls: &[FieldDecl]) -> GenResult<Vec<Field>> {
        decls
            .iter()
            .map(|decl| {
                let mut field = Field::new(&decl.name, self.expr(&decl.ty)?)
                    .with_doc(&decl.documentation);
                field.static_value = decl.static_value.clone();
                field.default_value = decl.default_value.clone();
                Ok(field)
            })
            .collect()
    }

    fn expr(&mut self, expr: &TypeExpr) -> GenResult<TypeId> {
        match expr {
            TypeExpr::Reference { name } => self.reference(name),
            TypeExpr::Optional { wrapped_type } => {
                let inner = self.expr(wrapped_type)?;
                Ok(self.arena.optional(inner))
            }
            other => {
                let node = self.node(other)?;
                Ok(self.arena.alloc(node))
            }
        }
    }

    fn reference(&mut self, name: &str) -> GenResult<TypeId> {
        let declared = self.declared;
        let (key, decl) = declared
            .get_key_value(name)
            .ok_or_else(|| GenError::UnknownReference(name.to_string()))?;
        if let Some(&id) = self.memo.get(key.as_str()) {
            return Ok(id);
        }
        let slot = self.arena.reserve();
        self.memo.insert(key.as_str(), slot);
        let node = self.node(decl)?;
        self.arena.replace(slot, node);
        Ok(slot)
    }

    fn node(&mut self, expr: &TypeExpr) -> GenResult<ValueType> {
        let node = match expr {
            TypeExpr::Basic { value } => ValueType::Basic(*value),
            TypeExpr::Interface {
                name,
                members,
                documentation,
                custom_tags,
            } => ValueType::Interface(InterfaceType {
                name: name.clone(),
                members: self.fields(members)?,
                documentation: documentation.clone(),
                custom_tags: custom_tags.clone(),
            }),
            TypeExpr::Tuple { members } => ValueType::Tuple(TupleType {
                members: self.fields(members)?,
            }),
            TypeExpr::Enum {
                name,
                sub_type,
                members,
                documentation,
                custom_tags,
            } => ValueType::Enum(EnumType {
                name: name.clone(),
                sub_type: *sub_type,
                members: members
                    .iter()
                    .map(|m| EnumMember {
                        key: m.key.clone(),
                        value: m.value.clone(),
                        documentation: m.documentation.clone(),
                    })
                    .collect(),
                documentation: documentation.clone(),
                custom_tags: custom_tags.clone(),
            }),
            TypeExpr::Array { element_type } => ValueType::Array(self.expr(element_type)?),
            TypeExpr::Dictionary {
                key_type,
                value_type,
            } => ValueType::Dictionary {
                key: *key_type,
                value: self.expr(value_type)?,
            },
            TypeExpr::Predefined { name } => ValueType::Predefined(name.clone()),
            TypeExpr::Literal { members } => ValueType::Literal(literal(members)?),
            TypeExpr::Union {
                name,
                members,
                custom_tags,
            } => ValueType::Union(UnionType {
                name: name.clone(),
                members: members
                    .iter()
                    .map(|m| self.expr(m))
                    .collect::<GenResult<Vec<_>>>()?,
                custom_tags: custom_tags.clone(),
            }),
            TypeExpr::Void { documentation } => ValueType::Void(VoidType {
                documentation: documentation.clone(),
                ..VoidType::default()
            }),
            TypeExpr::Optional { .. } | TypeExpr::Reference { .. } => {
                return Err(GenError::schema(format!(
                    "`{}` cannot be declared as a standalone type",
                    expr.kind()
                )));
            }
        };
        Ok(node)
    }
}

/// Infer the scalar kind of a literal set; all members must agree
fn literal(members: &[LiteralValue]) -> GenResult<LiteralType> {
    let kind = members
        .first()
        .map(LiteralValue::kind)
        .ok_or_else(|| GenError::schema("literal type has no members"))?;
    if members.iter().any(|m| m.kind() != kind) {
        return Err(GenError::schema(format!(
            "literal type mixes string and number members: {}",
            members
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        )));
    }
    Ok(LiteralType {
        kind,
        members: members.to_vec(),
    })
}
