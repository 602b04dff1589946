use crate::error::{GenError, GenResult};
use crate::ir::{
    BasicType, CustomTags, EnumType, InterfaceType, LiteralValue, ScalarKind, TypeArena, TypeId,
    UnionType, ValueType, VoidType,
};
use crate::named::walk::discriminant;
use crate::named::{capitalize, NamedTypeInfo, ValueTypeSource};
use crate::transform::ValueTransformer;
use crate::view::{documentation_lines, member_views, MemberView, StaticMemberView};
use serde::Serialize;

/// Discriminators shared by every named type view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeFlags {
    pub custom: bool,
    #[serde(rename = "enum")]
    pub is_enum: bool,
    pub union_type: bool,
    pub void_type: bool,
    pub is_from_parameter: bool,
    pub is_from_return: bool,
}

impl TypeFlags {
    fn from_source(source: ValueTypeSource) -> Self {
        Self {
            is_from_parameter: source.contains(ValueTypeSource::PARAMETER),
            is_from_return: source.contains(ValueTypeSource::RETURN),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceTypeView {
    #[serde(flatten)]
    pub flags: TypeFlags,
    pub type_name: String,
    pub documentation_lines: Vec<String>,
    pub custom_tags: CustomTags,
    pub members: Vec<MemberView>,
    pub static_members: Vec<StaticMemberView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMemberView {
    /// Member key with the first letter capitalized
    pub key: String,
    /// Backing value as a literal
    pub value: String,
    pub documentation_lines: Vec<String>,
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumTypeView {
    #[serde(flatten)]
    pub flags: TypeFlags,
    pub type_name: String,
    /// Spelling of the backing scalar type
    pub value_type: String,
    pub documentation_lines: Vec<String>,
    pub custom_tags: CustomTags,
    pub members: Vec<EnumMemberView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionMemberView {
    /// Case name derived from the member type
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionTypeView {
    #[serde(flatten)]
    pub flags: TypeFlags,
    pub type_name: String,
    pub documentation_lines: Vec<String>,
    pub custom_tags: CustomTags,
    pub members: Vec<UnionMemberView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoidTypeView {
    #[serde(flatten)]
    pub flags: TypeFlags,
    pub type_name: String,
    pub documentation_lines: Vec<String>,
    pub custom_tags: CustomTags,
}

/// View of any named type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NamedTypeView {
    Interface(InterfaceTypeView),
    Enum(EnumTypeView),
    Union(UnionTypeView),
    Void(VoidTypeView),
}

impl NamedTypeView {
    pub fn new(
        info: &NamedTypeInfo,
        arena: &TypeArena,
        transformer: &dyn ValueTransformer,
    ) -> GenResult<Self> {
        let flags = TypeFlags::from_source(info.source);
        match arena.get(info.id) {
            ValueType::Interface(iface) => Ok(NamedTypeView::Interface(interface_view(
                iface, info.id, flags, arena, transformer,
            )?)),
            ValueType::Enum(enum_type) => Ok(NamedTypeView::Enum(enum_view(
                enum_type, info.id, flags, arena, transformer,
            )?)),
            ValueType::Union(union) if union.name.is_some() => Ok(NamedTypeView::Union(
                union_view(union, info.id, flags, arena, transformer)?,
            )),
            ValueType::Void(void) => Ok(NamedTypeView::Void(void_view(
                void, info.id, flags, arena, transformer,
            )?)),
            other => Err(GenError::UnrepresentableType {
                kind: other.kind_name(),
                language: transformer.language(),
            }),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            NamedTypeView::Interface(view) => &view.type_name,
            NamedTypeView::Enum(view) => &view.type_name,
            NamedTypeView::Union(view) => &view.type_name,
            NamedTypeView::Void(view) => &view.type_name,
        }
    }
}

fn interface_view(
    iface: &InterfaceType,
    id: TypeId,
    flags: TypeFlags,
    arena: &TypeArena,
    transformer: &dyn ValueTransformer,
) -> GenResult<InterfaceTypeView> {
    let (members, static_members) = member_views(&iface.members, arena, transformer)?;
    Ok(InterfaceTypeView {
        flags: TypeFlags {
            custom: true,
            ..flags
        },
        type_name: transformer.type_syntax(arena, id)?,
        documentation_lines: documentation_lines(&iface.documentation),
        custom_tags: iface.custom_tags.clone(),
        members,
        static_members,
    })
}

fn enum_view(
    enum_type: &EnumType,
    id: TypeId,
    flags: TypeFlags,
    arena: &TypeArena,
    transformer: &dyn ValueTransformer,
) -> GenResult<EnumTypeView> {
    let count = enum_type.members.len();
    Ok(EnumTypeView {
        flags: TypeFlags {
            is_enum: true,
            ..flags
        },
        type_name: transformer.type_syntax(arena, id)?,
        value_type: transformer
            .basic_type(match enum_type.sub_type {
                ScalarKind::String => BasicType::String,
                ScalarKind::Number => BasicType::Number,
            })
            .to_string(),
        documentation_lines: documentation_lines(&enum_type.documentation),
        custom_tags: enum_type.custom_tags.clone(),
        members: enum_type
            .members
            .iter()
            .enumerate()
            .map(|(index, member)| EnumMemberView {
                key: transformer.enum_key(&member.key),
                value: match &member.value {
                    LiteralValue::String(text) => transformer.string_literal(text),
                    LiteralValue::Number(number) => number.to_string(),
                },
                documentation_lines: documentation_lines(&member.documentation),
                last: index + 1 == count,
            })
            .collect(),
    })
}

fn union_view(
    union: &UnionType,
    id: TypeId,
    flags: TypeFlags,
    arena: &TypeArena,
    transformer: &dyn ValueTransformer,
) -> GenResult<UnionTypeView> {
    let count = union.members.len();
    let members = union
        .members
        .iter()
        .enumerate()
        .map(|(index, &member)| {
            Ok(UnionMemberView {
                name: capitalize(&discriminant(arena.get(member))),
                type_name: transformer.type_syntax(arena, member)?,
                last: index + 1 == count,
            })
        })
        .collect::<GenResult<Vec<_>>>()?;

    Ok(UnionTypeView {
        flags: TypeFlags {
            union_type: true,
            ..flags
        },
        type_name: transformer.type_syntax(arena, id)?,
        documentation_lines: Vec::new(),
        custom_tags: union.custom_tags.clone(),
        members,
    })
}

fn void_view(
    void: &VoidType,
    id: TypeId,
    flags: TypeFlags,
    arena: &TypeArena,
    transformer: &dyn ValueTransformer,
) -> GenResult<VoidTypeView> {
    Ok(VoidTypeView {
        flags: TypeFlags {
            void_type: true,
            ..flags
        },
        type_name: transformer.type_syntax(arena, id)?,
        documentation_lines: documentation_lines(&void.documentation),
        custom_tags: void.custom_tags.clone(),
    })
}
