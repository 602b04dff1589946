//! Render-ready projections
//!
//! Views flatten a module or named type into plain serializable structs
//! with stable camelCase field names. Templates branch on the boolean
//! discriminators and use the `last` flags for separators.
//!
//! # Common fields of named type views
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `typeName` | Name after the type-name map |
//! | `documentationLines` | Documentation split and wrapped at 100 columns |
//! | `customTags` | Free-form directives |
//! | `custom` / `enum` / `unionType` / `voidType` | Which kind of view this is |
//! | `isFromParameter` / `isFromReturn` | Positions the type was used in |

mod module;
mod named;

pub use module::{MethodView, ModuleView, ParameterView};
pub use named::{
    EnumMemberView, EnumTypeView, InterfaceTypeView, NamedTypeView, TypeFlags, UnionMemberView,
    UnionTypeView, VoidTypeView,
};

use crate::error::GenResult;
use crate::ir::{Field, TypeArena};
use crate::transform::ValueTransformer;
use serde::Serialize;

/// Column at which documentation lines are wrapped
pub const DOCUMENTATION_WIDTH: usize = 100;

/// Split documentation into lines, wrapping long lines on word boundaries
pub fn documentation_lines(documentation: &str) -> Vec<String> {
    if documentation.is_empty() {
        return Vec::new();
    }
    documentation
        .lines()
        .flat_map(|line| wrap_line(line, DOCUMENTATION_WIDTH))
        .collect()
}

/// Break a line at spaces so each piece fits `width`; continuation lines
/// keep the leading indentation and spacing inside a piece is kept as is
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let text = line.trim_start();
    let indent = &line[..line.len() - text.len()];
    let available = width.saturating_sub(indent.chars().count()).max(1);

    let mut lines = Vec::new();
    let mut rest = text.trim_end();
    while rest.chars().count() > available {
        let Some(at) = break_point(rest, available) else {
            break;
        };
        lines.push(format!("{}{}", indent, rest[..at].trim_end()));
        rest = rest[at..].trim_start();
    }
    if !rest.is_empty() {
        lines.push(format!("{}{}", indent, rest));
    }
    lines
}

/// Byte offset of the last space that keeps the head within `available`
/// characters; the first space when the leading word is longer
fn break_point(text: &str, available: usize) -> Option<usize> {
    let limit = text
        .char_indices()
        .nth(available)
        .map_or(text.len(), |(i, _)| i);
    if text[limit..].starts_with(' ') {
        return Some(limit);
    }
    text[..limit]
        .rfind(' ')
        .filter(|&i| i > 0)
        .or_else(|| text.find(' '))
}

/// Instance field of a module or interface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub documentation_lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub last: bool,
}

/// Constant of a module or interface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticMemberView {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
    pub documentation_lines: Vec<String>,
    pub last: bool,
}

/// Split fields into instance members and constants
fn member_views(
    fields: &[Field],
    arena: &TypeArena,
    transformer: &dyn ValueTransformer,
) -> GenResult<(Vec<MemberView>, Vec<StaticMemberView>)> {
    let instance: Vec<&Field> = fields.iter().filter(|f| !f.is_static()).collect();
    let members = instance
        .iter()
        .enumerate()
        .map(|(index, field)| {
            Ok(MemberView {
                name: field.name.clone(),
                type_name: transformer.type_syntax(arena, field.ty)?,
                documentation_lines: documentation_lines(&field.documentation),
                default_value: field.default_value.clone(),
                last: index + 1 == instance.len(),
            })
        })
        .collect::<GenResult<Vec<_>>>()?;

    let constants: Vec<(&Field, &serde_json::Value)> = fields
        .iter()
        .filter_map(|f| f.static_value.as_ref().map(|value| (f, value)))
        .collect();
    let static_members = constants
        .iter()
        .enumerate()
        .map(|(index, (field, value))| {
            Ok(StaticMemberView {
                name: field.name.clone(),
                type_name: transformer.type_syntax(arena, field.ty)?,
                value: transformer.literal_syntax(value, arena, field.ty)?,
                documentation_lines: documentation_lines(&field.documentation),
                last: index + 1 == constants.len(),
            })
        })
        .collect::<GenResult<Vec<_>>>()?;

    Ok((members, static_members))
}
