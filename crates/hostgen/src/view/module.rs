use crate::error::GenResult;
use crate::ir::{CustomTags, Method, Module, TypeArena};
use crate::transform::ValueTransformer;
use crate::view::{
    documentation_lines, member_views, MemberView, NamedTypeView, StaticMemberView,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterView {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodView {
    pub method_name: String,
    pub parameters: Vec<ParameterView>,
    /// `None` when the method declares no return type
    pub return_type: Option<String>,
    pub non_optional_return_type: Option<String>,
    pub is_async: bool,
    pub documentation_lines: Vec<String>,
    pub last: bool,
}

impl MethodView {
    pub fn new(
        method: &Method,
        arena: &TypeArena,
        transformer: &dyn ValueTransformer,
        last: bool,
    ) -> GenResult<Self> {
        let count = method.parameters.len();
        let parameters = method
            .parameters
            .iter()
            .enumerate()
            .map(|(index, param)| {
                Ok(ParameterView {
                    name: param.name.clone(),
                    type_name: transformer.type_syntax(arena, param.ty)?,
                    last: index + 1 == count,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;

        Ok(Self {
            method_name: method.name.clone(),
            parameters,
            return_type: method
                .return_type
                .map(|ty| transformer.type_syntax(arena, ty))
                .transpose()?,
            non_optional_return_type: method
                .return_type
                .map(|ty| transformer.non_optional_type_syntax(arena, ty))
                .transpose()?,
            is_async: method.is_async,
            documentation_lines: documentation_lines(&method.documentation),
            last,
        })
    }
}

/// A module with its associated types, ready for a template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleView {
    pub module_name: String,
    pub type_name: String,
    pub documentation_lines: Vec<String>,
    pub custom_tags: CustomTags,
    pub exported_bases: Vec<String>,
    pub members: Vec<MemberView>,
    pub static_members: Vec<StaticMemberView>,
    pub methods: Vec<MethodView>,
    pub associated_types: Vec<NamedTypeView>,
    /// Set only when several modules are rendered into one file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<bool>,
}

impl ModuleView {
    pub fn new(
        module: &Module,
        arena: &TypeArena,
        transformer: &dyn ValueTransformer,
    ) -> GenResult<Self> {
        let (members, static_members) = member_views(&module.members, arena, transformer)?;
        let count = module.methods.len();
        let methods = module
            .methods
            .iter()
            .enumerate()
            .map(|(index, method)| MethodView::new(method, arena, transformer, index + 1 == count))
            .collect::<GenResult<Vec<_>>>()?;
        let associated_types = module
            .associated_types
            .iter()
            .map(|info| NamedTypeView::new(info, arena, transformer))
            .collect::<GenResult<Vec<_>>>()?;

        Ok(Self {
            module_name: module.name.clone(),
            type_name: transformer.type_name(&module.name),
            documentation_lines: documentation_lines(&module.documentation),
            custom_tags: module.custom_tags.clone(),
            exported_bases: module.exported_bases.clone(),
            members,
            static_members,
            methods,
            associated_types,
            last: None,
        })
    }
}
