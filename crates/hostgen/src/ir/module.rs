//! Module metadata for host bindings
//!
//! This module provides the [`Module`] structure that represents one
//! host-exposed interface with its fields and methods, and [`Target`], the
//! module graph of one generation pass together with the arena that owns
//! its types.

use crate::ir::{CustomTags, TypeArena, TypeId};
use crate::named::NamedTypeInfo;

/// A field of a module, interface or tuple, or a method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeId,
    /// Constant value; a field that has one is static, not an instance member
    pub static_value: Option<serde_json::Value>,
    /// Documentation comment
    pub documentation: String,
    /// Default-value expression, passed through verbatim to templates
    pub default_value: Option<String>,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            static_value: None,
            documentation: String::new(),
            default_value: None,
        }
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = doc.into();
        self
    }

    /// Make this field a constant
    pub fn with_static_value(mut self, value: serde_json::Value) -> Self {
        self.static_value = Some(value);
        self
    }

    /// Set the default-value expression
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Whether this field is a constant
    pub fn is_static(&self) -> bool {
        self.static_value.is_some()
    }
}

/// A method exposed by a module
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Field>,
    /// `None` when the method declares no return type
    pub return_type: Option<TypeId>,
    pub is_async: bool,
    pub documentation: String,
}

impl Method {
    /// Create a new method with no parameters and no return type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: None,
            is_async: false,
            documentation: String::new(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, param: Field) -> Self {
        self.parameters.push(param);
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeId) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Mark as async
    pub fn async_method(mut self) -> Self {
        self.is_async = true;
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = doc.into();
        self
    }
}

/// A host-exposed module
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module name (e.g., "Config")
    pub name: String,
    /// Fields, instance and static
    pub members: Vec<Field>,
    /// Methods
    pub methods: Vec<Method>,
    /// Module documentation
    pub documentation: String,
    /// Interfaces this module structurally extends
    pub exported_bases: Vec<String>,
    /// Target-specific directives
    pub custom_tags: CustomTags,
    /// Named types used only by this module (filled by extraction)
    pub associated_types: Vec<NamedTypeInfo>,
}

impl Module {
    /// Create a new module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            methods: Vec::new(),
            documentation: String::new(),
            exported_bases: Vec::new(),
            custom_tags: CustomTags::new(),
            associated_types: Vec::new(),
        }
    }

    /// Add a field
    pub fn field(mut self, field: Field) -> Self {
        self.members.push(field);
        self
    }

    /// Add a method
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.documentation = doc.into();
        self
    }

    /// Add an exported base interface
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.exported_bases.push(base.into());
        self
    }

    /// Set a custom tag
    pub fn with_tag(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom_tags.insert(key.into(), value);
        self
    }

    /// Fill in tags the module does not set itself
    pub fn apply_default_custom_tags(&mut self, defaults: &CustomTags) {
        for (key, value) in defaults {
            self.custom_tags
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Fields with a static value
    pub fn static_members(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter(|f| f.is_static())
    }

    /// Fields without a static value
    pub fn instance_members(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter(|f| !f.is_static())
    }
}

/// The module graph of one target, owning its own type arena
#[derive(Debug, Clone, Default)]
pub struct Target {
    pub arena: TypeArena,
    pub modules: Vec<Module>,
}

impl Target {
    pub fn new(arena: TypeArena, modules: Vec<Module>) -> Self {
        Self { arena, modules }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_module_builder() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let string = arena.string();

        let module = Module::new("Config")
            .field(Field::new("retryCount", number))
            .field(Field::new("version", string).with_static_value(json!("1.0")))
            .method(Method::new("reload").async_method())
            .extends("HostModule")
            .with_doc("Runtime configuration");

        assert_eq!(module.instance_members().count(), 1);
        assert_eq!(module.static_members().count(), 1);
        assert!(module.methods[0].is_async);
        assert_eq!(module.methods[0].return_type, None);
        assert_eq!(module.exported_bases, vec!["HostModule".to_string()]);
    }

    #[test]
    fn test_default_custom_tags_do_not_override() {
        let mut module = Module::new("Config").with_tag("shouldExport", json!(false));

        let mut defaults = CustomTags::new();
        defaults.insert("shouldExport".into(), json!(true));
        defaults.insert("namespace".into(), json!("Host"));
        module.apply_default_custom_tags(&defaults);

        assert_eq!(module.custom_tags["shouldExport"], json!(false));
        assert_eq!(module.custom_tags["namespace"], json!("Host"));
    }
}
