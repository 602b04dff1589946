use crate::ir::{BasicType, ScalarKind};
use crate::transform::{RenderingLanguage, TypeNameMap, ValueTransformer};

/// Kotlin spellings
#[derive(Debug, Clone, Default)]
pub struct KotlinValueTransformer {
    type_name_map: TypeNameMap,
}

impl KotlinValueTransformer {
    pub fn new(type_name_map: TypeNameMap) -> Self {
        Self { type_name_map }
    }
}

impl ValueTransformer for KotlinValueTransformer {
    fn language(&self) -> RenderingLanguage {
        RenderingLanguage::Kotlin
    }

    fn type_name_map(&self) -> &TypeNameMap {
        &self.type_name_map
    }

    fn basic_type(&self, basic: BasicType) -> &'static str {
        match basic {
            BasicType::String => "String",
            BasicType::Number => "Double",
            BasicType::Boolean => "Boolean",
        }
    }

    fn dictionary_key(&self, key: ScalarKind) -> &'static str {
        match key {
            ScalarKind::String => "String",
            ScalarKind::Number => "Int",
        }
    }

    fn array_type(&self, element: &str) -> String {
        format!("List<{}>", element)
    }

    fn dictionary_type(&self, key: &str, value: &str) -> String {
        format!("Map<{}, {}>", key, value)
    }

    fn null_literal(&self) -> &'static str {
        "null"
    }

    fn unicode_escape(&self, c: char) -> String {
        format!("\\u{:04x}", c as u32)
    }

    fn escape_char(&self, c: char) -> Option<&'static str> {
        // `$` starts a string template
        (c == '$').then_some("\\$")
    }

    fn array_literal(&self, _element_type: &str, elements: &[String]) -> String {
        format!("listOf({})", elements.join(", "))
    }

    fn dictionary_literal(
        &self,
        _key_type: &str,
        _value_type: &str,
        entries: &[(String, String)],
    ) -> String {
        let entries: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{} to {}", key, value))
            .collect();
        format!("mapOf({})", entries.join(", "))
    }
}
