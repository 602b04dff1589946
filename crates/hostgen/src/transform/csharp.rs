use crate::ir::{BasicType, ScalarKind};
use crate::transform::{RenderingLanguage, TypeNameMap, ValueTransformer};

/// C# spellings
#[derive(Debug, Clone, Default)]
pub struct CSharpValueTransformer {
    type_name_map: TypeNameMap,
}

impl CSharpValueTransformer {
    pub fn new(type_name_map: TypeNameMap) -> Self {
        Self { type_name_map }
    }
}

impl ValueTransformer for CSharpValueTransformer {
    fn language(&self) -> RenderingLanguage {
        RenderingLanguage::CSharp
    }

    fn type_name_map(&self) -> &TypeNameMap {
        &self.type_name_map
    }

    fn basic_type(&self, basic: BasicType) -> &'static str {
        match basic {
            BasicType::String => "string",
            BasicType::Number => "double",
            BasicType::Boolean => "bool",
        }
    }

    fn dictionary_key(&self, key: ScalarKind) -> &'static str {
        match key {
            ScalarKind::String => "string",
            ScalarKind::Number => "int",
        }
    }

    fn array_type(&self, element: &str) -> String {
        format!("List<{}>", element)
    }

    fn dictionary_type(&self, key: &str, value: &str) -> String {
        format!("Dictionary<{}, {}>", key, value)
    }

    fn null_literal(&self) -> &'static str {
        "null"
    }

    fn unicode_escape(&self, c: char) -> String {
        format!("\\u{:04x}", c as u32)
    }

    fn array_literal(&self, element_type: &str, elements: &[String]) -> String {
        format!("new List<{}> {{ {} }}", element_type, elements.join(", "))
    }

    fn dictionary_literal(
        &self,
        key_type: &str,
        value_type: &str,
        entries: &[(String, String)],
    ) -> String {
        let entries: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{{ {}, {} }}", key, value))
            .collect();
        format!(
            "new Dictionary<{}, {}> {{ {} }}",
            key_type,
            value_type,
            entries.join(", ")
        )
    }
}
