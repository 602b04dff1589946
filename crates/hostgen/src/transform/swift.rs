use crate::ir::{BasicType, ScalarKind};
use crate::transform::{RenderingLanguage, TypeNameMap, ValueTransformer};

/// Swift spellings
#[derive(Debug, Clone, Default)]
pub struct SwiftValueTransformer {
    type_name_map: TypeNameMap,
}

impl SwiftValueTransformer {
    pub fn new(type_name_map: TypeNameMap) -> Self {
        Self { type_name_map }
    }
}

impl ValueTransformer for SwiftValueTransformer {
    fn language(&self) -> RenderingLanguage {
        RenderingLanguage::Swift
    }

    fn type_name_map(&self) -> &TypeNameMap {
        &self.type_name_map
    }

    fn basic_type(&self, basic: BasicType) -> &'static str {
        match basic {
            BasicType::String => "String",
            BasicType::Number => "Double",
            BasicType::Boolean => "Bool",
        }
    }

    fn dictionary_key(&self, key: ScalarKind) -> &'static str {
        match key {
            ScalarKind::String => "String",
            ScalarKind::Number => "Int",
        }
    }

    fn array_type(&self, element: &str) -> String {
        format!("[{}]", element)
    }

    fn dictionary_type(&self, key: &str, value: &str) -> String {
        format!("[{}: {}]", key, value)
    }

    fn null_literal(&self) -> &'static str {
        "nil"
    }

    fn unicode_escape(&self, c: char) -> String {
        format!("\\u{{{:x}}}", c as u32)
    }

    fn array_literal(&self, _element_type: &str, elements: &[String]) -> String {
        format!("[{}]", elements.join(", "))
    }

    fn dictionary_literal(
        &self,
        _key_type: &str,
        _value_type: &str,
        entries: &[(String, String)],
    ) -> String {
        if entries.is_empty() {
            return "[:]".to_string();
        }
        let entries: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        format!("[{}]", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeArena;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_swift_type_syntax() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let string = arena.string();
        let label = arena.optional(string);
        let list = arena.array(number);
        let dict = arena.dictionary(ScalarKind::String, list);

        let swift = SwiftValueTransformer::default();
        assert_eq!(swift.type_syntax(&arena, number).unwrap(), "Double");
        assert_eq!(swift.type_syntax(&arena, label).unwrap(), "String?");
        assert_eq!(swift.type_syntax(&arena, dict).unwrap(), "[String: [Double]]");
    }

    #[test]
    fn test_swift_literals() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let list = arena.array(number);
        let dict = arena.dictionary(ScalarKind::String, number);
        let by_id = arena.dictionary(ScalarKind::Number, number);
        let optional = arena.optional(number);

        let swift = SwiftValueTransformer::default();
        assert_eq!(swift.literal_syntax(&json!([1, 2]), &arena, list).unwrap(), "[1, 2]");
        assert_eq!(
            swift.literal_syntax(&json!({ "a": 1 }), &arena, dict).unwrap(),
            "[\"a\": 1]"
        );
        assert_eq!(swift.literal_syntax(&json!({}), &arena, dict).unwrap(), "[:]");
        assert_eq!(swift.literal_syntax(&json!({ "7": 1 }), &arena, by_id).unwrap(), "[7: 1]");
        assert_eq!(swift.literal_syntax(&json!(null), &arena, optional).unwrap(), "nil");
    }
}
