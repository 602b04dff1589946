//! Per-language projection of value types and static values
//!
//! A [`ValueTransformer`] spells IR types and literal constants in one
//! target language. Implementations only provide the primitive spellings;
//! the recursive walk over the variant set lives in the provided methods of
//! the trait, so every language handles every variant the same way.
//!
//! # Example
//!
//! ```
//! use hostgen::{RenderingLanguage, TypeArena, TypeNameMap, ValueTransformer};
//!
//! let mut arena = TypeArena::new();
//! let string = arena.string();
//! let list = arena.array(string);
//!
//! let kotlin = RenderingLanguage::Kotlin.transformer(TypeNameMap::new());
//! assert_eq!(kotlin.type_syntax(&arena, list).unwrap(), "List<String>");
//! ```

mod csharp;
mod kotlin;
mod swift;

pub use csharp::CSharpValueTransformer;
pub use kotlin::KotlinValueTransformer;
pub use swift::SwiftValueTransformer;

use crate::error::{GenError, GenResult};
use crate::ir::{BasicType, ScalarKind, TypeArena, TypeId, ValueType};
use crate::named::capitalize;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Per-target overrides of IR type names
pub type TypeNameMap = IndexMap<String, String>;

/// Supported output languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum RenderingLanguage {
    Swift,
    Kotlin,
    CSharp,
}

impl RenderingLanguage {
    /// Extension of generated files, including the dot
    pub fn file_extension(&self) -> &'static str {
        match self {
            RenderingLanguage::Swift => ".swift",
            RenderingLanguage::Kotlin => ".kt",
            RenderingLanguage::CSharp => ".cs",
        }
    }

    pub fn transformer(&self, type_name_map: TypeNameMap) -> Box<dyn ValueTransformer> {
        match self {
            RenderingLanguage::Swift => Box::new(SwiftValueTransformer::new(type_name_map)),
            RenderingLanguage::Kotlin => Box::new(KotlinValueTransformer::new(type_name_map)),
            RenderingLanguage::CSharp => Box::new(CSharpValueTransformer::new(type_name_map)),
        }
    }
}

impl FromStr for RenderingLanguage {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "swift" => Ok(RenderingLanguage::Swift),
            "kotlin" => Ok(RenderingLanguage::Kotlin),
            "csharp" | "c#" => Ok(RenderingLanguage::CSharp),
            _ => Err(GenError::UnknownLanguage(s.to_string())),
        }
    }
}

impl TryFrom<String> for RenderingLanguage {
    type Error = GenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for RenderingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderingLanguage::Swift => "swift",
            RenderingLanguage::Kotlin => "kotlin",
            RenderingLanguage::CSharp => "csharp",
        })
    }
}

/// Spells IR types and values in one target language
pub trait ValueTransformer {
    fn language(&self) -> RenderingLanguage;

    fn type_name_map(&self) -> &TypeNameMap;

    fn basic_type(&self, basic: BasicType) -> &'static str;

    fn dictionary_key(&self, key: ScalarKind) -> &'static str;

    fn array_type(&self, element: &str) -> String;

    fn dictionary_type(&self, key: &str, value: &str) -> String;

    fn optional_type(&self, wrapped: &str) -> String {
        format!("{}?", wrapped)
    }

    fn null_literal(&self) -> &'static str;

    /// Escape sequence for a control character inside a string literal
    fn unicode_escape(&self, c: char) -> String;

    /// Escape for characters the language treats specially inside strings
    fn escape_char(&self, _c: char) -> Option<&'static str> {
        None
    }

    /// Quoted string literal
    fn string_literal(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('"');
        for c in value.chars() {
            if let Some(escaped) = self.escape_char(c) {
                out.push_str(escaped);
                continue;
            }
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&self.unicode_escape(c)),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    /// Array constructor from already rendered elements
    fn array_literal(&self, element_type: &str, elements: &[String]) -> String;

    /// Dictionary constructor from already rendered keys and values
    fn dictionary_literal(
        &self,
        key_type: &str,
        value_type: &str,
        entries: &[(String, String)],
    ) -> String;

    /// Name of a named or predefined type, after the remap table
    fn type_name(&self, name: &str) -> String {
        self.type_name_map()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    fn enum_key(&self, key: &str) -> String {
        capitalize(key)
    }

    /// Type syntax of the node at `id`.
    ///
    /// Anonymous tuples, literal sets and unions have no spelling; they must
    /// be promoted by extraction first.
    fn type_syntax(&self, arena: &TypeArena, id: TypeId) -> GenResult<String> {
        match arena.get(id) {
            ValueType::Basic(basic) => Ok(self.basic_type(*basic).to_string()),
            ValueType::Array(element) => Ok(self.array_type(&self.type_syntax(arena, *element)?)),
            ValueType::Dictionary { key, value } => Ok(self.dictionary_type(
                self.dictionary_key(*key),
                &self.type_syntax(arena, *value)?,
            )),
            ValueType::Optional(wrapped) => {
                Ok(self.optional_type(&self.type_syntax(arena, *wrapped)?))
            }
            ValueType::Interface(_)
            | ValueType::Enum(_)
            | ValueType::Void(_)
            | ValueType::Predefined(_)
            | ValueType::Union(_) => match arena.get(id).name() {
                Some(name) => Ok(self.type_name(name)),
                None => Err(unrepresentable(arena.get(id), self.language())),
            },
            other @ (ValueType::Tuple(_) | ValueType::Literal(_)) => {
                Err(unrepresentable(other, self.language()))
            }
        }
    }

    /// Type syntax with one level of optionality removed
    fn non_optional_type_syntax(&self, arena: &TypeArena, id: TypeId) -> GenResult<String> {
        self.type_syntax(arena, arena.unwrap_optional(id))
    }

    /// Source text of a static value of the type at `id`
    fn literal_syntax(
        &self,
        value: &serde_json::Value,
        arena: &TypeArena,
        id: TypeId,
    ) -> GenResult<String> {
        match arena.get(id) {
            ValueType::Basic(BasicType::Boolean) => value
                .as_bool()
                .map(|b| b.to_string())
                .ok_or_else(|| GenError::mismatch(value, "boolean")),
            ValueType::Basic(BasicType::String) => value
                .as_str()
                .map(|text| self.string_literal(text))
                .ok_or_else(|| GenError::mismatch(value, "string")),
            ValueType::Basic(BasicType::Number) if value.is_number() => Ok(value.to_string()),
            ValueType::Basic(basic) => Err(GenError::mismatch(value, basic.as_str())),
            ValueType::Enum(enum_type) => {
                let member = enum_type
                    .members
                    .iter()
                    .find(|m| value.as_str() == Some(m.key.as_str()) || m.value.to_json() == *value)
                    .ok_or_else(|| GenError::mismatch(value, &enum_type.name))?;
                Ok(format!(
                    "{}.{}",
                    self.type_name(&enum_type.name),
                    self.enum_key(&member.key)
                ))
            }
            ValueType::Array(element) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| GenError::mismatch(value, "array"))?;
                let elements = items
                    .iter()
                    .map(|item| self.literal_syntax(item, arena, *element))
                    .collect::<GenResult<Vec<_>>>()?;
                Ok(self.array_literal(&self.type_syntax(arena, *element)?, &elements))
            }
            ValueType::Dictionary { key, value: value_id } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| GenError::mismatch(value, "dictionary"))?;
                let entries = object
                    .iter()
                    .map(|(k, v)| {
                        let rendered_key = match key {
                            ScalarKind::String => self.string_literal(k),
                            // Number-keyed collections are Int-keyed in every target
                            ScalarKind::Number if k.parse::<i64>().is_ok() => k.clone(),
                            ScalarKind::Number => {
                                return Err(GenError::mismatch(
                                    &serde_json::Value::String(k.clone()),
                                    "number",
                                ))
                            }
                        };
                        Ok((rendered_key, self.literal_syntax(v, arena, *value_id)?))
                    })
                    .collect::<GenResult<Vec<_>>>()?;
                Ok(self.dictionary_literal(
                    self.dictionary_key(*key),
                    &self.type_syntax(arena, *value_id)?,
                    &entries,
                ))
            }
            ValueType::Optional(_) if value.is_null() => Ok(self.null_literal().to_string()),
            ValueType::Optional(wrapped) => self.literal_syntax(value, arena, *wrapped),
            other => Err(GenError::UnsupportedStaticValue {
                kind: other.kind_name(),
                language: self.language(),
            }),
        }
    }
}

fn unrepresentable(ty: &ValueType, language: RenderingLanguage) -> GenError {
    GenError::UnrepresentableType {
        kind: ty.kind_name(),
        language,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumMember, EnumType, InterfaceType, LiteralValue, UnionType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn transformers() -> Vec<Box<dyn ValueTransformer>> {
        [
            RenderingLanguage::Swift,
            RenderingLanguage::Kotlin,
            RenderingLanguage::CSharp,
        ]
        .iter()
        .map(|language| language.transformer(TypeNameMap::new()))
        .collect()
    }

    #[test]
    fn test_language_selector() {
        assert_eq!("Swift".parse::<RenderingLanguage>().unwrap(), RenderingLanguage::Swift);
        assert_eq!("c#".parse::<RenderingLanguage>().unwrap(), RenderingLanguage::CSharp);
        assert_eq!(RenderingLanguage::Kotlin.file_extension(), ".kt");
        assert!(matches!(
            "java".parse::<RenderingLanguage>(),
            Err(GenError::UnknownLanguage(name)) if name == "java"
        ));
    }

    #[test]
    fn test_non_optional_matches_unwrapped() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let optional = arena.optional(number);
        for transformer in transformers() {
            assert_eq!(
                transformer.non_optional_type_syntax(&arena, optional).unwrap(),
                transformer.type_syntax(&arena, number).unwrap()
            );
        }
    }

    #[test]
    fn test_anonymous_types_are_unrepresentable() {
        let mut arena = TypeArena::new();
        let union = arena.alloc(ValueType::Union(UnionType::default()));
        let tuple = arena.alloc(ValueType::Tuple(Default::default()));
        for transformer in transformers() {
            for id in [union, tuple] {
                assert!(matches!(
                    transformer.type_syntax(&arena, id),
                    Err(GenError::UnrepresentableType { .. })
                ));
            }
        }
    }

    #[test]
    fn test_type_name_map_applies_to_named_types() {
        let mut arena = TypeArena::new();
        let predefined = arena.predefined("CodeGen_Int");
        let iface = arena.alloc(ValueType::Interface(InterfaceType::new("Point")));
        let mut map = TypeNameMap::new();
        map.insert("CodeGen_Int".into(), "Int".into());

        let swift = RenderingLanguage::Swift.transformer(map);
        assert_eq!(swift.type_syntax(&arena, predefined).unwrap(), "Int");
        assert_eq!(swift.type_syntax(&arena, iface).unwrap(), "Point");
    }

    #[test]
    fn test_enum_literal_capitalizes_key() {
        let mut arena = TypeArena::new();
        let level = arena.alloc(ValueType::Enum(EnumType {
            name: "LogLevel".into(),
            sub_type: ScalarKind::String,
            members: vec![
                EnumMember::new("debug", LiteralValue::String("debug".into())),
                EnumMember::new("verbose", LiteralValue::String("v".into())),
            ],
            documentation: String::new(),
            custom_tags: Default::default(),
        }));

        for transformer in transformers() {
            assert_eq!(
                transformer.literal_syntax(&json!("debug"), &arena, level).unwrap(),
                "LogLevel.Debug"
            );
            assert_eq!(
                transformer.literal_syntax(&json!("v"), &arena, level).unwrap(),
                "LogLevel.Verbose"
            );
            assert!(matches!(
                transformer.literal_syntax(&json!("trace"), &arena, level),
                Err(GenError::ValueMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_static_values_rejected_for_custom_types() {
        let mut arena = TypeArena::new();
        let iface = arena.alloc(ValueType::Interface(InterfaceType::new("Point")));
        let predefined = arena.predefined("Handle");
        for transformer in transformers() {
            for id in [iface, predefined] {
                assert!(matches!(
                    transformer.literal_syntax(&json!({}), &arena, id),
                    Err(GenError::UnsupportedStaticValue { .. })
                ));
            }
        }
    }

    #[test]
    fn test_basic_literals() {
        let mut arena = TypeArena::new();
        let boolean = arena.boolean();
        let string = arena.string();
        let number = arena.number();
        let optional = arena.optional(string);

        let kotlin = RenderingLanguage::Kotlin.transformer(TypeNameMap::new());
        assert_eq!(kotlin.literal_syntax(&json!(true), &arena, boolean).unwrap(), "true");
        assert_eq!(
            kotlin.literal_syntax(&json!("a \"b\""), &arena, string).unwrap(),
            r#""a \"b\"""#
        );
        assert_eq!(kotlin.literal_syntax(&json!(2.5), &arena, number).unwrap(), "2.5");
        assert_eq!(kotlin.literal_syntax(&json!(null), &arena, optional).unwrap(), "null");
        assert_eq!(kotlin.literal_syntax(&json!("x"), &arena, optional).unwrap(), "\"x\"");
        assert!(matches!(
            kotlin.literal_syntax(&json!(1), &arena, string),
            Err(GenError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn test_number_dictionary_keys_must_be_integers() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let by_id = arena.dictionary(ScalarKind::Number, number);

        for transformer in transformers() {
            for value in [json!({ "1.5": 1 }), json!({ "inf": 2 }), json!({ "NaN": 1 })] {
                assert!(matches!(
                    transformer.literal_syntax(&value, &arena, by_id),
                    Err(GenError::ValueMismatch { .. })
                ));
            }
            assert!(transformer
                .literal_syntax(&json!({ "-3": 1 }), &arena, by_id)
                .unwrap()
                .contains("-3"));
        }
    }

    #[test]
    fn test_string_literals_escape_per_language() {
        let mut arena = TypeArena::new();
        let string = arena.string();
        let value = json!("$name\u{1}\n");

        let literal = |language: RenderingLanguage| {
            language
                .transformer(TypeNameMap::new())
                .literal_syntax(&value, &arena, string)
                .unwrap()
        };

        assert_eq!(literal(RenderingLanguage::Swift), r#""$name\u{1}\n""#);
        assert_eq!(literal(RenderingLanguage::Kotlin), r#""\$name\u0001\n""#);
        assert_eq!(literal(RenderingLanguage::CSharp), r#""$name\u0001\n""#);
    }

    #[test]
    fn test_string_dictionary_keys_are_escaped() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let dict = arena.dictionary(ScalarKind::String, number);

        let kotlin = RenderingLanguage::Kotlin.transformer(TypeNameMap::new());
        assert_eq!(
            kotlin.literal_syntax(&json!({ "$key": 1 }), &arena, dict).unwrap(),
            r#"mapOf("\$key" to 1)"#
        );
    }
}
