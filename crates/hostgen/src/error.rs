//! Error types for the generation pipeline
//!
//! Every failure aborts the whole run. Nothing is written to disk until the
//! final render step, so there is no partial state to roll back.

use crate::ir::TypeId;
use crate::transform::RenderingLanguage;
use thiserror::Error;

/// Result type for hostgen operations
pub type GenResult<T> = Result<T, GenError>;

/// Main error type for hostgen
#[derive(Debug, Error)]
pub enum GenError {
    /// A value type has no spelling in the target language
    #[error("type `{kind}` cannot be represented in {language}")]
    UnrepresentableType {
        kind: &'static str,
        language: RenderingLanguage,
    },

    /// A static value was declared on a type that has no inline literal form
    #[error("static value of type `{kind}` cannot be rendered as a {language} literal")]
    UnsupportedStaticValue {
        kind: &'static str,
        language: RenderingLanguage,
    },

    /// A static value does not have the shape its declared type requires
    #[error("value `{value}` does not match declared type `{expected}`")]
    ValueMismatch { value: String, expected: String },

    /// Two distinct structures were registered under the same name
    #[error(transparent)]
    NameCollision(#[from] NameCollision),

    /// Requested a transformer or file extension for an unsupported language
    #[error("unknown rendering language: {0}")]
    UnknownLanguage(String),

    /// Schema refers to a declared type that does not exist
    #[error("unknown type reference: {0}")]
    UnknownReference(String),

    /// Schema document is well-formed JSON but not a valid module graph
    #[error("invalid schema: {0}")]
    Schema(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenError {
    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        GenError::Schema(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        GenError::Config(message.into())
    }

    /// Create a value mismatch error
    pub fn mismatch(value: &serde_json::Value, expected: impl Into<String>) -> Self {
        GenError::ValueMismatch {
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

impl From<toml::de::Error> for GenError {
    fn from(err: toml::de::Error) -> Self {
        GenError::Config(err.to_string())
    }
}

/// Returned by the named-type registry when a name is already taken by a
/// structurally different type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("named type `{name}` is already registered with a different structure ({existing:?} vs {incoming:?})")]
pub struct NameCollision {
    /// The contested name
    pub name: String,
    /// Handle of the type that was registered first
    pub existing: TypeId,
    /// Handle of the type that tried to take the same name
    pub incoming: TypeId,
}
