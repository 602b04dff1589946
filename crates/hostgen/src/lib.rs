//! Hostgen: binding generation for host-exposed modules
//!
//! This crate turns a graph of host modules (fields, methods and the value
//! types flowing through them) into source code for several client
//! languages. All targets share one abstract type model; each target
//! language only decides how that model is spelled.
//!
//! # Architecture
//!
//! - `ir`: Arena-backed value-type model, modules and the JSON schema adapter
//! - `named`: Named-type extraction, interface name normalization and
//!   cross-target shared-type resolution
//! - `transform`: Per-language type and literal syntax
//! - `view`: Render-ready projections of modules and named types
//! - `render`: Template engine seam and the [`CodeGenerator`] driver
//! - `serialize`: Human-readable dump of parsed targets
//!
//! # Pipeline
//!
//! ```text
//! SchemaDocument ─lower─> Target ─parse_target─> ParsedTarget ─┐
//!                                                              ├─ extract_targets_shared_types ─> SharedTypes
//! SchemaDocument ─lower─> Target ─parse_target─> ParsedTarget ─┘
//!
//! ParsedTarget / SharedTypes ─ValueTransformer─> views ─TemplateEngine─> files
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use hostgen::{CodeGenerator, GeneratorOptions, SchemaDocument};
//!
//! let generator = CodeGenerator::new(GeneratorOptions::default());
//! let swift = generator.parse_target(SchemaDocument::from_path("swift.json")?.lower()?)?;
//! let kotlin = generator.parse_target(SchemaDocument::from_path("kotlin.json")?.lower()?)?;
//!
//! let mut targets = vec![swift, kotlin];
//! let shared = generator.extract_targets_shared_types(&mut targets);
//! ```

pub mod config;
pub mod error;
pub mod ir;
pub mod named;
pub mod render;
pub mod serialize;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use config::{GeneratorConfig, OutputConfig, SharedConfig, TargetConfig};
pub use error::{GenError, GenResult, NameCollision};
pub use ir::{
    BasicType, EnumMember, EnumType, Field, InterfaceType, LiteralType, LiteralValue, Method,
    Module, ScalarKind, SchemaDocument, Target, TupleType, TypeArena, TypeId, UnionType,
    ValueType, VoidType,
};
pub use named::{
    extract_targets_shared_types, fetch_named_types, parse_target, CollisionPolicy,
    NameNormalizer, NamedTypeInfo, NamedTypePool, ParsedTarget, Registered, SharedTypes,
    ValueTypeSource,
};
pub use render::{CodeGenerator, GeneratorOptions, HandlebarsEngine, RenderOptions, TemplateEngine};
pub use transform::{
    CSharpValueTransformer, KotlinValueTransformer, RenderingLanguage, SwiftValueTransformer,
    TypeNameMap, ValueTransformer,
};
pub use view::{ModuleView, NamedTypeView};
