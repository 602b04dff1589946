//! Intermediate Representation (IR) for host modules
//!
//! This module provides the closed value-type model, the arena that owns
//! every node of one target, module metadata and the JSON schema adapter
//! that builds a module graph.

pub mod arena;
pub mod module;
pub mod schema;
pub mod types;

pub use arena::*;
pub use module::*;
pub use schema::*;
pub use types::*;
