//! Named-type discovery
//!
//! Passes over the module graph of one or more targets:
//!
//! 1. [`NameNormalizer::apply`] optionally rewrites interface names.
//! 2. [`parse_target`] promotes anonymous types to named types, records the
//!    positions each named type is used in and attaches types to modules.
//! 3. [`extract_targets_shared_types`] hoists types used by several targets
//!    into one shared set.
//!
//! Each pass mutates the arena of the target it runs on and must finish
//! before the next one starts.

mod extract;
mod normalize;
mod shared;
mod source;
pub mod walk;

pub use extract::{
    fetch_named_types, parse_target, CollisionPolicy, NamedTypeInfo, NamedTypePool, ParsedTarget,
    Registered,
};
pub use normalize::NameNormalizer;
pub use shared::{extract_targets_shared_types, SharedTypes};
pub use source::ValueTypeSource;
pub use walk::{capitalize, member_path, root_types, RootType};
