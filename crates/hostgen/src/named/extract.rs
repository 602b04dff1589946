//! Named-type extraction
//!
//! Walks every module signature of one target, promotes anonymous nodes to
//! named types at the path they were reached under, and collects every
//! named type once with the union of its source positions and the modules
//! that reach it.

use crate::error::{GenResult, NameCollision};
use crate::ir::{
    CustomTags, EnumMember, EnumType, InterfaceType, Module, Target, TypeArena, TypeId, UnionType,
    ValueType, VoidType, VOID_TYPE_NAME,
};
use crate::named::walk::{walk_modules, TypeVisitor};
use crate::named::ValueTypeSource;
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// A named type paired with every position it was seen in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTypeInfo {
    pub id: TypeId,
    pub name: String,
    pub source: ValueTypeSource,
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    /// First time this name was seen
    Inserted,
    /// Name already known for the same or a structurally equal node
    Merged,
}

/// What to do when two different structures compute the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Keep the first structure, merge usage of the second into it
    #[default]
    KeepFirst,
    /// Abort the run
    Fail,
}

#[derive(Debug, Clone)]
struct PoolEntry {
    info: NamedTypeInfo,
    modules: IndexSet<usize>,
}

/// Every named type of one target, in first-registration order
#[derive(Debug, Clone, Default)]
pub struct NamedTypePool {
    entries: IndexMap<String, PoolEntry>,
}

impl NamedTypePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `info` as used by `module`.
    ///
    /// A name that is already taken by a structurally different node is
    /// reported as a [`NameCollision`] and leaves the pool untouched.
    pub fn register(
        &mut self,
        arena: &TypeArena,
        info: NamedTypeInfo,
        module: usize,
    ) -> Result<Registered, NameCollision> {
        match self.entries.get_mut(&info.name) {
            Some(entry) => {
                if entry.info.id != info.id && !arena.structurally_eq(entry.info.id, info.id) {
                    return Err(NameCollision {
                        name: info.name,
                        existing: entry.info.id,
                        incoming: info.id,
                    });
                }
                entry.info.source |= info.source;
                entry.modules.insert(module);
                Ok(Registered::Merged)
            }
            None => {
                let mut modules = IndexSet::new();
                modules.insert(module);
                self.entries
                    .insert(info.name.clone(), PoolEntry { info, modules });
                Ok(Registered::Inserted)
            }
        }
    }

    /// Add usage to an existing record without touching its structure
    pub fn merge_usage(&mut self, name: &str, source: ValueTypeSource, module: usize) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.info.source |= source;
            entry.modules.insert(module);
        }
    }

    pub fn get(&self, name: &str) -> Option<&NamedTypeInfo> {
        self.entries.get(name).map(|entry| &entry.info)
    }

    /// Indices of the modules that reach `name`
    pub fn owners(&self, name: &str) -> Option<&IndexSet<usize>> {
        self.entries.get(name).map(|entry| &entry.modules)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedTypeInfo> {
        self.entries.values().map(|entry| &entry.info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rewrite an anonymous node into its named form, named by `path`
fn promote(arena: &mut TypeArena, id: TypeId, path: &str) {
    let needs_name = match arena.get(id) {
        ValueType::Tuple(_) | ValueType::Literal(_) => true,
        ValueType::Union(union) => union.name.is_none(),
        ValueType::Void(void) => void.name != VOID_TYPE_NAME,
        _ => false,
    };
    if !needs_name {
        return;
    }

    arena.rewrite(id, |node| match node {
        ValueType::Tuple(tuple) => ValueType::Interface(InterfaceType {
            name: path.to_string(),
            members: tuple.members,
            documentation: String::new(),
            custom_tags: CustomTags::new(),
        }),
        ValueType::Literal(literal) => ValueType::Enum(EnumType {
            name: path.to_string(),
            sub_type: literal.kind,
            members: literal
                .members
                .into_iter()
                .map(|value| EnumMember::new(value.to_key(), value))
                .collect(),
            documentation: String::new(),
            custom_tags: CustomTags::new(),
        }),
        ValueType::Union(union) => ValueType::Union(UnionType {
            name: Some(path.to_string()),
            ..union
        }),
        ValueType::Void(void) => ValueType::Void(VoidType {
            name: VOID_TYPE_NAME.to_string(),
            ..void
        }),
        other => other,
    });
}

struct Extractor {
    pool: NamedTypePool,
    policy: CollisionPolicy,
    module: usize,
    module_name: String,
}

impl TypeVisitor for Extractor {
    fn enter_module(&mut self, index: usize, module: &Module) {
        self.module = index;
        self.module_name = module.name.clone();
    }

    fn visit(
        &mut self,
        arena: &mut TypeArena,
        id: TypeId,
        path: &str,
        source: ValueTypeSource,
    ) -> GenResult<()> {
        promote(arena, id, path);
        let name = arena.get(id).name().unwrap_or(path).to_string();
        let info = NamedTypeInfo { id, name, source };

        match self.pool.register(arena, info, self.module) {
            Ok(Registered::Inserted) => {
                debug!(
                    module = %self.module_name,
                    path,
                    kind = arena.get(id).kind_name(),
                    "Registered named type"
                );
            }
            Ok(Registered::Merged) => {}
            Err(collision) => match self.policy {
                CollisionPolicy::KeepFirst => {
                    warn!(
                        module = %self.module_name,
                        name = %collision.name,
                        "Named type collides with an earlier structure, keeping the first"
                    );
                    self.pool
                        .merge_usage(&collision.name, source, self.module);
                }
                CollisionPolicy::Fail => return Err(collision.into()),
            },
        }
        Ok(())
    }
}

/// Collect every named type reachable from `modules`, promoting anonymous
/// nodes along the way
pub fn fetch_named_types(
    arena: &mut TypeArena,
    modules: &[Module],
    policy: CollisionPolicy,
) -> GenResult<NamedTypePool> {
    let mut extractor = Extractor {
        pool: NamedTypePool::new(),
        policy,
        module: 0,
        module_name: String::new(),
    };
    walk_modules(arena, modules, &mut extractor)?;
    Ok(extractor.pool)
}

/// One target after extraction
#[derive(Debug, Clone, Default)]
pub struct ParsedTarget {
    pub arena: TypeArena,
    /// Modules with their `associated_types` filled in
    pub modules: Vec<Module>,
    /// Named types reached from more than one module of this target
    pub shared_types: Vec<NamedTypeInfo>,
}

impl ParsedTarget {
    /// Module-associated types of every module, then target-shared types
    pub fn named_types(&self) -> impl Iterator<Item = &NamedTypeInfo> {
        self.modules
            .iter()
            .flat_map(|module| module.associated_types.iter())
            .chain(self.shared_types.iter())
    }
}

/// Extract the named types of a target and attach each to its owner
///
/// Types reached from exactly one module become that module's associated
/// types; all others are shared within the target. Both lists keep pool
/// order.
pub fn parse_target(target: Target, policy: CollisionPolicy) -> GenResult<ParsedTarget> {
    let Target {
        mut arena,
        mut modules,
    } = target;
    let pool = fetch_named_types(&mut arena, &modules, policy)?;

    let mut shared_types = Vec::new();
    for info in pool.iter() {
        let owner = pool
            .owners(&info.name)
            .filter(|owners| owners.len() == 1)
            .and_then(|owners| owners.first());
        match owner {
            Some(&owner) => modules[owner].associated_types.push(info.clone()),
            None => shared_types.push(info.clone()),
        }
    }

    info!(
        modules = modules.len(),
        named_types = pool.len(),
        target_shared = shared_types.len(),
        "Extracted named types"
    );

    Ok(ParsedTarget {
        arena,
        modules,
        shared_types,
    })
}
