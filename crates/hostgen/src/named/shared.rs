//! Cross-target deduplication
//!
//! Each target is extracted independently over its own arena. Named types
//! that two or more targets reach are removed from every per-target list and
//! copied once into a [`SharedTypes`] set that owns its own arena.

use crate::ir::{TypeArena, TypeId};
use crate::named::{NamedTypeInfo, ParsedTarget};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Named types used by more than one target
#[derive(Debug, Clone, Default)]
pub struct SharedTypes {
    pub arena: TypeArena,
    pub types: Vec<NamedTypeInfo>,
}

impl SharedTypes {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.iter().any(|info| info.name == name)
    }
}

struct Usage<'a> {
    /// Index of the first target that reached the type
    target: usize,
    info: &'a NamedTypeInfo,
    targets: BTreeSet<usize>,
}

/// Hoist named types used by two or more targets out of every target.
///
/// Types are matched by name only. The hoisted record keeps the structure
/// and source bits of the first target that reached it. Output order follows
/// first sight across targets in the order given.
pub fn extract_targets_shared_types(targets: &mut [ParsedTarget]) -> SharedTypes {
    let mut usage: IndexMap<&str, Usage<'_>> = IndexMap::new();
    for (index, target) in targets.iter().enumerate() {
        for info in target.named_types() {
            usage
                .entry(info.name.as_str())
                .or_insert_with(|| Usage {
                    target: index,
                    info,
                    targets: BTreeSet::new(),
                })
                .targets
                .insert(index);
        }
    }

    let mut shared = SharedTypes::default();
    let mut memos: HashMap<usize, HashMap<TypeId, TypeId>> = HashMap::new();
    for usage in usage.values().filter(|usage| usage.targets.len() > 1) {
        let memo = memos.entry(usage.target).or_default();
        let id = shared
            .arena
            .import_with(&targets[usage.target].arena, usage.info.id, memo);
        shared.types.push(NamedTypeInfo {
            id,
            name: usage.info.name.clone(),
            source: usage.info.source,
        });
    }

    for target in targets.iter_mut() {
        for module in &mut target.modules {
            module
                .associated_types
                .retain(|info| !shared.contains(&info.name));
        }
        target
            .shared_types
            .retain(|info| !shared.contains(&info.name));
    }

    info!(
        targets = targets.len(),
        shared_types = shared.types.len(),
        "Hoisted types shared across targets"
    );
    shared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, InterfaceType, Module, Target, TupleType, ValueType};
    use crate::named::{parse_target, CollisionPolicy};
    use pretty_assertions::assert_eq;

    fn target_using(names: &[&str]) -> ParsedTarget {
        let mut arena = TypeArena::new();
        let s = arena.string();
        let mut module = Module::new("Host");
        for name in names {
            let ty = arena.alloc(ValueType::Interface(
                InterfaceType::new(*name).member(Field::new("id", s)),
            ));
            module = module.field(Field::new(name.to_lowercase(), ty));
        }
        parse_target(Target::new(arena, vec![module]), CollisionPolicy::default()).unwrap()
    }

    fn pool_names(target: &ParsedTarget) -> Vec<String> {
        target.named_types().map(|info| info.name.clone()).collect()
    }

    #[test]
    fn test_dedup_across_targets() {
        let mut targets = vec![
            target_using(&["Foo"]),
            target_using(&["Foo", "Bar"]),
            target_using(&[]),
        ];

        let shared = extract_targets_shared_types(&mut targets);

        assert!(shared.contains("Foo"));
        assert!(!shared.contains("Bar"));
        assert_eq!(shared.types.len(), 1);
        assert!(pool_names(&targets[0]).is_empty());
        // `Bar` is reached by one target only and stays with it
        assert_eq!(pool_names(&targets[1]), vec!["Bar"]);
        assert!(pool_names(&targets[2]).is_empty());

        let ValueType::Interface(foo) = shared.arena.get(shared.types[0].id) else {
            panic!("expected interface");
        };
        assert_eq!(foo.name, "Foo");
        assert_eq!(
            shared.arena.get(foo.members[0].ty),
            &ValueType::Basic(crate::ir::BasicType::String)
        );
    }

    #[test]
    fn test_anonymous_tuple_hoisted_once() {
        let make_target = || {
            let mut arena = TypeArena::new();
            let n = arena.number();
            let point = arena.alloc(ValueType::Tuple(TupleType {
                members: vec![Field::new("x", n), Field::new("y", n)],
            }));
            let module = Module::new("Canvas").field(Field::new("origin", point));
            parse_target(Target::new(arena, vec![module]), CollisionPolicy::default()).unwrap()
        };
        let mut targets = vec![make_target(), make_target()];

        let shared = extract_targets_shared_types(&mut targets);

        let names: Vec<_> = shared.types.iter().map(|info| info.name.as_str()).collect();
        assert_eq!(names, vec!["CanvasOrigin"]);
        assert!(targets.iter().all(|t| t.named_types().next().is_none()));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let run = || {
            let mut targets = vec![
                target_using(&["Foo", "Baz"]),
                target_using(&["Baz", "Foo", "Qux"]),
                target_using(&["Qux"]),
            ];
            let shared = extract_targets_shared_types(&mut targets);
            shared
                .types
                .into_iter()
                .map(|info| info.name)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), vec!["Foo", "Baz", "Qux"]);
        assert_eq!(run(), run());
    }
}
