//! Traversal of the value types reachable from module signatures
//!
//! Extraction and name normalization both go through [`walk_modules`], so
//! the set of nodes one pass rewrites is exactly the set the other pass
//! names. A visitor is called on every node that is, or becomes, a named
//! type; the traversal decides the path each node is reached under.

use crate::error::GenResult;
use crate::ir::{Field, Module, TypeArena, TypeId, ValueType};
use crate::named::ValueTypeSource;
use std::collections::HashSet;

/// A value type that appears directly in a module signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootType {
    pub ty: TypeId,
    pub source: ValueTypeSource,
    /// Path seeded from the module and member names
    pub path: String,
}

/// Field types, then for each method its parameter types and return type
pub fn root_types(module: &Module) -> Vec<RootType> {
    let fields = module.members.iter().map(|field| RootType {
        ty: field.ty,
        source: ValueTypeSource::FIELD,
        path: member_path(&module.name, &field.name),
    });

    let methods = module.methods.iter().flat_map(|method| {
        let method_path = member_path(&module.name, &method.name);
        let parameters = method
            .parameters
            .iter()
            .map(|param| RootType {
                ty: param.ty,
                source: ValueTypeSource::PARAMETER,
                path: member_path(&method_path, &param.name),
            })
            .collect::<Vec<_>>();
        let ret = method.return_type.map(|ty| RootType {
            ty,
            source: ValueTypeSource::RETURN,
            path: member_path(&method_path, "returnType"),
        });
        parameters.into_iter().chain(ret)
    });

    fields.chain(methods).collect()
}

/// Uppercase the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Path of a member below `base`: `Config` + `log` = `ConfigLog`
pub fn member_path(base: &str, member: &str) -> String {
    format!("{}{}", base, capitalize(member))
}

/// Name a union member contributes to its child path, taken before the
/// member is visited
pub(crate) fn discriminant(ty: &ValueType) -> String {
    match ty {
        ValueType::Basic(basic) => basic.as_str().to_string(),
        other => other
            .name()
            .unwrap_or_else(|| other.kind_name())
            .to_string(),
    }
}

pub(crate) trait TypeVisitor {
    /// Called before the roots of module `index` are walked
    fn enter_module(&mut self, _index: usize, _module: &Module) {}

    /// Called on every named or nameable node; may rewrite the node in place
    fn visit(
        &mut self,
        arena: &mut TypeArena,
        id: TypeId,
        path: &str,
        source: ValueTypeSource,
    ) -> GenResult<()>;
}

/// Nodes on the current path, plus the subtrees already walked under a
/// module and source
#[derive(Default)]
struct WalkState {
    module: usize,
    stack: Vec<TypeId>,
    walked: HashSet<(TypeId, usize, ValueTypeSource)>,
}

/// Walk every root type of every module
pub(crate) fn walk_modules<V: TypeVisitor>(
    arena: &mut TypeArena,
    modules: &[Module],
    visitor: &mut V,
) -> GenResult<()> {
    let mut state = WalkState::default();
    for (index, module) in modules.iter().enumerate() {
        state.module = index;
        visitor.enter_module(index, module);
        for root in root_types(module) {
            walk(arena, root.ty, &root.path, root.source, visitor, &mut state)?;
        }
    }
    Ok(())
}

fn walk<V: TypeVisitor>(
    arena: &mut TypeArena,
    id: TypeId,
    path: &str,
    source: ValueTypeSource,
    visitor: &mut V,
    state: &mut WalkState,
) -> GenResult<()> {
    match arena.get(id) {
        ValueType::Basic(_) | ValueType::Predefined(_) => Ok(()),
        ValueType::Enum(_) | ValueType::Literal(_) | ValueType::Void(_) => {
            visitor.visit(arena, id, path, source)
        }
        ValueType::Array(element) => {
            let element = *element;
            walk(arena, element, &format!("{}Element", path), source, visitor, state)
        }
        ValueType::Dictionary { value, .. } => {
            let value = *value;
            walk(arena, value, &format!("{}Value", path), source, visitor, state)
        }
        ValueType::Optional(wrapped) => {
            let wrapped = *wrapped;
            walk(arena, wrapped, path, source, visitor, state)
        }
        ValueType::Interface(_) => {
            visitor.visit(arena, id, path, source)?;
            // Members hang off the name the interface has after the visit
            let (base, members) = match arena.get(id) {
                ValueType::Interface(iface) => (iface.name.clone(), member_types(&iface.members)),
                _ => return Ok(()),
            };
            let children = members
                .into_iter()
                .map(|(name, ty)| (ty, member_path(&base, &name)))
                .collect();
            descend(arena, id, children, source, visitor, state)
        }
        ValueType::Tuple(tuple) => {
            let children = member_types(&tuple.members)
                .into_iter()
                .map(|(name, ty)| (ty, member_path(path, &name)))
                .collect();
            visitor.visit(arena, id, path, source)?;
            descend(arena, id, children, source, visitor, state)
        }
        ValueType::Union(union) => {
            let children = union
                .members
                .iter()
                .map(|&member| {
                    let disc = discriminant(arena.get(member));
                    (member, format!("{}{}", path, capitalize(&disc)))
                })
                .collect();
            visitor.visit(arena, id, path, source)?;
            descend(arena, id, children, source, visitor, state)
        }
    }
}

/// Recurse into children unless `id` is being walked, or was already walked
/// for this module and source.
///
/// The first walk promotes and names every node below `id`, so a later walk
/// would only repeat the same visits.
fn descend<V: TypeVisitor>(
    arena: &mut TypeArena,
    id: TypeId,
    children: Vec<(TypeId, String)>,
    source: ValueTypeSource,
    visitor: &mut V,
    state: &mut WalkState,
) -> GenResult<()> {
    let key = (id, state.module, source);
    if state.stack.contains(&id) || state.walked.contains(&key) {
        return Ok(());
    }
    state.stack.push(id);
    for (child, path) in children {
        walk(arena, child, &path, source, visitor, state)?;
    }
    state.stack.pop();
    state.walked.insert(key);
    Ok(())
}

fn member_types(members: &[Field]) -> Vec<(String, TypeId)> {
    members.iter().map(|f| (f.name.clone(), f.ty)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Method, UnionType};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct PathRecorder {
        seen: Vec<String>,
    }

    impl TypeVisitor for PathRecorder {
        fn visit(
            &mut self,
            _arena: &mut TypeArena,
            _id: TypeId,
            path: &str,
            _source: ValueTypeSource,
        ) -> GenResult<()> {
            self.seen.push(path.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_root_paths() {
        let mut arena = TypeArena::new();
        let number = arena.number();
        let string = arena.string();
        let void = arena.void();
        let module = Module::new("Config")
            .field(Field::new("retryCount", number))
            .method(
                Method::new("log")
                    .param(Field::new("message", string))
                    .returns(void),
            );

        let paths: Vec<_> = root_types(&module)
            .into_iter()
            .map(|root| (root.path, root.source))
            .collect();
        assert_eq!(
            paths,
            vec![
                ("ConfigRetryCount".to_string(), ValueTypeSource::FIELD),
                ("ConfigLogMessage".to_string(), ValueTypeSource::PARAMETER),
                ("ConfigLogReturnType".to_string(), ValueTypeSource::RETURN),
            ]
        );
    }

    #[test]
    fn test_container_paths_and_union_discriminants() {
        let mut arena = TypeArena::new();
        let string = arena.string();
        let tuple = arena.alloc(ValueType::Tuple(Default::default()));
        let union = arena.alloc(ValueType::Union(UnionType {
            members: vec![string, tuple],
            ..Default::default()
        }));
        let list = arena.array(union);
        let opt = arena.optional(list);
        let module = Module::new("Store").field(Field::new("items", opt));

        let mut recorder = PathRecorder::default();
        walk_modules(&mut arena, &[module], &mut recorder).unwrap();

        assert_eq!(
            recorder.seen,
            vec![
                "StoreItemsElement".to_string(),
                "StoreItemsElementTupleType".to_string(),
            ]
        );
    }

    #[test]
    fn test_recursive_interface_terminates() {
        let mut arena = TypeArena::new();
        let node = arena.reserve();
        let children = arena.array(node);
        arena.replace(
            node,
            ValueType::Interface(
                crate::ir::InterfaceType::new("TreeNode").member(Field::new("children", children)),
            ),
        );
        let module = Module::new("Tree").field(Field::new("root", node));

        let mut recorder = PathRecorder::default();
        walk_modules(&mut arena, &[module], &mut recorder).unwrap();

        assert_eq!(
            recorder.seen,
            vec!["TreeRoot".to_string(), "TreeNodeChildrenElement".to_string()]
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("debug"), "Debug");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("Info"), "Info");
    }

    /// `Level<i>` holds two fields of type `Level<i-1>`, so a naive walk
    /// reaches `Level0` 2^depth times
    fn diamond_chain(arena: &mut TypeArena, depth: usize) -> TypeId {
        let number = arena.number();
        let mut below = arena.alloc(ValueType::Interface(
            crate::ir::InterfaceType::new("Level0").member(Field::new("value", number)),
        ));
        for level in 1..=depth {
            below = arena.alloc(ValueType::Interface(
                crate::ir::InterfaceType::new(format!("Level{}", level))
                    .member(Field::new("left", below))
                    .member(Field::new("right", below)),
            ));
        }
        below
    }

    #[test]
    fn test_shared_subtrees_are_walked_once_per_source() {
        let mut arena = TypeArena::new();
        let top = diamond_chain(&mut arena, 40);
        let module = Module::new("Graph")
            .field(Field::new("root", top))
            .method(Method::new("load").returns(top));

        let mut recorder = PathRecorder::default();
        walk_modules(&mut arena, &[module], &mut recorder).unwrap();

        // Each level is visited once from each parent field it hangs off,
        // and its own members only on the first of those visits
        assert_eq!(recorder.seen.len(), 2 * (2 * 40 + 1));
        assert_eq!(recorder.seen[0], "GraphRoot");
        assert_eq!(recorder.seen[1], "Level40Left");
        assert_eq!(recorder.seen[2 * 40 + 1], "GraphLoadReturnType");
    }
}
