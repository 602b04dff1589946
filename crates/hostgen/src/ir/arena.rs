//! Arena storage for value types
//!
//! A [`TypeArena`] owns every [`ValueType`] node of one target. Nodes point
//! at each other through [`TypeId`] handles, which stay valid for the life of
//! the arena. Promotion of anonymous types (tuple to interface, literal to
//! enum) is a [`TypeArena::rewrite`]: a new node is built from the old one
//! and swapped into the same slot, so every referrer observes the promoted
//! node through its unchanged handle.

use crate::ir::{BasicType, Field, ScalarKind, ValueType, VoidType};
use std::collections::{HashMap, HashSet};

/// Handle to a node in a [`TypeArena`]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owner of all value-type nodes of one target
#[derive(Debug, Clone, Default)]
pub struct TypeArena {
    nodes: Vec<ValueType>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Store a node and return its handle.
    ///
    /// An `Optional` whose wrapped node is already `Optional` is not stored;
    /// the existing handle is returned instead, so optionality never nests.
    pub fn alloc(&mut self, ty: ValueType) -> TypeId {
        if let ValueType::Optional(inner) = ty {
            if self.get(inner).is_optional() {
                return inner;
            }
        }
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(ty);
        id
    }

    /// Reserve a slot to be filled later with [`TypeArena::replace`].
    ///
    /// Used for declared types that refer to themselves.
    pub fn reserve(&mut self) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(ValueType::Void(VoidType::default()));
        id
    }

    /// Get the node behind a handle.
    ///
    /// # Panics
    /// Panics if the handle was issued by a different arena and is out of range.
    pub fn get(&self, id: TypeId) -> &ValueType {
        &self.nodes[id.index()]
    }

    /// Swap a new node into an existing slot, returning the old node
    pub fn replace(&mut self, id: TypeId, ty: ValueType) -> ValueType {
        std::mem::replace(&mut self.nodes[id.index()], ty)
    }

    /// Build a new node from the current one and store it in the same slot
    pub fn rewrite(&mut self, id: TypeId, f: impl FnOnce(ValueType) -> ValueType) {
        let old = self.replace(id, ValueType::Void(VoidType::default()));
        let new = f(old);
        self.replace(id, new);
    }

    /// Iterate over all nodes with their handles
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &ValueType)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId(i as u32), ty))
    }

    /// Strip one level of optionality
    pub fn unwrap_optional(&self, id: TypeId) -> TypeId {
        match self.get(id) {
            ValueType::Optional(inner) => *inner,
            _ => id,
        }
    }

    /// Create a basic type node
    pub fn basic(&mut self, basic: BasicType) -> TypeId {
        self.alloc(ValueType::Basic(basic))
    }

    /// Create a string type node
    pub fn string(&mut self) -> TypeId {
        self.basic(BasicType::String)
    }

    /// Create a number type node
    pub fn number(&mut self) -> TypeId {
        self.basic(BasicType::Number)
    }

    /// Create a boolean type node
    pub fn boolean(&mut self) -> TypeId {
        self.basic(BasicType::Boolean)
    }

    /// Create an array node
    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.alloc(ValueType::Array(element))
    }

    /// Create a dictionary node
    pub fn dictionary(&mut self, key: ScalarKind, value: TypeId) -> TypeId {
        self.alloc(ValueType::Dictionary { key, value })
    }

    /// Create an optional node (collapses nested optionals)
    pub fn optional(&mut self, wrapped: TypeId) -> TypeId {
        self.alloc(ValueType::Optional(wrapped))
    }

    /// Create a predefined type reference
    pub fn predefined(&mut self, name: impl Into<String>) -> TypeId {
        self.alloc(ValueType::Predefined(name.into()))
    }

    /// Create a void node
    pub fn void(&mut self) -> TypeId {
        self.alloc(ValueType::Void(VoidType::default()))
    }

    /// Deep structural comparison of two nodes.
    ///
    /// Cyclic graphs compare equal when no difference is found before a pair
    /// repeats.
    pub fn structurally_eq(&self, a: TypeId, b: TypeId) -> bool {
        let mut assumed = HashSet::new();
        self.eq_rec(a, b, &mut assumed)
    }

    fn eq_rec(&self, a: TypeId, b: TypeId, assumed: &mut HashSet<(TypeId, TypeId)>) -> bool {
        if a == b || !assumed.insert((a, b)) {
            return true;
        }

        let fields_eq = |this: &Self,
                         x: &[Field],
                         y: &[Field],
                         assumed: &mut HashSet<(TypeId, TypeId)>| {
            x.len() == y.len()
                && x.iter().zip(y).all(|(fx, fy)| {
                    fx.name == fy.name
                        && fx.static_value == fy.static_value
                        && fx.default_value == fy.default_value
                        && this.eq_rec(fx.ty, fy.ty, assumed)
                })
        };

        match (self.get(a), self.get(b)) {
            (ValueType::Interface(x), ValueType::Interface(y)) => {
                x.name == y.name && fields_eq(self, &x.members, &y.members, assumed)
            }
            (ValueType::Tuple(x), ValueType::Tuple(y)) => {
                fields_eq(self, &x.members, &y.members, assumed)
            }
            (ValueType::Enum(x), ValueType::Enum(y)) => {
                x.name == y.name
                    && x.sub_type == y.sub_type
                    && x.members.len() == y.members.len()
                    && x
                        .members
                        .iter()
                        .zip(&y.members)
                        .all(|(mx, my)| mx.key == my.key && mx.value == my.value)
            }
            (ValueType::Array(x), ValueType::Array(y))
            | (ValueType::Optional(x), ValueType::Optional(y)) => self.eq_rec(*x, *y, assumed),
            (
                ValueType::Dictionary { key: kx, value: vx },
                ValueType::Dictionary { key: ky, value: vy },
            ) => kx == ky && self.eq_rec(*vx, *vy, assumed),
            (ValueType::Union(x), ValueType::Union(y)) => {
                x.name == y.name
                    && x.members.len() == y.members.len()
                    && x
                        .members
                        .iter()
                        .zip(&y.members)
                        .all(|(mx, my)| self.eq_rec(*mx, *my, assumed))
            }
            (x, y) => x == y,
        }
    }

    /// Deep-copy the subtree at `id` of another arena into this one
    pub fn import(&mut self, other: &TypeArena, id: TypeId) -> TypeId {
        let mut memo = HashMap::new();
        self.import_with(other, id, &mut memo)
    }

    /// Deep-copy with a caller-held memo, so repeated imports from the same
    /// source arena share already-copied nodes
    pub fn import_with(
        &mut self,
        other: &TypeArena,
        id: TypeId,
        memo: &mut HashMap<TypeId, TypeId>,
    ) -> TypeId {
        if let Some(&copied) = memo.get(&id) {
            return copied;
        }
        let slot = self.reserve();
        memo.insert(id, slot);
        let node = other
            .get(id)
            .clone()
            .map_ids(&mut |child| self.import_with(other, child, memo));
        self.replace(slot, node);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Field, InterfaceType, TupleType};

    #[test]
    fn test_optional_never_nests() {
        let mut arena = TypeArena::new();
        let s = arena.string();
        let opt = arena.optional(s);
        let opt_opt = arena.optional(opt);
        assert_eq!(opt, opt_opt);
        assert_eq!(arena.unwrap_optional(opt), s);
        assert_eq!(arena.unwrap_optional(s), s);
    }

    #[test]
    fn test_rewrite_keeps_handle() {
        let mut arena = TypeArena::new();
        let s = arena.string();
        let tuple = arena.alloc(ValueType::Tuple(TupleType {
            members: vec![Field::new("x", s)],
        }));
        let array = arena.array(tuple);

        arena.rewrite(tuple, |old| match old {
            ValueType::Tuple(t) => {
                let mut iface = InterfaceType::new("Point");
                iface.members = t.members;
                ValueType::Interface(iface)
            }
            other => other,
        });

        assert_eq!(arena.get(array), &ValueType::Array(tuple));
        assert_eq!(arena.get(tuple).name(), Some("Point"));
    }

    #[test]
    fn test_structural_equality() {
        let mut arena = TypeArena::new();
        let a_el = arena.string();
        let b_el = arena.string();
        let n = arena.number();
        let a = arena.array(a_el);
        let b = arena.array(b_el);
        let c = arena.array(n);
        assert!(arena.structurally_eq(a, b));
        assert!(!arena.structurally_eq(a, c));
    }

    #[test]
    fn test_structural_equality_on_cycles() {
        let mut arena = TypeArena::new();
        let make_node = |arena: &mut TypeArena| {
            let slot = arena.reserve();
            let children = arena.array(slot);
            arena.replace(
                slot,
                ValueType::Interface(
                    InterfaceType::new("Node").member(Field::new("children", children)),
                ),
            );
            slot
        };
        let first = make_node(&mut arena);
        let second = make_node(&mut arena);
        assert!(arena.structurally_eq(first, second));
    }

    #[test]
    fn test_import_copies_subtree() {
        let mut source = TypeArena::new();
        let s = source.string();
        let opt = source.optional(s);
        let list = source.array(opt);

        let mut dest = TypeArena::new();
        dest.number();
        let copied = dest.import(&source, list);

        assert_eq!(dest.len(), 4);
        let ValueType::Array(inner) = dest.get(copied) else {
            panic!("expected array");
        };
        assert!(dest.get(*inner).is_optional());
        assert_eq!(
            dest.get(dest.unwrap_optional(*inner)),
            &ValueType::Basic(BasicType::String)
        );
    }
}
