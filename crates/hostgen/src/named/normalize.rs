use crate::error::GenResult;
use crate::ir::{Module, TypeArena, TypeId, ValueType};
use crate::named::walk::{walk_modules, TypeVisitor};
use crate::named::ValueTypeSource;
use indexmap::IndexSet;
use tracing::debug;

/// Strips a conventional marker prefix from interface names (`IFoo` to `Foo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameNormalizer {
    marker: char,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self { marker: 'I' }
    }
}

impl NameNormalizer {
    pub fn new(marker: char) -> Self {
        Self { marker }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Rewritten name, or `None` when `name` is left alone.
    ///
    /// The marker is only dropped when what remains does not carry the
    /// marker itself, so a normalized name is never rewritten again.
    pub fn normalize(&self, name: &str) -> Option<String> {
        let rest = self.strip(name)?;
        if self.strip(rest).is_some() {
            return None;
        }
        Some(rest.to_string())
    }

    fn strip<'a>(&self, name: &'a str) -> Option<&'a str> {
        let rest = name.strip_prefix(self.marker)?;
        rest.chars()
            .next()
            .filter(|c| c.is_uppercase())
            .map(|_| rest)
    }

    /// Rename every interface reachable from `modules`; returns how many
    /// were renamed
    pub fn apply(&self, arena: &mut TypeArena, modules: &[Module]) -> GenResult<usize> {
        let mut collector = InterfaceCollector::default();
        walk_modules(arena, modules, &mut collector)?;

        let mut renamed = 0;
        for id in collector.interfaces {
            let new_name = match arena.get(id) {
                ValueType::Interface(iface) => self.normalize(&iface.name),
                _ => None,
            };
            let Some(new_name) = new_name else {
                continue;
            };
            arena.rewrite(id, |node| match node {
                ValueType::Interface(mut iface) => {
                    debug!(from = %iface.name, to = %new_name, "Normalized interface name");
                    iface.name = new_name;
                    ValueType::Interface(iface)
                }
                other => other,
            });
            renamed += 1;
        }
        Ok(renamed)
    }
}

#[derive(Default)]
struct InterfaceCollector {
    interfaces: IndexSet<TypeId>,
}

impl TypeVisitor for InterfaceCollector {
    fn visit(
        &mut self,
        arena: &mut TypeArena,
        id: TypeId,
        _path: &str,
        _source: ValueTypeSource,
    ) -> GenResult<()> {
        if matches!(arena.get(id), ValueType::Interface(_)) {
            self.interfaces.insert(id);
        }
        Ok(())
    }
}
