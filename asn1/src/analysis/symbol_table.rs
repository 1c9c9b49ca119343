use indexmap::IndexMap;

use crate::ast::{EntityId, Mode};

/// Global name resolution: one map per kind of assignment.  Entries are only
/// added once an assignment has been completely parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    types: IndexMap<String, EntityId>,
    values: IndexMap<String, EntityId>,
    sets: IndexMap<String, EntityId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Look up a type, class or parameterized type assignment
    pub fn get_type(&self, name: &str) -> Option<EntityId> {
        self.types.get(name).copied()
    }

    /// Look up a value or information object assignment
    pub fn get_value(&self, name: &str) -> Option<EntityId> {
        self.values.get(name).copied()
    }

    /// Look up a value set or object set assignment
    pub fn get_set(&self, name: &str) -> Option<EntityId> {
        self.sets.get(name).copied()
    }

    /// The map holding assignments of the given mode
    pub fn entries(&self, mode: Mode) -> &IndexMap<String, EntityId> {
        match mode {
            Mode::Type => &self.types,
            Mode::Value => &self.values,
            Mode::Set => &self.sets,
        }
    }

    /// Register an assignment, returning the entity it replaced if the name
    /// was already taken
    pub(crate) fn register(
        &mut self,
        mode: Mode,
        name: impl Into<String>,
        id: EntityId,
    ) -> Option<EntityId> {
        let map = match mode {
            Mode::Type => &mut self.types,
            Mode::Value => &mut self.values,
            Mode::Set => &mut self.sets,
        };
        map.insert(name.into(), id)
    }
}
