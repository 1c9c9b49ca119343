use crate::{
    analysis::{ConstraintSlot, PathStep, ReferrerPath},
    ast::{Category, EntityId, Kind, Value},
    lexer,
};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// Find a registered type, class or parameterized type
    pub(super) fn lookup_type(&self, id: EntityId, name: &str) -> Result<EntityId> {
        self.symbols
            .get_type(name)
            .ok_or_else(|| self.link_error(id, "undefined type reference", name))
    }

    /// Find a registered class
    pub(super) fn lookup_class(&self, id: EntityId, name: &str) -> Result<EntityId> {
        let class = self.lookup_type(id, name)?;
        if self.tree[class].kind != Some(Kind::Class) {
            return Err(self.syntax_error(id, "reference to bad type, expected a CLASS", name));
        }
        Ok(class)
    }

    /// Find a registered value whose kind is accepted, returning a copy of
    /// the value.
    pub(super) fn lookup_value(
        &self,
        id: EntityId,
        name: &str,
        accept: impl Fn(Kind) -> bool,
    ) -> Result<Value> {
        let Some(value_id) = self.symbols.get_value(name) else {
            return Err(self.link_error(id, "undefined value reference", name));
        };

        let entity = &self.tree[value_id];
        match (entity.kind, &entity.value) {
            (Some(kind), Some(value)) if accept(kind) => Ok(value.clone()),
            _ => Err(self.syntax_error(id, "value reference to bad type", name)),
        }
    }

    /// Find a registered INTEGER value
    pub(super) fn lookup_integer(&self, id: EntityId, name: &str) -> Result<i64> {
        match self.lookup_value(id, name, |kind| kind == Kind::Integer)? {
            Value::Integer(value) => Ok(value),
            _ => Err(self.syntax_error(id, "value reference to bad type", name)),
        }
    }

    /// Parse text that is entirely either an integer literal or a reference
    /// to a registered INTEGER value.
    pub(super) fn integer_or_reference(&self, id: EntityId, text: &str) -> Result<i64> {
        if let Some((digits, "")) = lexer::number(text) {
            return self.parse_int(id, digits);
        }

        match lexer::identifier(text) {
            Some((name, "")) => self.lookup_integer(id, name),
            _ => Err(self.syntax_error(id, "expected an integer", text)),
        }
    }

    /// Resolve an integer referenced from a constraint.  Local named
    /// numbers are checked first, then formal parameters, then global
    /// values.  A formal parameter is recorded as a referrer of the
    /// constraint slot and gives `None` until it is instantiated.
    pub(super) fn constraint_integer(
        &mut self,
        id: EntityId,
        name: &str,
        index: usize,
        slot: ConstraintSlot,
    ) -> Result<Option<i64>> {
        if self.tree[id].kind == Some(Kind::Integer) {
            if let Some(value) = self.tree[id].named_number(name) {
                return Ok(Some(value));
            }
        }

        if self.defer_to_parameter(id, name, PathStep::Constraint(index, slot), false) {
            return Ok(None);
        }

        self.lookup_integer(id, name).map(Some)
    }

    /// Resolve the object or value set of a table constraint.  Formal
    /// parameters are deferred, otherwise uppercase names are sets and
    /// lowercase names are values of a class.
    pub(super) fn constraint_set(
        &mut self,
        id: EntityId,
        name: &str,
        index: usize,
    ) -> Result<Option<EntityId>> {
        if self.defer_to_parameter(id, name, PathStep::Constraint(index, ConstraintSlot::Set), true)
        {
            return Ok(None);
        }

        let found = if lexer::is_lowercase_initial(name) {
            self.symbols.get_value(name)
        } else {
            self.symbols.get_set(name)
        };

        let Some(set) = found else {
            return Err(self.link_error(id, "undefined object set reference", name));
        };

        if self.tree[set].kind.map(Kind::category) != Some(Category::Class) {
            return Err(self.syntax_error(id, "object set reference to bad type", name));
        }

        Ok(Some(set))
    }

    /// If `name` is a formal parameter visible from `id`, record `last` as
    /// a new referrer of that parameter and return true.
    pub(super) fn defer_to_parameter(
        &mut self,
        id: EntityId,
        name: &str,
        last: PathStep,
        deep: bool,
    ) -> bool {
        let Some(owner) = self.tree.param_owner(id) else {
            return false;
        };
        let Some(mut steps) = self.tree.path_from(owner, id) else {
            return false;
        };
        steps.push(last);

        let params = self.tree[owner].params.as_mut();
        match params.and_then(|params| params.get_mut(name)) {
            Some(param) => {
                param.referrers.push(ReferrerPath::new(steps, deep));
                true
            }
            None => false,
        }
    }
}
