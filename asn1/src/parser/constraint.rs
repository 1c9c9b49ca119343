use std::sync::Arc;

use crate::{
    analysis::ConstraintSlot,
    ast::{Category, Constraint, ConstraintKind, EntityId, Kind},
    lexer,
};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// Parse at most one parenthesised constraint.  Only value ranges, sizes,
    /// CONTAINING and table constraints are understood.
    pub(super) fn constraint<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_parenth(text) else {
            return Ok(text);
        };

        let kind = self.kind(id)?;
        if self.is_table_constraint(id, inner) {
            self.table_constraint(id, inner)?;
        } else {
            match kind.category() {
                Category::Integer => self.integer_constraint(id, inner, false, inner)?,
                Category::BitString
                | Category::OctetString
                | Category::String
                | Category::Collection => self.string_constraint(id, kind, inner)?,
                _ => return Err(self.unsupported(id, "constraint not supported", inner)),
            }
        }

        if rest.starts_with('(') {
            return Err(self.unsupported(id, "more than one constraint", rest));
        }

        Ok(rest)
    }

    /// A braced set is always a table constraint.  On a class field an
    /// unbraced reference is one too, unless it names an ordinary value,
    /// which makes it a single value constraint.
    fn is_table_constraint(&self, id: EntityId, inner: &str) -> bool {
        if inner.starts_with('{') {
            return true;
        }

        let class_field = self.tree[id]
            .reference
            .as_ref()
            .is_some_and(|reference| reference.field.is_some());
        if !class_field {
            return false;
        }

        match lexer::reference(inner) {
            Some((name, rest))
                if rest.is_empty() || rest.starts_with('{') || lexer::keyword(rest, "AT").is_some() =>
            {
                !lexer::is_lowercase_initial(name) || self.names_object(id, name)
            }
            _ => false,
        }
    }

    /// Whether a lowercase name is an information object, either a formal
    /// parameter governed by a class or a registered value of a class
    fn names_object(&self, id: EntityId, name: &str) -> bool {
        let is_class = |entity: EntityId| {
            self.tree[entity].kind.map(Kind::category) == Some(Category::Class)
        };

        let param = self
            .tree
            .param_owner(id)
            .and_then(|owner| self.tree[owner].params.as_ref()?.get(name));
        if let Some(param) = param {
            return param.governor.is_some_and(is_class);
        }

        self.symbols.get_value(name).is_some_and(is_class)
    }

    /// A size constraint written between SEQUENCE and OF, either as
    /// `(SIZE(..))` or as `SIZE(..)`
    pub(super) fn size_constraint<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        if let Some(rest) = lexer::keyword(text, "SIZE") {
            let (rest, Some(bounds)) = lexer::extract_parenth(rest) else {
                return Err(self.syntax_error(id, "expected SIZE bounds", rest));
            };
            self.integer_constraint(id, bounds, true, bounds)?;
            return Ok(rest);
        }

        let (rest, Some(inner)) = lexer::extract_parenth(text) else {
            return Err(self.syntax_error(id, "expected a SIZE constraint", text));
        };
        let Some(size) = lexer::keyword(inner, "SIZE") else {
            return Err(self.unsupported(id, "constraint not supported", inner));
        };

        self.size_body(id, size, inner)?;
        Ok(rest)
    }

    /// `SIZE(..)` or `CONTAINING Type`
    fn string_constraint(&mut self, id: EntityId, kind: Kind, inner: &str) -> Result {
        if let Some(size) = lexer::keyword(inner, "SIZE") {
            return self.size_body(id, size, inner);
        }

        let Some(contained) = lexer::keyword(inner, "CONTAINING") else {
            return Err(self.unsupported(id, "constraint not supported", inner));
        };

        if !matches!(kind, Kind::BitString | Kind::OctetString) {
            return Err(self.unsupported(id, "CONTAINING on a type other than a string", inner));
        }

        let Some((name, "")) = lexer::type_reference(contained) else {
            return Err(self.unsupported(id, "unsupported CONTAINING constraint", inner));
        };

        let ty = self.lookup_type(id, name)?;
        self.push_constraint(
            id,
            Constraint {
                text: inner.to_string(),
                kind: ConstraintKind::Containing {
                    name: name.to_string(),
                    ty,
                },
            },
        );

        Ok(())
    }

    /// The bounds following SIZE, with an optional `, ...` after them
    fn size_body(&mut self, id: EntityId, text: &str, whole: &str) -> Result {
        let (rest, Some(bounds)) = lexer::extract_parenth(text) else {
            return Err(self.syntax_error(id, "expected SIZE bounds", text));
        };

        self.integer_constraint(id, bounds, true, whole)?;

        if rest.is_empty() {
            return Ok(());
        }

        match rest.strip_prefix(',').map(lexer::trim_start) {
            Some(marker) if marker.starts_with("...") => {
                self.set_extensible(id);
                Ok(())
            }
            _ => Err(self.unsupported(id, "constraint not supported", whole)),
        }
    }

    /// ```bnf
    /// IntegerConstraint ::= Bound ("," "..." ...)?
    ///                     | (Bound | "MIN") ".." (Bound | "MAX") ("," "..." ...)?
    /// Bound ::= number | valuereference
    /// ```
    fn integer_constraint(&mut self, id: EntityId, inner: &str, size: bool, whole: &str) -> Result {
        if self.tree[id].has_integer_constraint() {
            return Err(self.unsupported(id, "more than one size or range constraint", whole));
        }

        let index = self.tree[id].constraints.len();
        let offsets = lexer::search_top_lvl_sep(inner, ",");
        let (bounds, extensible) = match offsets.first() {
            None => (inner, false),
            Some(&offset) if lexer::trim(&inner[offset + 1..]).starts_with("...") => {
                (lexer::trim(&inner[..offset]), true)
            }
            Some(_) => return Err(self.unsupported(id, "constraint not supported", whole)),
        };

        let kind = match bounds.split_once("..") {
            Some((lower, upper)) => {
                if lower.ends_with('<') || upper.starts_with('<') {
                    return Err(self.unsupported(id, "exclusive range bounds", whole));
                }
                ConstraintKind::ValueRange {
                    lower: self.bound(id, lower, Some("MIN"), index, ConstraintSlot::Lower)?,
                    upper: self.bound(id, upper, Some("MAX"), index, ConstraintSlot::Upper)?,
                    size,
                    extensible,
                }
            }
            None => ConstraintKind::SingleValue {
                value: self.bound(id, bounds, None, index, ConstraintSlot::Value)?,
                size,
                extensible,
            },
        };

        self.push_constraint(
            id,
            Constraint {
                text: whole.to_string(),
                kind,
            },
        );

        Ok(())
    }

    /// A single bound: a literal, `MIN`/`MAX` where allowed, or a reference
    fn bound(
        &mut self,
        id: EntityId,
        text: &str,
        open: Option<&str>,
        index: usize,
        slot: ConstraintSlot,
    ) -> Result<Option<i64>> {
        let text = lexer::trim(text);
        if open == Some(text) {
            return Ok(None);
        }

        if let Some((digits, "")) = lexer::number(text) {
            return self.parse_int(id, digits).map(Some);
        }

        match lexer::identifier(text) {
            Some((name, "")) => self.constraint_integer(id, name, index, slot),
            _ => Err(self.unsupported(id, "unsupported constraint bound", text)),
        }
    }

    /// ```bnf
    /// TableConstraint ::= ("{" reference "}" | reference) ("{" "@" field "}" | "AT" "&" field)?
    /// ```
    fn table_constraint(&mut self, id: EntityId, inner: &str) -> Result {
        let (rest, set) = match lexer::extract_curlybrack(inner) {
            (rest, Some(set)) => (rest, set),
            (_, None) => ("", inner),
        };

        let (name, rest) = match lexer::reference(set) {
            Some((name, after)) if after.is_empty() => (name, rest),
            // unbraced reference followed by the key
            Some((name, after)) if rest.is_empty() && set == inner => (name, after),
            _ => return Err(self.unsupported(id, "object set expressions not supported", inner)),
        };

        let at = if rest.is_empty() {
            None
        } else if let (rest, Some(key)) = lexer::extract_curlybrack(rest) {
            let Some(field) = key.strip_prefix('@') else {
                return Err(self.unsupported(id, "unsupported table constraint key", key));
            };
            self.expect_end(id, rest, "table constraint")?;
            Some(lexer::trim(field).to_string())
        } else if let Some(key) = lexer::keyword(rest, "AT") {
            let Some((field, "")) = lexer::field_reference(key) else {
                return Err(self.syntax_error(id, "invalid table constraint key", key));
            };
            Some(field.trim_start_matches('&').to_string())
        } else {
            return Err(self.unsupported(id, "unsupported table constraint", inner));
        };

        let index = self.tree[id].constraints.len();
        let set = self.constraint_set(id, name, index)?;
        self.push_constraint(
            id,
            Constraint {
                text: inner.to_string(),
                kind: ConstraintKind::TableConstraint { set, at },
            },
        );

        Ok(())
    }

    fn push_constraint(&mut self, id: EntityId, constraint: Constraint) {
        Arc::make_mut(&mut self.tree[id].constraints).push(constraint);
    }

    /// Mark the most recently added constraint as extensible
    fn set_extensible(&mut self, id: EntityId) {
        let constraints = Arc::make_mut(&mut self.tree[id].constraints);
        if let Some(Constraint {
            kind:
                ConstraintKind::SingleValue { extensible, .. }
                | ConstraintKind::ValueRange { extensible, .. },
            ..
        }) = constraints.last_mut()
        {
            *extensible = true;
        }
    }
}
