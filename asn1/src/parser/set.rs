use crate::{
    ast::{EntityId, Value, ValueSet},
    lexer,
};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// ```bnf
    /// Set ::= "{" (Elements | "..." | Elements "," "..." | "..." "," Elements
    ///              | Elements "," "..." "," Elements) "}"
    /// Elements ::= Element ("|" Element)*
    /// ```
    pub(super) fn set<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Err(self.syntax_error(id, "invalid set", text));
        };

        let segments = lexer::split_top_level(inner, ",");
        let (root, extension) = match segments.as_slice() {
            ["..."] => (vec![], Some(vec![])),
            [root] => (self.set_elements(id, root)?, None),
            ["...", ext] => (vec![], Some(self.set_elements(id, ext)?)),
            [root, "..."] => (self.set_elements(id, root)?, Some(vec![])),
            [root, "...", ext] => (
                self.set_elements(id, root)?,
                Some(self.set_elements(id, ext)?),
            ),
            _ => return Err(self.syntax_error(id, "invalid set", inner)),
        };

        self.tree[id].value = Some(Value::Set(ValueSet { root, extension }));
        Ok(rest)
    }

    /// Elements separated by `|`.  Each is a registered set of the same
    /// type, whose members are all included, a registered value, or a value
    /// written in place.
    fn set_elements(&mut self, id: EntityId, text: &str) -> Result<Vec<Value>> {
        let mut values = vec![];

        for element in lexer::split_top_level(text, "|") {
            match lexer::reference(element) {
                Some((name, "")) if !lexer::is_lowercase_initial(name) => {
                    if matches!(name, "TRUE" | "FALSE" | "NULL") {
                        values.push(self.inline_element(id, element)?);
                    } else {
                        values.extend(self.set_reference(id, name)?);
                    }
                }
                Some((name, "")) if self.symbols.get_value(name).is_some() => {
                    values.push(self.value_element(id, name)?);
                }
                _ => values.push(self.inline_element(id, element)?),
            }
        }

        Ok(values)
    }

    /// Every member of a registered set, root first
    fn set_reference(&self, id: EntityId, name: &str) -> Result<Vec<Value>> {
        let Some(set) = self.symbols.get_set(name) else {
            return Err(self.link_error(id, "undefined set reference", name));
        };

        match &self.tree[set] {
            entity if entity.kind != self.tree[id].kind => {
                Err(self.syntax_error(id, "set reference to bad type", name))
            }
            entity => match &entity.value {
                Some(Value::Set(members)) => Ok(members
                    .root
                    .iter()
                    .chain(members.extension.iter().flatten())
                    .cloned()
                    .collect()),
                _ => Err(self.syntax_error(id, "set reference to bad type", name)),
            },
        }
    }

    /// A registered value of the same type as the set
    fn value_element(&self, id: EntityId, name: &str) -> Result<Value> {
        let kind = self.tree[id].kind;
        self.lookup_value(id, name, |found| Some(found) == kind)
    }

    /// Parse an element written in place, using the value slot of the set
    /// entity as scratch space
    fn inline_element(&mut self, id: EntityId, text: &str) -> Result<Value> {
        let rest = self.value(id, text)?;
        self.expect_end(id, rest, "set element")?;

        self.tree[id]
            .value
            .take()
            .ok_or_else(|| self.syntax_error(id, "invalid set element", text))
    }
}
