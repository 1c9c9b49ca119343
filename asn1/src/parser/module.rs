use crate::{
    ast::{Entity, EntityId, Mode},
    lexer,
};

use super::{Parser, ParserError, Result};

impl<'a> Parser<'a> {
    /// Parse a single top level assignment.  The shape of the text before
    /// `::=` decides what is assigned.
    ///
    /// ```bnf
    /// Assignment ::= typereference FormalParameters? "::=" Definition
    ///              | valuereference Definition "::=" Value
    ///              | typereference Definition "::=" Set
    /// ```
    pub(crate) fn assignment(&mut self, text: &str) -> Result<EntityId> {
        let text = lexer::trim(text);
        let Some(&offset) = lexer::search_top_lvl_sep(text, "::=").first() else {
            return Err(self.module_error("expected an assignment", text));
        };

        let head = lexer::trim(&text[..offset]);
        let body = lexer::trim(&text[offset + 3..]);

        let Some((name, rest)) = lexer::reference(head) else {
            return Err(self.module_error("invalid assignment name", head));
        };

        if lexer::is_lowercase_initial(name) {
            let id = self.tree.push(Entity::new(name, Mode::Value));
            let rest = self.bare_definition(id, rest)?;
            self.expect_end(id, rest, "value type")?;

            let rest = self.value(id, body)?;
            self.expect_end(id, rest, "value")?;
            return Ok(id);
        }

        if rest.is_empty() || rest.starts_with('{') {
            let id = self.tree.push(Entity::new(name, Mode::Type));
            if !rest.is_empty() {
                self.formal_parameters(id, rest)?;
            }

            let rest = self.bare_definition(id, body)?;
            self.expect_end(id, rest, "type definition")?;
            return Ok(id);
        }

        let id = self.tree.push(Entity::new(name, Mode::Set));
        let rest = self.bare_definition(id, rest)?;
        self.expect_end(id, rest, "set type")?;

        let rest = self.set(id, body)?;
        self.expect_end(id, rest, "set")?;
        Ok(id)
    }

    /// An error found before any entity has been created
    fn module_error(&self, message: &str, fragment: &str) -> ParserError {
        ParserError::Syntax {
            path: self.module.to_string(),
            message: message.to_string(),
            fragment: fragment.to_string(),
        }
    }
}
