use indexmap::IndexMap;

use crate::{
    ast::{Content, EntityId, Kind, Mode, SyntaxField},
    lexer,
};

use crate::parser::{Parser, Result};

impl<'a> Parser<'a> {
    /// Fields of an information object class, then its optional syntax
    ///
    /// ```asn1
    /// ERROR ::= CLASS {
    ///     &code    INTEGER UNIQUE,
    ///     &Type    OPTIONAL
    /// } WITH SYNTAX { CODE &code [PARAMETER &Type] }
    /// ```
    pub(in crate::parser) fn class<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        if self.tree[id].parent.is_some() {
            return Err(self.unsupported(id, "nested CLASS definition", text));
        }

        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Err(self.syntax_error(id, "expected class fields", text));
        };

        self.tree[id].content = Content::Components(Default::default());

        for item in lexer::split_top_level(inner, ",") {
            let Some((name, definition)) = lexer::field_reference(item) else {
                return Err(self.syntax_error(id, "invalid class field", item));
            };

            let field = self.add_child(id, name, Mode::Type)?;
            let rest = if lexer::is_lowercase_initial(name) {
                self.definition(field, definition)?
            } else {
                self.tree[field].kind = Some(Kind::Open);
                self.flags(field, definition)?
            };

            if !rest.is_empty() {
                return Err(self.unsupported(field, "unsupported class field definition", rest));
            }
        }

        self.tree[id].rebuild_root();
        self.with_syntax(id, rest)
    }

    /// `WITH SYNTAX { ... }`, if present
    fn with_syntax<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let Some(rest) = lexer::keyword(text, "WITH SYNTAX") else {
            return Ok(text);
        };

        let (rest, Some(inner)) = lexer::extract_curlybrack(rest) else {
            return Err(self.syntax_error(id, "expected a syntax template", rest));
        };

        let syntax = self.syntax_template(id, inner)?;
        self.tree[id].syntax = Some(syntax);

        Ok(rest)
    }

    /// Split a syntax template into the literal words preceding each field
    /// reference.  Fields inside `[ ... ]` are given the id of that
    /// optional group.
    fn syntax_template(&self, id: EntityId, text: &str) -> Result<IndexMap<String, SyntaxField>> {
        let mut fields = IndexMap::new();
        let mut keyword = String::new();
        let mut group = None;
        let mut next_group = 0;
        let mut text = lexer::trim(text);

        while !text.is_empty() {
            if let Some(rest) = text.strip_prefix('[') {
                if group.is_some() {
                    return Err(self.unsupported(id, "nested optional syntax group", text));
                }
                if !keyword.is_empty() {
                    return Err(self.syntax_error(id, "syntax keyword without a field", &keyword));
                }
                group = Some(next_group);
                next_group += 1;
                text = lexer::trim_start(rest);
            } else if let Some(rest) = text.strip_prefix(']') {
                if group.is_none() {
                    return Err(self.syntax_error(id, "unbalanced optional syntax group", text));
                }
                if !keyword.is_empty() {
                    return Err(self.syntax_error(id, "syntax keyword without a field", &keyword));
                }
                group = None;
                text = lexer::trim_start(rest);
            } else if let Some((field, rest)) = lexer::field_reference(text) {
                if keyword.is_empty() {
                    return Err(self.syntax_error(id, "syntax field without a keyword", field));
                }
                if self.tree[id].component(field).is_none() {
                    return Err(self.syntax_error(id, "syntax refers to an undefined field", field));
                }
                if fields.contains_key(&keyword) {
                    return Err(self.syntax_error(id, "duplicate syntax keyword", &keyword));
                }

                let field = SyntaxField {
                    field: field.to_string(),
                    group,
                };
                fields.insert(std::mem::take(&mut keyword), field);
                text = rest;
            } else {
                let end = text
                    .find(|c: char| lexer::is_whitespace(c) || matches!(c, '[' | ']' | '&'))
                    .unwrap_or(text.len());
                if end == 0 {
                    return Err(self.syntax_error(id, "invalid syntax template", text));
                }

                if !keyword.is_empty() {
                    keyword.push(' ');
                }
                keyword.push_str(&text[..end]);
                text = lexer::trim_start(&text[end..]);
            }
        }

        if !keyword.is_empty() {
            return Err(self.syntax_error(id, "syntax keyword without a field", &keyword));
        }
        if group.is_some() {
            return Err(self.syntax_error(id, "unterminated optional syntax group", text));
        }

        Ok(fields)
    }
}
