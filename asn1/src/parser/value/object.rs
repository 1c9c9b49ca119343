use indexmap::IndexMap;

use crate::{
    ast::{Category, Entity, EntityId, Kind, Mode, Value},
    lexer,
};

use crate::parser::{ty::builtin_type, Parser, Result};

/// Unparsed text of each field of an information object, in the order the
/// fields were found
type FieldText<'t> = IndexMap<String, &'t str>;

impl<'a> Parser<'a> {
    /// An information object, either written out in braces or referring to
    /// a registered object of a class.
    ///
    /// ```asn1
    /// unknownError ERROR ::= { CODE 1 PARAMETER UnknownParameter }
    /// ```
    pub(in crate::parser) fn class_value<'t>(
        &mut self,
        id: EntityId,
        text: &'t str,
    ) -> Result<(Value, &'t str)> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            let Some((name, rest)) = lexer::identifier(text) else {
                return Err(self.syntax_error(id, "invalid CLASS value", text));
            };
            let value = self.lookup_value(id, name, |kind| kind == Kind::Class)?;
            return Ok((value, rest));
        };

        let fields = if self.tree[id].syntax.is_some() {
            self.fields_by_syntax(id, inner)?
        } else {
            self.fields_by_name(id, inner)?
        };

        let mut values = IndexMap::new();
        for (field, text) in fields {
            let value = self.field_value(id, &field, text)?;
            values.insert(field, value);
        }

        Ok((Value::Class(values), rest))
    }

    /// Split the text of an object according to the class's WITH SYNTAX
    /// template.  Each field is given the text between its keyword and the
    /// next keyword found.  An optional group is skipped as a whole when
    /// one of its keywords is missing.
    fn fields_by_syntax<'t>(&self, id: EntityId, text: &'t str) -> Result<FieldText<'t>> {
        let syntax: Vec<_> = self.tree[id]
            .syntax
            .iter()
            .flatten()
            .map(|(keyword, field)| (keyword.as_str(), field.field.as_str(), field.group))
            .collect();

        let mut fields = FieldText::new();
        let mut pending: Option<&str> = None;
        let mut text = text;
        let mut index = 0;

        while let Some(&(keyword, field, group)) = syntax.get(index) {
            let Some((start, end)) = lexer::find_keyword(text, keyword) else {
                let Some(group) = group else {
                    return Err(self.syntax_error(
                        id,
                        format!("missing mandatory syntax {keyword}"),
                        text,
                    ));
                };

                while syntax.get(index).is_some_and(|&(_, _, g)| g == Some(group)) {
                    index += 1;
                }
                continue;
            };

            if let Some(previous) = pending {
                fields.insert(previous.to_string(), lexer::trim(&text[..start]));
            }
            pending = Some(field);
            text = &text[end..];
            index += 1;
        }

        match pending {
            Some(last) => {
                fields.insert(last.to_string(), lexer::trim(text));
            }
            None => self.expect_end(id, lexer::trim(text), "CLASS value")?,
        }

        Ok(fields)
    }

    /// Split the text of an object written with the field names of the
    /// class, `{ &code 1, &Type INTEGER }`.  Fields marked OPTIONAL or
    /// DEFAULT may be left out.
    fn fields_by_name<'t>(&self, id: EntityId, text: &'t str) -> Result<FieldText<'t>> {
        let names: Vec<(String, EntityId)> = self
            .tree
            .children(id)
            .into_iter()
            .map(|field| (self.tree[field].name.clone(), field))
            .collect();

        let mut fields = FieldText::new();
        let mut pending: Option<String> = None;
        let mut text = text;

        for (name, field) in names {
            let Some((start, end)) = lexer::find_keyword(text, &name) else {
                let flags = &self.tree[field].flags;
                if flags.optional || flags.default.is_some() {
                    continue;
                }
                return Err(self.syntax_error(
                    id,
                    format!("missing mandatory field {name}"),
                    text,
                ));
            };

            if let Some(previous) = pending.take() {
                fields.insert(previous, strip_separator(&text[..start]));
            }
            pending = Some(name);
            text = &text[end..];
        }

        match pending {
            Some(last) => {
                fields.insert(last, strip_separator(text));
            }
            None => self.expect_end(id, lexer::trim(text), "CLASS value")?,
        }

        Ok(fields)
    }

    /// Parse the text given to one field using the type of that field.
    /// Open type fields name a type instead of holding a value.
    fn field_value(&mut self, id: EntityId, name: &str, text: &str) -> Result<Value> {
        let Some(field) = self.tree[id].component(name) else {
            return Err(self.syntax_error(id, "undefined class field", name));
        };

        if self.kind(field)?.category() == Category::Open {
            return self.open_type(field, text);
        }

        let rest = self.value(field, text)?;
        self.expect_end(field, rest, "CLASS field value")?;

        self.tree[field]
            .value
            .take()
            .ok_or_else(|| self.syntax_error(field, "missing CLASS field value", text))
    }

    /// The type given to an open type field, either a registered type or a
    /// definition written in place
    fn open_type(&mut self, field: EntityId, text: &str) -> Result<Value> {
        if let Some((name, "")) = lexer::type_reference(text) {
            if builtin_type(text).is_none() {
                return Ok(Value::Type(self.lookup_type(field, name)?));
            }
        }

        let name = self.tree[field].name.clone();
        let ty = self.tree.push(Entity::new(name, Mode::Type));
        let rest = self.bare_definition(ty, text)?;
        self.expect_end(ty, rest, "open type")?;

        Ok(Value::Type(ty))
    }
}

/// Field values written by name are separated by commas
fn strip_separator(text: &str) -> &str {
    let text = lexer::trim(text);
    lexer::trim(text.strip_suffix(',').unwrap_or(text))
}
