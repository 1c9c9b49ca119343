//! Literal values, dispatched on the resolved kind of the entity that owns
//! the value slot.

mod bits;
mod object;
mod oid;

use crate::{
    ast::{Category, EntityId, Kind, Value},
    lexer,
};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// Parse a value of the entity's own type into its value slot
    pub(super) fn value<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let kind = self.kind(id)?;
        let text = lexer::trim(text);

        let (value, rest) = match kind.category() {
            Category::Null => self.null_value(id, text)?,
            Category::Boolean => self.boolean_value(id, text)?,
            Category::Integer => self.integer_value(id, text)?,
            Category::Enumerated => self.enumerated_value(id, text)?,
            Category::BitString => self.bit_string_value(id, text)?,
            Category::OctetString | Category::String => self.string_value(id, kind, text)?,
            Category::Oid => self.oid_value(id, kind, text)?,
            Category::Class => self.class_value(id, text)?,
            Category::Real
            | Category::Constructed
            | Category::Collection
            | Category::Open
            | Category::Other => {
                return Err(self.unsupported(
                    id,
                    format!("value notation for {} not supported", kind.keyword()),
                    text,
                ))
            }
        };

        self.tree[id].value = Some(value);
        Ok(rest)
    }

    fn null_value<'t>(&self, id: EntityId, text: &'t str) -> Result<(Value, &'t str)> {
        if let Some(rest) = lexer::keyword(text, "NULL") {
            return Ok((Value::Null, rest));
        }

        let (name, rest) = self.value_reference(id, text, "NULL")?;
        let value = self.lookup_value(id, name, |kind| kind == Kind::Null)?;
        Ok((value, rest))
    }

    fn boolean_value<'t>(&self, id: EntityId, text: &'t str) -> Result<(Value, &'t str)> {
        if let Some(rest) = lexer::keyword(text, "TRUE") {
            return Ok((Value::Boolean(true), rest));
        }
        if let Some(rest) = lexer::keyword(text, "FALSE") {
            return Ok((Value::Boolean(false), rest));
        }

        let (name, rest) = self.value_reference(id, text, "BOOLEAN")?;
        let value = self.lookup_value(id, name, |kind| kind == Kind::Boolean)?;
        Ok((value, rest))
    }

    /// A literal, one of the type's own named numbers or a global value
    fn integer_value<'t>(&self, id: EntityId, text: &'t str) -> Result<(Value, &'t str)> {
        if let Some((digits, rest)) = lexer::number(text) {
            return Ok((Value::Integer(self.parse_int(id, digits)?), rest));
        }

        let (name, rest) = self.value_reference(id, text, "INTEGER")?;
        let value = match self.tree[id].named_number(name) {
            Some(value) => value,
            None => self.lookup_integer(id, name)?,
        };

        Ok((Value::Integer(value), rest))
    }

    /// An enumeration item, given directly or through a global value that
    /// names one of this type's items
    fn enumerated_value<'t>(&self, id: EntityId, text: &'t str) -> Result<(Value, &'t str)> {
        let (name, rest) = self.value_reference(id, text, "ENUMERATED")?;
        if self.tree[id].named_number(name).is_some() {
            return Ok((Value::Enumerated(name.to_string()), rest));
        }

        match self.lookup_value(id, name, |kind| kind == Kind::Enumerated)? {
            Value::Enumerated(item) if self.tree[id].named_number(&item).is_some() => {
                Ok((Value::Enumerated(item), rest))
            }
            _ => Err(self.syntax_error(id, "ENUMERATED value reference mismatch", name)),
        }
    }

    /// `'...'B` and `'...'H` give raw bytes, `"..."` text for the character
    /// string kinds, otherwise a reference to any string value.  A literal
    /// that does not fill its last byte is padded with zeros on the right,
    /// never on the left, so `'0A1'H` is `0A 10` and `'1'B` is `80`.
    fn string_value<'t>(
        &self,
        id: EntityId,
        kind: Kind,
        text: &'t str,
    ) -> Result<(Value, &'t str)> {
        if let Some((body, radix, rest)) = lexer::quoted_literal(text) {
            let bits = self.quoted_bits(id, body, radix)?;
            return Ok((Value::OctetString(bits.bytes().to_vec()), rest));
        }

        if kind.is_string() {
            if let Some((value, rest)) = lexer::cstring(text) {
                return Ok((Value::String(value), rest));
            }
        }

        let (name, rest) = self.value_reference(id, text, kind.keyword())?;
        let value =
            self.lookup_value(id, name, |kind| kind == Kind::OctetString || kind.is_string())?;
        Ok((value, rest))
    }

    /// The leading value reference of a value that has no literal form
    fn value_reference<'t>(
        &self,
        id: EntityId,
        text: &'t str,
        what: &str,
    ) -> Result<(&'t str, &'t str)> {
        lexer::identifier(text)
            .ok_or_else(|| self.syntax_error(id, format!("invalid {what} value"), text))
    }
}
