use crate::{
    ast::{EntityId, Kind, Value},
    lexer,
    token::oid_arc,
};

use crate::parser::{Parser, Result};

impl<'a> Parser<'a> {
    /// ```bnf
    /// ObjIdValue ::= "{" Component+ "}" | valuereference
    /// Component ::= number | identifier | identifier "(" (number | valuereference) ")"
    /// ```
    ///
    /// ```asn1
    /// id-dsa OBJECT IDENTIFIER ::= { iso(1) member-body(2) us(840) x9-57(10040) 4 1 }
    /// ```
    pub(in crate::parser) fn oid_value<'t>(
        &self,
        id: EntityId,
        kind: Kind,
        text: &'t str,
    ) -> Result<(Value, &'t str)> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            let Some((name, rest)) = lexer::identifier(text) else {
                return Err(self.syntax_error(id, "invalid OID value", text));
            };
            let value = self.lookup_value(id, name, |found| found == kind)?;
            return Ok((value, rest));
        };

        let mut arcs = vec![];
        let mut text = inner;

        while !text.is_empty() {
            if let Some((digits, rest)) = lexer::number(text) {
                arcs.push(self.arc(id, digits)?);
                text = rest;
                continue;
            }

            let Some((name, rest)) = lexer::identifier(text) else {
                return Err(self.syntax_error(id, "invalid OID component", text));
            };

            if let (rest, Some(number)) = lexer::extract_parenth(rest) {
                arcs.push(self.arc_or_reference(id, number)?);
                text = rest;
                continue;
            }

            text = rest;
            if kind == Kind::ObjectIdentifier {
                if let Some(arc) = oid_arc(&arcs, name) {
                    arcs.push(arc);
                    continue;
                }
            }

            if arcs.is_empty() {
                if let Some(Value::ObjectIdentifier(prefix)) = self.global_oid(kind, name) {
                    arcs.extend(prefix);
                    continue;
                }
            }

            return Err(self.unsupported(id, "unknown named OID component", name));
        }

        Ok((Value::ObjectIdentifier(arcs), rest))
    }

    fn arc(&self, id: EntityId, digits: &str) -> Result<u64> {
        if digits.starts_with('-') {
            return Err(self.syntax_error(id, "negative OID component", digits));
        }

        digits
            .parse()
            .map_err(|_| self.unsupported(id, "integer out of range", digits))
    }

    /// The number of a `name(number)` component
    fn arc_or_reference(&self, id: EntityId, text: &str) -> Result<u64> {
        if let Some((digits, "")) = lexer::number(text) {
            return self.arc(id, digits);
        }

        let value = self.integer_or_reference(id, text)?;
        u64::try_from(value).map_err(|_| self.syntax_error(id, "negative OID component", text))
    }

    /// A registered value of the same kind, whose arcs start a new value
    fn global_oid(&self, kind: Kind, name: &str) -> Option<Value> {
        let value = self.symbols.get_value(name)?;
        let entity = &self.tree[value];
        if entity.kind != Some(kind) {
            return None;
        }

        entity.value.clone()
    }
}
