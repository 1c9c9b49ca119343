use crate::{
    ast::{BitString, Content, EntityId, Kind, Value},
    lexer,
};

use crate::parser::{Parser, Result};

/// Named bits are summed into a 128 bit integer
const MAX_NAMED_BIT: i64 = 127;

impl<'a> Parser<'a> {
    /// ```bnf
    /// BitStringValue ::= bstring | hstring | valuereference
    ///                  | "{" (identifier ("," identifier)*)? "}"
    /// ```
    pub(in crate::parser) fn bit_string_value<'t>(
        &self,
        id: EntityId,
        text: &'t str,
    ) -> Result<(Value, &'t str)> {
        if let Some((body, radix, rest)) = lexer::quoted_literal(text) {
            return Ok((Value::BitString(self.quoted_bits(id, body, radix)?), rest));
        }

        if let Some((name, rest)) = lexer::identifier(text) {
            let value = self.lookup_value(id, name, |kind| kind == Kind::BitString)?;
            return Ok((value, rest));
        }

        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Err(self.syntax_error(id, "invalid BIT STRING value", text));
        };

        Ok((Value::BitString(self.named_bits(id, inner)?), rest))
    }

    /// The bits of a `'...'B` or `'...'H` literal, ignoring whitespace
    pub(in crate::parser) fn quoted_bits(
        &self,
        id: EntityId,
        body: &str,
        radix: char,
    ) -> Result<BitString> {
        let mut bits = vec![];

        for c in body.chars().filter(|&c| !lexer::is_whitespace(c)) {
            match (radix, c) {
                ('B', '0' | '1') => bits.push(c == '1'),
                ('H', c) if c.is_ascii_hexdigit() && !c.is_ascii_lowercase() => {
                    let nibble = c.to_digit(16).unwrap_or_default();
                    bits.extend((0..4).rev().map(|shift| nibble >> shift & 1 == 1));
                }
                _ => {
                    return Err(self.syntax_error(
                        id,
                        format!("invalid character {c:?} in string literal"),
                        body,
                    ))
                }
            }
        }

        Ok(BitString::from_bits(bits))
    }

    /// Named bits are set counting from the highest named position, so the
    /// value is as long as that position plus one.  Each name may appear
    /// once.
    fn named_bits(&self, id: EntityId, text: &str) -> Result<BitString> {
        let Content::Named(numbers) = &self.tree[id].content else {
            return Err(self.syntax_error(id, "BIT STRING has no named bits", text));
        };

        let names = lexer::split_top_level(text, ",");
        if names.is_empty() {
            return Ok(BitString::default());
        }

        let highest = numbers.values().copied().max().unwrap_or_default();
        if highest > MAX_NAMED_BIT {
            return Err(self.unsupported(id, "named bit position too large", text));
        }

        let mut value = 0u128;
        let mut seen = vec![];
        for name in names {
            let position = match lexer::identifier(name) {
                Some((name, "")) => numbers.get(name).copied(),
                _ => None,
            };
            let Some(position @ 0..) = position else {
                return Err(self.syntax_error(id, "invalid BIT STRING named bit", name));
            };

            if seen.contains(&name) {
                return Err(self.syntax_error(id, "duplicate named bit", name));
            }
            seen.push(name);

            value |= 1 << (highest - position);
        }

        let len = usize::try_from(highest).unwrap_or_default() + 1;
        Ok(BitString::from_integer(value, len))
    }
}
