use indexmap::IndexMap;

use crate::{
    ast::{Content, EntityId, ExtensionMember},
    lexer,
};

use crate::parser::{Parser, Result};

impl<'a> Parser<'a> {
    /// Named numbers of an INTEGER or named bits of a BIT STRING, both
    /// optional.
    ///
    /// ```asn1
    /// Flags ::= BIT STRING { read(0), write(1), exec(maxBit) }
    /// ```
    pub(in crate::parser) fn named_numbers<'t>(
        &mut self,
        id: EntityId,
        text: &'t str,
    ) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Ok(text);
        };

        let mut numbers = IndexMap::new();
        for item in lexer::split_top_level(inner, ",") {
            let (name, value) = self.named_item(id, item)?;
            let Some(value) = value else {
                return Err(self.syntax_error(id, "named number without a value", item));
            };

            if numbers.insert(name.to_string(), value).is_some() {
                return Err(self.syntax_error(id, "duplicate named number", name));
            }
        }

        if numbers.is_empty() {
            return Err(self.syntax_error(id, "empty named number list", text));
        }

        self.tree[id].content = Content::Named(numbers);
        Ok(rest)
    }

    /// ```bnf
    /// Enumerations ::= "{" Item ("," Item)* ("," "..." ExceptionSpec? ("," Item)*)? "}"
    /// Item ::= identifier ("(" (number | valueref) ")")?
    /// ```
    ///
    /// Explicit numbers are reserved first.  Items without one are then
    /// given the smallest non-negative number not yet used, in declaration
    /// order.
    pub(in crate::parser) fn enumerated<'t>(
        &mut self,
        id: EntityId,
        text: &'t str,
    ) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Err(self.syntax_error(id, "expected enumeration items", text));
        };

        let mut declared: Vec<(&str, Option<i64>, bool)> = vec![];
        let mut used: Vec<i64> = vec![];
        let mut marker = false;

        for item in lexer::split_top_level(inner, ",") {
            if let Some(exception) = item.strip_prefix("...") {
                if marker {
                    return Err(self.syntax_error(id, "duplicate extension marker", item));
                }
                let exception = lexer::trim(exception);
                if !exception.is_empty() && !exception.starts_with('!') {
                    return Err(self.syntax_error(id, "invalid extension marker", item));
                }
                marker = true;
                continue;
            }

            let (name, value) = self.named_item(id, item)?;
            if declared.iter().any(|&(declared, _, _)| declared == name) {
                return Err(self.syntax_error(id, "duplicate enumeration item", name));
            }

            if let Some(value) = value {
                if used.contains(&value) {
                    return Err(self.syntax_error(id, "duplicate enumeration value", item));
                }
                used.push(value);
            }
            declared.push((name, value, marker));
        }

        let mut items = IndexMap::new();
        let mut extension: Option<Vec<ExtensionMember>> = marker.then(Vec::new);
        let mut next = 0;

        for (name, value, in_extension) in declared {
            let value = value.unwrap_or_else(|| {
                while used.contains(&next) {
                    next += 1;
                }
                used.push(next);
                next
            });
            items.insert(name.to_string(), value);

            if let Some(extension) = extension.as_mut().filter(|_| in_extension) {
                extension.push(ExtensionMember {
                    name: name.to_string(),
                    group: None,
                });
            }
        }

        if items.is_empty() {
            return Err(self.syntax_error(id, "empty enumeration", text));
        }

        if extension.is_none() && self.features.extensibility_implied {
            extension = Some(vec![]);
        }

        let entity = &mut self.tree[id];
        entity.content = Content::Named(items);
        entity.extension = extension;
        entity.rebuild_root();

        Ok(rest)
    }

    /// `name` or `name(number)` or `name(valueref)`
    fn named_item<'t>(&self, id: EntityId, item: &'t str) -> Result<(&'t str, Option<i64>)> {
        let Some((name, rest)) = lexer::identifier(item) else {
            return Err(self.syntax_error(id, "invalid named item", item));
        };

        if rest.is_empty() {
            return Ok((name, None));
        }

        match lexer::extract_parenth(rest) {
            ("", Some(number)) => Ok((name, Some(self.integer_or_reference(id, number)?))),
            _ => Err(self.syntax_error(id, "invalid named item", item)),
        }
    }
}
