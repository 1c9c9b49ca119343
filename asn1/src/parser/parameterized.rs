//! Formal parameters of assignments and their instantiation with actual
//! parameters.
//!
//! ```asn1
//! Container {INTEGER:ub, Element} ::= SEQUENCE (SIZE(1..ub)) OF Element
//! Names ::= Container {16, IA5String}
//! ```
//!
//! While the template is parsed, every use of a formal parameter is recorded
//! as a referrer path relative to the template.  Instantiating copies the
//! template and writes each actual parameter through those paths into the
//! copy.

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::{
    analysis::{ClonePolicy, ReferrerPath},
    ast::{Category, Entity, EntityId, Mode, Parameter},
    diagnostic::{Diagnostic, Label},
    lexer,
};

use super::{ty::builtin_type, Parser, Result};

impl<'a> Parser<'a> {
    /// ```bnf
    /// FormalParameters ::= "{" Parameter ("," Parameter)* "}"
    /// Parameter ::= (Governor ":")? reference
    /// ```
    ///
    /// The parameters are only installed on the entity once all of them
    /// have been parsed.
    pub(super) fn formal_parameters(&mut self, id: EntityId, text: &str) -> Result {
        let text = match lexer::extract_curlybrack(text) {
            (rest, Some(inner)) => {
                self.expect_end(id, rest, "formal parameters")?;
                inner
            }
            (_, None) => text,
        };

        let mut params = IndexMap::new();
        for item in lexer::split_top_level(text, ",") {
            let (governor, name) = match lexer::search_top_lvl_sep(item, ":").first() {
                Some(&offset) => (Some(lexer::trim(&item[..offset])), &item[offset + 1..]),
                None => (None, item),
            };

            let Some((name, "")) = lexer::reference(name) else {
                return Err(self.syntax_error(id, "invalid formal parameter", item));
            };
            if params.contains_key(name) {
                return Err(self.syntax_error(id, "duplicate formal parameter", name));
            }

            let governor = match governor {
                Some(governor) => Some(self.governor(id, name, governor)?),
                None => None,
            };

            params.insert(
                name.to_string(),
                Parameter {
                    governor,
                    referrers: vec![],
                },
            );
        }

        if params.is_empty() {
            return Err(self.syntax_error(id, "empty formal parameter list", text));
        }

        self.tree[id].params = Some(params);
        Ok(())
    }

    /// A built-in type governor is given its own entity, a type reference
    /// governor is the registered type itself
    fn governor(&mut self, id: EntityId, name: &str, text: &str) -> Result<EntityId> {
        if builtin_type(text).is_some() {
            let governor = self.tree.push(Entity::new(name, Mode::Type));
            let rest = self.bare_definition(governor, text)?;
            self.expect_end(governor, rest, "parameter governor")?;
            return Ok(governor);
        }

        match lexer::type_reference(text) {
            Some((reference, "")) => self.lookup_type(id, reference),
            _ => Err(self.syntax_error(id, "invalid parameter governor", text)),
        }
    }

    /// Instantiate the formal parameters of a referenced template, which
    /// has already been copied into `id`, with the actual parameters in
    /// `text`.
    pub(super) fn actual_parameters<'t>(
        &mut self,
        id: EntityId,
        params: IndexMap<String, Parameter>,
        text: &'t str,
    ) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Err(self.syntax_error(id, "missing actual parameters", text));
        };

        let args = lexer::split_top_level(inner, ",");
        if args.len() != params.len() {
            return Err(self.syntax_error(
                id,
                format!("expected {} actual parameters, found {}", params.len(), args.len()),
                inner,
            ));
        }

        for ((name, param), arg) in params.into_iter().zip(args) {
            if param.referrers.is_empty() {
                let path = self.path(id);
                warn!(%path, parameter = %name, "formal parameter is never used");
                self.warnings.push(
                    Diagnostic::warning("W0001")
                        .name("Unused formal parameter")
                        .label(
                            Label::new()
                                .message(format!("{name} is never used by the template in {path}"))
                                .fragment(arg),
                        ),
                );
                continue;
            }

            if self.forward_parameter(id, &param, arg) {
                continue;
            }

            let source = match param.governor {
                Some(governor) => self.governed_argument(governor, arg)?,
                None => self.type_argument(&name, arg)?,
            };

            for referrer in &param.referrers {
                if !self.tree.propagate(id, referrer, source) {
                    return Err(self.syntax_error(
                        id,
                        format!("actual parameter can not be used for {name}"),
                        arg,
                    ));
                }
            }
        }

        Ok(rest)
    }

    /// An actual parameter that is itself a formal parameter of the
    /// enclosing template is not resolved now.  The uses of the inner
    /// parameter become uses of the outer one, to be filled in when the
    /// enclosing template is instantiated.
    fn forward_parameter(&mut self, id: EntityId, param: &Parameter, arg: &str) -> bool {
        let arg = match lexer::extract_curlybrack(arg) {
            ("", Some(inner)) => inner,
            _ => arg,
        };
        let Some((name, "")) = lexer::reference(arg) else {
            return false;
        };

        let Some(owner) = self.tree.param_owner(id) else {
            return false;
        };
        let Some(prefix) = self.tree.path_from(owner, id) else {
            return false;
        };

        let referrers: Vec<ReferrerPath> = param
            .referrers
            .iter()
            .map(|referrer| referrer.prefixed(&prefix))
            .collect();

        let params = self.tree[owner].params.as_mut();
        let Some(outer) = params.and_then(|params| params.get_mut(name)) else {
            return false;
        };

        trace!(parameter = name, count = referrers.len(), "forwarding parameter");
        outer.referrers.extend(referrers);
        true
    }

    /// Parse an actual parameter with a governor into a scratch copy of the
    /// governor.  A parameter in braces is a set, unless values of the
    /// governor are themselves written in braces.
    fn governed_argument(&mut self, governor: EntityId, arg: &str) -> Result<EntityId> {
        let scratch = self.tree.clone_tree(governor, ClonePolicy::Light, None);
        self.tree[scratch].value = None;

        let braced_value = matches!(
            self.kind(scratch)?.category(),
            Category::Oid | Category::Class | Category::BitString
        );

        let rest = if arg.starts_with('{') && (!braced_value || is_set_argument(arg)) {
            self.tree[scratch].mode = Mode::Set;
            self.set(scratch, arg)?
        } else {
            self.tree[scratch].mode = Mode::Value;
            self.value(scratch, arg)?
        };
        self.expect_end(scratch, rest, "actual parameter")?;

        Ok(scratch)
    }

    /// Parse a type given as an actual parameter
    fn type_argument(&mut self, name: &str, arg: &str) -> Result<EntityId> {
        let ty = self.tree.push(Entity::new(name, Mode::Type));
        let rest = self.bare_definition(ty, arg)?;
        self.expect_end(ty, rest, "actual parameter")?;
        Ok(ty)
    }
}

/// A braced argument whose governor has braced values, such as a class, may
/// be either a value or a set.  It is a set if the braces hold only
/// references, `|` and the extension marker.
fn is_set_argument(arg: &str) -> bool {
    let Some(inner) = lexer::extract_curlybrack(arg).1 else {
        return false;
    };

    lexer::split_top_level(inner, ",").into_iter().all(|segment| {
        segment == "..."
            || lexer::split_top_level(segment, "|")
                .into_iter()
                .all(|element| matches!(lexer::reference(element), Some((_, ""))))
    })
}
