use indexmap::IndexMap;

use crate::{
    analysis::{ClonePolicy, ReferrerPath},
    ast::{EntityId, Kind, Parameter, Tag, TagClass, TagMode, TypeReference},
    lexer,
    token::TYPE_KEYWORD_DATA,
};

use super::{ParserError, Parser, Result, MAX_DEPTH};

/// Formal parameters of a referenced type, still to be instantiated
pub(super) type PendingParameters = Option<IndexMap<String, Parameter>>;

impl<'a> Parser<'a> {
    /// Parse a component or class field definition, including the trailing
    /// OPTIONAL, DEFAULT and UNIQUE flags.
    ///
    /// ```bnf
    /// Definition ::= Tag? Type (Content | ActualParameters)? Constraint? Flags
    /// ```
    pub(super) fn definition<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let text = self.bare_definition(id, text)?;
        self.flags(id, text)
    }

    /// Parse a definition without flags, as used by assignments, element
    /// types and type arguments.
    pub(super) fn bare_definition<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        if self.depth >= MAX_DEPTH {
            return Err(ParserError::DepthExceeded {
                path: self.path(id),
                fragment: text.to_string(),
            });
        }

        self.depth += 1;
        let result = self.nested_definition(id, text);
        self.depth -= 1;
        result
    }

    fn nested_definition<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let text = self.tag(id, text)?;
        let (text, params) = self.ty(id, text)?;

        let text = match params {
            Some(params) => self.actual_parameters(id, params, text)?,
            None if self.tree[id].reference.is_none() => self.content(id, text)?,
            None => text,
        };

        self.constraint(id, text)
    }

    /// ```bnf
    /// Tag ::= "[" ("UNIVERSAL" | "APPLICATION" | "PRIVATE")? (number | valueref) "]"
    ///         ("IMPLICIT" | "EXPLICIT")?
    /// ```
    pub(super) fn tag<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_squarebrack(text) else {
            return Ok(text);
        };

        let (class, number) = [
            ("UNIVERSAL", TagClass::Universal),
            ("APPLICATION", TagClass::Application),
            ("PRIVATE", TagClass::Private),
        ]
        .into_iter()
        .find_map(|(kw, class)| Some((class, lexer::keyword(inner, kw)?)))
        .unwrap_or((TagClass::ContextSpecific, inner));

        let number = self.integer_or_reference(id, number)?;
        let Ok(number) = u64::try_from(number) else {
            return Err(self.syntax_error(id, "negative tag number", inner));
        };

        let (mode, rest) = if let Some(rest) = lexer::keyword(rest, "IMPLICIT") {
            (Some(TagMode::Implicit), rest)
        } else if let Some(rest) = lexer::keyword(rest, "EXPLICIT") {
            (Some(TagMode::Explicit), rest)
        } else {
            (None, rest)
        };

        self.tree[id].tag = Some(Tag {
            number,
            class,
            mode,
        });

        Ok(rest)
    }

    /// Resolve the type of an entity.  A built-in keyword sets the kind
    /// directly, while a reference copies the referenced definition.  If
    /// the referenced type is parameterized its formal parameters are
    /// returned so the caller can instantiate them.
    pub(super) fn ty<'t>(
        &mut self,
        id: EntityId,
        text: &'t str,
    ) -> Result<(&'t str, PendingParameters)> {
        if let Some((kind, rest)) = builtin_type(text) {
            let rest = match kind {
                Kind::Sequence | Kind::Set => self.collection_of(id, kind, rest)?,
                _ => {
                    self.tree[id].kind = Some(kind);
                    rest
                }
            };
            return Ok((rest, None));
        }

        let Some((name, rest)) = lexer::type_reference(text) else {
            return Err(self.syntax_error(id, "invalid type", text));
        };

        if let Some(rest) = rest.strip_prefix('.') {
            let Some((field, rest)) = lexer::field_reference(rest) else {
                return Err(self.syntax_error(id, "invalid class field reference", text));
            };

            let class = self.lookup_class(id, name)?;
            let Some(source) = self.tree[class].component(field) else {
                return Err(self.syntax_error(id, "undefined class field", field));
            };

            let reference = TypeReference {
                name: name.to_string(),
                field: Some(field.to_string()),
                target: source,
            };
            return Ok((rest, self.copy_referenced(id, reference)));
        }

        if self.type_parameter(id, name)? {
            return Ok((rest, None));
        }

        let source = self.lookup_type(id, name)?;
        let reference = TypeReference {
            name: name.to_string(),
            field: None,
            target: source,
        };
        Ok((rest, self.copy_referenced(id, reference)))
    }

    /// `SEQUENCE`, `SEQUENCE OF`, `SEQUENCE (SIZE(..)) OF` or
    /// `SEQUENCE SIZE(..) OF`, and the same for SET.  A size constraint
    /// belongs to the collection, not to its element.
    fn collection_of<'t>(&mut self, id: EntityId, kind: Kind, text: &'t str) -> Result<&'t str> {
        let collection = match kind {
            Kind::Sequence => Kind::SequenceOf,
            _ => Kind::SetOf,
        };

        if let Some(rest) = lexer::keyword(text, "OF") {
            self.tree[id].kind = Some(collection);
            return Ok(rest);
        }

        let sized = lexer::keyword(text, "SIZE").is_some()
            || matches!(lexer::extract_parenth(text), (_, Some(inner)) if lexer::keyword(inner, "SIZE").is_some());
        if !sized {
            self.tree[id].kind = Some(kind);
            return Ok(text);
        }

        self.tree[id].kind = Some(collection);
        let rest = self.size_constraint(id, text)?;
        lexer::keyword(rest, "OF")
            .ok_or_else(|| self.syntax_error(id, "expected OF after SIZE constraint", rest))
    }

    /// Copy the definition of a referenced type into the entity.  Types
    /// still carrying formal parameters are copied in full so their
    /// instantiation can not affect the template, other types share their
    /// constraints with the copy.
    fn copy_referenced(&mut self, id: EntityId, reference: TypeReference) -> PendingParameters {
        let source = reference.target;
        let params = self.tree[source]
            .params
            .clone()
            .filter(|params| !params.is_empty());

        let policy = if params.is_some() {
            ClonePolicy::Full
        } else {
            ClonePolicy::Const
        };

        self.tree.copy_type(id, source, policy);
        self.tree[id].reference = Some(reference);
        params
    }

    /// If `name` is a formal type parameter of an enclosing assignment, make
    /// the entity an open placeholder to be replaced on instantiation.
    fn type_parameter(&mut self, id: EntityId, name: &str) -> Result<bool> {
        let Some(owner) = self.tree.param_owner(id) else {
            return Ok(false);
        };

        let is_type_param = self.tree[owner]
            .params
            .as_ref()
            .and_then(|params| params.get(name))
            .is_some_and(|param| param.governor.is_none());
        if !is_type_param {
            return Ok(false);
        }

        if owner == id {
            return Err(self.unsupported(id, "type parameter used as the whole definition", name));
        }

        let Some(steps) = self.tree.path_from(owner, id) else {
            return Ok(false);
        };

        self.tree[id].kind = Some(Kind::Open);
        if let Some(param) = self.tree[owner]
            .params
            .as_mut()
            .and_then(|params| params.get_mut(name))
        {
            param.referrers.push(ReferrerPath::new(steps, true));
        }

        Ok(true)
    }

    /// Strip UNIQUE, OPTIONAL and `DEFAULT value` until none remain
    pub(super) fn flags<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let mut text = text;

        loop {
            if let Some(rest) = lexer::keyword(text, "UNIQUE") {
                let parent = self.tree[id].parent.map(|parent| self.tree[parent].kind);
                if parent != Some(Some(Kind::Class)) {
                    return Err(self.syntax_error(id, "UNIQUE outside of a CLASS", text));
                }
                self.tree[id].flags.unique = true;
                text = rest;
            } else if let Some(rest) = lexer::keyword(text, "OPTIONAL") {
                self.tree[id].flags.optional = true;
                text = rest;
            } else if let Some(rest) = lexer::keyword(text, "DEFAULT") {
                text = self.value(id, rest)?;
                let value = self.tree[id].value.take();
                self.tree[id].flags.default = value;
            } else {
                return Ok(text);
            }
        }
    }
}

/// Match one of the built-in type keywords
pub(super) fn builtin_type(text: &str) -> Option<(Kind, &str)> {
    TYPE_KEYWORD_DATA
        .iter()
        .find_map(|&(kw, kind)| Some((kind, lexer::keyword(text, kw)?)))
}
