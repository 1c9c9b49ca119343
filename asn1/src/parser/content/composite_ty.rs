use crate::{
    analysis::ClonePolicy,
    ast::{Content, Entity, EntityId, ExtensionMember, Kind, Mode},
    lexer,
};

use crate::parser::{Parser, Result};

impl<'a> Parser<'a> {
    /// Components of SEQUENCE, SET and CHOICE
    ///
    /// ```bnf
    /// ComponentList ::= "{" Component ("," Component)* "}"
    /// Component ::= identifier Definition
    ///             | "COMPONENTS" "OF" typereference
    ///             | "..."
    ///             | "[[" (number ":")? Component ("," Component)* "]]"
    /// ```
    pub(in crate::parser) fn components<'t>(
        &mut self,
        id: EntityId,
        text: &'t str,
    ) -> Result<&'t str> {
        let (rest, Some(inner)) = lexer::extract_curlybrack(text) else {
            return Err(self.syntax_error(id, "expected a component list", text));
        };

        self.tree[id].content = Content::Components(Default::default());

        let mut extension: Option<Vec<ExtensionMember>> = None;
        let mut next_group = 0;

        for item in lexer::split_top_level(inner, ",") {
            if item == "..." {
                if extension.is_some() {
                    return Err(self.syntax_error(id, "duplicate extension marker", item));
                }
                extension = Some(vec![]);
            } else if let Some(group) = item.strip_prefix("[[") {
                let Some(extension) = &mut extension else {
                    return Err(self.syntax_error(
                        id,
                        "extension addition group outside of the extension",
                        item,
                    ));
                };
                let Some(group) = group.strip_suffix("]]") else {
                    return Err(self.syntax_error(id, "unterminated extension addition group", item));
                };

                let names = self.group_components(id, group, next_group)?;
                extension.extend(names.into_iter().map(|name| ExtensionMember {
                    name,
                    group: Some(next_group),
                }));
                next_group += 1;
            } else if let Some(reference) = lexer::keyword(item, "COMPONENTS OF") {
                if extension.is_some() {
                    return Err(self.syntax_error(id, "COMPONENTS OF within the extension", item));
                }
                self.components_of(id, reference)?;
            } else {
                let name = self.component(id, item, None)?;
                if let Some(extension) = &mut extension {
                    extension.push(ExtensionMember { name, group: None });
                }
            }
        }

        if extension.is_none() && self.features.extensibility_implied {
            extension = Some(vec![]);
        }

        let entity = &mut self.tree[id];
        entity.extension = extension;
        entity.rebuild_root();

        Ok(rest)
    }

    /// Members of one extension addition group, returning their names
    fn group_components(&mut self, id: EntityId, text: &str, group: usize) -> Result<Vec<String>> {
        // version number, `[[2: a, b]]`
        let text = match lexer::number(text) {
            Some((_, rest)) if rest.starts_with(':') => &rest[1..],
            _ => text,
        };

        let mut names = vec![];
        for item in lexer::split_top_level(text, ",") {
            if item.starts_with("...") {
                return Err(self.syntax_error(
                    id,
                    "extension marker within an extension addition group",
                    item,
                ));
            }
            if item.starts_with("[[") {
                return Err(self.syntax_error(id, "nested extension addition group", item));
            }
            if lexer::keyword(item, "COMPONENTS OF").is_some() {
                return Err(self.syntax_error(id, "COMPONENTS OF within the extension", item));
            }

            names.push(self.component(id, item, Some(group))?);
        }

        if names.is_empty() {
            return Err(self.syntax_error(id, "empty extension addition group", text));
        }

        Ok(names)
    }

    /// `identifier Definition`, returning the component name
    fn component(&mut self, id: EntityId, item: &str, group: Option<usize>) -> Result<String> {
        let Some((name, rest)) = lexer::identifier(item) else {
            return Err(self.syntax_error(id, "invalid component", item));
        };

        let child = self.add_child(id, name, Mode::Type)?;
        self.tree[child].group = group;

        let rest = self.definition(child, rest)?;
        self.expect_end(child, rest, "component definition")?;

        Ok(name.to_string())
    }

    /// Copy every member of a registered SEQUENCE into this one
    fn components_of(&mut self, id: EntityId, text: &str) -> Result {
        let Some((name, "")) = lexer::type_reference(text) else {
            return Err(self.syntax_error(id, "invalid COMPONENTS OF reference", text));
        };

        let source = self.lookup_type(id, name)?;
        if self.tree[source].kind != Some(Kind::Sequence) {
            return Err(self.syntax_error(id, "COMPONENTS OF reference to bad type", name));
        }

        let Content::Components(members) = self.tree[source].content.clone() else {
            return Ok(());
        };

        for (member, child) in members {
            if self.tree[id].component(&member).is_some() {
                return Err(self.syntax_error(id, "duplicate component name", &member));
            }

            let copy = self.tree.clone_tree(child, ClonePolicy::Const, Some(id));
            self.tree[copy].group = None;
            if let Content::Components(components) = &mut self.tree[id].content {
                components.insert(member, copy);
            }
        }

        Ok(())
    }

    /// The element of SEQUENCE OF and SET OF, which may be named
    pub(in crate::parser) fn element<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let (name, text) = match lexer::identifier(text) {
            Some((name, rest)) => (name, rest),
            None => ("_item_", text),
        };

        let mut entity = Entity::new(name, Mode::Type);
        entity.parent = Some(id);
        let element = self.tree.push(entity);
        self.tree[id].content = Content::Element(element);

        self.bare_definition(element, text)
    }
}
