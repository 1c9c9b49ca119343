//! Indented text rendering of parsed entities, for inspection and debugging.

use std::fmt::{Display, Write};

use crate::{
    analysis::ObjectTree,
    ast::{Content, Entity, EntityId, Tag, TagClass, TagMode},
};

/// Renders an entity and everything within its content as a tree
pub(crate) struct EntityFormatter<'a> {
    pub(crate) tree: &'a ObjectTree,
    pub(crate) id: EntityId,
    pub(crate) prefix: String,
    pub(crate) child_prefix: String,
}

impl<'a> EntityFormatter<'a> {
    pub(crate) fn new(tree: &'a ObjectTree, id: EntityId) -> Self {
        EntityFormatter {
            tree,
            id,
            prefix: String::new(),
            child_prefix: String::new(),
        }
    }
}

impl Display for EntityFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entity = &self.tree[self.id];
        writeln!(f, "{}{}", self.prefix, Header(entity))?;

        let children = self.tree.children(self.id);
        let Some((last, head)) = children.split_last() else {
            return Ok(());
        };

        for &id in head {
            let fmt = EntityFormatter {
                tree: self.tree,
                id,
                prefix: self.child_prefix.clone() + "|-- ",
                child_prefix: self.child_prefix.clone() + "|   ",
            };

            write!(f, "{fmt}")?;
        }

        let fmt = EntityFormatter {
            tree: self.tree,
            id: *last,
            prefix: self.child_prefix.clone() + "`-- ",
            child_prefix: self.child_prefix.clone() + "    ",
        };

        write!(f, "{fmt}")
    }
}

/// Single line description of an entity, without its children
struct Header<'a>(&'a Entity);

impl Display for Header<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entity = self.0;

        write!(f, "{} ({:?}):", entity.name, entity.mode)?;
        if let Some(tag) = entity.tag {
            write!(f, " {}", TagDisplay(tag))?;
        }

        match entity.kind {
            Some(kind) => write!(f, " {}", kind.keyword())?,
            None => f.write_str(" ?")?,
        }

        if let Some(reference) = &entity.reference {
            write!(f, " = {}", reference.name)?;
            if let Some(field) = &reference.field {
                write!(f, ".{field}")?;
            }
        }

        if let Content::Named(numbers) = &entity.content {
            f.write_str(" {")?;
            for (i, (name, value)) in numbers.iter().enumerate() {
                if i != 0 {
                    f.write_str(",")?;
                }
                write!(f, " {name}({value})")?;
            }
            f.write_str(" }")?;
        }

        for constraint in entity.constraints.iter() {
            write!(f, " {constraint}")?;
        }

        if let Some(extension) = &entity.extension {
            f.write_str(" ...")?;
            if !extension.is_empty() {
                let names: Vec<_> = extension.iter().map(|member| member.name.as_str()).collect();
                write!(f, " [{}]", names.join(", "))?;
            }
        }

        if let Some(syntax) = &entity.syntax {
            f.write_str(" WITH SYNTAX {")?;
            let mut open = None;
            for (keyword, field) in syntax {
                if open.is_some() && open != field.group {
                    f.write_str(" ]")?;
                }
                if field.group.is_some() && open != field.group {
                    f.write_str(" [")?;
                }
                open = field.group;
                write!(f, " {keyword} {}", field.field)?;
            }
            if open.is_some() {
                f.write_str(" ]")?;
            }
            f.write_str(" }")?;
        }

        if let Some(params) = &entity.params {
            let names: Vec<_> = params.keys().map(String::as_str).collect();
            write!(f, " params {{{}}}", names.join(", "))?;
        }

        if entity.flags.unique {
            f.write_str(" UNIQUE")?;
        }
        if entity.flags.optional {
            f.write_str(" OPTIONAL")?;
        }
        if let Some(default) = &entity.flags.default {
            write!(f, " DEFAULT {default}")?;
        }

        if let Some(value) = &entity.value {
            write!(f, " ::= {value}")?;
        }

        Ok(())
    }
}

struct TagDisplay(Tag);

impl Display for TagDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('[')?;
        match self.0.class {
            TagClass::Universal => f.write_str("UNIVERSAL ")?,
            TagClass::Application => f.write_str("APPLICATION ")?,
            TagClass::Private => f.write_str("PRIVATE ")?,
            TagClass::ContextSpecific => {}
        }
        write!(f, "{}]", self.0.number)?;

        match self.0.mode {
            Some(TagMode::Implicit) => f.write_str(" IMPLICIT"),
            Some(TagMode::Explicit) => f.write_str(" EXPLICIT"),
            None => Ok(()),
        }
    }
}
