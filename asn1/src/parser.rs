mod constraint;
mod content;
mod error;
mod module;
mod parameterized;
mod reference;
mod set;
mod ty;
mod value;

use indexmap::IndexMap;

use crate::{
    analysis::{ObjectTree, SymbolTable},
    ast::{Content, Entity, EntityId, Kind, Mode},
    compiler::Features,
    diagnostic::Diagnostic,
};

pub use self::error::{ErrorKind, ParserError, Result};

/// Maximum nesting of definitions within one assignment
const MAX_DEPTH: usize = 100;

/// Recursive descent parser for a single top level assignment.  All new
/// entities are added to the tree, the symbol table is only read.
#[derive(Debug)]
pub(crate) struct Parser<'a> {
    /// Storage for every entity, including those of earlier assignments
    tree: &'a mut ObjectTree,

    /// Assignments registered so far
    symbols: &'a SymbolTable,

    /// The enabled features
    features: Features,

    /// Module name, used as the first segment of error paths
    module: &'a str,

    /// Current nesting depth of definitions
    depth: usize,

    /// Warnings found while parsing, kept only if the assignment succeeds
    warnings: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    /// Create a new parser adding to the given tree
    pub(crate) fn new(
        tree: &'a mut ObjectTree,
        symbols: &'a SymbolTable,
        features: Features,
        module: &'a str,
    ) -> Self {
        Self {
            tree,
            symbols,
            features,
            module,
            depth: 0,
            warnings: vec![],
        }
    }

    /// Take the warnings collected so far
    pub(crate) fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// Create a new entity within the content of `parent`.  Errors if the
    /// parent already has a member with the same name.
    fn add_child(&mut self, parent: EntityId, name: &str, mode: Mode) -> Result<EntityId> {
        if self.tree[parent].component(name).is_some() {
            return Err(self.syntax_error(parent, "duplicate component name", name));
        }

        let mut entity = Entity::new(name, mode);
        entity.parent = Some(parent);
        let child = self.tree.push(entity);

        match &mut self.tree[parent].content {
            Content::Components(components) => {
                components.insert(name.to_string(), child);
            }
            content => *content = Content::Components(IndexMap::from([(name.to_string(), child)])),
        }

        Ok(child)
    }

    /// The resolved kind of an entity, which must have been parsed already
    fn kind(&self, id: EntityId) -> Result<Kind> {
        self.tree[id]
            .kind
            .ok_or_else(|| self.syntax_error(id, "type not resolved", &self.tree[id].name))
    }

    /// Module qualified path of an entity
    fn path(&self, id: EntityId) -> String {
        format!("{}.{}", self.module, self.tree.full_name(id))
    }

    /// Error if any text is left over after parsing a construct
    fn expect_end(&self, id: EntityId, rest: &str, what: &str) -> Result {
        if rest.is_empty() {
            Ok(())
        } else {
            Err(self.syntax_error(id, format!("unexpected text after {what}"), rest))
        }
    }

    fn syntax_error(&self, id: EntityId, message: impl Into<String>, fragment: &str) -> ParserError {
        ParserError::Syntax {
            path: self.path(id),
            message: message.into(),
            fragment: fragment.to_string(),
        }
    }

    fn link_error(&self, id: EntityId, message: impl Into<String>, fragment: &str) -> ParserError {
        ParserError::Link {
            path: self.path(id),
            message: message.into(),
            fragment: fragment.to_string(),
        }
    }

    fn unsupported(&self, id: EntityId, message: impl Into<String>, fragment: &str) -> ParserError {
        ParserError::Unsupported {
            path: self.path(id),
            message: message.into(),
            fragment: fragment.to_string(),
        }
    }

    /// Parse an integer literal, which must fit in 64 bits
    fn parse_int(&self, id: EntityId, digits: &str) -> Result<i64> {
        digits
            .parse()
            .map_err(|_| self.unsupported(id, "integer out of range", digits))
    }
}
