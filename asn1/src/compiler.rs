//! The primary interface to the ASN.1 parser, holding every parsed entity
//! and the symbol table of the module being read.

use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::{
    analysis::{ObjectTree, SymbolTable},
    ast::{Entity, EntityId},
    diagnostic::Diagnostic,
    parser::{Parser, Result},
    printer::EntityFormatter,
};

/// Store of all information relating to one ASN.1 module.  Assignments are
/// added one at a time, in an order where every reference is registered
/// before it is used.
#[derive(Debug, Clone, Default)]
pub struct AsnCompiler {
    /// Every entity created so far
    tree: ObjectTree,

    /// Registered assignments
    symbols: SymbolTable,

    /// Name of the module, used in error paths
    module: String,

    /// The enabled features.
    features: Features,

    /// Warnings of successfully added assignments, not yet taken
    warnings: Vec<Diagnostic>,
}

/// All features that can be enabled within the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Features {
    /// The module was declared with `EXTENSIBILITY IMPLIED`, so every
    /// SEQUENCE, SET, CHOICE and ENUMERATED is extensible.
    pub extensibility_implied: bool,
}

impl AsnCompiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the module name used in the path of errors
    pub fn with_module(self, name: impl Into<String>) -> Self {
        Self {
            module: name.into(),
            ..self
        }
    }

    /// Parse a single top level assignment and register it.  If parsing
    /// fails nothing is registered and every entity created while parsing
    /// is discarded.
    pub fn add_assignment(&mut self, text: &str) -> Result<EntityId> {
        let mark = self.tree.len();

        let mut parser = Parser::new(&mut self.tree, &self.symbols, self.features, &self.module);
        let result = parser.assignment(text);
        let warnings = parser.take_warnings();

        let id = match result {
            Ok(id) => id,
            Err(error) => {
                self.tree.truncate(mark);
                return Err(error);
            }
        };
        self.warnings.extend(warnings);

        let entity = &self.tree[id];
        debug!(
            name = %entity.name,
            mode = ?entity.mode,
            kind = ?entity.kind,
            "registered assignment"
        );

        if let Some(previous) = self.symbols.register(entity.mode, &entity.name, id) {
            warn!(
                name = %entity.name,
                previous = previous.index(),
                "assignment replaces an earlier one"
            );
        }

        Ok(id)
    }

    /// Take the warnings reported since the last call
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// Get a parsed entity
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.tree[id]
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn tree(&self) -> &ObjectTree {
        &self.tree
    }

    /// Find a registered type, class or parameterized type
    pub fn lookup_type(&self, name: &str) -> Option<&Entity> {
        self.symbols.get_type(name).map(|id| &self.tree[id])
    }

    /// Find a registered value or information object
    pub fn lookup_value(&self, name: &str) -> Option<&Entity> {
        self.symbols.get_value(name).map(|id| &self.tree[id])
    }

    /// Find a registered value set or object set
    pub fn lookup_set(&self, name: &str) -> Option<&Entity> {
        self.symbols.get_set(name).map(|id| &self.tree[id])
    }

    /// Render an entity and its content as an indented tree
    pub fn print_entity(&self, id: EntityId) -> String {
        EntityFormatter::new(&self.tree, id).to_string()
    }
}

impl Deref for AsnCompiler {
    type Target = Features;

    fn deref(&self) -> &Self::Target {
        &self.features
    }
}

impl DerefMut for AsnCompiler {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.features
    }
}
