//! Structural bodies of types: named numbers, enumerations, components,
//! collection elements and classes.

mod composite_ty;
mod named;
mod object;

use crate::ast::{Category, EntityId};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// Parse the content that follows a built-in type keyword
    pub(super) fn content<'t>(&mut self, id: EntityId, text: &'t str) -> Result<&'t str> {
        let Some(kind) = self.tree[id].kind else {
            return Ok(text);
        };

        match kind.category() {
            Category::Integer | Category::BitString => self.named_numbers(id, text),
            Category::Enumerated => self.enumerated(id, text),
            Category::Constructed => self.components(id, text),
            Category::Collection => self.element(id, text),
            Category::Class => self.class(id, text),
            _ => Ok(text),
        }
    }
}
