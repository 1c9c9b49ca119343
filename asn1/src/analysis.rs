//! Storage and name resolution for parsed entities

mod object_tree;
mod path;
mod symbol_table;

pub use self::{
    object_tree::{ClonePolicy, ObjectTree},
    path::{ConstraintSlot, PathStep, ReferrerPath},
    symbol_table::SymbolTable,
};
