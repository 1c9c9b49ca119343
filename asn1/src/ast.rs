//! The resolved object model produced by the parser.

mod constraint;
mod entity;
mod kind;
mod value;

pub use self::{
    constraint::{Constraint, ConstraintKind},
    entity::{
        Content, Entity, EntityId, ExtensionMember, Flags, Mode, Parameter, SyntaxField, Tag,
        TagClass, TagMode, TypeReference,
    },
    kind::{Category, Kind},
    value::{BitString, Value, ValueSet},
};
