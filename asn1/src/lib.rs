//! Semantic parser for ASN.1 assignments.
//!
//! Each top level assignment is parsed from text into an [`Entity`] stored
//! in an [`ObjectTree`], resolving references against the assignments that
//! were registered before it.
//!
//! ```
//! use asn1_objects::{AsnCompiler, Value};
//!
//! let mut compiler = AsnCompiler::new().with_module("Example");
//! compiler.add_assignment("Colour ::= ENUMERATED { red, green(5), blue }").unwrap();
//! let id = compiler.add_assignment("favourite Colour ::= blue").unwrap();
//!
//! assert_eq!(compiler.entity(id).value, Some(Value::Enumerated("blue".into())));
//! ```

#![forbid(unsafe_code)]

mod analysis;
mod ast;
mod compiler;
mod diagnostic;
mod lexer;
mod parser;
mod printer;
mod token;

pub use analysis::{ClonePolicy, ConstraintSlot, ObjectTree, PathStep, ReferrerPath, SymbolTable};
pub use ast::{
    BitString, Category, Constraint, ConstraintKind, Content, Entity, EntityId, ExtensionMember,
    Flags, Kind, Mode, Parameter, SyntaxField, Tag, TagClass, TagMode, TypeReference, Value,
    ValueSet,
};
pub use compiler::{AsnCompiler, Features};
pub use diagnostic::{Diagnostic, Label, Level};
pub use parser::{ErrorKind, ParserError, Result};
