//! Shared setup for the parser integration tests.

#![allow(dead_code)]

use asn1_objects::{AsnCompiler, Entity, EntityId, ErrorKind};

/// Create a compiler for a module named `Test` and add every assignment,
/// panicking on the first one that fails.
pub fn compile(assignments: &[&str]) -> AsnCompiler {
    let mut compiler = AsnCompiler::new().with_module("Test");
    add_all(&mut compiler, assignments);
    compiler
}

/// Add every assignment to an existing compiler, panicking on failure.
pub fn add_all(compiler: &mut AsnCompiler, assignments: &[&str]) {
    for assignment in assignments {
        if let Err(err) = compiler.add_assignment(assignment) {
            panic!("failed to parse {assignment:?}: {err}");
        }
    }
}

/// Add an assignment that must fail, returning the kind of error.
pub fn error_kind(compiler: &mut AsnCompiler, assignment: &str) -> ErrorKind {
    match compiler.add_assignment(assignment) {
        Ok(_) => panic!("expected {assignment:?} to fail"),
        Err(err) => err.kind(),
    }
}

/// Get a child of a registered type by following component names.
pub fn member<'a>(compiler: &'a AsnCompiler, ty: &str, path: &[&str]) -> &'a Entity {
    let mut entity = compiler
        .lookup_type(ty)
        .unwrap_or_else(|| panic!("type {ty} is not registered"));

    for name in path {
        let id: EntityId = entity
            .component(name)
            .unwrap_or_else(|| panic!("{ty} has no member {name}"));
        entity = compiler.entity(id);
    }

    entity
}

/// Get the element template of a registered SEQUENCE OF or SET OF.
pub fn element<'a>(compiler: &'a AsnCompiler, ty: &str) -> &'a Entity {
    let entity = compiler.lookup_type(ty).expect("type is registered");
    match entity.content {
        asn1_objects::Content::Element(id) => compiler.entity(id),
        ref content => panic!("{ty} has no element: {content:?}"),
    }
}
