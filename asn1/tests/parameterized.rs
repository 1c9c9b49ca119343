mod helpers;

use asn1_objects::{AsnCompiler, ConstraintKind, Content, ErrorKind, Kind, Level, Mode, Value};
use rstest::{fixture, rstest};

use helpers::{add_all, compile, element, error_kind, member};

const CONTAINER: &str = "Container {INTEGER:ub, Element} ::= SEQUENCE (SIZE(1..ub)) OF Element";

#[fixture]
fn container() -> AsnCompiler {
    compile(&[CONTAINER])
}

fn size_bounds(compiler: &AsnCompiler, ty: &str, path: &[&str]) -> (Option<i64>, Option<i64>) {
    let entity = member(compiler, ty, path);
    match &entity.constraints[0].kind {
        ConstraintKind::ValueRange {
            lower,
            upper,
            size: true,
            ..
        } => (*lower, *upper),
        kind => panic!("{ty} has constraint {kind:?}"),
    }
}

// =============================================================================
// Formal parameters
// =============================================================================

#[rstest]
fn template_keeps_its_parameters(container: AsnCompiler) {
    let template = container.lookup_type("Container").expect("registered");
    let params = template.params.as_ref().expect("has formal parameters");
    assert_eq!(params.keys().collect::<Vec<_>>(), ["ub", "Element"]);

    let ub = &params["ub"];
    let governor = ub.governor.expect("ub is governed");
    assert_eq!(container.entity(governor).kind, Some(Kind::Integer));
    assert_eq!(ub.referrers.len(), 1);

    let element_param = &params["Element"];
    assert!(element_param.governor.is_none());
    assert_eq!(element_param.referrers.len(), 1);
    assert!(element_param.referrers[0].deep);

    assert_eq!(size_bounds(&container, "Container", &[]), (Some(1), None));
    assert_eq!(element(&container, "Container").kind, Some(Kind::Open));
}

#[rstest]
#[case::duplicate("T {INTEGER:x, BOOLEAN:x} ::= SEQUENCE { a INTEGER (0..x) }", ErrorKind::Syntax)]
#[case::empty_list("T {} ::= BOOLEAN", ErrorKind::Syntax)]
#[case::bad_name("T {INTEGER:1} ::= BOOLEAN", ErrorKind::Syntax)]
#[case::bad_governor("T {integer:x} ::= BOOLEAN", ErrorKind::Syntax)]
#[case::undefined_governor("T {Missing:x} ::= BOOLEAN", ErrorKind::Link)]
#[case::whole_definition("T {X} ::= X", ErrorKind::Unsupported)]
fn bad_formal_parameters(#[case] text: &str, #[case] kind: ErrorKind) {
    let mut compiler = AsnCompiler::new();
    assert_eq!(error_kind(&mut compiler, text), kind);
    assert!(compiler.lookup_type("T").is_none());
}

// =============================================================================
// Instantiation
// =============================================================================

#[rstest]
fn instantiate_collection(mut container: AsnCompiler) {
    add_all(&mut container, &["Names ::= Container {16, IA5String}"]);

    let names = container.lookup_type("Names").expect("registered");
    assert_eq!(names.kind, Some(Kind::SequenceOf));
    assert!(names.params.is_none());
    assert_eq!(size_bounds(&container, "Names", &[]), (Some(1), Some(16)));

    let item = element(&container, "Names");
    assert_eq!(item.kind, Some(Kind::Ia5));
    assert_eq!(item.name, "_item_");

    // the template itself is untouched
    assert_eq!(size_bounds(&container, "Container", &[]), (Some(1), None));
    assert_eq!(element(&container, "Container").kind, Some(Kind::Open));
}

#[rstest]
fn instantiate_with_value_reference(mut container: AsnCompiler) {
    add_all(
        &mut container,
        &[
            "maxNames INTEGER ::= 4",
            "Point ::= SEQUENCE { x INTEGER, y INTEGER }",
            "Points ::= Container {maxNames, Point}",
        ],
    );

    assert_eq!(size_bounds(&container, "Points", &[]), (Some(1), Some(4)));
    let item = element(&container, "Points");
    assert_eq!(item.kind, Some(Kind::Sequence));
    assert_eq!(item.root, ["x", "y"]);
}

#[rstest]
fn instantiations_are_independent(mut container: AsnCompiler) {
    add_all(
        &mut container,
        &[
            "Short ::= Container {2, BOOLEAN}",
            "Long ::= Container {200, INTEGER (0..9)}",
        ],
    );

    assert_eq!(size_bounds(&container, "Short", &[]), (Some(1), Some(2)));
    assert_eq!(size_bounds(&container, "Long", &[]), (Some(1), Some(200)));
    assert_eq!(element(&container, "Short").kind, Some(Kind::Boolean));

    let long = element(&container, "Long");
    assert_eq!(long.kind, Some(Kind::Integer));
    assert_eq!(long.constraints.len(), 1);
}

#[rstest]
fn instantiated_component(mut container: AsnCompiler) {
    add_all(
        &mut container,
        &["Message ::= SEQUENCE { id INTEGER, tags Container {8, UTF8String} OPTIONAL }"],
    );

    let tags = member(&container, "Message", &["tags"]);
    assert_eq!(tags.name, "tags");
    assert!(tags.flags.optional);
    assert_eq!(size_bounds(&container, "Message", &["tags"]), (Some(1), Some(8)));
}

#[rstest]
fn forwarded_parameters(mut container: AsnCompiler) {
    add_all(
        &mut container,
        &[
            "Wrapper {INTEGER:max} ::= SEQUENCE { items Container {max, BOOLEAN} }",
            "Concrete ::= Wrapper {8}",
        ],
    );

    let max = &container.lookup_type("Wrapper").unwrap().params.as_ref().unwrap()["max"];
    assert_eq!(max.referrers.len(), 1);
    assert_eq!(max.referrers[0].to_string(), "items.[constraint 0 Upper]");

    assert_eq!(size_bounds(&container, "Wrapper", &["items"]), (Some(1), None));
    assert_eq!(size_bounds(&container, "Concrete", &["items"]), (Some(1), Some(8)));

    let items = member(&container, "Concrete", &["items"]);
    let Content::Element(item) = items.content else {
        panic!("items is not a collection");
    };
    assert_eq!(container.entity(item).kind, Some(Kind::Boolean));
}

#[test]
fn unused_parameter_is_skipped() {
    let mut compiler = compile(&["T {INTEGER:n} ::= BOOLEAN", "U ::= T {5}"]);
    assert_eq!(compiler.lookup_type("U").unwrap().kind, Some(Kind::Boolean));

    let warnings = compiler.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, Level::Warning);
    assert_eq!(warnings[0].error_code, "W0001");
    assert_eq!(warnings[0].labels[0].fragment.as_deref(), Some("5"));
    assert!(compiler.take_warnings().is_empty());
}

#[test]
fn failed_instantiation_keeps_no_warnings() {
    let mut compiler = compile(&["T {INTEGER:n, INTEGER:m} ::= INTEGER (0..m)"]);
    assert_eq!(
        error_kind(&mut compiler, "U ::= T {1, TRUE}"),
        ErrorKind::Syntax
    );
    assert!(compiler.take_warnings().is_empty());
}

#[rstest]
#[case::missing_arguments("Bad ::= Container")]
#[case::too_few_arguments("Bad ::= Container {16}")]
#[case::too_many_arguments("Bad ::= Container {1, BOOLEAN, 2}")]
#[case::argument_of_wrong_kind("Bad ::= Container {TRUE, BOOLEAN}")]
#[case::trailing_argument_text("Bad ::= Container {16 17, BOOLEAN}")]
fn bad_actual_parameters(mut container: AsnCompiler, #[case] text: &str) {
    assert_eq!(error_kind(&mut container, text), ErrorKind::Syntax);
    assert!(container.lookup_type("Bad").is_none());
}

// =============================================================================
// Object set parameters
// =============================================================================

#[test]
fn object_set_argument() {
    let compiler = compile(&[
        "ERROR ::= CLASS { &code INTEGER UNIQUE } WITH SYNTAX { CODE &code }",
        "first ERROR ::= { CODE 1 }",
        "Errors ERROR ::= { first, ... }",
        "Invocation {ERROR:Set} ::= SEQUENCE { code ERROR.&code ({Set}) }",
        "Call ::= Invocation {{Errors}}",
    ]);

    let template = member(&compiler, "Invocation", &["code"]);
    assert_eq!(
        template.constraints[0].kind,
        ConstraintKind::TableConstraint { set: None, at: None }
    );

    let code = member(&compiler, "Call", &["code"]);
    let ConstraintKind::TableConstraint { set: Some(set), .. } = code.constraints[0].kind else {
        panic!("expected a resolved table constraint");
    };

    let set = compiler.entity(set);
    assert_eq!(set.mode, Mode::Set);
    assert_eq!(set.kind, Some(Kind::Class));
    let Some(Value::Set(members)) = &set.value else {
        panic!("expected an object set");
    };
    assert_eq!(members.root.len(), 1);
    assert_eq!(members.extension, None);
}
