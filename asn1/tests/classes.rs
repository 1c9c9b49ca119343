mod helpers;

use asn1_objects::{AsnCompiler, ErrorKind, Kind, SyntaxField, Value};
use indexmap::IndexMap;
use rstest::{fixture, rstest};

use helpers::{add_all, compile, error_kind, member};

const ERROR: &str = "ERROR ::= CLASS {
    &code     INTEGER UNIQUE,
    &Type     OPTIONAL,
    &priority INTEGER DEFAULT 0
} WITH SYNTAX { CODE &code [PARAMETER &Type] [PRIORITY &priority] }";

const OPERATION: &str = "OPERATION ::= CLASS {
    &id       INTEGER UNIQUE,
    &name     IA5String OPTIONAL,
    &Result
}";

#[fixture]
fn classes() -> AsnCompiler {
    compile(&["Payload ::= SEQUENCE { data OCTET STRING }", ERROR, OPERATION])
}

fn fields(compiler: &AsnCompiler, name: &str) -> IndexMap<String, Value> {
    match compiler.lookup_value(name).and_then(|v| v.value.clone()) {
        Some(Value::Class(fields)) => fields,
        value => panic!("{name} holds {value:?}"),
    }
}

// =============================================================================
// Class definitions
// =============================================================================

#[rstest]
fn class_fields(classes: AsnCompiler) {
    let error = classes.lookup_type("ERROR").expect("registered");
    assert_eq!(error.kind, Some(Kind::Class));
    assert_eq!(error.root, ["&code", "&Type", "&priority"]);

    let code = member(&classes, "ERROR", &["&code"]);
    assert_eq!(code.kind, Some(Kind::Integer));
    assert!(code.flags.unique);

    let ty = member(&classes, "ERROR", &["&Type"]);
    assert_eq!(ty.kind, Some(Kind::Open));
    assert!(ty.flags.optional);

    let priority = member(&classes, "ERROR", &["&priority"]);
    assert_eq!(priority.flags.default, Some(Value::Integer(0)));
}

#[rstest]
fn syntax_template(classes: AsnCompiler) {
    let error = classes.lookup_type("ERROR").expect("registered");
    let syntax = error.syntax.as_ref().expect("has a syntax");

    let expected: Vec<(&str, SyntaxField)> = vec![
        (
            "CODE",
            SyntaxField {
                field: "&code".into(),
                group: None,
            },
        ),
        (
            "PARAMETER",
            SyntaxField {
                field: "&Type".into(),
                group: Some(0),
            },
        ),
        (
            "PRIORITY",
            SyntaxField {
                field: "&priority".into(),
                group: Some(1),
            },
        ),
    ];
    let found: Vec<(&str, SyntaxField)> = syntax
        .iter()
        .map(|(keyword, field)| (keyword.as_str(), field.clone()))
        .collect();
    assert_eq!(found, expected);
    assert!(classes.lookup_type("OPERATION").unwrap().syntax.is_none());
}

#[test]
fn multi_word_syntax_keywords() {
    let compiler = compile(&[
        "C ::= CLASS { &id INTEGER } WITH SYNTAX { IDENTIFIED BY &id }",
        "c C ::= { IDENTIFIED BY 7 }",
    ]);
    assert!(compiler
        .lookup_type("C")
        .and_then(|c| c.syntax.as_ref())
        .is_some_and(|syntax| syntax.contains_key("IDENTIFIED BY")));
    assert_eq!(fields(&compiler, "c")["&id"], Value::Integer(7));
}

#[rstest]
#[case::nested_class("S ::= SEQUENCE { c CLASS { &id INTEGER } }", ErrorKind::Unsupported)]
#[case::nested_empty_class("S ::= SEQUENCE { c CLASS { } }", ErrorKind::Unsupported)]
#[case::nested_class_in_list("S ::= SEQUENCE OF CLASS { &id INTEGER }", ErrorKind::Unsupported)]
#[case::unknown_syntax_field("C ::= CLASS { &id INTEGER } WITH SYNTAX { ID &other }", ErrorKind::Syntax)]
#[case::dangling_syntax_word("C ::= CLASS { &id INTEGER } WITH SYNTAX { ID &id TRAILING }", ErrorKind::Syntax)]
#[case::unbalanced_group("C ::= CLASS { &id INTEGER } WITH SYNTAX { [ID &id }", ErrorKind::Syntax)]
#[case::nested_group("C ::= CLASS { &a INTEGER, &b INTEGER } WITH SYNTAX { [A &a [B &b]] }", ErrorKind::Unsupported)]
#[case::field_without_ampersand("C ::= CLASS { id INTEGER }", ErrorKind::Syntax)]
#[case::duplicate_field("C ::= CLASS { &id INTEGER, &id BOOLEAN }", ErrorKind::Syntax)]
fn bad_classes(#[case] text: &str, #[case] kind: ErrorKind) {
    let mut compiler = AsnCompiler::new();
    assert_eq!(error_kind(&mut compiler, text), kind);
}

#[rstest]
fn class_field_type_reference(mut classes: AsnCompiler) {
    add_all(&mut classes, &["Code ::= ERROR.&code (0..99)"]);

    let code = classes.lookup_type("Code").expect("registered");
    assert_eq!(code.kind, Some(Kind::Integer));
    assert!(!code.flags.unique);
    assert_eq!(code.constraints.len(), 1);

    let reference = code.reference.as_ref().expect("reference kept");
    assert_eq!(reference.name, "ERROR");
    assert_eq!(reference.field.as_deref(), Some("&code"));

    assert_eq!(
        error_kind(&mut classes, "Bad ::= ERROR.&missing"),
        ErrorKind::Syntax
    );
    assert_eq!(
        error_kind(&mut classes, "Bad ::= Payload.&data"),
        ErrorKind::Syntax
    );
}

// =============================================================================
// Information objects
// =============================================================================

#[rstest]
fn object_by_syntax(mut classes: AsnCompiler) {
    add_all(
        &mut classes,
        &[
            "minimal ERROR ::= { CODE 1 }",
            "full ERROR ::= { CODE 2 PARAMETER Payload PRIORITY 5 }",
            "skipped ERROR ::= { CODE 3 PRIORITY 9 }",
        ],
    );

    let minimal = fields(&classes, "minimal");
    assert_eq!(minimal.len(), 1);
    assert_eq!(minimal["&code"], Value::Integer(1));

    let payload = classes.symbols().get_type("Payload").expect("registered");
    let full = fields(&classes, "full");
    assert_eq!(full["&code"], Value::Integer(2));
    assert_eq!(full["&Type"], Value::Type(payload));
    assert_eq!(full["&priority"], Value::Integer(5));

    let skipped = fields(&classes, "skipped");
    assert_eq!(skipped["&priority"], Value::Integer(9));
    assert!(!skipped.contains_key("&Type"));
}

#[rstest]
fn object_with_inline_type(mut classes: AsnCompiler) {
    add_all(
        &mut classes,
        &["inline ERROR ::= { CODE 4 PARAMETER SEQUENCE { reason IA5String } }"],
    );

    let Value::Type(id) = fields(&classes, "inline")["&Type"] else {
        panic!("expected a type");
    };
    let ty = classes.entity(id);
    assert_eq!(ty.kind, Some(Kind::Sequence));
    assert_eq!(ty.root, ["reason"]);
}

#[rstest]
fn object_by_name(mut classes: AsnCompiler) {
    add_all(
        &mut classes,
        &[
            "lookup OPERATION ::= { &id 5, &Result BOOLEAN }",
            "named OPERATION ::= { &id 6, &name \"find\", &Result Payload }",
        ],
    );

    let lookup = fields(&classes, "lookup");
    assert_eq!(lookup.keys().collect::<Vec<_>>(), ["&id", "&Result"]);
    assert_eq!(lookup["&id"], Value::Integer(5));
    let Value::Type(result) = lookup["&Result"] else {
        panic!("expected a type");
    };
    assert_eq!(classes.entity(result).kind, Some(Kind::Boolean));

    let named = fields(&classes, "named");
    assert_eq!(named["&id"], Value::Integer(6));
    assert_eq!(named["&name"], Value::String("find".into()));
}

#[rstest]
fn object_reference(mut classes: AsnCompiler) {
    add_all(
        &mut classes,
        &["first ERROR ::= { CODE 1 }", "again ERROR ::= first"],
    );
    assert_eq!(fields(&classes, "again"), fields(&classes, "first"));
}

#[rstest]
#[case::missing_mandatory_keyword("e ERROR ::= { PARAMETER Payload }", ErrorKind::Syntax)]
#[case::missing_mandatory_field("o OPERATION ::= { &name \"x\" }", ErrorKind::Syntax)]
#[case::bad_field_value("e ERROR ::= { CODE TRUE }", ErrorKind::Syntax)]
#[case::undefined_open_type("e ERROR ::= { CODE 1 PARAMETER Missing }", ErrorKind::Link)]
#[case::unknown_object("e ERROR ::= missing", ErrorKind::Link)]
#[case::leftover_text("o OPERATION ::= { &id 1 2, &Result NULL }", ErrorKind::Syntax)]
fn bad_objects(mut classes: AsnCompiler, #[case] text: &str, #[case] kind: ErrorKind) {
    assert_eq!(error_kind(&mut classes, text), kind);
}
