mod helpers;

use asn1_objects::{AsnCompiler, BitString, ErrorKind, Kind, Mode, Value};
use rstest::{fixture, rstest};

use helpers::{add_all, compile, error_kind};

fn value_of(compiler: &AsnCompiler, name: &str) -> Value {
    let entity = compiler
        .lookup_value(name)
        .unwrap_or_else(|| panic!("value {name} is not registered"));
    assert_eq!(entity.mode, Mode::Value);
    entity.value.clone().expect("value slot is filled")
}

#[fixture]
fn definitions() -> AsnCompiler {
    compile(&[
        "Colour ::= ENUMERATED { red, green(5), blue }",
        "Level ::= INTEGER { low(1), high(9) }",
        "Flags ::= BIT STRING { b1(0), b2(1), b3(2) }",
        "limit INTEGER ::= 42",
    ])
}

// =============================================================================
// Simple values
// =============================================================================

#[rstest]
#[case("v NULL ::= NULL", Value::Null)]
#[case("v BOOLEAN ::= TRUE", Value::Boolean(true))]
#[case("v BOOLEAN ::= FALSE", Value::Boolean(false))]
#[case("v INTEGER ::= -17", Value::Integer(-17))]
#[case("v INTEGER ::= limit", Value::Integer(42))]
#[case("v Level ::= high", Value::Integer(9))]
#[case("v Level ::= 3", Value::Integer(3))]
#[case("v Colour ::= green", Value::Enumerated("green".into()))]
fn simple_values(mut definitions: AsnCompiler, #[case] text: &str, #[case] expected: Value) {
    add_all(&mut definitions, &[text]);
    assert_eq!(value_of(&definitions, "v"), expected);
}

#[rstest]
fn enumerated_through_reference(mut definitions: AsnCompiler) {
    add_all(
        &mut definitions,
        &["favourite Colour ::= blue", "copy Colour ::= favourite"],
    );
    assert_eq!(
        value_of(&definitions, "copy"),
        Value::Enumerated("blue".into())
    );
    assert_eq!(
        definitions.lookup_type("Colour").and_then(|ty| ty.named_number("blue")),
        Some(1)
    );
}

#[rstest]
fn enumerated_reference_must_name_an_item(mut definitions: AsnCompiler) {
    add_all(
        &mut definitions,
        &[
            "Other ::= ENUMERATED { purple, orange }",
            "shade Other ::= purple",
        ],
    );
    assert_eq!(
        error_kind(&mut definitions, "v Colour ::= shade"),
        ErrorKind::Syntax
    );
    assert_eq!(
        error_kind(&mut definitions, "w Colour ::= unknown"),
        ErrorKind::Link
    );
}

#[rstest]
#[case::wrong_kind("v BOOLEAN ::= limit", ErrorKind::Syntax)]
#[case::undefined("v INTEGER ::= missing", ErrorKind::Link)]
#[case::trailing_text("v INTEGER ::= 5 6", ErrorKind::Syntax)]
#[case::overflow("v INTEGER ::= 99999999999999999999", ErrorKind::Unsupported)]
#[case::sequence_value("v SEQUENCE { a INTEGER } ::= { a 1 }", ErrorKind::Unsupported)]
#[case::collection_value("v SEQUENCE OF INTEGER ::= { 1, 2 }", ErrorKind::Unsupported)]
#[case::real_value("v REAL ::= 1", ErrorKind::Unsupported)]
fn bad_values(mut definitions: AsnCompiler, #[case] text: &str, #[case] kind: ErrorKind) {
    assert_eq!(error_kind(&mut definitions, text), kind);
    assert!(definitions.lookup_value("v").is_none());
}

// =============================================================================
// Bit and octet strings
// =============================================================================

#[rstest]
fn named_bit_value(mut definitions: AsnCompiler) {
    add_all(&mut definitions, &["v Flags ::= { b1, b3 }"]);

    let Value::BitString(bits) = value_of(&definitions, "v") else {
        panic!("expected a BIT STRING value");
    };
    assert_eq!(bits.integer(), Some(5));
    assert_eq!(bits.len(), 3);
}

#[rstest]
fn empty_named_bit_value(mut definitions: AsnCompiler) {
    add_all(&mut definitions, &["v Flags ::= { }"]);
    assert_eq!(value_of(&definitions, "v"), Value::BitString(BitString::default()));
}

#[rstest]
#[case("v Flags ::= { b4 }")]
#[case("v BIT STRING ::= { b1 }")]
#[case("v BIT STRING ::= '012'B")]
#[case("v Flags ::= { b1, b3, b1 }")]
fn bad_bit_values(mut definitions: AsnCompiler, #[case] text: &str) {
    assert_eq!(error_kind(&mut definitions, text), ErrorKind::Syntax);
}

#[rstest]
#[case("v BIT STRING ::= '1011'B", &[true, false, true, true])]
#[case("v BIT STRING ::= 'A'H", &[true, false, true, false])]
#[case("v BIT STRING ::= '10 01'B", &[true, false, false, true])]
fn bit_string_literals(mut definitions: AsnCompiler, #[case] text: &str, #[case] bits: &[bool]) {
    add_all(&mut definitions, &[text]);
    assert_eq!(
        value_of(&definitions, "v"),
        Value::BitString(BitString::from_bits(bits.iter().copied()))
    );
}

#[rstest]
#[case("v OCTET STRING ::= '0A1F'H", &[0x0A, 0x1F])]
#[case("v OCTET STRING ::= '0A1'H", &[0x0A, 0x10])]
#[case("v OCTET STRING ::= '1'B", &[0x80])]
#[case("v OCTET STRING ::= ''H", &[])]
fn octet_string_literals(mut definitions: AsnCompiler, #[case] text: &str, #[case] bytes: &[u8]) {
    add_all(&mut definitions, &[text]);
    assert_eq!(value_of(&definitions, "v"), Value::OctetString(bytes.to_vec()));
}

#[test]
fn lowercase_hex_is_rejected() {
    let mut compiler = AsnCompiler::new();
    assert_eq!(
        error_kind(&mut compiler, "v OCTET STRING ::= '0a'H"),
        ErrorKind::Syntax
    );
}

#[test]
fn character_strings() {
    let compiler = compile(&[
        "greeting IA5String ::= \"hello \"\"world\"\"\"",
        "copy UTF8String ::= greeting",
        "raw OCTET STRING ::= 'FF'H",
        "rawCopy OCTET STRING ::= raw",
    ]);

    assert_eq!(
        value_of(&compiler, "greeting"),
        Value::String("hello \"world\"".into())
    );
    assert_eq!(
        value_of(&compiler, "copy"),
        Value::String("hello \"world\"".into())
    );
    assert_eq!(value_of(&compiler, "rawCopy"), Value::OctetString(vec![0xFF]));
}

#[test]
fn octet_strings_have_no_text_form() {
    let mut compiler = AsnCompiler::new();
    assert_eq!(
        error_kind(&mut compiler, "v OCTET STRING ::= \"text\""),
        ErrorKind::Syntax
    );
}

// =============================================================================
// Object identifiers
// =============================================================================

#[rstest]
#[case("v OBJECT IDENTIFIER ::= { 1 2 840 }", &[1, 2, 840])]
#[case("v OBJECT IDENTIFIER ::= { iso member-body(2) us(840) 113549 }", &[1, 2, 840, 113549])]
#[case("v OBJECT IDENTIFIER ::= { joint-iso-itu-t ds 4 }", &[2, 5, 4])]
#[case("v OBJECT IDENTIFIER ::= { itu-t recommendation }", &[0, 0])]
#[case("v OBJECT IDENTIFIER ::= { iso standard(limit) }", &[1, 42])]
#[case("v OBJECT IDENTIFIER ::= { base 7 1 }", &[1, 3, 6, 7, 1])]
#[case("v OBJECT IDENTIFIER ::= base", &[1, 3, 6])]
#[case("v RELATIVE-OID ::= { 5 6 }", &[5, 6])]
fn object_identifiers(mut definitions: AsnCompiler, #[case] text: &str, #[case] arcs: &[u64]) {
    add_all(&mut definitions, &["base OBJECT IDENTIFIER ::= { 1 3 6 }", text]);
    assert_eq!(
        value_of(&definitions, "v"),
        Value::ObjectIdentifier(arcs.to_vec())
    );
}

#[rstest]
#[case::unknown_arc("v OBJECT IDENTIFIER ::= { 1 unknown }", ErrorKind::Unsupported)]
#[case::arc_name_out_of_place("v OBJECT IDENTIFIER ::= { 1 2 iso }", ErrorKind::Unsupported)]
#[case::relative_arc_name("v RELATIVE-OID ::= { iso 2 }", ErrorKind::Unsupported)]
#[case::negative_arc("v OBJECT IDENTIFIER ::= { 1 -2 }", ErrorKind::Syntax)]
#[case::wrong_kind("v OBJECT IDENTIFIER ::= limit", ErrorKind::Syntax)]
fn bad_object_identifiers(
    mut definitions: AsnCompiler,
    #[case] text: &str,
    #[case] kind: ErrorKind,
) {
    assert_eq!(error_kind(&mut definitions, text), kind);
}

// =============================================================================
// Defaults
// =============================================================================

#[rstest]
fn default_values_use_the_component_type(mut definitions: AsnCompiler) {
    add_all(
        &mut definitions,
        &["S ::= SEQUENCE { level Level DEFAULT low, colour Colour DEFAULT red OPTIONAL }"],
    );

    let s = definitions.lookup_type("S").expect("registered");
    let level = definitions.entity(s.component("level").unwrap());
    assert_eq!(level.flags.default, Some(Value::Integer(1)));
    assert_eq!(level.value, None);
    assert_eq!(level.kind, Some(Kind::Integer));

    let colour = definitions.entity(s.component("colour").unwrap());
    assert_eq!(colour.flags.default, Some(Value::Enumerated("red".into())));
    assert!(colour.flags.optional);
}
