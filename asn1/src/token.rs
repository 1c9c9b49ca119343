//! Fixed keyword data for built-in types and well known object identifier
//! arcs.

use crate::ast::Kind;

/// Keywords that name a built-in type.  Multi word keywords are matched with
/// any amount of whitespace between the words.
pub(crate) const TYPE_KEYWORD_DATA: [(&str, Kind); 33] = [
    ("NULL", Kind::Null),
    ("BOOLEAN", Kind::Boolean),
    ("INTEGER", Kind::Integer),
    ("REAL", Kind::Real),
    ("ENUMERATED", Kind::Enumerated),
    ("BIT STRING", Kind::BitString),
    ("OCTET STRING", Kind::OctetString),
    ("OBJECT IDENTIFIER", Kind::ObjectIdentifier),
    ("RELATIVE-OID", Kind::RelativeOid),
    ("ObjectDescriptor", Kind::ObjectDescriptor),
    ("EXTERNAL", Kind::External),
    ("EMBEDDED PDV", Kind::EmbeddedPdv),
    ("CHARACTER STRING", Kind::CharacterString),
    ("BMPString", Kind::Bmp),
    ("GeneralString", Kind::General),
    ("GraphicString", Kind::Graphic),
    ("IA5String", Kind::Ia5),
    ("ISO646String", Kind::Iso646),
    ("NumericString", Kind::Numeric),
    ("PrintableString", Kind::Printable),
    ("TeletexString", Kind::Teletex),
    ("T61String", Kind::T61),
    ("UniversalString", Kind::Universal),
    ("UTF8String", Kind::Utf8),
    ("VideotexString", Kind::Videotex),
    ("VisibleString", Kind::Visible),
    ("UTCTime", Kind::UtcTime),
    ("GeneralizedTime", Kind::GeneralizedTime),
    ("CHOICE", Kind::Choice),
    ("SEQUENCE", Kind::Sequence),
    ("SET", Kind::Set),
    ("CLASS", Kind::Class),
    ("ANY", Kind::Any),
];

/// Arc names allowed as the first component of an object identifier
pub(crate) const OID_ROOT_ARCS: [(&str, u64); 5] = [
    ("itu-t", 0),
    ("ccitt", 0),
    ("iso", 1),
    ("joint-iso-itu-t", 2),
    ("joint-iso-ccitt", 2),
];

/// Arc names allowed as the second component, keyed by the first arc
pub(crate) const OID_SECOND_ARCS: [(u64, &str, u64); 15] = [
    (0, "recommendation", 0),
    (0, "question", 1),
    (0, "administration", 2),
    (0, "network-operator", 3),
    (0, "identified-organization", 4),
    (1, "standard", 0),
    (1, "registration-authority", 1),
    (1, "member-body", 2),
    (1, "identified-organization", 3),
    (2, "presentation", 0),
    (2, "asn1", 1),
    (2, "association-control", 2),
    (2, "ds", 5),
    (2, "country", 16),
    (2, "registration-procedures", 17),
];

/// Look up a named object identifier arc given the arcs already assembled
pub(crate) fn oid_arc(previous: &[u64], name: &str) -> Option<u64> {
    match previous {
        [] => OID_ROOT_ARCS
            .iter()
            .find(|(arc, _)| *arc == name)
            .map(|&(_, number)| number),
        [root] => OID_SECOND_ARCS
            .iter()
            .find(|(parent, arc, _)| parent == root && *arc == name)
            .map(|&(_, _, number)| number),
        _ => None,
    }
}
