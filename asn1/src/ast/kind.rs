use std::fmt::Display;

/// The resolved base type of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Real,
    Enumerated,
    BitString,
    OctetString,
    ObjectIdentifier,
    RelativeOid,
    ObjectDescriptor,
    External,
    EmbeddedPdv,
    CharacterString,

    // Restricted character strings
    Bmp,
    General,
    Graphic,
    Ia5,
    Iso646,
    Numeric,
    Printable,
    Teletex,
    T61,
    Universal,
    Utf8,
    Videotex,
    Visible,

    // Time types, encoded as character strings
    UtcTime,
    GeneralizedTime,

    Choice,
    Sequence,
    Set,
    SequenceOf,
    SetOf,

    /// Information object class
    Class,

    /// Open type, the type of a class type field such as `&Type`
    Open,

    /// Legacy `ANY` type
    Any,
}

/// Coarse grouping of kinds, used to select the parsing routine for the
/// content, constraints and values of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Null,
    Boolean,
    Integer,
    Real,
    Enumerated,
    BitString,
    OctetString,
    Oid,
    String,
    Constructed,
    Collection,
    Class,
    Open,
    Other,
}

impl Kind {
    /// Get the category that decides how this kind is parsed
    pub fn category(self) -> Category {
        use Kind::*;

        match self {
            Null => Category::Null,
            Boolean => Category::Boolean,
            Integer => Category::Integer,
            Real => Category::Real,
            Enumerated => Category::Enumerated,
            BitString => Category::BitString,
            OctetString => Category::OctetString,
            ObjectIdentifier | RelativeOid => Category::Oid,
            ObjectDescriptor | CharacterString | Bmp | General | Graphic | Ia5 | Iso646
            | Numeric | Printable | Teletex | T61 | Universal | Utf8 | Videotex | Visible
            | UtcTime | GeneralizedTime => Category::String,
            Choice | Sequence | Set => Category::Constructed,
            SequenceOf | SetOf => Category::Collection,
            Class => Category::Class,
            Open | Any => Category::Open,
            External | EmbeddedPdv => Category::Other,
        }
    }

    /// Is this one of the character string or time kinds
    pub fn is_string(self) -> bool {
        self.category() == Category::String
    }

    /// The ASN.1 keyword for this kind
    pub fn keyword(self) -> &'static str {
        use Kind::*;

        match self {
            Null => "NULL",
            Boolean => "BOOLEAN",
            Integer => "INTEGER",
            Real => "REAL",
            Enumerated => "ENUMERATED",
            BitString => "BIT STRING",
            OctetString => "OCTET STRING",
            ObjectIdentifier => "OBJECT IDENTIFIER",
            RelativeOid => "RELATIVE-OID",
            ObjectDescriptor => "ObjectDescriptor",
            External => "EXTERNAL",
            EmbeddedPdv => "EMBEDDED PDV",
            CharacterString => "CHARACTER STRING",
            Bmp => "BMPString",
            General => "GeneralString",
            Graphic => "GraphicString",
            Ia5 => "IA5String",
            Iso646 => "ISO646String",
            Numeric => "NumericString",
            Printable => "PrintableString",
            Teletex => "TeletexString",
            T61 => "T61String",
            Universal => "UniversalString",
            Utf8 => "UTF8String",
            Videotex => "VideotexString",
            Visible => "VisibleString",
            UtcTime => "UTCTime",
            GeneralizedTime => "GeneralizedTime",
            Choice => "CHOICE",
            Sequence => "SEQUENCE",
            Set => "SET",
            SequenceOf => "SEQUENCE OF",
            SetOf => "SET OF",
            Class => "CLASS",
            Open => "OPEN",
            Any => "ANY",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
