use std::fmt::{Display, Write};

use indexmap::IndexMap;

use super::EntityId;

/// A literal value attached to an entity, a DEFAULT flag or a set element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),

    /// Name of the chosen enumeration item
    Enumerated(String),

    BitString(BitString),

    /// Raw bytes, produced by `'...'B` and `'...'H` literals
    OctetString(Vec<u8>),

    /// Text from a `"..."` literal of a character string type
    String(String),

    /// Arcs of an object identifier, in order
    ObjectIdentifier(Vec<u64>),

    /// Value of an information object, keyed by class field name
    Class(IndexMap<String, Value>),

    /// A registered type, as given to an open type class field
    Type(EntityId),

    Set(ValueSet),
}

/// Value of an object or value set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSet {
    /// Elements of the root of the set
    pub root: Vec<Value>,

    /// Elements after the extension marker.  `None` if the set has no marker,
    /// empty if it is extensible without any extension elements.
    pub extension: Option<Vec<Value>>,
}

/// A string of bits, most significant bit first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bytes: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Create a bit string from the given bits
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut result = BitString::default();
        for bit in bits {
            if result.len % 8 == 0 {
                result.bytes.push(0);
            }
            if bit {
                if let Some(last) = result.bytes.last_mut() {
                    *last |= 0x80 >> (result.len % 8);
                }
            }
            result.len += 1;
        }
        result
    }

    /// Create a bit string of `len` bits holding the integer `value`, where
    /// the last bit is the least significant one.
    pub fn from_integer(value: u128, len: usize) -> Self {
        Self::from_bits((0..len).map(|i| {
            let shift = len - 1 - i;
            shift < 128 && (value >> shift) & 1 == 1
        }))
    }

    /// Create a bit string from whole bytes
    pub fn from_bytes(bytes: Vec<u8>, len: usize) -> Self {
        debug_assert!(len <= bytes.len() * 8);
        BitString { bytes, len }
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The bits packed into bytes, with the final byte padded with zeros
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get a single bit, counting from the most significant end
    pub fn bit(&self, index: usize) -> bool {
        index < self.len && self.bytes[index / 8] & (0x80 >> (index % 8)) != 0
    }

    /// The bits read as an unsigned integer, if they fit
    pub fn integer(&self) -> Option<u128> {
        if self.len > 128 {
            return None;
        }

        Some((0..self.len).fold(0, |acc, i| acc << 1 | u128::from(self.bit(i))))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Enumerated(name) => f.write_str(name),
            Value::BitString(bits) => {
                f.write_char('\'')?;
                for i in 0..bits.len() {
                    f.write_char(if bits.bit(i) { '1' } else { '0' })?;
                }
                f.write_str("'B")
            }
            Value::OctetString(bytes) => {
                f.write_char('\'')?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'H")
            }
            Value::String(text) => write!(f, "\"{}\"", text.replace('"', "\"\"")),
            Value::ObjectIdentifier(arcs) => {
                f.write_char('{')?;
                for arc in arcs {
                    write!(f, " {arc}")?;
                }
                f.write_str(" }")
            }
            Value::Class(fields) => {
                f.write_char('{')?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i != 0 {
                        f.write_char(',')?;
                    }
                    write!(f, " {name} {value}")?;
                }
                f.write_str(" }")
            }
            Value::Type(id) => write!(f, "<type {}>", id.index()),
            Value::Set(set) => write!(f, "{set}"),
        }
    }
}

impl Display for ValueSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn alternatives(f: &mut std::fmt::Formatter<'_>, values: &[Value]) -> std::fmt::Result {
            for (i, value) in values.iter().enumerate() {
                if i != 0 {
                    f.write_str(" |")?;
                }
                write!(f, " {value}")?;
            }
            Ok(())
        }

        f.write_char('{')?;
        alternatives(f, &self.root)?;
        if let Some(extension) = &self.extension {
            if !self.root.is_empty() {
                f.write_char(',')?;
            }
            f.write_str(" ...")?;
            if !extension.is_empty() {
                f.write_char(',')?;
                alternatives(f, extension)?;
            }
        }
        f.write_str(" }")
    }
}
