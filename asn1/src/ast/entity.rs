use std::sync::Arc;

use indexmap::IndexMap;

use super::{Constraint, Kind, Value};
use crate::analysis::ReferrerPath;

/// Index of an entity within an [`ObjectTree`](crate::ObjectTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Position of the entity within the tree's storage
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single ASN.1 type, value, set, class field or parameter occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    /// Identifier of the entity, unique among its siblings
    pub name: String,

    /// The grammar role this occurrence plays
    pub mode: Mode,

    /// Resolved base type, `None` until the type has been parsed
    pub kind: Option<Kind>,

    /// Set when the type was given by reference rather than a keyword
    pub reference: Option<TypeReference>,

    pub tag: Option<Tag>,

    pub content: Content,

    /// `None` if not extensible, otherwise the members after the extension
    /// marker, in declaration order
    pub extension: Option<Vec<ExtensionMember>>,

    /// Names of the content members that are not extensions
    pub root: Vec<String>,

    /// Extension addition group this entity was declared in
    pub group: Option<usize>,

    /// Constraints, shared between copies until one of them is modified
    pub constraints: Arc<Vec<Constraint>>,

    pub flags: Flags,

    /// WITH SYNTAX template of a class, keyed by the literal text that
    /// introduces each field
    pub syntax: Option<IndexMap<String, SyntaxField>>,

    /// Formal parameters of a parameterized assignment
    pub params: Option<IndexMap<String, Parameter>>,

    /// The entity whose content contains this one
    pub parent: Option<EntityId>,

    /// Literal value slot
    pub value: Option<Value>,
}

/// The grammar role of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Mode {
    #[default]
    Type,
    Value,
    Set,
}

/// Where the type of an entity was copied from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// Name of the referenced type or class
    pub name: String,

    /// The class field, for `CLASS.&field` references
    pub field: Option<String>,

    /// The referenced entity, as found in the symbol table
    pub target: EntityId,
}

/// `[class number] IMPLICIT|EXPLICIT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    pub number: u64,
    pub class: TagClass,

    /// `None` when neither IMPLICIT nor EXPLICIT was written
    pub mode: Option<TagMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagMode {
    Implicit,
    Explicit,
}

/// Structural content of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    None,

    /// Components of a constructed type, or fields of a class
    Components(IndexMap<String, EntityId>),

    /// The element template of SEQUENCE OF and SET OF
    Element(EntityId),

    /// Named numbers, named bits or enumeration indices
    Named(IndexMap<String, i64>),
}

/// A member of the extension region of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMember {
    pub name: String,

    /// The extension addition group, `None` for a member outside any group
    pub group: Option<usize>,
}

/// Modifiers of a component or class field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    pub unique: bool,
    pub optional: bool,
    pub default: Option<Value>,
}

/// One field of a WITH SYNTAX template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxField {
    /// Name of the class field, including the leading `&`
    pub field: String,

    /// Optional group the field belongs to, `None` if mandatory
    pub group: Option<usize>,
}

/// A formal parameter of a parameterized assignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameter {
    /// Type or class dictating how an actual parameter is parsed.  `None`
    /// for a type parameter.
    pub governor: Option<EntityId>,

    /// Every place within the assignment the parameter is used
    pub referrers: Vec<ReferrerPath>,
}

impl Entity {
    /// Create an empty entity
    pub fn new(name: impl Into<String>, mode: Mode) -> Self {
        Entity {
            name: name.into(),
            mode,
            ..Default::default()
        }
    }

    /// Get the id of a named component or class field
    pub fn component(&self, name: &str) -> Option<EntityId> {
        match &self.content {
            Content::Components(components) => components.get(name).copied(),
            _ => None,
        }
    }

    /// Get the value of a named number, named bit or enumeration item
    pub fn named_number(&self, name: &str) -> Option<i64> {
        match &self.content {
            Content::Named(numbers) => numbers.get(name).copied(),
            _ => None,
        }
    }

    /// Rebuild the root partition from the content and the extension list
    pub fn rebuild_root(&mut self) {
        let names: Vec<&String> = match &self.content {
            Content::Components(components) => components.keys().collect(),
            Content::Named(numbers) => numbers.keys().collect(),
            _ => vec![],
        };

        self.root = names
            .into_iter()
            .filter(|name| {
                !self
                    .extension
                    .iter()
                    .flatten()
                    .any(|member| &&member.name == name)
            })
            .cloned()
            .collect();
    }

    /// Does any constraint limit a size or value range
    pub fn has_integer_constraint(&self) -> bool {
        self.constraints.iter().any(|c| c.kind.is_integer())
    }
}

impl Flags {
    pub fn is_empty(&self) -> bool {
        !self.unique && !self.optional && self.default.is_none()
    }
}
