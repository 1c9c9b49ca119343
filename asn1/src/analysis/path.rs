use std::fmt::Display;

/// One step from an entity to something it contains
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// A named component or class field
    Component(String),

    /// The element of SEQUENCE OF or SET OF
    Element,

    /// A slot within the constraint at the given index
    Constraint(usize, ConstraintSlot),
}

/// The part of a constraint a formal parameter stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSlot {
    /// The value of a single value constraint
    Value,
    Lower,
    Upper,

    /// The object set of a table constraint
    Set,
}

/// A recorded use of a formal parameter, relative to the entity that owns
/// the parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferrerPath {
    pub steps: Vec<PathStep>,

    /// Replace the whole destination entity with a copy of the actual
    /// parameter, rather than only its value
    pub deep: bool,
}

impl ReferrerPath {
    pub fn new(steps: Vec<PathStep>, deep: bool) -> Self {
        ReferrerPath { steps, deep }
    }

    /// The same destination, seen from an entity `prefix` steps further out
    pub fn prefixed(&self, prefix: &[PathStep]) -> Self {
        ReferrerPath {
            steps: prefix.iter().chain(&self.steps).cloned().collect(),
            deep: self.deep,
        }
    }
}

impl Display for PathStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathStep::Component(name) => f.write_str(name),
            PathStep::Element => f.write_str("[element]"),
            PathStep::Constraint(index, slot) => write!(f, "[constraint {index} {slot:?}]"),
        }
    }
}

impl Display for ReferrerPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i != 0 {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        if self.deep {
            f.write_str(" (deep)")?;
        }
        Ok(())
    }
}
