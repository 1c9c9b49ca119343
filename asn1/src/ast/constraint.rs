use std::fmt::Display;

use super::EntityId;

/// A subtype constraint recorded on an entity.  Constraints are only stored,
/// values are never checked against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Source text of the constraint, without the parentheses
    pub text: String,

    pub kind: ConstraintKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `(v)` or `(SIZE(v))`.  The value is `None` while it is bound to a
    /// formal parameter that has not been instantiated yet.
    SingleValue {
        value: Option<i64>,
        size: bool,
        extensible: bool,
    },

    /// `(lb..ub)` or `(SIZE(lb..ub))`.  A missing bound is either `MIN`/`MAX`
    /// or a formal parameter that has not been instantiated yet.
    ValueRange {
        lower: Option<i64>,
        upper: Option<i64>,
        size: bool,
        extensible: bool,
    },

    /// `(CONTAINING Type)`
    Containing { name: String, ty: EntityId },

    /// `({ObjectSet}{@field})`, restricting a class field to the members of
    /// a set.  The set is `None` until a formal parameter naming it has been
    /// instantiated.
    TableConstraint {
        set: Option<EntityId>,
        at: Option<String>,
    },
}

impl ConstraintKind {
    /// Is this a single value, range or size constraint
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ConstraintKind::SingleValue { .. } | ConstraintKind::ValueRange { .. }
        )
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn bound(value: Option<i64>, open: &str) -> String {
            value.map_or_else(|| open.to_string(), |v| v.to_string())
        }

        let (bounds, size, extensible) = match &self.kind {
            ConstraintKind::SingleValue {
                value,
                size,
                extensible,
            } => (bound(*value, "?"), *size, *extensible),
            ConstraintKind::ValueRange {
                lower,
                upper,
                size,
                extensible,
            } => (
                format!("{}..{}", bound(*lower, "MIN"), bound(*upper, "MAX")),
                *size,
                *extensible,
            ),
            ConstraintKind::Containing { name, .. } => return write!(f, "(CONTAINING {name})"),
            ConstraintKind::TableConstraint { .. } => return write!(f, "({})", self.text),
        };

        let ext = if extensible { ", ..." } else { "" };
        if size {
            write!(f, "(SIZE({bounds}{ext}))")
        } else {
            write!(f, "({bounds}{ext})")
        }
    }
}
