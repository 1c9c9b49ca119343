//! Arena storage for every entity created while parsing.
//!
//! Entities refer to each other through [`EntityId`] indices, both for the
//! ownership edges of their content and for the parent back reference, so
//! the tree never holds pointers into itself.

use std::{
    ops::{Index, IndexMut},
    sync::Arc,
};

use tracing::trace;

use super::path::{ConstraintSlot, PathStep, ReferrerPath};
use crate::ast::{ConstraintKind, Content, Entity, EntityId, Kind, Value};

/// Storage for entities, indexed by [`EntityId`]
#[derive(Debug, Clone, Default)]
pub struct ObjectTree {
    entities: Vec<Entity>,
}

/// How much of an entity is kept when it is copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClonePolicy {
    /// Independent copy of everything, including formal parameters and an
    /// unshared constraint list
    Full,

    /// Copy without formal parameters, keeping literal values
    Light,

    /// Copy without formal parameters or values, sharing the constraint list
    Const,
}

impl ObjectTree {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of entities stored
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get an entity if the id is valid for this tree
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    /// Iterate over all stored entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityId(i), entity))
    }

    /// Store a new entity
    pub(crate) fn push(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len());
        self.entities.push(entity);
        id
    }

    /// Discard every entity created after the tree had `len` entries
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entities.truncate(len);
    }

    /// Child entities of an entity, in declaration order
    pub fn children(&self, id: EntityId) -> Vec<EntityId> {
        match &self[id].content {
            Content::Components(components) => components.values().copied().collect(),
            Content::Element(element) => vec![*element],
            Content::None | Content::Named(_) => vec![],
        }
    }

    /// The entity and all of its parents, innermost first
    pub fn ancestors(&self, id: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        std::iter::successors(Some(id), |&id| self[id].parent)
    }

    /// Dotted path of names from the outermost parent to this entity
    pub fn full_name(&self, id: EntityId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|id| self[id].name.as_str())
            .collect();
        names.reverse();
        names.join(".")
    }

    /// The nearest entity, starting from this one and walking outwards,
    /// that declares formal parameters
    pub fn param_owner(&self, id: EntityId) -> Option<EntityId> {
        self.ancestors(id).find(|&id| self[id].params.is_some())
    }

    /// The steps leading from `ancestor` down to `id`, or `None` if `id` is
    /// not contained within `ancestor`
    pub fn path_from(&self, ancestor: EntityId, id: EntityId) -> Option<Vec<PathStep>> {
        let mut steps = vec![];
        let mut current = id;

        while current != ancestor {
            let parent = self[current].parent?;
            let step = match &self[parent].content {
                Content::Element(element) if *element == current => PathStep::Element,
                Content::Components(components) => {
                    let (name, _) = components.iter().find(|(_, &child)| child == current)?;
                    PathStep::Component(name.clone())
                }
                _ => return None,
            };
            steps.push(step);
            current = parent;
        }

        steps.reverse();
        Some(steps)
    }

    /// Follow a single component or element step
    pub fn step(&self, id: EntityId, step: &PathStep) -> Option<EntityId> {
        match (step, &self[id].content) {
            (PathStep::Component(name), Content::Components(components)) => {
                components.get(name).copied()
            }
            (PathStep::Element, Content::Element(element)) => Some(*element),
            _ => None,
        }
    }

    /// Copy an entity and everything within its content, placing the copy
    /// under `parent`.
    pub fn clone_tree(
        &mut self,
        id: EntityId,
        policy: ClonePolicy,
        parent: Option<EntityId>,
    ) -> EntityId {
        let mut entity = self[id].clone();
        entity.parent = parent;

        match policy {
            ClonePolicy::Full => entity.constraints = Arc::new(entity.constraints.to_vec()),
            ClonePolicy::Light => entity.params = None,
            ClonePolicy::Const => {
                entity.params = None;
                entity.value = None;
            }
        }

        let copy = self.push(entity);
        let content = self.clone_content(copy, policy);
        self[copy].content = content;

        trace!(from = id.0, to = copy.0, ?policy, "cloned entity");
        copy
    }

    /// Copy the type definition of `source` into `target`: its kind,
    /// content, extension, constraints and syntax.  The name, tag, flags and
    /// parent of `target` are left alone.
    pub fn copy_type(&mut self, target: EntityId, source: EntityId, policy: ClonePolicy) {
        let src = &self[source];
        let kind = src.kind;
        let extension = src.extension.clone();
        let root = src.root.clone();
        let syntax = src.syntax.clone();
        let constraints = match policy {
            ClonePolicy::Full => Arc::new(src.constraints.to_vec()),
            ClonePolicy::Light | ClonePolicy::Const => Arc::clone(&src.constraints),
        };
        let content = src.content.clone();

        let dst = &mut self[target];
        dst.kind = kind;
        dst.extension = extension;
        dst.root = root;
        dst.syntax = syntax;
        dst.constraints = constraints;
        dst.content = content;

        let content = self.clone_content(target, policy);
        let dst = &mut self[target];
        dst.content = content;
        if matches!(kind, Some(Kind::Sequence | Kind::Set | Kind::Class)) {
            dst.rebuild_root();
        }
    }

    /// Write an instantiated actual parameter to one place it is used.
    ///
    /// The referrer is followed from `owner`.  A deep referrer replaces the
    /// entity at its end with a copy of `source`, keeping the name, flags,
    /// group and mode of the entity it replaces, and its tag if it had one.
    /// Otherwise only the value of `source` is copied, either into the value
    /// slot of the entity or into the constraint slot the referrer names.
    ///
    /// Returns `false` if the referrer does not lead anywhere or the value
    /// does not fit the slot.
    pub fn propagate(
        &mut self,
        owner: EntityId,
        referrer: &ReferrerPath,
        source: EntityId,
    ) -> bool {
        let Some((last, steps)) = referrer.steps.split_last() else {
            return false;
        };

        let mut current = owner;
        for step in steps {
            match self.step(current, step) {
                Some(next) => current = next,
                None => return false,
            }
        }

        trace!(owner = owner.0, %referrer, source = source.0, "propagating parameter");

        if let PathStep::Constraint(index, slot) = last {
            return self.propagate_constraint(current, *index, *slot, source);
        }

        let Some(target) = self.step(current, last) else {
            return false;
        };

        if !referrer.deep {
            self[target].value = self[source].value.clone();
            return true;
        }

        let copy = self.clone_tree(source, ClonePolicy::Light, Some(current));
        let old = &self[target];
        let (name, flags, group, mode, tag) = (
            old.name.clone(),
            old.flags.clone(),
            old.group,
            old.mode,
            old.tag,
        );

        let entity = &mut self[copy];
        entity.name = name;
        entity.flags = flags;
        entity.group = group;
        entity.mode = mode;
        entity.tag = tag.or(entity.tag);

        match (&mut self[current].content, last) {
            (Content::Components(components), PathStep::Component(key)) => {
                if let Some(child) = components.get_mut(key) {
                    *child = copy;
                }
            }
            (Content::Element(element), PathStep::Element) => *element = copy,
            _ => return false,
        }

        true
    }

    fn propagate_constraint(
        &mut self,
        id: EntityId,
        index: usize,
        slot: ConstraintSlot,
        source: EntityId,
    ) -> bool {
        let integer = match &self[source].value {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        };

        let constraints = Arc::make_mut(&mut self[id].constraints);
        let Some(constraint) = constraints.get_mut(index) else {
            return false;
        };

        match (&mut constraint.kind, slot) {
            (ConstraintKind::SingleValue { value, .. }, ConstraintSlot::Value) => *value = integer,
            (ConstraintKind::ValueRange { lower, .. }, ConstraintSlot::Lower) => *lower = integer,
            (ConstraintKind::ValueRange { upper, .. }, ConstraintSlot::Upper) => *upper = integer,
            (ConstraintKind::TableConstraint { set, .. }, ConstraintSlot::Set) => {
                *set = Some(source);
                return true;
            }
            _ => return false,
        }

        integer.is_some()
    }

    /// Replace every child in the content of `owner` with a copy owned by it
    fn clone_content(&mut self, owner: EntityId, policy: ClonePolicy) -> Content {
        match self[owner].content.clone() {
            Content::Components(components) => Content::Components(
                components
                    .into_iter()
                    .map(|(name, child)| (name, self.clone_tree(child, policy, Some(owner))))
                    .collect(),
            ),
            Content::Element(element) => {
                Content::Element(self.clone_tree(element, policy, Some(owner)))
            }
            content @ (Content::None | Content::Named(_)) => content,
        }
    }
}

impl Index<EntityId> for ObjectTree {
    type Output = Entity;

    fn index(&self, index: EntityId) -> &Self::Output {
        &self.entities[index.0]
    }
}

impl IndexMut<EntityId> for ObjectTree {
    fn index_mut(&mut self, index: EntityId) -> &mut Self::Output {
        &mut self.entities[index.0]
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::ast::{Constraint, ConstraintKind, Mode, Value};

    fn sequence(tree: &mut ObjectTree) -> (EntityId, EntityId) {
        let root = tree.push(Entity::new("Outer", Mode::Type));
        let mut inner = Entity::new("a", Mode::Type);
        inner.parent = Some(root);
        inner.kind = Some(Kind::Integer);
        inner.value = Some(Value::Integer(3));
        inner.constraints = Arc::new(vec![Constraint {
            text: "0..7".into(),
            kind: ConstraintKind::ValueRange {
                lower: Some(0),
                upper: Some(7),
                size: false,
                extensible: false,
            },
        }]);
        let inner = tree.push(inner);
        tree[root].kind = Some(Kind::Sequence);
        tree[root].content = Content::Components(IndexMap::from([("a".to_string(), inner)]));
        tree[root].params = Some(IndexMap::new());
        (root, inner)
    }

    #[test]
    fn paths_and_names() {
        let mut tree = ObjectTree::new();
        let (root, inner) = sequence(&mut tree);

        assert_eq!(tree.full_name(inner), "Outer.a");
        assert_eq!(
            tree.path_from(root, inner),
            Some(vec![PathStep::Component("a".into())])
        );
        assert_eq!(tree.path_from(inner, root), None);
        assert_eq!(tree.param_owner(inner), Some(root));
        assert_eq!(tree.step(root, &PathStep::Component("a".into())), Some(inner));
    }

    #[test]
    fn clone_policies() {
        let mut tree = ObjectTree::new();
        let (root, inner) = sequence(&mut tree);

        let full = tree.clone_tree(root, ClonePolicy::Full, None);
        assert!(tree[full].params.is_some());
        let full_inner = tree.children(full)[0];
        assert_ne!(full_inner, inner);
        assert_eq!(tree[full_inner].parent, Some(full));
        assert!(!Arc::ptr_eq(&tree[full_inner].constraints, &tree[inner].constraints));

        let light = tree.clone_tree(root, ClonePolicy::Light, None);
        assert!(tree[light].params.is_none());
        let light_inner = tree.children(light)[0];
        assert_eq!(tree[light_inner].value, Some(Value::Integer(3)));

        let constant = tree.clone_tree(root, ClonePolicy::Const, None);
        let const_inner = tree.children(constant)[0];
        assert_eq!(tree[const_inner].value, None);
        assert!(Arc::ptr_eq(&tree[const_inner].constraints, &tree[inner].constraints));
    }

    #[test]
    fn propagate_into_slots() {
        let mut tree = ObjectTree::new();
        let (root, inner) = sequence(&mut tree);

        let mut bound = Entity::new("ub", Mode::Value);
        bound.kind = Some(Kind::Integer);
        bound.value = Some(Value::Integer(5));
        let bound = tree.push(bound);

        let upper = ReferrerPath::new(
            vec![
                PathStep::Component("a".into()),
                PathStep::Constraint(0, ConstraintSlot::Upper),
            ],
            false,
        );
        assert!(tree.propagate(root, &upper, bound));
        assert!(matches!(
            tree[inner].constraints[0].kind,
            ConstraintKind::ValueRange {
                lower: Some(0),
                upper: Some(5),
                ..
            }
        ));

        let single = ReferrerPath::new(
            vec![
                PathStep::Component("a".into()),
                PathStep::Constraint(0, ConstraintSlot::Value),
            ],
            false,
        );
        assert!(!tree.propagate(root, &single, bound));

        let missing = ReferrerPath::new(vec![PathStep::Component("b".into())], false);
        assert!(!tree.propagate(root, &missing, bound));
    }

    #[test]
    fn propagate_replaces_entity() {
        let mut tree = ObjectTree::new();
        let (root, inner) = sequence(&mut tree);
        tree[inner].flags.optional = true;

        let mut ty = Entity::new("T", Mode::Type);
        ty.kind = Some(Kind::Boolean);
        let ty = tree.push(ty);

        let deep = ReferrerPath::new(vec![PathStep::Component("a".into())], true);
        assert!(tree.propagate(root, &deep, ty));

        let replaced = tree[root].component("a").expect("component kept");
        assert_ne!(replaced, inner);
        assert_eq!(tree[replaced].name, "a");
        assert_eq!(tree[replaced].kind, Some(Kind::Boolean));
        assert_eq!(tree[replaced].parent, Some(root));
        assert!(tree[replaced].flags.optional);
        assert_eq!(tree[ty].name, "T");
    }

    #[test]
    fn truncate_discards_new_entities() {
        let mut tree = ObjectTree::new();
        let (root, _) = sequence(&mut tree);
        let mark = tree.len();
        tree.clone_tree(root, ClonePolicy::Full, None);
        assert_eq!(tree.len(), mark * 2);
        tree.truncate(mark);
        assert_eq!(tree.len(), mark);
    }
}
