use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt::{Debug, Display};

use crate::term::{TermGroup, TermId};

/// A set of [`EntityId`]s, iterated in ascending order
pub type Entities = BTreeSet<EntityId>;

/// A unique identifier for an [`Entity`], e.g. `OMIM:614322` or a gene symbol
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EntityId {
    inner: String,
}

impl EntityId {
    /// Constructs a new `EntityId`
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { inner: id.into() }
    }

    /// Returns the id as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::new(s)
    }
}

impl From<String> for EntityId {
    fn from(inner: String) -> Self {
        EntityId { inner }
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntityId({})", self)
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for EntityId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for EntityId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

/// A single annotated entity, e.g. a disease or a gene
///
/// An entity is linked to a set of terms. After closure propagation, the
/// linked terms contain all ancestors of the directly observed terms, while
/// the original terms keep the direct observations only.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    terms: TermGroup,
    original: TermGroup,
    propagated: bool,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: &str) -> Entity {
        Self {
            id,
            name: name.to_string(),
            terms: TermGroup::default(),
            original: TermGroup::default(),
            propagated: false,
        }
    }

    /// The unique [`EntityId`] of the entity
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// The display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All linked terms
    pub fn terms(&self) -> &TermGroup {
        &self.terms
    }

    /// The directly observed terms
    ///
    /// Empty until [`AnnotationGraph::propagate_closure`](crate::AnnotationGraph::propagate_closure)
    /// was called, unless terms were added via
    /// [`AnnotationGraph::add_entity_term_direct`](crate::AnnotationGraph::add_entity_term_direct).
    pub fn original_terms(&self) -> &TermGroup {
        &self.original
    }

    /// Returns `true` if the entity's original terms were recorded by closure propagation
    pub fn is_propagated(&self) -> bool {
        self.propagated
    }

    pub(crate) fn link_term(&mut self, term_id: TermId) -> bool {
        self.terms.insert(term_id)
    }

    pub(crate) fn unlink_term(&mut self, term_id: &str) -> bool {
        self.terms.remove(term_id)
    }

    pub(crate) fn add_original_term(&mut self, term_id: TermId) -> bool {
        self.original.insert(term_id)
    }

    pub(crate) fn set_original_terms(&mut self, terms: TermGroup) {
        self.original = terms;
    }

    /// Records the linked terms as original terms, once
    pub(crate) fn snapshot_original(&mut self) -> bool {
        if self.propagated {
            return false;
        }
        self.original = &self.original | &self.terms;
        self.propagated = true;
        true
    }
}
