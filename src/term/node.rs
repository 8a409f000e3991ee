use crate::term::{TermGroup, TermId};

/// A single term of the [`Taxonomy`](crate::Taxonomy)
///
/// The node stores the direct parents and children and a cache of all
/// ancestors. The cache is owned and kept current by the `Taxonomy`,
/// it never contains the node itself.
#[derive(Debug, Clone)]
pub struct TermNode {
    id: TermId,
    name: String,
    parents: TermGroup,
    children: TermGroup,
    all_parents: TermGroup,
    ancestors_cached: bool,
}

impl TermNode {
    pub(crate) fn new<I: Into<TermId>, N: Into<String>>(id: I, name: N) -> TermNode {
        TermNode {
            id: id.into(),
            name: name.into(),
            parents: TermGroup::new(),
            children: TermGroup::new(),
            all_parents: TermGroup::new(),
            ancestors_cached: false,
        }
    }

    /// The canonical id of the term
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// The display name of the term
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The direct parents of the term
    pub fn parents(&self) -> &TermGroup {
        &self.parents
    }

    /// The direct children of the term
    pub fn children(&self) -> &TermGroup {
        &self.children
    }

    /// All ancestors of the term, excluding the term itself
    pub fn all_parents(&self) -> &TermGroup {
        &self.all_parents
    }

    /// Returns `true` if the term has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the term has no parents
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub(crate) fn ancestors_cached(&self) -> bool {
        self.ancestors_cached
    }

    pub(crate) fn set_all_parents(&mut self, all_parents: TermGroup) {
        self.all_parents = all_parents;
        self.ancestors_cached = true;
    }

    pub(crate) fn invalidate_ancestors(&mut self) {
        self.all_parents = TermGroup::new();
        self.ancestors_cached = false;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn add_parent(&mut self, parent_id: TermId) -> bool {
        self.parents.insert(parent_id)
    }

    pub(crate) fn remove_parent(&mut self, parent_id: &str) -> bool {
        self.parents.remove(parent_id)
    }

    pub(crate) fn take_parents(&mut self) -> TermGroup {
        std::mem::take(&mut self.parents)
    }

    pub(crate) fn add_child(&mut self, child_id: TermId) -> bool {
        self.children.insert(child_id)
    }

    pub(crate) fn remove_child(&mut self, child_id: &str) -> bool {
        self.children.remove(child_id)
    }
}

impl PartialEq for TermNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TermNode {}
