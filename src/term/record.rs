use crate::term::{TermGroup, TermId};

/// A parsed term, as produced by an external loader
///
/// `TermRecord`s are the input for [`Taxonomy::load`](crate::Taxonomy::load)
/// and [`Taxonomy::add_node`](crate::Taxonomy::add_node).
///
/// # Examples
///
/// ```
/// use ontosim::TermRecord;
///
/// let record = TermRecord::new("HP:0000118", "Phenotypic abnormality")
///     .with_parents(["HP:0000001"])
///     .with_alt_ids(["HP:0000117"]);
///
/// assert_eq!(record.parents.len(), 1);
/// assert!(record.alt_ids.contains("HP:0000117"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRecord {
    /// Canonical id
    pub id: TermId,
    /// Display name
    pub name: String,
    /// Ids of the direct parents, may be alternate ids
    pub parents: TermGroup,
    /// Alternate ids that resolve to `id`
    pub alt_ids: TermGroup,
}

impl TermRecord {
    /// Constructs a new record without parents or alternate ids
    pub fn new<I: Into<TermId>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parents: TermGroup::new(),
            alt_ids: TermGroup::new(),
        }
    }

    /// Adds parent ids to the record
    pub fn with_parents<I, T>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TermId>,
    {
        self.parents.extend(parents);
        self
    }

    /// Adds alternate ids to the record
    pub fn with_alt_ids<I, T>(mut self, alt_ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TermId>,
    {
        self.alt_ids.extend(alt_ids);
        self
    }
}
