//! The term DAG
//!
//! [`Taxonomy`] holds all [`TermNode`]s, their parent and child links
//! and the cached ancestor closure of every term.
use std::collections::HashMap;
use std::fmt::Write;

use tracing::{debug, warn};

use crate::term::{TermGroup, TermId, TermNode, TermRecord};
use crate::{count_to_f64, OntoError, OntoResult};

mod builder;
mod termarena;

pub use builder::{AllTerms, Builder, ConnectedTerms, LooseCollection};
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// A directed acyclic graph of terms with a single root
///
/// Every term (except the root) has at least one parent in an `is_a`
/// relationship. The children of a term are always the exact inverse of the
/// parent links. Each term caches the set of all its ancestors; the cache is
/// refreshed whenever [`Taxonomy::add_node`] or [`Taxonomy::remove_node`]
/// change the graph, so ancestor queries never see outdated data.
///
/// Terms can be looked up by their canonical id or by any alternate id.
///
/// ```mermaid
/// erDiagram
///     TAXONOMY ||--|{ TERM : contains
///     TERM ||--|{ TERM : is_a
///     TAXONOMY ||--|{ ALT_ID : resolves
///     ALT_ID }|--|| TERM : aliases
///     TERM {
///         TermId id
///         str name
///         TermGroup parents
///         TermGroup children
///         TermGroup all_parents
///     }
/// ```
///
/// # Examples
///
/// ```
/// use ontosim::{Taxonomy, TermRecord};
///
/// let taxonomy = Taxonomy::load([
///     TermRecord::new("T:1", "All"),
///     TermRecord::new("T:2", "Abnormal heart").with_parents(["T:1"]),
///     TermRecord::new("T:3", "Abnormal heart valve")
///         .with_parents(["T:2"])
///         .with_alt_ids(["T:33"]),
/// ])
/// .unwrap();
///
/// assert_eq!(taxonomy.len(), 3);
/// assert_eq!(taxonomy.root_id().as_str(), "T:1");
///
/// let ancestors = taxonomy.ancestors("T:33");
/// assert_eq!(ancestors.len(), 3);
/// assert!(ancestors.contains("T:3"));
/// assert!(ancestors.contains("T:1"));
/// ```
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub(crate) terms: Arena,
    pub(crate) alt_ids: HashMap<TermId, TermId>,
    pub(crate) root: TermId,
}

/// Summary numbers of a [`Taxonomy`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxonomyStats {
    /// Number of terms
    pub size: usize,
    /// Number of terms without children
    pub leaves: usize,
    /// Smallest number of direct parents of any term
    pub min_parents: usize,
    /// Largest number of direct parents of any term
    pub max_parents: usize,
    /// Average number of direct parents per term
    pub avg_parents: f64,
}

impl Taxonomy {
    /// Builds a taxonomy from parsed term records
    ///
    /// Records are linked in one pass after all of them are collected, so
    /// the order of records does not matter. A record that repeats an
    /// earlier id replaces it.
    ///
    /// If more than one term has no parent, a synthetic root
    /// ([`SYNTHETIC_ROOT_ID`](crate::SYNTHETIC_ROOT_ID)) is added as
    /// the parent of all of them.
    ///
    /// # Errors
    ///
    /// - [`OntoError::EmptyTaxonomy`]: `records` is empty
    /// - [`OntoError::NoRoot`]: every term has a parent
    /// - [`OntoError::CyclicTaxonomy`]: a term is its own ancestor
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{Taxonomy, TermRecord, SYNTHETIC_ROOT_ID};
    ///
    /// let taxonomy = Taxonomy::load([
    ///     TermRecord::new("A:1", "First root"),
    ///     TermRecord::new("B:1", "Second root"),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(taxonomy.root_id().as_str(), SYNTHETIC_ROOT_ID);
    /// assert_eq!(taxonomy.len(), 3);
    /// ```
    pub fn load<I: IntoIterator<Item = TermRecord>>(records: I) -> OntoResult<Taxonomy> {
        let mut builder = Builder::new();
        for record in records {
            builder.add_record(record);
        }
        Ok(builder.terms_complete()?.connect_all_terms()?.build())
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the taxonomy has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the canonical id of `id`, which may be an alternate id
    ///
    /// Returns `None` if the id is not known
    pub fn resolve_id(&self, id: &str) -> Option<&TermId> {
        self.alt_ids.get(id)
    }

    /// Returns `true` if `id` (canonical or alternate) is part of the taxonomy
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the term with the (canonical or alternate) `id`
    pub fn get(&self, id: &str) -> Option<&TermNode> {
        self.terms.get(self.resolve_id(id)?.as_str())
    }

    /// The id of the root term
    pub fn root_id(&self) -> &TermId {
        &self.root
    }

    /// The root term
    ///
    /// # Panics
    ///
    /// Never, the root term can not be removed from the taxonomy
    pub fn root(&self) -> &TermNode {
        self.terms
            .get(self.root.as_str())
            .expect("the root term is always present")
    }

    /// The alternate id mapping, including the self-mapping of every canonical id
    pub fn alt_ids(&self) -> &HashMap<TermId, TermId> {
        &self.alt_ids
    }

    /// Returns an iterator over all terms, in ascending order of their id
    pub fn iter(&self) -> Iter<'_> {
        let mut terms: Vec<&TermNode> = self.terms.values().collect();
        terms.sort_unstable_by(|a, b| a.id().cmp(b.id()));
        Iter {
            inner: terms.into_iter(),
        }
    }

    /// Returns the ids of all terms without children, in ascending order
    ///
    /// The leaves are computed on every call.
    pub fn leaves(&self) -> TermGroup {
        self.terms
            .values()
            .filter(|term| term.is_leaf())
            .map(TermNode::id)
            .collect()
    }

    /// Returns the term and all its ancestors
    ///
    /// `id` can be an alternate id. Unknown ids return an empty group.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{Taxonomy, TermRecord};
    ///
    /// let taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "Root"),
    ///     TermRecord::new("T:2", "A").with_parents(["T:1"]),
    ///     TermRecord::new("T:3", "B").with_parents(["T:1"]),
    ///     TermRecord::new("T:4", "AB").with_parents(["T:2", "T:3"]),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(taxonomy.ancestors("T:4").len(), 4);
    /// assert_eq!(taxonomy.ancestors("T:2").len(), 2);
    /// assert!(taxonomy.ancestors("T:99").is_empty());
    /// ```
    pub fn ancestors(&self, id: &str) -> TermGroup {
        match self.get(id) {
            Some(term) => {
                let mut res = term.all_parents().clone();
                res.insert(term.id());
                res
            }
            None => TermGroup::new(),
        }
    }

    /// Inserts a term or replaces the term with the same id
    ///
    /// A replaced term keeps its children, its parents are replaced by
    /// the parents of the record. Parent ids are resolved via alternate ids,
    /// unknown parents are ignored. A new term without any (known) parent
    /// is attached to the root, so that the taxonomy keeps a single root.
    ///
    /// The ancestor caches of the term and all its descendants are rebuilt.
    ///
    /// # Errors
    ///
    /// Returns [`OntoError::CyclicTaxonomy`] if one of the parents is the
    /// term itself or one of its descendants. The taxonomy is unchanged
    /// in this case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{Taxonomy, TermRecord};
    ///
    /// let mut taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "Root"),
    ///     TermRecord::new("T:2", "A").with_parents(["T:1"]),
    /// ])
    /// .unwrap();
    ///
    /// taxonomy
    ///     .add_node(TermRecord::new("T:3", "B").with_parents(["T:2"]))
    ///     .unwrap();
    /// assert_eq!(taxonomy.ancestors("T:3").len(), 3);
    ///
    /// // T:2 can't become a child of its own child
    /// assert!(taxonomy
    ///     .add_node(TermRecord::new("T:2", "A").with_parents(["T:3"]))
    ///     .is_err());
    /// ```
    pub fn add_node(&mut self, record: TermRecord) -> OntoResult<()> {
        let TermRecord {
            id,
            name,
            parents,
            alt_ids,
        } = record;

        let mut resolved = TermGroup::with_capacity(parents.len());
        for parent in &parents {
            match self.resolve_id(parent.as_str()) {
                Some(parent_id) => {
                    resolved.insert(parent_id);
                }
                None => warn!(
                    "Term {} has parent {}, but no term {} exists in the taxonomy",
                    id, parent, parent
                ),
            }
        }

        let descendants = self.terms.descendants(id.as_str());
        if let Some(parent) = resolved
            .iter()
            .find(|p| **p == id || descendants.contains(p.as_str()))
        {
            return Err(OntoError::CyclicTaxonomy(parent.clone()));
        }

        if resolved.is_empty() && id != self.root {
            debug!("Attaching parentless term {} to the root", id);
            resolved.insert(self.root.clone());
        }

        match self.terms.get_mut(id.as_str()) {
            Some(term) => {
                term.set_name(name);
                let old_parents = term.take_parents();
                for parent in &old_parents {
                    if let Some(parent_term) = self.terms.get_mut(parent.as_str()) {
                        parent_term.remove_child(id.as_str());
                    }
                }
            }
            None => self.terms.insert(TermNode::new(id.clone(), name)),
        }

        for parent in &resolved {
            self.terms.add_parent(parent, &id);
        }

        for alt_id in alt_ids {
            self.alt_ids.entry(alt_id).or_insert_with(|| id.clone());
        }
        self.alt_ids.insert(id.clone(), id.clone());

        let mut affected = descendants;
        affected.insert(id);
        self.terms.refresh_ancestors(&affected)
    }

    /// Removes the term from the taxonomy
    ///
    /// The term is unlinked from its parents and children and all
    /// alternate ids pointing to it are dropped. Grandparents are **not**
    /// connected to grandchildren. The ancestor caches of all former
    /// descendants are rebuilt.
    ///
    /// Returns `false` if the term does not exist or is the root term.
    /// See [`Taxonomy::try_remove_node`] to learn why.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{Taxonomy, TermRecord};
    ///
    /// let mut taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "Root"),
    ///     TermRecord::new("T:2", "A").with_parents(["T:1"]),
    /// ])
    /// .unwrap();
    ///
    /// assert!(taxonomy.remove_node("T:2"));
    /// assert!(!taxonomy.remove_node("T:2"));
    /// assert!(!taxonomy.remove_node("T:1"));
    /// assert!(taxonomy.root().is_leaf());
    /// ```
    pub fn remove_node(&mut self, id: &str) -> bool {
        match self.try_remove_node(id) {
            Ok(_) => true,
            Err(err) => {
                debug!("Not removing {}: {}", id, err);
                false
            }
        }
    }

    /// Removes the term from the taxonomy and returns it
    ///
    /// Same as [`Taxonomy::remove_node`]. The returned node still lists
    /// its former parents and children.
    ///
    /// # Errors
    ///
    /// - [`OntoError::DoesNotExist`] if neither a term nor an alternate id matches `id`
    /// - [`OntoError::RootRemoval`] if `id` is the root term
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{OntoError, Taxonomy, TermRecord};
    ///
    /// let mut taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "Root"),
    ///     TermRecord::new("T:2", "A").with_parents(["T:1"]),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(taxonomy.try_remove_node("T:1").err(), Some(OntoError::RootRemoval));
    /// let removed = taxonomy.try_remove_node("T:2").unwrap();
    /// assert_eq!(removed.name(), "A");
    /// assert_eq!(taxonomy.try_remove_node("T:2").err(), Some(OntoError::DoesNotExist));
    /// ```
    pub fn try_remove_node(&mut self, id: &str) -> OntoResult<TermNode> {
        let id = self.resolve_id(id).cloned().ok_or(OntoError::DoesNotExist)?;
        if id == self.root {
            return Err(OntoError::RootRemoval);
        }
        let descendants = self.terms.descendants(id.as_str());
        let term = self.terms.remove(id.as_str()).ok_or(OntoError::DoesNotExist)?;

        for parent in term.parents() {
            if let Some(parent_term) = self.terms.get_mut(parent.as_str()) {
                parent_term.remove_child(id.as_str());
            }
        }
        for child in term.children() {
            if let Some(child_term) = self.terms.get_mut(child.as_str()) {
                child_term.remove_parent(id.as_str());
            }
        }
        self.alt_ids.retain(|_, canonical| *canonical != id);

        if let Err(err) = self.terms.refresh_ancestors(&descendants) {
            warn!("Unable to rebuild ancestors after removing {}: {}", id, err);
        }
        Ok(term)
    }

    /// Returns summary numbers of the taxonomy
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{Taxonomy, TermRecord};
    ///
    /// let taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "Root"),
    ///     TermRecord::new("T:2", "A").with_parents(["T:1"]),
    ///     TermRecord::new("T:3", "B").with_parents(["T:1"]),
    ///     TermRecord::new("T:4", "AB").with_parents(["T:2", "T:3"]),
    /// ])
    /// .unwrap();
    ///
    /// let stats = taxonomy.stats();
    /// assert_eq!(stats.size, 4);
    /// assert_eq!(stats.leaves, 1);
    /// assert_eq!(stats.min_parents, 0);
    /// assert_eq!(stats.max_parents, 2);
    /// assert!((stats.avg_parents - 1.0).abs() < f64::EPSILON);
    /// ```
    pub fn stats(&self) -> TaxonomyStats {
        let mut stats = TaxonomyStats {
            size: self.len(),
            leaves: 0,
            min_parents: usize::MAX,
            max_parents: 0,
            avg_parents: 0.0,
        };
        let mut total_parents = 0usize;
        for term in self.terms.values() {
            let n_parents = term.parents().len();
            total_parents += n_parents;
            stats.min_parents = stats.min_parents.min(n_parents);
            stats.max_parents = stats.max_parents.max(n_parents);
            if term.is_leaf() {
                stats.leaves += 1;
            }
        }
        if stats.size == 0 {
            stats.min_parents = 0;
        } else {
            stats.avg_parents = count_to_f64(total_parents) / count_to_f64(stats.size);
        }
        stats
    }

    /// Returns the code to crate a `Mermaid` flow diagram
    ///
    /// This is meant to be used with smaller taxonomies
    pub fn as_mermaid(&self) -> String {
        let mut code = String::new();
        code.push_str("graph TD\n");
        for term in self {
            let _ = writeln!(code, "{}[\"{}\n{}\"]", term.id(), term.id(), term.name());
            for child in term.children() {
                let _ = writeln!(code, "{} --> {}", term.id(), child);
            }
        }
        code
    }
}

/// An iterator over the [`TermNode`]s of a [`Taxonomy`]
pub struct Iter<'a> {
    inner: std::vec::IntoIter<&'a TermNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TermNode;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a> IntoIterator for &'a Taxonomy {
    type Item = &'a TermNode;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
