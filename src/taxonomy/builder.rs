use std::collections::HashMap;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::taxonomy::termarena::Arena;
use crate::taxonomy::Taxonomy;
use crate::term::{TermGroup, TermId, TermNode, TermRecord};
use crate::{OntoError, OntoResult, SYNTHETIC_ROOT_NAME};

/// Records are being collected, nothing is linked yet
pub struct LooseCollection;
/// All records are collected, parent ids can be resolved
pub struct AllTerms;
/// Terms are linked in both directions and all ancestor caches exist
pub struct ConnectedTerms;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        alt_ids: builder.alt_ids,
        declared_parents: builder.declared_parents,
        root: builder.root,
        state: PhantomData,
    }
}

/// Builds a [`Taxonomy`] from [`TermRecord`]s
///
/// The builder moves through the states [`LooseCollection`],
/// [`AllTerms`] and [`ConnectedTerms`]. Each state only exposes the
/// methods that are valid at that point of the construction.
///
/// Most users want [`Taxonomy::load`] instead.
///
/// # Examples
///
/// ```
/// use ontosim::taxonomy::Builder;
/// use ontosim::TermRecord;
///
/// let mut builder = Builder::new();
/// builder.add_record(TermRecord::new("T:1", "Root"));
/// builder.add_record(TermRecord::new("T:2", "Child").with_parents(["T:1"]));
///
/// let taxonomy = builder
///     .terms_complete()
///     .unwrap()
///     .connect_all_terms()
///     .unwrap()
///     .build();
///
/// assert_eq!(taxonomy.root_id().as_str(), "T:1");
/// ```
pub struct Builder<T> {
    terms: Arena,
    alt_ids: HashMap<TermId, TermId>,
    declared_parents: HashMap<TermId, TermGroup>,
    root: Option<TermId>,
    state: PhantomData<T>,
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty builder
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            alt_ids: HashMap::default(),
            declared_parents: HashMap::default(),
            root: None,
            state: PhantomData,
        }
    }

    /// Adds a term record
    ///
    /// If a record with the same id was added before, it is replaced.
    /// The record is not linked to its parents yet.
    pub fn add_record(&mut self, record: TermRecord) {
        let TermRecord {
            id,
            name,
            parents,
            alt_ids,
        } = record;

        for alt_id in alt_ids {
            self.alt_ids.entry(alt_id).or_insert_with(|| id.clone());
        }
        // canonical ids always resolve to themselves
        self.alt_ids.insert(id.clone(), id.clone());

        if self.terms.contains(id.as_str()) {
            debug!("Replacing duplicate term record {}", id);
        }
        self.declared_parents.insert(id.clone(), parents);
        self.terms.insert(TermNode::new(id, name));
    }

    /// Finishes the collection of records
    ///
    /// # Errors
    ///
    /// Returns [`OntoError::EmptyTaxonomy`] if no record was added
    pub fn terms_complete(self) -> OntoResult<Builder<AllTerms>> {
        if self.terms.is_empty() {
            return Err(OntoError::EmptyTaxonomy);
        }
        Ok(transition_state(self))
    }
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<AllTerms> {
    /// Links every term to its parents and creates the ancestor caches
    ///
    /// Parent ids are resolved via the alternate ids. Parents that are not
    /// part of the taxonomy are ignored. If more than one term has no
    /// parent, a synthetic root is added on top of them.
    ///
    /// # Errors
    ///
    /// - [`OntoError::NoRoot`] if every term has a parent
    /// - [`OntoError::CyclicTaxonomy`] if a term is its own ancestor
    pub fn connect_all_terms(mut self) -> OntoResult<Builder<ConnectedTerms>> {
        let term_ids = self.terms.keys();

        for id in &term_ids {
            let Some(parents) = self.declared_parents.remove(id) else {
                continue;
            };
            for parent in &parents {
                match self.alt_ids.get(parent.as_str()).cloned() {
                    Some(parent_id) => {
                        self.terms.add_parent(&parent_id, id);
                    }
                    None => warn!(
                        "Term {} has parent {}, but no term {} exists in the taxonomy",
                        id, parent, parent
                    ),
                }
            }
        }

        let roots: Vec<TermId> = term_ids
            .iter()
            .filter(|id| self.terms.get(id.as_str()).map_or(false, TermNode::is_root))
            .cloned()
            .collect();

        let root = match roots.len() {
            0 => return Err(OntoError::NoRoot),
            1 => roots[0].clone(),
            n => {
                debug!("Adding synthetic root above {} root terms", n);
                let root_id = TermId::synthetic_root();
                self.terms
                    .insert(TermNode::new(root_id.clone(), SYNTHETIC_ROOT_NAME));
                self.alt_ids.insert(root_id.clone(), root_id.clone());
                for child in &roots {
                    self.terms.add_parent(&root_id, child);
                }
                root_id
            }
        };

        for id in self.terms.keys() {
            self.terms.cache_ancestors(&id)?;
        }

        self.root = Some(root);
        Ok(transition_state(self))
    }
}

impl Builder<ConnectedTerms> {
    /// Returns the finished [`Taxonomy`]
    pub fn build(self) -> Taxonomy {
        let root = self.root.unwrap_or_else(TermId::synthetic_root);
        debug!("Built taxonomy with {} terms, rooted at {}", self.terms.len(), root);
        Taxonomy {
            terms: self.terms,
            alt_ids: self.alt_ids,
            root,
        }
    }
}
