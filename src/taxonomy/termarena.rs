use std::collections::hash_map::Values;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::term::{TermGroup, TermId, TermNode};
use crate::{OntoError, OntoResult, DEFAULT_NUM_TERMS};

#[derive(Debug, Clone)]
pub(crate) struct Arena {
    terms: HashMap<TermId, TermNode>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Inserts the node, replacing any previous node with the same id
    pub fn insert(&mut self, term: TermNode) {
        self.terms.insert(term.id().clone(), term);
    }

    pub fn remove(&mut self, id: &str) -> Option<TermNode> {
        self.terms.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.terms.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TermNode> {
        self.terms.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut TermNode> {
        self.terms.get_mut(id)
    }

    pub fn values(&self) -> Values<'_, TermId, TermNode> {
        self.terms.values()
    }

    /// All term ids, in ascending order
    pub fn keys(&self) -> Vec<TermId> {
        let mut keys: Vec<TermId> = self.terms.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Links `child_id` to `parent_id` in both directions
    ///
    /// Returns `false` if either node is missing
    pub fn add_parent(&mut self, parent_id: &TermId, child_id: &TermId) -> bool {
        if !(self.contains(parent_id.as_str()) && self.contains(child_id.as_str())) {
            return false;
        }
        if let Some(parent) = self.get_mut(parent_id.as_str()) {
            parent.add_child(child_id.clone());
        }
        if let Some(child) = self.get_mut(child_id.as_str()) {
            child.add_parent(parent_id.clone());
        }
        true
    }

    /// All transitive children of `id`, excluding `id` itself, in ascending order
    pub fn descendants(&self, id: &str) -> TermGroup {
        let mut res = TermGroup::new();
        let mut queue: VecDeque<&TermId> = VecDeque::new();
        if let Some(term) = self.get(id) {
            queue.extend(term.children());
        }
        while let Some(child) = queue.pop_front() {
            if res.insert(child) {
                if let Some(term) = self.get(child.as_str()) {
                    queue.extend(term.children());
                }
            }
        }
        res
    }

    /// Drops and rebuilds the `all_parents` cache of the given terms
    ///
    /// The caches of all other terms must be current.
    pub fn refresh_ancestors(&mut self, ids: &TermGroup) -> OntoResult<()> {
        for id in ids {
            if let Some(term) = self.get_mut(id.as_str()) {
                term.invalidate_ancestors();
            }
        }
        for id in ids {
            self.cache_ancestors(id)?;
        }
        Ok(())
    }

    /// Creates the `all_parents` cache of a single term, if not done yet
    ///
    /// # Errors
    ///
    /// Returns [`OntoError::CyclicTaxonomy`] if the term is its own ancestor
    pub fn cache_ancestors(&mut self, id: &TermId) -> OntoResult<()> {
        let mut visiting = HashSet::new();
        self.create_cache_of_grandparents(id, &mut visiting)
    }

    /// This method is part of the cache creation to link all terms to their
    /// direct and indirect parents (grandparents)
    ///
    /// The recursion bubbles up to the top of the taxonomy and caches the list
    /// of direct and indirect parents for every term on the way back down.
    /// It stops at terms that already have a cache.
    /// `visiting` holds the terms of the current recursion path, reaching
    /// one of them again means the graph has a cycle.
    fn create_cache_of_grandparents(
        &mut self,
        term_id: &TermId,
        visiting: &mut HashSet<TermId>,
    ) -> OntoResult<()> {
        let parents = match self.get(term_id.as_str()) {
            Some(term) if term.ancestors_cached() => return Ok(()),
            Some(term) => term.parents().clone(),
            None => return Ok(()),
        };
        if !visiting.insert(term_id.clone()) {
            return Err(OntoError::CyclicTaxonomy(term_id.clone()));
        }

        let mut res = parents.clone();
        for parent in &parents {
            self.create_cache_of_grandparents(parent, visiting)?;
            if let Some(parent_term) = self.get(parent.as_str()) {
                res = &res | parent_term.all_parents();
            }
        }
        if res.contains(term_id.as_str()) {
            return Err(OntoError::CyclicTaxonomy(term_id.clone()));
        }
        visiting.remove(term_id.as_str());

        if let Some(term) = self.get_mut(term_id.as_str()) {
            term.set_all_parents(res);
        }
        Ok(())
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: HashMap::with_capacity(DEFAULT_NUM_TERMS),
        }
    }
}
