//! Entities (diseases, genes) are linked to terms and make up the annotation corpus
//!
//! The [`AnnotationGraph`] is a bipartite graph between [`Entity`]s and the
//! terms of a [`Taxonomy`]. It owns the taxonomy, so that closure propagation
//! always uses the current term hierarchy.
//!
//! The underlying principle for all annotations is the same:
//! - Each entity has a unique [`EntityId`]
//! - Each entity holds the terms it is linked to and the terms that were observed directly
//! - Each term holds the entities it is linked to
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::taxonomy::Taxonomy;
use crate::term::{TermGroup, TermId};

mod entity;
mod filter;

pub use entity::{Entities, Entity, EntityId};
pub use filter::{AnnotationFilter, AnnotationRecord};

/// The outcome of [`AnnotationGraph::propagate_closure`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClosureReport {
    /// Number of entity - term edges that were added
    pub added_edges: usize,
    /// Number of entity - term edges whose term is not part of the taxonomy
    pub unknown_terms: usize,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// The bipartite graph between entities and terms
///
/// Edges are always stored in both directions. After
/// [`AnnotationGraph::propagate_closure`] every entity is linked to all
/// ancestors of its directly observed terms.
///
/// ```mermaid
/// erDiagram
///     ANNOTATION_GRAPH ||--|| TAXONOMY : owns
///     ANNOTATION_GRAPH ||--|{ ENTITY : contains
///     ENTITY }|--|{ TERM : annotated_with
///     ENTITY {
///         EntityId id
///         str name
///         TermGroup terms
///         TermGroup original_terms
///     }
/// ```
///
/// # Examples
///
/// ```
/// use ontosim::{AnnotationGraph, Taxonomy, TermRecord};
///
/// let taxonomy = Taxonomy::load([
///     TermRecord::new("T:1", "All"),
///     TermRecord::new("T:2", "Abnormal heart").with_parents(["T:1"]),
/// ])
/// .unwrap();
///
/// let mut annotations = AnnotationGraph::new(taxonomy);
/// annotations.add_direct_annotation("D:1", "Heart disease", "T:2");
/// let report = annotations.propagate_closure();
///
/// assert_eq!(report.added_edges, 1);
/// assert_eq!(annotations.terms_for("D:1").unwrap().len(), 2);
/// assert_eq!(annotations.entity("D:1").unwrap().original_terms().len(), 1);
/// assert_eq!(annotations.n_entities_for("T:1"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AnnotationGraph {
    taxonomy: Taxonomy,
    entities: BTreeMap<EntityId, Entity>,
    terms: HashMap<TermId, Entities>,
}

impl AnnotationGraph {
    /// Constructs an empty annotation graph on top of the taxonomy
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            entities: BTreeMap::new(),
            terms: HashMap::new(),
        }
    }

    /// The taxonomy of the annotating terms
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Mutable access to the taxonomy
    ///
    /// Changes to the taxonomy do not change any existing edges. Call
    /// [`AnnotationGraph::propagate_closure`] to link entities to new ancestors.
    pub fn taxonomy_mut(&mut self) -> &mut Taxonomy {
        &mut self.taxonomy
    }

    /// Consumes the graph and returns the taxonomy
    pub fn into_taxonomy(self) -> Taxonomy {
        self.taxonomy
    }

    /// Returns the number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the total number of entity - term edges
    pub fn n_edges(&self) -> usize {
        self.entities.values().map(|e| e.terms().len()).sum()
    }

    /// Returns the entity with the given id
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub(crate) fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Iterates all entities, in ascending order of their id
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Iterates all entity ids, in ascending order
    pub fn entity_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.keys()
    }

    /// Returns the ids of all terms with at least one linked entity, in ascending order
    pub fn term_ids(&self) -> TermGroup {
        self.terms.keys().collect()
    }

    /// Returns the entities linked to the term
    ///
    /// `term_id` must be the canonical id
    pub fn entities_for(&self, term_id: &str) -> Option<&Entities> {
        self.terms.get(term_id)
    }

    /// Returns the number of entities linked to the term
    pub fn n_entities_for(&self, term_id: &str) -> usize {
        self.terms.get(term_id).map_or(0, BTreeSet::len)
    }

    /// Returns the terms linked to the entity
    pub fn terms_for(&self, entity_id: &str) -> Option<&TermGroup> {
        self.entities.get(entity_id).map(Entity::terms)
    }

    /// Adds a directly observed annotation
    ///
    /// The term is resolved via the alternate ids of the taxonomy. Terms
    /// that are not part of the taxonomy are kept verbatim; closure
    /// propagation skips and reports them. The entity is created if needed,
    /// the name of an existing entity is not changed.
    ///
    /// Returns `true` if the edge was newly added
    pub fn add_direct_annotation(&mut self, entity_id: &str, entity_name: &str, term_id: &str) -> bool {
        let term_id = match self.taxonomy.resolve_id(term_id) {
            Some(canonical) => canonical.clone(),
            None => TermId::from(term_id),
        };
        self.entities
            .entry(EntityId::from(entity_id))
            .or_insert_with_key(|id| Entity::new(id.clone(), entity_name));
        self.link(entity_id, term_id)
    }

    /// Adds a parsed association record if the filter accepts it
    ///
    /// Returns `true` if the edge was newly added
    pub fn add_annotation_record(&mut self, record: &AnnotationRecord, filter: &AnnotationFilter) -> bool {
        if !filter.accepts(record) {
            return false;
        }
        self.add_direct_annotation(
            record.entity_id.as_str(),
            &record.entity_name,
            record.term_id.as_str(),
        )
    }

    /// Links the entity and the term in both directions
    ///
    /// Missing entities are created with their id as name.
    ///
    /// Returns `true` if the edge was newly added
    pub fn add_edge(&mut self, entity_id: &str, term_id: &str) -> bool {
        self.entities
            .entry(EntityId::from(entity_id))
            .or_insert_with_key(|id| Entity::new(id.clone(), id.as_str()));
        self.link(entity_id, TermId::from(term_id))
    }

    /// Unlinks the entity and the term in both directions
    ///
    /// The term record is dropped once no entity is linked to it.
    /// Original terms of the entity are not changed.
    ///
    /// Returns `true` if the edge existed
    pub fn remove_edge(&mut self, entity_id: &str, term_id: &str) -> bool {
        let Some(entity) = self.entities.get_mut(entity_id) else {
            return false;
        };
        if !entity.unlink_term(term_id) {
            return false;
        }
        if let Some(entities) = self.terms.get_mut(term_id) {
            entities.remove(entity_id);
            if entities.is_empty() {
                self.terms.remove(term_id);
            }
        }
        true
    }

    /// Adds an observed term to the entity after closure propagation
    ///
    /// The term is added to the original terms and linked. Ancestors
    /// are not linked automatically.
    ///
    /// Returns `true` if anything changed
    pub fn add_entity_term_direct(&mut self, entity_id: &str, term_id: &str) -> bool {
        let term_id = match self.taxonomy.resolve_id(term_id) {
            Some(canonical) => canonical.clone(),
            None => TermId::from(term_id),
        };
        let added_original = self
            .entities
            .entry(EntityId::from(entity_id))
            .or_insert_with_key(|id| Entity::new(id.clone(), id.as_str()))
            .add_original_term(term_id.clone());
        let added_edge = self.link(entity_id, term_id);
        added_original || added_edge
    }

    /// Links every entity to all ancestors of its terms
    ///
    /// Before the first propagation of an entity, its linked terms are
    /// recorded as original terms. Propagating again only links ancestors
    /// that are missing, so the method is idempotent.
    ///
    /// Terms that are not part of the taxonomy are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{AnnotationGraph, Taxonomy, TermRecord};
    ///
    /// let taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "All"),
    ///     TermRecord::new("T:2", "A").with_parents(["T:1"]),
    /// ])
    /// .unwrap();
    ///
    /// let mut annotations = AnnotationGraph::new(taxonomy);
    /// annotations.add_direct_annotation("D:1", "Disease", "T:2");
    /// annotations.add_direct_annotation("D:1", "Disease", "X:1");
    ///
    /// let report = annotations.propagate_closure();
    /// assert_eq!(report.added_edges, 1);
    /// assert_eq!(report.unknown_terms, 1);
    ///
    /// let report = annotations.propagate_closure();
    /// assert_eq!(report.added_edges, 0);
    /// ```
    pub fn propagate_closure(&mut self) -> ClosureReport {
        let mut report = ClosureReport::default();
        let mut unknown: BTreeSet<TermId> = BTreeSet::new();
        let mut new_edges: Vec<(EntityId, TermId)> = Vec::new();

        for entity in self.entities.values_mut() {
            entity.snapshot_original();
            for term_id in entity.terms() {
                let ancestors = self.taxonomy.ancestors(term_id.as_str());
                if ancestors.is_empty() {
                    report.unknown_terms += 1;
                    unknown.insert(term_id.clone());
                    continue;
                }
                for ancestor in &ancestors {
                    if !entity.terms().contains(ancestor.as_str()) {
                        new_edges.push((entity.id().clone(), ancestor.clone()));
                    }
                }
            }
        }

        for term_id in &unknown {
            warn!("Term {} is not part of the taxonomy, skipping its ancestors", term_id);
        }
        for (entity_id, term_id) in new_edges {
            if self.link(entity_id.as_str(), term_id) {
                report.added_edges += 1;
            }
        }
        debug!(
            "Closure propagation added {} edges, {} unknown terms",
            report.added_edges, report.unknown_terms
        );
        report
    }

    /// Links entity and term in both directions, the entity must exist
    fn link(&mut self, entity_id: &str, term_id: TermId) -> bool {
        let Some(entity) = self.entities.get_mut(entity_id) else {
            return false;
        };
        if !entity.link_term(term_id.clone()) {
            return false;
        }
        self.terms
            .entry(term_id)
            .or_default()
            .insert(entity.id().clone());
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TermRecord;

    fn chain() -> Taxonomy {
        Taxonomy::load([
            TermRecord::new("T:1", "Root"),
            TermRecord::new("T:2", "A").with_parents(["T:1"]),
            TermRecord::new("T:3", "B")
                .with_parents(["T:2"])
                .with_alt_ids(["T:33"]),
            TermRecord::new("T:4", "C").with_parents(["T:1"]),
        ])
        .unwrap()
    }

    fn ids(group: &TermGroup) -> Vec<&str> {
        group.iter().map(TermId::as_str).collect()
    }

    #[test]
    fn edges_are_bidirectional() {
        let mut annotations = AnnotationGraph::new(chain());
        assert!(annotations.add_edge("D:1", "T:2"));
        assert!(!annotations.add_edge("D:1", "T:2"));
        assert!(annotations.entities_for("T:2").unwrap().contains("D:1"));
        assert!(annotations.terms_for("D:1").unwrap().contains("T:2"));
        assert_eq!(annotations.entity("D:1").unwrap().name(), "D:1");
        assert_eq!(annotations.n_edges(), 1);
    }

    #[test]
    fn remove_edge_drops_empty_terms() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_edge("D:1", "T:2");
        annotations.add_edge("D:2", "T:2");

        assert!(annotations.remove_edge("D:1", "T:2"));
        assert!(!annotations.remove_edge("D:1", "T:2"));
        assert_eq!(annotations.n_entities_for("T:2"), 1);

        assert!(annotations.remove_edge("D:2", "T:2"));
        assert!(annotations.entities_for("T:2").is_none());
        assert!(annotations.term_ids().is_empty());
        assert!(!annotations.remove_edge("D:9", "T:2"));
    }

    #[test]
    fn direct_annotation_resolves_alt_ids() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_direct_annotation("D:1", "Disease", "T:33");
        annotations.add_direct_annotation("D:1", "Renamed", "T:4");
        assert_eq!(ids(annotations.terms_for("D:1").unwrap()), vec!["T:3", "T:4"]);
        assert_eq!(annotations.entity("D:1").unwrap().name(), "Disease");
    }

    #[test]
    fn closure_links_ancestors() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_direct_annotation("D:1", "Disease 1", "T:3");
        annotations.add_direct_annotation("D:2", "Disease 2", "T:4");
        let report = annotations.propagate_closure();

        assert_eq!(report.added_edges, 3);
        assert_eq!(report.unknown_terms, 0);
        assert_eq!(ids(annotations.terms_for("D:1").unwrap()), vec!["T:1", "T:2", "T:3"]);
        assert_eq!(ids(annotations.terms_for("D:2").unwrap()), vec!["T:1", "T:4"]);
        assert_eq!(
            ids(annotations.entity("D:1").unwrap().original_terms()),
            vec!["T:3"]
        );

        let root_entities: Vec<&str> = annotations
            .entities_for("T:1")
            .unwrap()
            .iter()
            .map(EntityId::as_str)
            .collect();
        assert_eq!(root_entities, vec!["D:1", "D:2"]);
    }

    #[test]
    fn closure_is_idempotent() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_direct_annotation("D:1", "Disease 1", "T:3");
        annotations.propagate_closure();
        let before = annotations.clone();

        let report = annotations.propagate_closure();
        assert_eq!(report.added_edges, 0);
        for entity in before.entities() {
            let after = annotations.entity(entity.id().as_str()).unwrap();
            assert_eq!(entity, after);
        }
    }

    #[test]
    fn closure_keeps_originals_of_propagated_entities() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_direct_annotation("D:1", "Disease 1", "T:3");
        annotations.propagate_closure();

        annotations.add_direct_annotation("D:2", "Disease 2", "T:2");
        annotations.propagate_closure();

        assert_eq!(ids(annotations.entity("D:1").unwrap().original_terms()), vec!["T:3"]);
        assert_eq!(ids(annotations.entity("D:2").unwrap().original_terms()), vec!["T:2"]);
    }

    #[test]
    fn unknown_terms_are_kept_but_skipped() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_direct_annotation("D:1", "Disease 1", "X:1");
        let report = annotations.propagate_closure();
        assert_eq!(report.unknown_terms, 1);
        assert_eq!(report.added_edges, 0);
        assert_eq!(ids(annotations.terms_for("D:1").unwrap()), vec!["X:1"]);
    }

    #[test]
    fn direct_term_after_closure() {
        let mut annotations = AnnotationGraph::new(chain());
        annotations.add_direct_annotation("D:1", "Disease 1", "T:2");
        annotations.propagate_closure();

        assert!(annotations.add_entity_term_direct("D:1", "T:4"));
        assert!(!annotations.add_entity_term_direct("D:1", "T:4"));
        let entity = annotations.entity("D:1").unwrap();
        assert_eq!(ids(entity.original_terms()), vec!["T:2", "T:4"]);
        assert!(entity.terms().contains("T:4"));
    }

    #[test]
    fn filtered_records() {
        let mut annotations = AnnotationGraph::new(chain());
        let filter = AnnotationFilter::default().with_evidence_codes(["IDA"]);

        let good = AnnotationRecord::new("G:1", "Gene 1", "T:2").with_evidence("IDA");
        let bad = AnnotationRecord::new("G:2", "Gene 2", "T:2").with_evidence("IEA");
        assert!(annotations.add_annotation_record(&good, &filter));
        assert!(!annotations.add_annotation_record(&bad, &filter));
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations.entity("G:1").unwrap().name(), "Gene 1");
    }
}
