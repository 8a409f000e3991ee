//! Bottom-up reduction of a taxonomy
//!
//! The [`TaxonomyReducer`] removes leaf terms level by level as long as
//! every entity that was annotated with a removed term can still be found
//! by its own terms as well as before.
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::annotations::{AnnotationGraph, EntityId};
use crate::predictor::Predictor;
use crate::similarity::{Builtins, Similarity};
use crate::taxonomy::Taxonomy;
use crate::term::{TermGroup, TermId};
use crate::DEFAULT_RANK_LIMIT;

/// The worst acceptable rank of each entity
///
/// Entities without an explicit limit use [`DEFAULT_RANK_LIMIT`].
///
/// # Examples
///
/// ```
/// use ontosim::RankLimits;
///
/// let limits: RankLimits = [("D:1", 3), ("D:2", 1)].into_iter().collect();
/// assert_eq!(limits.get("D:1"), 3);
/// assert_eq!(limits.get("D:99"), ontosim::DEFAULT_RANK_LIMIT);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankLimits {
    limits: HashMap<EntityId, usize>,
}

impl RankLimits {
    /// Constructs an empty set of limits, every entity must stay at rank 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the rank of every entity when searching all entities with its original terms
    ///
    /// Entities that do not match their own terms get no explicit limit.
    pub fn global<S: Similarity>(predictor: &Predictor<'_, S>) -> Self {
        predictor
            .annotations()
            .entities()
            .filter_map(|entity| {
                predictor
                    .match_rank(entity.original_terms(), entity.id().as_str())
                    .map(|rank| (entity.id().clone(), rank))
            })
            .collect()
    }

    /// Records the rank of every entity among the entities that share one of its original terms
    ///
    /// See [`Predictor::own_pool_rank`]
    pub fn pool<S: Similarity>(predictor: &Predictor<'_, S>) -> Self {
        predictor
            .annotations()
            .entities()
            .map(|entity| {
                let rank = predictor
                    .own_pool_rank(entity.id().as_str())
                    .unwrap_or(DEFAULT_RANK_LIMIT);
                (entity.id().clone(), rank)
            })
            .collect()
    }

    /// Sets the limit of an entity, returns the previous limit
    pub fn insert<E: Into<EntityId>>(&mut self, entity_id: E, rank: usize) -> Option<usize> {
        self.limits.insert(entity_id.into(), rank)
    }

    /// The limit of the entity
    pub fn get(&self, entity_id: &str) -> usize {
        self.limits
            .get(entity_id)
            .copied()
            .unwrap_or(DEFAULT_RANK_LIMIT)
    }

    /// Returns `true` if the entity has an explicit limit
    pub fn contains(&self, entity_id: &str) -> bool {
        self.limits.contains_key(entity_id)
    }

    /// Iterates all explicit limits in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, usize)> {
        self.limits.iter().map(|(id, rank)| (id, *rank))
    }

    /// Returns the number of explicit limits
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    /// Returns `true` if no explicit limit is set
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl<E: Into<EntityId>> FromIterator<(E, usize)> for RankLimits {
    fn from_iter<T: IntoIterator<Item = (E, usize)>>(iter: T) -> Self {
        Self {
            limits: iter.into_iter().map(|(id, rank)| (id.into(), rank)).collect(),
        }
    }
}

/// Settings of a [`TaxonomyReducer`]
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ontosim::ReducerConfig;
/// use ontosim::similarity::Builtins;
///
/// let config = ReducerConfig::default()
///     .with_similarity(Builtins::Cumulative)
///     .with_time_limit(Duration::from_secs(3600));
/// assert!(config.deadline().is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReducerConfig {
    similarity: Builtins,
    deadline: Option<Instant>,
}

impl ReducerConfig {
    /// Uses the given term similarity for all scores
    pub fn with_similarity(mut self, similarity: Builtins) -> Self {
        self.similarity = similarity;
        self
    }

    /// Stops the reduction before the next level once `deadline` has passed
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops the reduction before the next level once `limit` has elapsed from now
    pub fn with_time_limit(self, limit: Duration) -> Self {
        self.with_deadline(Instant::now() + limit)
    }

    /// The term similarity
    pub fn similarity(&self) -> Builtins {
        self.similarity
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// The progress of a [`TaxonomyReducer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReducerState {
    /// The terms of the next level that are candidates for removal
    Processing(TermGroup),
    /// No candidates are left or the deadline has passed
    Done,
}

/// The result of a [`TaxonomyReducer`]
#[derive(Debug, Clone)]
pub struct Reduction {
    /// The reduced annotation graph, including the reduced taxonomy
    pub annotations: AnnotationGraph,
    /// Number of removed terms
    pub removed_nodes: usize,
    /// Number of removed parent and child links
    pub removed_arcs: usize,
    /// Number of removed entity - term edges
    pub removed_annotations: usize,
    /// Number of processed levels
    pub levels: usize,
    /// `false` if the reduction was stopped by the deadline
    pub completed: bool,
}

impl Reduction {
    /// The reduced taxonomy
    pub fn taxonomy(&self) -> &Taxonomy {
        self.annotations.taxonomy()
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Greedy, level-synchronous removal of leaf terms
///
/// The reducer starts with all leaves of the taxonomy. Within a level, the
/// least informative terms are tried first. For each term:
///
/// 1. All entities linked to the term are unlinked. If the term was one of
///    their original terms, it is replaced by the term's parents.
/// 2. Each of those entities is searched with its (changed) original terms
///    among the entities linked to the term or to one of its parents.
///    If any entity ranks worse than its [`RankLimits`] allow, all changes
///    are undone.
/// 3. Each of those entities is also searched among all entities
///    (see [`Predictor::match_rank`]). If it no longer matches itself, or
///    ranks worse than both its limit and its current rank, all changes are
///    undone.
/// 4. Otherwise the term is removed from the taxonomy. Parents that became
///    leaves are candidates of the next level.
///
/// Terms that no entity is linked to are always removed. The root term is
/// never removed.
///
/// # Rank guarantees
///
/// Only the entities linked to the removed term are checked. With
/// [`Builtins::Resnik`] and a closure-propagated graph, removing a leaf does
/// not change the score of any other entity for any query that does not
/// contain the leaf, so the global rank of unchecked entities stays as it
/// is. With limits from [`RankLimits::global`], every entity with a limit
/// therefore still ranks within it after [`TaxonomyReducer::run`].
///
/// The rank of an unchecked entity within its own pool
/// ([`Predictor::own_pool_rank`]) can still change, since its pool grows
/// or shrinks with the originals of other entities. [`Builtins::Cumulative`]
/// scores depend on shared entities and give no global guarantee either.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Processing: leaves
///     Processing --> Processing: step() / parents that became leaves
///     Processing --> Done: no candidates left
///     Processing --> Done: deadline passed
///     Done --> [*]
/// ```
///
/// # Examples
///
/// ```
/// use ontosim::{AnnotationGraph, RankLimits, Taxonomy, TaxonomyReducer, TermRecord};
///
/// let taxonomy = Taxonomy::load([
///     TermRecord::new("T:1", "All"),
///     TermRecord::new("T:2", "Abnormal heart").with_parents(["T:1"]),
///     TermRecord::new("T:3", "Abnormal heart valve").with_parents(["T:2"]),
///     TermRecord::new("T:4", "Abnormal lung").with_parents(["T:1"]),
/// ])
/// .unwrap();
///
/// let mut annotations = AnnotationGraph::new(taxonomy);
/// annotations.add_direct_annotation("D:1", "Heart disease", "T:2");
/// annotations.add_direct_annotation("D:2", "Lung disease", "T:4");
/// annotations.propagate_closure();
///
/// let reduction = TaxonomyReducer::new(annotations, RankLimits::new()).run();
///
/// // nobody needs the heart valve
/// assert!(!reduction.taxonomy().contains("T:3"));
/// assert!(reduction.completed);
/// ```
#[derive(Debug)]
pub struct TaxonomyReducer {
    annotations: AnnotationGraph,
    rank_limits: RankLimits,
    config: ReducerConfig,
    state: ReducerState,
    removed_nodes: usize,
    removed_arcs: usize,
    removed_annotations: usize,
    levels: usize,
    expired: bool,
}

impl TaxonomyReducer {
    /// Constructs a reducer with the default [`ReducerConfig`]
    ///
    /// The annotation graph should be closure-propagated.
    pub fn new(annotations: AnnotationGraph, rank_limits: RankLimits) -> Self {
        Self::with_config(annotations, rank_limits, ReducerConfig::default())
    }

    /// Constructs a reducer with custom settings
    pub fn with_config(annotations: AnnotationGraph, rank_limits: RankLimits, config: ReducerConfig) -> Self {
        let taxonomy = annotations.taxonomy();
        let mut leaves = taxonomy.leaves();
        leaves.remove(taxonomy.root_id().as_str());
        let state = if leaves.is_empty() {
            ReducerState::Done
        } else {
            ReducerState::Processing(leaves)
        };
        Self {
            annotations,
            rank_limits,
            config,
            state,
            removed_nodes: 0,
            removed_arcs: 0,
            removed_annotations: 0,
            levels: 0,
            expired: false,
        }
    }

    /// The current state
    pub fn state(&self) -> &ReducerState {
        &self.state
    }

    /// The current annotation graph
    pub fn annotations(&self) -> &AnnotationGraph {
        &self.annotations
    }

    /// Processes one level of candidates
    pub fn step(&mut self) -> &ReducerState {
        let ReducerState::Processing(level) = std::mem::replace(&mut self.state, ReducerState::Done) else {
            return &self.state;
        };
        if self.config.deadline.map_or(false, |deadline| Instant::now() >= deadline) {
            info!("Deadline passed, stopping before level {}", self.levels + 1);
            self.expired = true;
            return &self.state;
        }

        let candidates = self.sorted_candidates(level);
        debug!("Level {}: {} candidates", self.levels + 1, candidates.len());

        let mut next_level = TermGroup::new();
        for term_id in &candidates {
            if *term_id == *self.annotations.taxonomy().root_id() {
                continue;
            }
            let Some(term) = self.annotations.taxonomy().get(term_id.as_str()) else {
                continue;
            };
            let parents = term.parents().clone();
            let n_arcs = parents.len() + term.children().len();

            let Some(n_annotations) = self.try_unlink(term_id, &parents) else {
                trace!("Keeping {}", term_id);
                continue;
            };

            trace!("Removing {}", term_id);
            self.removed_nodes += 1;
            self.removed_arcs += n_arcs;
            self.removed_annotations += n_annotations;

            let taxonomy = self.annotations.taxonomy();
            for parent in &parents {
                if parent == taxonomy.root_id() {
                    continue;
                }
                let becomes_leaf = taxonomy.get(parent.as_str()).map_or(false, |p| {
                    p.children().len() == 1 && p.children().contains(term_id.as_str())
                });
                if becomes_leaf {
                    next_level.insert(parent);
                }
            }
            self.annotations.taxonomy_mut().remove_node(term_id.as_str());
        }

        self.levels += 1;
        debug!(
            "Level {} done: {} terms removed in total, {} remaining",
            self.levels,
            self.removed_nodes,
            self.annotations.taxonomy().len()
        );
        if !next_level.is_empty() {
            self.state = ReducerState::Processing(next_level);
        }
        &self.state
    }

    /// Processes all levels and returns the result
    pub fn run(mut self) -> Reduction {
        while let ReducerState::Processing(_) = self.step() {}
        info!(
            "Removed {} terms, {} arcs and {} annotations in {} levels",
            self.removed_nodes, self.removed_arcs, self.removed_annotations, self.levels
        );
        Reduction {
            annotations: self.annotations,
            removed_nodes: self.removed_nodes,
            removed_arcs: self.removed_arcs,
            removed_annotations: self.removed_annotations,
            levels: self.levels,
            completed: !self.expired,
        }
    }

    /// Orders the candidates by information content, least informative first
    fn sorted_candidates(&self, level: TermGroup) -> Vec<TermId> {
        let predictor = Predictor::with_similarity(&self.annotations, self.config.similarity);
        let mut candidates: Vec<(f64, TermId)> = level
            .into_iter()
            .map(|id| (predictor.specificity(id.as_str()), id))
            .collect();
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        candidates.into_iter().map(|(_, id)| id).collect()
    }

    /// Tentatively unlinks the term from all its entities
    ///
    /// Returns the number of unlinked entities if every one of them stays
    /// within its rank limit. Otherwise the graph is restored and `None`
    /// is returned.
    fn try_unlink(&mut self, term_id: &TermId, parents: &TermGroup) -> Option<usize> {
        let related: Vec<EntityId> = self
            .annotations
            .entities_for(term_id.as_str())
            .map(|entities| entities.iter().cloned().collect())
            .unwrap_or_default();
        if related.is_empty() {
            return Some(0);
        }

        let current_ranks: Vec<Option<usize>> = {
            let predictor = Predictor::with_similarity(&self.annotations, self.config.similarity);
            related
                .iter()
                .map(|entity_id| {
                    self.annotations
                        .entity(entity_id.as_str())
                        .and_then(|entity| predictor.match_rank(entity.original_terms(), entity_id.as_str()))
                })
                .collect()
        };

        let mut snapshots: Vec<(EntityId, TermGroup)> = Vec::with_capacity(related.len());
        for entity_id in &related {
            self.annotations.remove_edge(entity_id.as_str(), term_id.as_str());
            if let Some(entity) = self.annotations.entity_mut(entity_id.as_str()) {
                let original = entity.original_terms().clone();
                if original.contains(term_id.as_str()) {
                    let mut substituted = original.clone();
                    substituted.remove(term_id.as_str());
                    entity.set_original_terms(&substituted | parents);
                }
                snapshots.push((entity_id.clone(), original));
            }
        }

        if self.ranks_are_kept(&related, parents) && self.matches_are_kept(&related, &current_ranks) {
            return Some(related.len());
        }

        for (entity_id, original) in snapshots {
            self.annotations.add_edge(entity_id.as_str(), term_id.as_str());
            if let Some(entity) = self.annotations.entity_mut(entity_id.as_str()) {
                entity.set_original_terms(original);
            }
        }
        None
    }

    /// Checks the rank of every related entity within the comparison pool
    fn ranks_are_kept(&self, related: &[EntityId], parents: &TermGroup) -> bool {
        let mut pool: BTreeSet<&EntityId> = related.iter().collect();
        for parent in parents {
            if let Some(entities) = self.annotations.entities_for(parent.as_str()) {
                pool.extend(entities);
            }
        }

        let predictor = Predictor::with_similarity(&self.annotations, self.config.similarity);
        related.iter().all(|entity_id| {
            let Some(entity) = self.annotations.entity(entity_id.as_str()) else {
                return true;
            };
            let limit = self.rank_limits.get(entity_id.as_str());
            let rank = predictor.rank_in_pool(entity.original_terms(), entity_id.as_str(), pool.iter().copied());
            if rank > limit {
                trace!("{} would drop to rank {} (limit {})", entity_id, rank, limit);
                return false;
            }
            true
        })
    }

    /// Checks that every related entity still finds itself among all entities
    ///
    /// `current_ranks` are the global ranks before unlinking, in the order of `related`.
    fn matches_are_kept(&self, related: &[EntityId], current_ranks: &[Option<usize>]) -> bool {
        let predictor = Predictor::with_similarity(&self.annotations, self.config.similarity);
        related.iter().zip(current_ranks).all(|(entity_id, current)| {
            let Some(entity) = self.annotations.entity(entity_id.as_str()) else {
                return true;
            };
            match predictor.match_rank(entity.original_terms(), entity_id.as_str()) {
                Some(rank) => {
                    let limit = self.rank_limits.get(entity_id.as_str()).max(current.unwrap_or(0));
                    if rank > limit {
                        trace!("{} would drop to global rank {} (limit {})", entity_id, rank, limit);
                        return false;
                    }
                    true
                }
                None if current.is_some() => {
                    trace!("{} would no longer match its own terms", entity_id);
                    false
                }
                None => true,
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::TermRecord;

    fn group(ids: &[&str]) -> TermGroup {
        ids.iter().copied().collect()
    }

    ///         R
    ///       /   \
    ///      A     C
    ///     / \    |
    ///    B   E   D
    fn corpus() -> AnnotationGraph {
        let taxonomy = Taxonomy::load([
            TermRecord::new("R", "Root"),
            TermRecord::new("A", "A").with_parents(["R"]),
            TermRecord::new("B", "B").with_parents(["A"]),
            TermRecord::new("E", "E").with_parents(["A"]),
            TermRecord::new("C", "C").with_parents(["R"]),
            TermRecord::new("D", "D").with_parents(["C"]),
        ])
        .unwrap();
        let mut annotations = AnnotationGraph::new(taxonomy);
        annotations.add_direct_annotation("E:1", "Entity 1", "B");
        annotations.add_direct_annotation("E:2", "Entity 2", "E");
        annotations.add_direct_annotation("E:3", "Entity 3", "D");
        annotations.add_direct_annotation("E:4", "Entity 4", "A");
        annotations.add_direct_annotation("E:4", "Entity 4", "D");
        annotations.propagate_closure();
        annotations
    }

    #[test]
    fn rank_limits() {
        let annotations = corpus();
        let predictor = Predictor::new(&annotations);

        let limits = RankLimits::pool(&predictor);
        assert_eq!(limits.len(), 4);
        assert_eq!(limits.get("E:3"), 2);
        assert_eq!(limits.get("E:4"), 1);
        assert_eq!(limits.get("E:99"), 1);

        let limits = RankLimits::global(&predictor);
        assert_eq!(limits.get("E:1"), 1);
        assert_eq!(limits.get("E:4"), 1);

        let mut limits = RankLimits::new();
        assert!(limits.is_empty());
        assert_eq!(limits.insert("E:1", 5), None);
        assert_eq!(limits.insert("E:1", 2), Some(5));
        assert_eq!(limits.get("E:1"), 2);
    }

    #[test]
    fn unannotated_leaves_are_removed() {
        let taxonomy = Taxonomy::load([
            TermRecord::new("R", "Root"),
            TermRecord::new("A", "A").with_parents(["R"]),
            TermRecord::new("U", "Unused").with_parents(["A"]),
            TermRecord::new("V", "Unused too").with_parents(["R"]),
        ])
        .unwrap();
        let mut annotations = AnnotationGraph::new(taxonomy);
        annotations.add_direct_annotation("E:1", "Entity", "A");
        annotations.propagate_closure();

        let mut reducer = TaxonomyReducer::new(annotations, RankLimits::new());
        assert_eq!(reducer.state(), &ReducerState::Processing(group(&["U", "V"])));

        reducer.step();
        assert!(!reducer.annotations().taxonomy().contains("U"));
        assert!(!reducer.annotations().taxonomy().contains("V"));
        assert_eq!(reducer.state(), &ReducerState::Processing(group(&["A"])));
    }

    #[test]
    fn rejected_removal_is_rolled_back() {
        let annotations = corpus();
        let before = annotations.clone();

        let mut reducer = TaxonomyReducer::new(annotations, RankLimits::new());
        reducer.step();

        // E:4 would outrank E:3 if D was replaced by C
        let after = reducer.annotations();
        assert!(after.taxonomy().contains("D"));
        for id in ["E:3", "E:4"] {
            assert_eq!(after.entity(id), before.entity(id));
        }
        assert_eq!(after.entities_for("D"), before.entities_for("D"));
        assert_eq!(after.entities_for("C"), before.entities_for("C"));

        // E:2 would tie with E:1 on A and lose the tie
        assert!(after.taxonomy().contains("E"));
        assert_eq!(after.entity("E:2"), before.entity("E:2"));

        assert!(!after.taxonomy().contains("B"));
        assert_eq!(reducer.state(), &ReducerState::Done);
    }

    #[test]
    fn full_reduction() {
        let reduction = TaxonomyReducer::new(corpus(), RankLimits::new()).run();
        let taxonomy = reduction.taxonomy();

        let remaining: Vec<&str> = taxonomy.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(remaining, vec!["A", "C", "D", "E", "R"]);
        assert_eq!(reduction.removed_nodes, 1);
        assert_eq!(reduction.removed_arcs, 1);
        assert_eq!(reduction.removed_annotations, 1);
        assert_eq!(reduction.levels, 1);
        assert!(reduction.completed);

        let annotations = &reduction.annotations;
        let original = |id: &str| annotations.entity(id).unwrap().original_terms().clone();
        assert_eq!(original("E:1"), group(&["A"]));
        assert_eq!(original("E:2"), group(&["E"]));
        assert_eq!(original("E:3"), group(&["D"]));
        assert_eq!(original("E:4"), group(&["A", "D"]));
        assert_eq!(annotations.terms_for("E:1").unwrap(), &group(&["A", "R"]));
    }

    ///      R
    ///     / \
    ///    A   C
    ///    |
    ///    B
    fn shallow_corpus() -> AnnotationGraph {
        let taxonomy = Taxonomy::load([
            TermRecord::new("R", "Root"),
            TermRecord::new("A", "A").with_parents(["R"]),
            TermRecord::new("B", "B").with_parents(["A"]),
            TermRecord::new("C", "C").with_parents(["R"]),
        ])
        .unwrap();
        let mut annotations = AnnotationGraph::new(taxonomy);
        annotations.add_direct_annotation("E:1", "Entity 1", "B");
        annotations.add_direct_annotation("E:2", "Entity 2", "C");
        annotations.propagate_closure();
        annotations
    }

    #[test]
    fn entities_are_not_reduced_to_the_root() {
        let annotations = shallow_corpus();
        let limits = RankLimits::global(&Predictor::new(&annotations));
        assert_eq!(limits.get("E:1"), 1);
        assert_eq!(limits.get("E:2"), 1);

        let reduction = TaxonomyReducer::new(annotations, limits).run();
        let remaining: Vec<&str> = reduction.taxonomy().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(remaining, vec!["A", "C", "R"]);
        assert_eq!(reduction.removed_nodes, 1);
        assert_eq!(reduction.levels, 2);

        let annotations = &reduction.annotations;
        let e1 = annotations.entity("E:1").unwrap().original_terms();
        let e2 = annotations.entity("E:2").unwrap().original_terms();
        assert_eq!(e1, &group(&["A"]));
        assert_eq!(e2, &group(&["C"]));

        let predictor = Predictor::new(annotations);
        assert_eq!(predictor.match_rank(e1, "E:1"), Some(1));
        assert_eq!(predictor.match_rank(e2, "E:2"), Some(1));
    }

    #[test]
    fn global_limits_hold_after_reduction() {
        for annotations in [corpus(), shallow_corpus()] {
            let limits = RankLimits::global(&Predictor::new(&annotations));
            assert!(!limits.is_empty());

            let reduction = TaxonomyReducer::new(annotations, limits.clone()).run();
            let predictor = Predictor::new(&reduction.annotations);
            for (id, limit) in limits.iter() {
                let entity = reduction.annotations.entity(id.as_str()).unwrap();
                let rank = predictor.match_rank(entity.original_terms(), id.as_str());
                assert!(rank.map_or(false, |r| r <= limit), "{} ranks {:?}, limit {}", id, rank, limit);
            }
        }
    }

    #[test]
    fn global_limits_skip_unmatched_entities() {
        let taxonomy = Taxonomy::load([
            TermRecord::new("R", "Root"),
            TermRecord::new("A", "A").with_parents(["R"]),
        ])
        .unwrap();
        let mut annotations = AnnotationGraph::new(taxonomy);
        annotations.add_direct_annotation("E:1", "Entity 1", "A");
        annotations.add_direct_annotation("E:2", "Entity 2", "R");
        annotations.propagate_closure();

        let limits = RankLimits::global(&Predictor::new(&annotations));
        assert_eq!(limits.len(), 1);
        assert!(limits.contains("E:1"));
        assert!(!limits.contains("E:2"));
    }

    #[test]
    fn originals_only_reference_remaining_terms() {
        let reduction = TaxonomyReducer::new(corpus(), RankLimits::new()).run();
        let taxonomy = reduction.taxonomy();
        for entity in reduction.annotations.entities() {
            for term in entity.original_terms() {
                assert!(taxonomy.contains(term.as_str()), "{} has removed term {}", entity.id(), term);
            }
            for term in entity.terms() {
                assert!(taxonomy.contains(term.as_str()));
            }
        }
    }

    #[test]
    fn baseline_limits_allow_removal() {
        let annotations = corpus();
        let limits = RankLimits::pool(&Predictor::new(&annotations));

        let mut reducer = TaxonomyReducer::new(annotations, limits);
        reducer.step();
        assert!(!reducer.annotations().taxonomy().contains("D"));
        let entity = reducer.annotations().entity("E:4").unwrap();
        assert_eq!(entity.original_terms(), &group(&["A", "C"]));
    }

    #[test]
    fn root_is_never_removed() {
        let taxonomy = Taxonomy::load([TermRecord::new("R", "Root")]).unwrap();
        let annotations = AnnotationGraph::new(taxonomy);
        let reduction = TaxonomyReducer::new(annotations, RankLimits::new()).run();
        assert_eq!(reduction.taxonomy().len(), 1);
        assert_eq!(reduction.levels, 0);
        assert!(reduction.completed);
    }

    #[test]
    fn deadline() {
        let config = ReducerConfig::default().with_deadline(Instant::now());
        let reduction = TaxonomyReducer::with_config(corpus(), RankLimits::new(), config).run();
        assert!(!reduction.completed);
        assert_eq!(reduction.removed_nodes, 0);
        assert_eq!(reduction.levels, 0);
        assert_eq!(reduction.taxonomy().len(), 6);
    }

    #[test]
    fn cumulative_reduction() {
        let config = ReducerConfig::default().with_similarity(Builtins::Cumulative);
        let reduction = TaxonomyReducer::with_config(corpus(), RankLimits::new(), config).run();
        assert!(reduction.completed);
        assert!(reduction.taxonomy().contains("R"));
        assert!(reduction.removed_nodes > 0);
    }
}
