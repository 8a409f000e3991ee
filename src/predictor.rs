//! Information content based scoring and ranking of entities
//!
//! The [`Predictor`] answers all questions about a (read-only)
//! [`AnnotationGraph`]: how informative a term is, how similar two
//! sets of terms are and which entities match a query best.
use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use crate::annotations::{AnnotationGraph, EntityId};
use crate::matrix::Matrix;
use crate::similarity::{Builtins, Similarity};
use crate::term::{TermGroup, TermId};
use crate::count_to_f64;

/// A scored match of an entity or a term
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<T> {
    id: T,
    name: String,
    score: f64,
}

impl<T> SearchResult<T> {
    /// Constructs a new result
    pub fn new(id: T, name: &str, score: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            score,
        }
    }

    /// The id of the matched entity or term
    pub fn id(&self) -> &T {
        &self.id
    }

    /// The display name of the matched entity or term
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The score of the match
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Sorts by score, highest first. Ties are ordered by ascending id.
fn sort_results<T: Ord>(results: &mut [SearchResult<T>]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
}

/// The information content of a term
///
/// `IC(t) = -ln(n_t / N)` where `n_t` is the number of entities linked to
/// `t` and `N` the number of all entities. Unknown and unannotated terms
/// have an information content of 0.
pub(crate) fn information_content(annotations: &AnnotationGraph, term_id: &str) -> f64 {
    let term_id = annotations
        .taxonomy()
        .resolve_id(term_id)
        .map_or(term_id, TermId::as_str);
    let n_term = annotations.n_entities_for(term_id);
    let total = annotations.len();
    if n_term == 0 || total == 0 {
        return 0.0;
    }
    -(count_to_f64(n_term) / count_to_f64(total)).ln()
}

/// The term with the highest information content, ties are broken by the smallest id
pub(crate) fn most_informative<'g>(
    annotations: &AnnotationGraph,
    terms: &'g TermGroup,
) -> Option<&'g TermId> {
    let mut best: Option<(&TermId, f64)> = None;
    for term in terms {
        let ic = information_content(annotations, term.as_str());
        match best {
            Some((_, max)) if ic <= max => {}
            _ => best = Some((term, ic)),
        }
    }
    best.map(|(term, _)| term)
}

/// The most informative common ancestor of two terms
pub(crate) fn mica(annotations: &AnnotationGraph, a: &str, b: &str) -> Option<TermId> {
    let taxonomy = annotations.taxonomy();
    let common = &taxonomy.ancestors(a) & &taxonomy.ancestors(b);
    most_informative(annotations, &common).cloned()
}

/// Scores and ranks entities of an [`AnnotationGraph`]
///
/// The predictor borrows the annotation graph, so the graph can't be
/// changed while a predictor exists. All results are computed from the
/// current state of the graph, nothing is cached.
///
/// The term - term similarity defaults to [`Builtins::Resnik`].
///
/// # Examples
///
/// ```
/// use ontosim::{AnnotationGraph, Predictor, Taxonomy, TermGroup, TermRecord};
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
/// annotations.add_direct_annotation("D:1", "Valve disease", "T:3");
/// annotations.add_direct_annotation("D:2", "Heart disease", "T:2");
/// annotations.add_direct_annotation("D:3", "Lung disease", "T:4");
/// annotations.propagate_closure();
///
/// let predictor = Predictor::new(&annotations);
/// assert!(predictor.information_content("T:3") > predictor.information_content("T:2"));
/// assert_eq!(predictor.information_content("T:1"), 0.0);
///
/// let query: TermGroup = ["T:3"].into_iter().collect();
/// let matches = predictor.ranked_matches(&query);
/// assert_eq!(matches.len(), 2);
/// assert_eq!(matches[0].name(), "Valve disease");
/// assert_eq!(predictor.match_rank(&query, "D:2"), Some(2));
/// assert_eq!(predictor.match_rank(&query, "D:3"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'a, S = Builtins> {
    annotations: &'a AnnotationGraph,
    similarity: S,
}

impl<'a> Predictor<'a, Builtins> {
    /// Constructs a new predictor using the [`Builtins::Resnik`] similarity
    pub fn new(annotations: &'a AnnotationGraph) -> Self {
        Self::with_similarity(annotations, Builtins::default())
    }
}

impl<'a, S: Similarity> Predictor<'a, S> {
    /// Constructs a new predictor using a custom term - term similarity
    pub fn with_similarity(annotations: &'a AnnotationGraph, similarity: S) -> Self {
        Self {
            annotations,
            similarity,
        }
    }

    /// The annotation graph used for all calculations
    pub fn annotations(&self) -> &'a AnnotationGraph {
        self.annotations
    }

    /// The information content of the term
    ///
    /// `IC(t) = -ln(n_t / N)` where `n_t` is the number of entities linked
    /// to the term and `N` is the number of all entities.
    /// Unknown terms, terms without any linked entity and all terms of an
    /// empty graph have an IC of 0.
    pub fn information_content(&self, term_id: &str) -> f64 {
        information_content(self.annotations, term_id)
    }

    /// How specific a term is, the same as [`Predictor::information_content`]
    pub fn specificity(&self, term_id: &str) -> f64 {
        self.information_content(term_id)
    }

    /// The most informative common ancestor of the two terms
    ///
    /// Returns the common ancestor (which includes the terms themselves)
    /// with the highest information content. If several ancestors have the
    /// same information content, the one with the smallest id is returned.
    ///
    /// Returns `None` if the terms have no common ancestor, e.g. because
    /// one of them is not part of the taxonomy.
    pub fn mica(&self, a: &str, b: &str) -> Option<TermId> {
        mica(self.annotations, a, b)
    }

    /// The similarity of two terms
    pub fn term_similarity(&self, a: &str, b: &str) -> f64 {
        self.similarity.calculate(self.annotations, a, b)
    }

    fn score_matrix(&self, query: &TermGroup, reference: &TermGroup) -> Vec<f64> {
        let mut scores = Vec::with_capacity(query.len() * reference.len());
        for q in query {
            for r in reference {
                scores.push(self.term_similarity(q.as_str(), r.as_str()));
            }
        }
        scores
    }

    /// How well `reference` explains `query`
    ///
    /// For every query term, the best matching reference term is used.
    /// The result is the average of those best scores over all query terms.
    /// An empty query scores 0.
    pub fn asymmetric_similarity(&self, query: &TermGroup, reference: &TermGroup) -> f64 {
        if query.is_empty() {
            return 0.0;
        }
        let scores = self.score_matrix(query, reference);
        Matrix::new(query.len(), reference.len(), &scores).row_max_mean()
    }

    /// The mean of both asymmetric similarities
    ///
    /// `0.5 * asym(a, b) + 0.5 * asym(b, a)`
    pub fn symmetric_similarity(&self, a: &TermGroup, b: &TermGroup) -> f64 {
        let scores = self.score_matrix(a, b);
        let matrix = Matrix::new(a.len(), b.len(), &scores);
        if matrix.is_empty() {
            return 0.0;
        }
        0.5 * matrix.row_max_mean() + 0.5 * matrix.col_max_mean()
    }

    /// Either the symmetric or the asymmetric similarity
    pub fn similarity(&self, query: &TermGroup, reference: &TermGroup, symmetric: bool) -> f64 {
        if symmetric {
            self.symmetric_similarity(query, reference)
        } else {
            self.asymmetric_similarity(query, reference)
        }
    }

    /// Calculates the similarity of many (query, reference) pairs
    ///
    /// The scores are returned in the order of `pairs`
    pub fn score_pairs(&self, pairs: &[(TermGroup, TermGroup)], symmetric: bool) -> Vec<f64> {
        pairs
            .iter()
            .map(|(query, reference)| self.similarity(query, reference, symmetric))
            .collect()
    }

    /// How well the original terms of the entity explain the query, relative to the entity itself
    ///
    /// `asym(query, original) / asym(original, original)`
    ///
    /// Returns 0 if the entity is unknown or its self-similarity is 0.
    pub fn match_score(&self, query: &TermGroup, entity_id: &str) -> f64 {
        let Some(entity) = self.annotations.entity(entity_id) else {
            return 0.0;
        };
        let original = entity.original_terms();
        let self_similarity = self.asymmetric_similarity(original, original);
        if self_similarity <= 0.0 {
            return 0.0;
        }
        self.asymmetric_similarity(query, original) / self_similarity
    }

    /// All entities matching the query, best match first
    ///
    /// Each entity is scored by the asymmetric similarity of the query to the
    /// entity's original terms. Only entities with a score above 0 are
    /// returned. Entities with the same score are ordered by id.
    pub fn ranked_matches(&self, query: &TermGroup) -> Vec<SearchResult<EntityId>> {
        let mut results: Vec<SearchResult<EntityId>> = self
            .annotations
            .entities()
            .filter_map(|entity| {
                let score = self.asymmetric_similarity(query, entity.original_terms());
                if score > 0.0 {
                    Some(SearchResult::new(entity.id().clone(), entity.name(), score))
                } else {
                    None
                }
            })
            .collect();
        sort_results(&mut results);
        trace!("{} entities match the query", results.len());
        results
    }

    /// The 1-based position of the entity in [`Predictor::ranked_matches`]
    ///
    /// Returns `None` if the entity does not match the query.
    pub fn match_rank(&self, query: &TermGroup, entity_id: &str) -> Option<usize> {
        self.ranked_matches(query)
            .iter()
            .position(|result| result.id() == entity_id)
            .map(|idx| idx + 1)
    }

    /// The 1-based position of the entity, only if it is ranked within `limit`
    pub fn match_rank_within(&self, query: &TermGroup, entity_id: &str, limit: usize) -> Option<usize> {
        self.match_rank(query, entity_id)
            .filter(|rank| *rank <= limit)
    }

    /// Terms that distinguish the matches of the query from each other
    ///
    /// For every term linked to a matching entity that is not part of the
    /// query, the scores of those matches are summed up. The result
    /// is that sum divided by the squared number of matches linked to the
    /// term, so that rare terms rank high.
    ///
    /// If even the rarest term is linked to more than half of the matches,
    /// no term is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::{AnnotationGraph, Predictor, Taxonomy, TermGroup, TermRecord};
    ///
    /// let taxonomy = Taxonomy::load([
    ///     TermRecord::new("T:1", "All"),
    ///     TermRecord::new("T:2", "Abnormal heart").with_parents(["T:1"]),
    ///     TermRecord::new("T:3", "Abnormal lung").with_parents(["T:1"]),
    ///     TermRecord::new("T:4", "Abnormal kidney").with_parents(["T:1"]),
    /// ])
    /// .unwrap();
    ///
    /// let mut annotations = AnnotationGraph::new(taxonomy);
    /// annotations.add_direct_annotation("D:1", "Heart and lung", "T:2");
    /// annotations.add_direct_annotation("D:1", "Heart and lung", "T:3");
    /// annotations.add_direct_annotation("D:2", "Heart and kidney", "T:2");
    /// annotations.add_direct_annotation("D:2", "Heart and kidney", "T:4");
    /// annotations.add_direct_annotation("D:3", "Lung only", "T:3");
    /// annotations.propagate_closure();
    ///
    /// let predictor = Predictor::new(&annotations);
    /// let query: TermGroup = ["T:2"].into_iter().collect();
    /// let terms = predictor.differential_terms(&query);
    ///
    /// let names: Vec<&str> = terms.iter().map(|t| t.name()).collect();
    /// assert_eq!(names, vec!["Abnormal lung", "Abnormal kidney", "All"]);
    /// ```
    pub fn differential_terms(&self, query: &TermGroup) -> Vec<SearchResult<TermId>> {
        let matches = self.ranked_matches(query);
        let mut scores: BTreeMap<&TermId, (f64, usize)> = BTreeMap::new();
        for result in &matches {
            let Some(terms) = self.annotations.terms_for(result.id().as_str()) else {
                continue;
            };
            for term in terms {
                if query.contains(term.as_str()) {
                    continue;
                }
                let entry = scores.entry(term).or_insert((0.0, 0));
                entry.0 += result.score();
                entry.1 += 1;
            }
        }

        let Some(min_count) = scores.values().map(|(_, count)| *count).min() else {
            return Vec::new();
        };
        if min_count > matches.len() / 2 {
            return Vec::new();
        }

        let taxonomy = self.annotations.taxonomy();
        let mut results: Vec<SearchResult<TermId>> = scores
            .into_iter()
            .map(|(term, (sum, count))| {
                let name = taxonomy.get(term.as_str()).map_or(term.as_str(), |t| t.name());
                let count = count_to_f64(count);
                SearchResult::new(term.clone(), name, sum / (count * count))
            })
            .collect();
        sort_results(&mut results);
        results
    }

    /// The rank of the entity when searching with its own original terms
    ///
    /// Only entities that share at least one original term are
    /// compared. The rank is 1 plus the number of those entities whose
    /// [`Predictor::match_score`] is higher than the entity's own score.
    ///
    /// Returns `None` if the entity is unknown.
    pub fn own_pool_rank(&self, entity_id: &str) -> Option<usize> {
        let entity = self.annotations.entity(entity_id)?;
        let original = entity.original_terms();
        let mut pool: BTreeSet<&EntityId> = BTreeSet::new();
        for term in original {
            if let Some(entities) = self.annotations.entities_for(term.as_str()) {
                pool.extend(entities);
            }
        }
        Some(self.rank_in_pool(original, entity.id().as_str(), pool))
    }

    /// 1 plus the number of pool members with a higher match score than `entity_id`
    pub(crate) fn rank_in_pool<'p, I>(&self, query: &TermGroup, entity_id: &str, pool: I) -> usize
    where
        I: IntoIterator<Item = &'p EntityId>,
    {
        let own_score = self.match_score(query, entity_id);
        1 + pool
            .into_iter()
            .filter(|other| self.match_score(query, other.as_str()) > own_score)
            .count()
    }
}
