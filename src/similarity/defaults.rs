//! Contains implementation for the Similarity algorithms that are
//! available by default.
//!
//! All of the algorithms can also be accessed via [`crate::similarity::Builtins`]

use std::collections::BTreeSet;

use crate::annotations::{AnnotationGraph, EntityId};
use crate::predictor::{information_content, mica, most_informative};
use crate::similarity::Similarity;
use crate::{count_to_f64, MAX_CATEGORIES};

/// Similarity score from Resnik
///
/// The score is the information content of the most informative common
/// ancestor (MICA) of both terms. Terms without common ancestor score 0.
///
/// For a detailed description see [Resnik P, Proceedings of the 14th IJCAI, (1995)](https://www.ijcai.org/Proceedings/95-1/Papers/059.pdf)
#[derive(Debug, Default, Clone, Copy)]
pub struct Resnik;

impl Similarity for Resnik {
    fn calculate(&self, annotations: &AnnotationGraph, a: &str, b: &str) -> f64 {
        mica(annotations, a, b).map_or(0.0, |id| information_content(annotations, id.as_str()))
    }
}

/// Cumulative information content of independent common ancestors
///
/// Terms with multiple parents can share several unrelated ancestors. This
/// similarity picks the most informative common ancestor, discards it and all
/// of its own ancestors, and repeats with the remaining common ancestors.
/// The score is the information content of the entities shared by all
/// picked ancestors.
///
/// Picking stops when no common ancestor is left, when the next ancestor
/// would leave no shared entity, or after `max_categories` picks.
#[derive(Debug, Clone, Copy)]
pub struct Cumulative {
    max_categories: usize,
}

impl Cumulative {
    /// Constructs a new cumulative similarity that picks at most `max_categories` ancestors
    ///
    /// # Examples
    ///
    /// ```
    /// use ontosim::similarity::Cumulative;
    ///
    /// let cumulative = Cumulative::new(5);
    /// assert_eq!(cumulative.max_categories(), 5);
    /// assert_eq!(Cumulative::default().max_categories(), ontosim::MAX_CATEGORIES);
    /// ```
    pub fn new(max_categories: usize) -> Self {
        Self { max_categories }
    }

    /// The maximum number of picked ancestors
    pub fn max_categories(&self) -> usize {
        self.max_categories
    }
}

impl Default for Cumulative {
    fn default() -> Self {
        Self::new(MAX_CATEGORIES)
    }
}

impl Similarity for Cumulative {
    fn calculate(&self, annotations: &AnnotationGraph, a: &str, b: &str) -> f64 {
        let taxonomy = annotations.taxonomy();
        let mut candidates = &taxonomy.ancestors(a) & &taxonomy.ancestors(b);
        let mut shared: Option<BTreeSet<&EntityId>> = None;
        let mut picks = 0;

        while picks < self.max_categories {
            let Some(pick) = most_informative(annotations, &candidates).cloned() else {
                break;
            };
            let entities: BTreeSet<&EntityId> = annotations
                .entities_for(pick.as_str())
                .map(|e| e.iter().collect())
                .unwrap_or_default();

            let next = match &shared {
                None => entities,
                Some(current) => current.intersection(&entities).copied().collect(),
            };
            if next.is_empty() {
                break;
            }
            shared = Some(next);
            picks += 1;
            candidates = &candidates - &taxonomy.ancestors(pick.as_str());
        }

        match shared {
            Some(entities) if !annotations.is_empty() => {
                -(count_to_f64(entities.len()) / count_to_f64(annotations.len())).ln()
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Taxonomy, TermRecord};

    ///        T:1
    ///      /     \
    ///    T:2     T:3
    ///   /   \   /
    ///  T:4   T:5
    fn annotations() -> AnnotationGraph {
        let taxonomy = Taxonomy::load([
            TermRecord::new("T:1", "Root"),
            TermRecord::new("T:2", "A").with_parents(["T:1"]),
            TermRecord::new("T:3", "B").with_parents(["T:1"]),
            TermRecord::new("T:4", "A1").with_parents(["T:2"]),
            TermRecord::new("T:5", "AB").with_parents(["T:2", "T:3"]),
        ])
        .unwrap();
        let mut annotations = AnnotationGraph::new(taxonomy);
        annotations.add_direct_annotation("D:1", "Disease 1", "T:4");
        annotations.add_direct_annotation("D:2", "Disease 2", "T:5");
        annotations.add_direct_annotation("D:3", "Disease 3", "T:3");
        annotations.add_direct_annotation("D:4", "Disease 4", "T:1");
        annotations.propagate_closure();
        annotations
    }

    #[test]
    fn resnik() {
        let annotations = annotations();
        // MICA(T:4, T:5) = T:2, linked to D:1 and D:2
        let score = Resnik.calculate(&annotations, "T:4", "T:5");
        assert!((score - (4.0f64 / 2.0).ln()).abs() < 1e-9);

        // root only
        assert_eq!(Resnik.calculate(&annotations, "T:4", "T:3"), 0.0);

        // unknown term
        assert_eq!(Resnik.calculate(&annotations, "T:4", "X:1"), 0.0);
    }

    #[test]
    fn resnik_is_symmetric() {
        let annotations = annotations();
        for a in ["T:1", "T:2", "T:3", "T:4", "T:5"] {
            for b in ["T:1", "T:2", "T:3", "T:4", "T:5"] {
                assert_eq!(
                    Resnik.calculate(&annotations, a, b),
                    Resnik.calculate(&annotations, b, a)
                );
            }
        }
    }

    #[test]
    fn cumulative_uses_independent_ancestors() {
        let annotations = annotations();
        // common ancestors of T:5 with itself: T:5, T:2, T:3, T:1
        // picking T:5 removes all others
        let score = Cumulative::default().calculate(&annotations, "T:5", "T:5");
        assert!((score - 4.0f64.ln()).abs() < 1e-9);

        // common ancestors of T:5 and T:3: T:3, T:1
        let score = Cumulative::default().calculate(&annotations, "T:5", "T:3");
        assert!((score - (4.0f64 / 2.0).ln()).abs() < 1e-9);
    }

    #[test]
    fn cumulative_without_common_entities() {
        let annotations = annotations();
        let score = Cumulative::default().calculate(&annotations, "T:4", "X:1");
        assert_eq!(score, 0.0);
        let score = Cumulative::new(0).calculate(&annotations, "T:4", "T:4");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn builtins_dispatch() {
        let annotations = annotations();
        assert_eq!(
            crate::similarity::Builtins::Resnik.calculate(&annotations, "T:4", "T:5"),
            Resnik.calculate(&annotations, "T:4", "T:5")
        );
    }
}
