//! Methods to calculate the similarity between two terms
//!
//! The similarity of two sets of terms is built from the term - term
//! similarities, see [`Predictor::asymmetric_similarity`](crate::Predictor::asymmetric_similarity).

use crate::annotations::AnnotationGraph;

mod defaults;
pub use defaults::{Cumulative, Resnik};

/// Trait for similarity score calculation between 2 terms
///
/// `ontosim` comes with two information content based algorithms that
/// implement the `Similarity` trait, see [`Builtins`].
///
/// The score must be symmetric, `calculate(a, b) == calculate(b, a)`,
/// and must never be negative.
///
/// # Examples
///
/// ```
/// use ontosim::similarity::Similarity;
/// use ontosim::{AnnotationGraph, Predictor, Taxonomy, TermRecord};
///
/// /// Scores 1 for identical terms, otherwise 0
/// struct Identity;
///
/// impl Similarity for Identity {
///     fn calculate(&self, _: &AnnotationGraph, a: &str, b: &str) -> f64 {
///         if a == b { 1.0 } else { 0.0 }
///     }
/// }
///
/// let taxonomy = Taxonomy::load([TermRecord::new("T:1", "All")]).unwrap();
/// let annotations = AnnotationGraph::new(taxonomy);
/// let predictor = Predictor::with_similarity(&annotations, Identity);
/// assert_eq!(predictor.term_similarity("T:1", "T:1"), 1.0);
/// ```
pub trait Similarity {
    /// calculates the actual similarity between term a and term b
    fn calculate(&self, annotations: &AnnotationGraph, a: &str, b: &str) -> f64;
}

/// The built-in term - term similarity algorithms
///
/// # Examples
///
/// ```
/// use ontosim::similarity::Builtins;
///
/// assert_eq!(Builtins::default(), Builtins::Resnik);
/// assert_eq!(Builtins::new("cumulative"), Some(Builtins::Cumulative));
/// assert_eq!(Builtins::new("foobar"), None);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Builtins {
    /// Information content of the most informative common ancestor, see [`Resnik`]
    #[default]
    Resnik,
    /// Information content of several independent common ancestors, see [`Cumulative`]
    Cumulative,
}

impl Builtins {
    /// Returns the algorithm with the given (case-insensitive) name
    pub fn new(method: &str) -> Option<Self> {
        match method.to_lowercase().as_str() {
            "resnik" => Some(Builtins::Resnik),
            "cumulative" => Some(Builtins::Cumulative),
            _ => None,
        }
    }
}

impl Similarity for Builtins {
    fn calculate(&self, annotations: &AnnotationGraph, a: &str, b: &str) -> f64 {
        match self {
            Builtins::Resnik => Resnik.calculate(annotations, a, b),
            Builtins::Cumulative => Cumulative::default().calculate(annotations, a, b),
        }
    }
}
