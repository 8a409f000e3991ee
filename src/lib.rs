//! `ontosim` computes information-content based similarity between sets of
//! ontology terms and uses it to rank annotated entities (diseases, genes)
//! and to reduce a taxonomy bottom-up without losing the ability to
//! re-identify any entity by its own terms.
//!
//! The crate is organised leaf-first:
//!
//! - [`Taxonomy`]: the term DAG with cached ancestor closure
//! - [`AnnotationGraph`]: the bipartite entity - term graph
//! - [`Predictor`]: IC, MICA, set similarity and ranking
//! - [`TaxonomyReducer`]: greedy, rank-preserving leaf removal
//!
//! # Examples
//!
//! ```
//! use ontosim::{AnnotationGraph, Predictor, Taxonomy, TermGroup, TermRecord};
//!
//! let taxonomy = Taxonomy::load([
//!     TermRecord::new("T:1", "All"),
//!     TermRecord::new("T:2", "Abnormal heart").with_parents(["T:1"]),
//!     TermRecord::new("T:3", "Abnormal lung").with_parents(["T:1"]),
//! ])
//! .unwrap();
//!
//! let mut annotations = AnnotationGraph::new(taxonomy);
//! annotations.add_direct_annotation("D:1", "Heart disease", "T:2");
//! annotations.add_direct_annotation("D:2", "Lung disease", "T:3");
//! annotations.propagate_closure();
//!
//! let predictor = Predictor::new(&annotations);
//! let query: TermGroup = ["T:2"].into_iter().collect();
//! let matches = predictor.ranked_matches(&query);
//! assert_eq!(matches[0].id().as_str(), "D:1");
//! ```
use thiserror::Error;

pub mod annotations;
pub mod predictor;
pub mod reduce;
pub mod similarity;
pub mod taxonomy;
pub mod term;
mod matrix;

pub use annotations::{AnnotationGraph, Entity, EntityId};
pub use predictor::{Predictor, SearchResult};
pub use reduce::{RankLimits, ReducerConfig, ReducerState, Reduction, TaxonomyReducer};
pub use similarity::{Builtins, Similarity};
pub use taxonomy::Taxonomy;
pub use term::{TermGroup, TermId, TermNode, TermRecord};

/// Id of the root node that is added when the loaded records have more than one root
pub const SYNTHETIC_ROOT_ID: &str = "ROOT:0000000";
/// Name of the synthetic root node
pub const SYNTHETIC_ROOT_NAME: &str = "All";

/// Maximum number of independent common ancestors used by the cumulative IC similarity
pub const MAX_CATEGORIES: usize = 10;

/// Rank limit applied to entities without a recorded baseline
pub const DEFAULT_RANK_LIMIT: usize = 1;

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_TERMS: usize = 2_000;

/// Errors raised by structural violations of the taxonomy
///
/// Read-only lookups of unknown ids never raise an error, they return
/// `None` or an empty result instead.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OntoError {
    /// The requested term does not exist
    #[error("term does not exist")]
    DoesNotExist,
    /// No term records were provided
    #[error("the taxonomy does not contain any terms")]
    EmptyTaxonomy,
    /// Every term has at least one parent
    #[error("the taxonomy has no root term, it must contain a cycle")]
    NoRoot,
    /// The term is its own ancestor
    #[error("cycle detected at term {0}")]
    CyclicTaxonomy(TermId),
    /// The root term holds the taxonomy together and cannot be removed
    #[error("the root term cannot be removed")]
    RootRemoval,
}

/// Shortcut for `Result<T, OntoError>`
pub type OntoResult<T> = Result<T, OntoError>;

/// Converts a count into `f64` for IC and average calculations
///
/// Exact for every count up to `2^53`.
pub(crate) fn count_to_f64(n: usize) -> f64 {
    n as f64
}
