use std::collections::HashSet;

use crate::annotations::EntityId;
use crate::term::TermId;

/// A single parsed entity - term association, e.g. one line of a GO association file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// The annotated entity
    pub entity_id: EntityId,
    /// Display name of the entity
    pub entity_name: String,
    /// The annotating term, may be an alternate id
    pub term_id: TermId,
    /// Evidence code, e.g. `IDA` or `TAS`
    pub evidence: String,
    /// Qualifier of the association, empty for a plain association
    pub relation: String,
}

impl AnnotationRecord {
    /// Constructs a record without evidence code and qualifier
    pub fn new<E: Into<EntityId>, T: Into<TermId>>(entity_id: E, entity_name: &str, term_id: T) -> Self {
        Self {
            entity_id: entity_id.into(),
            entity_name: entity_name.to_string(),
            term_id: term_id.into(),
            evidence: String::new(),
            relation: String::new(),
        }
    }

    /// Sets the evidence code
    pub fn with_evidence(mut self, evidence: &str) -> Self {
        self.evidence = evidence.to_string();
        self
    }

    /// Sets the qualifier
    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation = relation.to_string();
        self
    }
}

/// Decides which [`AnnotationRecord`]s are added to an
/// [`AnnotationGraph`](crate::AnnotationGraph)
///
/// The default filter accepts every record. Restricting the evidence
/// codes or relations only accepts records whose value is in the given set.
///
/// # Examples
///
/// ```
/// use ontosim::annotations::{AnnotationFilter, AnnotationRecord};
///
/// let filter = AnnotationFilter::default()
///     .with_evidence_codes(["IDA", "TAS"])
///     .with_relations([""]);
///
/// let record = AnnotationRecord::new("BRCA2", "BRCA2", "GO:0006281").with_evidence("IDA");
/// assert!(filter.accepts(&record));
///
/// let record = record.with_relation("NOT");
/// assert!(!filter.accepts(&record));
///
/// let record = AnnotationRecord::new("BRCA2", "BRCA2", "GO:0006281").with_evidence("IEA");
/// assert!(!filter.accepts(&record));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnnotationFilter {
    evidence_codes: Option<HashSet<String>>,
    relations: Option<HashSet<String>>,
}

impl AnnotationFilter {
    /// Only accept records with one of the given evidence codes
    pub fn with_evidence_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    /// Only accept records with one of the given relations
    pub fn with_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations = Some(relations.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` if the record passes the filter
    pub fn accepts(&self, record: &AnnotationRecord) -> bool {
        let evidence_ok = self
            .evidence_codes
            .as_ref()
            .map_or(true, |codes| codes.contains(&record.evidence));
        let relation_ok = self
            .relations
            .as_ref()
            .map_or(true, |relations| relations.contains(&record.relation));
        evidence_ok && relation_ok
    }
}
