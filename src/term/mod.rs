//! Terms are the nodes of the [`Taxonomy`](crate::Taxonomy)
//!
//! This module contains the [`TermId`] identifier, the [`TermGroup`] set of
//! term ids, the [`TermNode`] stored inside the taxonomy and the
//! [`TermRecord`] that external loaders hand over to build a taxonomy.

mod group;
mod node;
mod record;
mod termid;

pub use group::{TermGroup, TermIds};
pub use node::TermNode;
pub use record::TermRecord;
pub use termid::TermId;
