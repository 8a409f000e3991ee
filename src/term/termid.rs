use core::fmt::Debug;
use std::borrow::Borrow;
use std::fmt::Display;

/// The canonical identifier of a term, e.g. `HP:0000118` or `GO:0008150`
///
/// `TermId`s are ordered lexicographically. This ordering is used to break
/// all ties in scores and processing order, so that every result of this
/// crate is reproducible.
///
/// # Examples
///
/// ```
/// use ontosim::TermId;
///
/// let id = TermId::from("HP:0000118");
/// assert_eq!(id.as_str(), "HP:0000118");
/// assert_eq!(id, "HP:0000118");
/// assert!(TermId::from("HP:0000001") < id);
/// ```
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: String,
}

impl TermId {
    /// Constructs a new `TermId`
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { inner: id.into() }
    }

    /// Returns the id as string slice
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The id of the synthetic root that is added to taxonomies with multiple roots
    pub fn synthetic_root() -> Self {
        Self::new(crate::SYNTHETIC_ROOT_ID)
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        TermId::new(s)
    }
}

impl From<String> for TermId {
    fn from(inner: String) -> Self {
        TermId { inner }
    }
}

impl From<&String> for TermId {
    fn from(s: &String) -> Self {
        TermId::new(s.as_str())
    }
}

impl From<&TermId> for TermId {
    fn from(id: &TermId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}
