use smallvec::SmallVec;
use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr, Sub};

use crate::term::TermId;
use crate::DEFAULT_NUM_PARENTS;

/// A set of [`TermId`]s
///
/// Each term can occur only once in the group and the ids are always
/// kept in ascending order, so iterating a group is deterministic.
///
/// This group is used e.g. for the parents, children and ancestors of
/// a term, for the terms of an entity or for a query.
///
/// # Examples
///
/// ```
/// use ontosim::TermGroup;
///
/// let a: TermGroup = ["T:3", "T:1", "T:2"].into_iter().collect();
/// let b: TermGroup = ["T:2", "T:4"].into_iter().collect();
///
/// assert_eq!((&a & &b).len(), 1);
/// assert_eq!((&a | &b).len(), 4);
/// assert_eq!((&a - &b).len(), 2);
///
/// let ids: Vec<&str> = a.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, vec!["T:1", "T:2", "T:3"]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct TermGroup {
    ids: SmallVec<[TermId; DEFAULT_NUM_PARENTS]>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermId`] to the group
    ///
    /// Returns whether the `TermId` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `TermId`, true is returned.
    /// - If the group already contained this `TermId`, false is returned.
    ///
    pub fn insert<I: Into<TermId>>(&mut self, id: I) -> bool {
        let id = id.into();
        match self.position(id.as_str()) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Appends a [`TermId`] without checking order or uniqueness
    ///
    /// Only use this when `id` is known to be larger than every
    /// id already in the group.
    fn insert_unchecked(&mut self, id: TermId) {
        self.ids.push(id);
    }

    /// Removes the [`TermId`] from the group
    ///
    /// Returns `true` if the id was present
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Ok(idx) => {
                self.ids.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns `true` if the group contains the [`TermId`]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_ok()
    }

    /// Returns the smallest [`TermId`] of the group
    pub fn first(&self) -> Option<&TermId> {
        self.ids.first()
    }

    /// Returns an Iterator of the [`TermId`]s inside the group
    pub fn iter(&self) -> TermIds<'_> {
        TermIds::new(self.ids.iter())
    }

    /// Returns `true` if every id of `self` is also part of `other`
    pub fn is_subset(&self, other: &TermGroup) -> bool {
        self.len() <= other.len() && self.iter().all(|id| other.contains(id.as_str()))
    }

    fn position(&self, id: &str) -> Result<usize, usize> {
        self.ids.binary_search_by(|other| other.as_str().cmp(id))
    }
}

impl<I: Into<TermId>> FromIterator<I> for TermGroup {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut group = TermGroup::new();
        group.extend(iter);
        group
    }
}

impl<I: Into<TermId>> Extend<I> for TermGroup {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl IntoIterator for TermGroup {
    type Item = TermId;
    type IntoIter = smallvec::IntoIter<[TermId; DEFAULT_NUM_PARENTS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = &'a TermId;
    type IntoIter = TermIds<'a>;

    fn into_iter(self) -> TermIds<'a> {
        TermIds::new(self.ids.iter())
    }
}

/// An iterator over [`TermId`]s, in ascending order
pub struct TermIds<'a> {
    inner: std::slice::Iter<'a, TermId>,
}

impl<'a> TermIds<'a> {
    fn new(inner: std::slice::Iter<'a, TermId>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for TermIds<'a> {
    type Item = &'a TermId;
    fn next(&mut self) -> Option<&'a TermId> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for TermIds<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for TermIds<'_> {}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len() + rhs.len());
        let mut lhs_iter = self.ids.iter().peekable();
        let mut rhs_iter = rhs.ids.iter().peekable();
        loop {
            let next = match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(l), Some(r)) => match l.cmp(r) {
                    Ordering::Less => lhs_iter.next(),
                    Ordering::Greater => rhs_iter.next(),
                    Ordering::Equal => {
                        rhs_iter.next();
                        lhs_iter.next()
                    }
                },
                (Some(_), None) => lhs_iter.next(),
                (None, Some(_)) => rhs_iter.next(),
                (None, None) => break,
            };
            if let Some(id) = next {
                group.insert_unchecked(id.clone());
            }
        }
        group
    }
}

impl BitAnd for &TermGroup {
    type Output = TermGroup;

    fn bitand(self, rhs: &TermGroup) -> TermGroup {
        let (large, small) = if self.len() > rhs.len() {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let mut group = TermGroup::with_capacity(small.len());
        for id in &small.ids {
            if large.contains(id.as_str()) {
                group.insert_unchecked(id.clone());
            }
        }
        group
    }
}

impl Sub for &TermGroup {
    type Output = TermGroup;

    fn sub(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len());
        for id in &self.ids {
            if !rhs.contains(id.as_str()) {
                group.insert_unchecked(id.clone());
            }
        }
        group
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn group(ids: &[&str]) -> TermGroup {
        ids.iter().copied().collect()
    }

    fn as_strs(group: &TermGroup) -> Vec<&str> {
        group.iter().map(TermId::as_str).collect()
    }

    #[test]
    fn test_termgroup_iter() {
        let mut group = TermGroup::new();
        group.insert("T:1");
        group.insert("T:2");
        group.insert("T:3");

        let mut ids = Vec::new();
        for id in &group {
            ids.push(id)
        }
        assert_eq!(ids.len(), 3);

        for id in &group {
            ids.push(id)
        }
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn insert_keeps_order_and_uniqueness() {
        let mut group = TermGroup::new();
        assert!(group.insert("T:5"));
        assert!(group.insert("T:1"));
        assert!(group.insert("T:3"));
        assert!(!group.insert("T:1"));
        assert_eq!(as_strs(&group), vec!["T:1", "T:3", "T:5"]);
    }

    #[test]
    fn remove() {
        let mut group = group(&["T:1", "T:2", "T:3"]);
        assert!(group.remove("T:2"));
        assert!(!group.remove("T:2"));
        assert!(!group.contains("T:2"));
        assert_eq!(as_strs(&group), vec!["T:1", "T:3"]);
    }

    #[test]
    fn test_bitor_set1() {
        let group1 = group(&["T:1", "T:2", "T:3"]);
        let group2 = group(&["T:2", "T:4"]);

        let result = &group1 | &group2;
        assert_eq!(as_strs(&result), vec!["T:1", "T:2", "T:3", "T:4"]);
    }

    #[test]
    fn test_bitor_set2() {
        let group1 = group(&["T:1", "T:2", "T:3"]);
        let group2 = group(&["T:1", "T:2", "T:4", "T:5"]);

        let result = &group1 | &group2;
        assert_eq!(as_strs(&result), vec!["T:1", "T:2", "T:3", "T:4", "T:5"]);
    }

    #[test]
    fn test_bitor_empty() {
        let group1 = group(&["T:1"]);
        let result = &group1 | &TermGroup::new();
        assert_eq!(result, group1);
    }

    #[test]
    fn test_bitand() {
        let group1 = group(&["T:1", "T:2", "T:3"]);
        let group2 = group(&["T:2", "T:4", "T:5", "T:1"]);

        let result = &group1 & &group2;
        assert_eq!(as_strs(&result), vec!["T:1", "T:2"]);
    }

    #[test]
    fn test_sub() {
        let group1 = group(&["T:1", "T:2", "T:3"]);
        let group2 = group(&["T:2", "T:4"]);

        assert_eq!(as_strs(&(&group1 - &group2)), vec!["T:1", "T:3"]);
        assert_eq!(as_strs(&(&group2 - &group1)), vec!["T:4"]);
    }

    #[test]
    fn subset() {
        let group1 = group(&["T:1", "T:2", "T:3"]);
        let group2 = group(&["T:2", "T:3"]);
        assert!(group2.is_subset(&group1));
        assert!(!group1.is_subset(&group2));
        assert!(TermGroup::new().is_subset(&group2));
    }
}
