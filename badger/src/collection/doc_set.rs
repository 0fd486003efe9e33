use crate::collection::DocId;
use itertools::Itertools;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A set of document identities.
///
/// `DocSet` is the intermediate result of query evaluation. Iteration is in
/// ascending [`DocId`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocSet {
    ids: BTreeSet<DocId>,
}

impl DocSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        DocSet::default()
    }

    pub fn insert(&mut self, id: DocId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &DocId) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &DocId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, DocId> {
        self.ids.iter()
    }

    /// Returns the members of either set.
    pub fn union(&self, other: &DocSet) -> DocSet {
        self.ids.union(&other.ids).copied().collect()
    }

    /// Returns the members of both sets.
    pub fn intersect(&self, other: &DocSet) -> DocSet {
        // walk the smaller set, probe the larger
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().filter(|id| large.contains(id)).copied().collect()
    }

    /// Returns the members of `self` that are not in `other`.
    pub fn difference(&self, other: &DocSet) -> DocSet {
        self.ids.difference(&other.ids).copied().collect()
    }

    /// Removes every member of `other` from `self` in place.
    pub fn subtract(&mut self, other: &DocSet) {
        if other.len() < self.len() {
            for id in other.iter() {
                self.ids.remove(id);
            }
        } else {
            self.ids.retain(|id| !other.contains(id));
        }
    }
}

/// Returns the members of either set.
pub fn union(a: &DocSet, b: &DocSet) -> DocSet {
    a.union(b)
}

/// Returns the members of both sets.
pub fn intersect(a: &DocSet, b: &DocSet) -> DocSet {
    a.intersect(b)
}

impl FromIterator<DocId> for DocSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        DocSet {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<DocId> for DocSet {
    fn extend<I: IntoIterator<Item = DocId>>(&mut self, iter: I) {
        self.ids.extend(iter)
    }
}

impl IntoIterator for DocSet {
    type Item = DocId;
    type IntoIter = btree_set::IntoIter<DocId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocSet {
    type Item = &'a DocId;
    type IntoIter = btree_set::Iter<'a, DocId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl Display for DocSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.ids.iter().join(", "))
    }
}
