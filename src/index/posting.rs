//! Posting sets over document ids.
//!
//! A [`DocSet`] is both the posting set stored for one (field, term) pair and
//! the value every query node evaluates to. It is backed by a roaring bitmap,
//! so membership is deduplicated and iteration is in ascending id order.

use std::ops::RangeBounds;

use roaring::RoaringBitmap;

/// Identifier of a document within one index: its position in the snapshot.
pub type DocId = u32;

/// A deduplicated, ordered set of document ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocSet(RoaringBitmap);

impl DocSet {
    /// Create an empty set.
    pub fn new() -> Self {
        DocSet(RoaringBitmap::new())
    }

    /// Create the set of every id in `range`.
    pub fn from_range<R: RangeBounds<DocId>>(range: R) -> Self {
        let mut bitmap = RoaringBitmap::new();
        bitmap.insert_range(range);
        DocSet(bitmap)
    }

    /// Insert an id. Returns false if it was already present.
    pub fn insert(&mut self, id: DocId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> u64 {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.0.iter()
    }

    /// Add every id of `other` to this set.
    pub fn union_with(&mut self, other: &DocSet) {
        self.0 |= &other.0;
    }

    /// Keep only the ids also present in `other`.
    pub fn intersect_with(&mut self, other: &DocSet) {
        self.0 &= &other.0;
    }

    /// Remove every id present in `other`.
    pub fn difference_with(&mut self, other: &DocSet) {
        self.0 -= &other.0;
    }

    /// Ids of `universe` that are not in this set.
    pub fn complement(&self, universe: &DocSet) -> DocSet {
        DocSet(&universe.0 - &self.0)
    }

    pub fn intersection(&self, other: &DocSet) -> DocSet {
        DocSet(&self.0 & &other.0)
    }

    pub fn union(&self, other: &DocSet) -> DocSet {
        DocSet(&self.0 | &other.0)
    }
}

impl FromIterator<DocId> for DocSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        DocSet(iter.into_iter().collect())
    }
}

impl Extend<DocId> for DocSet {
    fn extend<I: IntoIterator<Item = DocId>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a DocSet {
    type Item = DocId;
    type IntoIter = roaring::bitmap::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
