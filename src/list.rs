//! The sorted uid list, the currency of query time candidate sets.

use crate::error::{Error, Result};
use std::iter::FromIterator;
use std::{slice, vec};

/// An owned, non-decreasing sequence of `u64` uids.
///
/// Repeated values are meaningful: a run of equal uids records how many
/// sources contributed that uid, and the pairwise intersection preserves
/// that multiplicity. The in-place operators in this crate only ever shrink
/// the list (the logical length drops, the capacity is kept), never reorder
/// or grow it.
///
/// Every operator assumes its inputs are sorted. This is checked with a
/// `debug_assert!` on entry, so debug builds fail fast on a bad caller while
/// release builds pay nothing.
///
/// # Examples
/// ```
/// use uidalgo::UidList;
/// use std::iter::FromIterator;
///
/// let list = UidList::from_iter(vec![1, 1, 4, 9]);
/// assert_eq!(list.len(), 4);
/// assert_eq!(list.index_of(4), Some(2));
/// assert!(!list.contains(5));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct UidList(pub(crate) Vec<u64>);

/// Position of the first element that is smaller than its predecessor.
#[inline]
pub(crate) fn first_unsorted(data: &[u64]) -> Option<usize> {
    data.windows(2).position(|w| w[0] > w[1]).map(|i| i + 1)
}

impl UidList {
    /// Construct a new, empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty list able to hold `capacity` uids without
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        UidList(Vec::with_capacity(capacity))
    }

    /// Construct a list holding a single uid.
    pub fn from_u64(id: u64) -> Self {
        UidList(vec![id])
    }

    /// Wrap an already sorted vector. The ordering is only verified in debug
    /// builds; use [`UidList::try_from_sorted`] for untrusted input.
    pub fn from_sorted(data: Vec<u64>) -> Self {
        debug_assert!(first_unsorted(&data).is_none());
        UidList(data)
    }

    /// Wrap a vector after checking it is non-decreasing.
    pub fn try_from_sorted(data: Vec<u64>) -> Result<Self> {
        match first_unsorted(&data) {
            Some(index) => Err(Error::Unsorted {
                index,
                prev: data[index - 1],
                next: data[index],
            }),
            None => Ok(UidList(data)),
        }
    }

    /// Append a uid to the tail of the list. It must not be smaller than the
    /// current last uid.
    #[inline]
    pub fn push_id(&mut self, id: u64) {
        debug_assert!(self.0.last().map_or(true, |last| *last <= id));
        self.0.push(id);
    }

    /// Number of uids, duplicates included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Allocated capacity. The in-place operators leave this untouched.
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Returns `true` if the list is non-decreasing. Every list built through
    /// the public API is, so this is mainly useful in assertions.
    pub fn is_sorted(&self) -> bool {
        first_unsorted(&self.0).is_none()
    }

    /// The uid at position `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<u64> {
        self.0.get(idx).copied()
    }

    /// The smallest uid.
    pub fn first(&self) -> Option<u64> {
        self.0.first().copied()
    }

    /// The largest uid.
    pub fn last(&self) -> Option<u64> {
        self.0.last().copied()
    }

    /// Position of the first occurrence of `uid`, found by binary search.
    pub fn index_of(&self, uid: u64) -> Option<usize> {
        let idx = self.0.partition_point(|v| *v < uid);
        match self.0.get(idx) {
            Some(v) if *v == uid => Some(idx),
            _ => None,
        }
    }

    /// Returns `true` if `uid` is present in the list.
    pub fn contains(&self, uid: u64) -> bool {
        self.0.binary_search(&uid).is_ok()
    }

    /// Borrow the uids as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u64] {
        self.0.as_slice()
    }

    /// Iterate over the uids in order.
    pub fn iter(&self) -> UidListIter<'_> {
        self.into_iter()
    }

    /// Drop all uids, keeping the allocation.
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Release the underlying vector.
    pub fn into_vec(self) -> Vec<u64> {
        self.0
    }
}

impl FromIterator<u64> for UidList {
    /// Collect uids into a list. The input must already be sorted; this is
    /// checked in debug builds only.
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        UidList::from_sorted(iter.into_iter().collect())
    }
}

impl TryFrom<Vec<u64>> for UidList {
    type Error = Error;

    fn try_from(data: Vec<u64>) -> Result<Self> {
        UidList::try_from_sorted(data)
    }
}

impl From<UidList> for Vec<u64> {
    fn from(list: UidList) -> Self {
        list.0
    }
}

impl AsRef<[u64]> for UidList {
    fn as_ref(&self) -> &[u64] {
        &self.0
    }
}

impl PartialEq<[u64]> for UidList {
    fn eq(&self, other: &[u64]) -> bool {
        self.0.as_slice() == other
    }
}

impl PartialEq<Vec<u64>> for UidList {
    fn eq(&self, other: &Vec<u64>) -> bool {
        &self.0 == other
    }
}

/// A borrowing iterator over the uids of a [`UidList`].
#[derive(Debug, Clone)]
pub struct UidListIter<'a> {
    inner: slice::Iter<'a, u64>,
}

impl<'a> Iterator for UidListIter<'a> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> ExactSizeIterator for UidListIter<'a> {}

impl<'a> IntoIterator for &'a UidList {
    type Item = u64;
    type IntoIter = UidListIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        UidListIter {
            inner: self.0.iter(),
        }
    }
}

impl IntoIterator for UidList {
    type Item = u64;
    type IntoIter = vec::IntoIter<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
