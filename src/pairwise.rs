//! In-place pairwise operators: multiset intersection and difference.
//!
//! Both operators compact the survivors of `u` towards the front of its own
//! storage and then truncate it. The write cursor never overtakes the read
//! cursor, so no scratch space is needed and nothing is allocated.

use crate::list::UidList;
use crate::AndNot;
use std::cmp::Ordering;
use std::ops::BitAnd;

/// When one operand is at least this many times longer than the other,
/// [`intersect_with`] stops walking the long side element by element and
/// gallops across it instead.
pub const GALLOP_RATIO: usize = 16;

/// Number of leading elements of `data` that are smaller than `target`,
/// found by exponential probing followed by a binary search of the last
/// probed window.
#[inline]
pub(crate) fn gallop(data: &[u64], target: u64) -> usize {
    if data.is_empty() || data[0] >= target {
        return 0;
    }
    // data[lo] < target holds throughout.
    let mut lo = 0;
    let mut step = 1;
    while lo + step < data.len() && data[lo + step] < target {
        lo += step;
        step <<= 1;
    }
    let hi = (lo + step).min(data.len());
    lo + 1 + data[lo + 1..hi].partition_point(|v| *v < target)
}

#[inline]
fn bisect(data: &[u64], target: u64) -> usize {
    data.partition_point(|v| *v < target)
}

/// Each element of `out` (the short side) is looked up in the unread
/// remainder of `other`. A match consumes one element of `other`, which is
/// what keeps runs of duplicates at min-count.
#[inline(always)]
fn drive_from_left(out: &mut Vec<u64>, other: &[u64], seek: fn(&[u64], u64) -> usize) {
    let mut w = 0;
    let mut j = 0;
    for i in 0..out.len() {
        let l = out[i];
        j += seek(&other[j..], l);
        if j == other.len() {
            break;
        }
        if other[j] == l {
            out[w] = l;
            w += 1;
            j += 1;
        }
    }
    out.truncate(w);
}

/// The mirror of `drive_from_left`: `other` is the short side, and the read
/// cursor into `out` is what skips ahead.
#[inline(always)]
fn drive_from_right(out: &mut Vec<u64>, other: &[u64], seek: fn(&[u64], u64) -> usize) {
    let mut w = 0;
    let mut i = 0;
    for &r in other {
        i += seek(&out[i..], r);
        if i == out.len() {
            break;
        }
        if out[i] == r {
            out[w] = r;
            w += 1;
            i += 1;
        }
    }
    out.truncate(w);
}

/// Intersect `u` with `v`, leaving the result in `u`. `v` is not modified.
///
/// This is a multiset intersection: every distinct uid `x` appears
/// `min(count(x, u), count(x, v))` times in the result. The strategy is
/// chosen from the operand sizes, see [`GALLOP_RATIO`]; all strategies
/// produce the same result.
///
/// # Examples
/// ```
/// use uidalgo::{intersect_with, UidList};
/// use std::iter::FromIterator;
///
/// let mut u = UidList::from_iter(vec![1, 1, 2, 3, 5]);
/// let v = UidList::from_iter(vec![1, 1, 2, 4]);
/// intersect_with(&mut u, &v);
/// assert_eq!(u, vec![1, 1, 2]);
/// ```
pub fn intersect_with(u: &mut UidList, v: &UidList) {
    let (ul, vl) = (u.len(), v.len());
    if ul == 0 || vl == 0 {
        u.clear();
        return;
    }
    if vl / ul >= GALLOP_RATIO || ul / vl >= GALLOP_RATIO {
        log::trace!("intersect_with: galloping |u|={} |v|={}", ul, vl);
        intersect_with_galloping(u, v)
    } else {
        intersect_with_linear(u, v)
    }
}

/// Intersect `u` with `v` by a single forward pass with one cursor per
/// operand. `O(|u| + |v|)`.
pub fn intersect_with_linear(u: &mut UidList, v: &UidList) {
    debug_assert!(u.is_sorted());
    debug_assert!(v.is_sorted());

    let out = &mut u.0;
    let other = v.as_slice();

    let mut w = 0;
    let mut i = 0;
    let mut j = 0;

    while i < out.len() && j < other.len() {
        let l = out[i];
        let r = other[j];
        match l.cmp(&r) {
            Ordering::Equal => {
                out[w] = l;
                w += 1;
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                i += 1;
            }
            Ordering::Greater => {
                j += 1;
            }
        }
    }
    out.truncate(w);
}

/// Intersect `u` with `v`, walking the shorter operand and galloping over
/// the longer one. `O(s log(l / s))` for sizes `s <= l`.
pub fn intersect_with_galloping(u: &mut UidList, v: &UidList) {
    debug_assert!(u.is_sorted());
    debug_assert!(v.is_sorted());

    if u.len() <= v.len() {
        drive_from_left(&mut u.0, v.as_slice(), gallop)
    } else {
        drive_from_right(&mut u.0, v.as_slice(), gallop)
    }
}

/// Intersect `u` with `v`, binary searching each element of the shorter
/// operand in the unread remainder of the longer one. `O(s log l)`.
pub fn intersect_with_binary(u: &mut UidList, v: &UidList) {
    debug_assert!(u.is_sorted());
    debug_assert!(v.is_sorted());

    if u.len() <= v.len() {
        drive_from_left(&mut u.0, v.as_slice(), bisect)
    } else {
        drive_from_right(&mut u.0, v.as_slice(), bisect)
    }
}

/// Remove from `u` every uid that occurs anywhere in `v`. `v` is not
/// modified. All occurrences of a matched uid are dropped, however many
/// times it appears in `v`; the uids that survive keep their multiplicity.
///
/// # Examples
/// ```
/// use uidalgo::{difference_with, UidList};
/// use std::iter::FromIterator;
///
/// let mut u = UidList::from_iter(vec![10, 12, 13]);
/// let v = UidList::from_iter(vec![2, 3, 4, 13]);
/// difference_with(&mut u, &v);
/// assert_eq!(u, vec![10, 12]);
/// ```
pub fn difference_with(u: &mut UidList, v: &UidList) {
    debug_assert!(u.is_sorted());
    debug_assert!(v.is_sorted());

    let out = &mut u.0;
    let other = v.as_slice();

    let mut w = 0;
    let mut i = 0;
    let mut j = 0;

    while i < out.len() && j < other.len() {
        let l = out[i];
        match l.cmp(&other[j]) {
            Ordering::Less => {
                out[w] = l;
                w += 1;
                i += 1;
            }
            // v's cursor stays put, so the rest of a run in u is dropped too.
            Ordering::Equal => {
                i += 1;
            }
            Ordering::Greater => {
                j += 1;
            }
        }
    }

    // Everything left in u is above the last uid of v.
    let n = out.len();
    out.copy_within(i..n, w);
    out.truncate(w + (n - i));
}

impl BitAnd for &UidList {
    type Output = UidList;

    /// Multiset intersection into a new list.
    ///
    /// # Examples
    /// ```
    /// # use uidalgo::UidList;
    /// # use std::iter::FromIterator;
    /// let a = UidList::from_iter(vec![1, 2, 3]);
    /// let b = UidList::from_iter(vec![2]);
    /// assert_eq!(&a & &b, vec![2]);
    /// ```
    fn bitand(self, rhs: &UidList) -> UidList {
        let mut result = self.clone();
        intersect_with(&mut result, rhs);
        result
    }
}

impl BitAnd for UidList {
    type Output = UidList;

    fn bitand(mut self, rhs: UidList) -> UidList {
        intersect_with(&mut self, &rhs);
        self
    }
}

impl AndNot for &UidList {
    type Output = UidList;

    /// Difference into a new list: the uids of `self` absent from `rhs`.
    ///
    /// # Examples
    /// ```
    /// use uidalgo::{AndNot, UidList};
    /// # use std::iter::FromIterator;
    ///
    /// let a = UidList::from_iter(vec![1, 2, 3]);
    /// let b = UidList::from_iter(vec![2]);
    /// assert_eq!(a.andnot(&b), vec![1, 3]);
    ///
    /// // Reversing the operands yields nothing.
    /// assert!(b.andnot(&a).is_empty());
    /// ```
    fn andnot(self, rhs: &UidList) -> UidList {
        let mut result = self.clone();
        difference_with(&mut result, rhs);
        result
    }
}
