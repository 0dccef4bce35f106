//! Operators over any number of sorted lists, each producing a freshly
//! allocated result: the deduplicating merge (union) and the intersection of
//! all inputs.
//!
//! The worst case output size is known before any work is done (the sum of
//! the input lengths for a union, the shortest input for an intersection),
//! so the result storage is reserved once up front. A failed reservation is
//! reported before anything is produced, and the merge loops themselves can
//! never reallocate.

use crate::error::{reserve_exact, Error, Result};
use crate::list::UidList;
use crate::pairwise::gallop;
use smallvec::SmallVec;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::ops::BitOr;

/// Up to this many inputs, [`merge_sorted`] scans the heads of every list to
/// find the next smallest uid. Beyond it, a binary heap keyed on the heads is
/// used instead.
pub const HEAP_MERGE_THRESHOLD: usize = 8;

type Cursors<'a> = SmallVec<[&'a [u64]; HEAP_MERGE_THRESHOLD]>;

#[inline(always)]
fn push_dedup(out: &mut Vec<u64>, id: u64) {
    if out.last() != Some(&id) {
        out.push(id);
    }
}

fn merge_two_into(out: &mut Vec<u64>, lhs: &[u64], rhs: &[u64]) {
    let mut liter = lhs.iter();
    let mut riter = rhs.iter();

    let mut lnext = liter.next();
    let mut rnext = riter.next();

    while let (Some(l), Some(r)) = (lnext, rnext) {
        let n = match l.cmp(r) {
            Ordering::Equal => {
                lnext = liter.next();
                rnext = riter.next();
                l
            }
            Ordering::Less => {
                lnext = liter.next();
                l
            }
            Ordering::Greater => {
                rnext = riter.next();
                r
            }
        };
        push_dedup(out, *n);
    }

    while let Some(l) = lnext {
        push_dedup(out, *l);
        lnext = liter.next();
    }

    while let Some(r) = rnext {
        push_dedup(out, *r);
        rnext = riter.next();
    }
}

fn merge_linear_into(out: &mut Vec<u64>, mut cursors: Cursors<'_>) {
    cursors.retain(|c| !c.is_empty());
    while !cursors.is_empty() {
        let min = cursors.iter().map(|c| c[0]).min().unwrap_or(u64::MAX);
        push_dedup(out, min);
        // Every list sitting on the minimum steps past it together.
        for c in cursors.iter_mut() {
            if c[0] == min {
                let rest = *c;
                *c = &rest[1..];
            }
        }
        cursors.retain(|c| !c.is_empty());
    }
}

fn merge_heap_into<L: AsRef<[u64]>>(out: &mut Vec<u64>, lists: &[L]) -> Result<()> {
    let mut heap = BinaryHeap::new();
    heap.try_reserve(lists.len())
        .map_err(|source| Error::Alloc {
            requested: lists.len(),
            source,
        })?;

    for (li, list) in lists.iter().enumerate() {
        if let Some(id) = list.as_ref().first() {
            heap.push(Reverse((*id, li, 0usize)));
        }
    }

    // Ties pop back to back, so the dedup on push collapses them.
    while let Some(Reverse((id, li, pos))) = heap.pop() {
        push_dedup(out, id);
        let list = lists[li].as_ref();
        if let Some(next) = list.get(pos + 1) {
            heap.push(Reverse((*next, li, pos + 1)));
        }
    }
    Ok(())
}

/// Merge any number of sorted lists into a new list holding every distinct
/// uid that appears in at least one input, ascending and without
/// duplicates.
///
/// Zero lists, or only empty lists, give an empty result. A single list comes
/// back with its internal duplicates removed.
///
/// # Examples
/// ```
/// use uidalgo::{merge_sorted, UidList};
/// use std::iter::FromIterator;
///
/// let a = UidList::from_iter(vec![1, 3, 6, 8, 10]);
/// let b = UidList::from_iter(vec![2, 4, 5, 7, 15]);
/// let merged = merge_sorted(&[&a, &b]).unwrap();
/// assert_eq!(merged, vec![1, 2, 3, 4, 5, 6, 7, 8, 10, 15]);
/// ```
pub fn merge_sorted<L: AsRef<[u64]>>(lists: &[L]) -> Result<UidList> {
    debug_assert!(lists.iter().all(|l| crate::list::first_unsorted(l.as_ref()).is_none()));

    let total = lists.iter().map(|l| l.as_ref().len()).sum();
    let mut out = Vec::new();
    reserve_exact(&mut out, total)?;

    match lists {
        [] => {}
        [only] => {
            for id in only.as_ref() {
                push_dedup(&mut out, *id);
            }
        }
        [lhs, rhs] => merge_two_into(&mut out, lhs.as_ref(), rhs.as_ref()),
        _ if lists.len() <= HEAP_MERGE_THRESHOLD => {
            merge_linear_into(&mut out, lists.iter().map(|l| l.as_ref()).collect())
        }
        _ => {
            log::trace!(
                "merge_sorted: heap merge of {} lists, {} uids",
                lists.len(),
                total
            );
            merge_heap_into(&mut out, lists)?
        }
    }

    Ok(UidList(out))
}

/// Intersect any number of sorted lists into a new list of the uids common
/// to all of them.
///
/// With two or more inputs this has set semantics: a common uid is emitted
/// once, however many times it repeats inside the inputs. A single input is
/// returned as an exact copy, duplicates included. Zero inputs give an empty
/// result.
///
/// The cursors advance in lockstep: each one gallops forward to the largest
/// head seen so far, until all of them agree on a uid. The search stops as
/// soon as any input is exhausted.
///
/// # Examples
/// ```
/// use uidalgo::{intersect_sorted, UidList};
/// use std::iter::FromIterator;
///
/// let a = UidList::from_iter(vec![1, 2, 3]);
/// let b = UidList::from_iter(vec![2, 3, 4, 5]);
/// assert_eq!(intersect_sorted(&[&a, &b]).unwrap(), vec![2, 3]);
///
/// let c = UidList::from_iter(vec![4, 5, 6]);
/// assert!(intersect_sorted(&[&a, &b, &c]).unwrap().is_empty());
/// ```
pub fn intersect_sorted<L: AsRef<[u64]>>(lists: &[L]) -> Result<UidList> {
    debug_assert!(lists.iter().all(|l| crate::list::first_unsorted(l.as_ref()).is_none()));

    let mut cursors: Cursors<'_> = lists.iter().map(|l| l.as_ref()).collect();
    // Shortest first, so a miss is found with the least work.
    cursors.sort_by_key(|c| c.len());

    let mut out = Vec::new();
    match cursors.as_slice() {
        [] => return Ok(UidList(out)),
        [only] => {
            reserve_exact(&mut out, only.len())?;
            out.extend_from_slice(only);
            return Ok(UidList(out));
        }
        [shortest, ..] => reserve_exact(&mut out, shortest.len())?,
    }

    'outer: while let Some(&head) = cursors[0].first() {
        let mut target = head;
        let mut agreed = 0;
        let mut i = 0;
        // Walk the cursors round-robin until all of them sit on `target`.
        while agreed < cursors.len() {
            let rest = cursors[i];
            let rest = &rest[gallop(rest, target)..];
            cursors[i] = rest;
            match rest.first() {
                None => break 'outer,
                Some(&h) if h == target => agreed += 1,
                Some(&h) => {
                    target = h;
                    agreed = 1;
                }
            }
            i = (i + 1) % cursors.len();
        }

        out.push(target);
        if target == u64::MAX {
            break;
        }
        for c in cursors.iter_mut() {
            let rest = *c;
            *c = &rest[gallop(rest, target + 1)..];
        }
    }

    Ok(UidList(out))
}

impl BitOr for &UidList {
    type Output = UidList;

    /// Union of two lists into a new, duplicate free list.
    ///
    /// # Examples
    /// ```
    /// # use uidalgo::UidList;
    /// # use std::iter::FromIterator;
    /// let a = UidList::from_iter(vec![1, 2, 3]);
    /// let b = UidList::from_iter(vec![2, 4, 67]);
    /// assert_eq!(&a | &b, vec![1, 2, 3, 4, 67]);
    /// ```
    fn bitor(self, rhs: &UidList) -> UidList {
        let mut out = Vec::with_capacity(self.len() + rhs.len());
        merge_two_into(&mut out, self.as_slice(), rhs.as_slice());
        UidList(out)
    }
}

impl BitOr for UidList {
    type Output = UidList;

    fn bitor(self, rhs: UidList) -> UidList {
        &self | &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::{intersect_sorted, merge_sorted, HEAP_MERGE_THRESHOLD};
    use crate::testkit::{naive_intersect_all, naive_union, sorted_lists};
    use crate::UidList;
    use proptest::prelude::*;
    use std::iter::FromIterator;

    fn lists(input: Vec<Vec<u64>>) -> Vec<UidList> {
        input.into_iter().map(UidList::from_sorted).collect()
    }

    #[test]
    fn test_merge_sorted_1() {
        let input = lists(vec![vec![55]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![55]);
    }

    #[test]
    fn test_merge_sorted_2() {
        let input = lists(vec![vec![1, 3, 6, 8, 10], vec![2, 4, 5, 7, 15]]);
        assert_eq!(
            merge_sorted(&input).unwrap(),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 10, 15]
        );
    }

    #[test]
    fn test_merge_sorted_3() {
        let input = lists(vec![vec![1, 3, 6, 8, 10], vec![]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![1, 3, 6, 8, 10]);
    }

    #[test]
    fn test_merge_sorted_4() {
        let input = lists(vec![vec![], vec![1, 3, 6, 8, 10]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![1, 3, 6, 8, 10]);
    }

    #[test]
    fn test_merge_sorted_5() {
        let input = lists(vec![vec![], vec![]]);
        assert!(merge_sorted(&input).unwrap().is_empty());
    }

    #[test]
    fn test_merge_sorted_6() {
        let input = lists(vec![
            vec![11, 13, 16, 18, 20],
            vec![12, 14, 15, 15, 16, 16, 17, 25],
            vec![1, 2],
        ]);
        assert_eq!(
            merge_sorted(&input).unwrap(),
            vec![1, 2, 11, 12, 13, 14, 15, 16, 17, 18, 20, 25]
        );
    }

    #[test]
    fn test_merge_sorted_7() {
        let input = lists(vec![vec![5, 6, 7], vec![3, 4], vec![1, 2], vec![]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_merge_sorted_8() {
        let input: Vec<UidList> = Vec::new();
        assert!(merge_sorted(&input).unwrap().is_empty());
    }

    #[test]
    fn test_merge_sorted_9() {
        let input = lists(vec![vec![1, 1, 1]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![1]);
    }

    #[test]
    fn test_merge_sorted_10() {
        let input = lists(vec![vec![1, 2, 3, 3, 6], vec![4, 8, 9]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![1, 2, 3, 4, 6, 8, 9]);
    }

    #[test]
    fn test_merge_sorted_heap() {
        // Enough lists to take the heap path, overlapping on every third uid.
        let input: Vec<UidList> = (0..(HEAP_MERGE_THRESHOLD as u64 * 2))
            .map(|i| UidList::from_iter((0..20).map(|j| j * 3 + (i % 3))))
            .collect();
        assert_eq!(merge_sorted(&input).unwrap(), UidList::from_iter(0..60));
    }

    #[test]
    fn test_merge_sorted_borrowed_inputs() {
        let a = UidList::from_iter(vec![1, 4]);
        let b = UidList::from_iter(vec![2, 4]);
        let c = vec![0u64, 9];
        assert_eq!(merge_sorted(&[&a, &b]).unwrap(), vec![1, 2, 4]);
        assert_eq!(merge_sorted(&[c.as_slice(), a.as_slice()]).unwrap(), vec![0, 1, 4, 9]);
    }

    #[test]
    fn test_merge_sorted_extremes() {
        let input = lists(vec![vec![0, u64::MAX], vec![u64::MAX, u64::MAX]]);
        assert_eq!(merge_sorted(&input).unwrap(), vec![0, u64::MAX]);
    }

    #[test]
    fn test_intersect_sorted_1() {
        let input = lists(vec![vec![1, 2, 3], vec![2, 3, 4, 5]]);
        assert_eq!(intersect_sorted(&input).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_intersect_sorted_2() {
        let input = lists(vec![vec![1, 2, 3]]);
        assert_eq!(intersect_sorted(&input).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_intersect_sorted_3() {
        let input: Vec<UidList> = Vec::new();
        assert!(intersect_sorted(&input).unwrap().is_empty());
    }

    #[test]
    fn test_intersect_sorted_4() {
        let input = lists(vec![vec![100, 101]]);
        assert_eq!(intersect_sorted(&input).unwrap(), vec![100, 101]);
    }

    #[test]
    fn test_intersect_sorted_5() {
        let input = lists(vec![vec![1, 2, 3], vec![2, 3, 4, 5], vec![4, 5, 6]]);
        assert!(intersect_sorted(&input).unwrap().is_empty());
    }

    #[test]
    fn test_intersect_sorted_6() {
        let input = lists(vec![vec![10, 12, 13], vec![2, 3, 4, 13], vec![4, 5, 6]]);
        assert!(intersect_sorted(&input).unwrap().is_empty());
    }

    #[test]
    fn test_intersect_sorted_duplicates() {
        // One list keeps its duplicates; two or more collapse them.
        let single = lists(vec![vec![1, 1, 2]]);
        assert_eq!(intersect_sorted(&single).unwrap(), vec![1, 1, 2]);

        let input = lists(vec![vec![1, 1, 2, 5, 5, 5], vec![1, 1, 5, 5], vec![0, 1, 5]]);
        assert_eq!(intersect_sorted(&input).unwrap(), vec![1, 5]);
    }

    #[test]
    fn test_intersect_sorted_extremes() {
        let input = lists(vec![vec![0, 7, u64::MAX], vec![7, u64::MAX, u64::MAX]]);
        assert_eq!(intersect_sorted(&input).unwrap(), vec![7, u64::MAX]);
    }

    #[test]
    fn test_intersect_sorted_many() {
        let input: Vec<UidList> = (1..=12u64)
            .map(|step| UidList::from_iter((0..2000).step_by(step as usize)))
            .collect();
        // Multiples of lcm(1..=12) = 27720 below 2000: only 0.
        assert_eq!(intersect_sorted(&input).unwrap(), vec![0]);

        let input: Vec<UidList> = [2u64, 3, 4]
            .iter()
            .map(|step| UidList::from_iter((0..100).step_by(*step as usize)))
            .collect();
        assert_eq!(
            intersect_sorted(&input).unwrap(),
            vec![0, 12, 24, 36, 48, 60, 72, 84, 96]
        );
    }

    #[test]
    fn test_bitor() {
        let a = UidList::from_iter(vec![2, 3, 8, 35, 64, 128, 130, 150, 152, 180, 256, 800, 900]);
        let b = UidList::from_iter(1..1024);
        assert_eq!(&a | &b, b);
        assert_eq!(a.clone() | UidList::new(), a);
    }

    proptest! {
        #[test]
        fn prop_merge_sorted(input in sorted_lists(20, 60, 128)) {
            let merged = merge_sorted(&input).unwrap();
            let expect = naive_union(&input);
            prop_assert!(merged.as_slice().windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(merged.as_slice(), expect.as_slice());
        }

        #[test]
        fn prop_intersect_sorted(input in sorted_lists(6, 80, 48)) {
            let common = intersect_sorted(&input).unwrap();
            let expect = naive_intersect_all(&input);
            prop_assert!(common.is_sorted());
            prop_assert_eq!(common.as_slice(), expect.as_slice());
        }
    }
}
