//! Shared helpers for the unit and property tests: strategies producing
//! sorted lists, and naive reference implementations to check against.

use crate::UidList;
use proptest::prelude::*;
use std::collections::BTreeMap;

/// A sorted list drawn from a small value domain so that equal values, runs
/// and overlaps between independently generated lists are common.
pub fn sorted_list(max_len: usize, domain: u64) -> impl Strategy<Value = UidList> {
    prop::collection::vec(0..domain, 0..max_len).prop_map(|mut v| {
        v.sort_unstable();
        UidList::from_sorted(v)
    })
}

/// Several sorted lists at once.
pub fn sorted_lists(
    max_lists: usize,
    max_len: usize,
    domain: u64,
) -> impl Strategy<Value = Vec<UidList>> {
    prop::collection::vec(sorted_list(max_len, domain), 0..max_lists)
}

pub fn counts(list: &UidList) -> BTreeMap<u64, usize> {
    let mut m = BTreeMap::new();
    for id in list {
        *m.entry(id).or_insert(0) += 1;
    }
    m
}

/// min-count multiset intersection.
pub fn naive_intersect(u: &UidList, v: &UidList) -> Vec<u64> {
    let cv = counts(v);
    let mut out = Vec::new();
    for (id, n) in counts(u) {
        let k = n.min(cv.get(&id).copied().unwrap_or(0));
        out.extend(std::iter::repeat(id).take(k));
    }
    out
}

pub fn naive_difference(u: &UidList, v: &UidList) -> Vec<u64> {
    u.iter().filter(|id| !v.contains(*id)).collect()
}

pub fn naive_union(lists: &[UidList]) -> Vec<u64> {
    let mut out: Vec<u64> = lists.iter().flat_map(|l| l.iter()).collect();
    out.sort_unstable();
    out.dedup();
    out
}

pub fn naive_intersect_all(lists: &[UidList]) -> Vec<u64> {
    match lists {
        [] => Vec::new(),
        [only] => only.as_slice().to_vec(),
        [head, rest @ ..] => {
            let mut out: Vec<u64> = head
                .iter()
                .filter(|id| rest.iter().all(|l| l.contains(*id)))
                .collect();
            out.dedup();
            out
        }
    }
}
