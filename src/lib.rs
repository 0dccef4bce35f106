//! UidAlgo - the sorted uid list algebra used while evaluating graph queries.
//!
//! Every predicate match, index posting join and filter step during query
//! execution combines candidate sets of `u64` uids. This crate provides those
//! combinators over sorted lists: k-way union and intersection producing
//! fresh lists, in-place pairwise intersection and difference, in-place
//! predicate filtering, and a block encoding that speeds up intersection of
//! large or skewed operands.
//!
//! All operators take sorted (non-decreasing) input and keep it sorted.
//! Duplicates are allowed and carry meaning: the pairwise intersection keeps
//! `min` of the multiplicities on each side.
//!
//! # Examples
//! ```
//! use uidalgo::{apply_filter, difference_with, intersect_with, merge_sorted, UidList};
//! use std::iter::FromIterator;
//!
//! let a = UidList::from_iter(vec![1, 3, 5, 7, 9]);
//! let b = UidList::from_iter(vec![2, 3, 4, 5]);
//!
//! let mut result = merge_sorted(&[&a, &b]).unwrap();
//! assert_eq!(result, vec![1, 2, 3, 4, 5, 7, 9]);
//!
//! intersect_with(&mut result, &UidList::from_iter(2..8));
//! difference_with(&mut result, &UidList::from_u64(4));
//! apply_filter(&mut result, |uid, _idx| uid != 7);
//! assert_eq!(result, vec![2, 3, 5]);
//! ```

#[macro_use]
extern crate serde_derive;

/// The equivalent of `a & !b` for uid lists: every uid of `a` that does not
/// occur in `b`.
pub trait AndNot<RHS = Self> {
    type Output;
    /// Exclude the uids of `rhs` from `self`, returning a new list.
    fn andnot(self, rhs: RHS) -> Self::Output;
}

pub mod block;
pub mod error;
pub mod filter;
pub mod kway;
pub mod list;
pub mod pairwise;

#[cfg(test)]
mod testkit;

pub use crate::block::{
    block_to_list, intersect_with_block, sorted_list_to_block, BlockList, BLOCK_SIZE,
};
pub use crate::error::{Error, Result};
pub use crate::filter::apply_filter;
pub use crate::kway::{intersect_sorted, merge_sorted, HEAP_MERGE_THRESHOLD};
pub use crate::list::{UidList, UidListIter};
pub use crate::pairwise::{
    difference_with, intersect_with, intersect_with_binary, intersect_with_galloping,
    intersect_with_linear, GALLOP_RATIO,
};
