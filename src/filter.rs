//! Predicate based in-place compaction of a uid list.

use crate::list::UidList;

/// Keep only the uids for which `keep(uid, index)` returns `true`, where
/// `index` is the uid's position in the list before filtering. Survivors are
/// compacted to the front in their original order and the list is
/// truncated.
///
/// The predicate is called exactly once per element, in order.
///
/// # Examples
/// ```
/// use uidalgo::{apply_filter, UidList};
/// use std::iter::FromIterator;
///
/// let mut list = UidList::from_iter(vec![1, 2, 3, 4, 5]);
/// apply_filter(&mut list, |uid, _| uid % 2 == 1);
/// assert_eq!(list, vec![1, 3, 5]);
/// ```
pub fn apply_filter<F>(list: &mut UidList, mut keep: F)
where
    F: FnMut(u64, usize) -> bool,
{
    let data = &mut list.0;
    let mut w = 0;
    for i in 0..data.len() {
        let uid = data[i];
        if keep(uid, i) {
            data[w] = uid;
            w += 1;
        }
    }
    data.truncate(w);
}
