//! Block encoding of a sorted list.
//!
//! A [`BlockList`] holds the same uids as the [`UidList`] it was built from,
//! cut into fixed size blocks. Each block starts on a cache line and its
//! value range is read off its first and last uid, so the block intersection can discard a whole
//! block of one operand whose range ends before the current uid of the
//! other, without touching its elements. This pays off when one operand is
//! much larger than the other or the overlap is sparse.
//!
//! Every block is full except possibly the last, and no block is empty. The
//! intersection maintains that layout, so its result is exactly what
//! encoding the intersected list would have produced.

use crate::error::{reserve_exact, Result};
use crate::list::{first_unsorted, UidList};
use std::cmp::Ordering;
use std::fmt;

/// Number of uids held by a full block.
pub const BLOCK_SIZE: usize = 32;

// Exactly four cache lines. The fill count is kept by the owning list, since
// only the last block can be partial.
#[derive(Clone, Copy)]
#[repr(C, align(64))]
struct UidBlock([u64; BLOCK_SIZE]);

impl UidBlock {
    fn from_slice(data: &[u64]) -> Self {
        debug_assert!(!data.is_empty() && data.len() <= BLOCK_SIZE);
        let mut uids = [0; BLOCK_SIZE];
        uids[..data.len()].copy_from_slice(data);
        UidBlock(uids)
    }
}

/// A sorted uid list in block encoded form.
///
/// This is an independent copy: it shares nothing with the list it was
/// encoded from.
///
/// # Examples
/// ```
/// use uidalgo::{intersect_with_block, BlockList, UidList};
/// use std::iter::FromIterator;
///
/// let u = UidList::from_iter(vec![1, 2, 3]);
/// let v = UidList::from_iter(vec![1, 2, 3, 4, 5]);
///
/// let mut ub = BlockList::encode(&u).unwrap();
/// let vb = BlockList::encode(&v).unwrap();
/// intersect_with_block(&mut ub, &vb);
///
/// assert_eq!(ub.decode().unwrap(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Default)]
pub struct BlockList {
    blocks: Vec<UidBlock>,
    len: usize,
}

#[inline(always)]
fn fill_of(num_blocks: usize, len: usize, i: usize) -> usize {
    if i + 1 < num_blocks {
        BLOCK_SIZE
    } else {
        len - i * BLOCK_SIZE
    }
}

impl BlockList {
    /// Construct a new, empty block list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a sorted list into blocks.
    pub fn encode(list: &UidList) -> Result<Self> {
        debug_assert!(list.is_sorted());
        let data = list.as_slice();
        let mut blocks = Vec::new();
        reserve_exact(&mut blocks, (data.len() + BLOCK_SIZE - 1) / BLOCK_SIZE)?;
        blocks.extend(data.chunks(BLOCK_SIZE).map(UidBlock::from_slice));
        Ok(BlockList {
            blocks,
            len: data.len(),
        })
    }

    /// Decode back into a sorted list, equal to the one that was encoded
    /// (or to the list result of an intersection).
    pub fn decode(&self) -> Result<UidList> {
        let mut out = Vec::new();
        reserve_exact(&mut out, self.len)?;
        for block in self.blocks() {
            out.extend_from_slice(block);
        }
        Ok(UidList(out))
    }

    /// Number of uids, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// The uids of block `i`.
    fn block(&self, i: usize) -> &[u64] {
        &self.blocks[i].0[..fill_of(self.blocks.len(), self.len, i)]
    }

    /// Iterate over the blocks in order, each as the slice of uids it holds.
    /// Every block is full except possibly the last.
    pub fn blocks(&self) -> impl Iterator<Item = &[u64]> + '_ {
        (0..self.blocks.len()).map(move |i| self.block(i))
    }

    /// The block count matches the length, and the uids are non-decreasing
    /// within and across blocks.
    pub(crate) fn is_well_formed(&self) -> bool {
        if self.blocks.len() != (self.len + BLOCK_SIZE - 1) / BLOCK_SIZE {
            return false;
        }
        let mut prev = 0;
        self.blocks().all(|blk| {
            let ok = blk[0] >= prev && first_unsorted(blk).is_none();
            prev = blk[blk.len() - 1];
            ok
        })
    }
}

impl PartialEq for BlockList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.blocks().eq(other.blocks())
    }
}

impl Eq for BlockList {}

impl fmt::Debug for BlockList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockList")
            .field("len", &self.len)
            .field("blocks", &self.blocks().collect::<Vec<_>>())
            .finish()
    }
}

/// Encode `list` into blocks. Shorthand for [`BlockList::encode`].
pub fn sorted_list_to_block(list: &UidList) -> Result<BlockList> {
    BlockList::encode(list)
}

/// Decode `blocks` into a list. Shorthand for [`BlockList::decode`].
pub fn block_to_list(blocks: &BlockList) -> Result<UidList> {
    blocks.decode()
}

/// Intersect `a` with `b`, leaving the result in `a`. `b` is not modified.
///
/// Decoding `a` afterwards gives exactly what
/// [`intersect_with`](crate::intersect_with) would have left in the decoded
/// list, duplicates included. No allocation is made: survivors are
/// compacted to the front of `a`'s own blocks.
pub fn intersect_with_block(a: &mut BlockList, b: &BlockList) {
    debug_assert!(a.is_well_formed());
    debug_assert!(b.is_well_formed());

    let (na, alen) = (a.blocks.len(), a.len);
    let nb = b.blocks.len();

    // Read cursors (block, offset) into a and b. The write cursor w counts
    // survivors and never passes the read position in a.
    let (mut ab, mut ai) = (0, 0);
    let (mut bb, mut bi) = (0, 0);
    let mut w = 0;
    let mut skipped = 0;

    while ab < na && bb < nb {
        let afill = fill_of(na, alen, ab);
        let ablk = &a.blocks[ab].0[..afill];
        let (amax, l) = (ablk[afill - 1], ablk[ai]);
        let bblk = b.block(bb);
        let r = bblk[bi];

        if amax < r {
            ab += 1;
            ai = 0;
            skipped += 1;
            continue;
        }
        if bblk[bblk.len() - 1] < l {
            bb += 1;
            bi = 0;
            skipped += 1;
            continue;
        }

        match l.cmp(&r) {
            Ordering::Equal => {
                a.blocks[w / BLOCK_SIZE].0[w % BLOCK_SIZE] = l;
                w += 1;
                ai += 1;
                bi += 1;
            }
            Ordering::Less => {
                ai += 1;
            }
            Ordering::Greater => {
                bi += 1;
            }
        }

        if ai == afill {
            ab += 1;
            ai = 0;
        }
        if bi == bblk.len() {
            bb += 1;
            bi = 0;
        }
    }

    log::trace!(
        "intersect_with_block: {} + {} blocks, {} skipped whole",
        na,
        nb,
        skipped
    );

    a.blocks.truncate((w + BLOCK_SIZE - 1) / BLOCK_SIZE);
    a.len = w;
}
