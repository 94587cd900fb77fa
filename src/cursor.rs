use std::ops::RangeInclusive;

use crate::node::{NodeId, Pool};

/// A single entry in a cursor: the last node at some level which comes before
/// the cursor's target, and that node's rank (head is rank 0, the first item
/// is rank 1).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SkipEntry {
    pub node: NodeId,
    pub rank: usize,
}

/// The update trail of a search. Built fresh by every top level operation
/// which walks down the list, then consumed by the mutation that follows.
///
/// Entries above the strand's current level always point at head.
#[derive(Clone, Debug)]
pub(crate) struct Cursor {
    entries: Vec<SkipEntry>,
}

impl Cursor {
    pub fn new(head: NodeId, max_level: usize) -> Self {
        Cursor { entries: vec![SkipEntry { node: head, rank: 0 }; max_level + 1] }
    }

    pub fn entry(&self, level: usize) -> SkipEntry {
        self.entries[level]
    }

    pub fn set(&mut self, level: usize, entry: SkipEntry) {
        self.entries[level] = entry;
    }

    /// The node directly before the target.
    pub fn here(&self) -> NodeId {
        self.entries[0].node
    }

    /// Rank of the node before the target, which is also the 0 based index of
    /// the target itself.
    pub fn index(&self) -> usize {
        self.entries[0].rank
    }

    /// Adjust the skip of every predecessor in `levels` by `by`.
    pub fn update_offsets<T>(&self, pool: &mut Pool<T>, x: usize, levels: RangeInclusive<usize>, by: isize) {
        for l in levels {
            let skip = &mut pool.lane_mut(self.entries[l].node, x, l).skip;
            // Adding an isize to a usize is awkward in rust.
            *skip = skip.wrapping_add(by as usize);
        }
    }
}
