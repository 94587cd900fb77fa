//! The single ordering skip list engine.
//!
//! Everything here operates on one strand `x` of a `Pool`. Positions are
//! tracked as ranks: head has rank 0, the item at index `i` has rank `i + 1`
//! and tail has rank `len + 1`. A lane's skip is the rank difference between
//! the node and its `next` on that level, so summing skips on the way down a
//! search gives the absolute position of wherever the search ends up.
//!
//! Backward links are kept on every level. They let a node be unlinked (and
//! its rank recomputed) without searching for it again, which is what the
//! composite container needs when an element is erased through a different
//! ordering.

use std::cmp::max;

use log::trace;

use crate::cursor::{Cursor, SkipEntry};
use crate::node::{Lane, NodeId, Pool};

impl<T> Pool<T> {
    /// Build the trail to the node at `target` rank. Entry `l` is the last
    /// node on level `l` with a rank below `target`.
    pub(crate) fn cursor_at_rank(&self, x: usize, target: usize) -> Cursor {
        debug_assert!(target >= 1 && target <= self.strand(x).len + 1);
        let mut cursor = Cursor::new(self.head, self.max_level());
        let mut node = self.head;
        let mut rank = 0;

        for l in (0..=self.strand(x).level).rev() {
            loop {
                let lane = self.lane(node, x, l);
                if lane.next != self.tail && rank + lane.skip < target {
                    rank += lane.skip;
                    node = lane.next;
                } else {
                    break;
                }
            }
            cursor.set(l, SkipEntry { node, rank });
        }

        cursor
    }

    /// Build the trail to the first item for which `before` is false. The
    /// predicate must be monotonic along the strand (true for a prefix).
    pub(crate) fn cursor_before<F>(&self, x: usize, mut before: F) -> Cursor
        where F: FnMut(&T) -> bool
    {
        let mut cursor = Cursor::new(self.head, self.max_level());
        let mut node = self.head;
        let mut rank = 0;

        for l in (0..=self.strand(x).level).rev() {
            loop {
                let lane = self.lane(node, x, l);
                if lane.next != self.tail && before(self.item(lane.next)) {
                    rank += lane.skip;
                    node = lane.next;
                } else {
                    break;
                }
            }
            cursor.set(l, SkipEntry { node, rank });
        }

        cursor
    }

    /// Thread the (already allocated) node `id` into strand `x` directly
    /// after the cursor's level 0 predecessor. The cursor is updated to
    /// include any levels the strand grew by.
    pub(crate) fn link(&mut self, x: usize, cursor: &mut Cursor, id: NodeId) {
        let height = self.height(id, x);
        let (head, tail) = (self.head, self.tail);
        let strand = self.strand(x);

        if height > strand.level {
            // New levels see the whole strand as coming before them.
            for l in strand.level + 1..=height {
                *self.lane_mut(head, x, l) = Lane { next: tail, prev: NodeId::NIL, skip: strand.len + 1 };
                self.lane_mut(tail, x, l).prev = head;
                cursor.set(l, SkipEntry { node: head, rank: 0 });
            }
            trace!("strand {} grew from level {} to {}", x, strand.level, height);
            self.strand_mut(x).level = height;
        }

        let rank = cursor.index() + 1;
        for l in 0..=height {
            let SkipEntry { node: pred, rank: pred_rank } = cursor.entry(l);
            let old = self.lane(pred, x, l);
            // The successor moves one rank further away.
            *self.lane_mut(id, x, l) = Lane {
                next: old.next,
                prev: pred,
                skip: old.skip + pred_rank + 1 - rank,
            };
            self.lane_mut(old.next, x, l).prev = id;
            let pred_lane = self.lane_mut(pred, x, l);
            pred_lane.next = id;
            pred_lane.skip = rank - pred_rank;
        }

        let level = self.strand(x).level;
        cursor.update_offsets(self, x, height + 1..=level, 1);
        self.strand_mut(x).len += 1;
    }

    /// Remove `id` from strand `x`. The node stays allocated and its own lanes
    /// are left as they were.
    pub(crate) fn unlink(&mut self, x: usize, id: NodeId) {
        let height = self.height(id, x);
        let level = self.strand(x).level;

        for l in 0..=height {
            let lane = self.lane(id, x, l);
            let pred = self.lane_mut(lane.prev, x, l);
            pred.next = lane.next;
            pred.skip = pred.skip + lane.skip - 1;
            self.lane_mut(lane.next, x, l).prev = lane.prev;
        }

        // Levels above the node's own lose one item from whichever lane
        // spans it. Walk back until something tall enough shows up.
        let mut pred = self.lane(id, x, height).prev;
        for l in height + 1..=level {
            while self.top(pred, x) < l {
                let top = self.top(pred, x);
                pred = self.lane(pred, x, top).prev;
            }
            self.lane_mut(pred, x, l).skip -= 1;
        }

        self.strand_mut(x).len -= 1;
        self.shrink(x);
    }

    /// Drop empty levels off the top of the strand.
    pub(crate) fn shrink(&mut self, x: usize) {
        let before = self.strand(x).level;
        let mut level = before;
        while level > 0 && self.lane(self.head, x, level).next == self.tail {
            level -= 1;
        }
        if level != before {
            trace!("strand {} shrank from level {} to {}", x, before, level);
            self.strand_mut(x).level = level;
        }
    }

    /// The node at `index`. `index == len` gives tail.
    pub(crate) fn node_at(&self, x: usize, index: usize) -> NodeId {
        self.seek(x, self.head, 0, index + 1)
    }

    /// Recompute a node's rank by walking backward to head. Each hop goes
    /// along the tallest lane of the current node, so this takes O(log n).
    pub(crate) fn rank_of(&self, x: usize, id: NodeId) -> usize {
        let mut rank = 0;
        let mut node = id;
        while node != self.head {
            let top = self.top(node, x);
            let prev = self.lane(node, x, top).prev;
            rank += self.lane(prev, x, top).skip;
            node = prev;
        }
        rank
    }

    /// Find the node `target` ranks away from head, starting the walk at
    /// `from` (which has rank `from_rank`). Climbs while the express lanes
    /// don't overshoot, then descends.
    pub(crate) fn seek(&self, x: usize, from: NodeId, from_rank: usize, target: usize) -> NodeId {
        let mut node = from;
        let mut rank = from_rank;

        if target >= rank {
            loop {
                let lane = self.lane(node, x, self.top(node, x));
                if lane.next.is_nil() || rank + lane.skip > target { break; }
                rank += lane.skip;
                node = lane.next;
            }
            let mut l = self.top(node, x);
            loop {
                let lane = self.lane(node, x, l);
                if !lane.next.is_nil() && rank + lane.skip <= target {
                    rank += lane.skip;
                    node = lane.next;
                } else if l == 0 {
                    break;
                } else {
                    l -= 1;
                }
            }
        } else {
            loop {
                let top = self.top(node, x);
                let prev = self.lane(node, x, top).prev;
                if prev.is_nil() { break; }
                let skip = self.lane(prev, x, top).skip;
                if rank - target < skip { break; }
                rank -= skip;
                node = prev;
            }
            let mut l = self.top(node, x);
            loop {
                let prev = self.lane(node, x, l).prev;
                let skip = if prev.is_nil() { 0 } else { self.lane(prev, x, l).skip };
                if !prev.is_nil() && rank - target >= skip {
                    rank -= skip;
                    node = prev;
                } else if l == 0 {
                    break;
                } else {
                    l -= 1;
                }
            }
        }

        debug_assert_eq!(rank, target);
        node
    }

    /// Starting at item `from` (index `from_index`), find the first index in
    /// `from_index..end` whose item fails `pred`. `pred` must hold for a
    /// prefix of that range and fail for the rest, as it does along a sorted
    /// run. Returns that index and the node there (which may lie past `end`).
    pub(crate) fn scan<F>(&self, x: usize, from: NodeId, from_index: usize, end: usize, mut pred: F) -> (usize, NodeId)
        where F: FnMut(&T) -> bool
    {
        if from_index >= end || !pred(self.item(from)) {
            return (from_index, from);
        }

        // `node` always satisfies pred from here on.
        let mut node = from;
        let mut index = from_index;
        loop {
            let lane = self.lane(node, x, self.height(node, x));
            if index + lane.skip < end && pred(self.item(lane.next)) {
                index += lane.skip;
                node = lane.next;
            } else {
                break;
            }
        }

        let mut l = self.height(node, x);
        loop {
            let lane = self.lane(node, x, l);
            if index + lane.skip < end && pred(self.item(lane.next)) {
                index += lane.skip;
                node = lane.next;
            } else if l == 0 {
                break;
            } else {
                l -= 1;
            }
        }

        (index + 1, self.lane(node, x, 0).next)
    }

    /// Ids of every item in strand order.
    pub(crate) fn ids(&self, x: usize) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.strand(x).len);
        let mut node = self.lane(self.head, x, 0).next;
        while node != self.tail {
            ids.push(node);
            node = self.lane(node, x, 0).next;
        }
        ids
    }

    /// Validate the structure of strand `x`. Panics on any inconsistency.
    pub(crate) fn check_strand(&self, x: usize) {
        let strand = self.strand(x);
        assert!(strand.level <= self.max_level());

        // The trail of where each level should arrive next, and at which rank.
        let mut iter = vec![SkipEntry { node: self.head, rank: 0 }; strand.level + 1];
        let mut node = self.head;
        let mut rank = 0;
        let mut tallest = 0;

        loop {
            let is_sentinel = node == self.head || node == self.tail;
            let top = if is_sentinel {
                strand.level
            } else {
                assert!(self.node(node).value.is_some());
                let height = self.height(node, x);
                assert!(height <= strand.level, "node taller than its strand");
                tallest = max(tallest, height);
                height
            };

            for (l, entry) in iter[..=top].iter_mut().enumerate() {
                assert_eq!(entry.node, node, "level {} skipped a node", l);
                assert_eq!(entry.rank, rank, "bad skip count on level {}", l);
                if node == self.tail { continue; }

                let lane = self.lane(node, x, l);
                assert!(lane.skip >= 1);
                assert_eq!(self.lane(lane.next, x, l).prev, node, "backward link mismatch on level {}", l);
                entry.node = lane.next;
                entry.rank = rank + lane.skip;
            }

            if node == self.tail { break; }
            node = self.lane(node, x, 0).next;
            rank += 1;
        }

        assert_eq!(rank, strand.len + 1);
        assert_eq!(tallest, strand.level, "strand level is not the tallest node");
    }
}
