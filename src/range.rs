//! Cut and splice.
//!
//! `cut` lifts a run of items out of a strand into a `Segment` with its own
//! sentinels, touching only the boundary links on each level. `splice` is the
//! mirror image. Both cost O(log n) per level regardless of the run length,
//! and every other bulk rearrangement (move, swap, reverse, the sorts) is
//! built out of them.

use std::collections::HashMap;

use log::debug;

use crate::node::{Lane, NodeId, Pool};

/// A detached run of items. Its sentinels live in the same pool as the items
/// and only its strand's lanes are meaningful. Must be given back to `splice`
/// (or `discard`) or the sentinels leak until the pool is dropped.
#[derive(Debug)]
pub(crate) struct Segment {
    pub head: NodeId,
    pub tail: NodeId,
    pub level: usize,
    pub len: usize,
}

impl<T> Pool<T> {
    /// Remove the items at `start..end` from strand `x`.
    pub(crate) fn cut(&mut self, x: usize, start: usize, end: usize) -> Segment {
        debug_assert!(start <= end && end <= self.strand(x).len);
        let (head, tail) = self.alloc_sentinels();
        let len = end - start;
        let mut seg = Segment { head, tail, level: 0, len };
        if len == 0 {
            return seg;
        }

        let before = self.cursor_at_rank(x, start + 1);
        let last = self.cursor_at_rank(x, end + 1);
        let level = self.strand(x).level;

        for l in 0..=level {
            let a = before.entry(l);
            let b = last.entry(l);

            if a.node == b.node {
                // No node of the run reaches this level.
                self.lane_mut(a.node, x, l).skip -= len;
                self.lane_mut(head, x, l).skip = len + 1;
                continue;
            }

            let a_lane = self.lane(a.node, x, l);
            let first = a_lane.next;
            let first_rank = a.rank + a_lane.skip;
            let b_lane = self.lane(b.node, x, l);
            let after = b_lane.next;
            let after_rank = b.rank + b_lane.skip;

            *self.lane_mut(head, x, l) = Lane { next: first, prev: NodeId::NIL, skip: first_rank - start };
            self.lane_mut(first, x, l).prev = head;

            let last_lane = self.lane_mut(b.node, x, l);
            last_lane.next = tail;
            last_lane.skip = end + 1 - b.rank;
            self.lane_mut(tail, x, l).prev = b.node;

            let a_lane = self.lane_mut(a.node, x, l);
            a_lane.next = after;
            a_lane.skip = after_rank - len - a.rank;
            self.lane_mut(after, x, l).prev = a.node;
        }

        seg.level = level;
        while seg.level > 0 && self.lane(head, x, seg.level).next == tail {
            seg.level -= 1;
        }

        self.strand_mut(x).len -= len;
        self.shrink(x);
        seg
    }

    /// Insert the whole segment so its first item lands at `at`. Consumes the
    /// segment. The caller makes sure `seg.level` fits this pool.
    pub(crate) fn splice(&mut self, x: usize, at: usize, seg: Segment) {
        debug_assert!(at <= self.strand(x).len);
        debug_assert!(seg.level <= self.max_level());
        if seg.len == 0 {
            self.discard(seg);
            return;
        }

        let cursor = self.cursor_at_rank(x, at + 1);
        let (head, tail) = (self.head, self.tail);
        let strand = self.strand(x);
        if seg.level > strand.level {
            for l in strand.level + 1..=seg.level {
                *self.lane_mut(head, x, l) = Lane { next: tail, prev: NodeId::NIL, skip: strand.len + 1 };
                self.lane_mut(tail, x, l).prev = head;
            }
            self.strand_mut(x).level = seg.level;
        }

        for l in 0..=seg.level {
            let w = cursor.entry(l);
            let seg_head = self.lane(seg.head, x, l);
            if seg_head.next == seg.tail {
                self.lane_mut(w.node, x, l).skip += seg.len;
                continue;
            }

            let first = seg_head.next;
            let first_rank = at + seg_head.skip;
            let last = self.lane(seg.tail, x, l).prev;
            let last_rank = at + seg.len + 1 - self.lane(last, x, l).skip;
            let w_lane = self.lane(w.node, x, l);
            let after = w_lane.next;
            let after_rank = w.rank + w_lane.skip + seg.len;

            let w_lane = self.lane_mut(w.node, x, l);
            w_lane.next = first;
            w_lane.skip = first_rank - w.rank;
            self.lane_mut(first, x, l).prev = w.node;

            let last_lane = self.lane_mut(last, x, l);
            last_lane.next = after;
            last_lane.skip = after_rank - last_rank;
            self.lane_mut(after, x, l).prev = last;
        }

        let level = self.strand(x).level;
        cursor.update_offsets(self, x, seg.level + 1..=level, seg.len as isize);
        self.strand_mut(x).len += seg.len;
        self.discard(seg);
    }

    /// Free a segment's sentinels. Any items still in it must have been
    /// handled by the caller.
    pub(crate) fn discard(&mut self, seg: Segment) {
        self.take(seg.head);
        self.take(seg.tail);
    }

    /// Item ids of a segment in order.
    pub(crate) fn segment_ids(&self, x: usize, seg: &Segment) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(seg.len);
        let mut node = self.lane(seg.head, x, 0).next;
        while node != seg.tail {
            ids.push(node);
            node = self.lane(node, x, 0).next;
        }
        ids
    }

    /// Relink the segment so it holds exactly `order`, in that order. Node
    /// heights are kept, skip counts are recomputed from scratch.
    pub(crate) fn rebuild(&mut self, x: usize, seg: &mut Segment, order: &[NodeId]) {
        let (head, tail) = (seg.head, seg.tail);
        let max_level = self.max_level();
        for l in 0..=max_level {
            *self.lane_mut(head, x, l) = Lane { next: tail, prev: NodeId::NIL, skip: 1 };
            *self.lane_mut(tail, x, l) = Lane { next: NodeId::NIL, prev: head, skip: 0 };
        }

        // Rank of the node currently last on each level.
        let mut last_rank = vec![0; max_level + 1];
        let mut level = 0;
        for (i, &id) in order.iter().enumerate() {
            let rank = i + 1;
            let height = self.height(id, x);
            level = level.max(height);
            for l in 0..=height {
                let prev = self.lane(tail, x, l).prev;
                let prev_lane = self.lane_mut(prev, x, l);
                prev_lane.next = id;
                prev_lane.skip = rank - last_rank[l];
                *self.lane_mut(id, x, l) = Lane { next: tail, prev, skip: 0 };
                self.lane_mut(tail, x, l).prev = id;
                last_rank[l] = rank;
            }
        }

        let end = order.len() + 1;
        for (l, &rank) in last_rank.iter().enumerate() {
            let prev = self.lane(tail, x, l).prev;
            self.lane_mut(prev, x, l).skip = end - rank;
        }
        seg.level = level;
        seg.len = order.len();
    }

    /// Move the items at `start..end` so they sit before the item currently at
    /// `dest`. `dest` inside the range (or at its end) is a no-op.
    pub(crate) fn move_range(&mut self, x: usize, dest: usize, start: usize, end: usize) {
        if start >= end || (dest >= start && dest <= end) {
            return;
        }
        let seg = self.cut(x, start, end);
        let at = if dest > end { dest - seg.len } else { dest };
        self.splice(x, at, seg);
    }

    /// Swap the items at `i` and `j`, as two single node moves.
    pub(crate) fn swap(&mut self, x: usize, i: usize, j: usize) {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        if i == j {
            return;
        }
        // [.. A(i) .. B(j) ..] -> [.. B A ..] -> [.. B .. A ..]
        let seg = self.cut(x, j, j + 1);
        self.splice(x, i, seg);
        if j > i + 1 {
            let seg = self.cut(x, i + 1, i + 2);
            self.splice(x, j, seg);
        }
    }

    /// Exchange two disjoint runs, `first` coming before `second`.
    pub(crate) fn swap_ranges(&mut self, x: usize, first: (usize, usize), second: (usize, usize)) {
        let (a, b) = first;
        let (c, d) = second;
        debug_assert!(a <= b && b <= c && c <= d);
        self.move_range(x, a, c, d);
        let shift = d - c;
        self.move_range(x, d, a + shift, b + shift);
    }

    /// Reverse the items at `start..end` with one cut and one splice.
    pub(crate) fn reverse_range(&mut self, x: usize, start: usize, end: usize) {
        if end - start < 2 {
            return;
        }
        let mut seg = self.cut(x, start, end);
        let mut ids = self.segment_ids(x, &seg);
        ids.reverse();
        self.rebuild(x, &mut seg, &ids);
        self.splice(x, start, seg);
    }

    /// Move a segment's nodes (and sentinels) from this pool into `dest`,
    /// keeping every tower and skip count. Both pools must hold a single
    /// strand and `seg.level` must fit `dest`.
    pub(crate) fn migrate(&mut self, seg: Segment, dest: &mut Pool<T>) -> Segment {
        debug_assert!(self.orderings() == 1 && dest.orderings() == 1);
        debug_assert!(seg.level <= dest.max_level());
        debug!("migrating {} items between pools", seg.len);

        let ids = self.segment_ids(0, &seg);
        let (head, tail) = dest.alloc_sentinels();
        let mut renamed = HashMap::with_capacity(ids.len() + 2);
        renamed.insert(seg.head, head);
        renamed.insert(seg.tail, tail);

        let mut moved = Vec::with_capacity(ids.len());
        for id in ids {
            let node = self.take(id);
            let new_id = dest.put(node);
            renamed.insert(id, new_id);
            moved.push(new_id);
        }

        for &id in &moved {
            for lane in dest.node_mut(id).lanes_mut(0) {
                lane.next = renamed[&lane.next];
                lane.prev = renamed[&lane.prev];
            }
        }

        for l in 0..=seg.level {
            let old_head = self.lane(seg.head, 0, l);
            *dest.lane_mut(head, 0, l) = Lane {
                next: renamed[&old_head.next],
                prev: NodeId::NIL,
                skip: old_head.skip,
            };
            let old_tail = self.lane(seg.tail, 0, l);
            dest.lane_mut(tail, 0, l).prev = renamed[&old_tail.prev];
        }

        let migrated = Segment { head, tail, level: seg.level, len: seg.len };
        self.discard(seg);
        migrated
    }
}
