//! Sorting a strand in place.
//!
//! None of these copy or move item values. Merge sort only rearranges links
//! through cut/splice; insertion sort and the quicksort partition copy node
//! ids out, order those and rebuild the run.

use std::cmp::Ordering;

use log::debug;

use crate::node::{NodeId, Pool};

/// Runs of at most this many items are handed to insertion sort.
pub(crate) const SORT_THRESHOLD: usize = 100;

impl<T> Pool<T> {
    /// Stable merge sort of `start..end`.
    pub(crate) fn merge_sort<F>(&mut self, x: usize, start: usize, end: usize, cmp: &mut F)
        where F: FnMut(&T, &T) -> Ordering
    {
        if end - start <= SORT_THRESHOLD {
            self.insertion_sort(x, start, end, cmp);
            return;
        }
        let mid = start + (end - start) / 2;
        self.merge_sort(x, start, mid, cmp);
        self.merge_sort(x, mid, end, cmp);
        self.merge_runs(x, start, mid, end, cmp);
    }

    /// Merge the sorted runs `start..mid` and `mid..end`. Items from the left
    /// run go first among equals.
    pub(crate) fn merge_runs<F>(&mut self, x: usize, start: usize, mut mid: usize, end: usize, cmp: &mut F)
        where F: FnMut(&T, &T) -> Ordering
    {
        if start == mid || mid == end {
            return;
        }
        let mut i = start;
        let mut left = self.node_at(x, start);
        let mut right = self.seek(x, left, start + 1, mid + 1);

        while i < mid && mid < end {
            // Skip the left items which already belong in front of `right`.
            let (next_i, next_left) = {
                let pivot = self.item(right);
                self.scan(x, left, i, mid, |v| cmp(v, pivot) != Ordering::Greater)
            };
            if next_i == mid {
                break;
            }
            i = next_i;
            left = next_left;

            // Then the right items which belong in front of `left`. `right`
            // itself is one of them.
            let (run_end, after) = {
                let bound = self.item(left);
                self.scan(x, right, mid, end, |v| cmp(v, bound) == Ordering::Less)
            };
            self.move_range(x, i, mid, run_end);
            i += run_end - mid;
            mid = run_end;
            right = after;
        }
    }

    /// Insertion sort of `start..end` over an array of node ids. The run is
    /// cut out, relinked in sorted order and spliced back.
    pub(crate) fn insertion_sort<F>(&mut self, x: usize, start: usize, end: usize, cmp: &mut F)
        where F: FnMut(&T, &T) -> Ordering
    {
        if end - start < 2 {
            return;
        }
        let mut seg = self.cut(x, start, end);
        let mut ids = self.segment_ids(x, &seg);
        for k in 1..ids.len() {
            let mut j = k;
            while j > 0 && cmp(self.item(ids[j - 1]), self.item(ids[j])) == Ordering::Greater {
                ids.swap(j - 1, j);
                j -= 1;
            }
        }
        self.rebuild(x, &mut seg, &ids);
        self.splice(x, start, seg);
    }

    /// Quicksort of `start..end`. Not stable. Recurses into the shorter
    /// side of each partition and loops on the longer one, so the stack stays
    /// O(log n) deep whatever the input.
    pub(crate) fn quick_sort<F>(&mut self, x: usize, mut start: usize, mut end: usize, cmp: &mut F)
        where F: FnMut(&T, &T) -> Ordering
    {
        while end - start > SORT_THRESHOLD {
            let (lt, gt) = self.partition(x, start, end, cmp);
            if lt - start < end - gt {
                self.quick_sort(x, start, lt, cmp);
                start = gt;
            } else {
                self.quick_sort(x, gt, end, cmp);
                end = lt;
            }
        }
        self.insertion_sort(x, start, end, cmp);
    }

    /// Three way partition of `start..end` around a median of three pivot.
    /// The run is cut out and relinked as less, equal, greater. Returns the
    /// bounds of the equal block, which already sits in its final place.
    fn partition<F>(&mut self, x: usize, start: usize, end: usize, cmp: &mut F) -> (usize, usize)
        where F: FnMut(&T, &T) -> Ordering
    {
        let median = self.median_of_three(x, start, start + (end - start) / 2, end - 1, cmp);
        let pivot = self.node_at(x, median);

        let mut seg = self.cut(x, start, end);
        let mut less = Vec::with_capacity(seg.len);
        let mut equal = Vec::new();
        let mut greater = Vec::new();
        for id in self.segment_ids(x, &seg) {
            match cmp(self.item(id), self.item(pivot)) {
                Ordering::Less => less.push(id),
                Ordering::Equal => equal.push(id),
                Ordering::Greater => greater.push(id),
            }
        }

        let lt = start + less.len();
        let gt = lt + equal.len();
        less.append(&mut equal);
        less.append(&mut greater);
        self.rebuild(x, &mut seg, &less);
        self.splice(x, start, seg);
        (lt, gt)
    }

    fn median_of_three<F>(&self, x: usize, a: usize, b: usize, c: usize, cmp: &mut F) -> usize
        where F: FnMut(&T, &T) -> Ordering
    {
        let node_a = self.node_at(x, a);
        let node_b = self.node_at(x, b);
        let node_c = self.node_at(x, c);
        let less = |cmp: &mut F, p: NodeId, q: NodeId| cmp(self.item(p), self.item(q)) == Ordering::Less;

        if less(cmp, node_a, node_b) {
            if less(cmp, node_b, node_c) { b } else if less(cmp, node_a, node_c) { c } else { a }
        } else if less(cmp, node_a, node_c) {
            a
        } else if less(cmp, node_b, node_c) {
            c
        } else {
            b
        }
    }

    pub(crate) fn sort_strand<F>(&mut self, x: usize, start: usize, end: usize, stable: bool, mut cmp: F)
        where F: FnMut(&T, &T) -> Ordering
    {
        debug!("{} sort of {} items on strand {}", if stable { "merge" } else { "quick" }, end - start, x);
        if stable {
            self.merge_sort(x, start, end, &mut cmp);
        } else {
            self.quick_sort(x, start, end, &mut cmp);
        }
    }
}
