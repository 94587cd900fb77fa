//! A positional list: items stay wherever they are put, and every index
//! based operation is O(log n).

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Range;

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::RngCore;

use crate::error::{check_index, check_range, Error, Result};
use crate::iter::{next_owner, IntoIter, Iter, Position};
use crate::level::{default_rng, LevelGenerator};
use crate::node::Pool;
use crate::options::Options;

/// A sequence backed by an indexed skip list.
///
/// ```
/// use skiplists::IndexedList;
///
/// let mut list: IndexedList<u32> = vec![10, 20, 30, 40, 50].into_iter().collect();
/// let middle = list.cut(1..3).unwrap();
/// assert_eq!(list.to_vec(), vec![10, 40, 50]);
/// assert_eq!(middle.to_vec(), vec![20, 30]);
///
/// let mut middle = middle;
/// list.splice(1, &mut middle).unwrap();
/// assert_eq!(list.to_vec(), vec![10, 20, 30, 40, 50]);
/// ```
pub struct IndexedList<T, R = SmallRng> {
    pool: Pool<T>,
    levels: LevelGenerator<R>,
    owner: usize,
}

impl<T> IndexedList<T> {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self::with_rng(options, default_rng())
    }

    pub fn from_slice(s: &[T]) -> Self where T: Clone {
        s.iter().cloned().collect()
    }
}

impl<T, R> IndexedList<T, R> {
    pub fn with_rng(options: Options, rng: R) -> Self {
        IndexedList {
            pool: Pool::new(1, options.max_level()),
            levels: LevelGenerator::new(options, rng),
            owner: next_owner(),
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn level(&self) -> usize {
        self.pool.strand(0).level
    }

    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    pub fn options(&self) -> Options {
        self.levels.options()
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn at(&self, index: usize) -> Result<&T> {
        check_index(index, self.len())?;
        Ok(self.pool.item(self.pool.node_at(0, index)))
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.len())?;
        let node = self.pool.node_at(0, index);
        Ok(self.pool.item_mut(node))
    }

    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.pool.iter(0)
    }

    pub fn range(&self, range: Range<usize>) -> Result<Iter<'_, T>> {
        check_range(range.start, range.end, self.len())?;
        Ok(self.pool.iter_range(0, range.start, range.end))
    }

    pub fn to_vec(&self) -> Vec<T> where T: Clone {
        self.iter().cloned().collect()
    }

    /// Compare against a slice without allocating.
    pub fn eq_list(&self, other: &[T]) -> bool where T: PartialEq {
        self.len() == other.len() && self.iter().eq(other.iter())
    }

    pub fn position_at(&self, index: usize) -> Result<Position> {
        check_index(index, self.len() + 1)?;
        Ok(self.pool.position(self.owner, self.pool.node_at(0, index), index))
    }

    pub fn begin(&self) -> Position {
        let first = self.pool.lane(self.pool.head, 0, 0).next;
        self.pool.position(self.owner, first, 0)
    }

    pub fn end(&self) -> Position {
        self.pool.end_position(self.owner, 0)
    }

    pub fn get(&self, pos: &Position) -> Option<&T> {
        self.pool.resolve_item(self.owner, 0, pos).ok().map(|node| self.pool.item(node))
    }

    pub fn get_mut(&mut self, pos: &Position) -> Option<&mut T> {
        let node = self.pool.resolve_item(self.owner, 0, pos).ok()?;
        Some(self.pool.item_mut(node))
    }

    pub fn next_position(&self, pos: &Position) -> Result<Position> {
        self.pool.next_position(self.owner, 0, pos)
    }

    pub fn prev_position(&self, pos: &Position) -> Result<Position> {
        self.pool.prev_position(self.owner, 0, pos)
    }

    pub fn offset(&self, pos: &Position, delta: isize) -> Result<Position> {
        self.pool.offset(self.owner, 0, pos, delta)
    }

    pub fn refresh(&self, pos: &mut Position) -> Option<usize> {
        self.pool.refresh(self.owner, 0, pos)
    }

    pub fn index_of(&self, pos: &Position) -> Result<usize> {
        let node = self.pool.resolve(self.owner, pos)?;
        Ok(self.pool.rank_of(0, node) - 1)
    }

    /// Positions of the same list compare by cached index.
    pub fn cmp_positions(&self, a: &Position, b: &Position) -> Result<Ordering> {
        self.pool.resolve(self.owner, a)?;
        self.pool.resolve(self.owner, b)?;
        Ok(a.index().cmp(&b.index()))
    }

    pub fn erase(&mut self, pos: &Position) -> Result<T> {
        let node = self.pool.resolve_item(self.owner, 0, pos)?;
        self.pool.unlink(0, node);
        Ok(self.pool.free_item(node))
    }

    pub fn erase_index(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        let node = self.pool.node_at(0, index);
        self.pool.unlink(0, node);
        Ok(self.pool.free_item(node))
    }

    pub fn erase_range(&mut self, range: Range<usize>) -> Result<usize> {
        check_range(range.start, range.end, self.len())?;
        Ok(self.drop_range(range.start, range.end))
    }

    /// Frees `start..end`, which must already be in bounds.
    fn drop_range(&mut self, start: usize, end: usize) -> usize {
        let seg = self.pool.cut(0, start, end);
        let removed = seg.len;
        for id in self.pool.segment_ids(0, &seg) {
            self.pool.free(id);
        }
        self.pool.discard(seg);
        removed
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() { None } else { self.erase_index(0).ok() }
    }

    pub fn pop_back(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 { None } else { self.erase_index(len - 1).ok() }
    }

    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        for id in self.pool.ids(0) {
            if !keep(self.pool.item(id)) {
                self.pool.unlink(0, id);
                self.pool.free(id);
            }
        }
    }

    /// Drop every item equal to the item before it.
    pub fn unique(&mut self) -> usize where T: PartialEq {
        self.unique_by(|a, b| a == b)
    }

    /// Drop every item `same` considers equal to the item kept before it.
    /// Returns how many went.
    pub fn unique_by<F: FnMut(&T, &T) -> bool>(&mut self, mut same: F) -> usize {
        let ids = self.pool.ids(0);
        let mut removed = 0;
        let mut kept = match ids.first() {
            Some(&id) => id,
            None => return 0,
        };
        for &id in &ids[1..] {
            if same(self.pool.item(kept), self.pool.item(id)) {
                self.pool.unlink(0, id);
                self.pool.free(id);
                removed += 1;
            } else {
                kept = id;
            }
        }
        removed
    }

    /// Remove the items at `range` into a new list with the same options.
    pub fn cut(&mut self, range: Range<usize>) -> Result<IndexedList<T, R>> where R: Clone {
        let mut target = IndexedList::with_rng(self.options(), self.levels.rng().clone());
        self.cut_into(range, &mut target)?;
        Ok(target)
    }

    /// Replace the contents of `target` with the items at `range`, which are
    /// removed from this list. Fails without touching either list if the run
    /// could be taller than `target` allows.
    pub fn cut_into<R2>(&mut self, range: Range<usize>, target: &mut IndexedList<T, R2>) -> Result<()> {
        check_range(range.start, range.end, self.len())?;
        if self.level() > target.max_level() {
            warn!("refusing cut: level {} does not fit max level {}", self.level(), target.max_level());
            return Err(Error::IncompatibleLevel { level: self.level(), max_level: target.max_level() });
        }

        target.clear();
        let seg = self.pool.cut(0, range.start, range.end);
        debug!("cut {} items at {}", seg.len, range.start);
        let seg = self.pool.migrate(seg, &mut target.pool);
        target.pool.splice(0, 0, seg);
        Ok(())
    }

    /// Move every item of `other` in front of the item at `index`, leaving
    /// `other` empty. Fails without touching either list if `other` is taller
    /// than this list allows.
    pub fn splice<R2>(&mut self, index: usize, other: &mut IndexedList<T, R2>) -> Result<()> {
        check_index(index, self.len() + 1)?;
        if other.level() > self.max_level() {
            warn!("refusing splice: level {} does not fit max level {}", other.level(), self.max_level());
            return Err(Error::IncompatibleLevel { level: other.level(), max_level: self.max_level() });
        }

        let len = other.len();
        let seg = other.pool.cut(0, 0, len);
        let seg = other.pool.migrate(seg, &mut self.pool);
        debug!("splicing {} items at {}", len, index);
        self.pool.splice(0, index, seg);
        Ok(())
    }

    /// Move the items at `range` in front of the item at `dest`.
    pub fn move_range(&mut self, dest: usize, range: Range<usize>) -> Result<()> {
        let len = self.len();
        check_range(range.start, range.end, len)?;
        check_index(dest, len + 1)?;
        self.pool.move_range(0, dest, range.start, range.end);
        Ok(())
    }

    /// Move the item at `src` in front of the item at `dest`.
    pub fn move_to(&mut self, dest: usize, src: usize) -> Result<()> {
        check_index(src, self.len())?;
        self.move_range(dest, src..src + 1)
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.len())?;
        check_index(j, self.len())?;
        self.pool.swap(0, i, j);
        Ok(())
    }

    /// Swap the items two positions refer to. Both must come from this list.
    pub fn iter_swap(&mut self, a: &Position, b: &Position) -> Result<()> {
        let na = self.pool.resolve_item(self.owner, 0, a)?;
        let nb = self.pool.resolve_item(self.owner, 0, b)?;
        let i = self.pool.rank_of(0, na) - 1;
        let j = self.pool.rank_of(0, nb) - 1;
        self.pool.swap(0, i, j);
        Ok(())
    }

    /// Exchange two non overlapping runs.
    pub fn swap_ranges(&mut self, a: Range<usize>, b: Range<usize>) -> Result<()> {
        let len = self.len();
        check_range(a.start, a.end, len)?;
        check_range(b.start, b.end, len)?;
        let (first, second) = if a.start <= b.start { (a, b) } else { (b, a) };
        if first.end > second.start {
            return Err(Error::OutOfRange { index: second.start, len: first.end });
        }
        self.pool.swap_ranges(0, (first.start, first.end), (second.start, second.end));
        Ok(())
    }

    pub fn reverse(&mut self) {
        let len = self.len();
        self.pool.reverse_range(0, 0, len);
    }

    pub fn reverse_range(&mut self, range: Range<usize>) -> Result<()> {
        check_range(range.start, range.end, self.len())?;
        self.pool.reverse_range(0, range.start, range.end);
        Ok(())
    }

    /// Stable sort. This is a merge sort which only relinks nodes.
    pub fn sort(&mut self) where T: Ord {
        self.sort_by(T::cmp);
    }

    pub fn sort_by<F: FnMut(&T, &T) -> Ordering>(&mut self, cmp: F) {
        let len = self.len();
        self.pool.sort_strand(0, 0, len, true, cmp);
    }

    pub fn sort_by_key<K: Ord, F: FnMut(&T) -> K>(&mut self, mut key: F) {
        self.sort_by(|a, b| key(a).cmp(&key(b)));
    }

    /// Merge sort of part of the list.
    pub fn merge_sort_range<F>(&mut self, range: Range<usize>, mut cmp: F) -> Result<()>
        where F: FnMut(&T, &T) -> Ordering
    {
        check_range(range.start, range.end, self.len())?;
        self.pool.merge_sort(0, range.start, range.end, &mut cmp);
        Ok(())
    }

    /// Not stable. Usually slower than `sort_by` on a linked structure.
    pub fn quick_sort_by<F: FnMut(&T, &T) -> Ordering>(&mut self, cmp: F) {
        let len = self.len();
        self.pool.sort_strand(0, 0, len, false, cmp);
    }

    /// Array assisted insertion sort of the whole list. Quadratic; meant for
    /// short lists.
    pub fn insertion_sort_by<F: FnMut(&T, &T) -> Ordering>(&mut self, mut cmp: F) {
        let len = self.len();
        self.pool.insertion_sort(0, 0, len, &mut cmp);
    }

    /// Merge the already sorted `other` into this already sorted list,
    /// leaving `other` empty. Items from this list go first among equals.
    pub fn merge_by<R2, F>(&mut self, other: &mut IndexedList<T, R2>, mut cmp: F) -> Result<()>
        where F: FnMut(&T, &T) -> Ordering
    {
        let mid = self.len();
        self.splice(mid, other)?;
        let end = self.len();
        self.pool.merge_runs(0, 0, mid, end, &mut cmp);
        Ok(())
    }

    pub fn check(&self) {
        self.pool.check_strand(0);
    }
}

impl<T, R: RngCore> IndexedList<T, R> {
    /// Insert `item` so it ends up at `index`.
    pub fn insert(&mut self, index: usize, item: T) -> Result<Position> {
        check_index(index, self.len() + 1)?;
        let mut cursor = self.pool.cursor_at_rank(0, index + 1);
        let height = self.levels.random();
        let id = self.pool.alloc(Some(item), &[height]);
        self.pool.link(0, &mut cursor, id);
        Ok(self.pool.position(self.owner, id, index))
    }

    /// Insert `item` in front of the item at `pos`.
    pub fn insert_before(&mut self, pos: &Position, item: T) -> Result<Position> {
        let index = self.index_of(pos)?;
        self.insert(index, item)
    }

    pub fn push_back(&mut self, item: T) -> Position {
        let len = self.len();
        self.insert_unchecked(len, item)
    }

    pub fn push_front(&mut self, item: T) -> Position {
        self.insert_unchecked(0, item)
    }

    fn insert_unchecked(&mut self, index: usize, item: T) -> Position {
        match self.insert(index, item) {
            Ok(pos) => pos,
            Err(e) => unreachable!("{}", e),
        }
    }

    /// Grow or shrink to `len` items, filling with clones of `value`.
    pub fn resize(&mut self, len: usize, value: T) where T: Clone {
        let current = self.len();
        if len < current {
            self.drop_range(len, current);
        }
        while self.len() < len {
            self.push_back(value.clone());
        }
    }
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, R: Clone> Clone for IndexedList<T, R> {
    fn clone(&self) -> Self {
        IndexedList {
            pool: self.pool.clone(),
            levels: self.levels.clone(),
            owner: next_owner(),
        }
    }
}

impl<T: fmt::Debug, R> fmt::Debug for IndexedList<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, R> PartialEq for IndexedList<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, R> Eq for IndexedList<T, R> {}

impl<T, R: RngCore> Extend<T> for IndexedList<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T> FromIterator<T> for IndexedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T, R> IntoIterator for IndexedList<T, R> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.pool)
    }
}

impl<'a, T, R> IntoIterator for &'a IndexedList<T, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
