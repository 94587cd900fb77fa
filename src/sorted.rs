//! Key ordered containers.
//!
//! `SortedList` is one engine for sets, maps, multisets and multimaps; the
//! `ListConfig` it is instantiated with decides which. Every variant also
//! keeps skip counts, so items can be looked up by index as well as by key.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ops::Range;

use log::debug;
use rand::rngs::SmallRng;
use rand::RngCore;

use crate::config::{ListConfig, MapConfig, MultiMapConfig, MultiSetConfig, SetConfig};
use crate::cursor::Cursor;
use crate::error::{check_index, check_range, Result};
use crate::iter::{next_owner, IntoIter, Iter, Position};
use crate::level::{default_rng, LevelGenerator};
use crate::node::Pool;
use crate::options::Options;

pub type SkipSet<T, R = SmallRng> = SortedList<SetConfig<T>, R>;
pub type MultiSkipSet<T, R = SmallRng> = SortedList<MultiSetConfig<T>, R>;
pub type SkipMap<K, V, R = SmallRng> = SortedList<MapConfig<K, V>, R>;
pub type MultiSkipMap<K, V, R = SmallRng> = SortedList<MultiMapConfig<K, V>, R>;

/// A skip list kept in key order.
///
/// ```
/// use skiplists::SkipMap;
///
/// let mut map = SkipMap::new();
/// for &k in &[5, 3, 8, 1, 4] {
///     map.insert((k, k * 10));
/// }
/// assert_eq!(map.get_value(&8), Some(&80));
/// assert_eq!(map.keys().cloned().collect::<Vec<_>>(), vec![1, 3, 4, 5, 8]);
/// assert_eq!(map.at(2).unwrap(), &(4, 40));
/// ```
pub struct SortedList<C: ListConfig, R = SmallRng> {
    pool: Pool<C::Item>,
    levels: LevelGenerator<R>,
    owner: usize,
    _config: PhantomData<fn() -> C>,
}

impl<C: ListConfig> SortedList<C> {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self::with_rng(options, default_rng())
    }
}

impl<C: ListConfig, R> SortedList<C, R> {
    /// Build a list which draws node levels from `rng`.
    pub fn with_rng(options: Options, rng: R) -> Self {
        SortedList {
            pool: Pool::new(1, options.max_level()),
            levels: LevelGenerator::new(options, rng),
            owner: next_owner(),
            _config: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The tallest level currently in use.
    pub fn level(&self) -> usize {
        self.pool.strand(0).level
    }

    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    pub fn options(&self) -> Options {
        self.levels.options()
    }

    /// Remove everything. O(n).
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    fn lower_cursor(&self, key: &C::Key) -> Cursor {
        self.pool.cursor_before(0, |item| C::less(C::key(item), key))
    }

    fn upper_cursor(&self, key: &C::Key) -> Cursor {
        self.pool.cursor_before(0, |item| !C::less(key, C::key(item)))
    }

    /// The position directly after the cursor.
    fn position_after(&self, cursor: &Cursor) -> Position {
        let node = self.pool.lane(cursor.here(), 0, 0).next;
        self.pool.position(self.owner, node, cursor.index())
    }

    /// First item whose key is not less than `key`.
    pub fn lower_bound(&self, key: &C::Key) -> Position {
        self.position_after(&self.lower_cursor(key))
    }

    /// First item whose key is greater than `key`.
    pub fn upper_bound(&self, key: &C::Key) -> Position {
        self.position_after(&self.upper_cursor(key))
    }

    pub fn equal_range(&self, key: &C::Key) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    pub fn count(&self, key: &C::Key) -> usize {
        let (first, last) = self.equal_range(key);
        last.index() - first.index()
    }

    /// Position of the first item with this key.
    pub fn find(&self, key: &C::Key) -> Option<Position> {
        let pos = self.lower_bound(key);
        if pos.node() != self.pool.tail && !C::less(key, C::key(self.pool.item(pos.node()))) {
            Some(pos)
        } else {
            None
        }
    }

    pub fn get(&self, key: &C::Key) -> Option<&C::Item> {
        self.find(key).map(|pos| self.pool.item(pos.node()))
    }

    pub fn contains(&self, key: &C::Key) -> bool {
        self.find(key).is_some()
    }

    /// The item at `index` in key order.
    pub fn at(&self, index: usize) -> Result<&C::Item> {
        check_index(index, self.len())?;
        Ok(self.pool.item(self.pool.node_at(0, index)))
    }

    /// Position of the item at `index`. `index == len()` gives the end.
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

    /// The item a position refers to. `None` for the end, for positions of
    /// removed items and for positions from other containers.
    pub fn at_position(&self, pos: &Position) -> Option<&C::Item> {
        self.pool.resolve_item(self.owner, 0, pos).ok().map(|node| self.pool.item(node))
    }

    pub fn next_position(&self, pos: &Position) -> Result<Position> {
        self.pool.next_position(self.owner, 0, pos)
    }

    pub fn prev_position(&self, pos: &Position) -> Result<Position> {
        self.pool.prev_position(self.owner, 0, pos)
    }

    /// Move `pos` by `delta` items in O(log n).
    pub fn offset(&self, pos: &Position, delta: isize) -> Result<Position> {
        self.pool.offset(self.owner, 0, pos, delta)
    }

    /// Recompute a position's cached index. Returns the index, or `None` if
    /// the item is gone or the position belongs elsewhere.
    pub fn refresh(&self, pos: &mut Position) -> Option<usize> {
        self.pool.refresh(self.owner, 0, pos)
    }

    /// Current index of a position, ignoring its cache.
    pub fn index_of(&self, pos: &Position) -> Result<usize> {
        let node = self.pool.resolve(self.owner, pos)?;
        Ok(self.pool.rank_of(0, node) - 1)
    }

    /// Order two positions by where their items sit. Keys decide unless they
    /// are equal, in which case the run of equal keys is walked from `a`.
    pub fn cmp_positions(&self, a: &Position, b: &Position) -> Result<Ordering> {
        let na = self.pool.resolve(self.owner, a)?;
        let nb = self.pool.resolve(self.owner, b)?;
        let tail = self.pool.tail;
        if na == nb {
            return Ok(Ordering::Equal);
        } else if na == tail {
            return Ok(Ordering::Greater);
        } else if nb == tail {
            return Ok(Ordering::Less);
        }

        let key_b = C::key(self.pool.item(nb));
        match C::cmp(C::key(self.pool.item(na)), key_b) {
            Ordering::Equal => {}
            ord => return Ok(ord),
        }
        let mut node = self.pool.lane(na, 0, 0).next;
        while node != tail && C::cmp(C::key(self.pool.item(node)), key_b) == Ordering::Equal {
            if node == nb {
                return Ok(Ordering::Less);
            }
            node = self.pool.lane(node, 0, 0).next;
        }
        Ok(Ordering::Greater)
    }

    pub fn first(&self) -> Option<&C::Item> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&C::Item> {
        self.iter().next_back()
    }

    /// Remove the item at `pos`, returning it and the position of the item
    /// that followed it.
    pub fn erase(&mut self, pos: &Position) -> Result<(C::Item, Position)> {
        let node = self.pool.resolve_item(self.owner, 0, pos)?;
        let index = self.pool.rank_of(0, node) - 1;
        let next = self.pool.lane(node, 0, 0).next;
        self.pool.unlink(0, node);
        let item = self.pool.free_item(node);
        Ok((item, self.pool.position(self.owner, next, index)))
    }

    pub fn erase_index(&mut self, index: usize) -> Result<C::Item> {
        check_index(index, self.len())?;
        let node = self.pool.node_at(0, index);
        self.pool.unlink(0, node);
        Ok(self.pool.free_item(node))
    }

    /// Remove the items at `range` in one cut. Returns how many were removed.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<usize> {
        check_range(range.start, range.end, self.len())?;
        let seg = self.pool.cut(0, range.start, range.end);
        let removed = seg.len;
        for id in self.pool.segment_ids(0, &seg) {
            self.pool.free(id);
        }
        self.pool.discard(seg);
        debug!("erased {} items", removed);
        Ok(removed)
    }

    /// Remove the first item with this key.
    pub fn remove(&mut self, key: &C::Key) -> Option<C::Item> {
        let pos = self.find(key)?;
        self.erase(&pos).ok().map(|(item, _)| item)
    }

    /// Remove every item with this key. Returns how many there were.
    pub fn remove_all(&mut self, key: &C::Key) -> usize {
        let (first, last) = self.equal_range(key);
        self.erase_range(first.index()..last.index()).unwrap_or(0)
    }

    pub fn pop_first(&mut self) -> Option<C::Item> {
        if self.is_empty() { None } else { self.erase_index(0).ok() }
    }

    pub fn pop_last(&mut self) -> Option<C::Item> {
        let len = self.len();
        if len == 0 { None } else { self.erase_index(len - 1).ok() }
    }

    /// Keep only the items for which `keep` returns true.
    pub fn retain<F: FnMut(&C::Item) -> bool>(&mut self, mut keep: F) {
        for id in self.pool.ids(0) {
            if !keep(self.pool.item(id)) {
                self.pool.unlink(0, id);
                self.pool.free(id);
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, C::Item> {
        self.pool.iter(0)
    }

    /// Iterate the items at `range`.
    pub fn range(&self, range: Range<usize>) -> Result<Iter<'_, C::Item>> {
        check_range(range.start, range.end, self.len())?;
        Ok(self.pool.iter_range(0, range.start, range.end))
    }

    /// Check every structural invariant. Panics if something is off.
    pub fn check(&self) {
        self.pool.check_strand(0);
        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for item in iter {
                match C::cmp(C::key(prev), C::key(item)) {
                    Ordering::Less => {}
                    Ordering::Equal => assert!(!C::UNIQUE, "duplicate key in a unique list"),
                    Ordering::Greater => panic!("items out of order"),
                }
                prev = item;
            }
        }
    }
}

impl<C: ListConfig, R: RngCore> SortedList<C, R> {
    /// Add an item. Unique lists refuse (and drop) an item whose key is
    /// already present; the returned flag says whether it went in. Multi
    /// lists add it after any items with an equal key.
    pub fn insert(&mut self, item: C::Item) -> (Position, bool) {
        match self.try_insert(item) {
            Ok(pos) => (pos, true),
            Err((pos, _)) => (pos, false),
        }
    }

    /// Like `insert`, but a refused item is handed back together with the
    /// position of the item that blocked it.
    pub fn try_insert(&mut self, item: C::Item) -> std::result::Result<Position, (Position, C::Item)> {
        let mut cursor = if C::UNIQUE {
            let cursor = self.lower_cursor(C::key(&item));
            let existing = self.position_after(&cursor);
            if existing.node() != self.pool.tail
                && !C::less(C::key(&item), C::key(self.pool.item(existing.node()))) {
                return Err((existing, item));
            }
            cursor
        } else {
            self.upper_cursor(C::key(&item))
        };

        let height = self.levels.random();
        let id = self.pool.alloc(Some(item), &[height]);
        self.pool.link(0, &mut cursor, id);
        Ok(self.pool.position(self.owner, id, cursor.index()))
    }

    /// Insert, or swap out the item holding an equal key in a unique list.
    /// Returns the replaced item.
    pub fn replace(&mut self, item: C::Item) -> (Position, Option<C::Item>) {
        match self.try_insert(item) {
            Ok(pos) => (pos, None),
            Err((pos, item)) => {
                let slot = self.pool.item_mut(pos.node());
                (pos, Some(std::mem::replace(slot, item)))
            }
        }
    }
}

/// Helpers for lists of `(key, value)` pairs.
impl<K, V, C, R> SortedList<C, R> where C: ListConfig<Item = (K, V), Key = K> {
    pub fn get_value<'a>(&'a self, key: &K) -> Option<&'a V> where K: 'a, V: 'a {
        self.get(key).map(|(_, v)| v)
    }

    pub fn get_value_mut<'a>(&'a mut self, key: &K) -> Option<&'a mut V> where K: 'a, V: 'a {
        let pos = self.find(key)?;
        Some(&mut self.pool.item_mut(pos.node()).1)
    }

    pub fn keys<'a>(&'a self) -> impl DoubleEndedIterator<Item = &'a K> + 'a where K: 'a, V: 'a {
        self.iter().map(|(k, _)| k)
    }

    pub fn values<'a>(&'a self) -> impl DoubleEndedIterator<Item = &'a V> + 'a where K: 'a, V: 'a {
        self.iter().map(|(_, v)| v)
    }
}

impl<C: ListConfig> Default for SortedList<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ListConfig, R: Clone> Clone for SortedList<C, R> where C::Item: Clone {
    fn clone(&self) -> Self {
        SortedList {
            pool: self.pool.clone(),
            levels: self.levels.clone(),
            owner: next_owner(),
            _config: PhantomData,
        }
    }
}

impl<C: ListConfig, R> fmt::Debug for SortedList<C, R> where C::Item: fmt::Debug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<C: ListConfig, R> PartialEq for SortedList<C, R> where C::Item: PartialEq {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<C: ListConfig, R: RngCore> Extend<C::Item> for SortedList<C, R> {
    fn extend<I: IntoIterator<Item = C::Item>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<C: ListConfig> FromIterator<C::Item> for SortedList<C> {
    fn from_iter<I: IntoIterator<Item = C::Item>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<C: ListConfig, R> IntoIterator for SortedList<C, R> {
    type Item = C::Item;
    type IntoIter = IntoIter<C::Item>;

    fn into_iter(self) -> IntoIter<C::Item> {
        IntoIter::new(self.pool)
    }
}

impl<'a, C: ListConfig, R> IntoIterator for &'a SortedList<C, R> {
    type Item = &'a C::Item;
    type IntoIter = Iter<'a, C::Item>;

    fn into_iter(self) -> Iter<'a, C::Item> {
        self.iter()
    }
}
