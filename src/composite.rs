//! Several orderings over one set of items.
//!
//! A `Composite` owns a single node pool and threads every node through N
//! strands, one per `Index`. Each node has an independently drawn tower for
//! each strand. Inserting or erasing an item always touches every strand, so
//! all orderings hold the same items at all times; the per-ordering views only
//! ever rearrange their own strand.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use log::debug;
use rand::rngs::SmallRng;
use rand::RngCore;

use crate::error::{check_index, check_range, Error, Result};
use crate::iter::{next_owner, Iter, Position};
use crate::level::{default_rng, LevelGenerator};
use crate::node::{NodeId, Pool};
use crate::options::Options;

/// How one ordering of a composite container arranges its items.
pub enum Index<T> {
    /// Insertion order, rearrangeable by position.
    Sequenced,
    /// Sorted by a comparator. Equal items stay in insertion order.
    Ordered(Box<dyn Fn(&T, &T) -> Ordering>),
}

impl<T> Index<T> {
    pub fn ordered_by<F>(cmp: F) -> Self where F: Fn(&T, &T) -> Ordering + 'static {
        Index::Ordered(Box::new(cmp))
    }

    pub fn ordered_by_key<K: Ord, F>(key: F) -> Self where F: Fn(&T) -> K + 'static {
        Index::Ordered(Box::new(move |a: &T, b: &T| key(a).cmp(&key(b))))
    }

    pub fn is_ordered(&self) -> bool {
        match *self {
            Index::Sequenced => false,
            Index::Ordered(_) => true,
        }
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_ordered() { "Ordered" } else { "Sequenced" })
    }
}

/// Names one item of a composite container, independent of any ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    owner: usize,
    node: NodeId,
    generation: u32,
}

/// A container with several simultaneous orderings of the same items.
///
/// ```
/// use skiplists::{Composite, Index};
///
/// struct Person { id: u32, name: &'static str }
///
/// let mut people = Composite::new(vec![
///     Index::ordered_by_key(|p: &Person| p.id),
///     Index::ordered_by_key(|p: &Person| p.name),
/// ]);
/// people.insert(Person { id: 2, name: "b" });
/// people.insert(Person { id: 1, name: "a" });
///
/// let by_id: Vec<u32> = people.view(0).unwrap().iter().map(|p| p.id).collect();
/// let by_name: Vec<&str> = people.view(1).unwrap().iter().map(|p| p.name).collect();
/// assert_eq!(by_id, vec![1, 2]);
/// assert_eq!(by_name, vec!["a", "b"]);
/// assert_eq!(people.len(), 2);
/// ```
pub struct Composite<T, R = SmallRng> {
    pool: Pool<T>,
    indices: Vec<Index<T>>,
    levels: LevelGenerator<R>,
    owner: usize,
}

impl<T> Composite<T> {
    /// # Panics
    ///
    /// Panics if `indices` is empty.
    pub fn new(indices: Vec<Index<T>>) -> Self {
        Self::with_options(indices, Options::default())
    }

    pub fn with_options(indices: Vec<Index<T>>, options: Options) -> Self {
        Self::with_rng(indices, options, default_rng())
    }
}

impl<T, R> Composite<T, R> {
    pub fn with_rng(indices: Vec<Index<T>>, options: Options, rng: R) -> Self {
        assert!(!indices.is_empty(), "a composite container needs at least one index");
        Composite {
            pool: Pool::new(indices.len(), options.max_level()),
            indices,
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

    /// Number of orderings.
    pub fn orderings(&self) -> usize {
        self.indices.len()
    }

    pub fn max_level(&self) -> usize {
        self.levels.max_level()
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    fn handle(&self, node: NodeId) -> Handle {
        Handle { owner: self.owner, node, generation: self.pool.generation(node) }
    }

    fn resolve(&self, handle: &Handle) -> Result<NodeId> {
        if handle.owner != self.owner {
            Err(Error::ForeignPosition)
        } else if self.pool.is_live(handle.node, handle.generation) {
            Ok(handle.node)
        } else {
            Err(Error::StalePosition)
        }
    }

    pub fn get(&self, handle: &Handle) -> Option<&T> {
        self.resolve(handle).ok().map(|node| self.pool.item(node))
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Remove an item from every ordering.
    pub fn erase(&mut self, handle: &Handle) -> Result<T> {
        let node = self.resolve(handle)?;
        Ok(self.erase_node(node))
    }

    fn erase_node(&mut self, node: NodeId) -> T {
        for x in 0..self.indices.len() {
            self.pool.unlink(x, node);
        }
        self.pool.free_item(node)
    }

    /// Link `node` into strand `x`. Sequenced strands take it at `at` (or at
    /// the end), ordered strands after any equal items.
    fn thread(&mut self, x: usize, node: NodeId, at: Option<usize>) {
        let mut cursor = match self.indices[x] {
            Index::Sequenced => {
                let index = at.unwrap_or_else(|| self.pool.strand(x).len);
                self.pool.cursor_at_rank(x, index + 1)
            }
            Index::Ordered(ref cmp) => {
                let item = self.pool.item(node);
                self.pool.cursor_before(x, |v| cmp(v, item) != Ordering::Greater)
            }
        };
        self.pool.link(x, &mut cursor, node);
    }

    /// Change an item in place. Every ordered index re-threads the item
    /// afterwards, so `f` may change the fields they sort by.
    pub fn modify<F: FnOnce(&mut T)>(&mut self, handle: &Handle, f: F) -> Result<()> {
        let node = self.resolve(handle)?;
        f(self.pool.item_mut(node));
        for x in 0..self.indices.len() {
            if self.indices[x].is_ordered() {
                self.pool.unlink(x, node);
                self.thread(x, node, None);
            }
        }
        Ok(())
    }

    pub fn view(&self, index: usize) -> Result<View<'_, T, R>> {
        self.check_index_id(index)?;
        Ok(View { c: self, x: index })
    }

    pub fn view_mut(&mut self, index: usize) -> Result<ViewMut<'_, T, R>> {
        self.check_index_id(index)?;
        Ok(ViewMut { c: self, x: index })
    }

    fn check_index_id(&self, index: usize) -> Result<()> {
        if index < self.indices.len() {
            Ok(())
        } else {
            Err(Error::NoSuchIndex { index, count: self.indices.len() })
        }
    }

    /// Check every strand, that they all hold the same nodes, and that
    /// ordered strands are sorted.
    pub fn check(&self) {
        let len = self.len();
        let mut expected = self.pool.ids(0);
        expected.sort();

        for (x, index) in self.indices.iter().enumerate() {
            self.pool.check_strand(x);
            assert_eq!(self.pool.strand(x).len, len, "ordering {} has the wrong length", x);

            let ids = self.pool.ids(x);
            if let Index::Ordered(ref cmp) = *index {
                for pair in ids.windows(2) {
                    assert!(cmp(self.pool.item(pair[0]), self.pool.item(pair[1])) != Ordering::Greater,
                        "ordering {} is out of order", x);
                }
            }

            let mut ids = ids;
            ids.sort();
            assert_eq!(ids, expected, "ordering {} holds different items", x);
        }
    }
}

impl<T, R: RngCore> Composite<T, R> {
    /// Add an item to every ordering. Sequenced indices get it at the end.
    pub fn insert(&mut self, item: T) -> Handle {
        self.insert_placed(item, None)
    }

    /// `placed` pins the item to an index in one sequenced strand.
    fn insert_placed(&mut self, item: T, placed: Option<(usize, usize)>) -> Handle {
        let heights = self.levels.random_tower(self.indices.len());
        let node = self.pool.alloc(Some(item), &heights);
        for x in 0..self.indices.len() {
            let at = match placed {
                Some((px, index)) if px == x => Some(index),
                _ => None,
            };
            self.thread(x, node, at);
        }
        self.handle(node)
    }
}

impl<T: fmt::Debug, R> fmt::Debug for Composite<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("indices", &self.indices)
            .field("items", &DebugItems(self))
            .finish()
    }
}

struct DebugItems<'a, T, R>(&'a Composite<T, R>);

impl<'a, T: fmt::Debug, R> fmt::Debug for DebugItems<'a, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.pool.iter(0)).finish()
    }
}

/// Read access to one ordering.
pub struct View<'a, T, R> {
    c: &'a Composite<T, R>,
    x: usize,
}

impl<'a, T, R> View<'a, T, R> {
    pub fn len(&self) -> usize {
        self.c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    pub fn is_ordered(&self) -> bool {
        self.c.indices[self.x].is_ordered()
    }

    pub fn iter(&self) -> Iter<'a, T> {
        self.c.pool.iter(self.x)
    }

    pub fn at(&self, index: usize) -> Result<&'a T> {
        check_index(index, self.len())?;
        Ok(self.c.pool.item(self.c.pool.node_at(self.x, index)))
    }

    pub fn handle_at(&self, index: usize) -> Result<Handle> {
        check_index(index, self.len())?;
        Ok(self.c.handle(self.c.pool.node_at(self.x, index)))
    }

    /// Where the item sits in this ordering.
    pub fn index_of(&self, handle: &Handle) -> Result<usize> {
        let node = self.c.resolve(handle)?;
        Ok(self.c.pool.rank_of(self.x, node) - 1)
    }

    /// A position in this ordering. `index == len()` gives the end.
    pub fn position_at(&self, index: usize) -> Result<Position> {
        check_index(index, self.len() + 1)?;
        Ok(self.c.pool.position(self.c.owner, self.c.pool.node_at(self.x, index), index))
    }

    pub fn begin(&self) -> Position {
        let first = self.c.pool.lane(self.c.pool.head, self.x, 0).next;
        self.c.pool.position(self.c.owner, first, 0)
    }

    pub fn end(&self) -> Position {
        self.c.pool.end_position(self.c.owner, self.x)
    }

    /// Where a handle's item sits in this ordering, as a position.
    pub fn position_of(&self, handle: &Handle) -> Result<Position> {
        let node = self.c.resolve(handle)?;
        Ok(self.c.pool.position(self.c.owner, node, self.c.pool.rank_of(self.x, node) - 1))
    }

    /// The handle of the item a position names. Fails on the end.
    pub fn handle_of(&self, pos: &Position) -> Result<Handle> {
        let node = self.c.pool.resolve_item(self.c.owner, self.x, pos)?;
        Ok(self.c.handle(node))
    }

    pub fn get(&self, pos: &Position) -> Option<&'a T> {
        let pool = &self.c.pool;
        pool.resolve_item(self.c.owner, self.x, pos).ok().map(|node| pool.item(node))
    }

    pub fn next_position(&self, pos: &Position) -> Result<Position> {
        self.c.pool.next_position(self.c.owner, self.x, pos)
    }

    pub fn prev_position(&self, pos: &Position) -> Result<Position> {
        self.c.pool.prev_position(self.c.owner, self.x, pos)
    }

    pub fn offset(&self, pos: &Position, delta: isize) -> Result<Position> {
        self.c.pool.offset(self.c.owner, self.x, pos, delta)
    }

    /// Recompute a position's cached index against this ordering. `None` if
    /// its item is gone.
    pub fn refresh(&self, pos: &mut Position) -> Option<usize> {
        self.c.pool.refresh(self.c.owner, self.x, pos)
    }

    pub fn first(&self) -> Option<&'a T> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&'a T> {
        self.iter().next_back()
    }

    /// Index of the first item for which `f` does not return `Less`. `f`
    /// says how an item compares to the target, as in `slice::binary_search_by`.
    pub fn lower_bound_by<F: FnMut(&T) -> Ordering>(&self, mut f: F) -> usize {
        self.c.pool.cursor_before(self.x, |v| f(v) == Ordering::Less).index()
    }

    /// Index of the first item for which `f` returns `Greater`.
    pub fn upper_bound_by<F: FnMut(&T) -> Ordering>(&self, mut f: F) -> usize {
        self.c.pool.cursor_before(self.x, |v| f(v) != Ordering::Greater).index()
    }

    /// The first item for which `f` returns `Equal`.
    pub fn find_by<F: FnMut(&T) -> Ordering>(&self, mut f: F) -> Option<Handle> {
        let pool = &self.c.pool;
        let cursor = pool.cursor_before(self.x, |v| f(v) == Ordering::Less);
        let node = pool.lane(cursor.here(), self.x, 0).next;
        if node != pool.tail && f(pool.item(node)) == Ordering::Equal {
            Some(self.c.handle(node))
        } else {
            None
        }
    }
}

/// Write access to one ordering. Positional rearrangement is only allowed on
/// sequenced indices.
pub struct ViewMut<'a, T, R> {
    c: &'a mut Composite<T, R>,
    x: usize,
}

impl<'a, T, R> ViewMut<'a, T, R> {
    pub fn view(&self) -> View<'_, T, R> {
        View { c: &*self.c, x: self.x }
    }

    pub fn len(&self) -> usize {
        self.c.len()
    }

    fn sequenced(&self) -> Result<()> {
        if self.c.indices[self.x].is_ordered() {
            Err(Error::OrderedIndex { index: self.x })
        } else {
            Ok(())
        }
    }

    /// Remove the item at `index` of this ordering from every ordering.
    pub fn erase_at(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        let node = self.c.pool.node_at(self.x, index);
        Ok(self.c.erase_node(node))
    }

    pub fn move_range(&mut self, dest: usize, range: Range<usize>) -> Result<()> {
        self.sequenced()?;
        let len = self.len();
        check_range(range.start, range.end, len)?;
        check_index(dest, len + 1)?;
        self.c.pool.move_range(self.x, dest, range.start, range.end);
        Ok(())
    }

    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.sequenced()?;
        check_index(i, self.len())?;
        check_index(j, self.len())?;
        self.c.pool.swap(self.x, i, j);
        Ok(())
    }

    pub fn reverse(&mut self) -> Result<()> {
        self.sequenced()?;
        let len = self.len();
        self.c.pool.reverse_range(self.x, 0, len);
        Ok(())
    }

    /// Stable sort of this ordering only.
    pub fn sort_by<F: FnMut(&T, &T) -> Ordering>(&mut self, cmp: F) -> Result<()> {
        self.sequenced()?;
        let len = self.len();
        debug!("sorting sequenced index {}", self.x);
        self.c.pool.sort_strand(self.x, 0, len, true, cmp);
        Ok(())
    }
}

impl<'a, T, R: RngCore> ViewMut<'a, T, R> {
    /// Insert an item at `index` of this (sequenced) ordering. The other
    /// orderings place it by their own rules.
    pub fn insert_at(&mut self, index: usize, item: T) -> Result<Handle> {
        self.sequenced()?;
        check_index(index, self.len() + 1)?;
        Ok(self.c.insert_placed(item, Some((self.x, index))))
    }

    pub fn push_back(&mut self, item: T) -> Result<Handle> {
        let len = self.len();
        self.insert_at(len, item)
    }

    pub fn push_front(&mut self, item: T) -> Result<Handle> {
        self.insert_at(0, item)
    }
}
