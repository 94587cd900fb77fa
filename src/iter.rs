//! Positions and iterators.
//!
//! A `Position` is a detached handle: it names an element (or the end) of one
//! specific container and caches that element's index. It never borrows the
//! container, so it stays around across mutations. Inserting or removing
//! items in front of it makes the cached index stale; `refresh` fixes that by
//! walking back to head. Removing the element itself makes the position
//! dangle, which the generation check catches.

use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::node::{NodeId, Pool};

static NEXT_OWNER: AtomicUsize = AtomicUsize::new(1);

/// A fresh container identity.
pub(crate) fn next_owner() -> usize {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

#[derive(Copy, Clone, Debug)]
pub struct Position {
    owner: usize,
    node: NodeId,
    generation: u32,
    index: usize,
}

impl Position {
    /// The index this position had when it was created or last refreshed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn node(&self) -> NodeId {
        self.node
    }
}

/// Positions are equal when they name the same element. The cached index
/// plays no part.
impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.owner == other.owner && self.node == other.node && self.generation == other.generation
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.node.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Pool<T> {
    pub(crate) fn position(&self, owner: usize, node: NodeId, index: usize) -> Position {
        Position { owner, node, generation: self.generation(node), index }
    }

    pub(crate) fn end_position(&self, owner: usize, x: usize) -> Position {
        self.position(owner, self.tail, self.strand(x).len)
    }

    /// The node a position names, which may be tail.
    pub(crate) fn resolve(&self, owner: usize, pos: &Position) -> Result<NodeId> {
        if pos.owner != owner {
            Err(Error::ForeignPosition)
        } else if pos.node == self.tail || self.is_live(pos.node, pos.generation) {
            Ok(pos.node)
        } else {
            Err(Error::StalePosition)
        }
    }

    /// Like `resolve`, but the end doesn't count.
    pub(crate) fn resolve_item(&self, owner: usize, x: usize, pos: &Position) -> Result<NodeId> {
        let node = self.resolve(owner, pos)?;
        if node == self.tail {
            Err(Error::OutOfRange { index: self.strand(x).len, len: self.strand(x).len })
        } else {
            Ok(node)
        }
    }

    pub(crate) fn refresh(&self, owner: usize, x: usize, pos: &mut Position) -> Option<usize> {
        let node = self.resolve(owner, pos).ok()?;
        pos.index = self.rank_of(x, node) - 1;
        Some(pos.index)
    }

    pub(crate) fn next_position(&self, owner: usize, x: usize, pos: &Position) -> Result<Position> {
        let node = self.resolve_item(owner, x, pos)?;
        let next = self.lane(node, x, 0).next;
        Ok(self.position(owner, next, pos.index + 1))
    }

    pub(crate) fn prev_position(&self, owner: usize, x: usize, pos: &Position) -> Result<Position> {
        let node = self.resolve(owner, pos)?;
        let prev = self.lane(node, x, 0).prev;
        if prev == self.head {
            return Err(Error::OutOfRange { index: std::usize::MAX, len: self.strand(x).len });
        }
        Ok(self.position(owner, prev, pos.index.saturating_sub(1)))
    }

    /// Move a position by `delta` items. The walk starts from the position's
    /// own node; the index is recomputed first so a stale cache doesn't matter.
    pub(crate) fn offset(&self, owner: usize, x: usize, pos: &Position, delta: isize) -> Result<Position> {
        let node = self.resolve(owner, pos)?;
        let len = self.strand(x).len;
        let index = self.rank_of(x, node) - 1;
        let target = if delta >= 0 {
            index.checked_add(delta as usize)
        } else {
            index.checked_sub(delta.wrapping_neg() as usize)
        };
        match target {
            Some(target) if target <= len => {
                let found = self.seek(x, node, index + 1, target + 1);
                Ok(self.position(owner, found, target))
            }
            Some(target) => Err(Error::OutOfRange { index: target, len }),
            None => Err(Error::OutOfRange { index: std::usize::MAX, len }),
        }
    }

    pub(crate) fn iter(&self, x: usize) -> Iter<'_, T> {
        let strand = self.strand(x);
        Iter {
            pool: self,
            x,
            front: self.lane(self.head, x, 0).next,
            back: self.lane(self.tail, x, 0).prev,
            remaining: strand.len,
        }
    }

    /// Iterate `start..end`. The bounds must already be checked.
    pub(crate) fn iter_range(&self, x: usize, start: usize, end: usize) -> Iter<'_, T> {
        if start == end {
            return Iter { pool: self, x, front: self.tail, back: self.head, remaining: 0 };
        }
        let front = self.node_at(x, start);
        let back = self.seek(x, front, start + 1, end);
        Iter { pool: self, x, front, back, remaining: end - start }
    }
}

/// Borrowing iterator over the items of one ordering.
pub struct Iter<'a, T> {
    pool: &'a Pool<T>,
    x: usize,
    front: NodeId,
    back: NodeId,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front;
        self.front = self.pool.lane(node, self.x, 0).next;
        self.remaining -= 1;
        Some(self.pool.item(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back;
        self.back = self.pool.lane(node, self.x, 0).prev;
        self.remaining -= 1;
        Some(self.pool.item(node))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

/// Owning iterator. The pool goes with it, so there's no need to unlink
/// anything; values are just taken out of their slots in order.
pub struct IntoIter<T> {
    pool: Pool<T>,
    ids: std::vec::IntoIter<NodeId>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(pool: Pool<T>) -> Self {
        let ids = pool.ids(0).into_iter();
        IntoIter { pool, ids }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let id = self.ids.next()?;
        self.pool.free(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        let id = self.ids.next_back()?;
        self.pool.free(id)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
