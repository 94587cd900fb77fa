//! Node storage.
//!
//! Every container keeps its nodes in a `Pool`: a vector of slots addressed by
//! `NodeId`. Links between nodes are ids rather than pointers, so the doubly
//! linked lanes and the head/tail cycle need no unsafe code. A pool can thread
//! several independent orderings ("strands") through the same nodes; ordinary
//! containers use one, composite containers use N.
//!
//! Freeing a slot bumps its generation. `Position`s remember the generation
//! they were created with so a handle to a removed element can be told apart
//! from whatever reuses its slot later.

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub const NIL: NodeId = NodeId(usize::MAX);

    pub fn is_nil(self) -> bool {
        self == Self::NIL
    }
}

/// One level of one ordering in a node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Lane {
    pub next: NodeId,
    pub prev: NodeId,
    /// Number of level-0 hops from this node to `next`, counting `next`.
    pub skip: usize,
}

impl Lane {
    const DETACHED: Lane = Lane { next: NodeId::NIL, prev: NodeId::NIL, skip: 0 };
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    /// `None` only for sentinels.
    pub value: Option<T>,
    /// One tower per ordering. A tower for level `h` has `h + 1` lanes and is
    /// never resized.
    towers: Box<[Box<[Lane]>]>,
}

impl<T> Node<T> {
    fn new(value: Option<T>, heights: &[usize]) -> Self {
        let towers = heights.iter()
            .map(|&h| vec![Lane::DETACHED; h + 1].into_boxed_slice())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Node { value, towers }
    }

    pub fn height(&self, x: usize) -> usize {
        self.towers[x].len() - 1
    }

    pub fn lanes(&self, x: usize) -> &[Lane] {
        &self.towers[x]
    }

    pub fn lanes_mut(&mut self, x: usize) -> &mut [Lane] {
        &mut self.towers[x]
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Per-ordering bookkeeping.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub(crate) struct Strand {
    /// Tallest level populated by a real node. 0 when empty.
    pub level: usize,
    pub len: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    pub head: NodeId,
    pub tail: NodeId,
    strands: Vec<Strand>,
    max_level: usize,
}

impl<T> Pool<T> {
    pub fn new(orderings: usize, max_level: usize) -> Self {
        assert!(orderings >= 1, "a pool needs at least one ordering");
        let mut pool = Pool {
            slots: Vec::new(),
            free: Vec::new(),
            head: NodeId::NIL,
            tail: NodeId::NIL,
            strands: vec![Strand::default(); orderings],
            max_level,
        };
        let (head, tail) = pool.alloc_sentinels();
        pool.head = head;
        pool.tail = tail;
        pool
    }

    pub fn orderings(&self) -> usize {
        self.strands.len()
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Element count. Every strand holds the same elements between operations.
    pub fn len(&self) -> usize {
        self.strands[0].len
    }

    pub fn strand(&self, x: usize) -> Strand {
        self.strands[x]
    }

    pub fn strand_mut(&mut self, x: usize) -> &mut Strand {
        &mut self.strands[x]
    }

    pub fn alloc(&mut self, value: Option<T>, heights: &[usize]) -> NodeId {
        debug_assert_eq!(heights.len(), self.orderings());
        debug_assert!(heights.iter().all(|&h| h <= self.max_level));
        self.put(Node::new(value, heights))
    }

    /// Store an already built node, reusing a free slot when there is one.
    pub fn put(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(idx) => {
                let slot = &mut self.slots[idx];
                debug_assert!(slot.node.is_none());
                slot.node = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Slot { generation: 0, node: Some(node) });
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Remove a node from the pool. Its lanes are not touched; unlink it first.
    pub fn take(&mut self, id: NodeId) -> Node<T> {
        let slot = &mut self.slots[id.0];
        let node = match slot.node.take() {
            Some(node) => node,
            None => panic!("node {:?} freed twice", id),
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.0);
        node
    }

    pub fn free(&mut self, id: NodeId) -> Option<T> {
        self.take(id).value
    }

    /// Free a node which is known to hold an item.
    pub fn free_item(&mut self, id: NodeId) -> T {
        match self.free(id) {
            Some(value) => value,
            None => unreachable!("freed sentinel {:?} as an item", id),
        }
    }

    /// A head/tail pair with every lane of every ordering linked head to tail.
    pub fn alloc_sentinels(&mut self) -> (NodeId, NodeId) {
        let heights = vec![self.max_level; self.orderings()];
        let head = self.alloc(None, &heights);
        let tail = self.alloc(None, &heights);
        self.join_sentinels(head, tail);
        (head, tail)
    }

    pub fn join_sentinels(&mut self, head: NodeId, tail: NodeId) {
        for x in 0..self.orderings() {
            for l in 0..=self.max_level {
                *self.lane_mut(head, x, l) = Lane { next: tail, prev: NodeId::NIL, skip: 1 };
                *self.lane_mut(tail, x, l) = Lane { next: NodeId::NIL, prev: head, skip: 0 };
            }
        }
    }

    /// Drop every element. Slots are freed one by one rather than truncated so
    /// stale positions keep failing their generation check.
    pub fn clear(&mut self) {
        for idx in 0..self.slots.len() {
            let id = NodeId(idx);
            if id != self.head && id != self.tail && self.slots[idx].node.is_some() {
                self.free(id);
            }
        }
        let (head, tail) = (self.head, self.tail);
        self.join_sentinels(head, tail);
        for strand in self.strands.iter_mut() {
            *strand = Strand::default();
        }
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        match self.slots[id.0].node {
            Some(ref node) => node,
            None => panic!("dangling node {:?}", id),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.slots[id.0].node {
            Some(ref mut node) => node,
            None => panic!("dangling node {:?}", id),
        }
    }

    pub fn lane(&self, id: NodeId, x: usize, level: usize) -> Lane {
        self.node(id).lanes(x)[level]
    }

    pub fn lane_mut(&mut self, id: NodeId, x: usize, level: usize) -> &mut Lane {
        &mut self.node_mut(id).lanes_mut(x)[level]
    }

    pub fn height(&self, id: NodeId, x: usize) -> usize {
        self.node(id).height(x)
    }

    /// The highest lane worth looking at from this node. Sentinels have
    /// `max_level + 1` lanes but only the ones up to the strand level are live.
    pub fn top(&self, id: NodeId, x: usize) -> usize {
        let height = self.height(id, x);
        height.min(self.strands[x].level)
    }

    pub fn item(&self, id: NodeId) -> &T {
        match self.node(id).value {
            Some(ref value) => value,
            None => unreachable!("sentinel {:?} has no value", id),
        }
    }

    pub fn item_mut(&mut self, id: NodeId) -> &mut T {
        match self.node_mut(id).value {
            Some(ref mut value) => value,
            None => unreachable!("sentinel {:?} has no value", id),
        }
    }

    pub fn generation(&self, id: NodeId) -> u32 {
        self.slots[id.0].generation
    }

    /// True if `id` still names the element it named at `generation`.
    pub fn is_live(&self, id: NodeId, generation: u32) -> bool {
        match self.slots.get(id.0) {
            Some(slot) => slot.generation == generation
                && slot.node.as_ref().map_or(false, |n| n.value.is_some()),
            None => false,
        }
    }
}
