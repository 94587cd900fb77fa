//! Skip list containers with order statistics.
//!
//! Every container here is a doubly linked skip list in which each link also
//! records how many items it jumps over:
//!
//! ```text
//! <head> -----------4-----------> [4] -----------------3--------------> <tail>
//! <head> ---1---> [1] -----3----> [4] -------2------> [6] -----1-----> <tail>
//! <head> ---1---> [1] -1-> [2] -1-> [4] -1-> [5] -1-> [6] -1-> [7] -1-> <tail>
//! ```
//!
//! Adding up the counts on the way down a search gives the index of whatever
//! the search lands on, so lookups by index are as cheap as lookups by key,
//! and a contiguous run of items can be cut out or spliced in by rewriting a
//! handful of links per level.
//!
//! - [`SortedList`] and its aliases [`SkipSet`], [`MultiSkipSet`],
//!   [`SkipMap`] and [`MultiSkipMap`] keep items in key order.
//! - [`IndexedList`] keeps items wherever they were put and supports O(log n)
//!   cut, splice, move and swap plus in-place sorting.
//! - [`Composite`] keeps several orderings of one set of items.
//!
//! Node levels are random. Each container owns its random number generator;
//! pass one to the `with_rng` constructors for reproducible layouts.
//!
//! Nothing here is thread safe beyond what `Send` gives you.

mod config;
mod composite;
mod cursor;
mod error;
mod indexed;
mod iter;
mod level;
mod node;
mod options;
mod range;
mod skiplist;
mod sort;
mod sorted;

pub use crate::composite::{Composite, Handle, Index, View, ViewMut};
pub use crate::config::{ListConfig, MapConfig, MultiMapConfig, MultiSetConfig, SetConfig};
pub use crate::error::{Error, Result};
pub use crate::indexed::IndexedList;
pub use crate::iter::{IntoIter, Iter, Position};
pub use crate::level::{default_rng, draw_level, LevelGenerator};
pub use crate::options::{Options, DEFAULT_CAPACITY, DEFAULT_PROBABILITY, MAX_LEVEL_CAP};
pub use crate::sorted::{MultiSkipMap, MultiSkipSet, SkipMap, SkipSet, SortedList};
