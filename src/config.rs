use std::cmp::Ordering;
use std::marker::PhantomData;

/// Compile time description of a key ordered list: what it stores, how to get
/// a key out of an item, how keys compare and whether keys must be unique.
///
/// Implement this on a marker type to get a custom ordering:
///
/// ```
/// use std::cmp::Ordering;
/// use skiplists::{ListConfig, SortedList};
///
/// struct Descending;
/// impl ListConfig for Descending {
///     type Item = u32;
///     type Key = u32;
///     const UNIQUE: bool = true;
///     fn key(item: &u32) -> &u32 { item }
///     fn cmp(a: &u32, b: &u32) -> Ordering { b.cmp(a) }
/// }
///
/// let list: SortedList<Descending> = vec![1, 3, 2].into_iter().collect();
/// assert_eq!(list.iter().cloned().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
pub trait ListConfig {
    type Item;
    type Key: ?Sized;

    /// When set, inserting an item whose key is already present is refused.
    const UNIQUE: bool;

    fn key(item: &Self::Item) -> &Self::Key;

    /// Must be a total order and agree with itself for the lifetime of the
    /// items in the list.
    fn cmp(a: &Self::Key, b: &Self::Key) -> Ordering;

    fn less(a: &Self::Key, b: &Self::Key) -> bool {
        Self::cmp(a, b) == Ordering::Less
    }
}

/// Items are their own keys, unique.
pub struct SetConfig<T>(PhantomData<fn() -> T>);

impl<T: Ord> ListConfig for SetConfig<T> {
    type Item = T;
    type Key = T;
    const UNIQUE: bool = true;
    fn key(item: &T) -> &T { item }
    fn cmp(a: &T, b: &T) -> Ordering { a.cmp(b) }
}

/// Items are their own keys, duplicates allowed.
pub struct MultiSetConfig<T>(PhantomData<fn() -> T>);

impl<T: Ord> ListConfig for MultiSetConfig<T> {
    type Item = T;
    type Key = T;
    const UNIQUE: bool = false;
    fn key(item: &T) -> &T { item }
    fn cmp(a: &T, b: &T) -> Ordering { a.cmp(b) }
}

/// `(key, value)` pairs ordered by key, unique keys.
pub struct MapConfig<K, V>(PhantomData<fn() -> (K, V)>);

impl<K: Ord, V> ListConfig for MapConfig<K, V> {
    type Item = (K, V);
    type Key = K;
    const UNIQUE: bool = true;
    fn key(item: &(K, V)) -> &K { &item.0 }
    fn cmp(a: &K, b: &K) -> Ordering { a.cmp(b) }
}

/// `(key, value)` pairs ordered by key, duplicate keys allowed.
pub struct MultiMapConfig<K, V>(PhantomData<fn() -> (K, V)>);

impl<K: Ord, V> ListConfig for MultiMapConfig<K, V> {
    type Item = (K, V);
    type Key = K;
    const UNIQUE: bool = false;
    fn key(item: &(K, V)) -> &K { &item.0 }
    fn cmp(a: &K, b: &K) -> Ordering { a.cmp(b) }
}
