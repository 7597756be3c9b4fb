use crate::error::{Error, Result};
use crate::splay_tree::tree;
use log::error;
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered map implemented using splay tree.
///
/// An splay tree is a self-adjusting binary tree with an additional property that recently accessed
/// items are quick to access again. After each operation, the item that was accessed is "splayed"
/// to the root of the tree. This includes lookups: `contains` and `value` take `&mut self` because
/// they reshape the tree.
///
/// Nodes are kept in an arena and refer to each other by handle, so dropping a map never recurses
/// over the height of the tree. Cloning a map is an explicit deep copy.
///
/// # Examples
///
/// ```
/// use splay_map::{Error, SplayMap};
///
/// let mut map = SplayMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map.value(&0), Ok(&1));
/// assert_eq!(map.value(&1), Err(Error::KeyNotFound));
/// assert_eq!(map.len(), 2);
///
/// *map.get_or_insert(2, 0) += 5;
/// assert_eq!(map.value(&2), Ok(&5));
/// assert_eq!(map.root_key(), Some(&2));
/// ```
#[derive(Clone)]
pub struct SplayMap<T, U> {
    tree: tree::Tree<T, U>,
}

impl<T, U> SplayMap<T, U> {
    /// Constructs a new, empty `SplayMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `SplayMap<T, U>` whose nodes are allocated `chunk_size` at a time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::with_chunk_size(64);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        SplayMap {
            tree: tree::Tree::new(chunk_size),
        }
    }

    /// Inserts a key-value pair into the map and splays it to the root. If the key already exists
    /// in the map, its value is replaced and the old value is returned.
    ///
    /// If memory for a new node cannot be reserved, the map is left untouched, the failure is
    /// logged, and `None` is returned. Use `try_insert` to observe the failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.value(&1), Ok(&1));
    /// assert_eq!(map.insert(1, 2), Some(1));
    /// assert_eq!(map.value(&1), Ok(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<U>
    where
        T: Ord,
    {
        match self.try_insert(key, value) {
            Ok(ret) => ret,
            Err(err) => {
                error!("insert skipped: {}", err);
                None
            },
        }
    }

    /// Inserts a key-value pair into the map, returning `Error::AllocationFailed` instead of
    /// inserting if memory for a new node cannot be reserved. On success it behaves like
    /// `insert`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::{Error, SplayMap};
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.try_insert(1, 1), Ok(None));
    /// assert_eq!(map.try_insert(1, 2), Ok(Some(1)));
    ///
    /// let mut map = SplayMap::with_chunk_size(usize::max_value());
    /// assert_eq!(map.try_insert(1u64, 1u64), Err(Error::AllocationFailed));
    /// assert!(map.is_empty());
    /// ```
    pub fn try_insert(&mut self, key: T, value: U) -> Result<Option<U>>
    where
        T: Ord,
    {
        self.tree.try_insert(key, value)
    }

    /// Inserts a key-value pair given as a tuple. Equivalent to `insert(pair.0, pair.1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert_pair((1, "a"));
    /// assert!(map.contains(&1));
    /// ```
    pub fn insert_pair(&mut self, pair: (T, U)) -> Option<U>
    where
        T: Ord,
    {
        let (key, value) = pair;
        self.insert(key, value)
    }

    /// Returns a mutable reference to the value of `key`, inserting `default` first if the key is
    /// absent. The key ends up at the root either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut counts = SplayMap::new();
    /// for word in "a b a".split(' ') {
    ///     *counts.get_or_insert(word, 0) += 1;
    /// }
    /// assert_eq!(counts.value("a"), Ok(&2));
    /// assert_eq!(counts.value("b"), Ok(&1));
    /// ```
    pub fn get_or_insert(&mut self, key: T, default: U) -> &mut U
    where
        T: Ord,
    {
        self.get_or_insert_with(key, || default)
    }

    /// Returns a mutable reference to the value of `key`, inserting the result of `f` first if the
    /// key is absent. `f` is not called when the key is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map: SplayMap<u32, Vec<u32>> = SplayMap::new();
    /// map.get_or_insert_with(1, Vec::new).push(2);
    /// map.get_or_insert_with(1, Vec::new).push(3);
    /// assert_eq!(map.value(&1), Ok(&vec![2, 3]));
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: T, f: F) -> &mut U
    where
        T: Ord,
        F: FnOnce() -> U,
    {
        &mut self.tree.get_or_insert_with(key, f).value
    }

    /// Returns an immutable reference to the value associated with a particular key, or
    /// `Error::KeyNotFound` if the key does not exist in the map. The closest key is splayed to
    /// the root whether or not the lookup succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::{Error, SplayMap};
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.value(&0), Err(Error::KeyNotFound));
    /// assert_eq!(map.value(&1), Ok(&1));
    /// ```
    pub fn value<V>(&mut self, key: &V) -> Result<&U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.value_mut(key).map(|value| &*value)
    }

    /// Returns a mutable reference to the value associated with a particular key, or
    /// `Error::KeyNotFound` if the key does not exist in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// *map.value_mut(&1).unwrap() = 2;
    /// assert_eq!(map.value(&1), Ok(&2));
    /// ```
    pub fn value_mut<V>(&mut self, key: &V) -> Result<&mut U>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree
            .get_mut(key)
            .map(|entry| &mut entry.value)
            .ok_or(Error::KeyNotFound)
    }

    /// Checks if a key exists in the map. The closest key is splayed to the root, so the shape of
    /// the tree changes even though no entry does.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert!(!map.contains(&0));
    /// assert!(map.contains(&1));
    /// assert_eq!(map.root_key(), Some(&1));
    /// ```
    pub fn contains<V>(&mut self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.get_mut(key).is_some()
    }

    /// Returns the key currently at the root of the tree, which is the most recently accessed or
    /// inserted key. Does not splay.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.root_key(), None);
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.root_key(), Some(&2));
    /// ```
    pub fn root_key(&self) -> Option<&T> {
        self.tree.root_entry().map(|entry| &entry.key)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_map::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<T, U> Default for SplayMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for SplayMap<T, U>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SplayMap")
            .field("len", &self.len())
            .field("root", &self.root_key())
            .finish()
    }
}

impl<T, U> Extend<(T, U)> for SplayMap<T, U>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for pair in iter {
            self.insert_pair(pair);
        }
    }
}

impl<T, U> FromIterator<(T, U)> for SplayMap<T, U>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut map = SplayMap::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::SplayMap;
    use crate::error::Error;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeMap;

    #[test]
    fn test_len_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let mut map = SplayMap::new();
        assert!(map.is_empty());
        map.insert(1, 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_empty_misses() {
        let mut map: SplayMap<u32, u32> = SplayMap::new();
        assert!(!map.contains(&1));
        assert_eq!(map.value(&1), Err(Error::KeyNotFound));
        assert_eq!(map.root_key(), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_insert() {
        let mut map = SplayMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert!(map.contains(&1));
        assert_eq!(map.value(&1), Ok(&1));
        map.tree.assert_valid();
    }

    #[test]
    fn test_insert_replace() {
        let mut map = SplayMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert_eq!(map.insert(1, 3), Some(1));
        assert_eq!(map.value(&1), Ok(&3));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_same_key_many_times() {
        let mut map = SplayMap::new();
        for i in 0..100 {
            map.insert(7, i);
        }
        assert_eq!(map.len(), 1);
        assert_eq!(map.value(&7), Ok(&99));
    }

    #[test]
    fn test_insert_failure_is_noop() {
        let mut map: SplayMap<u64, u64> = SplayMap::with_chunk_size(usize::max_value());
        assert_eq!(map.insert(1, 1), None);
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.try_insert(1, 1), Err(Error::AllocationFailed));
        assert!(!map.contains(&1));
    }

    #[test]
    fn test_scenario() {
        let mut map = SplayMap::new();
        map.insert(5, "a");
        map.insert(3, "b");
        map.insert(8, "c");
        map.insert(1, "d");
        assert_eq!(map.len(), 4);
        map.tree.assert_valid();

        assert!(map.contains(&3));
        assert_eq!(map.root_key(), Some(&3));

        assert_eq!(map.value(&10), Err(Error::KeyNotFound));
        assert_eq!(map.len(), 4);
        map.tree.assert_valid();

        assert_eq!(*map.get_or_insert(6, ""), "");
        assert_eq!(map.len(), 5);
        assert_eq!(map.root_key(), Some(&6));
        map.tree.assert_valid();
    }

    #[test]
    fn test_miss_splays_closest() {
        let mut map = SplayMap::new();
        map.insert(10, ());
        map.insert(20, ());
        map.insert(30, ());
        assert_eq!(map.value(&25), Err(Error::KeyNotFound));
        let root = *map.root_key().unwrap();
        assert!(root == 20 || root == 30);
        map.tree.assert_valid();
    }

    #[test]
    fn test_get_or_insert_existing() {
        let mut map = SplayMap::new();
        map.insert(1, 10);
        map.insert(2, 20);
        *map.get_or_insert(1, 0) += 1;
        assert_eq!(map.value(&1), Ok(&11));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_or_insert_with_lazy() {
        let mut map = SplayMap::new();
        map.insert(1, 10);
        assert_eq!(*map.get_or_insert_with(1, || panic!("default evaluated")), 10);
        assert_eq!(*map.get_or_insert_with(2, || 20), 20);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_value_mut() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        *map.value_mut(&1).unwrap() = 3;
        assert_eq!(map.value(&1), Ok(&3));
        assert_eq!(map.value_mut(&2), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map = SplayMap::new();
        map.insert(String::from("foo"), 1);
        assert!(map.contains("foo"));
        assert_eq!(map.value("foo"), Ok(&1));
        assert_eq!(map.value("bar"), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut map = SplayMap::new();
        map.insert(1, String::from("a"));
        let mut copy = map.clone();
        copy.value_mut(&1).unwrap().push('b');
        copy.insert(2, String::from("c"));

        assert_eq!(map.value(&1).map(String::as_str), Ok("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(copy.value(&1).map(String::as_str), Ok("ab"));
        assert_eq!(copy.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        map.clear();
        assert!(map.is_empty());
        assert!(!map.contains(&1));
        map.insert(3, 3);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_from_iter() {
        let mut map: SplayMap<u32, u32> = vec![(1, 1), (2, 2), (1, 3)].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.value(&1), Ok(&3));
    }

    #[test]
    fn test_debug() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        assert_eq!(format!("{:?}", map), "SplayMap { len: 1, root: Some(1) }");
    }

    #[test]
    fn test_random_operations() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut map = SplayMap::with_chunk_size(16);
        let mut expected = BTreeMap::new();

        for _ in 0..2_000 {
            let key = rng.gen_range(0..500u32);
            match rng.gen_range(0..4) {
                0 => {
                    let val = rng.gen::<u32>();
                    assert_eq!(map.insert(key, val), expected.insert(key, val));
                    assert_eq!(map.root_key(), Some(&key));
                },
                1 => {
                    assert_eq!(map.contains(&key), expected.contains_key(&key));
                },
                2 => {
                    assert_eq!(map.value(&key).ok(), expected.get(&key));
                    if expected.contains_key(&key) {
                        assert_eq!(map.root_key(), Some(&key));
                    }
                },
                _ => {
                    let val = rng.gen::<u32>();
                    let actual = *map.get_or_insert(key, val);
                    assert_eq!(actual, *expected.entry(key).or_insert(val));
                },
            }
            assert_eq!(map.len(), expected.len());
            map.tree.assert_valid();
        }
    }
}
