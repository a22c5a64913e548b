//! The persistent CHAMP map.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::ops;
use std::sync::Arc;

use log::debug;

use crate::adhash::{self, DefaultHashBuilder};
use crate::error::StructureError;
use crate::iter::{Iter, Keys, Values};
use crate::node::{Entry, Node};
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::remove_recursive;
use crate::ops::{InsertOutcome, RemoveOutcome};
use crate::validate;

/// Persistent hash map based on a CHAMP trie.
///
/// Every update returns a new map and leaves `self` untouched. The two
/// versions share all subtrees the update did not touch, so cloning a map is
/// O(1) and an update copies at most one small node per trie level.
///
/// Updates that change nothing return a map sharing the same root; use
/// [`ptr_eq`](Self::ptr_eq) to detect that cheaply.
pub struct ChampMap<K, V, S = DefaultHashBuilder> {
    root: Arc<Node<K, V>>,
    size: usize,
    adhash: u64,
    hasher: S,
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> ChampMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K, V, S> ChampMap<K, V, S> {
    /// Creates an empty map that hashes keys with `hasher`.
    ///
    /// The hasher decides the trie layout. It has no effect on
    /// [`adhash`](Self::adhash), which is comparable across all maps.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            root: Arc::new(Node::empty()),
            size: 0,
            adhash: 0,
            hasher,
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the current `AdHash` value.
    ///
    /// Two maps with the same `AdHash` and the same length contain the same
    /// entries with overwhelming probability (2⁻⁶⁴ collision chance).
    #[must_use]
    pub const fn adhash(&self) -> u64 {
        self.adhash
    }

    /// Returns the map's hasher.
    #[must_use]
    pub const fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns `true` if both maps share the same root node.
    ///
    /// Implies equal contents; the converse does not hold.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Returns an iterator over `(&K, &V)` pairs, in unspecified order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&*self.root, self.size)
    }

    /// Returns an iterator over the keys, in unspecified order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values, in unspecified order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Node<K, V> {
        &self.root
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V, S: BuildHasher> ChampMap<K, V, S> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        get_recursive(&*self.root, adhash::trie_hash(&self.hasher, key), key, 0)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }
}

impl<K: Hash + Eq, V: Hash, S: BuildHasher> ChampMap<K, V, S> {
    /// Walks the whole trie and verifies its structural invariants, the
    /// cached length and the cached `AdHash`.
    ///
    /// # Errors
    ///
    /// Returns the first [`StructureError`] found.
    pub fn check_invariants(&self) -> Result<(), StructureError> {
        let result = validate::check_trie(&*self.root, &self.hasher).and_then(|tally| {
            if tally.entries != self.size {
                Err(StructureError::SizeMismatch {
                    cached: self.size,
                    actual: tally.entries,
                })
            } else if tally.adhash != self.adhash {
                Err(StructureError::AdHashMismatch {
                    cached: self.adhash,
                    actual: tally.adhash,
                })
            } else {
                Ok(())
            }
        });
        result.inspect_err(|e| debug!("trie invariant violated: {e}"))
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Hash + PartialEq + Clone
// ---------------------------------------------------------------------------

impl<K, V, S> ChampMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Hash + PartialEq + Clone,
    S: BuildHasher + Clone,
{
    /// Returns a map with `key` bound to `value`.
    ///
    /// Re-inserting a pair already stored in a collision bucket returns a map
    /// sharing this map's root.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = adhash::trie_hash(&self.hasher, &key);
        let entry = Entry { hash, key, value };

        match insert_recursive(&*self.root, entry, 0) {
            InsertOutcome::Unchanged => self.clone(),
            InsertOutcome::Added { node, delta } => {
                self.derive(node, self.size + 1, self.adhash.wrapping_add(delta))
            }
            InsertOutcome::Replaced { node, delta } => {
                self.derive(node, self.size, self.adhash.wrapping_add(delta))
            }
        }
    }

    /// Returns a map without `key`.
    ///
    /// If `key` is absent the result shares this map's root.
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = adhash::trie_hash(&self.hasher, key);
        match remove_recursive(&*self.root, hash, key, 0) {
            RemoveOutcome::NotFound => self.clone(),
            RemoveOutcome::Removed { node, delta } => {
                self.derive(node, self.size - 1, self.adhash.wrapping_sub(delta))
            }
        }
    }

    /// Returns a map with every pair of `entries` inserted in order.
    ///
    /// Later pairs win over earlier ones with the same key.
    #[must_use]
    pub fn insert_all<I: IntoIterator<Item = (K, V)>>(&self, entries: I) -> Self {
        entries
            .into_iter()
            .fold(self.clone(), |map, (k, v)| map.insert(k, v))
    }

    fn derive(&self, root: Node<K, V>, size: usize, adhash: u64) -> Self {
        Self {
            root: Arc::new(root),
            size,
            adhash,
            hasher: self.hasher.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V, S: Clone> Clone for ChampMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            size: self.size,
            adhash: self.adhash,
            hasher: self.hasher.clone(),
        }
    }
}

impl<K, V, S: Default> Default for ChampMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChampMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for ChampMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size || self.adhash != other.adhash {
            return false;
        }
        if Arc::ptr_eq(&self.root, &other.root) {
            return true;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Hash + Eq, V: Eq, S: BuildHasher> Eq for ChampMap<K, V, S> {}

impl<K, V, S> Hash for ChampMap<K, V, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.size);
        state.write_u64(self.adhash);
    }
}

impl<K, V, S> Extend<(K, V)> for ChampMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Hash + PartialEq + Clone,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        *self = self.insert_all(iter);
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChampMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Hash + PartialEq + Clone,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::default().insert_all(iter)
    }
}

impl<K, V, S, Q> ops::Index<&Q> for ChampMap<K, V, S>
where
    K: Hash + Eq + Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    S: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChampMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
