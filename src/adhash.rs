//! Hashing helpers and `AdHash` — incremental structural hashing.
//!
//! Computes `φ(S) = Σ f(k, v)` over all entries using wrapping arithmetic.
//! Two mixing seeds prevent degeneration when `hash(v) = 0`.
//!
//! `AdHash` always uses [`DefaultHasher::new`], independent of the map's own
//! hasher, so that values are comparable between any two maps.

use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

use crate::node::Entry;

/// Hasher builder used by maps created with [`ChampMap::new`](crate::ChampMap::new).
///
/// Deterministic: the same key always produces the same trie layout.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Computes the 64-bit hash of a value using the standard hasher.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Computes the 32-bit trie hash code of `key` with the map's hasher.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn trie_hash<Q: Hash + ?Sized, S: BuildHasher>(hasher: &S, key: &Q) -> u32 {
    hasher.hash_one(key) as u32
}

/// Computes the `AdHash` contribution of a single entry.
///
/// `f(k, v) = key_hash · SEED₁ ⊕ value_hash · SEED₂`
#[must_use]
pub const fn entry_adhash(key_hash: u64, value_hash: u64) -> u64 {
    key_hash.wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}

/// Computes the `AdHash` contribution of a stored entry.
#[must_use]
pub(crate) fn contribution<K: Hash, V: Hash>(entry: &Entry<K, V>) -> u64 {
    entry_adhash(hash_one(&entry.key), hash_one(&entry.value))
}
