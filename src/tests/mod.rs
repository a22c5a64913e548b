//! Unit tests, grouped by concern.
//!
//! Shared helpers below let tests pick exact trie hash codes, or reproduce
//! the polynomial string hash that makes `"Aa"` and `"BB"` collide.

mod collision;
mod iteration;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher};

use crate::ChampMap;

/// Hasher that reports the last integer written to it, unchanged.
#[derive(Default)]
pub struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }

    fn write_u32(&mut self, n: u32) {
        self.0 = u64::from(n);
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

/// Builder for [`IdentityHasher`].
pub type IdentityBuild = BuildHasherDefault<IdentityHasher>;

/// Key whose trie hash code is chosen by the test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedKey {
    pub id: u32,
    pub hash: u32,
}

impl ForcedKey {
    pub const fn new(id: u32, hash: u32) -> Self {
        Self { id, hash }
    }
}

impl Hash for ForcedKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

/// Java-style polynomial string hash: `h = 31·h + byte`.
#[derive(Default)]
pub struct PolyHasher(u32);

impl Hasher for PolyHasher {
    fn finish(&self) -> u64 {
        u64::from(self.0)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.wrapping_mul(31).wrapping_add(u32::from(b));
        }
    }
}

/// Builder for [`PolyHasher`].
pub type PolyBuild = BuildHasherDefault<PolyHasher>;

/// Asserts that `map` holds exactly the pairs of `model` and is well formed.
pub fn assert_matches_model<K, V, S>(map: &ChampMap<K, V, S>, model: &HashMap<K, V>)
where
    K: Hash + Eq + Debug,
    V: Hash + PartialEq + Debug,
    S: BuildHasher,
{
    assert_eq!(map.len(), model.len(), "length differs from model");
    for (k, v) in model {
        assert_eq!(map.get(k), Some(v), "value differs for key {k:?}");
    }
    let mut seen = 0;
    for (k, v) in map {
        assert_eq!(model.get(k), Some(v), "unexpected pair {k:?} => {v:?}");
        seen += 1;
    }
    assert_eq!(seen, model.len(), "iteration count differs from model");
    assert_eq!(map.check_invariants(), Ok(()));
}
