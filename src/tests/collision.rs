use std::hash::{Hash, Hasher};

use super::{PolyBuild, PolyHasher};
use crate::ChampMap;

/// A key type with a controllable hash value for testing hash collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CollidingKey {
    id: u32,
    forced_hash: u64,
}

impl CollidingKey {
    const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Two keys with the same hash create a collision node.
#[test]
fn two_colliding_keys() {
    let k1 = CollidingKey::new(1, 0xDEAD_BEEF);
    let k2 = CollidingKey::new(2, 0xDEAD_BEEF);

    let map = ChampMap::new().insert(k1.clone(), "first").insert(k2.clone(), "second");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"first"));
    assert_eq!(map.get(&k2), Some(&"second"));
    assert_eq!(map.check_invariants(), Ok(()));
}

/// Three keys with the same hash.
#[test]
fn three_colliding_keys() {
    let keys: Vec<CollidingKey> = (0..3).map(|i| CollidingKey::new(i, 0xCAFE)).collect();

    let map = keys
        .iter()
        .enumerate()
        .fold(ChampMap::new(), |m, (i, k)| m.insert(k.clone(), i));

    assert_eq!(map.len(), 3);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(&i));
    }
    assert_eq!(map.check_invariants(), Ok(()));
}

/// Remove from collision node.
#[test]
fn remove_from_collision() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let k3 = CollidingKey::new(3, 0xAAAA);

    let map = ChampMap::new()
        .insert(k1.clone(), 10)
        .insert(k2.clone(), 20)
        .insert(k3.clone(), 30);

    let map = map.remove(&k2);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&10));
    assert_eq!(map.get(&k2), None);
    assert_eq!(map.get(&k3), Some(&30));
    assert_eq!(map.check_invariants(), Ok(()));
}

/// Missing key with a colliding hash leaves the map untouched.
#[test]
fn remove_missing_from_collision() {
    let k1 = CollidingKey::new(1, 0xABAB);
    let k2 = CollidingKey::new(2, 0xABAB);
    let ghost = CollidingKey::new(3, 0xABAB);

    let map = ChampMap::new().insert(k1, 1).insert(k2, 2);
    assert!(map.remove(&ghost).ptr_eq(&map));
    assert_eq!(map.get(&ghost), None);
}

/// Overwrite in collision node.
#[test]
fn overwrite_in_collision() {
    let k1 = CollidingKey::new(1, 0xBBBB);
    let k2 = CollidingKey::new(2, 0xBBBB);

    let map = ChampMap::new()
        .insert(k1.clone(), "old")
        .insert(k2.clone(), "val2")
        .insert(k1.clone(), "new");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"new"));
    assert_eq!(map.check_invariants(), Ok(()));
}

/// Re-inserting an identical pair into a collision bucket is a no-op.
#[test]
fn duplicate_pair_in_collision_reuses_root() {
    let k1 = CollidingKey::new(1, 0xB0B0);
    let k2 = CollidingKey::new(2, 0xB0B0);

    let map = ChampMap::new().insert(k1.clone(), 1).insert(k2, 2);
    let again = map.insert(k1, 1);
    assert!(again.ptr_eq(&map));
    assert_eq!(again, map);
}

/// Collision node with remove-all returns to empty.
#[test]
fn collision_remove_all() {
    let k1 = CollidingKey::new(1, 0xCCCC);
    let k2 = CollidingKey::new(2, 0xCCCC);

    let map = ChampMap::new().insert(k1.clone(), 1).insert(k2.clone(), 2);
    let half = map.remove(&k1);
    assert_eq!(half.check_invariants(), Ok(()));
    assert_eq!(half.get(&k2), Some(&2));

    let empty = half.remove(&k2);
    assert!(empty.is_empty());
    assert_eq!(empty.adhash(), 0);
    assert_eq!(empty.check_invariants(), Ok(()));
}

/// Mixed: some keys collide, some don't.
#[test]
fn mixed_collisions_and_normal() {
    let collide_a = CollidingKey::new(1, 0xDDDD);
    let collide_b = CollidingKey::new(2, 0xDDDD);
    let normal = CollidingKey::new(3, 0xEEEE);

    let map = ChampMap::new()
        .insert(collide_a.clone(), "a")
        .insert(collide_b.clone(), "b")
        .insert(normal.clone(), "c");

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&collide_a), Some(&"a"));
    assert_eq!(map.get(&collide_b), Some(&"b"));
    assert_eq!(map.get(&normal), Some(&"c"));

    let map = map.remove(&collide_a);
    assert_eq!(map.get(&collide_b), Some(&"b"));
    assert_eq!(map.get(&normal), Some(&"c"));
    assert_eq!(map.check_invariants(), Ok(()));
}

// ---------------------------------------------------------------------------
// Polynomial string hash: "Aa" and "BB" contribute the same amount, so any
// strings built from those blocks with equal length collide completely.
// ---------------------------------------------------------------------------

const FIXTURE: [(&str, i32); 5] = [
    ("AaAaAa", 0),
    ("AaAaBB", 1),
    ("AaBBAa", 9),
    ("BBBB", 7),
    ("AaBB", 5),
];

fn poly(s: &str) -> u64 {
    let mut h = PolyHasher::default();
    s.hash(&mut h);
    h.finish()
}

#[test]
fn fixture_keys_collide() {
    assert_eq!(poly("AaAaAa"), poly("AaAaBB"));
    assert_eq!(poly("AaAaAa"), poly("AaBBAa"));
    assert_eq!(poly("BBBB"), poly("AaBB"));
}

fn assert_matches_list(map: &ChampMap<&'static str, i32, PolyBuild>, list: &[(&'static str, i32)]) {
    assert_eq!(map.len(), list.len());
    for (k, v) in list {
        assert_eq!(map.get(k), Some(v), "missing {k}");
    }
    let mut seen: Vec<(&str, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    let mut expected = list.to_vec();
    seen.sort_unstable();
    expected.sort_unstable();
    assert_eq!(seen, expected);
    assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn fixture_insert_then_delete_each() {
    let mut map = ChampMap::with_hasher(PolyBuild::default());
    let mut list: Vec<(&'static str, i32)> = Vec::new();
    for (k, v) in FIXTURE {
        map = map.insert(k, v);
        list.push((k, v));
        assert_matches_list(&map, &list);
    }

    for (k, _) in FIXTURE {
        let before = map.clone();
        map = map.remove(k);
        list.retain(|(key, _)| *key != k);
        assert_matches_list(&map, &list);
        // The previous version is untouched.
        assert_eq!(before.len(), list.len() + 1);
        assert!(before.contains_key(k));
    }
    assert!(map.is_empty());
}

#[test]
fn fixture_delete_in_every_order_of_pairs() {
    let full = FIXTURE
        .iter()
        .fold(ChampMap::with_hasher(PolyBuild::default()), |m, &(k, v)| m.insert(k, v));

    for (first, _) in FIXTURE {
        for (second, _) in FIXTURE {
            let map = full.remove(first).remove(second);
            let list: Vec<(&'static str, i32)> = FIXTURE
                .iter()
                .copied()
                .filter(|(k, _)| *k != first && *k != second)
                .collect();
            assert_matches_list(&map, &list);
        }
    }
}
