use std::collections::HashSet;

use super::{ForcedKey, IdentityBuild};
use crate::ChampMap;

#[test]
fn empty_map_yields_nothing() {
    let map: ChampMap<u32, u32> = ChampMap::new();
    let mut it = map.iter();
    assert_eq!(it.len(), 0);
    assert_eq!(it.next(), None);
}

#[test]
fn every_entry_exactly_once() {
    let map = (0_u32..2_000).fold(ChampMap::new(), |m, i| m.insert(i, i * 2));

    let mut seen = HashSet::new();
    for (k, v) in &map {
        assert_eq!(*v, k * 2);
        assert!(seen.insert(*k), "key {k} yielded twice");
    }
    assert_eq!(seen.len(), 2_000);
}

#[test]
fn exact_size_counts_down() {
    let map = (0..10).fold(ChampMap::new(), |m, i| m.insert(i, ()));
    let mut it = map.iter();
    for left in (0..10).rev() {
        assert!(it.next().is_some());
        assert_eq!(it.len(), left);
        assert_eq!(it.size_hint(), (left, Some(left)));
    }
}

#[test]
fn fused_after_exhaustion() {
    let map = ChampMap::new().insert(1, 1).insert(2, 2);
    let mut it = map.iter();
    assert_eq!(it.by_ref().count(), 2);
    assert_eq!(it.next(), None);
    assert_eq!(it.next(), None);
}

#[test]
fn cloned_iterator_is_independent() {
    let map = (0..5).fold(ChampMap::new(), |m, i| m.insert(i, i));
    let mut it = map.iter();
    it.next();
    let rest: Vec<_> = it.clone().collect();
    assert_eq!(rest.len(), 4);
    assert_eq!(it.count(), 4);
}

#[test]
fn keys_and_values_agree_with_iter() {
    let map = (0..100).fold(ChampMap::new(), |m, i| m.insert(i, i + 1_000));

    let keys: Vec<_> = map.keys().copied().collect();
    let values: Vec<_> = map.values().copied().collect();
    let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();

    assert_eq!(keys.len(), 100);
    assert_eq!(map.keys().len(), 100);
    assert_eq!(map.values().len(), 100);
    for (i, (k, v)) in pairs.iter().enumerate() {
        assert_eq!(keys[i], *k);
        assert_eq!(values[i], *v);
    }
}

#[test]
fn entries_before_subtrees() {
    // Fragment 1 holds an inline entry; fragment 0 holds a subtree of two.
    let inline = ForcedKey::new(0, 0b00001);
    let deep_a = ForcedKey::new(1, 0b00001_00000);
    let deep_b = ForcedKey::new(2, 0b00010_00000);

    let map = ChampMap::with_hasher(IdentityBuild::default())
        .insert(deep_a.clone(), 'a')
        .insert(deep_b.clone(), 'b')
        .insert(inline.clone(), 'i');

    let order: Vec<u32> = map.keys().map(|k| k.id).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn iterates_collision_buckets() {
    let keys: Vec<ForcedKey> = (0..4).map(|id| ForcedKey::new(id, 0x0BAD_F00D)).collect();
    let map = keys
        .iter()
        .fold(ChampMap::with_hasher(IdentityBuild::default()), |m, k| {
            m.insert(k.clone(), k.id)
        })
        .insert(ForcedKey::new(9, 7), 9);

    let mut ids: Vec<u32> = map.values().copied().collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![0, 1, 2, 3, 9]);
}

#[test]
fn old_version_iterates_old_contents() {
    let v1 = (0..20).fold(ChampMap::new(), |m, i| m.insert(i, i));
    let v2 = (0..10).fold(v1.clone(), |m, i| m.remove(&i));

    assert_eq!(v1.iter().count(), 20);
    assert_eq!(v2.iter().count(), 10);
    assert!(v2.keys().all(|k| *k >= 10));
}
