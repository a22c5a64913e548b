//! Full-trie invariant checker.
//!
//! Walks every node once and verifies the layout rules the operations rely
//! on: disjoint bitmaps, exact packing, hash-path placement, canonical
//! compression and collision-node shape. Also recomputes the entry count and
//! `AdHash` so the map can compare them with its cached values.

use std::hash::{BuildHasher, Hash};

use crate::adhash;
use crate::error::StructureError;
use crate::node::{self, BitmapNode, CollisionNode, Entry, Node, Slot};

/// Entry count and `AdHash` recomputed from the trie.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Reachable entries.
    pub entries: usize,
    /// Wrapping sum of entry contributions.
    pub adhash: u64,
}

/// Checks the trie rooted at `root` and returns its recomputed tally.
pub fn check_trie<K, V, S>(root: &Node<K, V>, hasher: &S) -> Result<Tally, StructureError>
where
    K: Hash + Eq,
    V: Hash,
    S: BuildHasher,
{
    let mut tally = Tally::default();
    match root {
        Node::Bitmap(b) => {
            check_bitmap(b, 0, 0, true, hasher, &mut tally)?;
        }
        Node::Collision(_) => {
            return Err(StructureError::WrongDepth {
                kind: "collision",
                shift: 0,
            });
        }
    }
    Ok(tally)
}

/// Iterates the set bit positions of `bitmap` in ascending order.
fn positions(mut bitmap: u32) -> impl Iterator<Item = u32> {
    std::iter::from_fn(move || {
        if bitmap == 0 {
            return None;
        }
        let frag = bitmap.trailing_zeros();
        bitmap &= bitmap - 1;
        Some(frag)
    })
}

/// Returns `true` if the low `shift` bits of `hash` equal `path`.
fn on_path(hash: u32, path: u32, shift: u32) -> bool {
    let low = (1_u64 << shift.min(node::HASH_BITS)) - 1;
    (u64::from(hash) & low) == (u64::from(path) & low)
}

fn check_entry<K, V, S>(entry: &Entry<K, V>, hasher: &S, tally: &mut Tally) -> Result<(), StructureError>
where
    K: Hash,
    V: Hash,
    S: BuildHasher,
{
    let actual = adhash::trie_hash(hasher, &entry.key);
    if actual != entry.hash {
        return Err(StructureError::StaleHash {
            cached: entry.hash,
            actual,
        });
    }
    tally.entries += 1;
    tally.adhash = tally.adhash.wrapping_add(adhash::contribution(entry));
    Ok(())
}

fn check_node<K, V, S>(
    node: &Node<K, V>,
    shift: u32,
    path: u32,
    hasher: &S,
    tally: &mut Tally,
) -> Result<usize, StructureError>
where
    K: Hash + Eq,
    V: Hash,
    S: BuildHasher,
{
    match node {
        Node::Bitmap(b) => check_bitmap(b, shift, path, false, hasher, tally),
        Node::Collision(c) => check_collision(c, shift, path, hasher, tally),
    }
}

fn check_bitmap<K, V, S>(
    node: &BitmapNode<K, V>,
    shift: u32,
    path: u32,
    is_root: bool,
    hasher: &S,
    tally: &mut Tally,
) -> Result<usize, StructureError>
where
    K: Hash + Eq,
    V: Hash,
    S: BuildHasher,
{
    if shift > node::MAX_SHIFT {
        return Err(StructureError::WrongDepth {
            kind: "bitmap",
            shift,
        });
    }
    if node.data_map & node.node_map != 0 {
        return Err(StructureError::OverlappingBitmaps {
            shift,
            data_map: node.data_map,
            node_map: node.node_map,
        });
    }
    let data_len = node.data_len();
    let children_len = node.children_len();
    if node.contents.len() != data_len + children_len {
        return Err(StructureError::ContentsLength {
            shift,
            expected: data_len + children_len,
            actual: node.contents.len(),
        });
    }

    for (slot, frag) in positions(node.data_map).enumerate() {
        let Slot::Entry(entry) = &node.contents[slot] else {
            return Err(StructureError::MisplacedSlot { shift, slot });
        };
        if !on_path(entry.hash, path, shift) || node::fragment(entry.hash, shift) != frag {
            return Err(StructureError::MisplacedEntry {
                shift,
                hash: entry.hash,
            });
        }
        check_entry(entry, hasher, tally)?;
    }

    let mut entries = data_len;
    for (rank, frag) in positions(node.node_map).enumerate() {
        let slot = node.contents.len() - 1 - rank;
        let Slot::Node(child) = &node.contents[slot] else {
            return Err(StructureError::MisplacedSlot { shift, slot });
        };
        entries += check_node(
            child,
            shift + node::BITS_PER_LEVEL,
            path | (frag << shift),
            hasher,
            tally,
        )?;
    }

    if !is_root {
        if data_len == 1 && children_len == 0 {
            return Err(StructureError::UninlinedLeaf { shift });
        }
        if entries < 2 {
            return Err(StructureError::SingletonChain { shift, entries });
        }
    }
    Ok(entries)
}

fn check_collision<K, V, S>(
    node: &CollisionNode<K, V>,
    shift: u32,
    path: u32,
    hasher: &S,
    tally: &mut Tally,
) -> Result<usize, StructureError>
where
    K: Hash + Eq,
    V: Hash,
    S: BuildHasher,
{
    if shift <= node::MAX_SHIFT {
        return Err(StructureError::WrongDepth {
            kind: "collision",
            shift,
        });
    }
    let len = node.entries.len();
    if len < 2 {
        return Err(StructureError::UndersizedCollision { len });
    }
    if !on_path(node.hash, path, shift) {
        return Err(StructureError::MisplacedEntry {
            shift,
            hash: node.hash,
        });
    }
    for (i, entry) in node.entries.iter().enumerate() {
        if entry.hash != node.hash {
            return Err(StructureError::CollisionHashMismatch {
                expected: node.hash,
                actual: entry.hash,
            });
        }
        if node.entries[..i].iter().any(|e| e.key == entry.key) {
            return Err(StructureError::DuplicateCollisionKey { hash: node.hash });
        }
        check_entry(entry, hasher, tally)?;
    }
    Ok(len)
}
