//! Insertion operation — COW path-copy insert with `AdHash` maintenance.

use std::hash::Hash;
use std::sync::Arc;

use log::trace;

use crate::adhash;
use crate::node::{self, BitmapNode, CollisionNode, Entry, Node, Slot};
use crate::ops::InsertOutcome;

/// Inserts `entry` into the subtree rooted at `node` via COW path-copy.
pub fn insert_recursive<K, V>(
    node: &Node<K, V>,
    entry: Entry<K, V>,
    shift: u32,
) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + PartialEq + Clone,
{
    match node {
        Node::Bitmap(b) => insert_into_bitmap(b, entry, shift),
        Node::Collision(c) => insert_into_collision(c, entry),
    }
}

// ---------------------------------------------------------------------------
// Bitmap node insert
// ---------------------------------------------------------------------------

fn insert_into_bitmap<K, V>(
    node: &BitmapNode<K, V>,
    entry: Entry<K, V>,
    shift: u32,
) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + PartialEq + Clone,
{
    let bit = node::mask(node::fragment(entry.hash, shift));

    if node.data_map & bit != 0 {
        let pos = node::index(node.data_map, bit);
        let existing = node.entry(pos);

        if existing.hash == entry.hash && existing.key == entry.key {
            // Same key → update value.
            let delta = adhash::contribution(&entry).wrapping_sub(adhash::contribution(existing));
            InsertOutcome::Replaced {
                node: Node::Bitmap(node.with_entry_replaced(pos, entry)),
                delta,
            }
        } else {
            // Different key at same position → push both into a subtree.
            let delta = adhash::contribution(&entry);
            let subtree = merge(existing.clone(), entry, shift + node::BITS_PER_LEVEL);
            InsertOutcome::Added {
                node: Node::Bitmap(node.with_entry_deinlined(bit, Arc::new(subtree))),
                delta,
            }
        }
    } else if node.node_map & bit != 0 {
        // Position has child subtree → recurse, reuse this node if nothing changed.
        let pos = node::index(node.node_map, bit);
        insert_recursive(node.child(pos), entry, shift + node::BITS_PER_LEVEL)
            .map_node(|child| Node::Bitmap(node.with_child_replaced(pos, Arc::new(child))))
    } else {
        // Position empty → add inline entry.
        let delta = adhash::contribution(&entry);
        InsertOutcome::Added {
            node: Node::Bitmap(node.with_entry_inserted(bit, entry)),
            delta,
        }
    }
}

// ---------------------------------------------------------------------------
// Collision node insert
// ---------------------------------------------------------------------------

fn insert_into_collision<K, V>(node: &CollisionNode<K, V>, entry: Entry<K, V>) -> InsertOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + PartialEq + Clone,
{
    if let Some(i) = node.entries.iter().position(|e| e.key == entry.key) {
        let existing = &node.entries[i];
        if existing.value == entry.value {
            return InsertOutcome::Unchanged;
        }
        let delta = adhash::contribution(&entry).wrapping_sub(adhash::contribution(existing));
        let mut entries = node.entries.to_vec();
        entries[i] = entry;
        return InsertOutcome::Replaced {
            node: Node::Collision(CollisionNode {
                hash: node.hash,
                entries: entries.into_boxed_slice(),
            }),
            delta,
        };
    }

    // Key not found → append.
    let delta = adhash::contribution(&entry);
    let mut entries = Vec::with_capacity(node.entries.len() + 1);
    entries.extend_from_slice(&node.entries);
    entries.push(entry);
    InsertOutcome::Added {
        node: Node::Collision(CollisionNode {
            hash: node.hash,
            entries: entries.into_boxed_slice(),
        }),
        delta,
    }
}

// ---------------------------------------------------------------------------
// Two-entry merge
// ---------------------------------------------------------------------------

/// Creates a subtree from two entries that collide at the current depth.
///
/// Recursively descends until hash fragments differ, or creates a collision
/// node once the shift runs past the last hash bit.
fn merge<K, V>(e1: Entry<K, V>, e2: Entry<K, V>, shift: u32) -> Node<K, V> {
    if shift > node::MAX_SHIFT {
        trace!("collision node created for hash {:#010x}", e1.hash);
        return Node::Collision(CollisionNode {
            hash: e1.hash,
            entries: Box::new([e1, e2]),
        });
    }

    let f1 = node::fragment(e1.hash, shift);
    let f2 = node::fragment(e2.hash, shift);

    if f1 == f2 {
        let child = merge(e1, e2, shift + node::BITS_PER_LEVEL);
        Node::Bitmap(BitmapNode {
            data_map: 0,
            node_map: node::mask(f1),
            contents: Box::new([Slot::Node(Arc::new(child))]),
        })
    } else {
        let (lo, hi) = if f1 < f2 { (e1, e2) } else { (e2, e1) };
        Node::Bitmap(BitmapNode {
            data_map: node::mask(f1) | node::mask(f2),
            node_map: 0,
            contents: Box::new([Slot::Entry(lo), Slot::Entry(hi)]),
        })
    }
}
