//! Removal operation — COW path-copy delete with canonical inlining.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

use log::trace;

use crate::adhash;
use crate::node::{self, BitmapNode, CollisionNode, Node, SizeClass, Slot};
use crate::ops::RemoveOutcome;

/// Removes `key` from the subtree rooted at `node` via COW path-copy.
pub fn remove_recursive<K, V, Q>(
    node: &Node<K, V>,
    hash: u32,
    key: &Q,
    shift: u32,
) -> RemoveOutcome<K, V>
where
    K: Borrow<Q> + Hash + Clone,
    V: Hash + Clone,
    Q: Eq + ?Sized,
{
    match node {
        Node::Bitmap(b) => remove_from_bitmap(b, hash, key, shift),
        Node::Collision(c) => remove_from_collision(c, hash, key),
    }
}

// ---------------------------------------------------------------------------
// Bitmap node remove
// ---------------------------------------------------------------------------

fn remove_from_bitmap<K, V, Q>(
    node: &BitmapNode<K, V>,
    hash: u32,
    key: &Q,
    shift: u32,
) -> RemoveOutcome<K, V>
where
    K: Borrow<Q> + Hash + Clone,
    V: Hash + Clone,
    Q: Eq + ?Sized,
{
    let bit = node::mask(node::fragment(hash, shift));

    if node.data_map & bit != 0 {
        let pos = node::index(node.data_map, bit);
        let existing = node.entry(pos);
        if existing.hash != hash || existing.key.borrow() != key {
            return RemoveOutcome::NotFound;
        }
        let delta = adhash::contribution(existing);

        if node.node_map == 0 && node.data_len() == 2 {
            // One survivor left. Below the root it becomes a transient carrier
            // the parent inlines, so its bit is taken at depth 0.
            let survivor = node.entry(1 - pos).clone();
            let data_map = if shift == 0 {
                node.data_map ^ bit
            } else {
                node::mask(node::fragment(survivor.hash, 0))
            };
            return RemoveOutcome::Removed {
                node: Node::Bitmap(BitmapNode {
                    data_map,
                    node_map: 0,
                    contents: Box::new([Slot::Entry(survivor)]),
                }),
                delta,
            };
        }

        RemoveOutcome::Removed {
            node: Node::Bitmap(node.with_entry_removed(bit)),
            delta,
        }
    } else if node.node_map & bit != 0 {
        let pos = node::index(node.node_map, bit);
        let (child, delta) =
            match remove_recursive(node.child(pos), hash, key, shift + node::BITS_PER_LEVEL) {
                RemoveOutcome::NotFound => return RemoveOutcome::NotFound,
                RemoveOutcome::Removed { node, delta } => (node, delta),
            };

        let node = match child.size_class() {
            SizeClass::Empty => {
                unreachable!("removal left an empty subtree below the root")
            }
            SizeClass::One if node.data_len() == 0 && node.children_len() == 1 => {
                // This node would become a singleton over a singleton; let
                // the grandparent inline the carrier instead.
                child
            }
            SizeClass::One => Node::Bitmap(node.with_child_inlined(bit, child.into_sole_entry())),
            SizeClass::More => Node::Bitmap(node.with_child_replaced(pos, Arc::new(child))),
        };
        RemoveOutcome::Removed { node, delta }
    } else {
        RemoveOutcome::NotFound
    }
}

// ---------------------------------------------------------------------------
// Collision node remove
// ---------------------------------------------------------------------------

fn remove_from_collision<K, V, Q>(node: &CollisionNode<K, V>, hash: u32, key: &Q) -> RemoveOutcome<K, V>
where
    K: Borrow<Q> + Hash + Clone,
    V: Hash + Clone,
    Q: Eq + ?Sized,
{
    if hash != node.hash {
        return RemoveOutcome::NotFound;
    }
    let Some(i) = node.entries.iter().position(|e| e.key.borrow() == key) else {
        return RemoveOutcome::NotFound;
    };
    let delta = adhash::contribution(&node.entries[i]);

    let node = match node.entries.len() {
        1 => Node::empty(),
        2 => {
            trace!("collision node dissolved for hash {:#010x}", node.hash);
            Node::Bitmap(BitmapNode::single(node.entries[1 - i].clone()))
        }
        len => {
            let mut entries = Vec::with_capacity(len - 1);
            entries.extend_from_slice(&node.entries[..i]);
            entries.extend_from_slice(&node.entries[i + 1..]);
            Node::Collision(CollisionNode {
                hash: node.hash,
                entries: entries.into_boxed_slice(),
            })
        }
    };
    RemoveOutcome::Removed { node, delta }
}
