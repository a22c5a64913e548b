//! Lookup operation — traverses the trie to find a key.

use std::borrow::Borrow;

use crate::node::{self, Node};

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns a reference to the value if found.
pub fn get_recursive<'a, K, V, Q>(
    node: &'a Node<K, V>,
    hash: u32,
    key: &Q,
    shift: u32,
) -> Option<&'a V>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    match node {
        Node::Bitmap(b) => {
            let bit = node::mask(node::fragment(hash, shift));

            if b.data_map & bit != 0 {
                // Position has an inline entry.
                let entry = b.entry(node::index(b.data_map, bit));
                if entry.hash == hash && entry.key.borrow() == key {
                    Some(&entry.value)
                } else {
                    None
                }
            } else if b.node_map & bit != 0 {
                // Position has a child subtree — recurse.
                let child = b.child(node::index(b.node_map, bit));
                get_recursive(child, hash, key, shift + node::BITS_PER_LEVEL)
            } else {
                None
            }
        }
        Node::Collision(c) => {
            if hash != c.hash {
                return None;
            }
            c.entries
                .iter()
                .find(|e| e.key.borrow() == key)
                .map(|e| &e.value)
        }
    }
}
