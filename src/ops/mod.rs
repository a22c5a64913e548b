//! Recursive trie operations and their outcomes.
//!
//! Every mutating call returns an explicit outcome instead of reporting
//! through a side channel. The carried `delta` is the change in `AdHash`
//! contribution for the affected subtree.

pub mod get;
pub mod insert;
pub mod remove;

use crate::node::Node;

/// Outcome of a recursive insert.
pub enum InsertOutcome<K, V> {
    /// The subtree already held exactly this pair; reuse the old node.
    Unchanged,
    /// A new key was added.
    Added {
        /// New root of the modified subtree.
        node: Node<K, V>,
        /// Wrapping `AdHash` delta to add.
        delta: u64,
    },
    /// An existing key's value was overwritten.
    Replaced {
        /// New root of the modified subtree.
        node: Node<K, V>,
        /// Wrapping `AdHash` delta to add.
        delta: u64,
    },
}

impl<K, V> InsertOutcome<K, V> {
    /// Rebuilds the carried node with `f`, keeping the outcome kind.
    pub fn map_node(self, f: impl FnOnce(Node<K, V>) -> Node<K, V>) -> Self {
        match self {
            Self::Unchanged => Self::Unchanged,
            Self::Added { node, delta } => Self::Added {
                node: f(node),
                delta,
            },
            Self::Replaced { node, delta } => Self::Replaced {
                node: f(node),
                delta,
            },
        }
    }
}

/// Outcome of a recursive remove.
pub enum RemoveOutcome<K, V> {
    /// Key was not found — tree unchanged.
    NotFound,
    /// Key was removed.
    Removed {
        /// New root of the modified subtree.
        node: Node<K, V>,
        /// Wrapping `AdHash` delta to subtract.
        delta: u64,
    },
}
