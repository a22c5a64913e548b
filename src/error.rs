//! Structural errors reported by [`ChampMap::check_invariants`](crate::ChampMap::check_invariants).
//!
//! None of these can be produced by the map's own operations; they exist to
//! pinpoint an implementation fault when one is suspected.

use thiserror::Error;

/// A violated trie invariant, with the bit-shift depth where it was found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A position is marked both as inline entry and as child.
    #[error("overlapping bitmaps at shift {shift}: data {data_map:#034b}, nodes {node_map:#034b}")]
    OverlappingBitmaps {
        /// Bit-shift depth of the node.
        shift: u32,
        /// Payload bitmap.
        data_map: u32,
        /// Child bitmap.
        node_map: u32,
    },

    /// The packed contents do not match the bitmap population counts.
    #[error("contents length {actual} at shift {shift}, bitmaps require {expected}")]
    ContentsLength {
        /// Bit-shift depth of the node.
        shift: u32,
        /// Slots required by the bitmaps.
        expected: usize,
        /// Slots present.
        actual: usize,
    },

    /// An entry slot holds a child or a child slot holds an entry.
    #[error("slot {slot} at shift {shift} holds the wrong kind of item")]
    MisplacedSlot {
        /// Bit-shift depth of the node.
        shift: u32,
        /// Index into the packed contents.
        slot: usize,
    },

    /// An entry's hash code does not lead to the position it is stored at.
    #[error("entry with hash {hash:#010x} stored off its hash path at shift {shift}")]
    MisplacedEntry {
        /// Bit-shift depth of the node.
        shift: u32,
        /// Hash code of the entry.
        hash: u32,
    },

    /// A cached hash code differs from the key's current hash.
    #[error("entry caches hash {cached:#010x}, key hashes to {actual:#010x}")]
    StaleHash {
        /// Cached hash code.
        cached: u32,
        /// Freshly computed hash code.
        actual: u32,
    },

    /// A non-root node holds a single entry and no children.
    #[error("single-entry leaf at shift {shift} was not inlined into its parent")]
    UninlinedLeaf {
        /// Bit-shift depth of the node.
        shift: u32,
    },

    /// A non-root subtree holds fewer than two entries behind a chain of nodes.
    #[error("singleton chain at shift {shift} holds {entries} entries")]
    SingletonChain {
        /// Bit-shift depth of the node.
        shift: u32,
        /// Entries in the subtree.
        entries: usize,
    },

    /// A node kind appears at a depth where it cannot occur.
    #[error("{kind} node at shift {shift}")]
    WrongDepth {
        /// `"bitmap"` or `"collision"`.
        kind: &'static str,
        /// Bit-shift depth of the node.
        shift: u32,
    },

    /// A collision node holds fewer than two entries.
    #[error("collision node with {len} entries")]
    UndersizedCollision {
        /// Number of entries.
        len: usize,
    },

    /// A collision node holds an entry with a different hash code.
    #[error("collision node for {expected:#010x} holds hash {actual:#010x}")]
    CollisionHashMismatch {
        /// Hash shared by the node.
        expected: u32,
        /// Hash of the offending entry.
        actual: u32,
    },

    /// A collision node holds the same key twice.
    #[error("collision node for {hash:#010x} holds a duplicate key")]
    DuplicateCollisionKey {
        /// Hash shared by the node.
        hash: u32,
    },

    /// The cached length differs from the number of reachable entries.
    #[error("map caches length {cached}, trie holds {actual}")]
    SizeMismatch {
        /// Cached length.
        cached: usize,
        /// Reachable entries.
        actual: usize,
    },

    /// The cached `AdHash` differs from the recomputed one.
    #[error("map caches adhash {cached:#018x}, entries sum to {actual:#018x}")]
    AdHashMismatch {
        /// Cached value.
        cached: u64,
        /// Recomputed value.
        actual: u64,
    },
}
