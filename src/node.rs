//! CHAMP trie node types, bitmap helpers and copy-on-write builders.

use std::fmt;
use std::sync::Arc;

/// Bits per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Width of the hash code used for trie navigation.
pub const HASH_BITS: u32 = 32;

/// Last bit-shift that still addresses hash bits (depth 6, uses 2 bits).
pub const MAX_SHIFT: u32 = 30;

/// Inline entry storing a key-value pair with its 32-bit hash code.
#[derive(Clone)]
pub struct Entry<K, V> {
    /// Hash code of the key, as produced by the map's hasher.
    pub hash: u32,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

/// One slot of a bitmap node's packed `contents`.
#[derive(Clone)]
pub enum Slot<K, V> {
    /// Inline key-value pair.
    Entry(Entry<K, V>),
    /// Shared handle to a child subtree.
    Node(Arc<Node<K, V>>),
}

/// Coarse entry count of a node, used for compression after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// No entries and no children.
    Empty,
    /// Exactly one inline entry and no children.
    One,
    /// Anything bigger.
    More,
}

/// CHAMP trie node.
pub enum Node<K, V> {
    /// Bitmap-compressed node for one trie level.
    Bitmap(BitmapNode<K, V>),
    /// Linear bucket for keys sharing the full 32-bit hash code.
    Collision(CollisionNode<K, V>),
}

/// Bitmap-compressed node.
///
/// `contents` holds `data_map.count_ones()` entries in ascending bit order,
/// followed by `node_map.count_ones()` children in ascending bit order stored
/// back to front: child rank 0 occupies the last slot.
///
/// Invariant: `data_map & node_map == 0`.
pub struct BitmapNode<K, V> {
    /// Bitmap of positions occupied by inline entries.
    pub data_map: u32,
    /// Bitmap of positions occupied by child subtrees.
    pub node_map: u32,
    /// Packed entries and child handles.
    pub contents: Box<[Slot<K, V>]>,
}

/// Collision node for keys sharing the same 32-bit hash code.
///
/// Invariant: `entries.len() >= 2`.
pub struct CollisionNode<K, V> {
    /// The shared hash code.
    pub hash: u32,
    /// Colliding entries, in insertion order.
    pub entries: Box<[Entry<K, V>]>,
}

// ---------------------------------------------------------------------------
// Bitmap helpers
// ---------------------------------------------------------------------------

/// Extracts the 5-bit hash fragment at the given bit-shift depth.
///
/// Shifts past the hash width yield fragment 0.
#[inline]
#[must_use]
pub const fn fragment(hash: u32, shift: u32) -> u32 {
    match hash.checked_shr(shift) {
        Some(h) => h & 0x1F,
        None => 0,
    }
}

/// Returns the single-bit mask for the given fragment (0..31).
#[inline]
#[must_use]
pub const fn mask(frag: u32) -> u32 {
    1 << frag
}

/// Returns the compact index of `bit` within `bitmap`.
///
/// Counts the number of set bits below `bit`.
#[inline]
#[must_use]
pub const fn index(bitmap: u32, bit: u32) -> usize {
    (bitmap & (bit - 1)).count_ones() as usize
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl<K, V> Slot<K, V> {
    /// Returns the inline entry held by this slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot holds a child; the bitmaps never point there.
    pub fn as_entry(&self) -> &Entry<K, V> {
        match self {
            Self::Entry(e) => e,
            Self::Node(_) => unreachable!("payload index points at a child slot"),
        }
    }

    /// Returns the child handle held by this slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot holds an inline entry.
    pub fn as_node(&self) -> &Arc<Node<K, V>> {
        match self {
            Self::Node(n) => n,
            Self::Entry(_) => unreachable!("child index points at a payload slot"),
        }
    }
}

impl<K, V> Node<K, V> {
    /// Returns an empty bitmap node, the root of an empty map.
    #[must_use]
    pub fn empty() -> Self {
        Self::Bitmap(BitmapNode::empty())
    }

    /// Classifies this node for compression decisions after removal.
    ///
    /// Collision nodes are never inlined, so they always report `More`.
    #[must_use]
    pub fn size_class(&self) -> SizeClass {
        match self {
            Self::Bitmap(b) if b.node_map == 0 => match b.data_len() {
                0 => SizeClass::Empty,
                1 => SizeClass::One,
                _ => SizeClass::More,
            },
            Self::Bitmap(_) | Self::Collision(_) => SizeClass::More,
        }
    }

    /// Consumes a `One`-sized node and returns its sole entry.
    ///
    /// # Panics
    ///
    /// Panics if the node is not a single-entry bitmap node.
    #[must_use]
    pub fn into_sole_entry(self) -> Entry<K, V> {
        match self {
            Self::Bitmap(b) => match Vec::from(b.contents).pop() {
                Some(Slot::Entry(e)) => e,
                _ => unreachable!("inlined child must hold exactly one entry"),
            },
            Self::Collision(_) => unreachable!("collision nodes are never inlined"),
        }
    }
}

impl<K, V> BitmapNode<K, V> {
    /// Returns a node with no entries and no children.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            data_map: 0,
            node_map: 0,
            contents: Box::new([]),
        }
    }

    /// Returns a leaf holding `entry` at its natural position at depth 0.
    #[must_use]
    pub fn single(entry: Entry<K, V>) -> Self {
        Self {
            data_map: mask(fragment(entry.hash, 0)),
            node_map: 0,
            contents: Box::new([Slot::Entry(entry)]),
        }
    }

    /// Returns the number of inline data entries.
    #[must_use]
    pub const fn data_len(&self) -> usize {
        self.data_map.count_ones() as usize
    }

    /// Returns the number of child subtrees.
    #[must_use]
    pub const fn children_len(&self) -> usize {
        self.node_map.count_ones() as usize
    }

    /// Returns the inline entry of rank `pos`.
    #[must_use]
    pub fn entry(&self, pos: usize) -> &Entry<K, V> {
        self.contents[pos].as_entry()
    }

    /// Returns the child of rank `pos`.
    #[must_use]
    pub fn child(&self, pos: usize) -> &Node<K, V> {
        self.contents[self.contents.len() - 1 - pos].as_node()
    }

    /// Returns the payload slots (inline entries only).
    #[must_use]
    pub fn payload(&self) -> &[Slot<K, V>] {
        &self.contents[..self.data_len()]
    }
}

// ---------------------------------------------------------------------------
// Copy-on-write builders — each copies `contents` once, sized exactly
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> BitmapNode<K, V> {
    /// Copies this node with the entry of rank `pos` replaced.
    #[must_use]
    pub fn with_entry_replaced(&self, pos: usize, entry: Entry<K, V>) -> Self {
        let mut contents = self.contents.to_vec();
        contents[pos] = Slot::Entry(entry);
        Self {
            data_map: self.data_map,
            node_map: self.node_map,
            contents: contents.into_boxed_slice(),
        }
    }

    /// Copies this node with a new entry spliced in at the empty position `bit`.
    #[must_use]
    pub fn with_entry_inserted(&self, bit: u32, entry: Entry<K, V>) -> Self {
        let at = index(self.data_map, bit);
        let mut contents = Vec::with_capacity(self.contents.len() + 1);
        contents.extend_from_slice(&self.contents[..at]);
        contents.push(Slot::Entry(entry));
        contents.extend_from_slice(&self.contents[at..]);
        Self {
            data_map: self.data_map | bit,
            node_map: self.node_map,
            contents: contents.into_boxed_slice(),
        }
    }

    /// Copies this node with the entry at position `bit` spliced out.
    #[must_use]
    pub fn with_entry_removed(&self, bit: u32) -> Self {
        let at = index(self.data_map, bit);
        let mut contents = Vec::with_capacity(self.contents.len() - 1);
        contents.extend_from_slice(&self.contents[..at]);
        contents.extend_from_slice(&self.contents[at + 1..]);
        Self {
            data_map: self.data_map ^ bit,
            node_map: self.node_map,
            contents: contents.into_boxed_slice(),
        }
    }

    /// Copies this node with the child of rank `pos` swapped for `child`.
    #[must_use]
    pub fn with_child_replaced(&self, pos: usize, child: Arc<Node<K, V>>) -> Self {
        let mut contents = self.contents.to_vec();
        let at = contents.len() - 1 - pos;
        contents[at] = Slot::Node(child);
        Self {
            data_map: self.data_map,
            node_map: self.node_map,
            contents: contents.into_boxed_slice(),
        }
    }

    /// Moves position `bit` from an inline entry to the subtree `child`.
    #[must_use]
    pub fn with_entry_deinlined(&self, bit: u32, child: Arc<Node<K, V>>) -> Self {
        let node_map = self.node_map | bit;
        let data_at = index(self.data_map, bit);
        let node_at = self.contents.len() - 1 - index(node_map, bit);

        let mut contents = Vec::with_capacity(self.contents.len());
        contents.extend_from_slice(&self.contents[..data_at]);
        contents.extend_from_slice(&self.contents[data_at + 1..=node_at]);
        contents.push(Slot::Node(child));
        contents.extend_from_slice(&self.contents[node_at + 1..]);
        Self {
            data_map: self.data_map ^ bit,
            node_map,
            contents: contents.into_boxed_slice(),
        }
    }

    /// Moves position `bit` from a subtree to the inline `entry`.
    #[must_use]
    pub fn with_child_inlined(&self, bit: u32, entry: Entry<K, V>) -> Self {
        let data_at = index(self.data_map, bit);
        let node_at = self.contents.len() - 1 - index(self.node_map, bit);

        let mut contents = Vec::with_capacity(self.contents.len());
        contents.extend_from_slice(&self.contents[..data_at]);
        contents.push(Slot::Entry(entry));
        contents.extend_from_slice(&self.contents[data_at..node_at]);
        contents.extend_from_slice(&self.contents[node_at + 1..]);
        Self {
            data_map: self.data_map | bit,
            node_map: self.node_map ^ bit,
            contents: contents.into_boxed_slice(),
        }
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls — avoid false `K: Debug, V: Debug` bounds.
// ---------------------------------------------------------------------------

impl<K, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitmap(b) => f
                .debug_struct("Bitmap")
                .field("data_map", &format_args!("{:#034b}", b.data_map))
                .field("node_map", &format_args!("{:#034b}", b.node_map))
                .field("contents_len", &b.contents.len())
                .finish(),
            Self::Collision(c) => f
                .debug_struct("Collision")
                .field("hash", &format_args!("{:#010x}", c.hash))
                .field("entries_len", &c.entries.len())
                .finish(),
        }
    }
}
