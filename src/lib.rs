//! Persistent hash map based on CHAMP.
//!
//! CHAMP (Compressed Hash-Array Mapped Prefix-tree) is a refined HAMT that
//! keeps inline entries and child subtrees in one packed array per node, each
//! addressed through its own bitmap, and compresses the trie on removal so it
//! never keeps single-entry subtrees.
//!
//! [`ChampMap`] is persistent: `insert` and `remove` take `&self` and return
//! a new map, leaving every earlier version intact. Versions share every
//! subtree an update did not touch, through `Arc` handles, so maps are cheap
//! to clone and safe to read from many threads.
//!
//! # Key properties
//!
//! - **Structural sharing**: an update copies one node per trie level
//! - **No-op detection**: removing a missing key returns the same root
//! - **O(1) structural hash**: via incrementally maintained `AdHash`
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Example
//!
//! ```
//! use champ_persist::ChampMap;
//!
//! let v1 = ChampMap::new().insert("one", 1).insert("two", 2);
//! let v2 = v1.insert("one", 100).remove("two");
//!
//! assert_eq!(v1.get("one"), Some(&1));
//! assert_eq!(v1.len(), 2);
//! assert_eq!(v2.get("one"), Some(&100));
//! assert_eq!(v2.len(), 1);
//! assert!(v2.remove("missing").ptr_eq(&v2));
//! ```
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adhash;
pub mod error;
pub mod iter;

mod map;
mod node;
mod ops;
mod validate;

#[cfg(test)]
mod tests;

pub use adhash::DefaultHashBuilder;
pub use error::StructureError;
pub use map::ChampMap;
