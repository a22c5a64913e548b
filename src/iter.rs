//! Iterator types for CHAMP maps.
//!
//! Traversal is depth-first pre-order over an explicit stack: a node's inline
//! entries are yielded before any of its subtrees. The order follows the hash
//! bit layout and carries no meaning.

use std::iter::FusedIterator;
use std::slice;

use crate::node::{BitmapNode, Entry, Node, Slot};

/// Cursor over the payload of the node currently being drained.
enum Payload<'a, K, V> {
    Bitmap(slice::Iter<'a, Slot<K, V>>),
    Collision(slice::Iter<'a, Entry<K, V>>),
}

impl<'a, K, V> Payload<'a, K, V> {
    fn next_entry(&mut self) -> Option<&'a Entry<K, V>> {
        match self {
            Self::Bitmap(slots) => slots.next().map(Slot::as_entry),
            Self::Collision(entries) => entries.next(),
        }
    }
}

/// Iterator over references to key-value pairs in a [`ChampMap`](crate::ChampMap).
///
/// One-shot: once exhausted it keeps returning `None`. Call
/// [`ChampMap::iter`](crate::ChampMap::iter) again to traverse anew.
pub struct Iter<'a, K, V> {
    /// Ancestors with children left to visit, paired with the next child rank.
    stack: Vec<(&'a BitmapNode<K, V>, usize)>,
    payload: Payload<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: &'a Node<K, V>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            payload: Payload::Collision(<&[Entry<K, V>]>::default().iter()),
            remaining: len,
        };
        iter.enter(root);
        iter
    }

    fn enter(&mut self, node: &'a Node<K, V>) {
        match node {
            Node::Bitmap(b) => {
                self.payload = Payload::Bitmap(b.payload().iter());
                if b.node_map != 0 {
                    self.stack.push((b, 0));
                }
            }
            Node::Collision(c) => self.payload = Payload::Collision(c.entries.iter()),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.payload.next_entry() {
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }

            let frame = self.stack.last_mut()?;
            let (parent, next) = *frame;
            if next < parent.children_len() {
                frame.1 += 1;
                self.enter(parent.child(next));
            } else {
                self.stack.pop();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            payload: match &self.payload {
                Payload::Bitmap(slots) => Payload::Bitmap(slots.clone()),
                Payload::Collision(entries) => Payload::Collision(entries.clone()),
            },
            remaining: self.remaining,
        }
    }
}

/// Iterator over the keys of a [`ChampMap`](crate::ChampMap).
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a [`ChampMap`](crate::ChampMap).
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
