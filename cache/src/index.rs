use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use generational_arena::{Arena, Index};

use crate::entry::Entry;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
  pub(crate) entry: Entry<K, V>,
  pub(crate) prev: Option<Index>,
  pub(crate) next: Option<Index>,
}

// A recency-ordered, weight-tracking list of entries.
// The arena owns every entry; the lookup only holds arena indices.
#[derive(Debug)]
pub(crate) struct OrderedIndex<K, V, H> {
  // Arena stores all nodes contiguously.
  pub(crate) nodes: Arena<Node<K, V>>,
  // HashMap for O(1) lookup of a key to its node index in the arena.
  pub(crate) lookup: HashMap<K, Index, H>,
  // Head is the least-recently-used entry.
  pub(crate) head: Option<Index>,
  // Tail is the most-recently-used entry.
  pub(crate) tail: Option<Index>,
  // Exact sum of the weights of all resident entries. Wider than a single
  // weight so that an insert over the ceiling never wraps or saturates.
  pub(crate) total_weight: u128,
}

impl<K, V, H> OrderedIndex<K, V, H> {
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  #[inline]
  pub fn total_weight(&self) -> u128 {
    self.total_weight
  }
}

impl<K, V, H> OrderedIndex<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub fn new(hasher: H) -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::with_hasher(hasher),
      head: None,
      tail: None,
      total_weight: 0,
    }
  }

  // Detaches a node from its neighbours. Arena and lookup are left untouched.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_node_idx = node.prev;
    let next_node_idx = node.next;

    if let Some(prev_idx) = prev_node_idx {
      self.nodes[prev_idx].next = next_node_idx;
    } else {
      self.head = next_node_idx;
    }

    if let Some(next_idx) = next_node_idx {
      self.nodes[next_idx].prev = prev_node_idx;
    } else {
      self.tail = prev_node_idx;
    }
  }

  // Appends a node that already lives in the arena after the current tail.
  fn link_at_tail(&mut self, index: Index) {
    let old_tail_idx = self.tail;
    self.nodes[index].prev = old_tail_idx;
    self.nodes[index].next = None;
    self.tail = Some(index);

    if let Some(old_tail) = old_tail_idx {
      self.nodes[old_tail].next = Some(index);
    } else {
      self.head = Some(index);
    }
  }

  /// Resolves a key to the arena slot holding its entry.
  ///
  /// A lookup hit whose slot no longer holds a node resolves to `None`, so
  /// callers see a miss instead of touching a vacant slot.
  pub fn position<Q>(&self, key: &Q) -> Option<Index>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self
      .lookup
      .get(key)
      .copied()
      .filter(|&index| self.nodes.contains(index))
  }

  pub fn contains<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.position(key).is_some()
  }

  /// Value stored at a slot obtained from `position`.
  #[inline]
  pub fn value_at(&self, index: Index) -> &V {
    &self.nodes[index].entry.value
  }

  #[inline]
  pub fn value_at_mut(&mut self, index: Index) -> &mut V {
    &mut self.nodes[index].entry.value
  }

  /// Inserts a new entry as the most recently used one.
  /// The key must not be resident. A dangling lookup entry for it is
  /// overwritten.
  pub fn insert_at_tail(&mut self, key: K, value: V, weight: u64) -> Index {
    debug_assert!(self.position(&key).is_none(), "key is already resident");
    let node = Node {
      entry: Entry::new(key.clone(), value, weight),
      prev: None,
      next: None,
    };
    let index = self.nodes.insert(node);
    self.lookup.insert(key, index);
    self.total_weight += u128::from(weight);
    self.link_at_tail(index);
    index
  }

  /// Swaps in a new value and weight for a resident entry, returning the old value.
  /// Recency is not touched.
  pub fn replace(&mut self, index: Index, value: V, weight: u64) -> V {
    let entry = &mut self.nodes[index].entry;
    self.total_weight = self.total_weight - u128::from(entry.weight) + u128::from(weight);
    entry.weight = weight;
    std::mem::replace(&mut entry.value, value)
  }

  pub fn move_to_tail(&mut self, index: Index) {
    // Only move if it's not already the tail.
    if self.tail != Some(index) {
      self.unlink(index);
      self.link_at_tail(index);
    }
  }

  pub fn peek_head(&self) -> Option<(&K, &V)> {
    self.head.map(|index| {
      let entry = &self.nodes[index].entry;
      (&entry.key, &entry.value)
    })
  }

  pub fn peek_tail(&self) -> Option<(&K, &V)> {
    self.tail.map(|index| {
      let entry = &self.nodes[index].entry;
      (&entry.key, &entry.value)
    })
  }

  // Fully detaches an entry: list links, arena slot, lookup and weight.
  fn remove_at(&mut self, index: Index) -> Option<Entry<K, V>> {
    if !self.nodes.contains(index) {
      return None;
    }
    self.unlink(index);
    let node = self.nodes.remove(index)?;
    self.lookup.remove(&node.entry.key);
    self.total_weight -= u128::from(node.entry.weight);
    Some(node.entry)
  }

  pub fn remove_head(&mut self) -> Option<Entry<K, V>> {
    let head = self.head?;
    self.remove_at(head)
  }

  pub fn remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    let index = self.position(key)?;
    self.remove_at(index)
  }

  pub fn keys_in_order(&self) -> Vec<K> {
    self.iter().map(|(key, _)| key.clone()).collect()
  }

  pub fn iter(&self) -> Iter<'_, K, V> {
    Iter {
      nodes: &self.nodes,
      next: self.head,
      remaining: self.nodes.len(),
    }
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
    self.total_weight = 0;
  }

  // Walks the whole list and checks every structural invariant.
  #[cfg(test)]
  pub(crate) fn assert_consistent(&self) {
    let mut count = 0;
    let mut weight = 0u128;
    let mut prev = None;
    let mut current = self.head;
    while let Some(index) = current {
      let node = &self.nodes[index];
      assert_eq!(node.prev, prev, "back link mismatch");
      assert_eq!(
        self.lookup.get(&node.entry.key).copied(),
        Some(index),
        "lookup does not resolve to the node holding the key"
      );
      count += 1;
      weight += u128::from(node.entry.weight);
      prev = Some(index);
      current = node.next;
    }
    assert_eq!(self.tail, prev, "tail is not the last node");
    assert_eq!(count, self.nodes.len(), "arena holds unlinked nodes");
    assert_eq!(count, self.lookup.len(), "lookup size differs from list size");
    assert_eq!(weight, self.total_weight, "tracked weight differs from sum");
  }
}

/// Iterator over resident entries, least recently used first.
///
/// Created by [`WeightedLru::iter`](crate::WeightedLru::iter) and
/// [`Lru::iter`](crate::Lru::iter).
#[derive(Debug)]
pub struct Iter<'a, K, V> {
  nodes: &'a Arena<Node<K, V>>,
  next: Option<Index>,
  remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
  type Item = (&'a K, &'a V);

  fn next(&mut self) -> Option<Self::Item> {
    let node = self.nodes.get(self.next?)?;
    self.next = node.next;
    self.remaining = self.remaining.saturating_sub(1);
    Some((&node.entry.key, &node.entry.value))
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
