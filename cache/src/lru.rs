use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::config::CacheConfig;
use crate::error::{BuildError, EvictionError};
use crate::index::Iter;
use crate::listener::EvictionListener;
use crate::weighted::{PeekOrAdd, WeightedLru};

// Every entry of an unweighted cache weighs this much.
const UNIT_WEIGHT: u64 = 1;

/// A least-recently-used cache bounded by item count only.
///
/// This is the weighted engine with every entry weighing 1 and no weight
/// ceiling, so `add` evicts at most one entry unless the cache was shrunk
/// with [`resize`](Self::resize).
pub struct Lru<K, V, H = ahash::RandomState> {
  inner: WeightedLru<K, V, H>,
}

impl<K, V, H> fmt::Debug for Lru<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Lru").field("inner", &self.inner).finish()
  }
}

impl<K, V> Lru<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Creates a cache holding at most `max_size` entries.
  ///
  /// A negative `max_size` is rejected with [`BuildError::InvalidMaxSize`].
  pub fn new<S: TryInto<usize>>(max_size: S) -> Result<Self, BuildError> {
    WeightedLru::new(u64::MAX, max_size).map(|inner| Self { inner })
  }

  pub fn with_eviction_listener<S, L>(max_size: S, listener: L) -> Result<Self, BuildError>
  where
    S: TryInto<usize>,
    L: EvictionListener<K, V> + 'static,
  {
    WeightedLru::with_eviction_listener(u64::MAX, max_size, listener).map(|inner| Self { inner })
  }

  /// Uses `config.max_size`; the weight ceiling is ignored.
  pub fn from_config(config: CacheConfig) -> Self {
    Self {
      inner: WeightedLru::from_config(CacheConfig::unweighted(config.max_size)),
    }
  }
}

impl<K, V, H> Lru<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub fn with_hasher<S: TryInto<usize>>(max_size: S, hasher: H) -> Result<Self, BuildError> {
    WeightedLru::with_hasher(u64::MAX, max_size, hasher).map(|inner| Self { inner })
  }

  pub fn set_eviction_listener<L>(&mut self, listener: L)
  where
    L: EvictionListener<K, V> + 'static,
  {
    self.inner.set_eviction_listener(listener);
  }

  /// Inserts or updates an entry, returning the number of evicted entries.
  pub fn add(&mut self, key: K, value: V) -> Result<usize, EvictionError> {
    self.inner.add(key, value, UNIT_WEIGHT)
  }

  pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.get(key)
  }

  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.get_mut(key)
  }

  pub fn peek<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.peek(key)
  }

  pub fn contains<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.contains(key)
  }

  pub fn contains_or_add(&mut self, key: K, value: V) -> Result<(bool, usize), EvictionError> {
    self.inner.contains_or_add(key, value, UNIT_WEIGHT)
  }

  pub fn peek_or_add(&mut self, key: K, value: V) -> Result<PeekOrAdd<'_, V>, EvictionError> {
    self.inner.peek_or_add(key, value, UNIT_WEIGHT)
  }

  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.remove(key)
  }

  pub fn remove_oldest(&mut self) -> Option<(K, V)> {
    self.inner.remove_oldest()
  }

  pub fn get_oldest(&self) -> Option<(&K, &V)> {
    self.inner.get_oldest()
  }

  pub fn keys(&self) -> Vec<K> {
    self.inner.keys()
  }

  pub fn iter(&self) -> Iter<'_, K, V> {
    self.inner.iter()
  }

  pub fn len(&self) -> usize {
    self.inner.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  pub fn max_size(&self) -> usize {
    self.inner.max_size()
  }

  pub fn purge(&mut self) -> Result<(), EvictionError> {
    self.inner.purge()
  }

  /// Changes the item-count ceiling, evicting the oldest entries if needed.
  pub fn resize(&mut self, max_size: usize) -> Result<usize, EvictionError> {
    self.inner.resize(u64::MAX, max_size)
  }
}

impl<'a, K, V, H> IntoIterator for &'a Lru<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  type Item = (&'a K, &'a V);
  type IntoIter = Iter<'a, K, V>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}
