use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

use parking_lot::Mutex;

use crate::config::CacheConfig;
use crate::error::{BuildError, EvictionError};
use crate::listener::EvictionListener;
use crate::weighted::WeightedLru;

/// A [`WeightedLru`] behind a `parking_lot::Mutex`, shareable across threads
/// through an `Arc`.
///
/// Every method holds the lock for the whole operation, including the
/// eviction loop and any listener calls it makes, so no caller ever observes
/// a partially applied operation. Reads hand the value to a closure that runs
/// under the lock, which avoids requiring `V: Clone`; keep those closures
/// short.
#[derive(Debug)]
pub struct SyncWeightedLru<K, V, H = ahash::RandomState> {
  inner: Mutex<WeightedLru<K, V, H>>,
}

impl<K, V> SyncWeightedLru<K, V>
where
  K: Eq + Hash + Clone,
{
  pub fn new<S: TryInto<usize>>(max_weight: u64, max_size: S) -> Result<Self, BuildError> {
    WeightedLru::new(max_weight, max_size).map(Self::from)
  }

  pub fn with_eviction_listener<S, L>(
    max_weight: u64,
    max_size: S,
    listener: L,
  ) -> Result<Self, BuildError>
  where
    S: TryInto<usize>,
    L: EvictionListener<K, V> + 'static,
  {
    WeightedLru::with_eviction_listener(max_weight, max_size, listener).map(Self::from)
  }

  pub fn from_config(config: CacheConfig) -> Self {
    Self::from(WeightedLru::from_config(config))
  }
}

impl<K, V, H> From<WeightedLru<K, V, H>> for SyncWeightedLru<K, V, H> {
  fn from(cache: WeightedLru<K, V, H>) -> Self {
    Self {
      inner: Mutex::new(cache),
    }
  }
}

impl<K, V, H> SyncWeightedLru<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub fn into_inner(self) -> WeightedLru<K, V, H> {
    self.inner.into_inner()
  }

  /// Runs `f` with exclusive access to the underlying cache.
  ///
  /// Use this to make a sequence of operations atomic with respect to other
  /// threads.
  pub fn with_lock<F, R>(&self, f: F) -> R
  where
    F: FnOnce(&mut WeightedLru<K, V, H>) -> R,
  {
    let mut cache = self.inner.lock();
    f(&mut *cache)
  }

  pub fn add(&self, key: K, value: V, weight: u64) -> Result<usize, EvictionError> {
    self.inner.lock().add(key, value, weight)
  }

  /// Looks up an entry, marks it as recently used and applies `f` to the value.
  pub fn get<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    F: FnOnce(&V) -> R,
  {
    self.inner.lock().get(key).map(f)
  }

  pub fn get_cloned<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    V: Clone,
  {
    self.get(key, V::clone)
  }

  /// Applies `f` to the value without updating its recency.
  pub fn peek<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    F: FnOnce(&V) -> R,
  {
    self.inner.lock().peek(key).map(f)
  }

  pub fn peek_cloned<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
    V: Clone,
  {
    self.peek(key, V::clone)
  }

  pub fn contains<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.lock().contains(key)
  }

  pub fn contains_or_add(
    &self,
    key: K,
    value: V,
    weight: u64,
  ) -> Result<(bool, usize), EvictionError> {
    self.inner.lock().contains_or_add(key, value, weight)
  }

  /// Peeks at a resident value or adds `value`, applying `f` to whichever
  /// value ends up resident.
  ///
  /// Returns `(f(value), was_present, evicted)`; the first element is `None`
  /// only when the new entry was drained by the eviction loop.
  pub fn peek_or_add<F, R>(
    &self,
    key: K,
    value: V,
    weight: u64,
    f: F,
  ) -> Result<(Option<R>, bool, usize), EvictionError>
  where
    F: FnOnce(&V) -> R,
  {
    let mut cache = self.inner.lock();
    let (value, present, evicted) = cache.peek_or_add(key, value, weight)?.into_parts();
    Ok((value.map(f), present, evicted))
  }

  pub fn remove<Q>(&self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.inner.lock().remove(key)
  }

  pub fn remove_oldest(&self) -> Option<(K, V)> {
    self.inner.lock().remove_oldest()
  }

  /// Applies `f` to the least recently used entry without reordering.
  pub fn get_oldest<F, R>(&self, f: F) -> Option<R>
  where
    F: FnOnce(&K, &V) -> R,
  {
    self
      .inner
      .lock()
      .get_oldest()
      .map(|(key, value)| f(key, value))
  }

  pub fn keys(&self) -> Vec<K> {
    self.inner.lock().keys()
  }

  pub fn len(&self) -> usize {
    self.inner.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.lock().is_empty()
  }

  pub fn weight(&self) -> u64 {
    self.inner.lock().weight()
  }

  pub fn total(&self) -> (u64, usize) {
    self.inner.lock().total()
  }

  pub fn purge(&self) -> Result<(), EvictionError> {
    self.inner.lock().purge()
  }

  pub fn resize(&self, max_weight: u64, max_size: usize) -> Result<usize, EvictionError> {
    self.inner.lock().resize(max_weight, max_size)
  }

  pub fn resize_to(&self, config: CacheConfig) -> Result<usize, EvictionError> {
    self.inner.lock().resize_to(config)
  }
}
