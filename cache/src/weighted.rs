use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::entry::Entry;
use crate::error::{BuildError, EvictionError};
use crate::index::{Iter, OrderedIndex};
use crate::listener::{EvictionListener, EvictionReason};

/// Outcome of [`WeightedLru::peek_or_add`].
#[derive(Debug, PartialEq, Eq)]
pub enum PeekOrAdd<'a, V> {
  /// The key was already resident. Nothing was inserted, evicted or reordered.
  Present(&'a V),
  /// The key was absent and has been added.
  Added {
    /// The value just stored, or `None` if it was heavier than the weight
    /// ceiling and the eviction loop drained it along with everything else.
    value: Option<&'a V>,
    /// Entries evicted to make room.
    evicted: usize,
  },
}

impl<'a, V> PeekOrAdd<'a, V> {
  pub fn is_present(&self) -> bool {
    matches!(self, PeekOrAdd::Present(_))
  }

  pub fn value(&self) -> Option<&'a V> {
    match *self {
      PeekOrAdd::Present(value) => Some(value),
      PeekOrAdd::Added { value, .. } => value,
    }
  }

  pub fn evicted(&self) -> usize {
    match *self {
      PeekOrAdd::Present(_) => 0,
      PeekOrAdd::Added { evicted, .. } => evicted,
    }
  }

  /// Splits into `(value, was_present, evicted)`.
  pub fn into_parts(self) -> (Option<&'a V>, bool, usize) {
    (self.value(), self.is_present(), self.evicted())
  }
}

/// A least-recently-used cache bounded both by the number of entries and by
/// the sum of their weights.
///
/// Every operation that can grow the cache runs the eviction loop afterwards:
/// while either ceiling is exceeded and the cache is not empty, the least
/// recently used entry is removed and handed to the eviction listener. A
/// single insert can therefore evict any number of entries, and an entry
/// heavier than the weight ceiling drains the cache completely.
///
/// The cache is not synchronized. Wrap it in
/// [`SyncWeightedLru`](crate::SyncWeightedLru) to share it across threads.
pub struct WeightedLru<K, V, H = ahash::RandomState> {
  index: OrderedIndex<K, V, H>,
  max_weight: u64,
  max_size: usize,
  listener: Option<Box<dyn EvictionListener<K, V>>>,
}

impl<K, V, H> fmt::Debug for WeightedLru<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeightedLru")
      .field("len", &self.index.len())
      .field("weight", &self.index.total_weight())
      .field("max_weight", &self.max_weight)
      .field("max_size", &self.max_size)
      .field("has_listener", &self.listener.is_some())
      .finish_non_exhaustive()
  }
}

impl<K, V> WeightedLru<K, V>
where
  K: Eq + Hash + Clone,
{
  /// Creates a cache holding at most `max_size` entries whose weights sum to
  /// at most `max_weight`.
  ///
  /// `max_size` accepts any integer; a negative value is rejected with
  /// [`BuildError::InvalidMaxSize`]. Every `max_weight` is accepted, and a
  /// zero ceiling admits only zero-weight entries.
  pub fn new<S: TryInto<usize>>(max_weight: u64, max_size: S) -> Result<Self, BuildError> {
    Self::with_hasher(max_weight, max_size, ahash::RandomState::new())
  }

  /// Like [`new`](Self::new), registering a listener that receives every
  /// evicted entry.
  pub fn with_eviction_listener<S, L>(
    max_weight: u64,
    max_size: S,
    listener: L,
  ) -> Result<Self, BuildError>
  where
    S: TryInto<usize>,
    L: EvictionListener<K, V> + 'static,
  {
    let mut cache = Self::new(max_weight, max_size)?;
    cache.set_eviction_listener(listener);
    Ok(cache)
  }

  pub fn from_config(config: CacheConfig) -> Self {
    Self::from_parts(config.max_weight, config.max_size, ahash::RandomState::new())
  }
}

impl<K, V, H> WeightedLru<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub fn with_hasher<S: TryInto<usize>>(
    max_weight: u64,
    max_size: S,
    hasher: H,
  ) -> Result<Self, BuildError> {
    let max_size = max_size
      .try_into()
      .map_err(|_| BuildError::InvalidMaxSize)?;
    Ok(Self::from_parts(max_weight, max_size, hasher))
  }

  fn from_parts(max_weight: u64, max_size: usize, hasher: H) -> Self {
    Self {
      index: OrderedIndex::new(hasher),
      max_weight,
      max_size,
      listener: None,
    }
  }

  /// Registers (or replaces) the eviction listener.
  pub fn set_eviction_listener<L>(&mut self, listener: L)
  where
    L: EvictionListener<K, V> + 'static,
  {
    self.listener = Some(Box::new(listener));
  }

  /// Inserts or updates an entry and marks it as the most recently used.
  ///
  /// An update replaces the value and weight in place. Returns how many
  /// entries the eviction loop removed afterwards.
  pub fn add(&mut self, key: K, value: V, weight: u64) -> Result<usize, EvictionError> {
    match self.index.position(&key) {
      Some(pos) => {
        self.index.replace(pos, value, weight);
        self.index.move_to_tail(pos);
      }
      None => {
        self.index.insert_at_tail(key, value, weight);
      }
    }
    self.evict_overflow()
  }

  /// Looks up a value and marks it as the most recently used.
  pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    let pos = self.index.position(key)?;
    self.index.move_to_tail(pos);
    Some(self.index.value_at(pos))
  }

  /// Like [`get`](Self::get), returning a mutable reference.
  ///
  /// The entry's weight is not re-evaluated; use [`add`](Self::add) to
  /// change it.
  pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    let pos = self.index.position(key)?;
    self.index.move_to_tail(pos);
    Some(self.index.value_at_mut(pos))
  }

  /// Looks up a value without updating its recency.
  pub fn peek<Q>(&self, key: &Q) -> Option<&V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.index.position(key).map(|pos| self.index.value_at(pos))
  }

  /// Membership test that does not update recency.
  pub fn contains<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.index.contains(key)
  }

  /// Adds the entry only if the key is absent.
  ///
  /// Returns `(true, 0)` without touching the cache when the key is
  /// resident, otherwise `(false, evicted)` exactly as [`add`](Self::add).
  pub fn contains_or_add(
    &mut self,
    key: K,
    value: V,
    weight: u64,
  ) -> Result<(bool, usize), EvictionError> {
    if self.index.contains(&key) {
      return Ok((true, 0));
    }
    self.add(key, value, weight).map(|evicted| (false, evicted))
  }

  /// Returns the resident value for `key`, or adds `value` if absent.
  ///
  /// A resident key is neither updated nor reordered.
  pub fn peek_or_add(
    &mut self,
    key: K,
    value: V,
    weight: u64,
  ) -> Result<PeekOrAdd<'_, V>, EvictionError> {
    if let Some(pos) = self.index.position(&key) {
      return Ok(PeekOrAdd::Present(self.index.value_at(pos)));
    }
    let evicted = self.add(key, value, weight)?;
    // The new entry is the tail unless the eviction loop drained the cache.
    let value = self.index.peek_tail().map(|(_, value)| value);
    Ok(PeekOrAdd::Added { value, evicted })
  }

  /// Removes an entry, returning its value.
  ///
  /// The eviction listener is not notified; the value goes to the caller.
  pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.index.remove(key).map(|entry| entry.value)
  }

  /// Removes and returns the least recently used entry.
  pub fn remove_oldest(&mut self) -> Option<(K, V)> {
    self.index.remove_head().map(Entry::into_pair)
  }

  /// The least recently used entry, without updating its recency.
  pub fn get_oldest(&self) -> Option<(&K, &V)> {
    self.index.peek_head()
  }

  /// A snapshot of the resident keys, least recently used first.
  pub fn keys(&self) -> Vec<K> {
    self.index.keys_in_order()
  }

  /// Iterates over resident entries, least recently used first, without
  /// updating recency.
  pub fn iter(&self) -> Iter<'_, K, V> {
    self.index.iter()
  }

  pub fn len(&self) -> usize {
    self.index.len()
  }

  pub fn is_empty(&self) -> bool {
    self.index.is_empty()
  }

  /// The sum of the weights of all resident entries.
  ///
  /// The sum never exceeds `max_weight` once an operation completes. Only
  /// after a listener failure can it stay above `u64::MAX`, in which case
  /// `u64::MAX` is reported.
  pub fn weight(&self) -> u64 {
    u64::try_from(self.index.total_weight()).unwrap_or(u64::MAX)
  }

  /// `(weight, len)` in one call.
  pub fn total(&self) -> (u64, usize) {
    (self.weight(), self.index.len())
  }

  pub fn max_weight(&self) -> u64 {
    self.max_weight
  }

  pub fn max_size(&self) -> usize {
    self.max_size
  }

  pub fn config(&self) -> CacheConfig {
    CacheConfig::new(self.max_weight, self.max_size)
  }

  /// Removes every entry, notifying the listener once per entry.
  ///
  /// Entries are drained least recently used first. If the listener fails,
  /// purging stops and the entries not yet reached stay resident.
  pub fn purge(&mut self) -> Result<(), EvictionError> {
    if self.listener.is_none() {
      let purged = self.index.len();
      self.index.clear();
      debug!(purged, "purged cache");
      return Ok(());
    }

    let mut purged = 0;
    while let Some(entry) = self.index.remove_head() {
      purged += 1;
      self.notify(entry, EvictionReason::Purged, purged)?;
    }
    debug!(purged, "purged cache");
    Ok(())
  }

  /// Replaces both ceilings and evicts until the cache fits them.
  pub fn resize(&mut self, max_weight: u64, max_size: usize) -> Result<usize, EvictionError> {
    self.max_weight = max_weight;
    self.max_size = max_size;
    let evicted = self.evict_overflow()?;
    debug!(max_weight, max_size, evicted, "resized cache");
    Ok(evicted)
  }

  pub fn resize_to(&mut self, config: CacheConfig) -> Result<usize, EvictionError> {
    self.resize(config.max_weight, config.max_size)
  }

  #[inline]
  fn is_over_capacity(&self) -> bool {
    !self.index.is_empty()
      && (self.index.total_weight() > u128::from(self.max_weight)
        || self.index.len() > self.max_size)
  }

  // The eviction loop. Each victim is fully detached before the listener
  // sees it.
  fn evict_overflow(&mut self) -> Result<usize, EvictionError> {
    let mut evicted = 0;
    while self.is_over_capacity() {
      let Some(entry) = self.index.remove_head() else {
        break;
      };
      evicted += 1;
      trace!(weight = entry.weight, evicted, "evicted least recently used entry");
      self.notify(entry, EvictionReason::Capacity, evicted)?;
    }
    Ok(evicted)
  }

  fn notify(
    &mut self,
    entry: Entry<K, V>,
    reason: EvictionReason,
    evicted: usize,
  ) -> Result<(), EvictionError> {
    let Some(listener) = self.listener.as_mut() else {
      return Ok(());
    };
    let (key, value) = entry.into_pair();
    listener.on_evict(key, value, reason).map_err(|source| {
      warn!(%reason, evicted, error = %source, "eviction listener failed");
      EvictionError::new(evicted, reason, source)
    })
  }
}

impl<'a, K, V, H> IntoIterator for &'a WeightedLru<K, V, H>
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
