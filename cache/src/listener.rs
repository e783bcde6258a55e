use std::error::Error;
use std::fmt;

/// The error type an [`EvictionListener`] may fail with.
pub type ListenerError = Box<dyn Error + Send + Sync + 'static>;

/// Describes why an entry was handed to the eviction listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionReason {
  /// The entry was the least recently used one while the cache was over its
  /// item-count or weight ceiling.
  Capacity,
  /// The entry was dropped by `purge`.
  Purged,
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::Capacity => write!(f, "evicted due to capacity"),
      EvictionReason::Purged => write!(f, "purged"),
    }
  }
}

/// A listener that can be registered with a cache to receive ownership of
/// entries as they are evicted.
///
/// The cache has already removed the entry and updated its count and weight
/// when `on_evict` runs, so a failing (or panicking) listener never leaves a
/// half-removed entry behind. An `Err` stops the running operation, which
/// reports it through [`EvictionError`](crate::EvictionError).
///
/// The listener runs synchronously inside the cache operation that caused
/// the eviction and cannot reach back into the cache.
pub trait EvictionListener<K, V>: Send {
  fn on_evict(&mut self, key: K, value: V, reason: EvictionReason) -> Result<(), ListenerError>;
}

/// An [`EvictionListener`] backed by an infallible closure.
///
/// Created via [`from_fn`].
pub struct FnListener<F>(F);

impl<K, V, F> EvictionListener<K, V> for FnListener<F>
where
  F: FnMut(K, V, EvictionReason) + Send,
{
  fn on_evict(&mut self, key: K, value: V, reason: EvictionReason) -> Result<(), ListenerError> {
    (self.0)(key, value, reason);
    Ok(())
  }
}

impl<F> fmt::Debug for FnListener<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FnListener").finish_non_exhaustive()
  }
}

/// An [`EvictionListener`] backed by a closure that may fail.
///
/// Created via [`try_from_fn`].
pub struct TryFnListener<F>(F);

impl<K, V, F> EvictionListener<K, V> for TryFnListener<F>
where
  F: FnMut(K, V, EvictionReason) -> Result<(), ListenerError> + Send,
{
  fn on_evict(&mut self, key: K, value: V, reason: EvictionReason) -> Result<(), ListenerError> {
    (self.0)(key, value, reason)
  }
}

impl<F> fmt::Debug for TryFnListener<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TryFnListener").finish_non_exhaustive()
  }
}

/// Wraps a closure that observes every evicted entry.
///
/// ```
/// use fibre_lru::{listener, WeightedLru};
///
/// let (tx, rx) = std::sync::mpsc::channel();
/// let mut cache = WeightedLru::with_eviction_listener(
///   10,
///   1,
///   listener::from_fn(move |key: u32, _value: String, _reason| {
///     tx.send(key).ok();
///   }),
/// )
/// .unwrap();
///
/// cache.add(1, "a".to_string(), 1).unwrap();
/// cache.add(2, "b".to_string(), 1).unwrap();
/// assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![1]);
/// ```
pub fn from_fn<K, V, F>(f: F) -> FnListener<F>
where
  F: FnMut(K, V, EvictionReason) + Send,
{
  FnListener(f)
}

/// Wraps a closure whose failure aborts the operation that triggered it.
pub fn try_from_fn<K, V, F>(f: F) -> TryFnListener<F>
where
  F: FnMut(K, V, EvictionReason) -> Result<(), ListenerError> + Send,
{
  TryFnListener(f)
}
