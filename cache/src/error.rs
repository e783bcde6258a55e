use thiserror::Error;

use crate::listener::{EvictionReason, ListenerError};

/// Errors that can occur when creating a cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// The item-count ceiling was negative or does not fit in `usize`.
  #[error("max size must be a non-negative integer that fits in usize")]
  InvalidMaxSize,
}

/// Returned when the eviction listener fails part way through an operation.
///
/// Every entry counted by [`evicted`](Self::evicted), including the one whose
/// notification failed, has already left the cache; nothing is rolled back.
/// Entries that were not reached yet are still resident.
#[derive(Debug, Error)]
#[error("eviction listener failed after {evicted} entries were removed ({reason})")]
pub struct EvictionError {
  evicted: usize,
  reason: EvictionReason,
  #[source]
  source: ListenerError,
}

impl EvictionError {
  pub(crate) fn new(evicted: usize, reason: EvictionReason, source: ListenerError) -> Self {
    Self {
      evicted,
      reason,
      source,
    }
  }

  /// Number of entries removed by the failed call.
  pub fn evicted(&self) -> usize {
    self.evicted
  }

  /// Why the entries of the failed call were being removed.
  pub fn reason(&self) -> EvictionReason {
    self.reason
  }

  /// Consumes the error, returning what the listener failed with.
  pub fn into_source(self) -> ListenerError {
    self.source
  }
}
