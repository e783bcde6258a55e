//! Recency-ordered, in-memory caches bounded by item count and by the
//! cumulative weight of their entries.
//!
//! # Features
//! - **Dual ceilings**: [`WeightedLru`] evicts least recently used entries
//!   until both its item-count and weight ceilings hold, however many
//!   evictions a single insert needs.
//! - **Plain LRU**: [`Lru`] is the same engine with every entry weighing 1.
//! - **Composite operations**: `contains_or_add` and `peek_or_add` check and
//!   insert in one call.
//! - **Runtime resizing**: `resize` shrinks or grows both ceilings, evicting
//!   immediately when needed. [`scale`] computes proportional ceilings.
//! - **Eviction listeners** that receive ownership of evicted entries and may
//!   fail; a failure is reported as [`EvictionError`] and never leaves a
//!   half-removed entry behind.
//! - **Optional locking**: the caches are single-threaded; [`SyncWeightedLru`]
//!   wraps one in a mutex for shared use.
//!
//! ```
//! use fibre_lru::WeightedLru;
//!
//! // At most 5 entries weighing at most 5 in total.
//! let mut cache = WeightedLru::new(5, 5).unwrap();
//! cache.add(1, "one", 1).unwrap();
//! cache.add(2, "two", 2).unwrap();
//!
//! // 3 + 3 exceeds the weight ceiling, so the oldest entry goes.
//! assert_eq!(cache.add(3, "three", 3).unwrap(), 1);
//! assert_eq!(cache.keys(), vec![2, 3]);
//! assert_eq!(cache.total(), (5, 2));
//! ```

// Public modules that form the API
pub mod config;
pub mod error;
pub mod listener;
pub mod lru;
pub mod scale;
pub mod sync;
pub mod weighted;

// Internal, crate-only modules
mod entry;
mod index;

// Re-export the primary user-facing types for convenience
pub use config::CacheConfig;
pub use error::{BuildError, EvictionError};
pub use index::Iter;
pub use listener::{EvictionListener, EvictionReason, ListenerError};
pub use lru::Lru;
pub use scale::{CapacityScale, Ratio};
pub use sync::SyncWeightedLru;
pub use weighted::{PeekOrAdd, WeightedLru};
