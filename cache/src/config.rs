use crate::scale::CapacityScale;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two ceilings of a cache.
///
/// With the `serde` feature a missing `max_weight` deserializes to
/// `u64::MAX`, i.e. a cache bounded by item count only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CacheConfig {
  /// Ceiling on the sum of entry weights.
  #[cfg_attr(feature = "serde", serde(default = "unbounded_weight"))]
  pub max_weight: u64,
  /// Ceiling on the number of resident entries.
  pub max_size: usize,
}

#[cfg(feature = "serde")]
fn unbounded_weight() -> u64 {
  u64::MAX
}

impl CacheConfig {
  pub const fn new(max_weight: u64, max_size: usize) -> Self {
    Self {
      max_weight,
      max_size,
    }
  }

  /// A configuration bounded by item count alone.
  pub const fn unweighted(max_size: usize) -> Self {
    Self::new(u64::MAX, max_size)
  }

  /// Rescales both ceilings. An unbounded weight ceiling stays unbounded.
  pub fn scaled<S: CapacityScale + ?Sized>(&self, scale: &S) -> Self {
    let max_weight = if self.max_weight == u64::MAX {
      u64::MAX
    } else {
      scale.u64(self.max_weight)
    };
    Self::new(max_weight, scale.usize(self.max_size))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::scale::Ratio;

  #[test]
  fn scaled_rounds_both_ceilings_up() {
    let config = CacheConfig::new(1_000, 15);
    let scaled = config.scaled(&Ratio::new(4, 1).unwrap());
    assert_eq!(scaled, CacheConfig::new(250, 4));
  }

  #[test]
  fn scaled_keeps_unbounded_weight() {
    let config = CacheConfig::unweighted(10);
    let scaled = config.scaled(&Ratio::new(1, 3).unwrap());
    assert_eq!(scaled.max_weight, u64::MAX);
    assert_eq!(scaled.max_size, 30);
  }
}
