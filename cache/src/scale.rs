//! Proportional rescaling of cache capacities.
//!
//! Operators resizing a pool of caches compute the new ceilings here and pass
//! them to `resize`; no cache calls into this module on its own.
//!
//! ```
//! use fibre_lru::scale::{CapacityScale, Ratio};
//!
//! let half = Ratio::new(2, 1).unwrap();
//! assert_eq!(half.u64(7), 4); // rounds up
//! assert_eq!(half.f64(7.0), 3.5);
//! assert_eq!(Ratio::IDENTITY.usize(42), 42);
//! ```

use std::num::NonZeroU64;

/// Rescales capacity values of various widths.
///
/// Implementors provide the unsigned 64-bit and floating point conversions;
/// every other integer width goes through [`u64`](Self::u64) and is narrowed
/// back with a plain `as` cast. Out-of-range results are truncated, and
/// negative inputs are reinterpreted as unsigned before scaling.
pub trait CapacityScale {
  fn u64(&self, value: u64) -> u64;

  fn f32(&self, value: f32) -> f32;

  fn f64(&self, value: f64) -> f64;

  fn usize(&self, value: usize) -> usize {
    self.u64(value as u64) as usize
  }

  fn u32(&self, value: u32) -> u32 {
    self.u64(value as u64) as u32
  }

  fn i32(&self, value: i32) -> i32 {
    self.u64(value as u64) as i32
  }

  fn i64(&self, value: i64) -> i64 {
    self.u64(value as u64) as i64
  }

  fn isize(&self, value: isize) -> isize {
    self.u64(value as u64) as isize
  }
}

/// Scales capacities by `target / base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
  pub base: NonZeroU64,
  pub target: u64,
}

impl Ratio {
  /// Leaves every value unchanged.
  pub const IDENTITY: Ratio = Ratio {
    base: NonZeroU64::MIN,
    target: 1,
  };

  /// Returns `None` when `base` is zero.
  pub const fn new(base: u64, target: u64) -> Option<Self> {
    match NonZeroU64::new(base) {
      Some(base) => Some(Self { base, target }),
      None => None,
    }
  }
}

impl Default for Ratio {
  fn default() -> Self {
    Self::IDENTITY
  }
}

impl CapacityScale for Ratio {
  /// `ceil(value * target / base)`, so scaled capacities are never
  /// under-provisioned. The product is formed in 128 bits.
  fn u64(&self, value: u64) -> u64 {
    let multiplied = value as u128 * self.target as u128;
    multiplied.div_ceil(self.base.get() as u128) as u64
  }

  fn f32(&self, value: f32) -> f32 {
    value * (self.target as f32 / self.base.get() as f32)
  }

  fn f64(&self, value: f64) -> f64 {
    value * (self.target as f64 / self.base.get() as f64)
  }
}
