/// A resident cache entry: the key, the caller's value and its weight.
///
/// Entries are owned by the arena of the ordered index and never referenced
/// from anywhere else except through an arena `Index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
  pub(crate) key: K,
  pub(crate) value: V,
  pub(crate) weight: u64,
}

impl<K, V> Entry<K, V> {
  #[inline]
  pub(crate) fn new(key: K, value: V, weight: u64) -> Self {
    Self { key, value, weight }
  }

  #[inline]
  pub(crate) fn into_pair(self) -> (K, V) {
    (self.key, self.value)
  }
}
