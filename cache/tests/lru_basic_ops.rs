mod common;

use common::{drain, recording_listener};
use fibre_lru::{BuildError, CacheConfig, EvictionReason, Lru, PeekOrAdd};
use pretty_assertions::assert_eq;

#[test]
fn test_new() {
  let cache = Lru::<i32, i32>::new(3).unwrap();
  assert!(cache.is_empty());
  assert_eq!(cache.max_size(), 3);
}

#[test]
fn test_new_with_negative_size() {
  let (listener, _rx) = recording_listener::<i32, i32>();
  let result = Lru::with_eviction_listener(-1, listener);
  assert_eq!(result.unwrap_err(), BuildError::InvalidMaxSize);
}

#[test]
fn test_add_and_get() {
  let mut cache = Lru::new(10).unwrap();
  assert_eq!(cache.add("a", "apple").unwrap(), 0, "unexpected eviction on first add");
  assert_eq!(cache.get("a"), Some(&"apple"));

  assert_eq!(cache.add("a", "apricot").unwrap(), 0, "unexpected eviction on update");
  assert_eq!(cache.get("a"), Some(&"apricot"));
  assert_eq!(cache.peek("a"), Some(&"apricot"));
  assert_eq!(cache.len(), 1);
}

#[test]
fn test_eviction_by_size() {
  let (listener, rx) = recording_listener();
  let mut cache = Lru::with_eviction_listener(3, listener).unwrap();
  cache.add("a", 1).unwrap();
  cache.add("b", 2).unwrap();
  cache.add("c", 3).unwrap();

  let evicted = cache.add("d", 4).unwrap();
  assert_eq!(evicted, 1, "expected one eviction from size constraint");
  assert_eq!(cache.len(), 3);
  assert_eq!(cache.keys(), vec!["b", "c", "d"]);
  assert_eq!(drain(&rx), vec![("a", 1, EvictionReason::Capacity)]);
}

#[test]
fn test_add_never_evicts_more_than_one() {
  let mut cache = Lru::new(4).unwrap();
  for key in 0..100 {
    let evicted = cache.add(key, key).unwrap();
    assert_eq!(evicted, usize::from(key >= 4));
  }
  assert_eq!(cache.keys(), vec![96, 97, 98, 99]);
}

#[test]
fn test_contains_and_remove() {
  let mut cache = Lru::new(5).unwrap();
  cache.add("x", 100).unwrap();
  assert!(cache.contains("x"));
  assert_eq!(cache.remove("x"), Some(100));
  assert!(!cache.contains("x"));
  assert_eq!(cache.remove("nonexistent"), None);
}

#[test]
fn test_get_non_existent() {
  let mut cache = Lru::<&str, i32>::new(10).unwrap();
  assert_eq!(cache.get("nonexistent"), None);
  assert_eq!(cache.peek("nonexistent"), None);
}

#[test]
fn test_remove_oldest_and_get_oldest() {
  let mut cache = Lru::new(10).unwrap();
  cache.add("first", 1).unwrap();
  cache.add("second", 2).unwrap();
  cache.add("third", 3).unwrap();

  assert_eq!(cache.get_oldest(), Some((&"first", &1)));
  assert_eq!(cache.remove_oldest(), Some(("first", 1)));
  assert_eq!(cache.get_oldest(), Some((&"second", &2)));
}

#[test]
fn test_oldest_on_empty_cache() {
  let mut cache = Lru::<&str, i32>::new(10).unwrap();
  assert_eq!(cache.remove_oldest(), None);
  assert_eq!(cache.get_oldest(), None);
  assert!(cache.is_empty());
}

#[test]
fn test_order_after_access() {
  let mut cache = Lru::new(10).unwrap();
  cache.add("a", "A").unwrap();
  cache.add("b", "B").unwrap();
  cache.add("c", "C").unwrap();
  assert_eq!(cache.get_oldest().map(|(k, _)| *k), Some("a"));

  cache.get("a");
  assert_eq!(cache.get_oldest().map(|(k, _)| *k), Some("b"));

  *cache.get_mut("b").unwrap() = "BB";
  assert_eq!(cache.keys(), vec!["c", "a", "b"]);
  assert_eq!(cache.peek("b"), Some(&"BB"));
}

#[test]
fn test_keys_ordering() {
  let mut cache = Lru::new(10).unwrap();
  cache.add("a", "A").unwrap();
  cache.add("b", "B").unwrap();
  cache.add("c", "C").unwrap();
  cache.get("b");
  assert_eq!(cache.keys(), vec!["a", "c", "b"]);
  let values: Vec<_> = cache.iter().map(|(_, v)| *v).collect();
  assert_eq!(values, vec!["A", "C", "B"]);
  assert_eq!((&cache).into_iter().len(), 3);
}

#[test]
fn test_composite_operations() {
  let mut cache = Lru::new(2).unwrap();
  cache.add(1, "one").unwrap();

  assert_eq!(cache.contains_or_add(1, "uno").unwrap(), (true, 0));
  assert_eq!(cache.contains_or_add(2, "two").unwrap(), (false, 0));
  assert_eq!(cache.peek_or_add(2, "dos").unwrap(), PeekOrAdd::Present(&"two"));
  assert_eq!(
    cache.peek_or_add(3, "three").unwrap(),
    PeekOrAdd::Added {
      value: Some(&"three"),
      evicted: 1
    }
  );
  assert_eq!(cache.keys(), vec![2, 3]);
}

#[test]
fn test_purge() {
  let (listener, rx) = recording_listener();
  let mut cache = Lru::with_eviction_listener(10, listener).unwrap();
  cache.add("x", "X").unwrap();
  cache.add("y", "Y").unwrap();
  cache.add("z", "Z").unwrap();
  assert_eq!(cache.len(), 3);

  cache.purge().unwrap();
  assert_eq!(cache.len(), 0);
  let purged = drain(&rx);
  assert_eq!(purged.len(), 3, "expected 3 evictions from purge");
  assert!(purged.iter().all(|(_, _, reason)| *reason == EvictionReason::Purged));
}

#[test]
fn test_purge_empty_cache() {
  let mut cache = Lru::<i32, i32>::new(10).unwrap();
  cache.purge().unwrap();
  assert!(cache.is_empty());
}

#[test]
fn test_resize() {
  let mut cache = Lru::new(5).unwrap();
  cache.add("a", 1).unwrap();
  cache.add("b", 2).unwrap();
  cache.add("c", 3).unwrap();
  assert_eq!(cache.len(), 3);

  // Shrinking below the current length evicts several entries in one call.
  let evicted = cache.resize(1).unwrap();
  assert_eq!(evicted, 2);
  assert_eq!(cache.keys(), vec!["c"]);
  assert_eq!(cache.max_size(), 1);

  assert_eq!(cache.resize(3).unwrap(), 0);
  cache.add("d", 4).unwrap();
  assert_eq!(cache.len(), 2);
}

#[test]
fn test_from_config_ignores_weight_ceiling() {
  let mut cache = Lru::from_config(CacheConfig::new(1, 3));
  for key in 0..3 {
    cache.add(key, ()).unwrap();
  }
  assert_eq!(cache.len(), 3, "Only the size ceiling applies");
}
