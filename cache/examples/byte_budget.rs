use fibre_lru::listener::from_fn;
use fibre_lru::{EvictionReason, SyncWeightedLru, WeightedLru};
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() {
  // RUST_LOG=fibre_lru=trace shows every eviction and resize.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // Cap the cache at 64 bytes of payload and 8 entries, whichever is hit first.
  let listener = from_fn(|key: String, value: Vec<u8>, reason: EvictionReason| {
    println!("Evicted '{}' ({} bytes): {}", key, value.len(), reason);
  });
  let mut cache =
    WeightedLru::with_eviction_listener(64, 8, listener).expect("Failed to build cache");

  for (name, size) in [("small", 8), ("medium", 24), ("large", 40)] {
    let payload = vec![0u8; size];
    let evicted = cache
      .add(name.to_string(), payload, size as u64)
      .expect("listener never fails");
    println!("Added '{}' with weight {}, evicted {} entries.", name, size, evicted);
  }

  let (weight, len) = cache.total();
  println!("\nResident: {} entries weighing {} bytes.", len, weight);
  println!("Keys from oldest to newest: {:?}", cache.keys());

  // Shrinking the budget evicts from the oldest end.
  let evicted = cache.resize(32, 8).expect("listener never fails");
  println!("\nResized to 32 bytes, evicted {} entries.", evicted);

  // Hand the cache to several threads.
  let shared = Arc::new(SyncWeightedLru::from(cache));
  let handles: Vec<_> = (0..4)
    .map(|i| {
      let shared = shared.clone();
      thread::spawn(move || {
        let key = format!("thread-{}", i);
        shared.add(key, vec![i as u8; 4], 4).expect("listener never fails");
      })
    })
    .collect();
  for handle in handles {
    handle.join().expect("worker panicked");
  }

  println!("\nAfter concurrent adds: {:?}", shared.keys());
  shared.purge().expect("listener never fails");
}
