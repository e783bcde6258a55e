#![allow(dead_code)]

use std::sync::mpsc;

use fibre_lru::{EvictionListener, EvictionReason, ListenerError};

// Forwards every eviction into a channel so a test can inspect them in order.
pub struct TestListener<K, V> {
  sender: mpsc::Sender<(K, V, EvictionReason)>,
}

impl<K: Send, V: Send> EvictionListener<K, V> for TestListener<K, V> {
  fn on_evict(&mut self, key: K, value: V, reason: EvictionReason) -> Result<(), ListenerError> {
    // The receiver lives in the test body, so a send can only fail after the
    // test has finished with it.
    self.sender.send((key, value, reason)).ok();
    Ok(())
  }
}

pub fn recording_listener<K, V>() -> (TestListener<K, V>, mpsc::Receiver<(K, V, EvictionReason)>) {
  let (sender, receiver) = mpsc::channel();
  (TestListener { sender }, receiver)
}

// Drains everything recorded so far.
pub fn drain<T>(receiver: &mpsc::Receiver<T>) -> Vec<T> {
  receiver.try_iter().collect()
}
