//! The list of parked async tasks for one side of the queue.
//!
//! Sync waiters park on a `Condvar`; async waiters leave their `Waker` here.
//! Both are notified together on the same transition edge, always while the
//! queue's mutex is held. Each future owns at most one entry, identified by the
//! key it was handed, and removes it when dropped.

use std::task::Waker;

#[derive(Debug, Default)]
pub(crate) struct WakerSet {
  entries: Vec<(u64, Waker)>,
  next_key: u64,
}

impl WakerSet {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Stores `waker` under `key`, allocating a key on first use.
  ///
  /// An entry that is still present is refreshed in place; one that was
  /// drained by [`wake_all`](Self::wake_all) is inserted again.
  pub(crate) fn register(&mut self, key: &mut Option<u64>, waker: &Waker) {
    if let Some(k) = *key {
      if let Some((_, existing)) = self.entries.iter_mut().find(|(id, _)| *id == k) {
        if !existing.will_wake(waker) {
          *existing = waker.clone();
        }
        return;
      }
    }
    let k = self.next_key;
    self.next_key = self.next_key.wrapping_add(1);
    self.entries.push((k, waker.clone()));
    *key = Some(k);
  }

  /// Forgets the entry for `key`, if it has not been woken already.
  pub(crate) fn remove(&mut self, key: u64) {
    if let Some(pos) = self.entries.iter().position(|(id, _)| *id == key) {
      self.entries.swap_remove(pos);
    }
  }

  /// Wakes and forgets every registered task.
  pub(crate) fn wake_all(&mut self) {
    for (_, waker) in self.entries.drain(..) {
      waker.wake();
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}
