//! Shared state of the bounded queue and its edge-triggered signaling.
//!
//! One `parking_lot::Mutex` guards the items and both waker lists. Sync
//! waiters sleep on the `not_full`/`not_empty` condition variables; async
//! waiters leave a `Waker` in the matching `WakerSet`. Notifications fire only
//! on the transition edges (empty to non-empty, full to not-full) and always
//! reach every waiter of that side, each of which re-checks under the lock.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::cancel::Unblock;
use crate::internal::waker_set::WakerSet;

#[derive(Debug)]
pub(crate) struct QueueState<T> {
  pub(crate) items: VecDeque<T>,
  /// Async tasks waiting for room.
  pub(crate) not_full_wakers: WakerSet,
  /// Async tasks waiting for an item.
  pub(crate) not_empty_wakers: WakerSet,
}

#[derive(Debug)]
pub(crate) struct Shared<T> {
  pub(crate) capacity: usize,
  pub(crate) state: Mutex<QueueState<T>>,
  pub(crate) not_full: Condvar,
  pub(crate) not_empty: Condvar,
}

impl<T> Shared<T> {
  pub(crate) fn new(capacity: usize) -> Self {
    Self {
      capacity,
      state: Mutex::new(QueueState {
        items: VecDeque::with_capacity(capacity),
        not_full_wakers: WakerSet::new(),
        not_empty_wakers: WakerSet::new(),
      }),
      not_full: Condvar::new(),
      not_empty: Condvar::new(),
    }
  }

  #[inline]
  pub(crate) fn is_full_locked(&self, state: &QueueState<T>) -> bool {
    state.items.len() == self.capacity
  }

  /// Appends `item` at the tail. The caller holds the lock and has checked for room.
  pub(crate) fn push_locked(&self, state: &mut QueueState<T>, item: T) {
    debug_assert!(state.items.len() < self.capacity);
    let was_empty = state.items.is_empty();
    state.items.push_back(item);
    if was_empty {
      self.not_empty.notify_all();
      state.not_empty_wakers.wake_all();
    }
  }

  /// Removes the head, signaling producers if the queue was exactly full.
  pub(crate) fn pop_locked(&self, state: &mut QueueState<T>) -> Option<T> {
    let was_full = self.is_full_locked(state);
    let item = state.items.pop_front()?;
    if was_full {
      self.not_full.notify_all();
      state.not_full_wakers.wake_all();
    }
    Some(item)
  }
}

impl<T: Send> Unblock for Shared<T> {
  fn unblock(&self) {
    // Taking the lock orders this notification after any waiter that has
    // already checked its token and is about to wait.
    let _state = self.state.lock();
    self.not_full.notify_all();
    self.not_empty.notify_all();
  }
}
