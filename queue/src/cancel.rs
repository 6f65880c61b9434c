//! Cooperative cancellation for blocking queue operations.
//!
//! A `CancelToken` is the explicit stand-in for interrupting a thread: every
//! blocking call on a [`BoundedBlockingQueue`](crate::BoundedBlockingQueue)
//! takes a token, and cancelling it wakes the call out of its wait. The token
//! also offers an interruptible [`sleep`](CancelToken::sleep) for loops that
//! pace themselves between queue operations.
//!
//! A blocked call registers its queue with the token for as long as it is
//! suspended. `cancel()` sets the flag first and then notifies every
//! registered queue under that queue's own lock, while a waiter registers
//! first and then checks the flag under the queue lock. Whichever side comes
//! second observes the other, so a cancellation is never lost.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::Cancelled;

/// Something holding suspended waiters that must be woken on cancellation.
pub(crate) trait Unblock: Send + Sync {
  /// Wakes every waiter so it can re-check its token.
  fn unblock(&self);
}

struct TokenInner {
  cancelled: AtomicBool,
  next_id: AtomicU64,
  registry: Mutex<HashMap<u64, Arc<dyn Unblock>>>,
  sleep_lock: Mutex<()>,
  sleep_cv: Condvar,
}

/// A clonable, one-way cancellation signal shared by any number of threads.
///
/// Cancellation is terminal: once [`cancel`](CancelToken::cancel) has been
/// called the token stays cancelled.
#[derive(Clone)]
pub struct CancelToken {
  inner: Arc<TokenInner>,
}

impl fmt::Debug for CancelToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CancelToken")
      .field("cancelled", &self.is_cancelled())
      .field("suspended", &self.inner.registry.lock().len())
      .finish()
  }
}

impl Default for CancelToken {
  fn default() -> Self {
    Self::new()
  }
}

impl CancelToken {
  /// Creates a token that is not cancelled.
  pub fn new() -> Self {
    Self {
      inner: Arc::new(TokenInner {
        cancelled: AtomicBool::new(false),
        next_id: AtomicU64::new(0),
        registry: Mutex::new(HashMap::new()),
        sleep_lock: Mutex::new(()),
        sleep_cv: Condvar::new(),
      }),
    }
  }

  /// Returns `true` once [`cancel`](Self::cancel) has been called on this token or any clone.
  #[inline]
  pub fn is_cancelled(&self) -> bool {
    self.inner.cancelled.load(Ordering::SeqCst)
  }

  /// Cancels the token, waking every queue operation and sleep suspended on it.
  ///
  /// Calling this more than once has no further effect.
  pub fn cancel(&self) {
    if self.inner.cancelled.swap(true, Ordering::SeqCst) {
      return;
    }

    // Snapshot the registry so no queue lock is taken while holding it.
    let targets: Vec<Arc<dyn Unblock>> = self.inner.registry.lock().values().cloned().collect();
    tracing::trace!(suspended = targets.len(), "cancel token fired");
    for target in targets {
      target.unblock();
    }

    let _guard = self.inner.sleep_lock.lock();
    self.inner.sleep_cv.notify_all();
  }

  /// Sleeps for `duration`, returning early with `Err(Cancelled)` if the token
  /// is cancelled before or during the sleep.
  pub fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
    let deadline = Instant::now() + duration;
    let mut guard = self.inner.sleep_lock.lock();
    loop {
      if self.is_cancelled() {
        return Err(Cancelled);
      }
      if self
        .inner
        .sleep_cv
        .wait_until(&mut guard, deadline)
        .timed_out()
      {
        return Ok(());
      }
    }
  }

  /// Registers `target` to be unblocked on cancellation until the returned
  /// guard is dropped.
  pub(crate) fn register(&self, target: Arc<dyn Unblock>) -> Registration<'_> {
    let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
    self.inner.registry.lock().insert(id, target);
    Registration { token: self, id }
  }

  #[cfg(test)]
  pub(crate) fn registered(&self) -> usize {
    self.inner.registry.lock().len()
  }
}

/// Keeps a suspended operation's queue registered with its token.
pub(crate) struct Registration<'a> {
  token: &'a CancelToken,
  id: u64,
}

impl Drop for Registration<'_> {
  fn drop(&mut self) {
    self.token.inner.registry.lock().remove(&self.id);
  }
}
