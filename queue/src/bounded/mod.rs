//! The bounded blocking queue.
//!
//! [`BoundedBlockingQueue`] is a FIFO with a fixed capacity. Producers block in
//! [`offer`](BoundedBlockingQueue::offer) while it is full; consumers block in
//! [`poll`](BoundedBlockingQueue::poll) and [`peek`](BoundedBlockingQueue::peek)
//! while it is empty. Every blocking call can be aborted through a
//! [`CancelToken`](crate::CancelToken). The same queue also serves async tasks
//! through [`offer_async`](BoundedBlockingQueue::offer_async) and friends, and
//! sync and async callers can be mixed freely.
//!
//! The queue is a rendezvous point, not a container: it deliberately has no
//! iterator and cannot be traversed.
//!
//! ```compile_fail
//! use dialog_queue::BoundedBlockingQueue;
//!
//! let queue = BoundedBlockingQueue::<u32>::new(4).unwrap();
//! for item in &queue {
//!   println!("{item}");
//! }
//! ```

mod async_impl;
pub(crate) mod core;
mod sync_impl;

pub use async_impl::{OfferFuture, PeekFuture, PollFuture};

use std::fmt;
use std::sync::Arc;

use crate::error::InvalidCapacity;
use self::core::Shared;

/// A thread-safe FIFO queue holding at most `capacity` items.
///
/// Handles are cheap to clone; every clone refers to the same queue.
pub struct BoundedBlockingQueue<T> {
  pub(crate) shared: Arc<Shared<T>>,
}

impl<T> BoundedBlockingQueue<T> {
  /// Creates an empty queue that holds at most `capacity` items.
  ///
  /// Fails with [`InvalidCapacity`] if `capacity` is zero.
  pub fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
    if capacity == 0 {
      return Err(InvalidCapacity);
    }
    Ok(Self {
      shared: Arc::new(Shared::new(capacity)),
    })
  }

  /// Returns the number of items currently in the queue.
  ///
  /// Only takes the lock briefly and never waits for the queue to change.
  pub fn size(&self) -> usize {
    self.shared.state.lock().items.len()
  }

  /// Alias of [`size`](Self::size).
  #[inline]
  pub fn len(&self) -> usize {
    self.size()
  }

  /// Returns `true` if the queue holds no items.
  pub fn is_empty(&self) -> bool {
    self.size() == 0
  }

  /// Returns `true` if the queue is at capacity.
  pub fn is_full(&self) -> bool {
    self.size() == self.shared.capacity
  }

  /// Returns the fixed capacity chosen at construction.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.shared.capacity
  }
}

impl<T> Clone for BoundedBlockingQueue<T> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<T> fmt::Debug for BoundedBlockingQueue<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.shared.state.lock();
    f.debug_struct("BoundedBlockingQueue")
      .field("capacity", &self.shared.capacity)
      .field("len", &state.items.len())
      .field("async_producers_waiting", &state.not_full_wakers.len())
      .field("async_consumers_waiting", &state.not_empty_wakers.len())
      .finish()
  }
}
