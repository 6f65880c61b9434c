//! Futures for async producers and consumers.
//!
//! Each future re-checks the queue under the lock every time it is polled and,
//! if it cannot make progress, leaves its waker on the matching side of the
//! queue. Dropping a pending future cancels the operation: an `OfferFuture`
//! drops its item without inserting it, a `PollFuture` removes nothing, and the
//! future's waker entry is removed with it.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::BoundedBlockingQueue;
use crate::internal::waker_set::WakerSet;

impl<T> BoundedBlockingQueue<T> {
  /// Inserts `item` at the tail, waiting asynchronously while the queue is full.
  pub fn offer_async(&self, item: T) -> OfferFuture<'_, T> {
    OfferFuture {
      queue: self,
      item: Some(item),
      key: None,
    }
  }

  /// Removes and returns the head, waiting asynchronously while the queue is empty.
  pub fn poll_async(&self) -> PollFuture<'_, T> {
    PollFuture {
      queue: self,
      key: None,
    }
  }

  /// Returns a clone of the head without removing it, waiting asynchronously
  /// while the queue is empty.
  pub fn peek_async(&self) -> PeekFuture<'_, T>
  where
    T: Clone,
  {
    PeekFuture {
      queue: self,
      key: None,
    }
  }
}

fn deregister(wakers: &mut WakerSet, key: &mut Option<u64>) {
  if let Some(key) = key.take() {
    wakers.remove(key);
  }
}

/// Future returned by [`BoundedBlockingQueue::offer_async`].
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct OfferFuture<'a, T> {
  queue: &'a BoundedBlockingQueue<T>,
  item: Option<T>,
  key: Option<u64>,
}

// The item is only ever moved out by value, never pinned.
impl<T> Unpin for OfferFuture<'_, T> {}

impl<T> Future for OfferFuture<'_, T> {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    let shared = &this.queue.shared;
    let mut state = shared.state.lock();

    if shared.is_full_locked(&state) {
      state.not_full_wakers.register(&mut this.key, cx.waker());
      return Poll::Pending;
    }

    deregister(&mut state.not_full_wakers, &mut this.key);
    let item = this
      .item
      .take()
      .expect("OfferFuture polled after completion");
    shared.push_locked(&mut state, item);
    Poll::Ready(())
  }
}

impl<T> Drop for OfferFuture<'_, T> {
  fn drop(&mut self) {
    if self.key.is_some() {
      let mut state = self.queue.shared.state.lock();
      deregister(&mut state.not_full_wakers, &mut self.key);
    }
  }
}

impl<T> fmt::Debug for OfferFuture<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OfferFuture")
      .field("completed", &self.item.is_none())
      .field("registered", &self.key.is_some())
      .finish()
  }
}

/// Future returned by [`BoundedBlockingQueue::poll_async`].
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct PollFuture<'a, T> {
  queue: &'a BoundedBlockingQueue<T>,
  key: Option<u64>,
}

impl<T> Future for PollFuture<'_, T> {
  type Output = T;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    let shared = &this.queue.shared;
    let mut state = shared.state.lock();

    match shared.pop_locked(&mut state) {
      Some(item) => {
        deregister(&mut state.not_empty_wakers, &mut this.key);
        Poll::Ready(item)
      }
      None => {
        state.not_empty_wakers.register(&mut this.key, cx.waker());
        Poll::Pending
      }
    }
  }
}

impl<T> Drop for PollFuture<'_, T> {
  fn drop(&mut self) {
    if self.key.is_some() {
      let mut state = self.queue.shared.state.lock();
      deregister(&mut state.not_empty_wakers, &mut self.key);
    }
  }
}

impl<T> fmt::Debug for PollFuture<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PollFuture")
      .field("registered", &self.key.is_some())
      .finish_non_exhaustive()
  }
}

/// Future returned by [`BoundedBlockingQueue::peek_async`].
#[must_use = "futures do nothing unless you .await or poll them"]
pub struct PeekFuture<'a, T> {
  queue: &'a BoundedBlockingQueue<T>,
  key: Option<u64>,
}

impl<T: Clone> Future for PeekFuture<'_, T> {
  type Output = T;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    let mut state = this.queue.shared.state.lock();

    match state.items.front().cloned() {
      Some(item) => {
        deregister(&mut state.not_empty_wakers, &mut this.key);
        Poll::Ready(item)
      }
      None => {
        state.not_empty_wakers.register(&mut this.key, cx.waker());
        Poll::Pending
      }
    }
  }
}

impl<T> Drop for PeekFuture<'_, T> {
  fn drop(&mut self) {
    if self.key.is_some() {
      let mut state = self.queue.shared.state.lock();
      deregister(&mut state.not_empty_wakers, &mut self.key);
    }
  }
}

impl<T> fmt::Debug for PeekFuture<'_, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PeekFuture")
      .field("registered", &self.key.is_some())
      .finish_non_exhaustive()
  }
}
