//! Blocking and non-blocking operations for synchronous callers.

use parking_lot::{Condvar, MutexGuard};
use tracing::trace;

use super::core::QueueState;
use super::BoundedBlockingQueue;
use crate::cancel::{CancelToken, Registration};
use crate::error::{Cancelled, OfferError, TryOfferError, TryPollError};

impl<T: Send + 'static> BoundedBlockingQueue<T> {
  /// Inserts `item` at the tail, blocking the current thread while the queue is full.
  ///
  /// If `cancel` fires while the thread is waiting for room, nothing is
  /// inserted and the item is handed back in [`OfferError::Cancelled`].
  /// A queue with room accepts the item even if the token is already cancelled.
  pub fn offer(&self, item: T, cancel: &CancelToken) -> Result<(), OfferError<T>> {
    let mut state = self.shared.state.lock();
    let mut registration = None;
    while self.shared.is_full_locked(&state) {
      if self
        .suspend(&mut state, &self.shared.not_full, cancel, &mut registration)
        .is_err()
      {
        trace!("offer cancelled while queue full");
        return Err(OfferError::Cancelled(item));
      }
    }
    self.shared.push_locked(&mut state, item);
    Ok(())
  }

  /// Removes and returns the head, blocking the current thread while the queue is empty.
  ///
  /// Returns `Err(Cancelled)` if `cancel` fires while waiting; the queue is left unchanged.
  pub fn poll(&self, cancel: &CancelToken) -> Result<T, Cancelled> {
    let mut state = self.shared.state.lock();
    let mut registration = None;
    loop {
      if let Some(item) = self.shared.pop_locked(&mut state) {
        return Ok(item);
      }
      self.suspend(&mut state, &self.shared.not_empty, cancel, &mut registration)?;
    }
  }

  /// Returns a clone of the head without removing it, blocking while the queue is empty.
  ///
  /// Returns `Err(Cancelled)` if `cancel` fires while waiting.
  pub fn peek(&self, cancel: &CancelToken) -> Result<T, Cancelled>
  where
    T: Clone,
  {
    let mut state = self.shared.state.lock();
    let mut registration = None;
    loop {
      if let Some(item) = state.items.front() {
        return Ok(item.clone());
      }
      self.suspend(&mut state, &self.shared.not_empty, cancel, &mut registration)?;
    }
  }

  /// Parks the caller on `condvar` once, releasing the lock while asleep.
  ///
  /// The queue is registered with the token before the flag is checked, so a
  /// concurrent `cancel()` either is seen here or notifies the condvar after
  /// this thread has started waiting.
  fn suspend<'t>(
    &self,
    state: &mut MutexGuard<'_, QueueState<T>>,
    condvar: &Condvar,
    cancel: &'t CancelToken,
    registration: &mut Option<Registration<'t>>,
  ) -> Result<(), Cancelled> {
    if registration.is_none() {
      *registration = Some(cancel.register(self.shared.clone()));
    }
    if cancel.is_cancelled() {
      return Err(Cancelled);
    }
    trace!(
      len = state.items.len(),
      capacity = self.shared.capacity,
      "suspending on bounded queue"
    );
    condvar.wait(state);
    Ok(())
  }
}

impl<T> BoundedBlockingQueue<T> {
  /// Inserts `item` if there is room, without blocking.
  pub fn try_offer(&self, item: T) -> Result<(), TryOfferError<T>> {
    let mut state = self.shared.state.lock();
    if self.shared.is_full_locked(&state) {
      return Err(TryOfferError::Full(item));
    }
    self.shared.push_locked(&mut state, item);
    Ok(())
  }

  /// Removes and returns the head if there is one, without blocking.
  pub fn try_poll(&self) -> Result<T, TryPollError> {
    let mut state = self.shared.state.lock();
    self.shared.pop_locked(&mut state).ok_or(TryPollError::Empty)
  }

  /// Returns a clone of the head if there is one, without blocking.
  pub fn try_peek(&self) -> Result<T, TryPollError>
  where
    T: Clone,
  {
    self
      .shared
      .state
      .lock()
      .items
      .front()
      .cloned()
      .ok_or(TryPollError::Empty)
  }
}
