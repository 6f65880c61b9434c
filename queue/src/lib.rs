#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! A bounded blocking FIFO queue for producer/consumer coordination.
//!
//! [`BoundedBlockingQueue`] holds at most a fixed number of items. Producers
//! block while it is full, consumers block while it is empty, and the number
//! of items can always be inspected without waiting. Blocking calls are
//! cancelled cooperatively through a shared [`CancelToken`]; async tasks use
//! the `*_async` futures on the same queue instead.
//!
//! ```
//! use dialog_queue::{BoundedBlockingQueue, CancelToken};
//! use std::thread;
//!
//! let queue = BoundedBlockingQueue::new(2).unwrap();
//! let cancel = CancelToken::new();
//!
//! let producer = {
//!   let (queue, cancel) = (queue.clone(), cancel.clone());
//!   thread::spawn(move || {
//!     for i in 0..5 {
//!       queue.offer(i, &cancel).unwrap();
//!     }
//!   })
//! };
//!
//! let received: Vec<_> = (0..5).map(|_| queue.poll(&cancel).unwrap()).collect();
//! producer.join().unwrap();
//! assert_eq!(received, vec![0, 1, 2, 3, 4]);
//! ```

pub mod bounded;
pub mod cancel;
pub mod error;

// Internal utilities - not part of public API
mod internal;

pub use bounded::BoundedBlockingQueue;
pub use cancel::CancelToken;
pub use error::{Cancelled, InvalidCapacity, OfferError, TryOfferError, TryPollError};

// Helper function to check if a type is Send + Sync.
#[allow(dead_code)]
fn assert_send_sync<T: Send + Sync>() {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn handles_are_send_and_sync() {
    assert_send_sync::<BoundedBlockingQueue<String>>();
    assert_send_sync::<CancelToken>();
  }
}
