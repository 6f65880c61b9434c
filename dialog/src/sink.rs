//! Destinations for messages taken off the queue by the client loop.

use std::fmt;

use tracing::info;

/// Receives every message the client removes from the queue.
pub trait MessageSink<T>: Send {
  /// Handles one received message.
  fn deliver(&mut self, message: T);
}

impl<T, S: MessageSink<T> + ?Sized> MessageSink<T> for Box<S> {
  fn deliver(&mut self, message: T) {
    (**self).deliver(message)
  }
}

/// Reports each message as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl<T: fmt::Display> MessageSink<T> for LogSink {
  fn deliver(&mut self, message: T) {
    info!(%message, "Client receives message");
  }
}

/// A sink backed by a closure, see [`from_fn`].
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FromFn").finish_non_exhaustive()
  }
}

impl<T, F> MessageSink<T> for FromFn<F>
where
  F: FnMut(T) + Send,
{
  fn deliver(&mut self, message: T) {
    (self.0)(message)
  }
}

/// Wraps a closure as a [`MessageSink`].
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
  F: FnMut(T) + Send,
{
  FromFn(f)
}
