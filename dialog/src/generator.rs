//! Message sources for the server loop.

use std::fmt;

/// Produces a new message every time the server is ready to send one.
pub trait MessageGenerator<T>: Send {
  /// Returns the next message.
  fn generate(&mut self) -> T;
}

impl<T, G: MessageGenerator<T> + ?Sized> MessageGenerator<T> for Box<G> {
  fn generate(&mut self) -> T {
    (**self).generate()
  }
}

/// Generates `"Message #1"`, `"Message #2"`, and so on.
#[derive(Debug, Default, Clone)]
pub struct StringGenerator {
  index: u64,
}

impl StringGenerator {
  pub fn new() -> Self {
    Self::default()
  }
}

impl MessageGenerator<String> for StringGenerator {
  fn generate(&mut self) -> String {
    self.index += 1;
    format!("Message #{}", self.index)
  }
}

/// A generator backed by a closure, see [`from_fn`].
pub struct FromFn<F>(F);

impl<F> fmt::Debug for FromFn<F> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FromFn").finish_non_exhaustive()
  }
}

impl<T, F> MessageGenerator<T> for FromFn<F>
where
  F: FnMut() -> T + Send,
{
  fn generate(&mut self) -> T {
    (self.0)()
  }
}

/// Wraps a closure as a [`MessageGenerator`].
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
  F: FnMut() -> T + Send,
{
  FromFn(f)
}
