//! The client side of the dialog: checks the queue at a fixed pace and takes
//! whatever message is waiting.

use std::fmt;
use std::time::Duration;

use dialog_queue::{BoundedBlockingQueue, CancelToken};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::sink::MessageSink;

/// The shortest client latency accepted, to keep the client from busy-waiting.
pub const MINIMAL_LATENCY: Duration = Duration::from_millis(10);

/// A consumer loop that wakes every `latency`, and when the queue is not
/// empty, polls one message and hands it to its sink.
pub struct Consumer<T> {
  queue: BoundedBlockingQueue<T>,
  latency: Duration,
  sink: Box<dyn MessageSink<T>>,
}

impl<T> fmt::Debug for Consumer<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Consumer")
      .field("latency", &self.latency)
      .field("queue_capacity", &self.queue.capacity())
      .finish_non_exhaustive()
  }
}

impl<T: Send + 'static> Consumer<T> {
  /// Fails with [`Error::InvalidLatency`] if `latency` is below [`MINIMAL_LATENCY`].
  pub fn new<S>(queue: BoundedBlockingQueue<T>, latency: Duration, sink: S) -> Result<Self>
  where
    S: MessageSink<T> + 'static,
  {
    if latency < MINIMAL_LATENCY {
      return Err(Error::latency_below("client", latency, MINIMAL_LATENCY));
    }
    Ok(Self {
      queue,
      latency,
      sink: Box::new(sink),
    })
  }

  /// Runs until `cancel` fires and returns how many messages were consumed.
  pub fn run(mut self, cancel: &CancelToken) -> u64 {
    info!(latency = %humantime::format_duration(self.latency), "Client was started");

    let mut consumed = 0;
    while !cancel.is_cancelled() {
      if cancel.sleep(self.latency).is_err() {
        break;
      }
      if self.queue.size() == 0 {
        continue;
      }
      match self.queue.poll(cancel) {
        Ok(message) => {
          consumed += 1;
          self.sink.deliver(message);
        }
        Err(_) => {
          debug!("Client poll cancelled");
          break;
        }
      }
    }

    info!(consumed, "Client was interrupted");
    consumed
  }
}
