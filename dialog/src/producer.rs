//! The server side of the dialog: generates messages at a jittered pace and
//! pushes them into the queue.

use std::fmt;
use std::time::Duration;

use dialog_queue::{BoundedBlockingQueue, CancelToken, OfferError};
use rand::Rng;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::generator::MessageGenerator;

/// A producer loop that sleeps a random interval in `[min_latency, max_latency]`
/// before offering each generated message.
pub struct Producer<T, G> {
  queue: BoundedBlockingQueue<T>,
  min_latency: Duration,
  max_latency: Duration,
  generator: G,
}

impl<T, G> fmt::Debug for Producer<T, G> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Producer")
      .field("min_latency", &self.min_latency)
      .field("max_latency", &self.max_latency)
      .field("queue_capacity", &self.queue.capacity())
      .finish_non_exhaustive()
  }
}

impl<T, G> Producer<T, G>
where
  T: Send + fmt::Debug + 'static,
  G: MessageGenerator<T>,
{
  /// Fails with [`Error::InvalidLatency`] if `min_latency` exceeds `max_latency`.
  pub fn new(
    queue: BoundedBlockingQueue<T>,
    min_latency: Duration,
    max_latency: Duration,
    generator: G,
  ) -> Result<Self> {
    if min_latency > max_latency {
      return Err(Error::InvalidLatency(format!(
        "server min latency {} is greater than max latency {}",
        humantime::format_duration(min_latency),
        humantime::format_duration(max_latency)
      )));
    }
    Ok(Self {
      queue,
      min_latency,
      max_latency,
      generator,
    })
  }

  /// Runs until `cancel` fires and returns how many messages were inserted.
  ///
  /// A message generated while the queue is full and then abandoned on
  /// cancellation is dropped, not counted.
  pub fn run(mut self, cancel: &CancelToken) -> u64 {
    info!(
      min_latency = %humantime::format_duration(self.min_latency),
      max_latency = %humantime::format_duration(self.max_latency),
      "Server was started"
    );

    let mut produced = 0;
    while !cancel.is_cancelled() {
      if cancel.sleep(self.next_delay()).is_err() {
        break;
      }

      let message = self.generator.generate();
      debug!(?message, queue_size = self.queue.size(), "Server sends message");
      match self.queue.offer(message, cancel) {
        Ok(()) => produced += 1,
        Err(OfferError::Cancelled(message)) => {
          debug!(?message, "Server dropped undelivered message");
          break;
        }
      }
    }

    info!(produced, "Server was interrupted");
    produced
  }

  fn next_delay(&self) -> Duration {
    rand::rng().random_range(self.min_latency..=self.max_latency)
  }
}
