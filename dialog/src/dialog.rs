//! Wires a client and a server around one bounded queue and runs them on
//! their own threads.

use std::fmt;
use std::mem;
use std::thread::{self, JoinHandle};

use dialog_queue::{BoundedBlockingQueue, CancelToken};
use tracing::{info, warn};

use crate::config::DialogConfig;
use crate::consumer::Consumer;
use crate::error::{Error, Result};
use crate::generator::MessageGenerator;
use crate::producer::Producer;
use crate::sink::MessageSink;

/// Message counts reported by [`Dialog::join`].
///
/// Every produced message was either consumed or is still in the queue:
/// `produced == consumed + remaining`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DialogStats {
  pub produced: u64,
  pub consumed: u64,
  pub remaining: usize,
}

enum DialogState<T> {
  Ready {
    client: Consumer<T>,
    server: Producer<T, Box<dyn MessageGenerator<T>>>,
  },
  Running {
    client: JoinHandle<u64>,
    server: JoinHandle<u64>,
  },
  Finished,
}

/// A client thread and a server thread talking through a bounded queue.
///
/// Dropping a running dialog cancels both loops and waits for them to exit.
pub struct Dialog<T> {
  queue: BoundedBlockingQueue<T>,
  cancel: CancelToken,
  state: DialogState<T>,
}

impl<T> fmt::Debug for Dialog<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = match self.state {
      DialogState::Ready { .. } => "ready",
      DialogState::Running { .. } => "running",
      DialogState::Finished => "finished",
    };
    f.debug_struct("Dialog")
      .field("state", &state)
      .field("queue", &self.queue)
      .field("cancel", &self.cancel)
      .finish()
  }
}

impl<T: Send + fmt::Debug + 'static> Dialog<T> {
  /// Builds the queue, the client and the server, in that order.
  ///
  /// Fails if the capacity is zero, the client latency is below
  /// [`MINIMAL_LATENCY`](crate::MINIMAL_LATENCY), or the server's min latency
  /// exceeds its max latency.
  pub fn new<G, S>(config: &DialogConfig, generator: G, sink: S) -> Result<Self>
  where
    G: MessageGenerator<T> + 'static,
    S: MessageSink<T> + 'static,
  {
    let queue = BoundedBlockingQueue::new(config.queue_capacity)?;
    let client = Consumer::new(queue.clone(), config.client_latency, sink)?;
    let generator: Box<dyn MessageGenerator<T>> = Box::new(generator);
    let server = Producer::new(
      queue.clone(),
      config.server_min_latency,
      config.server_max_latency,
      generator,
    )?;

    Ok(Self {
      queue,
      cancel: CancelToken::new(),
      state: DialogState::Ready { client, server },
    })
  }

  /// Spawns the client and server threads.
  pub fn start(&mut self) -> Result<()> {
    let (client, server) = match mem::replace(&mut self.state, DialogState::Finished) {
      DialogState::Ready { client, server } => (client, server),
      other => {
        self.state = other;
        return Err(Error::AlreadyStarted);
      }
    };

    let client = spawn_loop("client", self.cancel.clone(), move |cancel| client.run(cancel))?;
    let server = match spawn_loop("server", self.cancel.clone(), move |cancel| server.run(cancel)) {
      Ok(handle) => handle,
      Err(e) => {
        self.cancel.cancel();
        if client.join().is_err() {
          warn!("Client thread panicked while aborting start");
        }
        return Err(e);
      }
    };

    info!(capacity = self.queue.capacity(), "Dialog started");
    self.state = DialogState::Running { client, server };
    Ok(())
  }
}

impl<T> Dialog<T> {
  /// Signals both loops to stop. They exit at their next cancellation point.
  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  /// Returns a handle that can stop this dialog from another thread.
  pub fn cancel_token(&self) -> CancelToken {
    self.cancel.clone()
  }

  /// The queue shared by the client and the server.
  pub fn queue(&self) -> &BoundedBlockingQueue<T> {
    &self.queue
  }

  /// Returns `true` between a successful [`start`](Dialog::start) and [`join`](Dialog::join).
  pub fn is_running(&self) -> bool {
    matches!(self.state, DialogState::Running { .. })
  }

  /// Blocks until both loops have exited and reports what they did.
  ///
  /// Cancellation is the normal way for the loops to end and is not an error.
  /// Joining a dialog that was never started (or was already joined) returns
  /// zero counts immediately.
  pub fn join(&mut self) -> Result<DialogStats> {
    let (client, server) = match mem::replace(&mut self.state, DialogState::Finished) {
      DialogState::Running { client, server } => (client, server),
      other => {
        self.state = other;
        return Ok(DialogStats {
          remaining: self.queue.size(),
          ..DialogStats::default()
        });
      }
    };

    let consumed = client.join().map_err(|_| Error::Panicked("client"));
    let produced = server.join().map_err(|_| Error::Panicked("server"));
    let stats = DialogStats {
      produced: produced?,
      consumed: consumed?,
      remaining: self.queue.size(),
    };
    info!(
      produced = stats.produced,
      consumed = stats.consumed,
      remaining = stats.remaining,
      "Dialog finished"
    );
    Ok(stats)
  }
}

impl<T> Drop for Dialog<T> {
  fn drop(&mut self) {
    if self.is_running() {
      self.cancel();
      if let Err(e) = self.join() {
        warn!(error = %e, "Dialog did not shut down cleanly");
      }
    }
  }
}

/// Cancels the dialog if the loop holding it unwinds, so the other loop
/// cannot wait forever on a partner that is gone.
struct CancelOnPanic(CancelToken);

impl Drop for CancelOnPanic {
  fn drop(&mut self) {
    if thread::panicking() {
      self.0.cancel();
    }
  }
}

fn spawn_loop<F>(role: &'static str, cancel: CancelToken, body: F) -> Result<JoinHandle<u64>>
where
  F: FnOnce(&CancelToken) -> u64 + Send + 'static,
{
  thread::Builder::new()
    .name(format!("dialog-{}", role))
    .spawn(move || {
      let _guard = CancelOnPanic(cancel.clone());
      body(&cancel)
    })
    .map_err(|source| Error::Spawn { role, source })
}
