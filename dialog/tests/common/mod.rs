#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use queued_dialog::sink::{self, MessageSink};

pub const SETTLE: Duration = Duration::from_millis(100);
pub const SHORT_TIMEOUT: Duration = Duration::from_millis(500);
pub const LONG_TIMEOUT: Duration = Duration::from_secs(5);
pub const MESSAGES_LOW: usize = 10;
pub const MESSAGES_MEDIUM: usize = 50;

/// A sink that records every delivered message, plus a handle to read them back.
pub fn collecting_sink() -> (impl MessageSink<String>, Arc<Mutex<Vec<String>>>) {
  let collected = Arc::new(Mutex::new(Vec::new()));
  let writer = Arc::clone(&collected);
  let sink = sink::from_fn(move |message: String| writer.lock().push(message));
  (sink, collected)
}

/// Polls `condition` until it holds, panicking after `timeout`.
pub fn wait_until(timeout: Duration, what: &str, mut condition: impl FnMut() -> bool) {
  let deadline = Instant::now() + timeout;
  while !condition() {
    assert!(Instant::now() < deadline, "timed out waiting for {}", what);
    std::thread::sleep(Duration::from_millis(5));
  }
}
