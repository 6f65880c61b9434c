//! `queued_dialog` - a client and a server talking through a bounded queue.
//!
//! The server ([`Producer`]) generates messages at a random pace between two
//! latencies and offers them to a [`dialog_queue::BoundedBlockingQueue`]. The
//! client ([`Consumer`]) checks the queue at a fixed pace and takes one message
//! each time it finds the queue non-empty. [`Dialog`] wires the two together,
//! runs each on its own thread and stops both through one shared
//! [`CancelToken`].
//!
//! ```no_run
//! use queued_dialog::{Dialog, DialogConfig, LogSink, StringGenerator};
//!
//! let config = DialogConfig::from_millis(50, 10, 100)?;
//! let mut dialog = Dialog::new(&config, StringGenerator::new(), LogSink)?;
//! dialog.start()?;
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! dialog.cancel();
//! let stats = dialog.join()?;
//! assert_eq!(stats.produced, stats.consumed + stats.remaining as u64);
//! # Ok::<(), queued_dialog::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod consumer;
pub mod dialog;
pub mod error;
pub mod generator;
pub mod logging;
pub mod producer;
pub mod sink;

pub use config::DialogConfig;
pub use consumer::{Consumer, MINIMAL_LATENCY};
pub use dialog::{Dialog, DialogStats};
pub use error::{Error, Result};
pub use generator::{MessageGenerator, StringGenerator};
pub use logging::LoggingGuard;
pub use producer::Producer;
pub use sink::{LogSink, MessageSink};

pub use dialog_queue::{BoundedBlockingQueue, CancelToken};
