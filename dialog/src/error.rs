use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The main error type for the `queued_dialog` library.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid queue capacity: {0}")]
  InvalidCapacity(String),

  #[error("Invalid latency: {0}")]
  InvalidLatency(String),

  #[error("Failed to read configuration file {path:?}: {source}")]
  ConfigRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },

  #[error("Invalid log filter: {0}")]
  LogFilter(#[from] tracing_subscriber::filter::ParseError),

  #[error("Failed to set global tracing subscriber: {0}")]
  LoggingInit(String),

  #[error("Failed to spawn {role} thread: {source}")]
  Spawn {
    role: &'static str,
    #[source]
    source: std::io::Error,
  },

  #[error("Dialog was already started")]
  AlreadyStarted,

  #[error("The {0} thread panicked")]
  Panicked(&'static str),
}

impl From<dialog_queue::InvalidCapacity> for Error {
  fn from(err: dialog_queue::InvalidCapacity) -> Self {
    Error::InvalidCapacity(err.to_string())
  }
}

impl Error {
  pub(crate) fn latency_below(role: &str, latency: Duration, minimum: Duration) -> Self {
    Error::InvalidLatency(format!(
      "{} latency {} is below the minimum of {}",
      role,
      humantime::format_duration(latency),
      humantime::format_duration(minimum)
    ))
  }
}

/// A specialized `Result` type for `queued_dialog` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
