//! Installs the global `tracing` subscriber from a [`LoggingConfig`].

use std::fs;
use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Error, Result};

/// Keeps the background log writers alive. Buffered lines are flushed when
/// this is dropped, so hold it until the program exits.
#[must_use = "dropping the guard stops the background log writer"]
#[derive(Debug)]
pub struct LoggingGuard {
  _guards: Vec<WorkerGuard>,
}

/// Sets up the global subscriber.
///
/// `RUST_LOG` overrides the configured level when set, and fails
/// initialisation with [`Error::LogFilter`] if it cannot be parsed. When a log
/// file is configured, output goes there through a non-blocking writer and ANSI
/// colours are turned off; otherwise it goes to stdout.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
  let filter = env_filter(&config.level)?;
  let mut guards = Vec::new();

  let writer = match &config.file {
    Some(file) => {
      fs::create_dir_all(&file.directory).map_err(|e| {
        Error::LoggingInit(format!(
          "Failed to create log directory {:?}: {}",
          file.directory, e
        ))
      })?;
      let appender = RollingFileAppender::new(
        file.rotation.clone(),
        &file.directory,
        &file.file_name_prefix,
      );
      let (non_blocking, guard) = tracing_appender::non_blocking(appender);
      guards.push(guard);
      BoxMakeWriter::new(non_blocking)
    }
    None => BoxMakeWriter::new(io::stdout),
  };

  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_ansi(config.ansi && config.file.is_none())
    .with_thread_names(true)
    .with_writer(writer);

  let installed = match config.format {
    LogFormat::Full => builder.try_init(),
    LogFormat::Compact => builder.compact().try_init(),
  };
  installed.map_err(|e| Error::LoggingInit(e.to_string()))?;

  Ok(LoggingGuard { _guards: guards })
}

fn env_filter(level: &str) -> Result<EnvFilter> {
  filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok(), level)
}

/// Builds the filter from `RUST_LOG` when it is set to something, otherwise
/// from the configured level. A malformed `RUST_LOG` is an error, not a fallback.
fn filter_from(env_directives: Option<String>, level: &str) -> Result<EnvFilter> {
  match env_directives.filter(|directives| !directives.trim().is_empty()) {
    Some(directives) => Ok(EnvFilter::try_new(directives)?),
    None => Ok(EnvFilter::try_new(level)?),
  }
}
