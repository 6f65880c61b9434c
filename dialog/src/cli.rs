//! Command-line arguments of `queued-dialog` and how they combine with the
//! YAML configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::config::{find_config_file, queue_capacity, DialogConfig, Latencies};
use crate::error::Error;

pub const USAGE: &str = "Usage: client's latency, server's min latency, server's max latency";

#[derive(Parser, Debug, Clone)]
#[command(name = "queued-dialog")]
#[command(about = "A client and a server exchanging messages through a bounded blocking queue")]
#[command(version)]
pub struct Args {
  /// Client latency, server min latency and server max latency, in milliseconds
  #[arg(value_name = "MILLIS", allow_negative_numbers = true)]
  pub latencies: Vec<String>,

  /// YAML configuration file (defaults to ./queued_dialog.yaml when no latencies are given)
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Maximum number of messages waiting in the queue
  #[arg(long = "capacity", value_name = "N", allow_negative_numbers = true)]
  pub capacity: Option<String>,

  /// Stop the dialog after this long, e.g. "5s" or "1m 30s"
  #[arg(long = "run-for", value_name = "DURATION", value_parser = humantime::parse_duration)]
  pub run_for: Option<Duration>,

  /// Log filter such as "info" or "queued_dialog=debug"
  #[arg(short = 'l', long = "log-level", value_name = "FILTER")]
  pub log_level: Option<String>,
}

/// Why the arguments could not be turned into a configuration. The
/// `Display` output is the line printed before [`USAGE`].
#[derive(Debug, Error)]
pub enum CliError {
  #[error("Wrong number of arguments")]
  WrongCount,

  #[error("Wrong number format: {0}")]
  NumberFormat(String),

  #[error("Wrong argument: {0}")]
  Invalid(#[from] Error),
}

/// Resolves the final configuration.
///
/// Either all three latencies are given, or none. With none, the latencies
/// come from `--config` or from `queued_dialog.yaml` found in the working
/// directory. With all three, only an explicit `--config` is read and its
/// latency keys are optional. `--capacity`, `--run-for` and `--log-level`
/// override the file.
pub fn build_config(args: &Args) -> Result<DialogConfig, CliError> {
  let latencies = match args.latencies.as_slice() {
    [] => None,
    [client, min, max] => Some(Latencies::from_millis(
      parse_number(client)?,
      parse_number(min)?,
      parse_number(max)?,
    )?),
    _ => return Err(CliError::WrongCount),
  };

  let config_path = match (&args.config, latencies) {
    (Some(path), _) => Some(path.clone()),
    (None, None) => find_config_file(None),
    (None, Some(_)) => None,
  };
  let mut config = match (config_path, latencies) {
    (Some(path), latencies) => DialogConfig::from_file_with(&path, latencies)?,
    (None, Some(latencies)) => DialogConfig::from_latencies(latencies),
    (None, None) => return Err(CliError::WrongCount),
  };

  if let Some(capacity) = &args.capacity {
    config.queue_capacity = queue_capacity(parse_number(capacity)?)?;
  }
  if let Some(run_for) = args.run_for {
    config.run_for = Some(run_for);
  }
  if let Some(level) = &args.log_level {
    config.logging.level = level.clone();
  }
  Ok(config)
}

fn parse_number(value: &str) -> Result<i64, CliError> {
  value
    .trim()
    .parse()
    .map_err(|e| CliError::NumberFormat(format!("'{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serial_test::serial;
  use std::env;
  use std::fs;
  use std::path::Path;

  fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("queued-dialog").chain(args.iter().copied())).unwrap()
  }

  fn write_config(dir: &Path, name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, yaml).unwrap();
    path
  }

  /// Runs `f` with the working directory set to `dir`, restoring it afterwards.
  fn in_dir<R>(dir: &Path, f: impl FnOnce() -> R) -> R {
    let previous = env::current_dir().unwrap();
    env::set_current_dir(dir).unwrap();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env::set_current_dir(previous).unwrap();
    result.unwrap_or_else(|panic| std::panic::resume_unwind(panic))
  }

  #[test]
  fn three_latencies_build_a_default_config() {
    let config = build_config(&parse(&["50", "10", "100"])).unwrap();
    assert_eq!(config, DialogConfig::from_millis(50, 10, 100).unwrap());
  }

  #[test]
  fn wrong_latency_count_is_reported() {
    let cases: [&[&str]; 3] = [&["50"], &["50", "10"], &["50", "10", "100", "7"]];
    for args in cases {
      let err = build_config(&parse(args)).unwrap_err();
      assert!(matches!(err, CliError::WrongCount), "{:?} gave {:?}", args, err);
    }
  }

  #[test]
  fn non_numeric_latency_is_a_number_format_error() {
    let err = build_config(&parse(&["50", "abc", "100"])).unwrap_err();
    assert!(matches!(err, CliError::NumberFormat(_)), "got {:?}", err);
    assert!(err.to_string().starts_with("Wrong number format: 'abc'"));

    let err = build_config(&parse(&["50", "10", "100", "--capacity", "many"])).unwrap_err();
    assert!(matches!(err, CliError::NumberFormat(_)), "got {:?}", err);
  }

  #[test]
  fn negative_values_reach_validation() {
    let err = build_config(&parse(&["-5", "0", "10"])).unwrap_err();
    assert!(matches!(err, CliError::Invalid(Error::InvalidLatency(_))), "got {:?}", err);

    let err = build_config(&parse(&["50", "10", "100", "--capacity=-3"])).unwrap_err();
    assert!(matches!(err, CliError::Invalid(Error::InvalidCapacity(_))), "got {:?}", err);

    let err = build_config(&parse(&["50", "10", "100", "--capacity", "0"])).unwrap_err();
    assert!(matches!(err, CliError::Invalid(Error::InvalidCapacity(_))), "got {:?}", err);
  }

  #[test]
  fn flags_override_defaults() {
    let config = build_config(&parse(&[
      "50",
      "10",
      "100",
      "--capacity",
      "4",
      "--run-for",
      "2s",
      "--log-level",
      "queued_dialog=debug",
    ]))
    .unwrap();
    assert_eq!(config.queue_capacity, 4);
    assert_eq!(config.run_for, Some(Duration::from_secs(2)));
    assert_eq!(config.logging.level, "queued_dialog=debug");
  }

  #[test]
  fn flags_and_latencies_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
      dir.path(),
      "dialog.yaml",
      "client_latency: 1s\nserver_min_latency: 1s\nserver_max_latency: 2s\nqueue_capacity: 7\nrun_for: 1m\nlogging:\n  level: warn\n",
    );
    let config_arg = path.to_str().unwrap();

    let from_file = build_config(&parse(&["--config", config_arg])).unwrap();
    assert_eq!(from_file.client_latency, Duration::from_secs(1));
    assert_eq!(from_file.queue_capacity, 7);
    assert_eq!(from_file.logging.level, "warn");

    let overridden = build_config(&parse(&[
      "20",
      "0",
      "5",
      "--config",
      config_arg,
      "--capacity",
      "2",
      "--run-for",
      "3s",
      "--log-level",
      "debug",
    ]))
    .unwrap();
    assert_eq!(overridden.client_latency, Duration::from_millis(20));
    assert_eq!(overridden.server_min_latency, Duration::ZERO);
    assert_eq!(overridden.server_max_latency, Duration::from_millis(5));
    assert_eq!(overridden.queue_capacity, 2);
    assert_eq!(overridden.run_for, Some(Duration::from_secs(3)));
    assert_eq!(overridden.logging.level, "debug");
  }

  #[test]
  fn config_file_without_latencies_works_with_positionals() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "c.yaml", "queue_capacity: 3\n");
    let config_arg = path.to_str().unwrap();

    let config = build_config(&parse(&["50", "10", "100", "--config", config_arg])).unwrap();
    assert_eq!(config.queue_capacity, 3);
    assert_eq!(config.client_latency, Duration::from_millis(50));

    let err = build_config(&parse(&["--config", config_arg])).unwrap_err();
    assert!(
      matches!(err, CliError::Invalid(Error::InvalidConfigValue { .. })),
      "got {:?}",
      err
    );
  }

  #[test]
  #[serial]
  fn working_directory_config_is_only_read_without_latencies() {
    let dir = tempfile::tempdir().unwrap();
    write_config(
      dir.path(),
      "queued_dialog.yaml",
      "client_latency: 30ms\nserver_min_latency: 0ms\nserver_max_latency: 10ms\nqueue_capacity: 5\n",
    );

    let (with_positionals, without) = in_dir(dir.path(), || {
      (
        build_config(&parse(&["50", "10", "100"])),
        build_config(&parse(&[])),
      )
    });
    assert_eq!(with_positionals.unwrap(), DialogConfig::from_millis(50, 10, 100).unwrap());
    let without = without.unwrap();
    assert_eq!(without.client_latency, Duration::from_millis(30));
    assert_eq!(without.queue_capacity, 5);
  }

  #[test]
  #[serial]
  fn broken_working_directory_config_does_not_affect_positionals() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "queued_dialog.yaml", "client_latency: nope\n");

    let config = in_dir(dir.path(), || build_config(&parse(&["50", "10", "100"]))).unwrap();
    assert_eq!(config, DialogConfig::from_millis(50, 10, 100).unwrap());
  }

  #[test]
  #[serial]
  fn no_latencies_and_no_config_is_a_wrong_count() {
    let dir = tempfile::tempdir().unwrap();
    let result = in_dir(dir.path(), || build_config(&parse(&[])));
    assert!(matches!(result, Err(CliError::WrongCount)), "got {:?}", result);
  }
}
