// src/config/processed.rs
use crate::config::raw::{DialogConfigRaw, FileLogConfigRaw, LoggingConfigRaw};
use crate::error::{Error, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing_appender::rolling::Rotation;

/// Capacity used when the configuration does not name one.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

const DEFAULT_CONFIG_BASE_NAME: &str = "queued_dialog";
const DEFAULT_CONFIG_EXTENSION: &str = "yaml";

// --- Processed Top Level Config ---

/// Validated settings for a [`Dialog`](crate::Dialog).
///
/// Cross-field rules (client latency against
/// [`MINIMAL_LATENCY`](crate::MINIMAL_LATENCY), server min against max) are
/// enforced when the dialog's loops are constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
  pub client_latency: Duration,
  pub server_min_latency: Duration,
  pub server_max_latency: Duration,
  pub queue_capacity: usize,
  pub run_for: Option<Duration>,
  pub logging: LoggingConfig,
}

// --- Processed Logging Config ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
  pub level: String,
  pub format: LogFormat,
  pub ansi: bool,
  pub file: Option<FileLogConfig>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      format: LogFormat::Full,
      ansi: true,
      file: None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Full,
  Compact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogConfig {
  pub directory: PathBuf,
  pub file_name_prefix: String,
  pub rotation: Rotation,
}

/// The three dialog latencies, given together outside the YAML file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latencies {
  pub client: Duration,
  pub server_min: Duration,
  pub server_max: Duration,
}

impl Latencies {
  /// Converts the three command-line latencies, in milliseconds.
  ///
  /// Negative values are rejected as [`Error::InvalidLatency`].
  pub fn from_millis(client: i64, server_min: i64, server_max: i64) -> Result<Self> {
    Ok(Self {
      client: latency_from_millis("client", client)?,
      server_min: latency_from_millis("server min", server_min)?,
      server_max: latency_from_millis("server max", server_max)?,
    })
  }
}

// --- Conversion and Validation Logic ---

impl DialogConfig {
  /// Builds a configuration from the three command-line latencies, in milliseconds.
  ///
  /// Negative values are rejected as [`Error::InvalidLatency`]; everything else
  /// takes its default.
  pub fn from_millis(client: i64, server_min: i64, server_max: i64) -> Result<Self> {
    Ok(Self::from_latencies(Latencies::from_millis(client, server_min, server_max)?))
  }

  /// Builds a configuration with the given latencies and every other setting at its default.
  pub fn from_latencies(latencies: Latencies) -> Self {
    Self {
      client_latency: latencies.client,
      server_min_latency: latencies.server_min,
      server_max_latency: latencies.server_max,
      queue_capacity: DEFAULT_QUEUE_CAPACITY,
      run_for: None,
      logging: LoggingConfig::default(),
    }
  }

  /// Parses and validates a YAML document. All three latencies are required.
  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    Self::from_yaml_str_with(yaml, None)
  }

  /// Parses and validates a YAML document, taking the latencies from
  /// `latencies` when given. The document's own latency keys are then
  /// optional and ignored.
  pub fn from_yaml_str_with(yaml: &str, latencies: Option<Latencies>) -> Result<Self> {
    let raw: DialogConfigRaw =
      serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))?;
    process_raw_config(raw, latencies)
  }

  /// Reads, parses and validates a YAML configuration file.
  pub fn from_file(path: &Path) -> Result<Self> {
    Self::from_file_with(path, None)
  }

  /// Like [`from_file`](Self::from_file), with latencies that take precedence over the file's.
  pub fn from_file_with(path: &Path, latencies: Option<Latencies>) -> Result<Self> {
    let yaml = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_yaml_str_with(&yaml, latencies)
  }
}

/// Converts a signed millisecond count into a latency, rejecting negative values.
pub fn latency_from_millis(role: &str, millis: i64) -> Result<Duration> {
  u64::try_from(millis)
    .map(Duration::from_millis)
    .map_err(|_| Error::InvalidLatency(format!("{} latency must be non negative, got {}ms", role, millis)))
}

/// Converts a signed capacity into a queue capacity, rejecting zero and negative values.
pub fn queue_capacity(value: i64) -> Result<usize> {
  match usize::try_from(value) {
    Ok(capacity) if capacity > 0 => Ok(capacity),
    _ => Err(Error::InvalidCapacity(format!(
      "capacity must be greater than zero, got {}",
      value
    ))),
  }
}

/// Looks in the working directory for `queued_dialog.<env>.yaml`, then
/// `queued_dialog.yaml`, where `<env>` comes from the argument or `APP_ENV`.
pub fn find_config_file(environment_suffix: Option<&str>) -> Option<PathBuf> {
  let env_name = environment_suffix
    .map(|s| s.to_string())
    .or_else(|| env::var("APP_ENV").ok());

  let mut files_to_check: Vec<String> = Vec::new();
  if let Some(env_str) = env_name.filter(|s| !s.is_empty()) {
    files_to_check.push(format!(
      "{}.{}.{}",
      DEFAULT_CONFIG_BASE_NAME, env_str, DEFAULT_CONFIG_EXTENSION
    ));
  }
  files_to_check.push(format!("{}.{}", DEFAULT_CONFIG_BASE_NAME, DEFAULT_CONFIG_EXTENSION));

  files_to_check
    .into_iter()
    .map(PathBuf::from)
    .find(|path| path.is_file())
}

/// Processes the raw, deserialized configuration into a validated representation.
///
/// `latencies`, when given, replace the three latency keys of the document.
pub fn process_raw_config(raw: DialogConfigRaw, latencies: Option<Latencies>) -> Result<DialogConfig> {
  let latencies = match latencies {
    Some(latencies) => latencies,
    None => Latencies {
      client: required_duration("client_latency", raw.client_latency.as_deref())?,
      server_min: required_duration("server_min_latency", raw.server_min_latency.as_deref())?,
      server_max: required_duration("server_max_latency", raw.server_max_latency.as_deref())?,
    },
  };

  Ok(DialogConfig {
    client_latency: latencies.client,
    server_min_latency: latencies.server_min,
    server_max_latency: latencies.server_max,
    queue_capacity: queue_capacity(raw.queue_capacity)?,
    run_for: raw
      .run_for
      .as_deref()
      .map(|value| parse_duration("run_for", value))
      .transpose()?,
    logging: process_logging_config(raw.logging)?,
  })
}

fn required_duration(field: &str, value: Option<&str>) -> Result<Duration> {
  match value {
    Some(value) => parse_duration(field, value),
    None => Err(Error::InvalidConfigValue {
      field: field.to_string(),
      message: "Missing; set it in the file or pass all three latencies as arguments.".to_string(),
    }),
  }
}

fn process_logging_config(raw: LoggingConfigRaw) -> Result<LoggingConfig> {
  let format = match raw.format.to_lowercase().as_str() {
    "full" => LogFormat::Full,
    "compact" => LogFormat::Compact,
    other => {
      return Err(Error::InvalidConfigValue {
        field: "logging.format".to_string(),
        message: format!("Unknown format '{}'. Expected 'full' or 'compact'.", other),
      })
    }
  };

  Ok(LoggingConfig {
    level: raw.level,
    format,
    ansi: raw.ansi,
    file: raw.file.map(process_file_config).transpose()?,
  })
}

fn process_file_config(raw: FileLogConfigRaw) -> Result<FileLogConfig> {
  if raw.directory.is_empty() {
    return Err(Error::InvalidConfigValue {
      field: "logging.file.directory".to_string(),
      message: "Log directory cannot be empty.".to_string(),
    });
  }

  let rotation = match raw.rotation.to_lowercase().as_str() {
    "minutely" => Rotation::MINUTELY,
    "hourly" => Rotation::HOURLY,
    "daily" => Rotation::DAILY,
    "never" => Rotation::NEVER,
    other => {
      return Err(Error::InvalidConfigValue {
        field: "logging.file.rotation".to_string(),
        message: format!(
          "Unknown rotation '{}'. Expected 'minutely', 'hourly', 'daily', or 'never'.",
          other
        ),
      })
    }
  };

  Ok(FileLogConfig {
    directory: PathBuf::from(raw.directory),
    file_name_prefix: raw.file_name_prefix,
    rotation,
  })
}

fn parse_duration(field: &str, value: &str) -> Result<Duration> {
  humantime::parse_duration(value.trim()).map_err(|e| Error::InvalidConfigValue {
    field: field.to_string(),
    message: format!("'{}' is not a duration: {}", value, e),
  })
}
