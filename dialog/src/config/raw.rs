use serde::Deserialize;

// --- Top Level Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DialogConfigRaw {
  // The three latencies may be left out when they are supplied separately,
  // see `DialogConfig::from_yaml_str_with`.
  /// Client polling interval, e.g. "50ms".
  #[serde(default)]
  pub client_latency: Option<String>,
  /// Lower bound of the server's jittered interval.
  #[serde(default)]
  pub server_min_latency: Option<String>,
  /// Upper bound of the server's jittered interval.
  #[serde(default)]
  pub server_max_latency: Option<String>,
  #[serde(default = "default_queue_capacity")]
  pub queue_capacity: i64,
  /// Stop the dialog after this long, e.g. "5s". Runs until killed when absent.
  #[serde(default)]
  pub run_for: Option<String>,
  #[serde(default)]
  pub logging: LoggingConfigRaw,
}

fn default_queue_capacity() -> i64 {
  super::processed::DEFAULT_QUEUE_CAPACITY as i64
}

// --- Logging Config ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfigRaw {
  /// An `EnvFilter` directive such as "info" or "queued_dialog=debug".
  #[serde(default = "default_level")]
  pub level: String,
  /// Expected values: "full" or "compact".
  #[serde(default = "default_format")]
  pub format: String,
  #[serde(default = "default_ansi")]
  pub ansi: bool,
  #[serde(default)]
  pub file: Option<FileLogConfigRaw>,
}

impl Default for LoggingConfigRaw {
  fn default() -> Self {
    Self {
      level: default_level(),
      format: default_format(),
      ansi: default_ansi(),
      file: None,
    }
  }
}

fn default_level() -> String {
  "info".to_string()
}

fn default_format() -> String {
  "full".to_string()
}

fn default_ansi() -> bool {
  true
}

// --- File Output ---
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileLogConfigRaw {
  pub directory: String,
  #[serde(default = "default_file_name_prefix")]
  pub file_name_prefix: String,
  /// Expected values: "minutely", "hourly", "daily", or "never".
  #[serde(default = "default_rotation")]
  pub rotation: String,
}

fn default_file_name_prefix() -> String {
  "queued_dialog.log".to_string()
}

fn default_rotation() -> String {
  "never".to_string()
}
