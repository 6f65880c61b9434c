// src/config/mod.rs
// This module handles configuration parsing and validation.

pub mod processed; // Validated configuration used by the dialog
pub mod raw; // Structs directly mapping to the YAML structure

pub use processed::{
  find_config_file, latency_from_millis, queue_capacity, DialogConfig, FileLogConfig, Latencies,
  LogFormat, LoggingConfig, DEFAULT_QUEUE_CAPACITY,
};
