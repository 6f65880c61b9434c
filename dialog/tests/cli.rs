use std::fs;
use std::process::{Command, Output};

use queued_dialog::cli::USAGE;

fn run_in(dir: &std::path::Path, args: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_queued-dialog"))
    .args(args)
    .current_dir(dir)
    .env_remove("RUST_LOG")
    .env_remove("APP_ENV")
    .output()
    .expect("failed to launch queued-dialog")
}

fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn malformed_number_is_reported_on_stdout() {
  let dir = tempfile::tempdir().unwrap();
  let output = run_in(dir.path(), &["50", "abc", "100"]);
  assert!(!output.status.success());
  let out = stdout(&output);
  assert!(out.contains("Wrong number format: 'abc'"), "stdout was: {}", out);
  assert!(out.contains(USAGE));
}

#[test]
fn wrong_count_and_invalid_values_are_reported_on_stdout() {
  let dir = tempfile::tempdir().unwrap();

  let output = run_in(dir.path(), &["50", "10"]);
  assert!(!output.status.success());
  assert!(stdout(&output).starts_with("Wrong number of arguments\n"));

  let output = run_in(dir.path(), &["5", "10", "100"]);
  assert!(!output.status.success());
  let out = stdout(&output);
  assert!(out.starts_with("Wrong argument: Invalid latency"), "stdout was: {}", out);
  assert!(out.contains(USAGE));

  let output = run_in(dir.path(), &["50", "10", "100", "--run-for", "soon"]);
  assert!(!output.status.success());
  assert!(stdout(&output).contains(USAGE));
}

#[test]
fn stray_config_file_does_not_break_positionals() {
  let dir = tempfile::tempdir().unwrap();
  fs::write(dir.path().join("queued_dialog.yaml"), "client_latency: nope\n").unwrap();

  let output = run_in(dir.path(), &["20", "0", "5", "--run-for", "200ms", "--log-level", "off"]);
  assert!(output.status.success(), "stdout was: {}", stdout(&output));
}

#[test]
fn help_keeps_clap_behaviour() {
  let dir = tempfile::tempdir().unwrap();
  let output = run_in(dir.path(), &["--help"]);
  assert!(output.status.success());
  assert!(stdout(&output).contains("--run-for"));
}
