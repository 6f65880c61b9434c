use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use queued_dialog::cli::{build_config, Args, CliError, USAGE};
use queued_dialog::{logging, Dialog, Error, LogSink, StringGenerator};
use tracing::{error, info};

/// Prints `message` and the usage line to stdout.
fn usage_error(message: &dyn std::fmt::Display) -> ExitCode {
  println!("{}", message);
  println!("{}", USAGE);
  ExitCode::FAILURE
}

fn run(dialog: &mut Dialog<String>, run_for: Option<Duration>) -> queued_dialog::Result<()> {
  if let Some(run_for) = run_for {
    let token = dialog.cancel_token();
    thread::Builder::new()
      .name("dialog-timer".to_string())
      .spawn(move || {
        if token.sleep(run_for).is_ok() {
          info!(run_for = %humantime::format_duration(run_for), "Run time elapsed, stopping the dialog");
          token.cancel();
        }
      })
      .map_err(|source| Error::Spawn { role: "timer", source })?;
  }

  dialog.start()?;
  let stats = dialog.join()?;
  info!(
    produced = stats.produced,
    consumed = stats.consumed,
    remaining = stats.remaining,
    "Dialog closed"
  );
  Ok(())
}

fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
    Err(e) => return usage_error(&e.render()),
  };

  let config = match build_config(&args) {
    Ok(config) => config,
    Err(err) => return usage_error(&err),
  };

  let _logging_guard = match logging::init(&config.logging) {
    Ok(guard) => guard,
    Err(err) => {
      eprintln!("Failed to initialize logging: {}", err);
      return ExitCode::FAILURE;
    }
  };

  let mut dialog = match Dialog::new(&config, StringGenerator::new(), LogSink) {
    Ok(dialog) => dialog,
    Err(err) => return usage_error(&CliError::from(err)),
  };

  match run(&mut dialog, config.run_for) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!(error = %err, "Dialog failed");
      ExitCode::FAILURE
    }
  }
}
