use std::env;
use std::fs;
use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use screenshooter_core::Verbosity;

/// Initialize the logging system for the application.
///
/// - Reads the filter from the `RUST_LOG` environment variable, falling back to
///   `debug` when verbose and `warn` otherwise
/// - Logs to stderr, so that report lines on stdout stay clean
/// - Optionally logs to `log_file` as well, without ANSI colors
///
/// The returned guard flushes the file writer when dropped and must be held
/// until the program exits.
pub fn init_logging(
  verbosity: Verbosity,
  log_file: Option<&Path>,
) -> anyhow::Result<Option<WorkerGuard>> {
  let default_level = if verbosity == Verbosity::Verbose {
    "debug"
  } else {
    "warn"
  };
  let filter = || {
    env::var("RUST_LOG")
      .map(EnvFilter::new)
      .unwrap_or_else(|_| EnvFilter::new(default_level))
  };

  let console = fmt::Layer::new()
    .with_writer(std::io::stderr)
    .with_target(false)
    .with_filter(filter());

  let (file, guard) = match log_file {
    Some(path) => {
      let file = fs::File::create(path)
        .with_context(|| format!("Failed to create log file {path:?}"))?;
      let (non_blocking, guard) = tracing_appender::non_blocking(file);
      let layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter());
      (Some(layer), Some(guard))
    }
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(console)
    .with(file)
    .try_init()
    .context("Failed to set global default subscriber")?;

  Ok(guard)
}
