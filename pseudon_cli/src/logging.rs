//! Logging initialization for the CLI. Events are written to stderr by
//! default, or to a log file when one is configured, in which case the
//! returned guard must be held for the lifetime of the process so that
//! buffered events are flushed on exit or fatal abort.

use std::path::Path;

use tracing_subscriber::{
  EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Keeps the log sink alive. Dropping the guard flushes and closes any
/// configured log file.
///
pub struct LogGuard {
  _worker_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initializes the global tracing subscriber, logging at info level unless
/// overridden with the `RUST_LOG` environment variable.
///
pub fn init(log_file: Option<&Path>) -> std::io::Result<LogGuard> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("info"));

  match log_file {
    Some(path) => {
      let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

      let (writer, worker_guard) = tracing_appender::non_blocking(file);

      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

      Ok(LogGuard {
        _worker_guard: Some(worker_guard),
      })
    }

    None => {
      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

      Ok(LogGuard {
        _worker_guard: None,
      })
    }
  }
}
