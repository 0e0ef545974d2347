//! Logging Infrastructure
//!
//! One initializer for both binaries. `RUST_LOG` wins over the configured
//! level when set. With a log directory, output goes to a daily rolling
//! `<service>.log` file instead of stdout.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
fn level_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global subscriber for `service`
///
/// A log directory that cannot be created falls back to stdout with a
/// message on stderr. Calling twice keeps the first subscriber.
pub fn init_logger(service: &str, log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = match log_dir {
        Some(dir) => match std::fs::create_dir_all(Path::new(dir)) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, format!("{service}.log"));
                subscriber.with_ansi(false).with_writer(file_appender).try_init()
            }
            Err(e) => {
                eprintln!("Cannot create log dir {dir}: {e}, logging to stdout");
                subscriber.try_init()
            }
        },
        None => subscriber.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
