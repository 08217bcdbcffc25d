//! Logging Infrastructure
//!
//! Structured logging with `tracing-subscriber`. `RUST_LOG` wins over the
//! configured level; JSON output and daily rolling files are optional.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Default filter when `RUST_LOG` is not set
pub fn default_directives(log_level: &str) -> String {
    format!("order_server={log_level},tower_http={log_level},sqlx=warn")
}

/// Initialize the logger with optional JSON format and file output.
///
/// Keep the returned guard alive for the life of the process when a log
/// directory is used; dropping it stops the background writer.
pub fn init_logger(
    log_level: &str,
    json: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(log_level)))
        .context("invalid log filter")?;

    let (writer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(Path::new(dir))
                .with_context(|| format!("cannot create log directory {dir}"))?;
            let file_appender = tracing_appender::rolling::daily(dir, "order-server");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(log_dir.is_none())
        .with_target(false);

    let installed = if json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("debug"),
            "order_server=debug,tower_http=debug,sqlx=warn"
        );
    }

    #[test]
    fn test_file_logger_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let dir_str = dir.to_str().unwrap();

        // A subscriber may already be installed by another test; the
        // directory is created before installation either way.
        let _ = init_logger("info", true, Some(dir_str));

        assert!(dir.exists());
    }
}
