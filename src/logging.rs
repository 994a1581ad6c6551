//! File logging setup
//!
//! The terminal is owned by the menu, so log output goes to a file under
//! `general.log_dir`, or nowhere if that directory is unusable.

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::RecoveryConfig;

pub const LOG_FILE: &str = "raven-recovery.log";

pub fn open_log_file(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)
}

/// Install the global subscriber; keep the guard alive until exit.
pub fn init(config: &RecoveryConfig) -> WorkerGuard {
    let dir = &config.general.log_dir;
    let (sink, open_error): (Box<dyn Write + Send>, _) = match open_log_file(dir) {
        Ok(appender) => (Box::new(appender), None),
        Err(e) => (Box::new(std::io::sink()), Some(e)),
    };
    let (writer, guard) = tracing_appender::non_blocking(sink);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    if let Some(e) = open_error {
        tracing::warn!("Cannot open log file in {}: {}", dir.display(), e);
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[test]
    fn log_file_lands_in_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut appender = open_log_file(dir.path())?;
        appender.write_all(b"hello\n")?;
        appender.flush()?;
        assert_eq!(fs::read_to_string(dir.path().join(LOG_FILE))?, "hello\n");
        Ok(())
    }

    #[test]
    fn unusable_directory_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "")?;
        assert!(open_log_file(&file.join("logs")).is_err());
        Ok(())
    }
}
