//! Minimal `log` backend writing to stdout.

use std::io::Write;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Prints `[ elapsed LEVEL target] message` lines to stdout.
pub struct StdoutLogger {
    level: LevelFilter,
    started: Instant,
}

impl StdoutLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            started: Instant::now(),
        }
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed = self.started.elapsed();
        let mut out = std::io::stdout().lock();
        let _ = writeln!(
            out,
            "[{:>5}.{:03} {:<5} {}] {}",
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Installs a [`StdoutLogger`] as the global logger.
///
/// Fails if another logger was installed first.
pub fn init_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(StdoutLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
