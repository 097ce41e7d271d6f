//! Level-gated dispatch to a sink
//!
//! A [`Logger`] owns a level mask and exactly one sink, chosen when the logger
//! is built. Switching between console and file output means building a new
//! logger; records already handed to the old sink are unaffected.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use super::console::ConsoleSink;
use super::file_writer::RotatingFile;
use super::level::{Level, LevelMask};

/// Destination for formatted log records
pub trait LogSink: Send + Sync + fmt::Debug {
    /// Format and deliver one record. Must not fail or panic.
    fn emit(&self, level: Level, location: &'static Location<'static>, args: fmt::Arguments<'_>);
}

/// Leveled logging front end
#[derive(Debug, Clone)]
pub struct Logger {
    mask: LevelMask,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Logger over any sink
    pub fn new(mask: LevelMask, sink: Arc<dyn LogSink>) -> Self {
        Self { mask, sink }
    }

    /// Logger printing to the console
    pub fn console(mask: LevelMask, console: ConsoleSink) -> Self {
        Self::new(mask, Arc::new(console))
    }

    /// Logger appending to a rotating file
    pub fn file(mask: LevelMask, file: Arc<RotatingFile>) -> Self {
        Self::new(mask, file)
    }

    /// The active level mask
    pub fn mask(&self) -> LevelMask {
        self.mask
    }

    /// Whether records at `level` would be emitted
    pub fn enabled(&self, level: Level) -> bool {
        self.mask.enables(level)
    }

    /// Emit a record attributed to an explicit source location
    pub fn log_at(
        &self,
        level: Level,
        location: &'static Location<'static>,
        args: fmt::Arguments<'_>,
    ) {
        if !self.enabled(level) {
            return;
        }
        self.sink.emit(level, location, args);
    }

    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log_at(Level::Debug, Location::caller(), args);
    }

    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log_at(Level::Info, Location::caller(), args);
    }

    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log_at(Level::Warn, Location::caller(), args);
    }

    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log_at(Level::Error, Location::caller(), args);
    }

    /// Debug record attributed to `location` instead of the direct caller
    ///
    /// Useful for wrappers that want the line of *their* caller in the output.
    pub fn called_debug(&self, location: &'static Location<'static>, args: fmt::Arguments<'_>) {
        self.log_at(Level::Debug, location, args);
    }

    pub fn called_info(&self, location: &'static Location<'static>, args: fmt::Arguments<'_>) {
        self.log_at(Level::Info, location, args);
    }

    pub fn called_warn(&self, location: &'static Location<'static>, args: fmt::Arguments<'_>) {
        self.log_at(Level::Warn, location, args);
    }

    pub fn called_error(&self, location: &'static Location<'static>, args: fmt::Arguments<'_>) {
        self.log_at(Level::Error, location, args);
    }
}

/// Log at debug level: `log_debug!(logger, "x = {}", x)`
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format_args!($($arg)+))
    };
}

/// Log at info level: `log_info!(logger, "x = {}", x)`
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format_args!($($arg)+))
    };
}

/// Log at warn level: `log_warn!(logger, "x = {}", x)`
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format_args!($($arg)+))
    };
}

/// Log at error level: `log_error!(logger, "x = {}", x)`
#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format_args!($($arg)+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::clock::ManualClock;
    use crate::logging::console::CaptureBuffer;
    use crate::logging::file_writer::RotationConfig;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn capture_logger(mask: LevelMask) -> (Logger, CaptureBuffer) {
        let buffer = CaptureBuffer::default();
        let logger = Logger::console(mask, ConsoleSink::with_writer(buffer.clone(), false));
        (logger, buffer)
    }

    #[test]
    fn test_warn_level_gates_console() {
        let (logger, buffer) = capture_logger(LevelMask::WARN);

        log_debug!(logger, "debug {}", 1);
        log_info!(logger, "info {}", 2);
        assert!(buffer.contents().is_empty());

        log_warn!(logger, "warn {}", 3);
        log_error!(logger, "error {}", 4);

        let out = buffer.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Warn: ") && lines[0].ends_with("warn 3"));
        assert!(lines[1].starts_with("Error: ") && lines[1].ends_with("error 4"));
    }

    #[test]
    fn test_warn_level_gates_file_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");
        let clock = Arc::new(ManualClock::at_day(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        let file = Arc::new(RotatingFile::new(&path, RotationConfig::default()).with_clock(clock));
        let logger = Logger::file(LevelMask::WARN, file);

        logger.debug(format_args!("quiet"));
        logger.info(format_args!("quiet"));
        assert!(!path.exists());

        logger.warn(format_args!("loud"));
        logger.error(format_args!("louder"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Warn: 2024-03-01"));
        assert!(content.contains("Error: 2024-03-01"));
    }

    #[test]
    fn test_caller_location_is_recorded() {
        let (logger, buffer) = capture_logger(LevelMask::ALL);

        let line = line!() + 1;
        logger.info(format_args!("here"));

        assert!(buffer
            .contents()
            .contains(&format!("dispatch.rs:{}: here", line)));
    }

    #[test]
    fn test_called_variants_use_given_location() {
        let (logger, buffer) = capture_logger(LevelMask::ALL);

        #[track_caller]
        fn wrapper(logger: &Logger) {
            logger.called_warn(Location::caller(), format_args!("wrapped"));
        }

        let line = line!() + 1;
        wrapper(&logger);

        assert!(buffer
            .contents()
            .contains(&format!("dispatch.rs:{}: wrapped", line)));
    }

    #[test]
    fn test_off_suppresses_everything() {
        let (logger, buffer) = capture_logger(LevelMask::OFF);

        logger.error(format_args!("nope"));
        logger.called_error(Location::caller(), format_args!("nope"));

        assert!(buffer.contents().is_empty());
        assert!(!logger.enabled(Level::Fatal));
    }
}
