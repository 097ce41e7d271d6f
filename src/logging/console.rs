//! Colorized console sink
//!
//! Writes formatted lines to stdout with a per-level foreground color on a
//! black background. Also used by the file sink to report its own failures.

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Mutex;

use chrono::Local;
use crossterm::style::{style, Color, StyledContent, Stylize};

use super::dispatch::LogSink;
use super::format::format_line;
use super::level::Level;

/// Sink that prints to a terminal stream
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleSink {
    /// Colored sink on stdout
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout(), true)
    }

    /// Sink on an arbitrary writer
    pub fn with_writer(out: impl Write + Send + 'static, color: bool) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            color,
        }
    }

    /// Enable or disable ANSI coloring
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write an already formatted line
    ///
    /// Output errors are ignored: the console is the last resort.
    pub fn write_line(&self, level: Level, line: &str) {
        let text = line.trim_end_matches('\n');
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let _ = if self.color {
            writeln!(out, "{}", paint(level, text))
        } else {
            writeln!(out, "{}", text)
        };
        let _ = out.flush();
    }

    /// Report an internal failure at error level
    #[track_caller]
    pub fn report(&self, err: &dyn fmt::Display) {
        self.emit(Level::Error, Location::caller(), format_args!("{}", err));
    }
}

fn paint(level: Level, text: &str) -> StyledContent<&str> {
    let color = match level {
        Level::Debug => Color::Magenta,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error | Level::Fatal => Color::Red,
    };
    style(text).with(color).on(Color::Black)
}

impl LogSink for ConsoleSink {
    fn emit(&self, level: Level, location: &'static Location<'static>, args: fmt::Arguments<'_>) {
        let line = format_line(level, Local::now().naive_local(), location, args);
        self.write_line(level, &line);
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// In-memory writer whose contents can be inspected after the sink is done
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct CaptureBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl CaptureBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output() {
        let buffer = CaptureBuffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone(), false);

        sink.emit(Level::Info, Location::caller(), format_args!("ready"));

        let out = buffer.contents();
        assert!(out.starts_with("Info: "));
        assert!(out.ends_with("ready\n"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_colored_output_keeps_text() {
        let buffer = CaptureBuffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone(), true);

        sink.emit(Level::Error, Location::caller(), format_args!("boom"));

        let out = buffer.contents();
        assert!(out.contains("Error: "));
        assert!(out.contains("boom"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_report_uses_error_level() {
        let buffer = CaptureBuffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone(), false);

        sink.report(&"disk on fire");

        let out = buffer.contents();
        assert!(out.starts_with("Error: "));
        assert!(out.contains("console.rs:"));
        assert!(out.contains("disk on fire"));
    }
}
