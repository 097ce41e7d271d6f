//! Per-line log format
//!
//! Every persisted line looks like
//! `Info: 2024-03-01 14:30:45 src/main.rs:42: message`. The date is the second
//! whitespace-separated token; day recovery in [`super::state`] depends on it.

use std::fmt;
use std::panic::Location;

use chrono::NaiveDateTime;

use super::level::Level;

/// Date layout shared by log lines and backup file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time-of-day layout used in log lines
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Render a single log line, including the trailing newline
pub fn format_line(
    level: Level,
    time: NaiveDateTime,
    location: &Location<'_>,
    args: fmt::Arguments<'_>,
) -> String {
    format_line_with_origin(
        level,
        time,
        &format!("{}:{}", location.file(), location.line()),
        args,
    )
}

/// Render a line whose origin is not a source location (e.g. a tracing target)
pub fn format_line_with_origin(
    level: Level,
    time: NaiveDateTime,
    origin: &str,
    args: fmt::Arguments<'_>,
) -> String {
    let mut line = format!(
        "{}: {} {} {}: {}",
        level,
        time.format(DATE_FORMAT),
        time.format(TIME_FORMAT),
        origin,
        args
    );
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}
