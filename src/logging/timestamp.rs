//! Loose timestamp parsing
//!
//! Maps a handful of common date-time spellings to Unix seconds. Strings
//! without an explicit offset are read as local time.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use regex::Regex;

struct Layout {
    pattern: Regex,
    format: &'static str,
    has_offset: bool,
}

static LAYOUTS: LazyLock<Vec<Layout>> = LazyLock::new(|| {
    [
        (
            r"^[+-]\d{4}\s\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}$",
            "%z %Y-%m-%d %H:%M:%S",
            true,
        ),
        (
            r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}$",
            "%Y-%m-%d %H:%M:%S",
            false,
        ),
        (
            r"^\d{4}/\d{2}/\d{2}\s\d{2}:\d{2}:\d{2}[+-]\d{4}$",
            "%Y/%m/%d %H:%M:%S%z",
            true,
        ),
        (
            r"^\d{4}/\d{2}/\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{4}$",
            "%Y/%m/%dT%H:%M:%S%z",
            true,
        ),
        (
            r"^\d{4}/\d{2}/\d{2}\s\d{2}:\d{2}:\d{2}$",
            "%Y/%m/%d %H:%M:%S",
            false,
        ),
        (
            r"^\d{4}/\d{2}/\d{2}T\d{2}:\d{2}:\d{2}$",
            "%Y/%m/%dT%H:%M:%S",
            false,
        ),
    ]
    .into_iter()
    .filter_map(|(pattern, format, has_offset)| {
        Some(Layout {
            pattern: Regex::new(pattern).ok()?,
            format,
            has_offset,
        })
    })
    .collect()
});

/// Parse `input` into Unix seconds, or 0 if no known layout matches
pub fn to_timestamp(input: &str) -> i64 {
    parse_timestamp(input).unwrap_or(0)
}

/// Parse `input` into Unix seconds
pub fn parse_timestamp(input: &str) -> Option<i64> {
    let layout = LAYOUTS.iter().find(|l| l.pattern.is_match(input))?;

    if layout.has_offset {
        return DateTime::parse_from_str(input, layout.format)
            .ok()
            .map(|t| t.timestamp());
    }

    let naive = NaiveDateTime::parse_from_str(input, layout.format).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.timestamp())
}
