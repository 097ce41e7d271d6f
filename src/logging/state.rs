//! Rotation state and day recovery
//!
//! The logical day of the active file is recovered from the file itself the
//! first time it is written to, so a restarted process keeps rotating on the
//! same schedule as the one that created the file.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::format::DATE_FORMAT;

/// How many bytes of the active file are inspected for the date token
const HEADER_PROBE_LEN: u64 = 50;

/// Day assigned when the active file exists but its first line has no usable date
///
/// It is always older than any real day, so the next write rotates.
pub fn unknown_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Mutable state of one rotating file, guarded by its write lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    /// Absolute directory holding the active file and its backups
    pub directory: PathBuf,
    /// File name of the active file, prefix of every backup name
    pub base_name: String,
    /// Logical day the content of the active file belongs to
    pub current_day: NaiveDate,
}

impl RotationState {
    /// Derive the state for `path`, reading the existing file if there is one
    pub fn recover(path: &Path, today: NaiveDate) -> Self {
        let current_day = match fs::metadata(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => today,
            _ => first_line_day(path).unwrap_or_else(unknown_day),
        };

        let (directory, base_name) = split_path(path);

        Self {
            directory,
            base_name,
            current_day,
        }
    }
}

/// Parse the date token (second whitespace field) from the head of a log file
fn first_line_day(path: &Path) -> Option<NaiveDate> {
    let mut head = Vec::with_capacity(HEADER_PROBE_LEN as usize);
    File::open(path)
        .ok()?
        .take(HEADER_PROBE_LEN)
        .read_to_end(&mut head)
        .ok()?;

    let head = String::from_utf8_lossy(&head);
    let token = head.split_whitespace().nth(1)?;
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

fn split_path(path: &Path) -> (PathBuf, String) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let directory = std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf());
    let base_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (directory, base_name)
}
