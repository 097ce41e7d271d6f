//! Backup retention
//!
//! Deletes dated backups of the active file once they fall out of the keep window.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::error::LogError;
use super::format::DATE_FORMAT;

/// Default retention period in days
pub const DEFAULT_KEEP_DAYS: u32 = 90;

/// Result of one sweep over the log directory
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// Number of backups deleted
    pub removed: usize,
    /// Backups that were expired but could not be deleted
    pub failures: Vec<LogError>,
}

/// Extract the backup date from a file name like `app.log.2024-03-01`
///
/// The date is the third `.`-separated component, so this only recognizes
/// backups of a base name that contains exactly one dot.
pub fn backup_date(file_name: &str, base_name: &str) -> Option<NaiveDate> {
    let rest = file_name.strip_prefix(base_name)?;
    if !rest.starts_with('.') {
        return None;
    }
    let token = file_name.split('.').nth(2)?;
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

/// Whether a backup dated `date` is past the keep window at `now`
///
/// A window reaching beyond the representable calendar never expires.
pub fn is_expired(date: NaiveDate, keep_days: u32, now: NaiveDateTime) -> bool {
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::days(i64::from(keep_days)))
        .is_some_and(|kept_until| now > kept_until)
}

/// Delete expired backups of `base_name` in `directory`
///
/// Files that don't parse as backups are never touched. A failed delete is
/// recorded and the sweep moves on to the next file.
pub fn sweep_expired_backups(
    directory: &Path,
    base_name: &str,
    keep_days: u32,
    now: NaiveDateTime,
) -> Result<SweepOutcome, LogError> {
    let mut outcome = SweepOutcome::default();

    if !directory.exists() {
        return Ok(outcome);
    }

    let entries = fs::read_dir(directory).map_err(|source| LogError::ScanDir {
        path: directory.to_path_buf(),
        source,
    })?;

    for entry in entries.flatten() {
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };

        let Some(date) = backup_date(name, base_name) else {
            continue;
        };

        if !is_expired(date, keep_days, now) {
            continue;
        }

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => outcome.removed += 1,
            Err(source) => outcome.failures.push(LogError::Remove { path, source }),
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn noon(date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(12, 0, 0).unwrap()
    }

    fn touch(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(b"test").unwrap();
        path
    }

    #[test]
    fn test_backup_date_parsing() {
        assert_eq!(
            backup_date("app.log.2024-03-01", "app.log"),
            Some(day(2024, 3, 1))
        );
        assert_eq!(backup_date("app.log", "app.log"), None);
        assert_eq!(backup_date("app.log.old", "app.log"), None);
        assert_eq!(backup_date("other.log.2024-03-01", "app.log"), None);
        assert_eq!(backup_date("app.logx.2024-03-01", "app.log"), None);
    }

    #[test]
    fn test_backup_date_undotted_base_is_not_recognized() {
        // "app.2024-03-01" splits into ["app", "2024-03-01"]
        assert_eq!(backup_date("app.2024-03-01", "app"), None);
    }

    #[test]
    fn test_is_expired_boundary() {
        let backup = day(2024, 3, 1);
        let boundary = day(2024, 3, 3).and_time(NaiveTime::MIN);

        assert!(!is_expired(backup, 2, noon(day(2024, 3, 2))));
        assert!(!is_expired(backup, 2, boundary));
        assert!(is_expired(backup, 2, boundary + Duration::seconds(1)));
        assert!(is_expired(backup, 2, noon(day(2024, 3, 5))));
    }

    #[test]
    fn test_huge_keep_window_never_expires() {
        assert!(!is_expired(day(2024, 3, 1), u32::MAX, noon(day(2024, 3, 5))));
        assert!(!is_expired(day(1, 1, 1), 100_000_000, noon(day(2024, 3, 5))));
    }

    #[test]
    fn test_sweep_keeps_backups_with_huge_keep_window() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let old = touch(dir, "app.log.2000-01-01");

        let outcome =
            sweep_expired_backups(dir, "app.log", u32::MAX, noon(day(2024, 3, 5))).unwrap();

        assert_eq!(outcome.removed, 0);
        assert!(old.exists());
    }

    #[test]
    fn test_sweep_nonexistent_dir() {
        let path = Path::new("/nonexistent/path/for/testing");
        let outcome = sweep_expired_backups(path, "app.log", 2, noon(day(2024, 3, 5))).unwrap();
        assert_eq!(outcome.removed, 0);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_sweep_removes_only_expired_backups() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let active = touch(dir, "app.log");
        let old = touch(dir, "app.log.2024-03-01");
        let recent = touch(dir, "app.log.2024-03-04");

        let outcome = sweep_expired_backups(dir, "app.log", 2, noon(day(2024, 3, 5))).unwrap();

        assert_eq!(outcome.removed, 1);
        assert!(active.exists());
        assert!(!old.exists());
        assert!(recent.exists());
    }

    #[test]
    fn test_sweep_ignores_unrelated_and_unparseable_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let other = touch(dir, "other.log.2000-01-01");
        let garbage = touch(dir, "app.log.not-a-date");
        let notes = touch(dir, "notes.txt");
        fs::create_dir(dir.join("app.log.1999-01-01")).unwrap();

        let outcome = sweep_expired_backups(dir, "app.log", 1, noon(day(2024, 3, 5))).unwrap();

        assert_eq!(outcome.removed, 0);
        assert!(other.exists());
        assert!(garbage.exists());
        assert!(notes.exists());
        assert!(dir.join("app.log.1999-01-01").is_dir());
    }
}
