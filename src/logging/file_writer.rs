//! Self-rotating log file
//!
//! Every write first checks whether the active file still belongs to the
//! current logical day. When the split interval has passed, expired backups are
//! swept, the active file is renamed to `<path>.<YYYY-MM-DD>` and writing
//! continues in a fresh file. Rotation is driven entirely by writes; nothing
//! runs in the background.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use chrono::{Duration, NaiveDate};

use super::clock::{Clock, SystemClock};
use super::console::ConsoleSink;
use super::dispatch::LogSink;
use super::error::LogError;
use super::format::{format_line, DATE_FORMAT};
use super::level::Level;
use super::retention::{sweep_expired_backups, DEFAULT_KEEP_DAYS};
use super::state::RotationState;

/// Default number of days between rotations
pub const DEFAULT_SPLIT_DAYS: u32 = 1;

/// Rotation schedule of a [`RotatingFile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    /// Days the active file covers before it is rotated (0 behaves as 1)
    pub split_days: u32,
    /// Days a backup is kept after its date
    pub keep_days: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            split_days: DEFAULT_SPLIT_DAYS,
            keep_days: DEFAULT_KEEP_DAYS,
        }
    }
}

/// Log file that rotates itself into dated backups
///
/// All state changes happen under one lock, so concurrent writers in the same
/// process never interleave a rotation with a write. Separate processes
/// sharing the same path are not coordinated.
pub struct RotatingFile {
    path: PathBuf,
    config: RotationConfig,
    clock: Arc<dyn Clock>,
    diagnostics: Arc<ConsoleSink>,
    state: OnceLock<Mutex<RotationState>>,
}

impl RotatingFile {
    /// Create a handle for `path`. Nothing is touched on disk until the first write.
    pub fn new(path: impl Into<PathBuf>, config: RotationConfig) -> Self {
        Self {
            path: path.into(),
            config,
            clock: Arc::new(SystemClock),
            diagnostics: Arc::new(ConsoleSink::stdout()),
            state: OnceLock::new(),
        }
    }

    /// Replace the clock used for day decisions and line timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the console that receives failure reports
    pub fn with_diagnostics(mut self, diagnostics: Arc<ConsoleSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Path of the active file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rotation schedule this file was built with
    pub fn config(&self) -> RotationConfig {
        self.config
    }

    /// Logical day of the active file, recovering it if needed
    pub fn current_day(&self) -> NaiveDate {
        self.lock_state().current_day
    }

    /// Where the active file goes when rotated away from `day`
    pub fn backup_path(&self, day: NaiveDate) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(day.format(DATE_FORMAT).to_string());
        PathBuf::from(name)
    }

    /// Rotate the active file if its day is over
    ///
    /// Returns the backup path when a rename happened.
    pub fn split(&self) -> Option<PathBuf> {
        let mut state = self.lock_state();
        self.split_locked(&mut state)
    }

    /// Rotate if needed, then open the active file for appending
    ///
    /// The returned handle keeps the write lock until dropped.
    pub fn open_for_write(&self) -> Result<ActiveFile<'_>, LogError> {
        let mut state = self.lock_state();
        self.split_locked(&mut state);

        let file = open_active(&self.path).map_err(|source| LogError::Open {
            path: self.path.clone(),
            source,
        })?;

        Ok(ActiveFile {
            file,
            path: &self.path,
            _state: state,
        })
    }

    /// Append `buf` to the active file as one write
    ///
    /// Failures are reported on the diagnostics console and returned.
    pub fn append(&self, buf: &[u8]) -> Result<usize, LogError> {
        let result = self
            .open_for_write()
            .and_then(|mut active| active.write_once(buf));

        if let Err(err) = &result {
            self.diagnostics.report(err);
        }
        result
    }

    fn lock_state(&self) -> MutexGuard<'_, RotationState> {
        self.state
            .get_or_init(|| Mutex::new(RotationState::recover(&self.path, self.clock.today())))
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    // Failures here go to the console only: this file may itself be the
    // writer behind a tracing subscriber, and the lock is held.
    fn split_locked(&self, state: &mut RotationState) -> Option<PathBuf> {
        let today = self.clock.today();
        let split_days = i64::from(self.config.split_days.max(1));
        let boundary = state
            .current_day
            .checked_add_signed(Duration::days(split_days))
            .unwrap_or(NaiveDate::MAX);

        if today < boundary {
            return None;
        }

        match sweep_expired_backups(
            &state.directory,
            &state.base_name,
            self.config.keep_days,
            self.clock.now(),
        ) {
            Ok(outcome) => {
                for failure in &outcome.failures {
                    self.diagnostics.report(failure);
                }
            }
            Err(err) => self.diagnostics.report(&err),
        }

        let backup = self.backup_path(state.current_day);
        let mut rotated = None;
        if !backup.exists() {
            match std::fs::rename(&self.path, &backup) {
                Ok(()) => rotated = Some(backup),
                Err(source) => {
                    let not_found = source.kind() == io::ErrorKind::NotFound;
                    self.diagnostics.report(&LogError::Rename {
                        from: self.path.clone(),
                        to: backup,
                        source,
                    });
                    // Keep the old day so the next write retries; a missing
                    // active file has nothing to retry.
                    if !not_found {
                        return None;
                    }
                }
            }
        }

        state.current_day = today;
        rotated
    }
}

fn open_active(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666).custom_flags(libc::O_SYNC);
    }

    options.open(path)
}

/// Open active file, holding the rotation lock
pub struct ActiveFile<'a> {
    file: File,
    path: &'a Path,
    _state: MutexGuard<'a, RotationState>,
}

impl ActiveFile<'_> {
    /// Write the whole buffer in one call
    pub fn write_once(&mut self, buf: &[u8]) -> Result<usize, LogError> {
        self.file.write_all(buf).map_err(|source| LogError::Write {
            path: self.path.to_path_buf(),
            source,
        })?;
        Ok(buf.len())
    }
}

impl Write for &RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Each write is synchronous and the descriptor is already closed.
        Ok(())
    }
}

impl LogSink for RotatingFile {
    fn emit(&self, level: Level, location: &'static Location<'static>, args: fmt::Arguments<'_>) {
        let line = format_line(level, self.clock.now(), location, args);
        let _ = self.append(line.as_bytes());
    }
}

impl fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("initialized", &self.state.get().is_some())
            .finish()
    }
}
