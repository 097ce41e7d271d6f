//! Logging system for daylog
//!
//! Provides leveled logging to either a colorized console or a file that
//! rotates itself into dated backups and deletes backups past a keep window.

pub mod clock;
mod console;
mod dispatch;
mod error;
mod file_writer;
mod format;
mod level;
mod retention;
mod state;
mod subscriber;
pub mod timestamp;

pub use clock::{Clock, ManualClock, SystemClock};
pub use console::ConsoleSink;
pub use dispatch::{LogSink, Logger};
pub use error::LogError;
pub use file_writer::{ActiveFile, RotatingFile, RotationConfig, DEFAULT_SPLIT_DAYS};
pub use format::{format_line, DATE_FORMAT};
pub use level::{Level, LevelMask};
pub use retention::{sweep_expired_backups, SweepOutcome, DEFAULT_KEEP_DAYS};
pub use state::unknown_day;
pub use subscriber::{init_logging, LineFormat};
pub use timestamp::to_timestamp;
