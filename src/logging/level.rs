//! Log levels and the level bitmask

use std::fmt;

/// Severity of a single log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Prefix written at the start of every line
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Level::Debug => 1 << 0,
            Level::Info => 1 << 1,
            Level::Warn => 1 << 2,
            Level::Error => 1 << 3,
            Level::Fatal => 1 << 4,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Set of enabled levels
///
/// Each named mask enables its own level and everything more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelMask(u8);

impl LevelMask {
    pub const ALL: LevelMask = LevelMask(0b1_1111);
    pub const DEBUG: LevelMask = LevelMask(0b1_1111);
    pub const INFO: LevelMask = LevelMask(0b1_1110);
    pub const WARN: LevelMask = LevelMask(0b1_1100);
    pub const ERROR: LevelMask = LevelMask(0b1_1000);
    pub const FATAL: LevelMask = LevelMask(0b1_0000);
    pub const OFF: LevelMask = LevelMask(0);

    /// Resolve a level selector, ignoring case
    ///
    /// Unknown names enable every level.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "INFO" => Self::INFO,
            "DEBUG" => Self::DEBUG,
            "WARN" => Self::WARN,
            "ERROR" => Self::ERROR,
            "FATAL" => Self::FATAL,
            "OFF" => Self::OFF,
            _ => Self::ALL,
        }
    }

    /// Whether records at `level` pass this mask
    pub fn enables(&self, level: Level) -> bool {
        self.0 & level.bit() != 0
    }

    /// Most verbose equivalent filter for a tracing subscriber
    pub fn to_level_filter(&self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;

        if self.enables(Level::Debug) {
            LevelFilter::DEBUG
        } else if self.enables(Level::Info) {
            LevelFilter::INFO
        } else if self.enables(Level::Warn) {
            LevelFilter::WARN
        } else if self.enables(Level::Error) || self.enables(Level::Fatal) {
            LevelFilter::ERROR
        } else {
            LevelFilter::OFF
        }
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        Self::ALL
    }
}
