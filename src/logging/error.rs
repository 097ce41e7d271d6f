//! Errors raised by the rotating file sink

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Filesystem failure inside the rotating file sink
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rotate {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove expired log {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to scan log directory {}: {source}", path.display())]
    ScanDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LogError {
    /// The underlying IO error kind
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            LogError::Open { source, .. }
            | LogError::Write { source, .. }
            | LogError::Rename { source, .. }
            | LogError::Remove { source, .. }
            | LogError::ScanDir { source, .. } => source.kind(),
        }
    }
}

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        io::Error::new(err.kind(), err)
    }
}
