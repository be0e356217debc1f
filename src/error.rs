//! Error types shared across the crate.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout `keyfix-core`.
pub type Result<T> = std::result::Result<T, KeyfixError>;

/// File operation that failed, carried by [`KeyfixError::Io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Lock,
    Seek,
    Read,
    Write,
    Sync,
    Backup,
}

impl std::fmt::Display for IoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Open => "open",
            Self::Lock => "lock",
            Self::Seek => "seek",
            Self::Read => "read",
            Self::Write => "write",
            Self::Sync => "sync",
            Self::Backup => "backup",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum KeyfixError {
    #[error("controls file not found at {path}; run the game at least once")]
    FileMissing { path: PathBuf },

    #[error(
        "controls file {path} has unexpected size: expected {expected} bytes, found {actual}"
    )]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("{op} failed on {path} at offset {offset:#x}: {source}")]
    Io {
        op: IoOp,
        path: PathBuf,
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error(
        "write to {path} at offset {offset:#x} did not stick: expected {expected:#04x}, read back {actual:#04x}"
    )]
    VerifyMismatch {
        path: PathBuf,
        offset: u64,
        expected: u8,
        actual: u8,
    },

    #[error("could not determine the local application data directory")]
    DataDirUnavailable,

    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: String },
}

impl KeyfixError {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, offset: u64, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            offset,
            source,
        }
    }

    /// True for failures detected before any mutation was attempted.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::FileMissing { .. } | Self::SizeMismatch { .. })
    }
}
