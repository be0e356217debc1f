//! Precondition checks run before the controls file is read or written.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{IoOp, KeyfixError, Result};

/// Outcome of a successful [`validate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardReport {
    pub path: PathBuf,
    pub len: u64,
}

/// Check that `path` is an existing regular file of exactly `expected_len` bytes.
///
/// Existence is checked first; a directory or other non-file entry counts as missing.
pub fn validate(path: &Path, expected_len: u64) -> Result<GuardReport> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(KeyfixError::FileMissing {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(KeyfixError::io(IoOp::Open, path, 0, err)),
    };
    if !metadata.is_file() {
        return Err(KeyfixError::FileMissing {
            path: path.to_path_buf(),
        });
    }

    let actual = metadata.len();
    if actual != expected_len {
        tracing::warn!(
            path = %path.display(),
            expected = expected_len,
            actual,
            "controls file size mismatch"
        );
        return Err(KeyfixError::SizeMismatch {
            path: path.to_path_buf(),
            expected: expected_len,
            actual,
        });
    }

    Ok(GuardReport {
        path: path.to_path_buf(),
        len: actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn directory_is_treated_as_missing() {
        let dir = tempdir().expect("tmp");
        let err = validate(dir.path(), 0).expect_err("directory must not validate");
        assert!(matches!(err, KeyfixError::FileMissing { .. }));
        assert!(err.is_precondition());
    }

    #[test]
    fn size_mismatch_reports_both_lengths() {
        let dir = tempdir().expect("tmp");
        let path = dir.path().join("controls.rmp");
        std::fs::write(&path, [0u8; 12]).expect("write");
        match validate(&path, 16) {
            Err(KeyfixError::SizeMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
