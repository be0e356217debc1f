//! Single-byte patching of the controls file.
//!
//! Every write follows the same sequence:
//! - copy the file to `<name>.bak` unless a backup already exists (first write wins);
//! - open read-write under an exclusive, non-blocking lock;
//! - write one byte at the offset, sync, then read it back and compare;
//! - drop the lock on every exit path.
//!
//! Callers are expected to run [`crate::guard::validate`] first; [`crate::ControlsFile`]
//! enforces that ordering.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::constants::BACKUP_SUFFIX;
use crate::error::{IoOp, KeyfixError, Result};
use crate::lock::{FileLock, LockMode};

/// Storage the patcher can write through and read back from.
///
/// `sync` pushes the written byte down to the OS; the default is a no-op for in-memory media.
pub trait PatchMedium: Read + Write + Seek {
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PatchMedium for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    Created,
    AlreadyPresent,
}

/// What a successful [`write_byte`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub offset: u64,
    pub previous: u8,
    pub value: u8,
    pub backup_path: PathBuf,
    pub backup: BackupOutcome,
}

impl PatchReport {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous != self.value
    }
}

/// Sibling path with `suffix` appended to the full file name (`controls.rmp.bak`).
#[must_use]
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy `path` to its backup location unless a backup is already there.
///
/// The backup is opened with `create_new`, so an existing one is never overwritten. A copy
/// that fails halfway is removed so the next attempt can produce a complete backup.
pub fn ensure_backup(path: &Path, suffix: &str) -> Result<BackupOutcome> {
    let target = backup_path(path, suffix);
    let mut backup = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            tracing::debug!(backup = %target.display(), "backup already present");
            return Ok(BackupOutcome::AlreadyPresent);
        }
        Err(err) => return Err(KeyfixError::io(IoOp::Backup, &target, 0, err)),
    };

    match copy_into(path, &target, &mut backup) {
        Ok(bytes) => {
            tracing::info!(backup = %target.display(), bytes, "created controls backup");
            Ok(BackupOutcome::Created)
        }
        Err(err) => {
            drop(backup);
            if let Err(cleanup) = fs::remove_file(&target) {
                tracing::warn!(backup = %target.display(), error = %cleanup, "could not remove partial backup");
            }
            Err(err)
        }
    }
}

fn copy_into(path: &Path, target: &Path, backup: &mut File) -> Result<u64> {
    let source = File::open(path).map_err(|err| KeyfixError::io(IoOp::Open, path, 0, err))?;
    let mut source = FileLock::try_acquire(source, LockMode::Shared)
        .map_err(|err| KeyfixError::io(IoOp::Lock, path, 0, err))?;
    let bytes = io::copy(source.file_mut(), backup)
        .map_err(|err| KeyfixError::io(IoOp::Backup, target, 0, err))?;
    backup
        .sync_all()
        .map_err(|err| KeyfixError::io(IoOp::Sync, target, 0, err))?;
    Ok(bytes)
}

/// Read the byte stored at `offset` under a shared lock.
pub fn read_byte(path: &Path, offset: u64) -> Result<u8> {
    let file = File::open(path).map_err(|err| KeyfixError::io(IoOp::Open, path, offset, err))?;
    let mut lock = FileLock::try_acquire(file, LockMode::Shared)
        .map_err(|err| KeyfixError::io(IoOp::Lock, path, offset, err))?;
    let value = read_at(lock.file_mut(), path, offset)?;
    tracing::debug!(path = %path.display(), offset, value, "read byte");
    Ok(value)
}

/// Back up, then overwrite the byte at `offset` with `value` and verify it by reading it back.
pub fn write_byte(path: &Path, offset: u64, value: u8) -> Result<PatchReport> {
    write_byte_with_backup(path, offset, value, BACKUP_SUFFIX)
}

pub(crate) fn write_byte_with_backup(
    path: &Path,
    offset: u64,
    value: u8,
    backup_suffix: &str,
) -> Result<PatchReport> {
    let backup = ensure_backup(path, backup_suffix)?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|err| KeyfixError::io(IoOp::Open, path, offset, err))?;
    let mut lock = FileLock::try_acquire(file, LockMode::Exclusive)
        .map_err(|err| KeyfixError::io(IoOp::Lock, path, offset, err))?;
    let previous = patch_and_verify(lock.file_mut(), path, offset, value)?;
    drop(lock);

    tracing::info!(
        path = %path.display(),
        offset,
        previous,
        value,
        "patched controls byte"
    );
    Ok(PatchReport {
        path: path.to_path_buf(),
        offset,
        previous,
        value,
        backup_path: backup_path(path, backup_suffix),
        backup,
    })
}

/// Write `value` at `offset` through `medium` and confirm it by reading it back.
///
/// Returns the byte that was there before. `path` only labels errors.
pub fn patch_and_verify<M: PatchMedium + ?Sized>(
    medium: &mut M,
    path: &Path,
    offset: u64,
    value: u8,
) -> Result<u8> {
    let previous = read_at(medium, path, offset)?;

    seek_to(medium, path, offset)?;
    medium
        .write_all(&[value])
        .and_then(|()| medium.flush())
        .map_err(|err| KeyfixError::io(IoOp::Write, path, offset, err))?;
    medium
        .sync()
        .map_err(|err| KeyfixError::io(IoOp::Sync, path, offset, err))?;

    let actual = read_at(medium, path, offset)?;
    if actual != value {
        tracing::warn!(
            path = %path.display(),
            offset,
            expected = value,
            actual,
            "read-back mismatch after write"
        );
        return Err(KeyfixError::VerifyMismatch {
            path: path.to_path_buf(),
            offset,
            expected: value,
            actual,
        });
    }
    Ok(previous)
}

fn seek_to<M: Seek + ?Sized>(medium: &mut M, path: &Path, offset: u64) -> Result<()> {
    medium
        .seek(SeekFrom::Start(offset))
        .map(|_| ())
        .map_err(|err| KeyfixError::io(IoOp::Seek, path, offset, err))
}

fn read_at<M: Read + Seek + ?Sized>(medium: &mut M, path: &Path, offset: u64) -> Result<u8> {
    seek_to(medium, path, offset)?;
    let mut buf = [0u8; 1];
    medium
        .read_exact(&mut buf)
        .map_err(|err| KeyfixError::io(IoOp::Read, path, offset, err))?;
    Ok(buf[0])
}
