//! Integration tests for the guard and single-byte patcher.
//! These pin down the file-mutation contract on real files.

use std::fs::{File, read, write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use keyfix_core::{
    BackupOutcome, CONTROLS_FILE_LEN, FileLock, IoOp, KeyfixError, LockMode, RESPEC_KEY_OFFSET,
    backup_path, read_byte, validate, write_byte,
};

fn controls_file(dir: &TempDir, contents: &[u8]) -> PathBuf {
    let path = dir.path().join("controls.rmp");
    write(&path, contents).unwrap();
    path
}

fn zeroed(dir: &TempDir) -> PathBuf {
    controls_file(dir, &[0u8; CONTROLS_FILE_LEN as usize])
}

fn bak(path: &Path) -> PathBuf {
    backup_path(path, ".bak")
}

#[test]
fn guard_accepts_exact_size_only() {
    let dir = TempDir::new().unwrap();
    let path = zeroed(&dir);
    let report = validate(&path, CONTROLS_FILE_LEN).unwrap();
    assert_eq!(report.len, CONTROLS_FILE_LEN);

    for len in [0usize, 1, 500, 1007, 1009, 4096] {
        write(&path, vec![0u8; len]).unwrap();
        match validate(&path, CONTROLS_FILE_LEN) {
            Err(KeyfixError::SizeMismatch { actual, .. }) => assert_eq!(actual, len as u64),
            other => panic!("len {len}: unexpected {other:?}"),
        }
    }
}

#[test]
fn guard_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = validate(&dir.path().join("controls.rmp"), CONTROLS_FILE_LEN).unwrap_err();
    assert!(matches!(err, KeyfixError::FileMissing { .. }));
    assert!(err.is_precondition());
}

#[test]
fn every_byte_value_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = zeroed(&dir);
    for value in 0..=u8::MAX {
        write_byte(&path, RESPEC_KEY_OFFSET, value).unwrap();
        assert_eq!(read_byte(&path, RESPEC_KEY_OFFSET).unwrap(), value);
    }
}

#[test]
fn write_touches_only_the_target_byte() {
    let dir = TempDir::new().unwrap();
    let original: Vec<u8> = (0..CONTROLS_FILE_LEN).map(|_| fastrand::u8(..)).collect();
    let path = controls_file(&dir, &original);

    let value = original[RESPEC_KEY_OFFSET as usize].wrapping_add(1);
    let report = write_byte(&path, RESPEC_KEY_OFFSET, value).unwrap();
    assert_eq!(report.previous, original[RESPEC_KEY_OFFSET as usize]);
    assert!(report.changed());

    let after = read(&path).unwrap();
    assert_eq!(after.len(), original.len());
    for (i, (before, now)) in original.iter().zip(&after).enumerate() {
        if i as u64 == RESPEC_KEY_OFFSET {
            assert_eq!(*now, value);
        } else {
            assert_eq!(before, now, "byte {i:#x} changed");
        }
    }
}

#[test]
fn backup_keeps_the_first_original() {
    let dir = TempDir::new().unwrap();
    let original: Vec<u8> = (0..CONTROLS_FILE_LEN).map(|i| (i % 251) as u8).collect();
    let path = controls_file(&dir, &original);

    let first = write_byte(&path, RESPEC_KEY_OFFSET, 0x1E).unwrap();
    assert_eq!(first.backup, BackupOutcome::Created);
    assert_eq!(first.backup_path, bak(&path));

    let second = write_byte(&path, RESPEC_KEY_OFFSET, 0x30).unwrap();
    assert_eq!(second.backup, BackupOutcome::AlreadyPresent);
    assert_eq!(second.previous, 0x1E);

    assert_eq!(read(bak(&path)).unwrap(), original);
    let backups = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|entry| {
            entry
                .as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".bak")
        })
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn existing_backup_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = zeroed(&dir);
    write(bak(&path), b"user's pristine copy").unwrap();

    let report = write_byte(&path, RESPEC_KEY_OFFSET, 0x12).unwrap();
    assert_eq!(report.backup, BackupOutcome::AlreadyPresent);
    assert_eq!(read(bak(&path)).unwrap(), b"user's pristine copy");
}

#[test]
fn zeroed_file_scenario() {
    let dir = TempDir::new().unwrap();
    let path = zeroed(&dir);

    write_byte(&path, 0x228, 0x1E).unwrap();

    assert_eq!(read_byte(&path, 0x228).unwrap(), 0x1E);
    assert_eq!(read_byte(&path, 0x227).unwrap(), 0x00);
    assert_eq!(read_byte(&path, 0x229).unwrap(), 0x00);
    assert_eq!(read(bak(&path)).unwrap(), vec![0u8; 1008]);
}

#[test]
fn read_past_end_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = controls_file(&dir, &[0u8; 16]);
    let err = read_byte(&path, 16).unwrap_err();
    match err {
        KeyfixError::Io { op, offset, .. } => {
            assert_eq!(op, IoOp::Read);
            assert_eq!(offset, 16);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = write_byte(&path, 16, 0x1E).unwrap_err();
    assert!(matches!(
        err,
        KeyfixError::Io {
            op: IoOp::Read,
            offset: 16,
            ..
        }
    ));
    // the failed write must not leave the file locked
    let lock = FileLock::try_acquire(File::open(&path).unwrap(), LockMode::Exclusive).unwrap();
    assert_eq!(lock.mode(), LockMode::Exclusive);
    drop(lock);
    assert_eq!(read(&path).unwrap(), vec![0u8; 16]);
}
