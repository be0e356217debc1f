//! Advisory OS locks around the controls file.
//!
//! Locks are non-blocking: a file already locked by another process (the game, or a
//! second copy of the tool) fails immediately with `WouldBlock` instead of waiting.

use std::fs::File;
use std::io;

use fs2::FileExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

/// An open file together with the lock held on it. The lock is released on drop.
///
/// All I/O goes through the locking handle, since Windows refuses access to locked
/// regions through any other handle.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    mode: LockMode,
}

impl FileLock {
    /// Take `mode` on `file` without blocking. On failure the file is closed.
    pub fn try_acquire(file: File, mode: LockMode) -> io::Result<Self> {
        // fully qualified so the fs2 trait wins over std's inherent File locks
        match mode {
            LockMode::Shared => FileExt::try_lock_shared(&file)?,
            LockMode::Exclusive => FileExt::try_lock_exclusive(&file)?,
        }
        log::debug!("acquired {mode:?} lock");
        Ok(Self { file, mode })
    }

    #[must_use]
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            log::warn!("failed to release {:?} lock: {err}", self.mode);
        } else {
            log::debug!("released {:?} lock", self.mode);
        }
    }
}
